//! JSON project file: metadata, UI state and the snapshot layers as data URIs.
//!
//! ```json
//! {
//!   "meta": { "version": 3, "width": 1024, "height": 768, "name": "Isle" },
//!   "state": { "brushSize": 40, "paintMode": "terrain" },
//!   "layers": { "map": "data:image/png;base64,...", "mask": "...", "textureMask": "...", "path": "..." }
//! }
//! ```
//!
//! `textureMask` is optional so files written before it existed still load.
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::layers::check_dimensions;
use crate::snapshot::Snapshot;

/// Current schema version.
pub const PROJECT_VERSION: u32 = 3;
const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectLayers {
    /// Visible terrain.
    pub map: String,
    /// Land mask.
    pub mask: String,
    #[serde(rename = "textureMask", default, skip_serializing_if = "Option::is_none")]
    pub texture_mask: Option<String>,
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub meta: ProjectMeta,
    /// UI state as saved by the application; see [`crate::config::ToolConfig::from_state`].
    #[serde(default)]
    pub state: serde_json::Value,
    pub layers: ProjectLayers,
}

impl ProjectFile {
    pub fn from_snapshot(
        snapshot: &Snapshot,
        width: u32,
        height: u32,
        name: impl Into<String>,
        state: serde_json::Value,
    ) -> Self {
        Self {
            meta: ProjectMeta {
                version: PROJECT_VERSION,
                width,
                height,
                name: name.into(),
            },
            state,
            layers: ProjectLayers {
                map: to_data_uri(&snapshot.terrain),
                mask: to_data_uri(&snapshot.land_mask),
                texture_mask: snapshot.texture_mask.as_deref().map(to_data_uri),
                path: to_data_uri(&snapshot.path),
            },
        }
    }

    /// Extracts the layer blobs. Fails if any data URI is malformed.
    pub fn to_snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            land_mask: from_data_uri("mask", &self.layers.mask)?,
            texture_mask: self
                .layers
                .texture_mask
                .as_deref()
                .map(|uri| from_data_uri("textureMask", uri))
                .transpose()?,
            terrain: from_data_uri("map", &self.layers.map)?,
            path: from_data_uri("path", &self.layers.path)?,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let project: Self = serde_json::from_str(json)?;
        if project.meta.version > PROJECT_VERSION {
            return Err(Error::UnsupportedVersion(project.meta.version));
        }
        check_dimensions(project.meta.width, project.meta.height)?;
        info!(
            name = %project.meta.name,
            version = project.meta.version,
            width = project.meta.width,
            height = project.meta.height,
            "project parsed"
        );
        Ok(project)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Wraps PNG bytes as a `data:image/png;base64,` URI.
pub fn to_data_uri(png: &[u8]) -> String {
    let mut out = String::with_capacity(PNG_DATA_URI_PREFIX.len() + png.len() * 4 / 3 + 4);
    out.push_str(PNG_DATA_URI_PREFIX);
    STANDARD.encode_string(png, &mut out);
    out
}

/// Accepts any `data:<mime>;base64,` URI and returns the decoded bytes.
pub fn from_data_uri(layer: &str, uri: &str) -> Result<Vec<u8>> {
    let malformed = |message: String| Error::Decode {
        layer: layer.to_owned(),
        message,
    };
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| malformed("not a data URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| malformed("missing ',' in data URI".into()))?;
    if !header.ends_with(";base64") {
        return Err(malformed(format!("unsupported encoding '{header}'")));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot {
            land_mask: vec![1, 2, 3],
            texture_mask: Some(vec![4, 5]),
            terrain: vec![6],
            path: vec![7, 8, 9, 10],
        }
    }

    #[test]
    fn json_round_trip_keeps_layers_and_state() {
        let state = json!({ "brushSize": 30, "paintMode": "river" });
        let project = ProjectFile::from_snapshot(&snapshot(), 64, 48, "Isle", state.clone());
        let text = project.to_json().unwrap();
        assert!(text.contains("\"textureMask\""));
        assert!(text.contains("data:image/png;base64,"));

        let parsed = ProjectFile::from_json(&text).unwrap();
        assert_eq!(parsed.meta.version, PROJECT_VERSION);
        assert_eq!(parsed.state, state);
        assert_eq!(parsed.to_snapshot().unwrap(), snapshot());
    }

    #[test]
    fn texture_mask_is_optional() {
        let uri = to_data_uri(&[1]);
        let text = json!({
            "meta": { "version": 2, "width": 10, "height": 10, "name": "old" },
            "state": {},
            "layers": { "map": uri, "mask": uri, "path": uri }
        })
        .to_string();
        let snap = ProjectFile::from_json(&text).unwrap().to_snapshot().unwrap();
        assert_eq!(snap.texture_mask, None);
    }

    #[test]
    fn newer_versions_are_rejected() {
        let uri = to_data_uri(&[1]);
        let text = json!({
            "meta": { "version": 4, "width": 10, "height": 10 },
            "layers": { "map": uri, "mask": uri, "path": uri }
        })
        .to_string();
        assert!(matches!(
            ProjectFile::from_json(&text),
            Err(Error::UnsupportedVersion(4))
        ));
    }

    #[test]
    fn unreasonable_canvas_sizes_are_rejected() {
        let uri = to_data_uri(&[1]);
        for (width, height) in [(100_000, 100_000), (0, 10), (20_000, 1)] {
            let text = json!({
                "meta": { "version": 3, "width": width, "height": height },
                "layers": { "map": uri, "mask": uri, "path": uri }
            })
            .to_string();
            assert!(matches!(
                ProjectFile::from_json(&text),
                Err(Error::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(matches!(
            ProjectFile::from_json("{ not json"),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            from_data_uri("mask", "image/png;base64,AAAA"),
            Err(Error::Decode { .. })
        ));
        assert!(from_data_uri("mask", "data:image/png;base64,@@@").is_err());
        assert!(from_data_uri("mask", "data:text/plain,hello").is_err());
    }
}
