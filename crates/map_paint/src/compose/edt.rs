//! Exact Euclidean distance from water pixels to the nearest land pixel.
//!
//! Felzenszwalb-Huttenlocher: a squared-distance pass along every row, then along
//! every column, each taking the lower envelope of the parabolas rooted at the
//! previous pass's values.
use tiny_skia::Pixmap;

/// Distance from every pixel to the nearest pixel whose alpha is at least `threshold`.
///
/// Pixels at or above the threshold get `0`. With no such pixel anywhere, every
/// distance is infinite.
pub fn distance_to_opaque(pixmap: &Pixmap, threshold: u8) -> Vec<f32> {
    let (w, h) = (pixmap.width() as usize, pixmap.height() as usize);
    let mut field: Vec<f32> = pixmap
        .pixels()
        .iter()
        .map(|p| if p.alpha() >= threshold { 0.0 } else { f32::INFINITY })
        .collect();

    let mut envelope = Envelope::with_capacity(w.max(h));
    for row in field.chunks_exact_mut(w) {
        envelope.squared_distances(row);
    }
    let mut column = vec![0.0; h];
    for x in 0..w {
        for (y, cell) in column.iter_mut().enumerate() {
            *cell = field[y * w + x];
        }
        envelope.squared_distances(&mut column);
        for (y, cell) in column.iter().enumerate() {
            field[y * w + x] = *cell;
        }
    }

    for d in &mut field {
        *d = d.sqrt();
    }
    field
}

/// Scratch buffers for one 1D pass, reused across rows and columns.
struct Envelope {
    /// Apex positions of the parabolas on the envelope.
    apex: Vec<usize>,
    /// `bounds[k]..bounds[k + 1]` is where parabola `k` is lowest.
    bounds: Vec<f32>,
    out: Vec<f32>,
}

impl Envelope {
    fn with_capacity(n: usize) -> Self {
        Self {
            apex: Vec::with_capacity(n),
            bounds: Vec::with_capacity(n + 1),
            out: Vec::with_capacity(n),
        }
    }

    /// Replaces each sample `f[q]` with `min_p (q - p)^2 + f[p]`.
    ///
    /// Infinite samples contribute no parabola; a line with none stays infinite.
    fn squared_distances(&mut self, f: &mut [f32]) {
        self.apex.clear();
        self.bounds.clear();
        for (q, &fq) in f.iter().enumerate() {
            if !fq.is_finite() {
                continue;
            }
            if self.apex.is_empty() {
                self.apex.push(q);
                self.bounds.push(f32::NEG_INFINITY);
                continue;
            }
            let mut s = crossing(f, q, self.apex[self.apex.len() - 1]);
            while s <= self.bounds[self.bounds.len() - 1] {
                self.apex.pop();
                self.bounds.pop();
                s = crossing(f, q, self.apex[self.apex.len() - 1]);
            }
            self.apex.push(q);
            self.bounds.push(s);
        }
        if self.apex.is_empty() {
            return;
        }

        self.out.clear();
        let mut k = 0;
        for q in 0..f.len() {
            let x = q as f32;
            while k + 1 < self.apex.len() && self.bounds[k + 1] < x {
                k += 1;
            }
            let p = self.apex[k];
            let dx = x - p as f32;
            self.out.push(dx * dx + f[p]);
        }
        f.copy_from_slice(&self.out);
    }
}

/// Position where the parabolas rooted at `q` and `p < q` meet.
#[inline]
fn crossing(f: &[f32], q: usize, p: usize) -> f32 {
    let (qf, pf) = (q as f32, p as f32);
    ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf))
}

#[cfg(test)]
mod tests {
    use tiny_skia::{Color, PremultipliedColorU8};

    use super::*;

    fn with_land(w: u32, h: u32, land: &[(u32, u32)]) -> Pixmap {
        let mut p = Pixmap::new(w, h).unwrap();
        let solid = PremultipliedColorU8::from_rgba(255, 255, 255, 255).unwrap();
        for &(x, y) in land {
            p.pixels_mut()[(y * w + x) as usize] = solid;
        }
        p
    }

    fn brute_force(w: u32, h: u32, land: &[(u32, u32)]) -> Vec<f32> {
        let mut out = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                let best = land
                    .iter()
                    .map(|&(lx, ly)| {
                        let (dx, dy) = (x as f32 - lx as f32, y as f32 - ly as f32);
                        (dx * dx + dy * dy).sqrt()
                    })
                    .fold(f32::INFINITY, f32::min);
                out.push(best);
            }
        }
        out
    }

    #[test]
    fn single_land_pixel_gives_radial_distances() {
        let d = distance_to_opaque(&with_land(5, 5, &[(2, 2)]), 128);
        assert_eq!(d[12], 0.0);
        for i in [7, 11, 13, 17] {
            assert_eq!(d[i], 1.0);
        }
        for i in [6, 8, 16, 18] {
            assert!((d[i] - 2.0_f32.sqrt()).abs() < 1e-5);
        }
        assert!((d[0] - 8.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn matches_brute_force_on_scattered_land() {
        let (w, h) = (23, 17);
        let land: Vec<(u32, u32)> = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|&(x, y)| (x * 7 + y * 3) % 29 == 0)
            .collect();
        assert!(land.len() > 3);

        let fast = distance_to_opaque(&with_land(w, h, &land), 128);
        let slow = brute_force(w, h, &land);
        for (i, (a, b)) in fast.iter().zip(&slow).enumerate() {
            assert!((a - b).abs() < 1e-3, "pixel {i}: {a} vs {b}");
        }
    }

    #[test]
    fn threshold_decides_what_counts_as_land() {
        let mut p = Pixmap::new(6, 1).unwrap();
        p.pixels_mut()[0] = PremultipliedColorU8::from_rgba(100, 100, 100, 100).unwrap();
        p.pixels_mut()[5] = PremultipliedColorU8::from_rgba(200, 200, 200, 200).unwrap();

        let d = distance_to_opaque(&p, 128);
        assert_eq!(d, vec![5.0, 4.0, 3.0, 2.0, 1.0, 0.0]);
        let d = distance_to_opaque(&p, 50);
        assert_eq!(d, vec![0.0, 1.0, 2.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn canvas_without_land_is_infinitely_far() {
        let d = distance_to_opaque(&with_land(4, 3, &[]), 128);
        assert!(d.iter().all(|v| v.is_infinite()));

        let mut full = Pixmap::new(3, 3).unwrap();
        full.fill(Color::WHITE);
        assert!(distance_to_opaque(&full, 255).iter().all(|&v| v == 0.0));
    }
}
