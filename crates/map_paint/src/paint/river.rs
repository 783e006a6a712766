//! Organic river width: a smoothed random walk over the stroke's travelled distance.
use glam::Vec2;
use rand::Rng;

use crate::config::RiverParams;
use crate::random::rand_range;

/// Width walk state for one river stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiverState {
    pub current_width_factor: f32,
    pub target_width_factor: f32,
    /// Travel distance that triggers the next target change. `0` means "not yet drawn".
    pub distance_to_next_change: f32,
    pub traveled_since_change: f32,
    /// Position of the previous dab in any mode.
    pub last: Option<Vec2>,
}

impl Default for RiverState {
    fn default() -> Self {
        Self {
            current_width_factor: 1.0,
            target_width_factor: 1.0,
            distance_to_next_change: 0.0,
            traveled_since_change: 0.0,
            last: None,
        }
    }
}

impl RiverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything about the previous stroke.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Distance from the previous dab to `pos`, `0` on the first dab.
    pub fn distance_from_last(&self, pos: Vec2) -> f32 {
        self.last.map(|l| l.distance(pos)).unwrap_or(0.0)
    }

    /// Advances the walk for a dab at `pos` and returns the new width factor.
    ///
    /// Does not record `pos`; callers update [`RiverState::last`] after every dab.
    pub fn advance(&mut self, pos: Vec2, params: &RiverParams, rng: &mut dyn Rng) -> f32 {
        let (min_d, max_d) = params.change_distance;
        if self.distance_to_next_change <= 0.0 {
            self.distance_to_next_change = rand_range(rng, min_d, max_d);
        }

        self.traveled_since_change += self.distance_from_last(pos);
        if self.traveled_since_change > self.distance_to_next_change {
            let (min_w, max_w) = params.width_factor;
            self.target_width_factor = rand_range(rng, min_w, max_w);
            self.traveled_since_change = 0.0;
            self.distance_to_next_change = rand_range(rng, min_d, max_d);
        }

        self.current_width_factor +=
            (self.target_width_factor - self.current_width_factor) * params.blend_rate;
        self.current_width_factor
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn first_advance_seeds_threshold_lazily() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = RiverState::new();
        state.advance(Vec2::ZERO, &RiverParams::default(), &mut rng);
        assert!((20.0..=60.0).contains(&state.distance_to_next_change));
        assert_eq!(state.current_width_factor, 1.0);
    }

    #[test]
    fn converges_geometrically_without_overshoot() {
        let mut rng = StdRng::seed_from_u64(2);
        let params = RiverParams::default();
        let mut state = RiverState {
            current_width_factor: 1.1,
            target_width_factor: 0.6,
            distance_to_next_change: 1.0e9,
            ..RiverState::default()
        };

        let mut gap = state.current_width_factor - state.target_width_factor;
        for _ in 0..30 {
            state.advance(Vec2::ZERO, &params, &mut rng);
            let next_gap = state.current_width_factor - state.target_width_factor;
            assert!(next_gap >= 0.0, "overshot target");
            assert!((next_gap - gap * (1.0 - params.blend_rate)).abs() < 1e-5);
            assert!(next_gap <= gap);
            gap = next_gap;
        }
    }

    #[test]
    fn picks_new_target_after_threshold() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = RiverParams::default();
        let mut state = RiverState::new();

        let mut pos = Vec2::ZERO;
        let mut changed = false;
        for _ in 0..20 {
            state.advance(pos, &params, &mut rng);
            state.last = Some(pos);
            pos.x += 10.0;
            if state.target_width_factor != 1.0 {
                changed = true;
                break;
            }
        }
        assert!(changed);
        assert!((0.6..=1.1).contains(&state.target_width_factor));
        assert!(state.traveled_since_change < state.distance_to_next_change);
    }

    #[test]
    fn stationary_dabs_never_change_target() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = RiverState::new();
        for _ in 0..50 {
            state.advance(Vec2::new(5.0, 5.0), &RiverParams::default(), &mut rng);
            state.last = Some(Vec2::new(5.0, 5.0));
        }
        assert_eq!(state.target_width_factor, 1.0);
    }

    #[test]
    fn reset_clears_last_position() {
        let mut state = RiverState {
            last: Some(Vec2::ONE),
            traveled_since_change: 7.0,
            ..RiverState::default()
        };
        state.reset();
        assert_eq!(state, RiverState::default());
    }
}
