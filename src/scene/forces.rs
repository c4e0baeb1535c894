//! Time-limited forces applied to scene components.
//!
//! A force displaces its component every frame until its duration runs
//! out. Re-triggering a force from the same originating node refreshes the
//! existing entry instead of stacking a duplicate. Expired forces are
//! removed by swap-with-last; force order is not stable across removal.

use super::collision::check_collisions;
use super::{Scene, Vec2};

/// One active force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Force {
    /// Index of the producing node; the de-duplication key.
    pub node: usize,
    /// Scene component being pushed.
    pub component: usize,
    /// World units per second.
    pub speed: f32,
    /// Direction in radians.
    pub angle: f32,
    /// Seconds left.
    pub remaining: f32,
}

impl Scene {
    /// Registers a force, refreshing the entry from the same originating
    /// node if one is still active.
    pub fn apply_force(&mut self, force: Force) {
        if let Some(existing) = self.forces.iter_mut().find(|f| f.node == force.node) {
            *existing = force;
        } else {
            self.forces.push(force);
        }
    }

    /// Advances every force by `dt` seconds.
    ///
    /// Each force displaces its component; if the displaced component then
    /// collides blocking-on-blocking, the displacement is fully reverted
    /// (no sliding). Durations tick down and expired forces are removed.
    pub fn integrate_forces(&mut self, dt: f32) {
        for i in 0..self.forces.len() {
            let force = self.forces[i];
            let displacement =
                Vec2::new(force.angle.cos(), force.angle.sin()) * (force.speed * dt);

            let Some(component) = self.get_mut(force.component) else {
                continue;
            };
            let previous = component.position();
            component.set_position(previous + displacement);

            if check_collisions(self, force.component).blocks() {
                if let Some(component) = self.get_mut(force.component) {
                    component.set_position(previous);
                }
            }

            self.forces[i].remaining -= dt;
        }

        let mut i = 0;
        while i < self.forces.len() {
            if self.forces[i].remaining <= 0.0 {
                self.forces.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}
