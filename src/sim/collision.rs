//! Contact tests between the player sphere and track entities
//!
//! Box-shaped obstacles use a per-axis interval test. Spinning obstacles are
//! treated as the column swept by their orbit, which is what makes them
//! readable to dodge at speed.

use glam::Vec3;

use super::entities::{Obstacle, ObstacleKind, PowerUp};
use super::geometry::{axial_separation, planar_distance, sphere_box_overlap};

/// What an obstacle contact looked like
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Obstacle centre at the time of contact
    pub point: Vec3,
    /// Index into the track's obstacle list
    pub index: usize,
}

/// Whether a sphere at `center` with `radius` touches `obstacle`
pub fn obstacle_contact(center: Vec3, radius: f32, obstacle: &Obstacle) -> bool {
    match *obstacle.kind() {
        ObstacleKind::Static | ObstacleKind::Oscillating { .. } => {
            sphere_box_overlap(center, radius, obstacle.position, obstacle.size)
        }
        ObstacleKind::Spinning {
            center: orbit,
            radius: spin_radius,
            ..
        } => {
            planar_distance(center, orbit) < spin_radius + radius
                && axial_separation(center, obstacle.position).abs() < obstacle.size.z * 0.5 + radius
        }
    }
}

/// First obstacle the sphere touches, if any
pub fn first_obstacle_contact(center: Vec3, radius: f32, obstacles: &[Obstacle]) -> Option<Contact> {
    obstacles
        .iter()
        .position(|o| obstacle_contact(center, radius, o))
        .map(|index| Contact {
            point: obstacles[index].position,
            index,
        })
}

/// Whether a power-up is close enough to collect
///
/// Inactive power-ups never register. `magnet` widens the reach from
/// `pickup_radius` to `magnet_radius`.
pub fn power_up_contact(
    center: Vec3,
    power_up: &PowerUp,
    pickup_radius: f32,
    magnet_radius: f32,
    magnet: bool,
) -> bool {
    if !power_up.is_active() {
        return false;
    }
    let reach = if magnet { magnet_radius } else { pickup_radius };
    center.distance(power_up.position) < reach
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::PowerUpKind;
    use crate::sim::patterns::PatternKind;
    use proptest::prelude::*;

    fn crate_box(at: Vec3, size: Vec3) -> Obstacle {
        Obstacle::fixed(at, size, PatternKind::Slalom)
    }

    #[test]
    fn test_box_contact_requires_all_axes() {
        let obstacle = crate_box(Vec3::new(0.0, 1.0, 10.0), Vec3::new(2.0, 2.0, 2.0));
        assert!(obstacle_contact(Vec3::new(0.0, 0.5, 10.0), 0.5, &obstacle));
        assert!(!obstacle_contact(Vec3::new(0.0, 0.5, 12.0), 0.5, &obstacle));
        // Cleared by jumping
        assert!(!obstacle_contact(Vec3::new(0.0, 2.6, 10.0), 0.5, &obstacle));
    }

    #[test]
    fn test_oscillating_uses_current_position() {
        let mut obstacle = Obstacle::oscillating(
            Vec3::new(0.0, 1.0, 10.0),
            Vec3::new(2.0, 2.0, 2.0),
            3.0,
            std::f32::consts::PI,
            PatternKind::Gate,
        );
        let player = Vec3::new(0.0, 0.5, 10.0);
        assert!(obstacle_contact(player, 0.5, &obstacle));
        // Quarter period later the box sits at x = 3
        obstacle.update(0.5);
        assert!((obstacle.position.x - 3.0).abs() < 1e-4);
        assert!(!obstacle_contact(player, 0.5, &obstacle));
    }

    #[test]
    fn test_spinner_column() {
        let center = Vec3::new(0.0, 1.0, 50.0);
        let obstacle = Obstacle::spinning(center, Vec3::splat(1.0), 2.0, 1.0, 0.0, PatternKind::Spinner);
        // Box currently at (2, 1, 50); the column reaches 2.5 from the centre line
        assert!(obstacle_contact(Vec3::new(-2.2, 1.0, 50.0), 0.5, &obstacle));
        assert!(!obstacle_contact(Vec3::new(-2.6, 1.0, 50.0), 0.5, &obstacle));
        // Outside the box's travel-axis extent
        assert!(!obstacle_contact(Vec3::new(0.0, 1.0, 51.1), 0.5, &obstacle));
    }

    #[test]
    fn test_first_contact_reports_index() {
        let obstacles = vec![
            crate_box(Vec3::new(3.0, 1.0, 10.0), Vec3::splat(2.0)),
            crate_box(Vec3::new(-3.0, 1.0, 10.0), Vec3::splat(2.0)),
        ];
        let contact = first_obstacle_contact(Vec3::new(-3.0, 0.5, 10.0), 0.5, &obstacles).unwrap();
        assert_eq!(contact.index, 1);
        assert_eq!(contact.point, obstacles[1].position);
        assert!(first_obstacle_contact(Vec3::new(0.0, 0.5, 10.0), 0.5, &obstacles).is_none());
    }

    #[test]
    fn test_power_up_reach_and_magnet() {
        let power_up = PowerUp::new(PowerUpKind::Points, Vec3::new(2.0, 1.0, 0.0), 0.5);
        let player = Vec3::new(0.0, 1.0, 0.0);
        assert!(!power_up_contact(player, &power_up, 1.0, 3.0, false));
        assert!(power_up_contact(player, &power_up, 1.0, 3.0, true));
    }

    #[test]
    fn test_collected_power_up_never_touches() {
        let mut power_up = PowerUp::new(PowerUpKind::Shield, Vec3::ZERO, 0.5);
        assert!(power_up_contact(Vec3::ZERO, &power_up, 1.0, 3.0, false));
        power_up.collect();
        assert!(!power_up_contact(Vec3::ZERO, &power_up, 1.0, 3.0, true));
    }

    proptest! {
        #[test]
        fn prop_box_contact_sound_at_boundary(
            sx in 0.5f32..8.0,
            sy in 0.5f32..8.0,
            sz in 0.5f32..8.0,
            r in 0.1f32..2.0,
            axis in 0usize..3,
            sign in prop::bool::ANY,
        ) {
            let eps = 0.01;
            let size = Vec3::new(sx, sy, sz);
            let obstacle = crate_box(Vec3::ZERO, size);
            let reach = size[axis] * 0.5 + r;
            let dir = if sign { 1.0 } else { -1.0 };

            let mut inside = Vec3::ZERO;
            inside[axis] = dir * (reach - eps);
            let mut outside = Vec3::ZERO;
            outside[axis] = dir * (reach + eps);

            prop_assert!(obstacle_contact(inside, r, &obstacle));
            prop_assert!(!obstacle_contact(outside, r, &obstacle));
        }
    }
}
