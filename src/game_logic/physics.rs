use bevy::prelude::*;

use crate::game_logic::collisions::CollisionAxis;
use crate::game_logic::constants::MIN_SPEED;

/// Ground-plane projection of a world position.
pub fn ground_position(translation: Vec3) -> Vec2 {
    Vec2::new(translation.x, translation.z)
}

/// Ground-plane projection of the node's facing direction. Not normalized:
/// a pitched or leaning model faces slightly "into" the ground plane and
/// its projection shrinks accordingly.
pub fn facing_2d(transform: &Transform) -> Vec2 {
    let forward = transform.forward();
    Vec2::new(forward.x, forward.z)
}

/// Move a node by its movement vector, then apply drag. The vector snaps to
/// zero below a small speed threshold so vehicles do not creep forever.
pub fn integrate(translation: &mut Vec3, velocity: &mut Vec2, drag: f32, dt: f32) {
    translation.x += velocity.x * dt;
    translation.z += velocity.y * dt;

    *velocity *= drag;
    if velocity.length() < MIN_SPEED {
        *velocity = Vec2::ZERO;
    }
}

/// Reverse (and amplify) the movement vector along the struck axis.
pub fn bounce(velocity: &mut Vec2, axis: CollisionAxis, factor: f32) {
    match axis {
        CollisionAxis::XAxis => velocity.x = -velocity.x * factor,
        CollisionAxis::YAxis => velocity.y = -velocity.y * factor,
        CollisionAxis::Both => *velocity = -*velocity * factor,
        CollisionAxis::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrate_moves_on_the_ground_plane() {
        let mut translation = Vec3::new(0.0, 3.0, 0.0);
        let mut velocity = Vec2::new(10.0, -20.0);
        integrate(&mut translation, &mut velocity, 1.0, 0.5);

        assert_eq!(translation, Vec3::new(5.0, 3.0, -10.0));
    }

    #[test]
    fn integrate_with_zero_vector_is_idempotent() {
        let mut translation = Vec3::new(7.0, 3.0, -2.0);
        let mut velocity = Vec2::ZERO;

        for _ in 0..10 {
            integrate(&mut translation, &mut velocity, 0.96, 0.016);
        }

        assert_eq!(translation, Vec3::new(7.0, 3.0, -2.0));
        assert_eq!(velocity, Vec2::ZERO);
    }

    #[test]
    fn integrate_applies_drag() {
        let mut translation = Vec3::ZERO;
        let mut velocity = Vec2::new(100.0, 0.0);
        integrate(&mut translation, &mut velocity, 0.9, 0.0);
        assert_eq!(velocity.x, 90.0);
    }

    #[test]
    fn slow_vector_snaps_to_zero() {
        let mut translation = Vec3::ZERO;
        let mut velocity = Vec2::new(MIN_SPEED * 0.9, 0.0);
        integrate(&mut translation, &mut velocity, 1.0, 0.016);
        assert_eq!(velocity, Vec2::ZERO);
    }

    #[test]
    fn bounce_reverses_single_axis() {
        let mut velocity = Vec2::new(4.0, 2.0);
        bounce(&mut velocity, CollisionAxis::XAxis, 1.5);
        assert_eq!(velocity, Vec2::new(-6.0, 2.0));

        let mut velocity = Vec2::new(4.0, 2.0);
        bounce(&mut velocity, CollisionAxis::YAxis, 1.5);
        assert_eq!(velocity, Vec2::new(4.0, -3.0));
    }

    #[test]
    fn bounce_reverses_both_axes() {
        let mut velocity = Vec2::new(4.0, 2.0);
        bounce(&mut velocity, CollisionAxis::Both, 1.0);
        assert_eq!(velocity, Vec2::new(-4.0, -2.0));
    }

    #[test]
    fn facing_projects_forward_onto_ground() {
        // Default orientation faces -Z
        let transform = Transform::default();
        let facing = facing_2d(&transform);
        assert!((facing - Vec2::new(0.0, -1.0)).length() < 1e-5);

        // Yawed a quarter turn, it faces -X
        let transform = Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let facing = facing_2d(&transform);
        assert!((facing - Vec2::new(-1.0, 0.0)).length() < 1e-5);
    }
}
