use bevy::prelude::*;

use crate::game_logic::collisions::{self, CollisionAxis};

#[derive(Component)]
pub struct Car;

#[derive(Component)]
pub struct PlayerControlled;

#[derive(Component)]
pub struct AiControlled;

#[derive(Component, Clone)]
pub struct VehicleTag(pub String);

#[derive(Component, Clone, Deref, DerefMut)]
pub struct Velocity {
    pub velocity: Vec2,
}

impl Velocity {
    pub fn new() -> Self {
        Self {
            velocity: Vec2::ZERO,
        }
    }
}

impl From<Vec2> for Velocity {
    fn from(velocity: Vec2) -> Self {
        Self { velocity }
    }
}

#[derive(Component, Clone)]
pub struct Health(pub i32);

/// Race progress counters for one vehicle. The orchestrator is the only
/// caller of `next_stage`/`next_lap`; vehicles never self-detect crossings.
#[derive(Component, Clone, Default, Debug)]
pub struct RaceProgress {
    pub stage: u32,
    pub lap: u32,
    pub race_position: u32,
    pub distance_to_checkpoint: f32,
}

impl RaceProgress {
    pub fn next_stage(&mut self) {
        self.stage += 1;
    }

    pub fn next_lap(&mut self) {
        self.lap += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// World-axis alignment of a box model, derived from its yaw at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    XAligned,
    ZAligned,
    Other,
}

impl Alignment {
    pub fn from_yaw_degrees(yaw: f32) -> Self {
        match (yaw.round() as i32).rem_euclid(180) {
            0 => Alignment::XAligned,
            90 => Alignment::ZAligned,
            _ => Alignment::Other,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ColliderShape {
    Sphere {
        radius: f32,
    },
    Box {
        half_width: f32,
        half_length: f32,
        alignment: Alignment,
    },
}

/// Collision volume for an obstacle or vehicle, with the one-frame axis
/// memory that disambiguates which face of a box was struck. The memory only
/// ever changes for box shapes; sphere hits are always `Both`.
#[derive(Component)]
pub struct Collider {
    pub shape: ColliderShape,
    pub fixed: bool,
    pub last_axis: CollisionAxis,
    pub new_axis: CollisionAxis,
}

impl Collider {
    pub fn sphere(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Sphere { radius },
            fixed: true,
            last_axis: CollisionAxis::None,
            new_axis: CollisionAxis::None,
        }
    }

    pub fn movable_sphere(radius: f32) -> Self {
        Self {
            fixed: false,
            ..Self::sphere(radius)
        }
    }

    pub fn boxed(half_width: f32, half_length: f32, alignment: Alignment) -> Self {
        Self {
            shape: ColliderShape::Box {
                half_width,
                half_length,
                alignment,
            },
            fixed: true,
            last_axis: CollisionAxis::None,
            new_axis: CollisionAxis::None,
        }
    }

    /// Test a circle at `point` against this collider positioned at
    /// `own_position`. With `save_axis` the result also updates the axis
    /// memory, which `test` itself never needs to read.
    pub fn test(
        &mut self,
        point: Vec2,
        radius: f32,
        own_position: Vec2,
        save_axis: bool,
    ) -> CollisionAxis {
        let axis = match self.shape {
            ColliderShape::Sphere { radius: own_radius } => {
                collisions::circle_circle(point, own_position, radius, own_radius)
            }
            ColliderShape::Box {
                half_width,
                half_length,
                alignment,
            } => {
                // A box rotated onto the Z axis swaps its extents on the plane
                if alignment == Alignment::ZAligned {
                    collisions::circle_box(point, radius, own_position, half_length, half_width)
                } else {
                    collisions::circle_box(point, radius, own_position, half_width, half_length)
                }
            }
        };

        if save_axis {
            self.record_axis(axis);
        }
        axis
    }

    /// On a full overlap the newly involved axis is the one that was not
    /// already recorded last frame; if nothing was recorded, both are new.
    fn record_axis(&mut self, axis: CollisionAxis) {
        self.new_axis = CollisionAxis::None;

        if axis == CollisionAxis::Both {
            self.new_axis = match self.last_axis {
                CollisionAxis::XAxis => CollisionAxis::YAxis,
                CollisionAxis::YAxis => CollisionAxis::XAxis,
                CollisionAxis::None => CollisionAxis::Both,
                CollisionAxis::Both => CollisionAxis::None,
            };
        }

        self.last_axis = axis;
    }

    pub fn reset_axis_memory(&mut self) {
        self.last_axis = CollisionAxis::None;
        self.new_axis = CollisionAxis::None;
    }
}

/// Pose captured at spawn time so the whole scene can be restored on restart.
#[derive(Component, Clone, Copy)]
pub struct InitialPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl InitialPose {
    pub fn of(transform: &Transform) -> Self {
        Self {
            translation: transform.translation,
            rotation: transform.rotation,
        }
    }

    pub fn restore(&self, transform: &mut Transform) {
        self.restore_axes(transform, true, true, true);
        transform.rotation = self.rotation;
    }

    pub fn restore_axes(&self, transform: &mut Transform, x: bool, y: bool, z: bool) {
        if x {
            transform.translation.x = self.translation.x;
        }
        if y {
            transform.translation.y = self.translation.y;
        }
        if z {
            transform.translation.z = self.translation.z;
        }
    }
}

/// Edge-trigger memory for player collision damage: sustained contact with a
/// wall must not drain health every frame.
#[derive(Component, Default)]
pub struct DamageGate {
    pub collided_last_frame: bool,
    pub cooldown: f32,
}

impl DamageGate {
    pub fn tick(&mut self, dt: f32) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
    }

    /// Reports whether a damage event fires this frame and records the
    /// contact state for the next one.
    pub fn try_damage(&mut self, collided_now: bool, buffer: f32) -> bool {
        let fires = collided_now && !self.collided_last_frame && self.cooldown <= 0.0;
        self.collided_last_frame = collided_now;
        if fires {
            self.cooldown = buffer;
        }
        fires
    }

    pub fn reset(&mut self) {
        self.collided_last_frame = false;
        self.cooldown = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_from_yaw() {
        assert_eq!(Alignment::from_yaw_degrees(0.0), Alignment::XAligned);
        assert_eq!(Alignment::from_yaw_degrees(180.0), Alignment::XAligned);
        assert_eq!(Alignment::from_yaw_degrees(-180.0), Alignment::XAligned);
        assert_eq!(Alignment::from_yaw_degrees(90.0), Alignment::ZAligned);
        assert_eq!(Alignment::from_yaw_degrees(270.0), Alignment::ZAligned);
        assert_eq!(Alignment::from_yaw_degrees(45.0), Alignment::Other);
    }

    #[test]
    fn box_axis_memory_disambiguates_face() {
        let mut collider = Collider::boxed(2.0, 8.0, Alignment::XAligned);

        // Frame 1: approaching along x, only the length range matches
        let axis = collider.test(Vec2::new(10.0, 0.0), 1.0, Vec2::ZERO, true);
        assert_eq!(axis, CollisionAxis::YAxis);
        assert_eq!(collider.new_axis, CollisionAxis::None);

        // Frame 2: full overlap; the newly crossed range is x
        let axis = collider.test(Vec2::new(2.5, 0.0), 1.0, Vec2::ZERO, true);
        assert_eq!(axis, CollisionAxis::Both);
        assert_eq!(collider.new_axis, CollisionAxis::XAxis);
    }

    #[test]
    fn box_axis_memory_with_no_history_reports_both() {
        let mut collider = Collider::boxed(2.0, 8.0, Alignment::XAligned);
        let axis = collider.test(Vec2::new(0.0, 0.0), 1.0, Vec2::ZERO, true);
        assert_eq!(axis, CollisionAxis::Both);
        assert_eq!(collider.new_axis, CollisionAxis::Both);
    }

    #[test]
    fn z_aligned_box_swaps_extents() {
        let mut collider = Collider::boxed(2.0, 8.0, Alignment::ZAligned);

        // Along x the z-aligned box now extends by half_length
        let axis = collider.test(Vec2::new(8.5, 0.0), 1.0, Vec2::ZERO, false);
        assert_eq!(axis, CollisionAxis::Both);

        // The x-aligned version does not reach that far on x
        let mut collider = Collider::boxed(2.0, 8.0, Alignment::XAligned);
        let axis = collider.test(Vec2::new(8.5, 0.0), 1.0, Vec2::ZERO, false);
        assert!(!axis.is_hit());
    }

    #[test]
    fn sphere_collider_reports_both_or_none() {
        let mut collider = Collider::sphere(3.0);
        assert_eq!(
            collider.test(Vec2::new(5.0, 0.0), 2.0, Vec2::ZERO, false),
            CollisionAxis::Both
        );
        assert_eq!(
            collider.test(Vec2::new(5.1, 0.0), 2.0, Vec2::ZERO, false),
            CollisionAxis::None
        );
    }

    #[test]
    fn damage_gate_fires_once_for_sustained_contact() {
        let mut gate = DamageGate::default();
        assert!(gate.try_damage(true, 0.0));
        assert!(!gate.try_damage(true, 0.0));
        assert!(!gate.try_damage(true, 0.0));
    }

    #[test]
    fn damage_gate_rearms_after_contact_ends() {
        let mut gate = DamageGate::default();
        assert!(gate.try_damage(true, 0.0));
        assert!(!gate.try_damage(false, 0.0));
        assert!(gate.try_damage(true, 0.0));
    }

    #[test]
    fn damage_gate_respects_cooldown() {
        let mut gate = DamageGate::default();
        assert!(gate.try_damage(true, 0.5));
        gate.try_damage(false, 0.5);
        // Still cooling down, re-contact does not fire
        assert!(!gate.try_damage(true, 0.5));
        gate.try_damage(false, 0.5);
        gate.tick(0.6);
        assert!(gate.try_damage(true, 0.5));
    }

    #[test]
    fn initial_pose_restores_selected_axes() {
        let transform = Transform::from_xyz(1.0, 2.0, 3.0);
        let pose = InitialPose::of(&transform);

        let mut moved = Transform::from_xyz(10.0, 20.0, 30.0);
        pose.restore_axes(&mut moved, true, false, true);
        assert_eq!(moved.translation, Vec3::new(1.0, 20.0, 3.0));
    }
}
