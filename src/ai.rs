use bevy::prelude::*;

use crate::game_logic::components::{AiControlled, Health, PlayerControlled, RaceProgress, Velocity};
use crate::game_logic::constants::*;
use crate::game_logic::physics;

/// Waypoint markers on the circuit, in pursuit order. Purely steering aids
/// for the AI; they have no collision and are distinct from checkpoints.
#[derive(Resource, Default)]
pub struct Waypoints(pub Vec<Vec2>);

/// Steering brain of one rival car: the point it is pursuing, where it is in
/// the waypoint sequence, and its collision/damage bookkeeping.
#[derive(Component)]
pub struct AiPilot {
    pub target: Option<Vec2>,
    pub next_waypoint: usize,
    pub thrust: f32,
    /// Fixed personality factor drawn once at spawn.
    pub speed_multiplier: f32,
    pub invulnerability: f32,
    pub collided: bool,
}

impl AiPilot {
    pub fn new(speed_multiplier: f32) -> Self {
        Self {
            target: None,
            next_waypoint: 0,
            thrust: AI_THRUST,
            speed_multiplier,
            invulnerability: 0.0,
            collided: false,
        }
    }

    /// Start pursuing the next waypoint in the sequence. An exhausted
    /// sequence recycles to the first marker, which is how the AI laps.
    pub fn advance(&mut self, waypoints: &[Vec2]) {
        if waypoints.is_empty() {
            self.target = None;
            return;
        }

        self.target = Some(waypoints[self.next_waypoint % waypoints.len()]);
        self.next_waypoint = (self.next_waypoint + 1) % waypoints.len();
    }

    pub fn arrived(&self, position: Vec2) -> bool {
        self.target
            .is_some_and(|target| (position - target).length() <= WAYPOINT_ARRIVAL_DISTANCE)
    }

    pub fn damage_ready(&self) -> bool {
        self.invulnerability <= 0.0
    }

    /// Collision damage. Applied whenever the AI is flagged as collided, but
    /// bounded by a short invulnerability window after each hit.
    pub fn take_hit(&mut self, health: &mut Health) {
        if !self.damage_ready() {
            return;
        }

        health.0 = (health.0 - 1).max(0);
        self.invulnerability = AI_INVULNERABILITY_TIME;

        if health.0 < AI_THRUST_NERF_HEALTH {
            self.thrust = AI_NERFED_THRUST;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.speed_multiplier);
    }
}

/// Thrust scale for a rival currently ahead of the player: the further ahead
/// (up to a window), the stronger the slowdown.
pub fn rubberband_multiplier(distance_to_player: f32, ahead: bool) -> f32 {
    if !ahead {
        return 1.0;
    }

    let distance = distance_to_player.min(MAX_RUBBER_DISTANCE);
    (1.0 + distance / RUBBER_DIVIDER).max(RUBBER_FLOOR)
}

/// Per-frame AI decision step: face the pursuit target, thrust along the
/// facing direction, and hand over to the next waypoint on arrival.
pub fn update_ai(
    time: Res<Time>,
    waypoints: Res<Waypoints>,
    player: Single<(&Transform, &RaceProgress), (With<PlayerControlled>, Without<AiControlled>)>,
    mut rivals: Query<
        (&mut Transform, &mut Velocity, &mut AiPilot, &RaceProgress),
        (With<AiControlled>, Without<PlayerControlled>),
    >,
) {
    let (player_transform, player_progress) = player.into_inner();
    let player_position = physics::ground_position(player_transform.translation);
    let frame_speed = GAME_SPEED * time.delta_secs();

    for (mut transform, mut velocity, mut pilot, progress) in rivals.iter_mut() {
        if pilot.invulnerability > 0.0 {
            pilot.invulnerability = (pilot.invulnerability - time.delta_secs()).max(0.0);
        }

        let Some(target) = pilot.target else {
            continue;
        };

        // Face the target, keeping the hull level
        let level_y = transform.translation.y;
        transform.look_at(Vec3::new(target.x, level_y, target.y), Vec3::Y);

        let position = physics::ground_position(transform.translation);
        let ahead = player_progress.race_position != 0
            && progress.race_position < player_progress.race_position;
        let rubber = rubberband_multiplier((position - player_position).length(), ahead);

        let facing = physics::facing_2d(&transform);
        **velocity += facing * (pilot.thrust * pilot.speed_multiplier * rubber * frame_speed);

        if pilot.arrived(position) {
            pilot.advance(&waypoints.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_uses_the_threshold_distance() {
        let mut pilot = AiPilot::new(1.0);
        pilot.target = Some(Vec2::new(10.0, 0.0));

        assert!(pilot.arrived(Vec2::new(7.0, 0.0)));
        assert!(pilot.arrived(Vec2::new(6.0, 0.0)));
        assert!(!pilot.arrived(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn advancing_walks_the_sequence_and_recycles() {
        let waypoints = vec![Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(3.0, 0.0)];
        let mut pilot = AiPilot::new(1.0);

        pilot.advance(&waypoints);
        assert_eq!(pilot.target, Some(waypoints[0]));
        pilot.advance(&waypoints);
        assert_eq!(pilot.target, Some(waypoints[1]));
        pilot.advance(&waypoints);
        assert_eq!(pilot.target, Some(waypoints[2]));

        // Sequence exhausted: back to the first marker
        pilot.advance(&waypoints);
        assert_eq!(pilot.target, Some(waypoints[0]));
    }

    #[test]
    fn advancing_with_no_waypoints_clears_the_target() {
        let mut pilot = AiPilot::new(1.0);
        pilot.target = Some(Vec2::ZERO);
        pilot.advance(&[]);
        assert_eq!(pilot.target, None);
    }

    #[test]
    fn hits_are_blocked_during_the_invulnerability_window() {
        let mut pilot = AiPilot::new(1.0);
        let mut health = Health(AI_HEALTH);

        pilot.take_hit(&mut health);
        assert_eq!(health.0, AI_HEALTH - 1);
        assert!(!pilot.damage_ready());

        pilot.take_hit(&mut health);
        assert_eq!(health.0, AI_HEALTH - 1);

        pilot.invulnerability = 0.0;
        pilot.take_hit(&mut health);
        assert_eq!(health.0, AI_HEALTH - 2);
    }

    #[test]
    fn low_health_nerfs_the_thrust() {
        let mut pilot = AiPilot::new(1.0);
        let mut health = Health(AI_THRUST_NERF_HEALTH);

        pilot.take_hit(&mut health);
        assert_eq!(pilot.thrust, AI_NERFED_THRUST);
    }

    #[test]
    fn health_never_goes_below_zero() {
        let mut pilot = AiPilot::new(1.0);
        let mut health = Health(0);
        pilot.take_hit(&mut health);
        assert_eq!(health.0, 0);
    }

    #[test]
    fn rubberbanding_only_slows_rivals_that_are_ahead() {
        assert_eq!(rubberband_multiplier(50.0, false), 1.0);
        assert_eq!(rubberband_multiplier(15.0, true), 0.5);
        assert_eq!(rubberband_multiplier(30.0, true), RUBBER_FLOOR);
        // Distance is capped before scaling
        assert_eq!(rubberband_multiplier(500.0, true), RUBBER_FLOOR);
    }
}
