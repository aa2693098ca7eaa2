use bevy::prelude::*;

use crate::game_logic::components::{Health, PlayerControlled, Velocity};
use crate::game_logic::constants::*;
use crate::game_logic::physics;
use crate::settings::Keybinds;

/// Boost usage state, also driving the HUD indicator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoostState {
    #[default]
    Inactive,
    Active,
    Warning,
    Penalty,
}

/// Boost bookkeeping: holding boost accumulates time, overusing it locks the
/// boost out for a penalty period during which extra drag applies.
#[derive(Component, Default)]
pub struct BoostGauge {
    timer: f32,
    penalty_timer: f32,
    state: BoostState,
}

impl BoostGauge {
    /// Advance the gauge one frame and return the thrust multiplier to use.
    pub fn tick(&mut self, dt: f32, held: bool, health: i32) -> f32 {
        if self.penalty_timer > 0.0 {
            self.penalty_timer -= dt;
            if self.penalty_timer < dt {
                self.penalty_timer = 0.0;
            }
            self.state = BoostState::Penalty;
            return 1.0;
        }

        if held && health > BOOST_MINIMUM_HEALTH {
            self.timer += dt;

            if self.timer >= BOOST_MAX_ACTIVE {
                self.penalty_timer = BOOST_PENALTY_TIME;
                self.timer = 0.0;
                self.state = BoostState::Penalty;
                1.0
            } else {
                // The last second before lockout shows as a warning, but the
                // boost itself still applies
                self.state = if self.timer + BOOST_WARNING_TIME >= BOOST_MAX_ACTIVE {
                    BoostState::Warning
                } else {
                    BoostState::Active
                };
                BOOST_MULTIPLIER
            }
        } else {
            self.state = BoostState::Inactive;
            self.timer = (self.timer - dt).max(0.0);
            1.0
        }
    }

    /// Extra drag while the boost is overheated.
    pub fn drag_multiplier(&self) -> f32 {
        if self.penalty_timer > 0.0 {
            DRAG
        } else {
            1.0
        }
    }

    pub fn state(&self) -> BoostState {
        self.state
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Stationary,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeanState {
    #[default]
    NotTurning,
    Turning,
}

/// Cosmetic vertical motion: sine-wave hover bob while moving, rear lift
/// while accelerating, lean into turns. None of it touches the ground-plane
/// physics.
#[derive(Component, Default)]
pub struct HoverCosmetics {
    pub motion: MotionState,
    pub lean_state: LeanState,
    pub time_moving: f32,
    pub rear_lift: f32,
    pub lean: f32,
}

impl HoverCosmetics {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Turn rate, permanently nerfed once the hull is badly damaged.
#[derive(Component)]
pub struct Steering {
    pub rotation_speed: f32,
}

impl Default for Steering {
    fn default() -> Self {
        Self {
            rotation_speed: TURNING_RATE,
        }
    }
}

pub fn reduce_player_health(health: &mut Health, steering: &mut Steering, amount: i32) {
    health.0 -= amount;

    if health.0 < STEER_NERF_HEALTH {
        steering.rotation_speed = NERFED_TURNING_RATE;
    }
}

/// Per-frame player input: thrust and turning feed the movement vector and
/// yaw, everything else here is the hover-car's body language.
pub fn control_player(
    time: Res<Time>,
    input: Res<ButtonInput<KeyCode>>,
    binds: Res<Keybinds>,
    player: Single<
        (
            &mut Transform,
            &mut Velocity,
            &mut BoostGauge,
            &mut HoverCosmetics,
            &Steering,
            &Health,
        ),
        With<PlayerControlled>,
    >,
) {
    let (mut transform, mut velocity, mut boost, mut cosmetics, steering, health) =
        player.into_inner();
    let dt = time.delta_secs();
    let frame_speed = GAME_SPEED * dt;
    let mut turn_direction = 0.0;

    cosmetics.motion = MotionState::Stationary;
    cosmetics.lean_state = LeanState::NotTurning;

    let boost_multiplier = boost.tick(dt, input.pressed(binds.control.boost), health.0);

    // Thrust forwards / backwards
    if input.pressed(binds.control.forward) {
        let facing = physics::facing_2d(&transform);
        **velocity += facing * (frame_speed * THRUST * boost_multiplier);
        cosmetics.motion = MotionState::Moving;

        // Nose up while accelerating, capped
        let lift = REAR_LIFT_SPEED * frame_speed;
        if cosmetics.rear_lift + lift < MAX_REAR_LIFT {
            cosmetics.rear_lift += lift;
            transform.rotate_local_x(lift);
        }
    } else if input.pressed(binds.control.backward) {
        let facing = physics::facing_2d(&transform);
        **velocity +=
            facing * (frame_speed * THRUST * BACKWARD_THRUST_MULTIPLIER * boost_multiplier);
        cosmetics.motion = MotionState::Moving;
    }

    // Turning rotates the node directly
    if input.pressed(binds.control.turn_left) {
        transform.rotate_y(steering.rotation_speed * frame_speed);
        cosmetics.lean_state = LeanState::Turning;
        turn_direction = 1.0;
    } else if input.pressed(binds.control.turn_right) {
        transform.rotate_y(-steering.rotation_speed * frame_speed);
        cosmetics.lean_state = LeanState::Turning;
        turn_direction = -1.0;
    }

    // Hover bob and rear lift recovery
    match cosmetics.motion {
        MotionState::Stationary => {
            if transform.translation.y != MODEL_Y_OFFSET {
                let direction = if transform.translation.y > MODEL_Y_OFFSET {
                    -1.0
                } else {
                    1.0
                };
                transform.translation.y += direction * frame_speed * RESET_Y_SPEED;
                cosmetics.time_moving = 0.0;
            }

            if cosmetics.rear_lift > 0.0 {
                let step = (RESET_REAR_LIFT_SPEED * frame_speed).min(cosmetics.rear_lift);
                cosmetics.rear_lift -= step;
                transform.rotate_local_x(-step);
            }
        }
        MotionState::Moving => {
            cosmetics.time_moving += dt;
            transform.translation.y =
                (cosmetics.time_moving * BOB_FREQUENCY).sin() + MODEL_Y_OFFSET;
        }
    }

    // Lean into the bend, or ease back upright
    match cosmetics.lean_state {
        LeanState::NotTurning => {
            if cosmetics.lean != 0.0 {
                let step = (RESET_LEAN_SPEED * frame_speed).min(cosmetics.lean.abs());
                let step = -cosmetics.lean.signum() * step;
                cosmetics.lean += step;
                transform.rotate_local_z(step);
            }
        }
        LeanState::Turning => {
            if cosmetics.motion == MotionState::Moving {
                let step = turn_direction * LEANING_SPEED * frame_speed;
                if (cosmetics.lean + step).abs() < MAX_LEAN {
                    cosmetics.lean += step;
                    transform.rotate_local_z(step);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;

    #[test]
    fn boost_multiplies_thrust_while_held() {
        let mut gauge = BoostGauge::default();
        let multiplier = gauge.tick(DT, true, PLAYER_HEALTH);
        assert_eq!(multiplier, BOOST_MULTIPLIER);
        assert_eq!(gauge.state(), BoostState::Active);
    }

    #[test]
    fn boost_warns_during_the_final_second() {
        let mut gauge = BoostGauge::default();
        let mut held_for = 0.0;
        while held_for + DT < BOOST_MAX_ACTIVE - 0.5 {
            gauge.tick(DT, true, PLAYER_HEALTH);
            held_for += DT;
        }
        let multiplier = gauge.tick(DT, true, PLAYER_HEALTH);
        assert_eq!(gauge.state(), BoostState::Warning);
        // Warning is a pre-alert, the boost still applies
        assert_eq!(multiplier, BOOST_MULTIPLIER);
    }

    #[test]
    fn overuse_forces_a_penalty_and_locks_the_boost_out() {
        let mut gauge = BoostGauge::default();
        for _ in 0..40 {
            gauge.tick(DT, true, PLAYER_HEALTH);
        }
        assert_eq!(gauge.state(), BoostState::Penalty);
        assert_eq!(gauge.tick(DT, true, PLAYER_HEALTH), 1.0);
        assert_eq!(gauge.drag_multiplier(), DRAG);
    }

    #[test]
    fn penalty_expires_after_its_duration() {
        let mut gauge = BoostGauge::default();
        for _ in 0..40 {
            gauge.tick(DT, true, PLAYER_HEALTH);
        }
        assert_eq!(gauge.state(), BoostState::Penalty);

        let mut waited = 0.0;
        while waited <= BOOST_PENALTY_TIME {
            gauge.tick(DT, false, PLAYER_HEALTH);
            waited += DT;
        }
        assert_eq!(gauge.drag_multiplier(), 1.0);
        assert_eq!(gauge.tick(DT, true, PLAYER_HEALTH), BOOST_MULTIPLIER);
    }

    #[test]
    fn released_boost_decays_back_to_zero() {
        let mut gauge = BoostGauge::default();
        for _ in 0..10 {
            gauge.tick(DT, true, PLAYER_HEALTH);
        }
        for _ in 0..11 {
            gauge.tick(DT, false, PLAYER_HEALTH);
        }
        assert_eq!(gauge.timer, 0.0);
        assert_eq!(gauge.state(), BoostState::Inactive);
    }

    #[test]
    fn low_health_blocks_the_boost() {
        let mut gauge = BoostGauge::default();
        let multiplier = gauge.tick(DT, true, BOOST_MINIMUM_HEALTH);
        assert_eq!(multiplier, 1.0);
        assert_eq!(gauge.state(), BoostState::Inactive);
    }

    #[test]
    fn heavy_damage_nerfs_the_turn_rate() {
        let mut health = Health(STEER_NERF_HEALTH + 1);
        let mut steering = Steering::default();

        reduce_player_health(&mut health, &mut steering, 1);
        assert_eq!(steering.rotation_speed, TURNING_RATE);

        reduce_player_health(&mut health, &mut steering, 1);
        assert_eq!(steering.rotation_speed, NERFED_TURNING_RATE);
    }
}
