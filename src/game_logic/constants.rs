// Global pacing, multiplies every frame-time step
pub const GAME_SPEED: f32 = 1.0;

// Player movement
pub const THRUST: f32 = 100.0;
pub const BACKWARD_THRUST_MULTIPLIER: f32 = -0.5;
pub const TURNING_RATE: f32 = 3.5; // radians per second
pub const NERFED_TURNING_RATE: f32 = 1.2;
pub const DRAG: f32 = 0.96; // velocity multiplier applied once per frame
pub const PLAYER_BOUNCE: f32 = 1.0;
pub const MIN_SPEED: f32 = 0.05; // below this the movement vector snaps to zero
pub const PLAYER_COLLISION_RADIUS: f32 = 3.0;
pub const SPEED_DISPLAY_SCALE: f32 = 2.5;

// Boost
pub const BOOST_MULTIPLIER: f32 = 1.5;
pub const BOOST_MAX_ACTIVE: f32 = 3.0;
pub const BOOST_PENALTY_TIME: f32 = 5.0;
pub const BOOST_WARNING_TIME: f32 = 1.0;
pub const BOOST_MINIMUM_HEALTH: i32 = 30;

// Hover cosmetics
pub const MODEL_Y_OFFSET: f32 = 3.0;
pub const RESET_Y_SPEED: f32 = 4.0;
pub const BOB_FREQUENCY: f32 = 5.0;
pub const LEANING_SPEED: f32 = 0.7; // radians per second
pub const RESET_LEAN_SPEED: f32 = 0.5;
pub const MAX_LEAN: f32 = 0.35;
pub const REAR_LIFT_SPEED: f32 = 0.09;
pub const RESET_REAR_LIFT_SPEED: f32 = 0.09;
pub const MAX_REAR_LIFT: f32 = 0.17;

// Player health
pub const PLAYER_HEALTH: i32 = 100;
pub const STEER_NERF_HEALTH: i32 = 40;
pub const MIN_DAMAGE_SPEED: f32 = 15.0;
pub const DAMAGE_BUFFER: f32 = 0.5; // minimum seconds between damage events

// AI
pub const AI_THRUST: f32 = 140.0;
pub const AI_NERFED_THRUST: f32 = 90.0;
pub const AI_THRUST_NERF_HEALTH: i32 = 10;
pub const AI_HEALTH: i32 = 20;
pub const AI_DRAG: f32 = 0.87;
pub const AI_BOUNCE: f32 = 1.1;
pub const AI_COLLISION_RADIUS: f32 = 3.0;
pub const WAYPOINT_ARRIVAL_DISTANCE: f32 = 4.0;
pub const AI_INVULNERABILITY_TIME: f32 = 5.0;
pub const AI_SPEED_MIN: f32 = 0.85;
pub const AI_SPEED_MAX: f32 = 1.15;
pub const MAX_RUBBER_DISTANCE: f32 = 100.0;
pub const RUBBER_DIVIDER: f32 = -30.0;
pub const RUBBER_FLOOR: f32 = 0.25;

// Checkpoints
pub const CHECKPOINT_HALF_LENGTH: f32 = 10.0;
pub const CHECKPOINT_HALF_WIDTH: f32 = 3.0;
pub const STRUT_RADIUS: f32 = 1.0;
pub const CROSS_LIFETIME: f32 = 1.0;
pub const CROSS_ACTIVE_Y: f32 = 4.0;
pub const CROSS_INACTIVE_Y: f32 = -8.0;

// Scenery
pub const WALL_HALF_WIDTH: f32 = 2.0;
pub const WALL_HALF_LENGTH: f32 = 8.5;
pub const TOWER_HALF_SIDE: f32 = 8.0;
pub const MOVABLE_OBSTACLE_DRAG: f32 = 0.9;
pub const SKYBOX_Y: f32 = -960.0;

// Race sequencing
pub const COUNTDOWN_SECONDS: i32 = 3;
pub const TOTAL_LAPS: u32 = 2;
