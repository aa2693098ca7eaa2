use bevy::prelude::*;
use rand::Rng;

use crate::ai::{AiPilot, Waypoints};
use crate::car::{BoostGauge, HoverCosmetics, Steering};
use crate::game_logic::collisions::CollisionAxis;
use crate::game_logic::components::{
    AiControlled, Alignment, Car, Collider, ColliderShape, DamageGate, Health, InitialPose,
    PlayerControlled, RaceProgress, VehicleTag, Velocity,
};
use crate::game_logic::constants::*;
use crate::game_logic::lap_system::{Checkpoint, CrossMarker};
use crate::game_logic::physics;
use crate::game_logic::track::{self, AssetKind};
use crate::settings::Keybinds;
use crate::ui::{Dialog, RaceSummary};
use crate::{RaceRng, RaceState};

pub const TRACK_PATH: &str = "assets/track01.txt";

/// Race timers: the start countdown and the running race time shown in the
/// end-of-race summary.
#[derive(Resource, Default)]
pub struct RaceClock {
    pub race_elapsed: f32,
    pub countdown_timer: f32,
    pub countdown_seconds: i32,
}

impl RaceClock {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The axis the player struck something along this frame, if any. Only one
/// collision counts per frame so the movement vector cannot be cancelled
/// twice.
#[derive(Component, Default)]
pub struct PlayerCollision {
    pub axis: Option<CollisionAxis>,
}

/// Build the whole scene from the declarative track description.
pub fn setup_track(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut rng: ResMut<RaceRng>,
    mut exit: EventWriter<AppExit>,
) {
    let records = match track::load_track_records(TRACK_PATH) {
        Ok(records) => records,
        Err(err) => {
            error!("could not build racetrack: {err}");
            exit.write(AppExit::error());
            return;
        }
    };

    // Ground and light
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(600.0, 600.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.82, 0.70, 0.45),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));

    // One mesh/material per asset kind, shared by every instance of it
    let body_mesh = meshes.add(Cuboid::new(2.5, 1.2, 5.0));
    let canopy_mesh = meshes.add(Cuboid::new(1.6, 0.7, 2.0));
    let wall_mesh = meshes.add(Cuboid::new(WALL_HALF_WIDTH * 2.0, 6.0, WALL_HALF_LENGTH * 2.0));
    let tower_mesh = meshes.add(Cuboid::new(
        TOWER_HALF_SIDE * 2.0,
        30.0,
        TOWER_HALF_SIDE * 2.0,
    ));
    let strut_mesh = meshes.add(Cylinder::new(STRUT_RADIUS, 8.0));
    let crossbar_mesh = meshes.add(Cuboid::new(CHECKPOINT_HALF_LENGTH * 2.0, 0.6, 0.6));
    let cross_mesh = meshes.add(Cuboid::new(3.0, 3.0, 0.4));
    let scenery_mesh = meshes.add(Cuboid::new(2.0, 4.0, 2.0));

    let player_material = materials.add(Color::srgb(0.15, 0.35, 0.85));
    let rival_material = materials.add(Color::srgb(0.85, 0.25, 0.15));
    let canopy_material = materials.add(Color::srgb(0.1, 0.1, 0.12));
    let wall_material = materials.add(Color::srgb(0.55, 0.5, 0.4));
    let gate_material = materials.add(Color::srgb(0.9, 0.85, 0.2));
    let cross_material = materials.add(Color::srgb(0.2, 0.9, 0.3));
    let obstacle_material = materials.add(Color::srgb(0.4, 0.45, 0.5));
    let scenery_material = materials.add(Color::srgb(0.2, 0.55, 0.25));

    let mut waypoints = Vec::new();
    let mut checkpoint_index = 0;
    let mut rival_count = 0;
    let mut player_spawned = false;

    for record in &records {
        let yaw = Quat::from_rotation_y(record.y_rotation.to_radians());
        let alignment = Alignment::from_yaw_degrees(record.y_rotation);
        let ground = Vec2::new(record.x, record.z);

        match track::classify(&record.asset) {
            AssetKind::PlayerSpawn => {
                if player_spawned {
                    warn!("extra player spawn at {ground} ignored");
                    continue;
                }
                player_spawned = true;

                let transform = Transform::from_xyz(record.x, MODEL_Y_OFFSET, record.z)
                    .with_rotation(yaw);
                info!("player spawn at {ground}");

                commands
                    .spawn((
                        Mesh3d(body_mesh.clone()),
                        MeshMaterial3d(player_material.clone()),
                        transform,
                        InitialPose::of(&transform),
                        Car,
                        PlayerControlled,
                        VehicleTag("player".to_string()),
                        Velocity::new(),
                        Health(PLAYER_HEALTH),
                        RaceProgress::default(),
                        BoostGauge::default(),
                        HoverCosmetics::default(),
                        Steering::default(),
                        DamageGate::default(),
                        PlayerCollision::default(),
                    ))
                    .with_children(|parent| {
                        parent.spawn((
                            Mesh3d(canopy_mesh.clone()),
                            MeshMaterial3d(canopy_material.clone()),
                            Transform::from_xyz(0.0, 0.9, 0.3),
                        ));

                        let follow = Transform::from_xyz(0.0, 8.0, 22.0)
                            .looking_at(Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
                        parent.spawn((
                            Camera3d::default(),
                            crate::camera::ChaseCamera::follow(),
                            follow,
                            InitialPose::of(&follow),
                        ));

                        let pov = Transform::from_xyz(0.0, 2.2, -0.8);
                        parent.spawn((
                            Camera3d::default(),
                            Camera {
                                is_active: false,
                                ..default()
                            },
                            crate::camera::ChaseCamera::pov(),
                            pov,
                            InitialPose::of(&pov),
                        ));
                    });
            }
            AssetKind::AiSpawn => {
                rival_count += 1;
                let transform = Transform::from_xyz(record.x, MODEL_Y_OFFSET, record.z)
                    .with_rotation(yaw);
                let personality = rng.0.random_range(AI_SPEED_MIN..=AI_SPEED_MAX);
                info!("rival {rival_count} spawn at {ground} (speed x{personality:.2})");

                commands
                    .spawn((
                        Mesh3d(body_mesh.clone()),
                        MeshMaterial3d(rival_material.clone()),
                        transform,
                        InitialPose::of(&transform),
                        Car,
                        AiControlled,
                        VehicleTag(format!("rival-{rival_count}")),
                        Velocity::new(),
                        Health(AI_HEALTH),
                        RaceProgress::default(),
                        AiPilot::new(personality),
                    ))
                    .with_children(|parent| {
                        parent.spawn((
                            Mesh3d(canopy_mesh.clone()),
                            MeshMaterial3d(canopy_material.clone()),
                            Transform::from_xyz(0.0, 0.9, 0.3),
                        ));
                    });
            }
            AssetKind::Checkpoint => {
                let transform = Transform::from_xyz(record.x, 0.0, record.z).with_rotation(yaw);
                commands
                    .spawn((
                        transform,
                        Visibility::default(),
                        InitialPose::of(&transform),
                        Checkpoint::new(checkpoint_index, alignment),
                    ))
                    .with_children(|parent| {
                        parent.spawn((
                            Mesh3d(crossbar_mesh.clone()),
                            MeshMaterial3d(gate_material.clone()),
                            Transform::from_xyz(0.0, 8.0, 0.0),
                        ));
                        parent.spawn((
                            Mesh3d(cross_mesh.clone()),
                            MeshMaterial3d(cross_material.clone()),
                            Transform::from_xyz(0.0, CROSS_INACTIVE_Y, 0.0),
                            CrossMarker,
                        ));
                    });

                // The gate's physical presence is its two struts; the zone
                // between them is crossing detection only
                let strut_offset = if alignment == Alignment::ZAligned {
                    Vec2::new(0.0, CHECKPOINT_HALF_LENGTH)
                } else {
                    Vec2::new(CHECKPOINT_HALF_LENGTH, 0.0)
                };
                for strut in [ground - strut_offset, ground + strut_offset] {
                    let transform = Transform::from_xyz(strut.x, 4.0, strut.y);
                    commands.spawn((
                        Mesh3d(strut_mesh.clone()),
                        MeshMaterial3d(gate_material.clone()),
                        transform,
                        InitialPose::of(&transform),
                        Collider::sphere(STRUT_RADIUS),
                    ));
                }

                checkpoint_index += 1;
            }
            AssetKind::Waypoint => {
                waypoints.push(ground);
            }
            AssetKind::Wall => {
                let transform = Transform::from_xyz(record.x, 3.0, record.z).with_rotation(yaw);
                commands.spawn((
                    Mesh3d(wall_mesh.clone()),
                    MeshMaterial3d(wall_material.clone()),
                    transform,
                    InitialPose::of(&transform),
                    Collider::boxed(WALL_HALF_WIDTH, WALL_HALF_LENGTH, alignment),
                ));
            }
            AssetKind::Tower => {
                let transform = Transform::from_xyz(record.x, 15.0, record.z).with_rotation(yaw);
                commands.spawn((
                    Mesh3d(tower_mesh.clone()),
                    MeshMaterial3d(wall_material.clone()),
                    transform,
                    InitialPose::of(&transform),
                    Collider::boxed(TOWER_HALF_SIDE, TOWER_HALF_SIDE, alignment),
                ));
            }
            AssetKind::Obstacle { radius, fixed } => {
                let transform = Transform::from_xyz(record.x, radius, record.z).with_rotation(yaw);
                let mut obstacle = commands.spawn((
                    Mesh3d(meshes.add(Sphere::new(radius))),
                    MeshMaterial3d(obstacle_material.clone()),
                    transform,
                    InitialPose::of(&transform),
                ));
                if fixed {
                    obstacle.insert(Collider::sphere(radius));
                } else {
                    // Pushable: a struck barrel inherits the vehicle's vector
                    obstacle.insert((Collider::movable_sphere(radius), Velocity::new()));
                }
            }
            AssetKind::Skybox => {
                commands.spawn((
                    Mesh3d(meshes.add(Sphere::new(1500.0))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: Color::srgb(0.5, 0.7, 0.95),
                        unlit: true,
                        cull_mode: None,
                        ..default()
                    })),
                    Transform::from_xyz(record.x, record.y.unwrap_or(SKYBOX_Y), record.z),
                ));
            }
            AssetKind::Scenery => {
                let scale = record.scale.unwrap_or(1.0);
                commands.spawn((
                    Mesh3d(scenery_mesh.clone()),
                    MeshMaterial3d(scenery_material.clone()),
                    Transform::from_xyz(record.x, record.y.unwrap_or(2.0 * scale), record.z)
                        .with_rotation(yaw)
                        .with_scale(Vec3::splat(scale)),
                ));
            }
        }
    }

    info!(
        "racetrack ready: {} checkpoints, {} waypoints, {} rivals",
        checkpoint_index,
        waypoints.len(),
        rival_count
    );
    commands.insert_resource(Waypoints(waypoints));
}

/// Point every idle rival at the first waypoint. Runs once after setup, and
/// the same call is reused when the race is reset.
pub fn assign_ai_targets(waypoints: Res<Waypoints>, mut rivals: Query<&mut AiPilot>) {
    for mut pilot in rivals.iter_mut() {
        if pilot.target.is_none() {
            pilot.advance(&waypoints.0);
        }
    }
}

pub fn wait_for_start(
    input: Res<ButtonInput<KeyCode>>,
    binds: Res<Keybinds>,
    mut next_state: ResMut<NextState<RaceState>>,
) {
    if input.just_pressed(binds.meta.start) {
        next_state.set(RaceState::Starting);
    }
}

/// Count whole seconds down on the dialog, then flag off the race.
pub fn run_countdown(
    time: Res<Time>,
    mut clock: ResMut<RaceClock>,
    mut dialog: ResMut<Dialog>,
    mut next_state: ResMut<NextState<RaceState>>,
) {
    if clock.countdown_timer > 1.0 {
        clock.countdown_seconds += 1;
        clock.countdown_timer = 0.0;
    }

    if clock.countdown_seconds < COUNTDOWN_SECONDS {
        if clock.countdown_timer == 0.0 {
            dialog.show(
                (COUNTDOWN_SECONDS - clock.countdown_seconds).to_string(),
                Some(1.0),
            );
        }
    } else {
        dialog.show("Go!", None);
        next_state.set(RaceState::Racing);
        clock.countdown_seconds = 0;
        // Time is added below, so start one frame in the negative
        clock.countdown_timer = -time.delta_secs();
    }

    clock.countdown_timer += time.delta_secs();
}

pub fn update_race_clock(time: Res<Time>, mut clock: ResMut<RaceClock>) {
    clock.race_elapsed += time.delta_secs();
}

/// Test every collidable obstacle against the player (updating the axis
/// memory used for box-face disambiguation) and against every rival (plain
/// single-frame tests). Obstacles that are not fixed receive the striking
/// vehicle's movement vector.
pub fn collision_pass(
    mut obstacles: Query<(&Transform, &mut Collider, Option<&mut Velocity>), Without<Car>>,
    player: Single<(&Transform, &Velocity, &mut PlayerCollision), (With<Car>, With<PlayerControlled>)>,
    mut rivals: Query<(&Transform, &Velocity, &mut AiPilot), (With<Car>, With<AiControlled>)>,
) {
    let (player_transform, player_velocity, mut player_collision) = player.into_inner();
    let player_position = physics::ground_position(player_transform.translation);

    for (obstacle_transform, mut collider, mut obstacle_velocity) in obstacles.iter_mut() {
        let centre = physics::ground_position(obstacle_transform.translation);

        // Only the first player collision counts each frame
        if player_collision.axis.is_none() {
            let axis = collider.test(player_position, PLAYER_COLLISION_RADIUS, centre, true);
            if axis.is_hit() {
                let bounce_axis = match collider.shape {
                    ColliderShape::Box { .. } if collider.new_axis != CollisionAxis::None => {
                        collider.new_axis
                    }
                    _ => CollisionAxis::Both,
                };
                player_collision.axis = Some(bounce_axis);

                if !collider.fixed {
                    if let Some(velocity) = obstacle_velocity.as_deref_mut() {
                        **velocity = **player_velocity;
                    }
                }
            }
        }

        for (rival_transform, rival_velocity, mut pilot) in rivals.iter_mut() {
            let position = physics::ground_position(rival_transform.translation);
            if collider
                .test(position, AI_COLLISION_RADIUS, centre, false)
                .is_hit()
            {
                pilot.collided = true;

                if !collider.fixed {
                    if let Some(velocity) = obstacle_velocity.as_deref_mut() {
                        **velocity = **rival_velocity;
                    }
                }
            }
        }
    }
}

/// Player collision effects: edge-triggered damage (sustained scraping along
/// a wall drains health once, not every frame) and a bounce along the axis
/// the collision pass worked out.
pub fn player_collision_response(
    time: Res<Time>,
    player: Single<
        (
            &mut Velocity,
            &mut Health,
            &mut Steering,
            &mut DamageGate,
            &mut PlayerCollision,
        ),
        With<PlayerControlled>,
    >,
    mut summary: ResMut<RaceSummary>,
    mut next_state: ResMut<NextState<RaceState>>,
) {
    let (mut velocity, mut health, mut steering, mut gate, mut collision) = player.into_inner();

    gate.tick(time.delta_secs());

    let collided_now = collision.axis.is_some();
    let speed = velocity.length();

    if gate.try_damage(collided_now, DAMAGE_BUFFER) && speed > MIN_DAMAGE_SPEED {
        crate::car::reduce_player_health(&mut health, &mut steering, 1);
        info!("player hit a thing, health {}", health.0);

        if health.0 <= 0 {
            health.0 = 0;
            summary.winner = None;
            summary.failed = true;
            next_state.set(RaceState::Over);
        }
    }

    if let Some(axis) = collision.axis.take() {
        physics::bounce(&mut velocity, axis, PLAYER_BOUNCE);
    }
}

pub fn integrate_player(
    time: Res<Time>,
    player: Single<(&mut Transform, &mut Velocity, &BoostGauge), With<PlayerControlled>>,
) {
    let (mut transform, mut velocity, boost) = player.into_inner();
    physics::integrate(
        &mut transform.translation,
        &mut velocity,
        DRAG * boost.drag_multiplier(),
        time.delta_secs(),
    );
}

/// Rival collision effects: bounce, take the (invulnerability-bounded) hit,
/// integrate, then face the current waypoint again to steer free. The
/// collision flag clears every frame no matter what.
pub fn ai_collision_response(
    time: Res<Time>,
    mut rivals: Query<
        (&mut Transform, &mut Velocity, &mut AiPilot, &mut Health),
        With<AiControlled>,
    >,
) {
    for (mut transform, mut velocity, mut pilot, mut health) in rivals.iter_mut() {
        if pilot.collided {
            physics::bounce(&mut velocity, CollisionAxis::Both, AI_BOUNCE);
            pilot.take_hit(&mut health);
        }

        physics::integrate(
            &mut transform.translation,
            &mut velocity,
            AI_DRAG,
            time.delta_secs(),
        );

        if pilot.collided {
            if let Some(target) = pilot.target {
                let level_y = transform.translation.y;
                transform.look_at(Vec3::new(target.x, level_y, target.y), Vec3::Y);
            }
        }

        pilot.collided = false;
    }
}

pub fn integrate_movable_obstacles(
    time: Res<Time>,
    mut obstacles: Query<(&mut Transform, &mut Velocity, &Collider), Without<Car>>,
) {
    for (mut transform, mut velocity, collider) in obstacles.iter_mut() {
        if collider.fixed {
            continue;
        }
        physics::integrate(
            &mut transform.translation,
            &mut velocity,
            MOVABLE_OBSTACLE_DRAG,
            time.delta_secs(),
        );
    }
}

/// Put the whole scene back to its initial pose and state, ready for the
/// next race.
pub fn wait_for_restart(
    input: Res<ButtonInput<KeyCode>>,
    binds: Res<Keybinds>,
    waypoints: Res<Waypoints>,
    mut clock: ResMut<RaceClock>,
    mut summary: ResMut<RaceSummary>,
    mut next_state: ResMut<NextState<RaceState>>,
    mut vehicles: Query<
        (
            &mut Transform,
            &InitialPose,
            &mut Velocity,
            &mut Health,
            &mut RaceProgress,
            Option<&mut AiPilot>,
            Option<&mut BoostGauge>,
            Option<&mut HoverCosmetics>,
            Option<&mut Steering>,
            Option<&mut DamageGate>,
            Option<&mut PlayerCollision>,
        ),
        With<Car>,
    >,
    mut checkpoints: Query<&mut Checkpoint, Without<Car>>,
    mut obstacles: Query<
        (
            &mut Transform,
            Option<&InitialPose>,
            Option<&mut Velocity>,
            &mut Collider,
        ),
        Without<Car>,
    >,
) {
    if !input.just_pressed(binds.meta.restart) {
        return;
    }

    info!("race reset");

    for (
        mut transform,
        pose,
        mut velocity,
        mut health,
        mut progress,
        pilot,
        boost,
        cosmetics,
        steering,
        gate,
        collision,
    ) in vehicles.iter_mut()
    {
        pose.restore(&mut transform);
        **velocity = Vec2::ZERO;
        progress.reset();

        if let Some(mut pilot) = pilot {
            health.0 = AI_HEALTH;
            pilot.reset();
            pilot.advance(&waypoints.0);
        } else {
            health.0 = PLAYER_HEALTH;
        }
        if let Some(mut boost) = boost {
            boost.reset();
        }
        if let Some(mut cosmetics) = cosmetics {
            cosmetics.reset();
        }
        if let Some(mut steering) = steering {
            steering.rotation_speed = TURNING_RATE;
        }
        if let Some(mut gate) = gate {
            gate.reset();
        }
        if let Some(mut collision) = collision {
            collision.axis = None;
        }
    }

    for mut checkpoint in checkpoints.iter_mut() {
        checkpoint.reset();
    }

    for (mut transform, pose, velocity, mut collider) in obstacles.iter_mut() {
        if let Some(pose) = pose {
            pose.restore(&mut transform);
        }
        if let Some(mut velocity) = velocity {
            **velocity = Vec2::ZERO;
        }
        collider.reset_axis_memory();
    }

    clock.reset();
    summary.reset();
    next_state.set(RaceState::NotStarted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    use crate::game_logic::lap_system::detect_checkpoint_crossings;

    fn race_world() -> World {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world.insert_resource(RaceClock::default());
        world.insert_resource(Dialog::default());
        world.insert_resource(RaceSummary::default());
        world.insert_resource(NextState::<RaceState>::default());
        world
    }

    fn spawn_player(
        world: &mut World,
        transform: Transform,
        velocity: Vec2,
        health: i32,
        axis: Option<CollisionAxis>,
    ) -> Entity {
        world
            .spawn((
                Car,
                PlayerControlled,
                VehicleTag("player".to_string()),
                transform,
                Velocity::from(velocity),
                Health(health),
                RaceProgress::default(),
                Steering::default(),
                DamageGate::default(),
                PlayerCollision { axis },
            ))
            .id()
    }

    #[test]
    fn sustained_contact_damages_the_player_once() {
        let mut world = race_world();
        let player = spawn_player(
            &mut world,
            Transform::default(),
            Vec2::new(MIN_DAMAGE_SPEED + 5.0, 0.0),
            10,
            Some(CollisionAxis::Both),
        );

        // Collided on three consecutive frames
        for _ in 0..3 {
            world.run_system_once(player_collision_response).unwrap();
            world
                .entity_mut(player)
                .get_mut::<PlayerCollision>()
                .unwrap()
                .axis = Some(CollisionAxis::Both);
        }

        assert_eq!(world.entity(player).get::<Health>().unwrap().0, 9);
    }

    #[test]
    fn slow_contact_bounces_without_damage() {
        let mut world = race_world();
        let player = spawn_player(
            &mut world,
            Transform::default(),
            Vec2::new(MIN_DAMAGE_SPEED * 0.5, 0.0),
            10,
            Some(CollisionAxis::Both),
        );

        world.run_system_once(player_collision_response).unwrap();

        assert_eq!(world.entity(player).get::<Health>().unwrap().0, 10);
        let velocity = world.entity(player).get::<Velocity>().unwrap();
        assert!(velocity.x < 0.0);
    }

    #[test]
    fn fatal_hit_ends_the_race_as_a_failure() {
        let mut world = race_world();
        let player = spawn_player(
            &mut world,
            Transform::default(),
            Vec2::new(MIN_DAMAGE_SPEED + 5.0, 0.0),
            1,
            Some(CollisionAxis::Both),
        );

        world.run_system_once(player_collision_response).unwrap();

        assert_eq!(world.entity(player).get::<Health>().unwrap().0, 0);
        assert!(world.resource::<RaceSummary>().failed);
        assert!(matches!(
            *world.resource::<NextState<RaceState>>(),
            NextState::Pending(RaceState::Over)
        ));
    }

    #[test]
    fn crossing_the_start_gate_advances_stage_and_lap() {
        let mut world = race_world();
        let player = spawn_player(
            &mut world,
            Transform::from_xyz(0.0, MODEL_Y_OFFSET, -60.0),
            Vec2::ZERO,
            PLAYER_HEALTH,
            None,
        );

        let gates = [
            (0.0, -60.0, Alignment::ZAligned),
            (60.0, 0.0, Alignment::XAligned),
            (0.0, 60.0, Alignment::ZAligned),
        ];
        let mut gate_entities = Vec::new();
        for (index, (x, z, alignment)) in gates.into_iter().enumerate() {
            gate_entities.push(
                world
                    .spawn((
                        Transform::from_xyz(x, 0.0, z),
                        Checkpoint::new(index, alignment),
                    ))
                    .id(),
            );
        }

        world.run_system_once(detect_checkpoint_crossings).unwrap();

        let progress = world.entity(player).get::<RaceProgress>().unwrap();
        assert_eq!(progress.stage, 1);
        assert_eq!(progress.lap, 1);
        assert!(world
            .entity(gate_entities[0])
            .get::<Checkpoint>()
            .unwrap()
            .showing_cross());

        // Still sitting on the start gate: no double counting
        world.run_system_once(detect_checkpoint_crossings).unwrap();
        let progress = world.entity(player).get::<RaceProgress>().unwrap();
        assert_eq!(progress.stage, 1);
        assert_eq!(progress.lap, 1);

        // Distance bookkeeping now tracks gate 1
        let expected = (Vec2::new(0.0, -60.0) - Vec2::new(60.0, 0.0)).length();
        assert!((progress.distance_to_checkpoint - expected).abs() < 1e-3);
    }
}
