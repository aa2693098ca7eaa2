use bevy::prelude::*;
use rand::Rng;

use crate::car::{HoverCosmetics, MotionState};
use crate::game_logic::components::PlayerControlled;
use crate::RaceRng;

const EXHAUST_INTERVAL: f32 = 0.05;
const EXHAUST_LIFETIME: f32 = 0.6;
const EXHAUST_SPEED: f32 = 6.0;

/// A short-lived engine exhaust puff. Purely cosmetic.
#[derive(Component)]
pub struct ExhaustParticle {
    pub velocity: Vec3,
    pub age: f32,
}

#[derive(Resource)]
pub struct ParticleAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

#[derive(Resource)]
pub struct ExhaustTimer(pub Timer);

pub fn setup_particle_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(ParticleAssets {
        mesh: meshes.add(Cuboid::new(0.4, 0.4, 0.4)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.95, 0.8, 0.4),
            emissive: LinearRgba::new(2.0, 1.2, 0.3, 1.0),
            unlit: true,
            ..default()
        }),
    });
    commands.insert_resource(ExhaustTimer(Timer::from_seconds(
        EXHAUST_INTERVAL,
        TimerMode::Repeating,
    )));
}

/// Age, drift, shrink, and eventually drop every live particle.
pub fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut particles: Query<(Entity, &mut Transform, &mut ExhaustParticle)>,
) {
    for (entity, mut transform, mut particle) in particles.iter_mut() {
        particle.age += time.delta_secs();

        if particle.age >= EXHAUST_LIFETIME {
            commands.entity(entity).despawn();
            continue;
        }

        let velocity = particle.velocity;
        transform.translation += velocity * time.delta_secs();
        transform.scale = Vec3::splat(1.0 - particle.age / EXHAUST_LIFETIME);
    }
}

/// Puff exhaust out behind the player while it is under way.
pub fn spawn_exhaust(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: ResMut<ExhaustTimer>,
    assets: Res<ParticleAssets>,
    mut rng: ResMut<RaceRng>,
    player: Single<(&Transform, &HoverCosmetics), With<PlayerControlled>>,
) {
    timer.0.tick(time.delta());
    if !timer.0.just_finished() {
        return;
    }

    let (transform, cosmetics) = player.into_inner();
    if cosmetics.motion != MotionState::Moving {
        return;
    }

    let back = transform.back() * 2.8;
    let jitter = Vec3::new(
        rng.0.random_range(-0.5..0.5),
        rng.0.random_range(-0.2..0.2),
        rng.0.random_range(-0.5..0.5),
    );

    commands.spawn((
        Mesh3d(assets.mesh.clone()),
        MeshMaterial3d(assets.material.clone()),
        Transform::from_translation(transform.translation + back + jitter),
        ExhaustParticle {
            velocity: back.normalize_or_zero() * EXHAUST_SPEED + Vec3::Y * 1.2,
            age: 0.0,
        },
    ));
}
