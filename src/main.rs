mod ai;
mod camera;
mod car;
mod game_logic;
mod particles;
mod racetrack;
mod settings;
mod ui;

use bevy::prelude::*;
use bevy::window::PresentMode;
use rand::SeedableRng;
use rand_pcg::Pcg32;

pub const WIN_W: f32 = 1280.0;
pub const WIN_H: f32 = 720.0;

// Fixed seed so rival personalities are reproducible run to run
pub const RACE_SEED: u64 = 0x0067_5EED;

/// One race's lifecycle. Gameplay simulation only runs while `Racing`.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RaceState {
    #[default]
    NotStarted,
    Starting,
    Racing,
    Over,
}

#[derive(Resource, Default)]
pub struct Paused(pub bool);

pub fn not_paused(paused: Res<Paused>) -> bool {
    !paused.0
}

/// Seeded random source for everything the simulation draws at spawn time.
#[derive(Resource)]
pub struct RaceRng(pub Pcg32);

fn main() {
    let loaded_settings = match settings::Settings::load(settings::SETTINGS_PATH) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Hover Rally".into(),
                    resolution: (WIN_W, WIN_H).into(),
                    present_mode: PresentMode::AutoVsync,
                    resizable: false,
                    ..default()
                }),
                ..default()
            }),
        )
        .insert_resource(settings::Keybinds::from(&loaded_settings))
        .insert_resource(RaceRng(Pcg32::seed_from_u64(RACE_SEED)))
        .insert_resource(ClearColor(Color::srgb(0.7, 0.8, 0.95)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 300.0,
            ..default()
        })
        .init_resource::<Paused>()
        .init_resource::<ui::Dialog>()
        .init_resource::<ui::RaceSummary>()
        .init_resource::<racetrack::RaceClock>()
        .init_resource::<ai::Waypoints>()
        .init_state::<RaceState>()
        .add_systems(
            Startup,
            (
                particles::setup_particle_assets,
                racetrack::setup_track,
                racetrack::assign_ai_targets,
                ui::setup_hud,
            )
                .chain(),
        )
        .add_systems(Update, (toggle_pause, quit_game))
        .add_systems(
            Update,
            racetrack::wait_for_start
                .run_if(in_state(RaceState::NotStarted))
                .run_if(not_paused),
        )
        .add_systems(
            Update,
            racetrack::run_countdown
                .run_if(in_state(RaceState::Starting))
                .run_if(not_paused),
        )
        // The one true frame order: cosmetics, input, AI, race progress,
        // ranking, collisions, responses, integration, HUD
        .add_systems(
            Update,
            (
                particles::update_particles,
                particles::spawn_exhaust,
                car::control_player,
                ai::update_ai,
                game_logic::lap_system::detect_checkpoint_crossings,
                game_logic::ranking::assign_race_positions,
                racetrack::collision_pass,
                racetrack::player_collision_response,
                racetrack::integrate_player,
                racetrack::ai_collision_response,
                racetrack::integrate_movable_obstacles,
                racetrack::update_race_clock,
                ui::update_hud,
            )
                .chain()
                .run_if(in_state(RaceState::Racing))
                .run_if(not_paused),
        )
        .add_systems(
            Update,
            racetrack::wait_for_restart.run_if(in_state(RaceState::Over)),
        )
        .add_systems(
            Update,
            (
                camera::switch_cameras,
                camera::control_camera,
                game_logic::lap_system::update_cross_markers,
                ui::update_dialog,
            ),
        )
        .add_systems(OnEnter(RaceState::NotStarted), ui::reset_dialog)
        .add_systems(OnEnter(RaceState::Racing), ui::show_race_panels)
        .add_systems(OnEnter(RaceState::Over), ui::show_race_summary)
        .run();
}

fn toggle_pause(
    input: Res<ButtonInput<KeyCode>>,
    binds: Res<settings::Keybinds>,
    mut paused: ResMut<Paused>,
    mut banner: Query<&mut Visibility, With<ui::PauseText>>,
) {
    if input.just_pressed(binds.meta.pause) {
        paused.0 = !paused.0;

        for mut visibility in banner.iter_mut() {
            *visibility = if paused.0 {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
    }
}

fn quit_game(
    input: Res<ButtonInput<KeyCode>>,
    binds: Res<settings::Keybinds>,
    mut exit: EventWriter<AppExit>,
) {
    if input.just_pressed(binds.meta.quit) {
        exit.write(AppExit::Success);
    }
}
