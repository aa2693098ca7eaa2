use bevy::prelude::*;

use crate::car::{BoostGauge, BoostState};
use crate::game_logic::components::{Health, PlayerControlled, RaceProgress, Velocity};
use crate::game_logic::constants::{SPEED_DISPLAY_SCALE, TOTAL_LAPS};
use crate::RaceState;

/// The main on-screen dialog: a line of text, an optional subtext, and an
/// optional auto-hide delay (None keeps the text up indefinitely).
#[derive(Resource, Default)]
pub struct Dialog {
    text: String,
    subtext: String,
    show_for: Option<f32>,
    elapsed: f32,
    dirty: bool,
}

impl Dialog {
    pub fn show(&mut self, text: impl Into<String>, show_for: Option<f32>) {
        self.show_with_subtext(text, "", show_for);
    }

    pub fn show_with_subtext(
        &mut self,
        text: impl Into<String>,
        subtext: impl Into<String>,
        show_for: Option<f32>,
    ) {
        self.text = text.into();
        self.subtext = subtext.into();
        self.show_for = show_for;
        self.elapsed = 0.0;
        self.dirty = true;
    }
}

/// How the last race ended, for the end-of-race banner.
#[derive(Resource, Default)]
pub struct RaceSummary {
    pub winner: Option<String>,
    pub failed: bool,
    pub elapsed: f32,
}

impl RaceSummary {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Component)]
pub enum DialogLine {
    Main,
    Sub,
}

#[derive(Component)]
pub enum HudField {
    Speed,
    Health,
    Lap,
    Place,
}

#[derive(Component)]
pub enum IndicatorKind {
    Boost,
    Warning,
    Overheat,
}

/// Race-position panel, revealed once the race is under way.
#[derive(Component)]
pub struct PlacePanel;

#[derive(Component)]
pub struct PauseText;

/// The ordinal form of a race position ("1st", "2nd", ...).
pub fn race_place_ordinal(place: u32) -> String {
    let suffix = match (place % 10, place % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{place}{suffix}")
}

pub fn setup_hud(mut commands: Commands) {
    // Centre dialog
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(60.0),
            width: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(6.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 44.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                DialogLine::Main,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                DialogLine::Sub,
            ));
        });

    // Stats readouts, bottom left
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(20.0),
                bottom: Val::Px(20.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        ))
        .with_children(|parent| {
            for field in [HudField::Speed, HudField::Health, HudField::Lap] {
                parent.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 24.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    field,
                ));
            }
        });

    // Race position, right side, hidden until the race starts
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(30.0),
                bottom: Val::Px(30.0),
                padding: UiRect::all(Val::Px(14.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
            Visibility::Hidden,
            PlacePanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.85, 0.2)),
                HudField::Place,
            ));
        });

    // Boost indicators, top right
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            right: Val::Px(20.0),
            top: Val::Px(20.0),
            flex_direction: FlexDirection::Row,
            column_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|parent| {
            let indicators = [
                (IndicatorKind::Boost, "BOOST", Color::srgb(0.2, 0.9, 0.3)),
                (IndicatorKind::Warning, "WARN", Color::srgb(0.95, 0.8, 0.1)),
                (IndicatorKind::Overheat, "OVERHEAT", Color::srgb(0.95, 0.2, 0.1)),
            ];
            for (kind, label, color) in indicators {
                parent.spawn((
                    Text::new(label),
                    TextFont {
                        font_size: 26.0,
                        ..default()
                    },
                    TextColor(color),
                    Visibility::Hidden,
                    kind,
                ));
            }
        });

    // Pause banner
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(60.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        Visibility::Hidden,
        PauseText,
    ))
    .with_children(|parent| {
        parent.spawn((
            Text::new("PAUSED"),
            TextFont {
                font_size: 40.0,
                ..default()
            },
            TextColor(Color::BLACK),
        ));
    });
}

/// Push dialog changes to its text nodes and run the auto-hide timer.
pub fn update_dialog(
    time: Res<Time>,
    mut dialog: ResMut<Dialog>,
    mut lines: Query<(&mut Text, &DialogLine)>,
) {
    if dialog.dirty {
        for (mut text, line) in lines.iter_mut() {
            text.0 = match line {
                DialogLine::Main => dialog.text.clone(),
                DialogLine::Sub => dialog.subtext.clone(),
            };
        }
        dialog.dirty = false;
    }

    if let Some(show_for) = dialog.show_for {
        dialog.elapsed += time.delta_secs();

        if dialog.elapsed > show_for {
            dialog.show_for = None;
            for (mut text, _) in lines.iter_mut() {
                text.0.clear();
            }
        }
    }
}

/// Boost indicator selection, speed readout, health, lap, race position.
pub fn update_hud(
    player: Single<(&Velocity, &Health, &RaceProgress, &BoostGauge), With<PlayerControlled>>,
    mut fields: Query<(&mut Text, &HudField)>,
    mut indicators: Query<(&mut Visibility, &IndicatorKind)>,
) {
    let (velocity, health, progress, boost) = player.into_inner();

    for (mut text, field) in fields.iter_mut() {
        text.0 = match field {
            HudField::Speed => {
                format!("Speed {:>4}", (velocity.length() * SPEED_DISPLAY_SCALE) as i32)
            }
            HudField::Health => format!("Health {}", health.0),
            HudField::Lap => format!("Lap {}/{}", progress.lap.max(1), TOTAL_LAPS),
            HudField::Place => race_place_ordinal(progress.race_position.max(1)),
        };
    }

    for (mut visibility, kind) in indicators.iter_mut() {
        let lit = matches!(
            (kind, boost.state()),
            (IndicatorKind::Boost, BoostState::Active)
                | (IndicatorKind::Warning, BoostState::Warning)
                | (IndicatorKind::Overheat, BoostState::Penalty)
        );
        *visibility = if lit {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// Initial / post-reset prompt.
pub fn reset_dialog(
    mut dialog: ResMut<Dialog>,
    mut place_panel: Query<&mut Visibility, With<PlacePanel>>,
) {
    dialog.show("Hit Space to Start", None);

    for mut visibility in place_panel.iter_mut() {
        *visibility = Visibility::Hidden;
    }
}

pub fn show_race_panels(mut place_panel: Query<&mut Visibility, With<PlacePanel>>) {
    for mut visibility in place_panel.iter_mut() {
        *visibility = Visibility::Inherited;
    }
}

/// End-of-race banner: winner and time on a normal finish, a eulogy on a
/// failure finish.
pub fn show_race_summary(summary: Res<RaceSummary>, mut dialog: ResMut<Dialog>) {
    if summary.failed {
        dialog.show_with_subtext("Your car is done for :(", "Press R to Restart :)", None);
    } else {
        let winner = summary.winner.clone().unwrap_or_else(|| "nobody".to_string());
        dialog.show_with_subtext(
            format!("Race finished - {} wins in {:.1}s", winner, summary.elapsed),
            "Press R to Restart, Esc to Exit",
            None,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_cover_the_special_cases() {
        assert_eq!(race_place_ordinal(1), "1st");
        assert_eq!(race_place_ordinal(2), "2nd");
        assert_eq!(race_place_ordinal(3), "3rd");
        assert_eq!(race_place_ordinal(4), "4th");
        assert_eq!(race_place_ordinal(11), "11th");
        assert_eq!(race_place_ordinal(12), "12th");
        assert_eq!(race_place_ordinal(13), "13th");
        assert_eq!(race_place_ordinal(21), "21st");
        assert_eq!(race_place_ordinal(102), "102nd");
    }
}
