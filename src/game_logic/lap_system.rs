use bevy::prelude::*;

use crate::game_logic::collisions;
use crate::game_logic::components::{Alignment, Car, PlayerControlled, RaceProgress, VehicleTag};
use crate::game_logic::constants::{
    CHECKPOINT_HALF_LENGTH, CHECKPOINT_HALF_WIDTH, CROSS_ACTIVE_Y, CROSS_INACTIVE_Y,
    CROSS_LIFETIME, TOTAL_LAPS,
};
use crate::racetrack::RaceClock;
use crate::ui::{Dialog, RaceSummary};
use crate::RaceState;

/// A gate on the circuit. The zone test over the full gate width detects
/// race-progress crossings; physical collision with the gate itself goes
/// through the strut colliders spawned as children.
#[derive(Component)]
pub struct Checkpoint {
    pub index: usize,
    pub alignment: Alignment,
    /// Seconds since the cross indicator was shown, while it is showing.
    pub crossed: Option<f32>,
}

impl Checkpoint {
    pub fn new(index: usize, alignment: Alignment) -> Self {
        Self {
            index,
            alignment,
            crossed: None,
        }
    }

    pub fn set_crossed(&mut self) {
        self.crossed = Some(0.0);
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(elapsed) = &mut self.crossed {
            *elapsed += dt;
            if *elapsed > CROSS_LIFETIME {
                self.crossed = None;
            }
        }
    }

    pub fn showing_cross(&self) -> bool {
        self.crossed.is_some()
    }

    pub fn reset(&mut self) {
        self.crossed = None;
    }
}

/// Cross model parked under the gate; raised briefly when the gate is crossed.
#[derive(Component)]
pub struct CrossMarker;

/// Whether a ground position is inside a gate's crossing zone.
pub fn zone_contains(centre: Vec2, alignment: Alignment, position: Vec2) -> bool {
    let axis = if alignment == Alignment::ZAligned {
        collisions::point_in_box(position, centre, CHECKPOINT_HALF_WIDTH, CHECKPOINT_HALF_LENGTH)
    } else {
        collisions::point_in_box(position, centre, CHECKPOINT_HALF_LENGTH, CHECKPOINT_HALF_WIDTH)
    };
    axis.is_hit()
}

/// Outcome of a vehicle touching a checkpoint zone.
#[derive(Debug, PartialEq, Eq)]
pub enum Crossing {
    /// Not the vehicle's next required gate; nothing changes.
    Ignored,
    Stage,
    Lap(u32),
    Finished,
}

/// Advance a vehicle's progress for touching checkpoint `index`. Only the
/// gate matching `stage % checkpoint_count` counts, which enforces in-order
/// crossing and prevents double counting; gate 0 additionally advances the
/// lap and decides the finish.
pub fn cross_checkpoint(
    progress: &mut RaceProgress,
    index: usize,
    checkpoint_count: usize,
    total_laps: u32,
) -> Crossing {
    if checkpoint_count == 0 || progress.stage as usize % checkpoint_count != index {
        return Crossing::Ignored;
    }

    progress.next_stage();

    if index == 0 {
        progress.next_lap();
        if progress.lap > total_laps {
            return Crossing::Finished;
        }
        return Crossing::Lap(progress.lap);
    }

    Crossing::Stage
}

/// Per-frame crossing detection for every vehicle against its next required
/// gate, plus distance-to-next-gate bookkeeping for the ranking pass.
pub fn detect_checkpoint_crossings(
    time: Res<Time>,
    mut vehicles: Query<
        (
            &Transform,
            &mut RaceProgress,
            &VehicleTag,
            Option<&PlayerControlled>,
        ),
        With<Car>,
    >,
    mut checkpoints: Query<(Entity, &Transform, &mut Checkpoint), Without<Car>>,
    mut dialog: ResMut<Dialog>,
    mut summary: ResMut<RaceSummary>,
    clock: Res<RaceClock>,
    mut next_state: ResMut<NextState<RaceState>>,
) {
    let mut gates: Vec<(Entity, Vec2, Alignment, usize)> = checkpoints
        .iter()
        .map(|(entity, transform, checkpoint)| {
            (
                entity,
                Vec2::new(transform.translation.x, transform.translation.z),
                checkpoint.alignment,
                checkpoint.index,
            )
        })
        .collect();
    gates.sort_by_key(|(_, _, _, index)| *index);

    if gates.is_empty() {
        return;
    }

    for (transform, mut progress, tag, player_flag) in vehicles.iter_mut() {
        let position = Vec2::new(transform.translation.x, transform.translation.z);
        let next = progress.stage as usize % gates.len();
        let (gate_entity, centre, alignment, index) = gates[next];

        if zone_contains(centre, alignment, position) {
            let crossing = cross_checkpoint(&mut progress, index, gates.len(), TOTAL_LAPS);

            if crossing != Crossing::Ignored {
                if let Ok((_, _, mut checkpoint)) = checkpoints.get_mut(gate_entity) {
                    checkpoint.set_crossed();
                }
            }

            match crossing {
                Crossing::Finished => {
                    info!("{} finished the race", tag.0);
                    summary.winner = Some(tag.0.clone());
                    summary.failed = false;
                    summary.elapsed = clock.race_elapsed;
                    next_state.set(RaceState::Over);
                }
                Crossing::Lap(lap) if player_flag.is_some() => {
                    info!("lap {lap} started");
                    let text = if lap == TOTAL_LAPS {
                        "Final Lap".to_string()
                    } else {
                        format!("Lap {lap}")
                    };
                    dialog.show(text, Some(1.0));

                    // The start line doubles as the first stage of the lap
                    if lap == 1 {
                        dialog.show(format!("Stage {} complete", progress.stage), Some(1.0));
                    }
                }
                Crossing::Stage if player_flag.is_some() => {
                    dialog.show(format!("Stage {} complete", progress.stage), Some(1.0));
                }
                _ => {}
            }
        }

        // Track how far this vehicle is from the gate it now needs
        let (_, centre, _, _) = gates[progress.stage as usize % gates.len()];
        progress.distance_to_checkpoint = (position - centre).length();
    }

    for (_, _, mut checkpoint) in checkpoints.iter_mut() {
        checkpoint.tick(time.delta_secs());
    }
}

/// Raise or park each gate's cross model to match its crossed state.
pub fn update_cross_markers(
    checkpoints: Query<(&Checkpoint, &Children)>,
    mut markers: Query<&mut Transform, With<CrossMarker>>,
) {
    for (checkpoint, children) in &checkpoints {
        let target_y = if checkpoint.showing_cross() {
            CROSS_ACTIVE_Y
        } else {
            CROSS_INACTIVE_Y
        };

        let mut iter = markers.iter_many_mut(children);
        while let Some(mut transform) = iter.fetch_next() {
            transform.translation.y = target_y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_first_gate_advances_stage_and_lap() {
        let mut progress = RaceProgress::default();
        let crossing = cross_checkpoint(&mut progress, 0, 3, 2);
        assert_eq!(crossing, Crossing::Lap(1));
        assert_eq!(progress.stage, 1);
        assert_eq!(progress.lap, 1);
    }

    #[test]
    fn recrossing_first_gate_immediately_changes_nothing() {
        let mut progress = RaceProgress::default();
        cross_checkpoint(&mut progress, 0, 3, 2);

        // 1 % 3 == 1, so gate 0 is no longer the required gate
        let crossing = cross_checkpoint(&mut progress, 0, 3, 2);
        assert_eq!(crossing, Crossing::Ignored);
        assert_eq!(progress.stage, 1);
        assert_eq!(progress.lap, 1);
    }

    #[test]
    fn out_of_order_gate_is_ignored() {
        let mut progress = RaceProgress::default();
        let crossing = cross_checkpoint(&mut progress, 2, 3, 2);
        assert_eq!(crossing, Crossing::Ignored);
        assert_eq!(progress.stage, 0);
        assert_eq!(progress.lap, 0);
    }

    #[test]
    fn lap_increments_once_per_full_cycle() {
        let mut progress = RaceProgress::default();

        for gate in [0, 1, 2] {
            cross_checkpoint(&mut progress, gate, 3, 5);
        }
        assert_eq!(progress.lap, 1);
        assert_eq!(progress.stage, 3);

        for gate in [0, 1, 2] {
            cross_checkpoint(&mut progress, gate, 3, 5);
        }
        assert_eq!(progress.lap, 2);
        assert_eq!(progress.stage, 6);
    }

    #[test]
    fn stage_only_increases() {
        let mut progress = RaceProgress::default();
        let mut last_stage = 0;

        for gate in [0, 2, 1, 1, 0, 2, 0, 1, 2, 0] {
            cross_checkpoint(&mut progress, gate, 3, 10);
            assert!(progress.stage >= last_stage);
            last_stage = progress.stage;
        }
    }

    #[test]
    fn completing_final_lap_finishes_the_race() {
        let mut progress = RaceProgress::default();

        // Two full laps of a three-gate circuit
        for _ in 0..2 {
            for gate in [0, 1, 2] {
                assert_ne!(cross_checkpoint(&mut progress, gate, 3, 2), Crossing::Finished);
            }
        }

        // Crossing the start line again ends the race
        let crossing = cross_checkpoint(&mut progress, 0, 3, 2);
        assert_eq!(crossing, Crossing::Finished);
    }

    #[test]
    fn zone_respects_gate_alignment() {
        let centre = Vec2::new(0.0, -60.0);

        // A z-aligned gate is long on z and narrow on x
        assert!(zone_contains(centre, Alignment::ZAligned, Vec2::new(0.0, -55.0)));
        assert!(zone_contains(centre, Alignment::ZAligned, Vec2::new(2.0, -68.0)));
        assert!(!zone_contains(centre, Alignment::ZAligned, Vec2::new(5.0, -60.0)));

        // An x-aligned gate is the transpose
        assert!(zone_contains(centre, Alignment::XAligned, Vec2::new(5.0, -60.0)));
        assert!(!zone_contains(centre, Alignment::XAligned, Vec2::new(0.0, -55.0)));
    }

    #[test]
    fn cross_indicator_hides_after_lifetime() {
        let mut checkpoint = Checkpoint::new(0, Alignment::XAligned);
        checkpoint.set_crossed();
        assert!(checkpoint.showing_cross());

        checkpoint.tick(CROSS_LIFETIME * 0.5);
        assert!(checkpoint.showing_cross());

        checkpoint.tick(CROSS_LIFETIME);
        assert!(!checkpoint.showing_cross());
    }
}
