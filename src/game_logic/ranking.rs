use std::cmp::Ordering;

use bevy::prelude::*;

use crate::game_logic::components::{Car, RaceProgress};

/// Race ordering: laps first, stages second, and between vehicles chasing the
/// same checkpoint the one closer to it leads. `total_cmp` on the distance
/// keeps this a strict total order even for equal floats.
pub fn progress_order(a: &RaceProgress, b: &RaceProgress) -> Ordering {
    b.lap
        .cmp(&a.lap)
        .then(b.stage.cmp(&a.stage))
        .then(a.distance_to_checkpoint.total_cmp(&b.distance_to_checkpoint))
}

/// Sort every vehicle by race progress and hand out 1-based positions.
pub fn assign_race_positions(mut vehicles: Query<(Entity, &mut RaceProgress), With<Car>>) {
    let mut standings: Vec<(Entity, RaceProgress)> = vehicles
        .iter()
        .map(|(entity, progress)| (entity, progress.clone()))
        .collect();

    standings.sort_by(|(_, a), (_, b)| progress_order(a, b));

    for (place, (entity, _)) in standings.iter().enumerate() {
        if let Ok((_, mut progress)) = vehicles.get_mut(*entity) {
            progress.race_position = place as u32 + 1;
        }
    }
}
