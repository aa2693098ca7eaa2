use std::fs;
use std::path::Path;

use thiserror::Error;

/// Failure to build a racetrack from its description file. None of these are
/// recoverable; the caller reports the error and gives up on the track.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("could not read track file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("track line {line}: expected at least 4 fields (asset x z yaw), got {found}")]
    MissingFields { line: usize, found: usize },
    #[error("track line {line}: could not parse '{value}' as a number")]
    BadNumber { line: usize, value: String },
    #[error("track description contains no player spawn")]
    NoPlayerSpawn,
}

/// One record of the declarative track description: an asset identifier, a
/// ground-plane position, a yaw, and optional extras.
#[derive(Debug, Clone)]
pub struct TrackRecord {
    pub asset: String,
    pub x: f32,
    pub z: f32,
    pub y_rotation: f32,
    pub y: Option<f32>,
    pub x_rotation: Option<f32>,
    pub z_rotation: Option<f32>,
    pub scale: Option<f32>,
}

/// What an asset identifier means to the simulation. Identifiers that the
/// table does not know fall through to `Scenery`: rendered, never collided
/// with, and free for track authors to invent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssetKind {
    PlayerSpawn,
    AiSpawn,
    Checkpoint,
    Waypoint,
    Wall,
    Tower,
    Obstacle { radius: f32, fixed: bool },
    Skybox,
    Scenery,
}

/// The classification table mapping asset identifiers to entity kinds,
/// including per-asset collision radii for the named obstacles.
pub fn classify(asset: &str) -> AssetKind {
    match asset {
        "racer" => AssetKind::PlayerSpawn,
        "rival" => AssetKind::AiSpawn,
        "checkpoint" => AssetKind::Checkpoint,
        "waypoint" => AssetKind::Waypoint,
        "wall" => AssetKind::Wall,
        "watchtower" => AssetKind::Tower,
        "fuel-tank" => AssetKind::Obstacle {
            radius: 4.0,
            fixed: true,
        },
        "barrel" => AssetKind::Obstacle {
            radius: 1.5,
            fixed: false,
        },
        "skybox" => AssetKind::Skybox,
        _ => AssetKind::Scenery,
    }
}

/// Load and parse a track description. Lines starting with `//` and blank
/// lines are skipped; every other line must carry at least the four required
/// fields. A track without a player spawn is rejected outright.
pub fn load_track_records(path: &str) -> Result<Vec<TrackRecord>, TrackError> {
    let text = fs::read_to_string(Path::new(path)).map_err(|source| TrackError::Io {
        path: path.to_string(),
        source,
    })?;
    let records = parse_track_records(&text)?;

    if !records
        .iter()
        .any(|record| classify(&record.asset) == AssetKind::PlayerSpawn)
    {
        return Err(TrackError::NoPlayerSpawn);
    }

    Ok(records)
}

pub fn parse_track_records(text: &str) -> Result<Vec<TrackRecord>, TrackError> {
    let mut records = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(TrackError::MissingFields {
                line: line_index + 1,
                found: fields.len(),
            });
        }

        let number = |field: &str| -> Result<f32, TrackError> {
            field.parse::<f32>().map_err(|_| TrackError::BadNumber {
                line: line_index + 1,
                value: field.to_string(),
            })
        };

        let mut optional = fields[4..].iter();
        let mut next_optional = || -> Result<Option<f32>, TrackError> {
            optional.next().map(|field| number(field)).transpose()
        };

        records.push(TrackRecord {
            asset: fields[0].to_string(),
            x: number(fields[1])?,
            z: number(fields[2])?,
            y_rotation: number(fields[3])?,
            y: next_optional()?,
            x_rotation: next_optional()?,
            z_rotation: next_optional()?,
            scale: next_optional()?,
        });
    }

    Ok(records)
}
