use std::fs;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SETTINGS_PATH: &str = "assets/settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk keybinding configuration. Key names are the winit key-code names
/// ("KeyW", "Space", "ArrowLeft", ...); anything missing falls back to the
/// defaults, and an absent file just means an all-default setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub control: ControlKeys,
    pub camera: CameraKeys,
    pub meta: MetaKeys,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlKeys {
    pub forward: String,
    pub backward: String,
    pub turn_left: String,
    pub turn_right: String,
    pub boost: String,
}

impl Default for ControlKeys {
    fn default() -> Self {
        Self {
            forward: "KeyW".into(),
            backward: "KeyS".into(),
            turn_left: "KeyA".into(),
            turn_right: "KeyD".into(),
            boost: "Space".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraKeys {
    pub follow: String,
    pub pov: String,
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub reset: String,
    pub toggle_rotation: String,
}

impl Default for CameraKeys {
    fn default() -> Self {
        Self {
            follow: "Digit1".into(),
            pov: "Digit2".into(),
            forward: "ArrowUp".into(),
            backward: "ArrowDown".into(),
            left: "ArrowLeft".into(),
            right: "ArrowRight".into(),
            reset: "KeyC".into(),
            toggle_rotation: "ShiftLeft".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaKeys {
    pub start: String,
    pub restart: String,
    pub pause: String,
    pub quit: String,
}

impl Default for MetaKeys {
    fn default() -> Self {
        Self {
            start: "Space".into(),
            restart: "KeyR".into(),
            pause: "KeyP".into(),
            quit: "Escape".into(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_string(),
                    source,
                })
            }
        };

        toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_string(),
            source,
        })
    }
}

/// Resolved keybinds, handed to the input-reading systems.
#[derive(Resource, Debug, Clone)]
pub struct Keybinds {
    pub control: ControlBinds,
    pub camera: CameraBinds,
    pub meta: MetaBinds,
}

#[derive(Debug, Clone)]
pub struct ControlBinds {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub turn_left: KeyCode,
    pub turn_right: KeyCode,
    pub boost: KeyCode,
}

#[derive(Debug, Clone)]
pub struct CameraBinds {
    pub follow: KeyCode,
    pub pov: KeyCode,
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub reset: KeyCode,
    pub toggle_rotation: KeyCode,
}

#[derive(Debug, Clone)]
pub struct MetaBinds {
    pub start: KeyCode,
    pub restart: KeyCode,
    pub pause: KeyCode,
    pub quit: KeyCode,
}

impl From<&Settings> for Keybinds {
    fn from(settings: &Settings) -> Self {
        let defaults = Settings::default();

        Self {
            control: ControlBinds {
                forward: resolve(&settings.control.forward, &defaults.control.forward),
                backward: resolve(&settings.control.backward, &defaults.control.backward),
                turn_left: resolve(&settings.control.turn_left, &defaults.control.turn_left),
                turn_right: resolve(&settings.control.turn_right, &defaults.control.turn_right),
                boost: resolve(&settings.control.boost, &defaults.control.boost),
            },
            camera: CameraBinds {
                follow: resolve(&settings.camera.follow, &defaults.camera.follow),
                pov: resolve(&settings.camera.pov, &defaults.camera.pov),
                forward: resolve(&settings.camera.forward, &defaults.camera.forward),
                backward: resolve(&settings.camera.backward, &defaults.camera.backward),
                left: resolve(&settings.camera.left, &defaults.camera.left),
                right: resolve(&settings.camera.right, &defaults.camera.right),
                reset: resolve(&settings.camera.reset, &defaults.camera.reset),
                toggle_rotation: resolve(
                    &settings.camera.toggle_rotation,
                    &defaults.camera.toggle_rotation,
                ),
            },
            meta: MetaBinds {
                start: resolve(&settings.meta.start, &defaults.meta.start),
                restart: resolve(&settings.meta.restart, &defaults.meta.restart),
                pause: resolve(&settings.meta.pause, &defaults.meta.pause),
                quit: resolve(&settings.meta.quit, &defaults.meta.quit),
            },
        }
    }
}

fn resolve(name: &str, fallback: &str) -> KeyCode {
    key_code(name).unwrap_or_else(|| {
        warn!("unknown key name '{name}', falling back to '{fallback}'");
        key_code(fallback).unwrap_or(KeyCode::Space)
    })
}

pub fn key_code(name: &str) -> Option<KeyCode> {
    let key = match name {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Digit1" => KeyCode::Digit1,
        "Digit2" => KeyCode::Digit2,
        "Digit3" => KeyCode::Digit3,
        "Digit4" => KeyCode::Digit4,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "Comma" => KeyCode::Comma,
        "Period" => KeyCode::Period,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = toml::from_str("[control]\nforward = \"ArrowUp\"\n").unwrap();
        assert_eq!(settings.control.forward, "ArrowUp");
        assert_eq!(settings.control.backward, "KeyS");
        assert_eq!(settings.meta.restart, "KeyR");
    }

    #[test]
    fn empty_settings_parse_to_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        let binds = Keybinds::from(&settings);
        assert_eq!(binds.control.forward, KeyCode::KeyW);
        assert_eq!(binds.meta.quit, KeyCode::Escape);
    }

    #[test]
    fn unknown_key_names_resolve_to_the_default() {
        let settings: Settings =
            toml::from_str("[control]\nboost = \"NoSuchKey\"\n").unwrap();
        let binds = Keybinds::from(&settings);
        assert_eq!(binds.control.boost, KeyCode::Space);
    }

    #[test]
    fn key_table_covers_the_names_used_by_defaults() {
        let defaults = Settings::default();
        for name in [
            defaults.control.forward.as_str(),
            defaults.control.boost.as_str(),
            defaults.camera.follow.as_str(),
            defaults.camera.toggle_rotation.as_str(),
            defaults.meta.quit.as_str(),
        ] {
            assert!(key_code(name).is_some(), "no key code for {name}");
        }
    }
}
