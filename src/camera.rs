use bevy::prelude::*;

use crate::game_logic::components::InitialPose;
use crate::game_logic::constants::GAME_SPEED;
use crate::settings::Keybinds;

// Free-look movement and rotation speeds
pub const CAM_SPEED: f32 = 40.0;
pub const CAM_ROTATION_SPEED: f32 = 0.8;
pub const CAM_X_ROTATION_LIMIT: f32 = 0.35;
pub const CAM_Y_ROTATION_LIMIT: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraKind {
    Follow,
    Pov,
}

/// A camera riding along with the player car. Only one is active at a time;
/// the follow camera additionally supports free-look offsets.
#[derive(Component)]
pub struct ChaseCamera {
    pub kind: CameraKind,
    pub controllable: bool,
    pub rotation_enabled: bool,
    pub rotation_x: f32,
    pub rotation_y: f32,
}

impl ChaseCamera {
    pub fn follow() -> Self {
        Self {
            kind: CameraKind::Follow,
            controllable: true,
            rotation_enabled: false,
            rotation_x: 0.0,
            rotation_y: 0.0,
        }
    }

    pub fn pov() -> Self {
        Self {
            kind: CameraKind::Pov,
            controllable: false,
            rotation_enabled: false,
            rotation_x: 0.0,
            rotation_y: 0.0,
        }
    }
}

/// Switch to whichever camera's key was hit this frame, deactivating the
/// rest. If both keys land on the same frame the follow camera wins.
pub fn switch_cameras(
    input: Res<ButtonInput<KeyCode>>,
    binds: Res<Keybinds>,
    mut cameras: Query<(&ChaseCamera, &mut Camera)>,
) {
    let follow_hit = input.just_pressed(binds.camera.follow);
    let pov_hit = input.just_pressed(binds.camera.pov);
    if !follow_hit && !pov_hit {
        return;
    }

    for (chase, mut camera) in cameras.iter_mut() {
        camera.is_active = match chase.kind {
            CameraKind::Follow => follow_hit,
            CameraKind::Pov => pov_hit && !follow_hit,
        };
    }
}

/// Free-look on the active controllable camera: arrows move it around the
/// car (or rotate it, within limits, while rotation mode is toggled on), and
/// the reset key snaps it back to where it was mounted.
pub fn control_camera(
    time: Res<Time>,
    input: Res<ButtonInput<KeyCode>>,
    binds: Res<Keybinds>,
    mut cameras: Query<(&mut ChaseCamera, &mut Transform, &InitialPose, &Camera)>,
) {
    let frame_speed = GAME_SPEED * time.delta_secs();

    for (mut chase, mut transform, pose, camera) in cameras.iter_mut() {
        if !camera.is_active || !chase.controllable {
            continue;
        }

        if input.just_pressed(binds.camera.toggle_rotation) {
            chase.rotation_enabled = !chase.rotation_enabled;
        }

        if chase.rotation_enabled {
            let step = CAM_ROTATION_SPEED * frame_speed;

            if input.pressed(binds.camera.forward) && chase.rotation_x < CAM_X_ROTATION_LIMIT {
                chase.rotation_x += step;
                transform.rotate_local_x(step);
            }
            if input.pressed(binds.camera.backward) && chase.rotation_x > -CAM_X_ROTATION_LIMIT {
                chase.rotation_x -= step;
                transform.rotate_local_x(-step);
            }
            if input.pressed(binds.camera.left) && chase.rotation_y < CAM_Y_ROTATION_LIMIT {
                chase.rotation_y += step;
                transform.rotate_local_y(step);
            }
            if input.pressed(binds.camera.right) && chase.rotation_y > -CAM_Y_ROTATION_LIMIT {
                chase.rotation_y -= step;
                transform.rotate_local_y(-step);
            }
        } else {
            let step = CAM_SPEED * frame_speed;

            if input.pressed(binds.camera.forward) {
                let forward = transform.forward();
                transform.translation += forward * step;
            }
            if input.pressed(binds.camera.backward) {
                let back = transform.back();
                transform.translation += back * step;
            }
            if input.pressed(binds.camera.left) {
                let left = transform.left();
                transform.translation += left * step;
            }
            if input.pressed(binds.camera.right) {
                let right = transform.right();
                transform.translation += right * step;
            }
        }

        if input.just_pressed(binds.camera.reset) {
            pose.restore(&mut transform);
            chase.rotation_x = 0.0;
            chase.rotation_y = 0.0;
            chase.rotation_enabled = false;
        }
    }
}
