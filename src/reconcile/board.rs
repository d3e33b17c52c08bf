// Transform synchronizer: toolbar marker -> board yaw
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::config::OverlayConfig;
use crate::state::ArState;
use crate::tracking::{MarkerTracking, TrackedMarker};
use crate::types::*;

/// Lays the textured plane flat against the ground marker array
fn base_orientation() -> Quat {
    Quat::from_rotation_x(FRAC_PI_2)
}

/// Yaw for this frame. The previous value is kept unless rotation mode sees the toolbar.
pub fn board_rotation(
    current: Quat,
    rotation_mode: bool,
    toolbar: &TrackedMarker,
    config: &OverlayConfig,
) -> Quat {
    if rotation_mode && toolbar.found {
        Quat::from_rotation_y(config.yaw_radians_for(toolbar.world.w_axis.x))
    } else {
        current
    }
}

/// Scale first, then yaw, then the base orientation
pub fn board_pose(scale: f32, rotation: Quat) -> Mat4 {
    Mat4::from_quat(base_orientation())
        * Mat4::from_quat(rotation)
        * Mat4::from_scale(Vec3::splat(scale))
}

/// System: runs every frame, whether or not any marker is visible
pub fn synchronize_board(
    tracking: Res<MarkerTracking>,
    config: Res<OverlayConfig>,
    mut state: ResMut<ArState>,
    mut board_query: Query<(&AnchorBoard, &mut PhysicsPose), Without<CategoryInstance>>,
    mut instance_query: Query<(&CategoryInstance, &mut PhysicsPose), Without<AnchorBoard>>,
) {
    let rotation = board_rotation(
        state.board_rotation,
        state.modes.rotation,
        tracking.get(MarkerId::Toolbar),
        &config,
    );
    if rotation != state.board_rotation {
        state.board_rotation = rotation;
    }

    for (board, mut pose) in board_query.iter_mut() {
        pose.set_if_neq(PhysicsPose(board_pose(board.scale, rotation)));
    }

    // Only the first block of each category follows the board
    let follow = PhysicsPose(Mat4::from_quat(rotation));
    for (instance, mut pose) in instance_query.iter_mut() {
        if instance.slot == Slot::FIRST {
            pose.set_if_neq(follow);
        }
    }
}
