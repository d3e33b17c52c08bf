// Camera region controller for the overview camera
use bevy::prelude::*;

use crate::config::OverlayConfig;
use crate::state::ArState;
use crate::types::*;

/// What the controller decided for this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionStep {
    /// Local offset for the region anchor, when a region preset is active
    pub anchor_offset: Option<Vec3>,
    /// Overview camera eye, looking at the anchor origin
    pub eye: Vec3,
    pub first_entry: bool,
}

/// Advance the region state machine by one frame.
///
/// The first frame a region is active since the last reset re-homes the
/// free-roam offsets; later frames leave manual pan/zoom alone.
pub fn step_camera_region(state: &mut ArState, config: &OverlayConfig) -> RegionStep {
    let preset = if state.modes.flying {
        config.region_offset(state.region)
    } else {
        None
    };

    let Some(offset) = preset else {
        return RegionStep {
            anchor_offset: None,
            eye: state.free_roam.offset,
            first_entry: false,
        };
    };

    let first_entry = state.visits.enter(state.region);
    if first_entry {
        state.home_free_roam();
    }

    let [bias_y, bias_z] = config.region_eye_bias;
    RegionStep {
        anchor_offset: Some(offset),
        eye: state.free_roam.offset + Vec3::new(0.0, bias_y, bias_z),
        first_entry,
    }
}

pub fn overview_camera_transform(eye: Vec3) -> Transform {
    Transform::from_translation(eye).looking_at(Vec3::ZERO, Vec3::Y)
}

/// System: drives the region anchor and the overview camera pose
pub fn camera_region_controller(
    mut state: ResMut<ArState>,
    config: Res<OverlayConfig>,
    mut anchor_query: Query<&mut Transform, (With<RegionAnchor>, Without<OverviewCamera>)>,
    mut camera_query: Query<&mut Transform, (With<OverviewCamera>, Without<RegionAnchor>)>,
) {
    // Only a first entry actually changes the state
    let step = step_camera_region(state.bypass_change_detection(), &config);
    if step.first_entry {
        state.set_changed();
        info!("Entered region {} for the first time, camera re-homed", state.region.label());
    }

    if let Some(offset) = step.anchor_offset {
        for mut anchor in anchor_query.iter_mut() {
            if anchor.translation != offset {
                anchor.translation = offset;
            }
        }
    }

    let Ok(mut camera_transform) = camera_query.single_mut() else { return };
    camera_transform.set_if_neq(overview_camera_transform(step.eye));
}
