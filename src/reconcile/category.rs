// Category display controller
//
// One routine for every category: the active category's blocks get their
// table pose and full opacity, every other block is parked.

use bevy::prelude::*;

use crate::config::OverlayConfig;
use crate::state::ArState;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    Shown(Mat4),
    Parked(Mat4),
}

impl Placement {
    pub fn pose(self) -> Mat4 {
        match self {
            Placement::Shown(pose) | Placement::Parked(pose) => pose,
        }
    }

    pub fn opacity(self) -> f32 {
        match self {
            Placement::Shown(_) => 1.0,
            Placement::Parked(_) => 0.0,
        }
    }
}

pub fn placement_for(
    display: DisplayCategory,
    instance: &CategoryInstance,
    config: &OverlayConfig,
) -> Placement {
    if display.shows(instance.category) {
        let offset = config.slot_offset(instance.category, instance.slot);
        let scale = config.category_scale(instance.category);
        Placement::Shown(Mat4::from_translation(offset.extend(0.0)) * Mat4::from_scale(scale))
    } else {
        // Physics bodies keep colliding while hidden, so they also move out of the way
        Placement::Parked(Mat4::from_translation(config.parked_position()))
    }
}

/// System: recomputed from scratch every frame, so repeated runs are harmless
pub fn display_categories(
    state: Res<ArState>,
    config: Res<OverlayConfig>,
    mut instance_query: Query<(&CategoryInstance, &mut PhysicsPose, &mut Opacity)>,
) {
    for (instance, mut pose, mut opacity) in instance_query.iter_mut() {
        let placement = placement_for(state.display, instance, &config);
        pose.set_if_neq(PhysicsPose(placement.pose()));
        opacity.set_if_neq(Opacity(placement.opacity()));
    }
}
