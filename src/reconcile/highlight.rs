// Selection highlighter
use bevy::prelude::*;

use crate::state::ArState;
use crate::tracking::MarkerTracking;
use crate::types::*;

/// Toolbar pose expressed in the ground marker's frame
pub fn highlight_pose(toolbar_world: Mat4, ground_world: Mat4) -> Mat4 {
    ground_world.inverse() * toolbar_world
}

/// System: the highlight is drawn only while selecting with the toolbar in view.
/// Outside selection mode it keeps whatever quit/reset left behind.
pub fn selection_highlighter(
    state: Res<ArState>,
    tracking: Res<MarkerTracking>,
    mut highlight_query: Query<(&mut PhysicsPose, &mut Opacity), With<HighlightObject>>,
) {
    if !state.modes.selection {
        return;
    }

    let visible = tracking.found(MarkerId::Toolbar);
    for (mut pose, mut opacity) in highlight_query.iter_mut() {
        if visible {
            let relative = highlight_pose(
                tracking.world_transform(MarkerId::Toolbar),
                tracking.world_transform(MarkerId::Ground),
            );
            pose.set_if_neq(PhysicsPose(relative));
            opacity.set_if_neq(Opacity(1.0));
        } else {
            // Last pose is retained for when the toolbar comes back
            opacity.set_if_neq(Opacity(0.0));
        }
    }
}
