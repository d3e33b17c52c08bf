// Discrete input handling: keyboard bindings and the action handler
use bevy::prelude::*;

use crate::config::OverlayConfig;
use crate::reconcile::ReconcileSet;
use crate::state::ArState;
use crate::types::*;

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<OverlayAction>().add_systems(
            Update,
            (keyboard_actions, apply_overlay_actions)
                .chain()
                .in_set(ReconcileSet::Actions),
        );
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    fn delta(self) -> Vec3 {
        match self {
            PanDirection::Up => Vec3::Y,
            PanDirection::Down => Vec3::NEG_Y,
            PanDirection::Left => Vec3::NEG_X,
            PanDirection::Right => Vec3::X,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Every discrete command the keyboard or control panel can issue
#[derive(Event, Clone, Copy, PartialEq, Eq, Debug)]
pub enum OverlayAction {
    Exit,
    QuitModes,
    Reset,
    EnableRotation,
    EnableSelection,
    Pan(PanDirection),
    Zoom(ZoomDirection),
    SelectCategory(Category),
    SelectRegion(CameraRegion),
    FocusCamera,
}

pub const KEY_BINDINGS: [(KeyCode, OverlayAction); 17] = [
    (KeyCode::Escape, OverlayAction::Exit),
    (KeyCode::KeyQ, OverlayAction::QuitModes),
    (KeyCode::KeyR, OverlayAction::Reset),
    (KeyCode::KeyC, OverlayAction::EnableRotation),
    (KeyCode::KeyP, OverlayAction::EnableSelection),
    (KeyCode::ArrowUp, OverlayAction::Pan(PanDirection::Up)),
    (KeyCode::ArrowDown, OverlayAction::Pan(PanDirection::Down)),
    (KeyCode::ArrowLeft, OverlayAction::Pan(PanDirection::Left)),
    (KeyCode::ArrowRight, OverlayAction::Pan(PanDirection::Right)),
    (KeyCode::Equal, OverlayAction::Zoom(ZoomDirection::In)),
    (KeyCode::NumpadAdd, OverlayAction::Zoom(ZoomDirection::In)),
    (KeyCode::Minus, OverlayAction::Zoom(ZoomDirection::Out)),
    (KeyCode::NumpadSubtract, OverlayAction::Zoom(ZoomDirection::Out)),
    (KeyCode::Digit1, OverlayAction::SelectCategory(Category::Education)),
    (KeyCode::Digit2, OverlayAction::SelectCategory(Category::Employment)),
    (KeyCode::Digit3, OverlayAction::SelectCategory(Category::Demographics)),
    (KeyCode::Digit4, OverlayAction::SelectCategory(Category::Housing)),
];

/// System: translate key presses into actions
pub fn keyboard_actions(keys: Res<ButtonInput<KeyCode>>, mut actions: EventWriter<OverlayAction>) {
    for (key, action) in KEY_BINDINGS {
        if keys.just_pressed(key) {
            actions.write(action);
        }
    }
}

/// System: the single place where actions change the application state
pub fn apply_overlay_actions(
    mut actions: EventReader<OverlayAction>,
    mut state: ResMut<ArState>,
    config: Res<OverlayConfig>,
    mut highlight_query: Query<&mut Opacity, With<HighlightObject>>,
    mut anchor_query: Query<&mut Transform, With<RegionAnchor>>,
    mut exit: EventWriter<AppExit>,
) {
    for action in actions.read() {
        match *action {
            OverlayAction::Exit => {
                info!("Exit requested");
                exit.write(AppExit::Success);
            }
            OverlayAction::QuitModes => {
                state.quit_modes();
                hide_highlight(&mut highlight_query);
                info!("Left rotation and selection modes");
            }
            OverlayAction::Reset => {
                if state.visits.any() {
                    debug!("Forgetting visited regions");
                }
                state.reset();
                hide_highlight(&mut highlight_query);
                for mut anchor in anchor_query.iter_mut() {
                    anchor.translation = Vec3::ZERO;
                }
                info!("System reset");
            }
            OverlayAction::EnableRotation => {
                state.modes.rotation = true;
                info!("Rotation mode on");
            }
            OverlayAction::EnableSelection => {
                state.modes.selection = true;
                info!("Selection mode on");
            }
            OverlayAction::Pan(direction) => {
                state.free_roam.offset += direction.delta() * config.free_roam_step;
            }
            OverlayAction::Zoom(direction) => {
                let step = match direction {
                    ZoomDirection::In => -config.free_roam_step,
                    ZoomDirection::Out => config.free_roam_step,
                };
                state.free_roam.offset.z += step;
            }
            OverlayAction::SelectCategory(category) => {
                state.display = DisplayCategory::Shown(category);
                info!("{} blocks selected", category.label());
            }
            OverlayAction::SelectRegion(region) => {
                state.region = region;
                info!("Camera region set to {}", region.label());
            }
            OverlayAction::FocusCamera => {
                state.modes.flying = true;
                info!("Overview camera focusing on region {}", state.region.label());
            }
        }
    }
}

fn hide_highlight(query: &mut Query<&mut Opacity, With<HighlightObject>>) {
    for mut opacity in query.iter_mut() {
        opacity.0 = 0.0;
    }
}
