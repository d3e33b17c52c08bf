// Control panel and HUD text
//
// Buttons only emit `OverlayAction`s; the state itself is changed by the
// action handler, same as for keyboard input.

use bevy::prelude::*;

use crate::input::{apply_overlay_actions, OverlayAction};
use crate::reconcile::ReconcileSet;
use crate::state::{ArState, ModeFlags};
use crate::types::*;

const PANEL_BACKGROUND: Color = Color::srgba(0.08, 0.08, 0.1, 0.5);
const PANEL_BORDER: Color = Color::srgb(1.0, 0.84, 0.0); // Gold
const BUTTON_IDLE: Color = Color::srgba(0.2, 0.2, 0.25, 0.8);
const BUTTON_HOVERED: Color = Color::srgba(0.3, 0.3, 0.38, 0.9);
const BUTTON_PRESSED: Color = Color::srgba(0.45, 0.38, 0.1, 0.9);
const BUTTON_SELECTED: Color = Color::srgba(0.6, 0.5, 0.05, 0.9);
const HUD_TEXT: Color = Color::srgb(1.0, 0.2, 0.2); // Red

/// Sits above both composited views
const PANEL_Z: i32 = 10;

pub const KEY_MENU: [&str; 13] = [
    "Keys Control Menu",
    "'Up Arrow' - Fly Camera Up",
    "'Down Arrow' - Fly Camera Down",
    "'Left Arrow' - Fly Camera Left",
    "'Right Arrow' - Fly Camera Right",
    "'Plus' - Fly Camera In",
    "'Minus' - Fly Camera Out",
    "'C' - Rotation Mode",
    "'P' - Selection Mode",
    "'Q' - Quit Mode",
    "'R' - Reset",
    "'1'-'4' - Show Category",
    "'Esc' - Exit",
];

pub struct ControlPanelPlugin;

impl Plugin for ControlPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_control_panel, spawn_hud))
            .add_systems(
                Update,
                panel_button_actions
                    .in_set(ReconcileSet::Actions)
                    .before(apply_overlay_actions),
            )
            .add_systems(
                Update,
                (paint_panel_buttons, update_hud_text).after(ReconcileSet::Actions),
            );
    }
}

// ===== COMPONENTS =====

/// Button that fires an action when pressed
#[derive(Component, Clone, Copy)]
pub struct PanelButton(pub OverlayAction);

#[derive(Component)]
pub struct SelectionLabel;

#[derive(Component)]
pub struct ModeStatusText;

// ===== TEXT =====

pub fn selection_label(display: DisplayCategory) -> String {
    match display {
        DisplayCategory::None => "Nothing is selected".to_string(),
        DisplayCategory::Shown(category) => format!("{} is selected", category.label()),
    }
}

pub fn mode_status(modes: ModeFlags) -> String {
    let mut lines = Vec::new();
    if modes.rotation {
        lines.push("Rotation Mode");
    }
    if modes.selection {
        lines.push("Selection Mode");
    }
    lines.join("\n")
}

fn button_label(action: OverlayAction) -> &'static str {
    match action {
        OverlayAction::SelectCategory(category) => category.label(),
        OverlayAction::SelectRegion(region) => region.label(),
        OverlayAction::FocusCamera => "Camera Focus",
        OverlayAction::Reset => "Reset",
        _ => "",
    }
}

/// Radio-style selection state of a panel button
pub fn is_selected(action: OverlayAction, state: &ArState) -> bool {
    match action {
        OverlayAction::SelectCategory(category) => state.display.shows(category),
        OverlayAction::SelectRegion(region) => state.region == region,
        _ => false,
    }
}

pub fn button_color(interaction: Interaction, selected: bool) -> Color {
    match interaction {
        Interaction::Pressed => BUTTON_PRESSED,
        Interaction::Hovered => BUTTON_HOVERED,
        Interaction::None if selected => BUTTON_SELECTED,
        Interaction::None => BUTTON_IDLE,
    }
}

// ===== SPAWNING =====

fn spawn_button(parent: &mut ChildSpawnerCommands, action: OverlayAction) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(110.0),
                height: Val::Px(20.0),
                margin: UiRect::vertical(Val::Px(1.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            PanelButton(action),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(button_label(action)),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn spawn_heading(parent: &mut ChildSpawnerCommands, label: &str) {
    parent.spawn((
        Text::new(label),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(PANEL_BORDER),
        Node {
            margin: UiRect::top(Val::Px(4.0)),
            ..default()
        },
    ));
}

/// Bottom-right panel: categories, region radio group, focus and reset
pub fn spawn_control_panel(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(10.0),
                right: Val::Px(10.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(5.0)),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            BorderColor(PANEL_BORDER),
            ZIndex(PANEL_Z),
            Name::new("Control Panel"),
        ))
        .with_children(|panel| {
            spawn_heading(panel, "Visualize");
            for category in Category::ALL {
                spawn_button(panel, OverlayAction::SelectCategory(category));
            }
            spawn_heading(panel, "Region");
            for region in CameraRegion::SELECTABLE {
                spawn_button(panel, OverlayAction::SelectRegion(region));
            }
            spawn_heading(panel, "Camera");
            spawn_button(panel, OverlayAction::FocusCamera);
            spawn_button(panel, OverlayAction::Reset);
        });
}

/// Selection label (top centre), mode lines (top right), key menu (left)
pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(5.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            ZIndex(PANEL_Z),
        ))
        .with_children(|row| {
            row.spawn((
                Text::new(selection_label(DisplayCategory::None)),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(HUD_TEXT),
                SelectionLabel,
            ));
        });

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(HUD_TEXT),
        TextLayout::new_with_justify(JustifyText::Right),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(5.0),
            right: Val::Px(10.0),
            ..default()
        },
        ZIndex(PANEL_Z),
        ModeStatusText,
    ));

    commands.spawn((
        Text::new(KEY_MENU.join("\n")),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(HUD_TEXT),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(20.0),
            left: Val::Px(5.0),
            ..default()
        },
        ZIndex(PANEL_Z),
    ));
}

// ===== SYSTEMS =====

/// System: pressed buttons become actions for this frame's handler
pub fn panel_button_actions(
    button_query: Query<(&Interaction, &PanelButton), Changed<Interaction>>,
    mut actions: EventWriter<OverlayAction>,
) {
    for (interaction, button) in button_query.iter() {
        if *interaction == Interaction::Pressed {
            debug!("Panel button pressed: {:?}", button.0);
            actions.write(button.0);
        }
    }
}

/// System: hover feedback plus the highlighted radio entry
pub fn paint_panel_buttons(
    state: Res<ArState>,
    mut button_query: Query<(&Interaction, &PanelButton, &mut BackgroundColor)>,
) {
    for (interaction, button, mut background) in button_query.iter_mut() {
        let color = button_color(*interaction, is_selected(button.0, &state));
        background.set_if_neq(BackgroundColor(color));
    }
}

pub fn update_hud_text(
    state: Res<ArState>,
    mut selection_query: Query<&mut Text, (With<SelectionLabel>, Without<ModeStatusText>)>,
    mut mode_query: Query<&mut Text, (With<ModeStatusText>, Without<SelectionLabel>)>,
) {
    if !state.is_changed() {
        return;
    }

    for mut text in selection_query.iter_mut() {
        *text = Text::new(selection_label(state.display));
    }
    for mut text in mode_query.iter_mut() {
        *text = Text::new(mode_status(state.modes));
    }
}
