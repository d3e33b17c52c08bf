use bevy::prelude::*;

mod compositor;
mod config;
mod constants;
mod input;
mod procedural_meshes;
mod reconcile;
mod setup;
mod state;
mod tracker_sim;
mod tracking;
mod types;
mod ui;

use compositor::CompositorPlugin;
use config::ConfigPlugin;
use input::ControlsPlugin;
use reconcile::ReconcilePlugin;
use tracking::TrackingPlugin;
use ui::ControlPanelPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Marker Overlay".into(),
                ..default()
            }),
            ..default()
        }))
        // Config first: every later plugin reads it
        .add_plugins(ConfigPlugin::default())
        .add_plugins((
            TrackingPlugin,
            ControlsPlugin,
            ReconcilePlugin,
            CompositorPlugin,
            ControlPanelPlugin,
        ))
        .add_systems(Startup, (setup::setup_scene, tracker_sim::spawn_simulated_tracker))
        .run();
}
