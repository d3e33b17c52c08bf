// Per-frame reconciliation of tracking, modes and scene transforms
//
// Submodules:
// - board: toolbar-driven board yaw (transform synchronizer)
// - category: mutually exclusive category display
// - region: region presets for the overview camera
// - highlight: selection highlight following the toolbar
//
// Order within Update: actions -> synchronize -> controllers -> apply.
// Everything lands before PostUpdate transform propagation, so both render
// passes extract the same, fully re-evaluated scene graph.

mod board;
mod category;
mod highlight;
mod region;

use bevy::prelude::*;

use crate::config::OverlayConfig;
use crate::state::ArState;
use crate::types::*;

pub use board::{board_pose, board_rotation, synchronize_board};
pub use category::{display_categories, placement_for, Placement};
pub use highlight::{highlight_pose, selection_highlighter};
pub use region::{
    camera_region_controller, overview_camera_transform, step_camera_region, RegionStep,
};

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconcileSet {
    Actions,
    Synchronize,
    Controllers,
    Apply,
}

pub struct ReconcilePlugin;

impl Plugin for ReconcilePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OverlayConfig>()
            .init_resource::<ArState>()
            .configure_sets(
                Update,
                (
                    ReconcileSet::Actions,
                    ReconcileSet::Synchronize,
                    ReconcileSet::Controllers,
                    ReconcileSet::Apply,
                )
                    .chain(),
            )
            .add_systems(Update, synchronize_board.in_set(ReconcileSet::Synchronize))
            .add_systems(
                Update,
                (display_categories, camera_region_controller, selection_highlighter)
                    .chain()
                    .in_set(ReconcileSet::Controllers),
            )
            .add_systems(
                Update,
                (apply_physics_poses, sync_visibility, sync_material_alpha)
                    .in_set(ReconcileSet::Apply),
            );
    }
}

/// System: hand changed physics poses to the scene graph
pub fn apply_physics_poses(mut query: Query<(&PhysicsPose, &mut Transform), Changed<PhysicsPose>>) {
    for (pose, mut transform) in query.iter_mut() {
        *transform = Transform::from_matrix(pose.0);
    }
}

/// System: renderer visibility follows opacity, independent of where the body sits
pub fn sync_visibility(mut query: Query<(&Opacity, &mut Visibility), Changed<Opacity>>) {
    for (opacity, mut visibility) in query.iter_mut() {
        let wanted = if opacity.0 > 0.0 { Visibility::Inherited } else { Visibility::Hidden };
        visibility.set_if_neq(wanted);
    }
}

/// System: push opacity into the alpha of per-entity materials
pub fn sync_material_alpha(
    query: Query<(&Opacity, &MeshMaterial3d<StandardMaterial>), Changed<Opacity>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let Some(mut materials) = materials else { return };
    for (opacity, material) in query.iter() {
        let Some(material) = materials.get_mut(&material.0) else { continue };
        material.base_color.set_alpha(opacity.0);
        material.alpha_mode = if opacity.0 < 1.0 { AlphaMode::Blend } else { AlphaMode::Opaque };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ControlsPlugin, OverlayAction};
    use crate::tracking::{MarkerSample, MarkerTracking};

    const PARKED: Vec3 = Vec3::splat(-400.0);

    fn reconcile_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<MarkerTracking>()
            .add_plugins((ReconcilePlugin, ControlsPlugin));

        let world = app.world_mut();
        for category in Category::ALL {
            for slot in Slot::ALL {
                world.spawn((
                    CategoryInstance { category, slot },
                    PhysicsPose::default(),
                    Opacity(1.0),
                    Transform::default(),
                    Visibility::Inherited,
                ));
            }
        }
        world.spawn((
            AnchorBoard { scale: 0.648 },
            PhysicsPose::default(),
            Transform::default(),
        ));
        world.spawn((
            HighlightObject,
            PhysicsPose::default(),
            Opacity(0.0),
            Transform::default(),
            Visibility::Hidden,
        ));
        world.spawn((RegionAnchor, Transform::default()));
        world.spawn((OverviewCamera, Transform::default()));
        app
    }

    fn act(app: &mut App, action: OverlayAction) {
        app.world_mut().send_event(action);
        app.update();
    }

    fn track(app: &mut App, marker: MarkerId, found: bool, world: Mat4) {
        app.world_mut()
            .resource_mut::<MarkerTracking>()
            .apply(MarkerSample { marker, found, world });
    }

    fn instances(app: &mut App) -> Vec<(CategoryInstance, Transform, Opacity, Visibility)> {
        let mut query = app
            .world_mut()
            .query::<(&CategoryInstance, &Transform, &Opacity, &Visibility)>();
        query
            .iter(app.world())
            .map(|(i, t, o, v)| (*i, *t, *o, *v))
            .collect()
    }

    fn single<C: Component>(app: &mut App) -> Entity {
        let mut query = app.world_mut().query_filtered::<Entity, With<C>>();
        query.single(app.world()).unwrap()
    }

    fn visible_categories(app: &mut App) -> Vec<Category> {
        let mut shown: Vec<Category> = instances(app)
            .into_iter()
            .filter(|(_, _, opacity, _)| opacity.0 > 0.0)
            .map(|(instance, _, _, _)| instance.category)
            .collect();
        shown.dedup();
        shown
    }

    #[test]
    fn education_scenario_places_blocks_and_parks_the_rest() {
        let mut app = reconcile_app();
        act(&mut app, OverlayAction::SelectCategory(Category::Education));

        let expected = [(-20.0, -27.0), (-6.0, -55.0), (-11.0, -43.0), (-33.0, -67.0)];
        let mut parked = 0;
        for (instance, transform, opacity, visibility) in instances(&mut app) {
            if instance.category == Category::Education {
                let (x, y) = expected[instance.slot.index()];
                assert_eq!(transform.translation, Vec3::new(x, y, 0.0));
                assert!(transform.scale.abs_diff_eq(Vec3::splat(0.001), 1e-7));
                assert_eq!(opacity, Opacity(1.0));
                assert_eq!(visibility, Visibility::Inherited);
            } else {
                assert_eq!(transform.translation, PARKED);
                assert_eq!(opacity, Opacity(0.0));
                assert_eq!(visibility, Visibility::Hidden);
                parked += 1;
            }
        }
        assert_eq!(parked, 12);
    }

    #[test]
    fn at_most_one_category_is_ever_visible() {
        let mut app = reconcile_app();
        app.update();
        assert!(visible_categories(&mut app).is_empty());

        for category in [Category::Housing, Category::Employment, Category::Demographics] {
            act(&mut app, OverlayAction::SelectCategory(category));
            assert_eq!(visible_categories(&mut app), vec![category]);
        }

        act(&mut app, OverlayAction::Reset);
        assert!(visible_categories(&mut app).is_empty());
    }

    #[test]
    fn repeated_frames_are_idempotent() {
        let mut app = reconcile_app();
        act(&mut app, OverlayAction::SelectCategory(Category::Housing));
        let before = instances(&mut app);
        app.update();
        app.update();
        let after = instances(&mut app);
        assert_eq!(before.len(), after.len());
        for ((_, t0, o0, _), (_, t1, o1, _)) in before.iter().zip(after.iter()) {
            assert_eq!(t0, t1);
            assert_eq!(o0, o1);
        }
    }

    #[test]
    fn lost_marker_freezes_board_rotation() {
        let mut app = reconcile_app();
        act(&mut app, OverlayAction::EnableRotation);
        track(&mut app, MarkerId::Toolbar, true, Mat4::from_translation(Vec3::new(7.5, 0.0, 0.0)));
        app.update();
        let tracked = app.world().resource::<ArState>().board_rotation;
        assert!(tracked.abs_diff_eq(Quat::from_rotation_y(45f32.to_radians()), 1e-6));

        track(&mut app, MarkerId::Toolbar, false, Mat4::IDENTITY);
        app.update();
        app.update();
        assert_eq!(app.world().resource::<ArState>().board_rotation, tracked);

        let board = single::<AnchorBoard>(&mut app);
        let pose = app.world().get::<PhysicsPose>(board).unwrap().0;
        assert!(pose.abs_diff_eq(board_pose(0.648, tracked), 1e-6));
    }

    #[test]
    fn board_syncs_without_any_marker() {
        let mut app = reconcile_app();
        app.update();
        let board = single::<AnchorBoard>(&mut app);
        let pose = app.world().get::<PhysicsPose>(board).unwrap().0;
        assert!(pose.abs_diff_eq(board_pose(0.648, Quat::IDENTITY), 1e-6));
    }

    #[test]
    fn highlight_visible_only_when_selecting_with_toolbar() {
        let mut app = reconcile_app();
        let highlight = single::<HighlightObject>(&mut app);
        let toolbar = Mat4::from_translation(Vec3::new(10.0, 0.0, -280.0));
        let ground = Mat4::from_translation(Vec3::new(0.0, 0.0, -300.0));
        track(&mut app, MarkerId::Ground, true, ground);
        track(&mut app, MarkerId::Toolbar, true, toolbar);

        // Toolbar found, selection off
        app.update();
        assert_eq!(app.world().get::<Opacity>(highlight), Some(&Opacity(0.0)));

        act(&mut app, OverlayAction::EnableSelection);
        assert_eq!(app.world().get::<Opacity>(highlight), Some(&Opacity(1.0)));
        let shown_at = app.world().get::<Transform>(highlight).unwrap().translation;
        assert!(shown_at.abs_diff_eq(Vec3::new(10.0, 0.0, 20.0), 1e-4));

        track(&mut app, MarkerId::Toolbar, false, Mat4::IDENTITY);
        app.update();
        assert_eq!(app.world().get::<Opacity>(highlight), Some(&Opacity(0.0)));
        assert_eq!(app.world().get::<Transform>(highlight).unwrap().translation, shown_at);
    }

    #[test]
    fn region_entry_moves_anchor_and_camera() {
        let mut app = reconcile_app();
        act(&mut app, OverlayAction::Pan(crate::input::PanDirection::Right));
        act(&mut app, OverlayAction::SelectRegion(CameraRegion::Uptown));
        act(&mut app, OverlayAction::FocusCamera);

        let anchor = single::<RegionAnchor>(&mut app);
        let camera = single::<OverviewCamera>(&mut app);
        let translation =
            |app: &App, entity: Entity| app.world().get::<Transform>(entity).unwrap().translation;
        assert_eq!(translation(&app, anchor), Vec3::new(30.0, 35.0, 0.0));
        assert_eq!(app.world().resource::<ArState>().free_roam.offset, Vec3::new(0.0, 0.0, 200.0));
        assert_eq!(translation(&app, camera), Vec3::new(0.0, -60.0, 40.0));

        // Manual pan after entry sticks
        act(&mut app, OverlayAction::Pan(crate::input::PanDirection::Up));
        app.update();
        assert_eq!(translation(&app, camera), Vec3::new(0.0, -55.0, 40.0));
    }

    #[test]
    fn reset_then_reentry_rehomes_again() {
        let mut app = reconcile_app();
        act(&mut app, OverlayAction::SelectRegion(CameraRegion::MidtownEast));
        act(&mut app, OverlayAction::FocusCamera);
        act(&mut app, OverlayAction::Zoom(crate::input::ZoomDirection::In));
        assert_eq!(app.world().resource::<ArState>().free_roam.offset.z, 195.0);

        act(&mut app, OverlayAction::Reset);
        let state = app.world().resource::<ArState>();
        assert!(!state.visits.any());
        assert_eq!(state.free_roam.offset, Vec3::new(0.0, 0.0, 200.0));

        act(&mut app, OverlayAction::Zoom(crate::input::ZoomDirection::In));
        act(&mut app, OverlayAction::SelectRegion(CameraRegion::MidtownEast));
        act(&mut app, OverlayAction::FocusCamera);
        assert_eq!(app.world().resource::<ArState>().free_roam.offset.z, 200.0);
    }
}
