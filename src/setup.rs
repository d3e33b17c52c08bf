// Scene setup: marker hierarchy, board, category blocks, highlight and cameras
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::render::view::RenderLayers;
use std::f32::consts::PI;

use crate::config::OverlayConfig;
use crate::constants::*;
use crate::procedural_meshes::create_pyramid_mesh;
use crate::types::*;

/// All 16 block instances, category-major
pub fn category_instances() -> Vec<CategoryInstance> {
    Category::ALL
        .iter()
        .flat_map(|&category| {
            Slot::ALL.iter().map(move |&slot| CategoryInstance { category, slot })
        })
        .collect()
}

/// Size of a camera-facing quad that fills the view at `distance`
pub fn live_feed_quad_size(distance: f32, fov_y: f32, aspect: f32) -> Vec2 {
    let height = 2.0 * distance * (fov_y / 2.0).tan();
    Vec2::new(height * aspect, height)
}

/// Placeholder feed until a capture device delivers frames
fn placeholder_feed_image() -> Image {
    const SIZE: u32 = 64;
    let mut image = Image::new_fill(
        Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[40, 40, 48, 255],
        TextureFormat::Rgba8UnormSrgb,
        bevy::asset::RenderAssetUsages::default(),
    );

    if let Some(data) = image.data.as_mut() {
        for y in 0..SIZE {
            for x in 0..SIZE {
                if (x / 8 + y / 8) % 2 == 0 {
                    let index = ((y * SIZE + x) * 4) as usize;
                    data[index] = 60;     // R
                    data[index + 1] = 60; // G
                    data[index + 2] = 70; // B
                }
            }
        }
    }
    image
}

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    asset_server: Res<AssetServer>,
    config: Res<OverlayConfig>,
) {
    // Directional light (sun)
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform {
            translation: Vec3::new(0.0, 200.0, 0.0),
            rotation: Quat::from_rotation_x(-PI / 4.0),
            ..default()
        },
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        affects_lightmapped_meshes: false,
    });

    // AR camera; the compositor routes it to the main pass
    let projection = PerspectiveProjection {
        near: config.camera_near,
        far: config.camera_far,
        ..default()
    };
    let [width, height] = config.window_size;
    let feed_distance = config.camera_far * 0.9;
    let aspect = width as f32 / height.max(1) as f32;
    let feed_size = live_feed_quad_size(feed_distance, projection.fov, aspect);

    let feed_image = images.add(placeholder_feed_image());

    commands
        .spawn((
            Camera3d::default(),
            Camera::default(),
            Projection::Perspective(projection.clone()),
            Transform::from_translation(Vec3::from_array(config.main_camera_translation)),
            MainArCamera,
            Name::new("AR Camera"),
        ))
        .with_children(|camera| {
            camera.spawn((
                Mesh3d(meshes.add(Rectangle::new(feed_size.x, feed_size.y))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color_texture: Some(feed_image),
                    unlit: true,
                    ..default()
                })),
                Transform::from_xyz(0.0, 0.0, -feed_distance),
                RenderLayers::layer(LIVE_FEED_LAYER),
                LiveFeedBackground,
            ));
        });

    // Toolbar marker lives at the root
    commands.spawn((
        MarkerNode(MarkerId::Toolbar),
        Transform::default(),
        Visibility::default(),
        Name::new("Toolbar Marker"),
    ));

    let [extent_x, extent_z] = config.board_extent;
    let board_mesh = meshes.add(Plane3d::new(Vec3::Y, Vec2::new(extent_x / 2.0, extent_z / 2.0)));
    let board_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(asset_server.load("textures/manhattan.png")),
        perceptual_roughness: 0.6,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    // Pyramid base is half a marker wide, one marker deep and one marker tall
    let pyramid = create_pyramid_mesh(
        &mut meshes,
        config.marker_size / 2.0,
        config.marker_size,
        config.marker_size,
    );
    let pyramid_material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 0.65, 0.0, 0.0), // Orange, starts invisible
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    let parked = PhysicsPose(Mat4::from_translation(config.parked_position()));
    let board_scale = config.board_scale();
    info!("Board scaled by {:.4} to span {} markers", board_scale, config.board_marker_span);

    commands
        .spawn((
            MarkerNode(MarkerId::Ground),
            Transform::default(),
            Visibility::default(),
            Name::new("Ground Marker"),
        ))
        .with_children(|ground| {
            ground.spawn((
                Mesh3d(board_mesh),
                MeshMaterial3d(board_material),
                AnchorBoard { scale: board_scale },
                PhysicsPose::default(),
                Name::new("Marker Board"),
            ));

            for instance in category_instances() {
                let model = GltfAssetLabel::Scene(0)
                    .from_asset(format!("models/{}.glb", instance.category.model_stem()));
                ground.spawn((
                    SceneRoot(asset_server.load(model)),
                    instance,
                    parked,
                    Opacity(0.0),
                    Transform::from_matrix(parked.0),
                    Visibility::Hidden,
                    Name::new(format!(
                        "Block {} {}",
                        instance.category.label(),
                        instance.slot.number()
                    )),
                ));
            }

            ground.spawn((
                Mesh3d(pyramid),
                MeshMaterial3d(pyramid_material),
                HighlightObject,
                PhysicsPose::default(),
                Opacity(0.0),
                Visibility::Hidden,
                Name::new("Pyramid"),
            ));

            ground
                .spawn((
                    RegionAnchor,
                    Transform::default(),
                    Visibility::default(),
                    Name::new("Region Anchor"),
                ))
                .with_children(|anchor| {
                    anchor.spawn((
                        Camera3d::default(),
                        Camera::default(),
                        Projection::Perspective(projection),
                        Transform::from_translation(config.free_roam_home())
                            .looking_at(Vec3::ZERO, Vec3::Y),
                        OverviewCamera,
                        Name::new("Overview Camera"),
                    ));
                });
        });

    info!("Scene ready: {} category blocks", Category::ALL.len() * Slot::ALL.len());
}
