// Dual-viewport compositor
//
// Pass 1: AR camera -> window-sized texture, live feed visible.
// Pass 2: overview camera -> inset texture, live feed hidden.
// Composite: a UI camera draws the main texture full-window, then the inset on top.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::camera::RenderTarget;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use bevy::render::view::RenderLayers;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::config::OverlayConfig;
use crate::constants::LIVE_FEED_LAYER;
use crate::types::{MainArCamera, OverviewCamera};

pub const COMPOSITE_CAMERA_ORDER: isize = 2;

pub struct CompositorPlugin;

impl Plugin for CompositorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_compositor)
            .add_systems(Update, (assign_view_passes, resize_view_targets));
    }
}

/// The two render passes, in the order they run
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ViewPass {
    Main,
    Overview,
}

impl ViewPass {
    pub const ORDERED: [ViewPass; 2] = [ViewPass::Main, ViewPass::Overview];

    pub fn camera_order(self) -> isize {
        match self {
            ViewPass::Main => 0,
            ViewPass::Overview => 1,
        }
    }

    pub fn shows_live_feed(self) -> bool {
        self == ViewPass::Main
    }

    pub fn render_layers(self) -> RenderLayers {
        if self.shows_live_feed() {
            RenderLayers::from_layers(&[0, LIVE_FEED_LAYER])
        } else {
            RenderLayers::layer(0)
        }
    }

    /// Draw order of the blitted texture; the inset must land above the main view
    pub fn blit_z(self) -> i32 {
        match self {
            ViewPass::Main => 0,
            ViewPass::Overview => 1,
        }
    }
}

/// Render target handles for both passes
#[derive(Resource, Clone)]
pub struct ViewTargets {
    pub main: Handle<Image>,
    pub inset: Handle<Image>,
}

impl ViewTargets {
    pub fn for_pass(&self, pass: ViewPass) -> &Handle<Image> {
        match pass {
            ViewPass::Main => &self.main,
            ViewPass::Overview => &self.inset,
        }
    }
}

/// UI node that blits one pass onto the window
#[derive(Component)]
pub struct CompositeLayer(pub ViewPass);

/// Pixel rectangles of both views on the window
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ViewLayout {
    pub main: URect,
    pub inset: URect,
}

impl ViewLayout {
    pub fn rect(&self, pass: ViewPass) -> URect {
        match pass {
            ViewPass::Main => self.main,
            ViewPass::Overview => self.inset,
        }
    }
}

/// Main view covers the window; the inset is a fixed fraction anchored top-right.
/// The inset never leaves the window, whatever the ratios say.
pub fn view_layout(window: UVec2, config: &OverlayConfig) -> ViewLayout {
    let [width_num, width_den] = config.inset_width_ratio;
    let [height_num, height_den] = config.inset_height_ratio;
    let inset_size = UVec2::new(
        window.x.saturating_mul(width_num) / width_den.max(1),
        window.y.saturating_mul(height_num) / height_den.max(1),
    )
    .min(window);
    let inset_min = UVec2::new(
        window.x - inset_size.x,
        config.inset_top_margin.min(window.y - inset_size.y),
    );

    ViewLayout {
        main: URect::from_corners(UVec2::ZERO, window),
        inset: URect::from_corners(inset_min, inset_min + inset_size),
    }
}

fn target_extent(size: UVec2) -> Extent3d {
    Extent3d {
        width: size.x.max(1),
        height: size.y.max(1),
        depth_or_array_layers: 1,
    }
}

pub fn render_target_image(size: UVec2) -> Image {
    let mut image = Image::new_fill(
        target_extent(size),
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Bgra8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.texture_descriptor.usage =
        TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::RENDER_ATTACHMENT;
    image
}

fn primary_window_layout(window: &Window, config: &OverlayConfig) -> (ViewLayout, f32) {
    let size = window.resolution.physical_size();
    (view_layout(size, config), window.resolution.scale_factor())
}

/// UI placement in logical pixels for a physical rect
fn layer_node(rect: URect, scale_factor: f32) -> Node {
    let scale = scale_factor.max(f32::EPSILON);
    Node {
        position_type: PositionType::Absolute,
        left: Val::Px(rect.min.x as f32 / scale),
        top: Val::Px(rect.min.y as f32 / scale),
        width: Val::Px(rect.width() as f32 / scale),
        height: Val::Px(rect.height() as f32 / scale),
        ..default()
    }
}

/// Startup: create both targets and the composite camera with its two layers
pub fn setup_compositor(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    config: Res<OverlayConfig>,
    window_query: Query<&Window, With<PrimaryWindow>>,
) {
    let (layout, scale_factor) = match window_query.single() {
        Ok(window) => primary_window_layout(window, &config),
        Err(_) => (view_layout(UVec2::from_array(config.window_size), &config), 1.0),
    };

    let targets = ViewTargets {
        main: images.add(render_target_image(layout.main.size())),
        inset: images.add(render_target_image(layout.inset.size())),
    };

    commands.spawn((
        Camera2d,
        Camera {
            order: COMPOSITE_CAMERA_ORDER,
            ..default()
        },
        IsDefaultUiCamera,
        Name::new("Composite Camera"),
    ));

    for pass in ViewPass::ORDERED {
        commands.spawn((
            ImageNode::new(targets.for_pass(pass).clone()),
            layer_node(layout.rect(pass), scale_factor),
            ZIndex(pass.blit_z()),
            CompositeLayer(pass),
        ));
    }

    info!(
        "Compositor ready: main {}x{}, inset {}x{} at ({}, {})",
        layout.main.width(),
        layout.main.height(),
        layout.inset.width(),
        layout.inset.height(),
        layout.inset.min.x,
        layout.inset.min.y
    );
    commands.insert_resource(targets);
}

/// System: route each scene camera into its pass
pub fn assign_view_passes(
    mut commands: Commands,
    targets: Option<Res<ViewTargets>>,
    mut camera_query: Query<
        (Entity, &mut Camera, Has<MainArCamera>),
        Or<(Added<MainArCamera>, Added<OverviewCamera>)>,
    >,
) {
    let Some(targets) = targets else { return };

    for (entity, mut camera, is_main) in camera_query.iter_mut() {
        let pass = if is_main { ViewPass::Main } else { ViewPass::Overview };
        camera.order = pass.camera_order();
        camera.target = RenderTarget::Image(targets.for_pass(pass).clone().into());
        commands.entity(entity).insert(pass.render_layers());
        debug!("Camera {:?} assigned to {:?} pass", entity, pass);
    }
}

/// System: keep both targets and the inset rect in step with the window
pub fn resize_view_targets(
    mut resize_events: EventReader<WindowResized>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    config: Res<OverlayConfig>,
    targets: Option<Res<ViewTargets>>,
    mut images: ResMut<Assets<Image>>,
    mut layer_query: Query<(&CompositeLayer, &mut Node)>,
) {
    if resize_events.read().last().is_none() {
        return;
    }
    let Some(targets) = targets else { return };
    let Ok(window) = window_query.single() else { return };

    let (layout, scale_factor) = primary_window_layout(window, &config);
    for pass in ViewPass::ORDERED {
        if let Some(image) = images.get_mut(targets.for_pass(pass)) {
            image.resize(target_extent(layout.rect(pass).size()));
        }
    }
    for (layer, mut node) in layer_query.iter_mut() {
        *node = layer_node(layout.rect(layer.0), scale_factor);
    }
    debug!("Resized view targets to {:?}", layout);
}
