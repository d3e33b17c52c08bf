// Static overlay configuration
// Defaults come from constants.rs; assets/overlay.toml may override any field.

use anyhow::{ensure, Context, Result};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::state::ArState;
use crate::types::{CameraRegion, Category, Slot};

/// Loads the overlay config and seeds the application state from it.
/// Add after `DefaultPlugins` so load problems reach the log.
pub struct ConfigPlugin {
    pub path: PathBuf,
}

impl Default for ConfigPlugin {
    fn default() -> Self {
        Self { path: PathBuf::from(CONFIG_PATH) }
    }
}

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let config = OverlayConfig::load_or_default(&self.path);
        app.insert_resource(ArState::new(config.free_roam_home()))
            .insert_resource(config)
            .add_systems(Startup, apply_window_size);
    }
}

/// Startup system: size the primary window from the config
pub fn apply_window_size(
    config: Res<OverlayConfig>,
    mut window_query: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = window_query.single_mut() else { return };
    let [width, height] = config.window_size;
    window.resolution.set(width as f32, height as f32);
}

/// Scale and slot offsets for one category
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CategoryTable {
    pub scale: [f32; 3],
    pub slot_offsets: [[f32; 2]; 4],
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryTables {
    pub education: CategoryTable,
    pub employment: CategoryTable,
    pub demographics: CategoryTable,
    pub housing: CategoryTable,
}

impl Default for CategoryTables {
    fn default() -> Self {
        Self {
            education: CategoryTable {
                scale: EDUCATION_SCALE,
                slot_offsets: SHARED_SLOT_OFFSETS,
            },
            employment: CategoryTable {
                scale: EMPLOYMENT_SCALE,
                slot_offsets: SHARED_SLOT_OFFSETS,
            },
            demographics: CategoryTable {
                scale: DEMOGRAPHICS_SCALE,
                slot_offsets: SHARED_SLOT_OFFSETS,
            },
            housing: CategoryTable {
                scale: HOUSING_SCALE,
                slot_offsets: HOUSING_SLOT_OFFSETS,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegionOffsets {
    pub downtown: [f32; 3],
    pub midtown_east: [f32; 3],
    pub midtown_west: [f32; 3],
    pub uptown: [f32; 3],
}

impl Default for RegionOffsets {
    fn default() -> Self {
        Self {
            downtown: DOWNTOWN_OFFSET,
            midtown_east: MIDTOWN_EAST_OFFSET,
            midtown_west: MIDTOWN_WEST_OFFSET,
            uptown: UPTOWN_OFFSET,
        }
    }
}

/// Overlay configuration resource
#[derive(Resource, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub window_size: [u32; 2],
    pub main_camera_translation: [f32; 3],
    pub camera_near: f32,
    pub camera_far: f32,
    pub marker_size: f32,
    pub board_marker_span: f32,
    pub board_extent: [f32; 2],
    pub rotation_degrees_per_unit: f32,
    pub parked_position: [f32; 3],
    pub categories: CategoryTables,
    pub regions: RegionOffsets,
    /// (y, z) bias added to the free-roam eye while a region is active
    pub region_eye_bias: [f32; 2],
    pub free_roam_home: [f32; 3],
    pub free_roam_step: f32,
    pub inset_width_ratio: [u32; 2],
    pub inset_height_ratio: [u32; 2],
    pub inset_top_margin: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            window_size: [WINDOW_WIDTH, WINDOW_HEIGHT],
            main_camera_translation: MAIN_CAMERA_TRANSLATION,
            camera_near: CAMERA_NEAR,
            camera_far: CAMERA_FAR,
            marker_size: MARKER_SIZE,
            board_marker_span: BOARD_MARKER_SPAN,
            board_extent: BOARD_EXTENT,
            rotation_degrees_per_unit: ROTATION_DEGREES_PER_UNIT,
            parked_position: PARKED_POSITION,
            categories: CategoryTables::default(),
            regions: RegionOffsets::default(),
            region_eye_bias: REGION_EYE_BIAS,
            free_roam_home: FREE_ROAM_HOME,
            free_roam_step: FREE_ROAM_STEP,
            inset_width_ratio: INSET_WIDTH_RATIO,
            inset_height_ratio: INSET_HEIGHT_RATIO,
            inset_top_margin: INSET_TOP_MARGIN,
        }
    }
}

impl OverlayConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("invalid overlay configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that parse but cannot be laid out
    pub fn validate(&self) -> Result<()> {
        for (name, [num, den]) in [
            ("inset_width_ratio", self.inset_width_ratio),
            ("inset_height_ratio", self.inset_height_ratio),
        ] {
            ensure!(den > 0, "{} has a zero denominator", name);
            ensure!(num <= den, "{} {}/{} is larger than the window", name, num, den);
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("while parsing {}", path.display()))
    }

    /// Load `path` if it exists, falling back to defaults on any problem
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("No overlay config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded overlay config from {}", path.display());
                config
            }
            Err(err) => {
                warn!("Ignoring overlay config: {:#}", err);
                Self::default()
            }
        }
    }

    pub fn category_table(&self, category: Category) -> &CategoryTable {
        match category {
            Category::Education => &self.categories.education,
            Category::Employment => &self.categories.employment,
            Category::Demographics => &self.categories.demographics,
            Category::Housing => &self.categories.housing,
        }
    }

    pub fn category_scale(&self, category: Category) -> Vec3 {
        Vec3::from_array(self.category_table(category).scale)
    }

    pub fn slot_offset(&self, category: Category, slot: Slot) -> Vec2 {
        Vec2::from_array(self.category_table(category).slot_offsets[slot.index()])
    }

    /// Anchor offset for a region; `None` has no preset
    pub fn region_offset(&self, region: CameraRegion) -> Option<Vec3> {
        let offset = match region {
            CameraRegion::None => return None,
            CameraRegion::Downtown => self.regions.downtown,
            CameraRegion::MidtownEast => self.regions.midtown_east,
            CameraRegion::MidtownWest => self.regions.midtown_west,
            CameraRegion::Uptown => self.regions.uptown,
        };
        Some(Vec3::from_array(offset))
    }

    pub fn parked_position(&self) -> Vec3 {
        Vec3::from_array(self.parked_position)
    }

    pub fn free_roam_home(&self) -> Vec3 {
        Vec3::from_array(self.free_roam_home)
    }

    /// Board scale so the plane spans `board_marker_span` markers
    pub fn board_scale(&self) -> f32 {
        let [x, z] = self.board_extent;
        self.marker_size * self.board_marker_span / x.max(z)
    }

    pub fn yaw_radians_for(&self, toolbar_x: f32) -> f32 {
        (toolbar_x * self.rotation_degrees_per_unit).to_radians()
    }
}
