use bevy::prelude::*;

/// Data category a block instance belongs to
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    Education,
    Employment,
    Demographics,
    Housing,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Education,
        Category::Employment,
        Category::Demographics,
        Category::Housing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Education => "Education",
            Category::Employment => "Employment",
            Category::Demographics => "Demographics",
            Category::Housing => "Housing",
        }
    }

    /// Model file stem under `assets/models/`
    pub fn model_stem(self) -> &'static str {
        match self {
            Category::Education => "education",
            Category::Employment => "employment",
            Category::Demographics => "demographics",
            Category::Housing => "housing",
        }
    }
}

/// Which category is currently on display. At most one at a time.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DisplayCategory {
    #[default]
    None,
    Shown(Category),
}

impl DisplayCategory {
    pub fn shows(self, category: Category) -> bool {
        self == DisplayCategory::Shown(category)
    }
}

/// Slot position within a category, 1-based like the printed legend
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Slot(u8);

impl Slot {
    pub const FIRST: Slot = Slot(1);
    pub const ALL: [Slot; 4] = [Slot(1), Slot(2), Slot(3), Slot(4)];

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

/// Named free-roam camera preset
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum CameraRegion {
    #[default]
    None,
    Downtown,
    MidtownEast,
    MidtownWest,
    Uptown,
}

impl CameraRegion {
    pub const SELECTABLE: [CameraRegion; 4] = [
        CameraRegion::Downtown,
        CameraRegion::MidtownEast,
        CameraRegion::MidtownWest,
        CameraRegion::Uptown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CameraRegion::None => "None",
            CameraRegion::Downtown => "Downtown",
            CameraRegion::MidtownEast => "MidtownEast",
            CameraRegion::MidtownWest => "MidtownWest",
            CameraRegion::Uptown => "Uptown",
        }
    }
}

/// Tracked fiducial marker arrays
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MarkerId {
    Ground,
    Toolbar,
}

// ===== COMPONENTS =====

/// Scene node whose transform mirrors a tracked marker
#[derive(Component)]
pub struct MarkerNode(pub MarkerId);

/// One of the 16 category block instances
#[derive(Component, Clone, Copy, Debug)]
pub struct CategoryInstance {
    pub category: Category,
    pub slot: Slot,
}

/// Physics body transform, relative to the ground marker
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PhysicsPose(pub Mat4);

impl Default for PhysicsPose {
    fn default() -> Self {
        Self(Mat4::IDENTITY)
    }
}

/// Material alpha, 0 = hidden, 1 = fully drawn
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Opacity(pub f32);

/// The tracked physical map surface
#[derive(Component)]
pub struct AnchorBoard {
    pub scale: f32,
}

/// Pyramid that follows the toolbar marker in selection mode
#[derive(Component)]
pub struct HighlightObject;

/// Node between the ground marker and the overview camera, moved by region presets
#[derive(Component)]
pub struct RegionAnchor;

#[derive(Component)]
pub struct MainArCamera;

#[derive(Component)]
pub struct OverviewCamera;

/// Quad showing the live video feed behind the AR scene
#[derive(Component)]
pub struct LiveFeedBackground;
