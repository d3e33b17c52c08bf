// Window and camera settings
pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;
pub const MAIN_CAMERA_TRANSLATION: [f32; 3] = [0.0, -30.0, -100.0];
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 2000.0;

// Marker geometry
pub const MARKER_SIZE: f32 = 32.4;           // Physical marker edge length, tracker units
pub const BOARD_MARKER_SPAN: f32 = 5.0;      // Board is scaled to cover this many markers
pub const BOARD_EXTENT: [f32; 2] = [200.0, 250.0]; // Unscaled textured plane size

// Board rotation driven by the toolbar marker
pub const ROTATION_DEGREES_PER_UNIT: f32 = 6.0;

/// Off-screen position used to park hidden physics bodies
pub const PARKED_POSITION: [f32; 3] = [-400.0, -400.0, -400.0];

// Category placement tables: uniform scale followed by a per-slot (x, y) offset
pub const EDUCATION_SCALE: [f32; 3] = [0.001, 0.001, 0.001];
pub const EMPLOYMENT_SCALE: [f32; 3] = [0.04, 0.04, 0.04];
pub const DEMOGRAPHICS_SCALE: [f32; 3] = [0.0008, 0.0008, 0.0008];
pub const HOUSING_SCALE: [f32; 3] = [0.0013, 0.0013, 0.0013];

pub const SHARED_SLOT_OFFSETS: [[f32; 2]; 4] = [
    [-20.0, -27.0],
    [-6.0, -55.0],
    [-11.0, -43.0],
    [-33.0, -67.0],
];
// Housing blocks sit slightly to the right of the others
pub const HOUSING_SLOT_OFFSETS: [[f32; 2]; 4] = [
    [-18.0, -26.0],
    [-4.0, -55.0],
    [-9.0, -43.0],
    [-31.0, -67.0],
];

// Camera regions (offsets applied to the region anchor node)
pub const DOWNTOWN_OFFSET: [f32; 3] = [-10.0, -50.0, 20.0];
pub const MIDTOWN_EAST_OFFSET: [f32; 3] = [-15.0, 0.0, 0.0];
pub const MIDTOWN_WEST_OFFSET: [f32; 3] = [15.0, 0.0, 0.0];
pub const UPTOWN_OFFSET: [f32; 3] = [30.0, 35.0, 0.0];
pub const REGION_EYE_BIAS: [f32; 2] = [-60.0, -160.0]; // (y, z) added to the free-roam eye

// Free-roam camera
pub const FREE_ROAM_HOME: [f32; 3] = [0.0, 0.0, 200.0];
pub const FREE_ROAM_STEP: f32 = 5.0;

// Overview inset, integer ratios of the window size
pub const INSET_WIDTH_RATIO: [u32; 2] = [2, 7];
pub const INSET_HEIGHT_RATIO: [u32; 2] = [2, 6];
pub const INSET_TOP_MARGIN: u32 = 30;

// Render layer carrying the live camera background (main pass only)
pub const LIVE_FEED_LAYER: usize = 1;

pub const CONFIG_PATH: &str = "assets/overlay.toml";

// Tracker feed: samples buffered between frames before new ones are dropped
pub const TRACKER_FEED_CAPACITY: usize = 64;

// Simulated tracker (demo input when no camera tracker is attached)
pub const SIM_GROUND_POSITION: [f32; 3] = [0.0, -80.0, -350.0];
pub const SIM_GROUND_TILT_DEGREES: f32 = -60.0;  // Tilt of the table away from the camera
pub const SIM_TOOLBAR_OFFSET: [f32; 3] = [0.0, -60.0, 10.0]; // In the ground marker frame
pub const SIM_TOOLBAR_DRIFT: f32 = 15.0;         // Max toolbar x drift, +/- 90 degrees of yaw
pub const SIM_DRIFT_FREQUENCY: f64 = 0.2;        // Noise samples per second of drift
pub const SIM_DROPOUT_CHANCE: f64 = 0.01;        // Per frame
pub const SIM_DROPOUT_FRAMES: [u32; 2] = [10, 60];
pub const SIM_FRAME_MILLIS: u64 = 33;
pub const SIM_NOISE_SEED: u32 = 7;
