// Application state shared by the per-frame reconcile systems
use bevy::prelude::*;

use crate::types::{CameraRegion, DisplayCategory};

/// Independent mode toggles. Any combination may be active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub rotation: bool,
    pub selection: bool,
    pub flying: bool,
}

/// Tracks which region presets have already been entered since the last reset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegionVisits {
    downtown: bool,
    midtown_east: bool,
    midtown_west: bool,
    uptown: bool,
}

impl RegionVisits {
    fn flag_mut(&mut self, region: CameraRegion) -> Option<&mut bool> {
        match region {
            CameraRegion::None => None,
            CameraRegion::Downtown => Some(&mut self.downtown),
            CameraRegion::MidtownEast => Some(&mut self.midtown_east),
            CameraRegion::MidtownWest => Some(&mut self.midtown_west),
            CameraRegion::Uptown => Some(&mut self.uptown),
        }
    }

    pub fn visited(&self, region: CameraRegion) -> bool {
        match region {
            CameraRegion::None => false,
            CameraRegion::Downtown => self.downtown,
            CameraRegion::MidtownEast => self.midtown_east,
            CameraRegion::MidtownWest => self.midtown_west,
            CameraRegion::Uptown => self.uptown,
        }
    }

    /// Marks `region` visited, returning true if this is the first entry
    pub fn enter(&mut self, region: CameraRegion) -> bool {
        if self.visited(region) {
            return false;
        }
        match self.flag_mut(region) {
            Some(flag) => {
                *flag = true;
                true
            }
            None => false,
        }
    }

    pub fn any(&self) -> bool {
        self.downtown || self.midtown_east || self.midtown_west || self.uptown
    }
}

/// Pan/zoom offsets of the overview camera eye
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FreeRoamCamera {
    pub offset: Vec3,
}

/// Everything the UI and keyboard can change, in one place
#[derive(Resource, Clone, Debug)]
pub struct ArState {
    pub modes: ModeFlags,
    pub display: DisplayCategory,
    pub region: CameraRegion,
    pub visits: RegionVisits,
    pub free_roam: FreeRoamCamera,
    /// Yaw applied to the board; replaced (never accumulated) while rotation mode tracks
    pub board_rotation: Quat,
    free_roam_home: Vec3,
}

impl ArState {
    pub fn new(free_roam_home: Vec3) -> Self {
        Self {
            modes: ModeFlags::default(),
            display: DisplayCategory::None,
            region: CameraRegion::None,
            visits: RegionVisits::default(),
            free_roam: FreeRoamCamera { offset: free_roam_home },
            board_rotation: Quat::IDENTITY,
            free_roam_home,
        }
    }

    pub fn home_free_roam(&mut self) {
        self.free_roam.offset = self.free_roam_home;
    }

    /// Leave rotation and selection modes
    pub fn quit_modes(&mut self) {
        self.modes.rotation = false;
        self.modes.selection = false;
    }

    /// Back to the startup state. Callers also clear the region anchor and highlight.
    pub fn reset(&mut self) {
        self.quit_modes();
        self.modes.flying = false;
        self.board_rotation = Quat::IDENTITY;
        self.home_free_roam();
        self.region = CameraRegion::None;
        self.visits = RegionVisits::default();
        self.display = DisplayCategory::None;
    }
}

impl Default for ArState {
    fn default() -> Self {
        Self::new(Vec3::from_array(crate::constants::FREE_ROAM_HOME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn first_entry_is_reported_once() {
        let mut visits = RegionVisits::default();
        assert!(visits.enter(CameraRegion::Uptown));
        assert!(!visits.enter(CameraRegion::Uptown));
        assert!(visits.visited(CameraRegion::Uptown));
        assert!(!visits.visited(CameraRegion::Downtown));
    }

    #[test]
    fn region_none_is_never_visited() {
        let mut visits = RegionVisits::default();
        assert!(!visits.enter(CameraRegion::None));
        assert!(!visits.any());
    }

    #[test]
    fn reset_restores_startup_state() {
        let mut state = ArState::default();
        state.modes = ModeFlags { rotation: true, selection: true, flying: true };
        state.display = DisplayCategory::Shown(Category::Housing);
        state.region = CameraRegion::MidtownEast;
        for region in CameraRegion::SELECTABLE {
            state.visits.enter(region);
        }
        state.free_roam.offset = Vec3::new(15.0, -5.0, 120.0);
        state.board_rotation = Quat::from_rotation_y(0.7);

        state.reset();

        assert_eq!(state.modes, ModeFlags::default());
        assert_eq!(state.display, DisplayCategory::None);
        assert_eq!(state.region, CameraRegion::None);
        assert!(!state.visits.any());
        assert_eq!(state.free_roam.offset, Vec3::new(0.0, 0.0, 200.0));
        assert_eq!(state.board_rotation, Quat::IDENTITY);
    }

    #[test]
    fn quit_leaves_flying_and_display_alone() {
        let mut state = ArState::default();
        state.modes = ModeFlags { rotation: true, selection: true, flying: true };
        state.display = DisplayCategory::Shown(Category::Education);

        state.quit_modes();

        assert!(!state.modes.rotation && !state.modes.selection);
        assert!(state.modes.flying);
        assert_eq!(state.display, DisplayCategory::Shown(Category::Education));
    }
}
