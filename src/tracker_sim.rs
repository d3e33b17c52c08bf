// Simulated marker tracker
//
// Stands in for a camera-based tracker. Runs on its own thread and only ever
// talks to the app through the tracker feed channel.

use bevy::prelude::*;
use crossbeam_channel::Sender;
use noise::{NoiseFn, Perlin};
use rand::Rng;
use std::thread;
use std::time::Duration;

use crate::constants::*;
use crate::tracking::{publish, MarkerSample, Publish, TrackerFeed};
use crate::types::MarkerId;

#[derive(Clone, Debug)]
pub struct SimSettings {
    pub ground_world: Mat4,
    /// Toolbar rest position in the ground marker frame
    pub toolbar_offset: Vec3,
    pub drift: f32,
    pub drift_frequency: f64,
    pub dropout_chance: f64,
    pub dropout_frames: (u32, u32),
    pub frame: Duration,
    pub seed: u32,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            ground_world: Mat4::from_rotation_translation(
                Quat::from_rotation_x(SIM_GROUND_TILT_DEGREES.to_radians()),
                Vec3::from_array(SIM_GROUND_POSITION),
            ),
            toolbar_offset: Vec3::from_array(SIM_TOOLBAR_OFFSET),
            drift: SIM_TOOLBAR_DRIFT,
            drift_frequency: SIM_DRIFT_FREQUENCY,
            dropout_chance: SIM_DROPOUT_CHANCE,
            dropout_frames: (SIM_DROPOUT_FRAMES[0], SIM_DROPOUT_FRAMES[1]),
            frame: Duration::from_millis(SIM_FRAME_MILLIS),
            seed: SIM_NOISE_SEED,
        }
    }
}

/// Toolbar world transform at time `t`, drifting sideways across the board
pub fn toolbar_world(perlin: &Perlin, t: f64, settings: &SimSettings) -> Mat4 {
    // Perlin is zero on integer lattice points, offset the second coordinate
    let noise = perlin.get([t * settings.drift_frequency, 0.5]).clamp(-1.0, 1.0);
    let drift = noise as f32 * settings.drift;
    let local = settings.toolbar_offset + Vec3::new(drift, 0.0, 0.0);
    settings.ground_world * Mat4::from_translation(local)
}

/// Counts down the frames of a toolbar dropout
#[derive(Default, Debug)]
pub struct Dropout {
    remaining: u32,
}

impl Dropout {
    /// Advance one frame, returning whether the toolbar is visible this frame
    pub fn step(&mut self, rng: &mut impl Rng, settings: &SimSettings) -> bool {
        if self.remaining == 0 && rng.gen_bool(settings.dropout_chance.clamp(0.0, 1.0)) {
            let (min, max) = settings.dropout_frames;
            self.remaining = rng.gen_range(min..=max.max(min));
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            false
        } else {
            true
        }
    }
}

/// Tracker loop; returns once the receiving side of the feed is gone
pub fn run_simulated_tracker(sender: Sender<MarkerSample>, settings: SimSettings) {
    let perlin = Perlin::new(settings.seed);
    let mut rng = rand::thread_rng();
    let mut dropout = Dropout::default();
    let mut t = 0.0f64;

    loop {
        let toolbar_found = dropout.step(&mut rng, &settings);
        let samples = [
            MarkerSample {
                marker: MarkerId::Ground,
                found: true,
                world: settings.ground_world,
            },
            MarkerSample {
                marker: MarkerId::Toolbar,
                found: toolbar_found,
                world: toolbar_world(&perlin, t, &settings),
            },
        ];
        for sample in samples {
            // A full feed just loses this frame's sample
            if publish(&sender, sample) == Publish::Disconnected {
                return;
            }
        }

        thread::sleep(settings.frame);
        t += settings.frame.as_secs_f64();
    }
}

/// Startup system: start the simulated tracker on its own thread
pub fn spawn_simulated_tracker(feed: Res<TrackerFeed>) {
    let sender = feed.sender();
    let settings = SimSettings::default();
    let spawned = thread::Builder::new()
        .name("marker-tracker-sim".to_string())
        .spawn(move || {
            run_simulated_tracker(sender, settings);
            warn!("Tracker feed disconnected, simulated tracker stopped");
        });

    match spawned {
        Ok(_) => info!("Simulated marker tracker started"),
        Err(err) => warn!("Could not start simulated tracker: {}", err),
    }
}
