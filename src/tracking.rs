// Marker tracking adapter
//
// Trackers may run on their own threads, but they never write to the scene.
// They push samples into a bounded channel without blocking; the frame thread
// drains it in PreUpdate, so every Update system sees one consistent snapshot
// per frame.

use bevy::prelude::*;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::constants::TRACKER_FEED_CAPACITY;
use crate::types::{MarkerId, MarkerNode};

pub struct TrackingPlugin;

impl Plugin for TrackingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MarkerTracking>()
            .insert_resource(TrackerFeed::new())
            .add_systems(PreUpdate, (ingest_tracker_samples, apply_marker_nodes).chain());
    }
}

/// One tracker report for one marker
#[derive(Clone, Copy, Debug)]
pub struct MarkerSample {
    pub marker: MarkerId,
    pub found: bool,
    pub world: Mat4,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedMarker {
    pub found: bool,
    /// Last known world transform; kept while the marker is lost
    pub world: Mat4,
}

impl Default for TrackedMarker {
    fn default() -> Self {
        Self { found: false, world: Mat4::IDENTITY }
    }
}

/// Latest tracking state of every marker, as of this frame
#[derive(Resource, Default, Debug)]
pub struct MarkerTracking {
    ground: TrackedMarker,
    toolbar: TrackedMarker,
}

impl MarkerTracking {
    pub fn get(&self, marker: MarkerId) -> &TrackedMarker {
        match marker {
            MarkerId::Ground => &self.ground,
            MarkerId::Toolbar => &self.toolbar,
        }
    }

    pub fn found(&self, marker: MarkerId) -> bool {
        self.get(marker).found
    }

    pub fn world_transform(&self, marker: MarkerId) -> Mat4 {
        self.get(marker).world
    }

    pub fn apply(&mut self, sample: MarkerSample) {
        let slot = match sample.marker {
            MarkerId::Ground => &mut self.ground,
            MarkerId::Toolbar => &mut self.toolbar,
        };
        slot.found = sample.found;
        // A lost marker reports no usable pose
        if sample.found {
            slot.world = sample.world;
        }
    }
}

/// Channel between tracker threads and the frame thread
#[derive(Resource)]
pub struct TrackerFeed {
    sender: Sender<MarkerSample>,
    receiver: Receiver<MarkerSample>,
}

impl TrackerFeed {
    pub fn new() -> Self {
        Self::with_capacity(TRACKER_FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Handle for a tracker thread
    pub fn sender(&self) -> Sender<MarkerSample> {
        self.sender.clone()
    }
}

impl Default for TrackerFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of offering one sample to the feed
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Publish {
    Sent,
    /// Feed is full; the sample is dropped and the tracker carries on
    Dropped,
    /// The app side is gone
    Disconnected,
}

/// Non-blocking send used by tracker threads
pub fn publish(sender: &Sender<MarkerSample>, sample: MarkerSample) -> Publish {
    match sender.try_send(sample) {
        Ok(()) => Publish::Sent,
        Err(TrySendError::Full(_)) => Publish::Dropped,
        Err(TrySendError::Disconnected(_)) => Publish::Disconnected,
    }
}

/// Drain pending samples; the newest sample per marker wins
pub fn ingest_tracker_samples(feed: Res<TrackerFeed>, mut tracking: ResMut<MarkerTracking>) {
    let mut drained = 0usize;
    for sample in feed.receiver.try_iter() {
        tracking.apply(sample);
        drained += 1;
    }
    if drained > 0 {
        debug!("Ingested {} tracker samples", drained);
    }
}

/// Mirror tracked poses onto the marker nodes of the scene
pub fn apply_marker_nodes(
    tracking: Res<MarkerTracking>,
    mut nodes: Query<(&MarkerNode, &mut Transform)>,
) {
    for (node, mut transform) in nodes.iter_mut() {
        let tracked = Transform::from_matrix(tracking.world_transform(node.0));
        transform.set_if_neq(tracked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(marker: MarkerId, found: bool, x: f32) -> MarkerSample {
        MarkerSample { marker, found, world: Mat4::from_translation(Vec3::new(x, 0.0, 0.0)) }
    }

    fn tracking_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(TrackingPlugin);
        app
    }

    #[test]
    fn lost_marker_keeps_last_pose() {
        let mut tracking = MarkerTracking::default();
        tracking.apply(sample(MarkerId::Toolbar, true, 4.0));
        tracking.apply(sample(MarkerId::Toolbar, false, 99.0));

        assert!(!tracking.found(MarkerId::Toolbar));
        assert_eq!(tracking.world_transform(MarkerId::Toolbar).w_axis.x, 4.0);
    }

    #[test]
    fn newest_sample_wins_within_a_frame() {
        let mut app = tracking_app();
        let sender = app.world().resource::<TrackerFeed>().sender();
        sender.send(sample(MarkerId::Ground, true, 1.0)).unwrap();
        sender.send(sample(MarkerId::Ground, true, 2.0)).unwrap();
        sender.send(sample(MarkerId::Toolbar, true, 7.0)).unwrap();

        app.update();

        let tracking = app.world().resource::<MarkerTracking>();
        assert_eq!(tracking.world_transform(MarkerId::Ground).w_axis.x, 2.0);
        assert!(tracking.found(MarkerId::Toolbar));
    }

    #[test]
    fn samples_from_another_thread_reach_marker_nodes() {
        let mut app = tracking_app();
        let node = app
            .world_mut()
            .spawn((MarkerNode(MarkerId::Toolbar), Transform::default()))
            .id();
        let sender = app.world().resource::<TrackerFeed>().sender();

        std::thread::spawn(move || {
            sender.send(sample(MarkerId::Toolbar, true, 12.5)).unwrap();
        })
        .join()
        .unwrap();

        app.update();

        let transform = app.world().get::<Transform>(node).unwrap();
        assert_eq!(transform.translation, Vec3::new(12.5, 0.0, 0.0));
    }

    #[test]
    fn full_feed_drops_samples_without_blocking() {
        let feed = TrackerFeed::with_capacity(2);
        let sender = feed.sender();

        assert_eq!(publish(&sender, sample(MarkerId::Ground, true, 1.0)), Publish::Sent);
        assert_eq!(publish(&sender, sample(MarkerId::Ground, true, 2.0)), Publish::Sent);
        assert_eq!(publish(&sender, sample(MarkerId::Ground, true, 3.0)), Publish::Dropped);
        assert_eq!(feed.receiver.len(), 2);

        drop(feed);
        assert_eq!(publish(&sender, sample(MarkerId::Ground, true, 4.0)), Publish::Disconnected);
    }

    #[test]
    fn draining_frees_room_for_new_samples() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<MarkerTracking>()
            .insert_resource(TrackerFeed::with_capacity(1))
            .add_systems(PreUpdate, ingest_tracker_samples);
        let sender = app.world().resource::<TrackerFeed>().sender();

        assert_eq!(publish(&sender, sample(MarkerId::Toolbar, true, 1.0)), Publish::Sent);
        assert_eq!(publish(&sender, sample(MarkerId::Toolbar, true, 2.0)), Publish::Dropped);
        app.update();
        assert_eq!(publish(&sender, sample(MarkerId::Toolbar, true, 3.0)), Publish::Sent);
        app.update();

        let tracking = app.world().resource::<MarkerTracking>();
        assert_eq!(tracking.world_transform(MarkerId::Toolbar).w_axis.x, 3.0);
    }

    #[test]
    fn no_samples_is_not_an_error() {
        let mut app = tracking_app();
        app.update();
        let tracking = app.world().resource::<MarkerTracking>();
        assert!(!tracking.found(MarkerId::Ground));
        assert!(!tracking.found(MarkerId::Toolbar));
    }
}
