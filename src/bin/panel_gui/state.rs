//! Panel state management

use motion_viewfinder::{
    AccelSample, Accelerometer, CameraFacing, PermissionGate, SimulatedMotion,
    SubscriptionController, TestPatternCamera,
};
use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use std::time::Instant;

/// Preview resolution of the software camera feed
const PREVIEW_WIDTH: usize = 480;
const PREVIEW_HEIGHT: usize = 520;

/// How much trace history to keep (~80 s at the fast preset)
const HISTORY_CAPACITY: usize = 5000;

/// Main panel state
pub struct PanelState {
    /// Camera side: facing, permission, and the preview feed
    pub facing: CameraFacing,
    pub permissions: PermissionGate,
    pub camera: TestPatternCamera,

    /// Sensor side: the stream, the one subscription, and the view data
    pub stream: Accelerometer,
    pub controller: SubscriptionController,
    pub samples: Receiver<AccelSample>,
    pub latest: AccelSample,
    pub history: SampleHistory,

    /// Origin for preview animation and sample timestamps
    pub started: Instant,
}

impl PanelState {
    pub fn new() -> Self {
        let stream = Accelerometer::new(SimulatedMotion::new());
        // Subscription is live from first frame; the panel toggle flips it.
        let (controller, samples) = SubscriptionController::new(stream.clone());

        Self {
            facing: CameraFacing::default(),
            permissions: PermissionGate::new(),
            camera: TestPatternCamera::new(PREVIEW_WIDTH, PREVIEW_HEIGHT),
            stream,
            controller,
            samples,
            latest: AccelSample::default(),
            history: SampleHistory::new(HISTORY_CAPACITY),
            started: Instant::now(),
        }
    }
}

/// Rolling buffer of timestamped samples for the trace plot
pub struct SampleHistory {
    data: VecDeque<(f64, AccelSample)>,
    max_samples: usize,
}

impl SampleHistory {
    pub fn new(max_samples: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(max_samples),
            max_samples,
        }
    }

    pub fn push(&mut self, timestamp: f64, sample: AccelSample) {
        if self.data.len() >= self.max_samples {
            self.data.pop_front();
        }
        self.data.push_back((timestamp, sample));
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Samples within the last `window_secs` seconds
    pub fn window(&self, window_secs: f64) -> Vec<(f64, AccelSample)> {
        let Some(&(latest, _)) = self.data.back() else {
            return Vec::new();
        };
        let cutoff = latest - window_secs;

        self.data
            .iter()
            .filter(|(timestamp, _)| *timestamp >= cutoff)
            .copied()
            .collect()
    }
}
