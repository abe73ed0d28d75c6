//! Camera + accelerometer panel library
//!
//! Building blocks for a small device-dashboard screen: a live camera preview
//! with a front/back toggle, and an accelerometer panel with a
//! subscribe/unsubscribe control and slow/fast sampling presets. The core
//! piece is the subscription lifecycle controller; the camera and motion
//! stream are capability seams with software implementations behind them.
//!
//! # Quick Start
//!
//! ## Subscription-driven readout
//! ```
//! use motion_viewfinder::{Accelerometer, SamplingInterval, SimulatedMotion, SubscriptionController};
//!
//! let stream = Accelerometer::new(SimulatedMotion::new());
//! stream.set_update_interval(SamplingInterval::Fast.millis());
//!
//! // Active from creation; samples arrive on the returned channel.
//! let (controller, samples) = SubscriptionController::new(stream);
//! let sample = samples.recv().expect("first sample");
//! println!("x: {:+.3} g  y: {:+.3} g  z: {:+.3} g", sample.x, sample.y, sample.z);
//!
//! // Dropping the controller cancels the subscription.
//! drop(controller);
//! ```
//!
//! ## Toggling and rate presets
//! ```
//! use motion_viewfinder::{Accelerometer, SamplingInterval, SimulatedMotion, SubscriptionController};
//!
//! let stream = Accelerometer::new(SimulatedMotion::new());
//! let (mut controller, _samples) = SubscriptionController::new(stream);
//!
//! controller.stop();                                  // panel toggled "Off"
//! controller.set_interval(SamplingInterval::Slow);    // allowed while stopped
//! controller.start();                                 // back "On", slow rate applies
//! ```
//!
//! ## Raw listener with stream control
//! ```
//! use motion_viewfinder::{Accelerometer, SimulatedMotion, StreamControl};
//!
//! let stream = Accelerometer::new(SimulatedMotion::new());
//! stream.set_update_interval(16);
//!
//! let subscription = stream.add_listener(|sample| {
//!     if sample.magnitude() > 3.0 {
//!         StreamControl::Break // stop on impact
//!     } else {
//!         StreamControl::Continue
//!     }
//! });
//! subscription.remove();
//! ```

pub mod accelerometer;
pub mod camera;
pub mod common;
pub mod error;
pub mod subscription;

// Re-export public API
pub use accelerometer::{
    AccelSample, Accelerometer, SampleSource, SimulatedMotion, StreamControl, Subscription,
    DEFAULT_UPDATE_INTERVAL_MS,
};
pub use camera::{CameraFacing, PermissionGate, PermissionStatus, PreviewFrame, TestPatternCamera};
pub use common::{create_bar, TimeKeeper};
pub use error::{Result, SensorError};
pub use subscription::{SamplingInterval, SubscriptionController};
