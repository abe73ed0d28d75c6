//! Sensor subscription lifecycle control
//!
//! [`SubscriptionController`] owns the single active stream registration and
//! mediates every start/stop/interval-change request. It is created active
//! (a subscription exists from first render) and tears the registration down
//! on drop, so release is bound to the owning view's lifetime on every exit
//! path.

use crate::accelerometer::{AccelSample, Accelerometer, StreamControl, Subscription};
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender};

/// Named sampling-rate presets, applied stream-wide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingInterval {
    /// One sample per second
    Slow,
    /// ~60 Hz
    Fast,
}

impl SamplingInterval {
    /// Interval between samples in milliseconds
    pub fn millis(self) -> u64 {
        match self {
            SamplingInterval::Slow => 1000,
            SamplingInterval::Fast => 16,
        }
    }
}

impl fmt::Display for SamplingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingInterval::Slow => write!(f, "slow"),
            SamplingInterval::Fast => write!(f, "fast"),
        }
    }
}

impl FromStr for SamplingInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("slow") {
            Ok(SamplingInterval::Slow)
        } else if s.eq_ignore_ascii_case("fast") {
            Ok(SamplingInterval::Fast)
        } else {
            Err(format!("unknown interval preset: {s:?}"))
        }
    }
}

/// Owns the single active accelerometer registration.
///
/// Samples are forwarded to the channel returned by
/// [`SubscriptionController::new`]; the view drains it into its
/// current-reading state at its own cadence. While stopped, emitted samples
/// are never delivered; the registration is gone, not muted.
pub struct SubscriptionController {
    stream: Accelerometer,
    sink: Sender<AccelSample>,
    active: Option<Subscription>,
}

impl SubscriptionController {
    /// Create the controller and immediately start the subscription.
    ///
    /// Returns the receiving end the view layer drains for samples. The
    /// receiver stays valid across stop/start cycles.
    pub fn new(stream: Accelerometer) -> (Self, Receiver<AccelSample>) {
        let (sink, samples) = mpsc::channel();
        let mut controller = Self {
            stream,
            sink,
            active: None,
        };
        controller.start();
        (controller, samples)
    }

    /// Start the subscription if none is active.
    ///
    /// Idempotent: starting while active keeps the existing registration, so
    /// there is never more than one handle.
    pub fn start(&mut self) {
        if self.active.is_some() {
            return;
        }
        let sink = self.sink.clone();
        self.active = Some(self.stream.add_listener(move |sample| {
            if sink.send(sample).is_err() {
                // Receiver gone: the view is being torn down.
                StreamControl::Break
            } else {
                StreamControl::Continue
            }
        }));
    }

    /// Cancel the active subscription. No-op when already stopped.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.active.take() {
            subscription.remove();
        }
    }

    /// Apply a sampling preset to the stream.
    ///
    /// Independent of subscription state: the stream-wide interval changes
    /// immediately and affects future samples of any active registration.
    pub fn set_interval(&self, preset: SamplingInterval) {
        self.stream.set_update_interval(preset.millis());
    }

    /// Whether a subscription is currently active
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for SubscriptionController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accelerometer::SampleSource;
    use crate::error::Result;
    use std::time::Duration;

    struct Constant(AccelSample);

    impl SampleSource for Constant {
        fn sample(&mut self) -> Result<AccelSample> {
            Ok(self.0)
        }
    }

    fn fast_stream(reading: AccelSample) -> Accelerometer {
        let stream = Accelerometer::new(Constant(reading));
        stream.set_update_interval(1);
        stream
    }

    #[test]
    fn active_with_one_handle_after_construction() {
        let stream = fast_stream(AccelSample::default());
        let (controller, samples) = SubscriptionController::new(stream.clone());
        assert!(controller.is_active());
        assert_eq!(stream.active_listeners(), 1);
        drop(samples);
    }

    #[test]
    fn start_is_idempotent() {
        let stream = fast_stream(AccelSample::default());
        let (mut controller, _samples) = SubscriptionController::new(stream.clone());
        controller.start();
        controller.start();
        assert_eq!(stream.active_listeners(), 1);
    }

    #[test]
    fn stop_clears_the_handle_and_is_reentrant() {
        let stream = fast_stream(AccelSample::default());
        let (mut controller, _samples) = SubscriptionController::new(stream.clone());
        controller.stop();
        assert!(!controller.is_active());
        assert_eq!(stream.active_listeners(), 0);
        // no-op when already stopped
        controller.stop();
        assert_eq!(stream.active_listeners(), 0);
    }

    #[test]
    fn handle_count_stays_zero_or_one_over_any_sequence() {
        let stream = fast_stream(AccelSample::default());
        let (mut controller, _samples) = SubscriptionController::new(stream.clone());
        for step in 0..20 {
            if step % 3 == 0 {
                controller.start();
            } else {
                controller.stop();
            }
            assert!(stream.active_listeners() <= 1);
            assert_eq!(stream.active_listeners(), controller.is_active() as usize);
        }
    }

    #[test]
    fn drop_tears_down_the_subscription() {
        let stream = fast_stream(AccelSample::default());
        let samples = {
            let (controller, samples) = SubscriptionController::new(stream.clone());
            assert!(controller.is_active());
            samples
        };
        assert_eq!(stream.active_listeners(), 0);
        drop(samples);
    }

    #[test]
    fn set_interval_is_last_writer_wins_in_any_state() {
        let stream = fast_stream(AccelSample::default());
        let (mut controller, _samples) = SubscriptionController::new(stream.clone());

        controller.set_interval(SamplingInterval::Slow);
        controller.set_interval(SamplingInterval::Fast);
        assert_eq!(stream.update_interval(), 16);

        controller.stop();
        controller.set_interval(SamplingInterval::Slow);
        assert_eq!(stream.update_interval(), 1000);
    }

    #[test]
    fn sample_reaches_the_view_while_active() {
        let reading = AccelSample {
            x: 0.01,
            y: -0.02,
            z: 0.98,
        };
        let stream = fast_stream(reading);
        let (_controller, samples) = SubscriptionController::new(stream);

        let received = samples.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(received, reading);
    }

    #[test]
    fn no_samples_reach_the_view_while_stopped() {
        let stream = fast_stream(AccelSample::default());
        let (mut controller, samples) = SubscriptionController::new(stream);

        samples.recv_timeout(Duration::from_secs(2)).unwrap();
        controller.stop();

        // stop() joins the delivery thread, so after a drain nothing new can
        // arrive.
        while samples.try_recv().is_ok() {}
        assert!(samples.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn samples_flow_again_after_restart() {
        let stream = fast_stream(AccelSample::default());
        let (mut controller, samples) = SubscriptionController::new(stream);

        controller.stop();
        while samples.try_recv().is_ok() {}

        controller.start();
        assert!(samples.recv_timeout(Duration::from_secs(2)).is_ok());
    }

    #[test]
    fn preset_millis_and_parsing() {
        assert_eq!(SamplingInterval::Slow.millis(), 1000);
        assert_eq!(SamplingInterval::Fast.millis(), 16);
        assert_eq!("slow".parse::<SamplingInterval>().unwrap(), SamplingInterval::Slow);
        assert_eq!("FAST".parse::<SamplingInterval>().unwrap(), SamplingInterval::Fast);
        assert!("medium".parse::<SamplingInterval>().is_err());
        assert_eq!(SamplingInterval::Slow.to_string(), "slow");
    }
}
