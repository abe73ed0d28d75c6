//! Accelerometer stream capability
//!
//! Push-based delivery of acceleration samples: register a listener with
//! [`Accelerometer::add_listener`] and receive one [`AccelSample`] per tick of
//! the stream's update interval on a background delivery thread. The interval
//! is stream-wide state with last-writer-wins semantics: changing it takes
//! effect on the next tick of any active registration, no restart needed.
//!
//! The physical device behind the stream sits behind the [`SampleSource`]
//! trait; [`SimulatedMotion`] provides a deterministic software source.

use crate::error::Result;
use log::warn;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Stream update interval until a preset is applied, in milliseconds.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 100;

/// Control flow for listener callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamControl {
    /// Keep delivering samples
    Continue,
    /// End this registration
    Break,
}

/// One acceleration reading, per axis, in g (1 g = 9.81 m/s²)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccelSample {
    /// Acceleration along the X axis (g)
    pub x: f32,
    /// Acceleration along the Y axis (g)
    pub y: f32,
    /// Acceleration along the Z axis (g)
    pub z: f32,
}

impl AccelSample {
    /// Magnitude of the acceleration vector in g
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// A device that can produce acceleration readings on demand.
///
/// Implementations are polled once per tick by the delivery thread. An `Err`
/// return ends delivery for that registration; the stream itself stays usable.
pub trait SampleSource {
    /// Read the current acceleration
    fn sample(&mut self) -> Result<AccelSample>;
}

/// Software sample source: a slow tilt sway around the resting orientation.
///
/// Deterministic in elapsed time, so two sources created together produce the
/// same motion. Resting reading is (0, 0, 1): gravity on the Z axis.
pub struct SimulatedMotion {
    start: Instant,
}

impl SimulatedMotion {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SimulatedMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for SimulatedMotion {
    fn sample(&mut self) -> Result<AccelSample> {
        let t = self.start.elapsed().as_secs_f32();
        // ~0.05 g sway on X/Y at slightly different periods, Z keeps |a| ≈ 1 g
        let x = 0.05 * (0.7 * t).sin();
        let y = 0.05 * (0.9 * t + 1.3).sin();
        let z = (1.0 - x * x - y * y).max(0.0).sqrt();
        Ok(AccelSample { x, y, z })
    }
}

struct StreamShared {
    /// Update interval in ms. Read every tick by delivery threads.
    interval_ms: AtomicU64,
    /// Live delivery threads
    listeners: AtomicUsize,
    source: Mutex<Box<dyn SampleSource + Send>>,
}

/// The accelerometer stream.
///
/// Cheap to clone; all clones share the same source and update interval.
#[derive(Clone)]
pub struct Accelerometer {
    shared: Arc<StreamShared>,
}

impl Accelerometer {
    /// Create a stream over the given sample source.
    pub fn new(source: impl SampleSource + Send + 'static) -> Self {
        Self {
            shared: Arc::new(StreamShared {
                interval_ms: AtomicU64::new(DEFAULT_UPDATE_INTERVAL_MS),
                listeners: AtomicUsize::new(0),
                source: Mutex::new(Box::new(source)),
            }),
        }
    }

    /// Set the stream-wide update interval in milliseconds.
    ///
    /// Last-writer-wins: the value applies to every active registration on its
    /// next tick, whether or not a registration exists when it is set. Clamped
    /// to at least 1 ms.
    pub fn set_update_interval(&self, millis: u64) {
        self.shared.interval_ms.store(millis.max(1), Ordering::SeqCst);
    }

    /// Currently configured update interval in milliseconds
    pub fn update_interval(&self) -> u64 {
        self.shared.interval_ms.load(Ordering::SeqCst)
    }

    /// Number of registrations with a live delivery thread
    pub fn active_listeners(&self) -> usize {
        self.shared.listeners.load(Ordering::SeqCst)
    }

    /// Register a listener and start delivering samples to it.
    ///
    /// Spawns the delivery thread: each tick it reads one sample from the
    /// source and hands it to `callback`. Delivery ends when the returned
    /// [`Subscription`] is removed (or dropped), when the callback returns
    /// [`StreamControl::Break`], or when the source fails. A source failure is
    /// logged but not surfaced, so a missing device reads as a frozen value.
    pub fn add_listener<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(AccelSample) -> StreamControl + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let shared = self.shared.clone();
        shared.listeners.fetch_add(1, Ordering::SeqCst);

        let thread = thread::spawn(move || {
            loop {
                let tick = Duration::from_millis(shared.interval_ms.load(Ordering::Relaxed).max(1));

                // The stop channel doubles as the tick timer, so removal is
                // prompt even at the slow preset.
                match stop_rx.recv_timeout(tick) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {}
                }

                let sample = match shared.source.lock() {
                    Ok(mut source) => source.sample(),
                    Err(_) => break, // poisoned: a sampling panic elsewhere
                };

                match sample {
                    Ok(sample) => {
                        if callback(sample) == StreamControl::Break {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("accelerometer source failed, ending delivery: {e}");
                        break;
                    }
                }
            }
            shared.listeners.fetch_sub(1, Ordering::SeqCst);
        });

        Subscription {
            stop_tx,
            thread: Some(thread),
        }
    }
}

/// Handle for one active stream registration.
///
/// Exists from registration until cancelled; used only to cancel. Dropping the
/// handle cancels the registration the same way [`Subscription::remove`] does.
pub struct Subscription {
    stop_tx: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Subscription {
    /// Cancel the registration and wait for its delivery thread to end.
    pub fn remove(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        // Send fails only if the thread already exited on its own.
        let _ = self.stop_tx.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SensorError;

    /// Source that always returns the same reading
    struct Constant(AccelSample);

    impl SampleSource for Constant {
        fn sample(&mut self) -> Result<AccelSample> {
            Ok(self.0)
        }
    }

    /// Source that fails after a fixed number of reads
    struct FailsAfter(usize);

    impl SampleSource for FailsAfter {
        fn sample(&mut self) -> Result<AccelSample> {
            if self.0 == 0 {
                return Err(SensorError::DeviceUnavailable);
            }
            self.0 -= 1;
            Ok(AccelSample::default())
        }
    }

    fn fast_stream(source: impl SampleSource + Send + 'static) -> Accelerometer {
        let stream = Accelerometer::new(source);
        stream.set_update_interval(1);
        stream
    }

    #[test]
    fn delivers_samples_to_listener() {
        let reading = AccelSample {
            x: 0.01,
            y: -0.02,
            z: 0.98,
        };
        let stream = fast_stream(Constant(reading));
        let (tx, rx) = mpsc::channel();

        let subscription = stream.add_listener(move |sample| {
            let _ = tx.send(sample);
            StreamControl::Continue
        });

        let received = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(received, reading);
        subscription.remove();
    }

    #[test]
    fn remove_stops_delivery() {
        let stream = fast_stream(Constant(AccelSample::default()));
        let (tx, rx) = mpsc::channel();

        let subscription = stream.add_listener(move |sample| {
            let _ = tx.send(sample);
            StreamControl::Continue
        });
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        subscription.remove();
        assert_eq!(stream.active_listeners(), 0);

        // Anything still in flight was sent before the remove; after draining,
        // nothing new arrives.
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn drop_cancels_like_remove() {
        let stream = fast_stream(Constant(AccelSample::default()));
        {
            let _subscription = stream.add_listener(|_| StreamControl::Continue);
            assert_eq!(stream.active_listeners(), 1);
        }
        assert_eq!(stream.active_listeners(), 0);
    }

    #[test]
    fn callback_break_ends_registration() {
        let stream = fast_stream(Constant(AccelSample::default()));
        let subscription = stream.add_listener(|_| StreamControl::Break);

        let deadline = Instant::now() + Duration::from_secs(2);
        while stream.active_listeners() > 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(stream.active_listeners(), 0);
        drop(subscription);
    }

    #[test]
    fn source_failure_ends_delivery_silently() {
        let stream = fast_stream(FailsAfter(3));
        let (tx, rx) = mpsc::channel();
        let subscription = stream.add_listener(move |sample| {
            let _ = tx.send(sample);
            StreamControl::Continue
        });

        // Three good reads, then the source dies and the thread exits.
        for _ in 0..3 {
            rx.recv_timeout(Duration::from_secs(2)).unwrap();
        }
        let deadline = Instant::now() + Duration::from_secs(2);
        while stream.active_listeners() > 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(stream.active_listeners(), 0);
        drop(subscription);
    }

    #[test]
    fn interval_is_last_writer_wins() {
        let stream = Accelerometer::new(Constant(AccelSample::default()));
        assert_eq!(stream.update_interval(), DEFAULT_UPDATE_INTERVAL_MS);
        stream.set_update_interval(1000);
        stream.set_update_interval(16);
        assert_eq!(stream.update_interval(), 16);
    }

    #[test]
    fn interval_clamped_to_one_ms() {
        let stream = Accelerometer::new(Constant(AccelSample::default()));
        stream.set_update_interval(0);
        assert_eq!(stream.update_interval(), 1);
    }

    #[test]
    fn clones_share_interval() {
        let stream = Accelerometer::new(Constant(AccelSample::default()));
        let clone = stream.clone();
        clone.set_update_interval(16);
        assert_eq!(stream.update_interval(), 16);
    }

    #[test]
    fn simulated_motion_is_near_one_g() {
        let mut source = SimulatedMotion::new();
        let sample = source.sample().unwrap();
        assert!((sample.magnitude() - 1.0).abs() < 0.01);
    }

    #[test]
    fn magnitude_of_unit_axes() {
        let sample = AccelSample {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        };
        assert!((sample.magnitude() - 1.0).abs() < f32::EPSILON);
    }
}
