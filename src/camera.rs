//! Camera capability: facing selection, permission gate, preview frames
//!
//! The screen consumes the camera through three small pieces: which way the
//! device is pointing ([`CameraFacing`]), whether the app may use it at all
//! ([`PermissionGate`]), and a producer of preview frames. The frame producer
//! here is [`TestPatternCamera`], a deterministic software feed; a real device
//! backend would replace it behind the same frame contract.

use std::fmt;
use std::time::Duration;

/// Which camera the preview shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CameraFacing {
    /// Rear camera (initial)
    #[default]
    Back,
    /// Selfie camera
    Front,
}

impl CameraFacing {
    /// The other camera. Flipping twice returns the original value.
    pub fn flipped(self) -> Self {
        match self {
            CameraFacing::Back => CameraFacing::Front,
            CameraFacing::Front => CameraFacing::Back,
        }
    }
}

impl fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraFacing::Back => write!(f, "back"),
            CameraFacing::Front => write!(f, "front"),
        }
    }
}

/// Camera access permission state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// The user has not been asked yet
    NotDetermined,
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

/// Check/request pair for camera permission.
///
/// Denial is never fatal: the screen keeps showing the request prompt and
/// `request` may be called again.
#[derive(Debug)]
pub struct PermissionGate {
    status: PermissionStatus,
    deny: bool,
}

impl PermissionGate {
    /// A gate that grants on the first request
    pub fn new() -> Self {
        Self {
            status: PermissionStatus::NotDetermined,
            deny: false,
        }
    }

    /// A gate that denies every request
    pub fn denying() -> Self {
        Self {
            status: PermissionStatus::NotDetermined,
            deny: true,
        }
    }

    /// Current permission state, without prompting
    pub fn status(&self) -> PermissionStatus {
        self.status
    }

    /// Ask for camera access and return the resulting state.
    pub fn request(&mut self) -> PermissionStatus {
        self.status = if self.deny {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        };
        self.status
    }
}

impl Default for PermissionGate {
    fn default() -> Self {
        Self::new()
    }
}

/// One RGBA8 preview frame
pub struct PreviewFrame {
    pub width: usize,
    pub height: usize,
    /// `width * height * 4` bytes, row-major
    pub pixels: Vec<u8>,
}

/// Software preview feed: an animated gradient test pattern.
///
/// Deterministic in elapsed time. The front-facing frame is horizontally
/// mirrored (selfie previews mirror) and warm-tinted so the flip control has
/// a visible effect.
pub struct TestPatternCamera {
    width: usize,
    height: usize,
}

impl TestPatternCamera {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Produce the preview frame for the given facing at the given time.
    pub fn frame(&self, facing: CameraFacing, elapsed: Duration) -> PreviewFrame {
        let (w, h) = (self.width, self.height);
        let t = elapsed.as_secs_f32();
        let mut pixels = Vec::with_capacity(w * h * 4);

        for y in 0..h {
            for x in 0..w {
                let sx = match facing {
                    CameraFacing::Back => x,
                    CameraFacing::Front => w - 1 - x, // mirror
                };
                let u = sx as f32 / w.max(1) as f32;
                let v = y as f32 / h.max(1) as f32;

                // diagonal sweep keeps the "live" preview visibly moving
                let sweep = (((u + v) * 4.0 - t).sin() * 0.5 + 0.5) * 50.0;
                let (mut r, g, mut b) = (
                    35.0 + 140.0 * u + sweep,
                    35.0 + 140.0 * v + sweep,
                    80.0 + 2.0 * sweep,
                );
                if facing == CameraFacing::Front {
                    r += 30.0;
                    b -= 20.0;
                }

                pixels.push(r.clamp(0.0, 255.0) as u8);
                pixels.push(g.clamp(0.0, 255.0) as u8);
                pixels.push(b.clamp(0.0, 255.0) as u8);
                pixels.push(255);
            }
        }

        PreviewFrame {
            width: w,
            height: h,
            pixels,
        }
    }
}
