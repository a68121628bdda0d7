//! Frame throttling and superseding deferred work
//!
//! `FrameGate` allows at most one pending animation-frame callback.
//! `Generation` lets a newer trigger invalidate a revert that is still
//! waiting on its timer.

/// One-pending-frame guard for a high-frequency signal
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameGate {
    queued: bool,
}

impl FrameGate {
    /// Returns true if the caller must request a frame now.
    pub fn request(&mut self) -> bool {
        if self.queued {
            return false;
        }
        self.queued = true;
        true
    }

    /// Called at the start of the frame callback.
    pub fn release(&mut self) {
        self.queued = false;
    }
}

/// Monotonic counter; only the latest ticket is current
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    /// Invalidate all earlier tickets and return the new one
    pub fn bump(&mut self) -> Generation {
        self.0 += 1;
        *self
    }

    pub fn is_current(&self, ticket: Generation) -> bool {
        self.0 == ticket.0
    }
}

/// Work to run after a delay
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredTask {
    /// Put the theme toggle icon back to `rotate(0deg)`
    ResetThemeSpin(Generation),
    /// Drop the click-pulse scale from a shape
    EndPulse { shape: usize, generation: Generation },
}
