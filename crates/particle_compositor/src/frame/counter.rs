//! Host-advanced frame counter

/// Monotonically increasing frame stamp.
///
/// The host advances it once per rendered frame. Stamps never go backwards:
/// syncing to an older host value is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounter {
    frame: u64,
}

impl FrameCounter {
    /// Create a counter at frame 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current frame stamp
    pub fn current(&self) -> u64 {
        self.frame
    }

    /// Advance by one frame and return the new stamp
    pub fn advance(&mut self) -> u64 {
        self.frame = self.frame.wrapping_add(1);
        self.frame
    }

    /// Adopt the host's own frame count
    ///
    /// Returns true if the stamp changed.
    pub fn sync_to(&mut self, host_frame: u64) -> bool {
        if host_frame > self.frame {
            self.frame = host_frame;
            true
        } else {
            if host_frame < self.frame {
                log::warn!(
                    "Ignoring frame counter rewind from {} to {}",
                    self.frame,
                    host_frame
                );
            }
            false
        }
    }
}
