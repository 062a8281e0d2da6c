//! Per-request ad lifecycle state machine.
//!
//! Each adapter instance tracks one request through:
//!
//! ```text
//! Idle ──> Loading ──> Loaded ──> Showing ──> Shown ──> Dismissed
//!             │                      │
//!             └──> LoadFailed        └──> ShowFailed
//! ```
//!
//! `Invalidated` is reachable from every state. `LoadFailed`,
//! `ShowFailed`, `Dismissed` and `Invalidated` are terminal.

/// Lifecycle phase of a single ad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdLifecycle {
    /// No request issued yet.
    Idle,
    /// A load request is in flight with the vendor.
    Loading,
    /// The vendor reported a successful load.
    Loaded,
    /// The vendor reported a load failure.
    LoadFailed,
    /// A show call was issued for a loaded fullscreen ad.
    Showing,
    /// The vendor displayed the ad.
    Shown,
    /// The vendor failed to display the ad.
    ShowFailed,
    /// The displayed ad was dismissed.
    Dismissed,
    /// The host invalidated this adapter instance.
    Invalidated,
}

impl AdLifecycle {
    /// True for states from which no further lifecycle event is expected.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::LoadFailed | Self::ShowFailed | Self::Dismissed | Self::Invalidated)
    }

    /// Whether `self -> to` is a defined lifecycle edge.
    #[must_use]
    pub fn allows(self, to: Self) -> bool {
        use AdLifecycle::{
            Dismissed, Idle, Invalidated, LoadFailed, Loaded, Loading, ShowFailed, Showing, Shown,
        };

        matches!(
            (self, to),
            (_, Invalidated)
                | (Idle, Loading)
                | (Idle, LoadFailed)
                | (Loading, Loaded)
                | (Loading, LoadFailed)
                | (Loaded, Showing)
                | (Showing, Shown)
                | (Showing, ShowFailed)
                | (Shown, Dismissed)
        )
    }

    /// Moves to `to` when the edge is defined; logs and stays put when a
    /// vendor event arrives out of order. Event translation to the host is
    /// never gated on this bookkeeping.
    pub(crate) fn advance(&mut self, to: Self) -> bool {
        if self.allows(to) {
            tracing::debug!(from = ?self, to = ?to, "lifecycle transition");
            *self = to;
            true
        } else {
            tracing::warn!(from = ?self, to = ?to, "ignoring undefined lifecycle transition");
            false
        }
    }
}
