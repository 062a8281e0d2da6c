//! Host-side listener interfaces.
//!
//! The host mediation framework registers these listeners with every
//! adapter instance; the bridge translates vendor callbacks onto them.
//! The host only ever observes callback outcomes through these traits,
//! never raised errors.

use crate::events::{HostErrorCode, Reward};

/// Load-lifecycle listener supplied by the host framework.
pub trait LoadListener: Send + Sync {
    /// The vendor reported a successful ad load.
    fn on_ad_loaded(&self);

    /// The load failed; `code` is the translated host error code.
    fn on_ad_load_failed(&self, code: HostErrorCode);
}

/// Interaction listener supplied by the host framework.
///
/// All methods default to no-ops so hosts only implement the callbacks a
/// given ad format can produce.
pub trait InteractionListener: Send + Sync {
    /// The user clicked the ad.
    fn on_ad_clicked(&self) {}

    /// A fullscreen ad was displayed.
    fn on_ad_shown(&self) {}

    /// An impression was recorded for the displayed ad.
    fn on_ad_impression(&self) {}

    /// A banner expanded fullscreen content over the app.
    fn on_ad_expanded(&self) {}

    /// A banner's expanded content was closed.
    fn on_ad_collapsed(&self) {}

    /// A fullscreen ad was dismissed by the user.
    fn on_ad_dismissed(&self) {}

    /// An interaction-phase failure; `code` is the translated host code.
    fn on_ad_failed(&self, code: HostErrorCode) {
        let _ = code;
    }

    /// A rewarded ad completed and unlocked `reward`.
    fn on_ad_complete(&self, reward: Reward) {
        let _ = reward;
    }
}
