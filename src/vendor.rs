//! Trait seam over the vendor advertising SDK.
//!
//! The vendor SDK is a proprietary external collaborator; the bridge only
//! ever talks to it through [`VendorSdk`] and [`VendorAdUnit`]. The crate's
//! [`testing`](crate::testing) module provides a scriptable implementation
//! for tests and demos; production bindings supply the real one.
//!
//! # Callback delivery contract
//!
//! All vendor calls are asynchronous from the adapter's point of view:
//! results are delivered through the registered [`VendorEventHandler`] on a
//! thread or queue owned by the vendor. Implementations must never invoke
//! the handler synchronously from inside [`VendorAdUnit::load`],
//! [`VendorAdUnit::load_with_markup`] or [`VendorAdUnit::show`].

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{AccountId, PlacementId};
use crate::events::VendorEvent;

/// Handler through which a vendor ad object reports its lifecycle events.
pub type VendorEventHandler = Arc<dyn Fn(VendorEvent) + Send + Sync>;

/// Completion callback for the vendor SDK's async init entry point.
pub type VendorInitCallback = Box<dyn FnOnce(Result<(), VendorSdkError>) + Send>;

/// Opaque failure reported by the vendor SDK, carrying its message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct VendorSdkError(pub String);

/// Failure constructing a vendor ad object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VendorAdError {
    /// The vendor SDK has not completed initialization yet.
    ///
    /// Recoverable: the adapter reports a network-invalid-state condition
    /// and initialization is attempted again on the next ad request.
    #[error("vendor SDK is not initialized")]
    SdkNotInitialized,

    /// Any other construction failure, treated as a configuration issue.
    #[error("vendor ad construction failed: {0}")]
    Other(String),
}

/// The ad formats this bridge mediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdFormat {
    /// Inline banner, always displayed once loaded.
    Banner,
    /// Fullscreen interstitial.
    Interstitial,
    /// Fullscreen rewarded video.
    Rewarded,
}

impl AdFormat {
    /// True for formats that are displayed via an explicit `show` call.
    #[must_use]
    pub fn is_fullscreen(self) -> bool {
        matches!(self, Self::Interstitial | Self::Rewarded)
    }

    /// Short name used in log events.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Banner => "banner",
            Self::Interstitial => "interstitial",
            Self::Rewarded => "rewarded",
        }
    }
}

/// Vendor SDK log verbosity.
///
/// Only the levels the bridge ever sets are modeled; anything else leaves
/// the vendor default untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorLogLevel {
    /// Suppress vendor logging.
    None,
    /// Errors only.
    Error,
    /// Full debug logging.
    Debug,
}

/// Closed status-code enumeration reported by vendor load failures.
///
/// The bridge maps every variant onto a host error code through the fixed
/// table in [`events::host_error_code`](crate::events::host_error_code);
/// variants without a dedicated mapping fall through to `Unspecified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorStatus {
    /// Vendor-internal failure.
    InternalError,
    /// Device has no route to the vendor's servers.
    NetworkUnreachable,
    /// Auction ran but returned no ad.
    NoFill,
    /// The request did not complete in time.
    RequestTimedOut,
    /// The request was malformed or unauthorized.
    RequestInvalid,
    /// The vendor's servers failed to serve the request.
    ServerError,
    /// A request is already pending for this placement.
    RequestPending,
    /// An ad is currently being displayed for this placement.
    AdActive,
    /// The placement refreshed earlier than the vendor allows.
    EarlyRefreshRequest,
    /// Repeated load of the same placement in a short window.
    RepetitiveLoad,
    /// Monetization was disabled for this account.
    MonetizationDisabled,
    /// The device is under memory pressure.
    LowMemory,
}

impl VendorStatus {
    /// All defined status codes, for exhaustiveness checks in tests.
    pub const ALL: [Self; 12] = [
        Self::InternalError,
        Self::NetworkUnreachable,
        Self::NoFill,
        Self::RequestTimedOut,
        Self::RequestInvalid,
        Self::ServerError,
        Self::RequestPending,
        Self::AdActive,
        Self::EarlyRefreshRequest,
        Self::RepetitiveLoad,
        Self::MonetizationDisabled,
        Self::LowMemory,
    ];
}

/// Entry points of the vendor SDK used by the bridge.
///
/// One instance per process, shared across all adapter instances.
pub trait VendorSdk: Send + Sync {
    /// Sets the vendor log verbosity. Synchronous.
    fn set_log_level(&self, level: VendorLogLevel);

    /// Starts asynchronous vendor initialization for the given account.
    ///
    /// The completion callback fires exactly once, on a vendor-owned
    /// thread, with the init outcome. Issued at most once per process by
    /// the [`NetworkInitializer`](crate::init::NetworkInitializer).
    fn init(&self, account_id: &AccountId, on_complete: VendorInitCallback);

    /// Returns the vendor SDK version string.
    fn version(&self) -> String;

    /// Returns an advanced-bidding token, if the vendor supports bidding.
    ///
    /// The fixed partner extras are forwarded so the token is attributed
    /// to this mediation integration.
    fn bidding_token(&self, extras: &HashMap<String, String>) -> Option<String>;

    /// Constructs a vendor ad object for one placement.
    ///
    /// The returned object reports all lifecycle events through `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`VendorAdError::SdkNotInitialized`] when construction is
    /// attempted before vendor init completed, and
    /// [`VendorAdError::Other`] for any other construction failure.
    fn create_ad(
        &self,
        format: AdFormat,
        placement: PlacementId,
        handler: VendorEventHandler,
    ) -> Result<Box<dyn VendorAdUnit>, VendorAdError>;
}

/// A single vendor ad object, owned by one adapter instance.
pub trait VendorAdUnit: Send {
    /// Attaches request extras for a traditional (non-bidding) load.
    fn set_extras(&mut self, extras: &HashMap<String, String>);

    /// Issues a traditional ad request.
    fn load(&mut self);

    /// Issues a bidding ad request with a pre-fetched markup payload.
    fn load_with_markup(&mut self, markup: &[u8]);

    /// Vendor-reported readiness flag for fullscreen display.
    fn is_ready(&self) -> bool;

    /// Displays a loaded fullscreen ad.
    fn show(&mut self);

    /// Releases vendor-side resources. Called exactly once, on invalidate.
    fn destroy(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullscreen_formats() {
        assert!(!AdFormat::Banner.is_fullscreen());
        assert!(AdFormat::Interstitial.is_fullscreen());
        assert!(AdFormat::Rewarded.is_fullscreen());
    }

    #[test]
    fn format_names() {
        assert_eq!(AdFormat::Banner.name(), "banner");
        assert_eq!(AdFormat::Interstitial.name(), "interstitial");
        assert_eq!(AdFormat::Rewarded.name(), "rewarded");
    }

    #[test]
    fn status_all_is_exhaustive() {
        // A new variant must be added to ALL or this length stops matching
        // the number of arms in events::host_error_code tests.
        assert_eq!(VendorStatus::ALL.len(), 12);
    }

    #[test]
    fn vendor_ad_error_display() {
        assert_eq!(VendorAdError::SdkNotInitialized.to_string(), "vendor SDK is not initialized");
        assert!(VendorAdError::Other("boom".to_owned()).to_string().contains("boom"));
    }
}
