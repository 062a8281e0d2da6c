//! Error types for the mediation bridge.
//!
//! Errors here are internal plumbing: the host framework never observes a
//! raised error across the adapter boundary. Every failure is translated
//! exactly once into a [`HostErrorCode`](crate::events::HostErrorCode) and
//! delivered through a listener callback (see [`crate::events`]).
//!
//! # Error Categories
//!
//! - **Configuration errors** ([`ConfigError`]): missing or malformed
//!   entries in the per-request configuration map. Always detected before
//!   any vendor SDK call is made, never retried automatically.
//! - **Initialization errors** ([`InitError`]): the vendor SDK's async
//!   init reported a failure, or the account id could not be extracted.
//!   A later, independent ad request may retry initialization.
//! - **Adapter errors** ([`AdapterError`]): the umbrella type carried
//!   through the load pipeline until it is translated for the host.

use thiserror::Error;

/// Result type alias for bridge operations.
///
/// Fallible internal functions in this crate return this type; the public
/// adapter surface itself never returns errors to the host, it reports
/// them through listener callbacks.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// A malformed or incomplete per-request configuration map.
///
/// Configuration errors are reported before the vendor SDK is contacted
/// and map onto the host's `AdapterConfigurationError` code.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The `accountid` entry is missing or empty.
    ///
    /// The account id is required to initialize the vendor SDK; without it
    /// no initialization attempt is made.
    #[error("account id entry is missing or empty in the network configuration")]
    AccountIdMissing,

    /// The `placementid` entry is missing or empty.
    #[error("placement id entry is missing or empty in the network configuration")]
    PlacementIdMissing,

    /// The `placementid` entry is present but not a positive integer.
    ///
    /// Placement ids are never coerced: `"0"`, `"-5"` and non-numeric
    /// strings are all rejected with this variant.
    #[error("placement id '{0}' is not a positive integer")]
    PlacementIdInvalid(String),

    /// A banner request arrived without width or height.
    #[error("banner width and height were not provided in the ad request")]
    AdSizeMissing,

    /// A banner request arrived with a zero width or height.
    #[error("banner width or height is zero in the ad request")]
    AdSizeZero,
}

/// A vendor SDK initialization failure.
///
/// Cloneable because a single vendor init outcome is fanned out to every
/// waiter registered with the
/// [`NetworkInitializer`](crate::init::NetworkInitializer).
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    /// The account id could not be extracted from the configuration.
    ///
    /// Initialization state is left untouched when this occurs.
    #[error("initialization rejected: {0}")]
    Config(#[from] ConfigError),

    /// The vendor SDK's async init entry point reported a failure.
    #[error("vendor SDK initialization failed: {0}")]
    Vendor(String),
}

/// Umbrella error carried through the ad-load pipeline.
///
/// Converted into a host error code at the single point where a failure is
/// surfaced to the host listener (see
/// [`HostErrorCode`](crate::events::HostErrorCode)).
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The per-request configuration map was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Vendor SDK initialization failed for this request.
    #[error(transparent)]
    Init(#[from] InitError),

    /// The vendor ad object could not be constructed because the vendor
    /// SDK is not initialized yet.
    ///
    /// This is a recoverable condition: the vendor SDK will attempt to
    /// initialize again on the next ad request, so it maps onto the host's
    /// `NetworkInvalidState` rather than a permanent configuration error.
    #[error("vendor ad object constructed before the vendor SDK was initialized")]
    SdkNotInitialized,

    /// A second `load` was issued while one was already in flight.
    ///
    /// The adapter rejects the second request instead of running two
    /// concurrent vendor loads against the same vendor object.
    #[error("a load request is already in flight for this adapter instance")]
    LoadInFlight,

    /// The vendor SDK reported an unexpected construction failure.
    #[error("vendor ad object construction failed: {0}")]
    Vendor(String),
}
