//! Mediation adapter bridging the InMobi-style ads SDK into a
//! MoPub-style mediation host.
//!
//! The host framework talks to typed adapter objects; the vendor SDK is
//! reached only through the [`vendor::VendorSdk`] trait, so the whole
//! bridge is testable against the scriptable double in [`testing`].
//!
//! ```text
//!  host framework ──► AdapterConfiguration ──► NetworkInitializer ──► VendorSdk::init
//!        │                                          (once per process)
//!        └──► AdUnitAdapter<Format> ──► VendorSdk::create_ad ──► VendorAdUnit
//!                    ▲                                               │
//!                    └── LoadListener / InteractionListener ◄── event translation
//! ```
//!
//! Three things carry most of the weight:
//!
//! - [`init::NetworkInitializer`] issues the vendor's async init at most
//!   once per process and fans the outcome out to every waiting ad
//!   request; a failure resets so a later request can retry.
//! - [`adapter::AdUnitAdapter`] runs the shared request lifecycle for all
//!   three ad formats; per-format behavior (banner sizing, fullscreen
//!   show gating) plugs in through [`adapter::FormatHooks`].
//! - [`events`] translates vendor callbacks and status codes into the
//!   host's listener vocabulary, with the per-format divergences (banner
//!   expand/collapse versus fullscreen show/dismiss) in one place.
//!
//! Configuration arrives as an untyped string map from the mediation
//! waterfall; [`config::NetworkConfig`] validates it into typed account
//! and placement identifiers before any vendor call.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod adapter;
pub mod config;
pub mod configuration;
pub mod error;
pub mod events;
pub mod init;
pub mod listener;
pub mod testing;
pub mod vendor;

pub use adapter::{
    AdRequest, AdViewContainer, BannerAdapter, InterstitialAdapter, RewardedAdapter,
};
pub use config::NetworkConfig;
pub use configuration::AdapterConfiguration;
pub use error::{AdapterError, ConfigError, InitError, Result};
pub use events::{HostErrorCode, Reward};
pub use init::HostLogLevel;
pub use listener::{InteractionListener, LoadListener};
