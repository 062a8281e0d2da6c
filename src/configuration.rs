//! Host-facing adapter configuration and entry points.
//!
//! The host framework keeps one [`AdapterConfiguration`] per mediated
//! network for the life of the process. It answers metadata queries
//! (adapter and vendor SDK versions, network name, bidding token), owns
//! the shared [`NetworkInitializer`], and mints the per-request ad unit
//! adapters.
//!
//! ```text
//!                 ┌────────────────────────┐
//!  host framework │  AdapterConfiguration  │ metadata, init kick-off
//!                 └───────────┬────────────┘
//!                             │ mints
//!          ┌──────────────────┼──────────────────┐
//!   BannerAdapter    InterstitialAdapter   RewardedAdapter
//!          └──────────────────┼──────────────────┘
//!                             │ trait calls
//!                 ┌───────────┴────────────┐
//!                 │   VendorSdk (dyn)      │
//!                 └────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use crate::adapter::{
    AdUnitAdapter, BannerAdapter, BannerFormat, InterstitialAdapter, InterstitialFormat,
    RewardedAdapter, RewardedFormat,
};
use crate::config::{partner_extras, NetworkConfig};
use crate::error::{AdapterError, ConfigError};
use crate::init::{HostLogLevel, NetworkInitializer};
use crate::listener::{InteractionListener, LoadListener};
use crate::vendor::VendorSdk;

/// Canonical network name reported to the host.
pub const NETWORK_NAME: &str = "inmobi";

/// Per-network adapter configuration.
///
/// Construct one per process around the vendor SDK handle, then mint ad
/// unit adapters from it:
///
/// ```
/// use std::sync::Arc;
///
/// use inmobi_mediation_bridge::configuration::AdapterConfiguration;
/// use inmobi_mediation_bridge::init::HostLogLevel;
/// use inmobi_mediation_bridge::testing::MockVendorSdk;
///
/// let configuration = AdapterConfiguration::new(Arc::new(MockVendorSdk::new()))
///     .with_log_level(HostLogLevel::Info)
///     .with_host_sdk_version("5.18.0");
///
/// assert_eq!(configuration.network_name(), "inmobi");
/// assert_eq!(configuration.adapter_version(), env!("CARGO_PKG_VERSION"));
/// ```
pub struct AdapterConfiguration {
    sdk: Arc<dyn VendorSdk>,
    initializer: Arc<NetworkInitializer>,
    log_level: HostLogLevel,
    host_sdk_version: Option<String>,
}

impl fmt::Debug for AdapterConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterConfiguration")
            .field("network_name", &NETWORK_NAME)
            .field("log_level", &self.log_level)
            .field("host_sdk_version", &self.host_sdk_version)
            .field("init_state", &self.initializer.state())
            .finish_non_exhaustive()
    }
}

impl AdapterConfiguration {
    /// Creates a configuration around a vendor SDK handle.
    ///
    /// Host logging defaults to [`HostLogLevel::Warn`], which leaves the
    /// vendor's own log level untouched.
    #[must_use]
    pub fn new(sdk: Arc<dyn VendorSdk>) -> Self {
        Self {
            sdk,
            initializer: Arc::new(NetworkInitializer::new()),
            log_level: HostLogLevel::Warn,
            host_sdk_version: None,
        }
    }

    /// Sets the host framework log level forwarded to the vendor.
    #[must_use]
    pub fn with_log_level(mut self, level: HostLogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Sets the host SDK version attached to traditional ad requests.
    #[must_use]
    pub fn with_host_sdk_version(mut self, version: impl Into<String>) -> Self {
        self.host_sdk_version = Some(version.into());
        self
    }

    /// Kicks off vendor SDK initialization ahead of the first ad request.
    ///
    /// Initialization is best-effort at this point: the vendor call runs
    /// in the background and its outcome is only logged, because every ad
    /// request re-drives initialization through the shared initializer
    /// anyway.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Config`] when `config` is absent or carries
    /// no entries at all; the vendor SDK is not contacted in that case.
    pub fn initialize_network(&self, config: Option<&NetworkConfig>) -> Result<(), AdapterError> {
        let config = match config {
            Some(config) if !config.is_empty() => config,
            _ => {
                tracing::warn!("network initialization requested without any configuration");
                return Err(AdapterError::Config(ConfigError::AccountIdMissing));
            }
        };

        self.initializer.initialize(
            config,
            &self.sdk,
            self.log_level,
            Box::new(|outcome| {
                if let Err(error) = outcome {
                    tracing::warn!(%error, "ahead-of-time vendor initialization failed");
                }
            }),
        );
        Ok(())
    }

    /// The adapter's own version.
    #[must_use]
    pub fn adapter_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// The canonical network name.
    #[must_use]
    pub fn network_name(&self) -> &'static str {
        NETWORK_NAME
    }

    /// The vendor SDK's version string.
    #[must_use]
    pub fn network_sdk_version(&self) -> String {
        self.sdk.version()
    }

    /// The vendor's bidding token for header-bidding auctions, if one is
    /// currently available.
    ///
    /// The token request carries the same fixed partner extras as a
    /// traditional ad request.
    #[must_use]
    pub fn bidding_token(&self) -> Option<String> {
        self.sdk.bidding_token(&partner_extras(self.host_sdk_version.as_deref()))
    }

    /// Mints a banner ad unit adapter.
    #[must_use]
    pub fn banner_adapter(
        &self,
        load_listener: Arc<dyn LoadListener>,
        interaction_listener: Arc<dyn InteractionListener>,
    ) -> BannerAdapter {
        self.ad_unit_adapter(load_listener, interaction_listener, BannerFormat::default())
    }

    /// Mints an interstitial ad unit adapter.
    #[must_use]
    pub fn interstitial_adapter(
        &self,
        load_listener: Arc<dyn LoadListener>,
        interaction_listener: Arc<dyn InteractionListener>,
    ) -> InterstitialAdapter {
        self.ad_unit_adapter(load_listener, interaction_listener, InterstitialFormat)
    }

    /// Mints a rewarded ad unit adapter.
    #[must_use]
    pub fn rewarded_adapter(
        &self,
        load_listener: Arc<dyn LoadListener>,
        interaction_listener: Arc<dyn InteractionListener>,
    ) -> RewardedAdapter {
        self.ad_unit_adapter(load_listener, interaction_listener, RewardedFormat)
    }

    fn ad_unit_adapter<F: crate::adapter::FormatHooks>(
        &self,
        load_listener: Arc<dyn LoadListener>,
        interaction_listener: Arc<dyn InteractionListener>,
        hooks: F,
    ) -> AdUnitAdapter<F> {
        AdUnitAdapter::new(
            Arc::clone(&self.sdk),
            Arc::clone(&self.initializer),
            self.log_level,
            self.host_sdk_version.clone(),
            load_listener,
            interaction_listener,
            hooks,
        )
    }
}
