//! Ad unit adapters: one generic lifecycle core, three ad formats.
//!
//! The original per-format adapters duplicate the same request lifecycle
//! three times; here a single [`AdUnitAdapter`] owns that lifecycle and a
//! small [`FormatHooks`] capability trait carries the per-format pieces:
//! view sizing for banners, readiness-gated show for the fullscreen
//! formats, reward delivery for rewarded (handled in
//! [`events`](crate::events)).
//!
//! A load request runs: placement validation → format-specific request
//! validation → vendor initialization → vendor ad construction with a
//! translating event handler → bidding or traditional load call. Every
//! failure along the way is surfaced exactly once through the host's load
//! listener; vendor runtime events flow through
//! [`events::translate`](crate::events).

pub mod banner;
pub mod interstitial;
pub mod rewarded;
mod state;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

pub use banner::{AdViewContainer, BannerAdapter, BannerFormat};
pub use interstitial::{InterstitialAdapter, InterstitialFormat};
pub use rewarded::{RewardedAdapter, RewardedFormat};
pub use state::AdLifecycle;

use crate::config::{partner_extras, NetworkConfig, PlacementId};
use crate::error::{AdapterError, ConfigError};
use crate::events::{self, HostErrorCode, VendorEvent};
use crate::init::{HostLogLevel, NetworkInitializer};
use crate::listener::{InteractionListener, LoadListener};
use crate::vendor::{AdFormat, VendorAdError, VendorAdUnit, VendorEventHandler, VendorSdk};

/// Ad request data handed to an adapter by the host framework.
///
/// Carries the per-request configuration map plus, for banners, the
/// requested ad dimensions and the display density used to size the view
/// container.
#[derive(Debug, Clone)]
pub struct AdRequest {
    /// Per-request configuration map (server extras).
    pub config: NetworkConfig,
    /// Requested ad width in density-independent pixels, banner only.
    pub width: Option<u32>,
    /// Requested ad height in density-independent pixels, banner only.
    pub height: Option<u32>,
    /// Display density used to scale banner dimensions to pixels.
    pub density: f64,
}

impl AdRequest {
    /// Creates a request around a configuration map, with no dimensions
    /// and a density of 1.0.
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            width: None,
            height: None,
            density: 1.0,
        }
    }

    /// Sets the requested banner dimensions.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets the display density.
    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }
}

/// Per-format capabilities plugged into the generic adapter core.
pub trait FormatHooks: Send + 'static {
    /// The ad format these hooks represent.
    const FORMAT: AdFormat;

    /// Whether the host should track impressions and clicks itself.
    ///
    /// True for banners (always visible once loaded), false for the
    /// fullscreen formats, which report explicit show events.
    const AUTOMATIC_IMPRESSION_AND_CLICK_TRACKING: bool;

    /// Validates format-specific request data before any vendor call and
    /// prepares format-owned resources (the banner view container).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the request data is incomplete for
    /// this format; the adapter reports it via the load listener without
    /// contacting the vendor.
    fn prepare(&mut self, request: &AdRequest) -> Result<(), ConfigError> {
        let _ = request;
        Ok(())
    }

    /// Releases format-owned resources on invalidation.
    fn release(&mut self) {}
}

/// Marker for formats displayed through an explicit, readiness-gated
/// `show` call.
pub trait FullscreenFormat: FormatHooks {}

/// Generic ad unit adapter, parameterized by ad format.
///
/// One instance serves one host ad request: the host calls
/// [`load`](Self::load), observes the outcome through its listeners,
/// shows the ad (fullscreen formats), and finally
/// [`invalidate`](Self::invalidate)s the instance. Constructed through
/// [`AdapterConfiguration`](crate::configuration::AdapterConfiguration).
pub struct AdUnitAdapter<F: FormatHooks> {
    inner: Arc<Inner<F>>,
}

struct Inner<F: FormatHooks> {
    sdk: Arc<dyn VendorSdk>,
    initializer: Arc<NetworkInitializer>,
    log_level: HostLogLevel,
    host_sdk_version: Option<String>,
    load_listener: Arc<dyn LoadListener>,
    interaction_listener: Arc<dyn InteractionListener>,
    state: Mutex<State<F>>,
}

struct State<F> {
    lifecycle: AdLifecycle,
    placement: Option<PlacementId>,
    ad: Option<Box<dyn VendorAdUnit>>,
    hooks: F,
}

impl<F: FormatHooks> fmt::Debug for AdUnitAdapter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock_state();
        f.debug_struct("AdUnitAdapter")
            .field("format", &F::FORMAT)
            .field("lifecycle", &state.lifecycle)
            .field("placement", &state.placement)
            .finish_non_exhaustive()
    }
}

impl<F: FormatHooks> AdUnitAdapter<F> {
    pub(crate) fn new(
        sdk: Arc<dyn VendorSdk>,
        initializer: Arc<NetworkInitializer>,
        log_level: HostLogLevel,
        host_sdk_version: Option<String>,
        load_listener: Arc<dyn LoadListener>,
        interaction_listener: Arc<dyn InteractionListener>,
        hooks: F,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                sdk,
                initializer,
                log_level,
                host_sdk_version,
                load_listener,
                interaction_listener,
                state: Mutex::new(State {
                    lifecycle: AdLifecycle::Idle,
                    placement: None,
                    ad: None,
                    hooks,
                }),
            }),
        }
    }

    /// Issues an ad request.
    ///
    /// Returns immediately; the outcome arrives through the load listener.
    /// Configuration problems (placement id, banner dimensions) are
    /// reported before the vendor SDK is contacted. A second call while a
    /// request is in flight, or after invalidation, is rejected without
    /// touching the in-flight vendor object.
    pub fn load(&self, request: AdRequest) {
        let request_id = Uuid::new_v4();

        let placement = {
            let mut state = self.inner.lock_state();
            match state.lifecycle {
                AdLifecycle::Loading => {
                    drop(state);
                    self.inner.reject_load(
                        &AdapterError::LoadInFlight,
                        "rejecting load while a request is in flight",
                    );
                    return;
                }
                AdLifecycle::Invalidated => {
                    drop(state);
                    self.inner.reject_load(
                        &AdapterError::LoadInFlight,
                        "rejecting load on an invalidated adapter",
                    );
                    return;
                }
                _ => {}
            }

            let placement = match request.config.placement_id() {
                Ok(placement) => placement,
                Err(error) => {
                    state.lifecycle.advance(AdLifecycle::LoadFailed);
                    drop(state);
                    self.inner.fail_load(
                        &AdapterError::Config(error),
                        "placement id is not available or incorrect",
                    );
                    return;
                }
            };
            state.placement = Some(placement);

            if let Err(error) = state.hooks.prepare(&request) {
                state.lifecycle.advance(AdLifecycle::LoadFailed);
                drop(state);
                self.inner.fail_load(
                    &AdapterError::Config(error),
                    "format-specific ad request data is incomplete",
                );
                return;
            }

            // A fresh request on an adapter that already finished a
            // lifecycle replaces the previous vendor object.
            if let Some(mut previous) = state.ad.take() {
                previous.destroy();
            }
            state.lifecycle = AdLifecycle::Loading;
            placement
        };

        tracing::info!(
            placement = %placement,
            request_id = %request_id,
            format = F::FORMAT.name(),
            "ad load attempted",
        );

        let weak = Arc::downgrade(&self.inner);
        let config = request.config.clone();
        self.inner.initializer.initialize(
            &request.config,
            &self.inner.sdk,
            self.inner.log_level,
            Box::new(move |outcome| {
                let Some(inner) = weak.upgrade() else { return };
                match outcome {
                    Ok(()) => Inner::construct_and_load(&inner, placement, &config, request_id),
                    Err(error) => inner.fail_load(
                        &AdapterError::Init(error),
                        "vendor SDK initialization failed for this request",
                    ),
                }
            }),
        );
    }

    /// Releases the vendor ad object and any format-owned resources.
    ///
    /// Safe to call multiple times; the vendor teardown hook runs at most
    /// once.
    pub fn invalidate(&self) {
        let mut state = self.inner.lock_state();
        if let Some(mut ad) = state.ad.take() {
            ad.destroy();
        }
        state.hooks.release();
        if state.lifecycle != AdLifecycle::Invalidated {
            state.lifecycle = AdLifecycle::Invalidated;
            tracing::info!(format = F::FORMAT.name(), "adapter invalidated");
        }
    }

    /// The network-side identifier for this ad: the placement id string,
    /// empty until a placement id has been validated.
    #[must_use]
    pub fn network_ad_id(&self) -> String {
        self.inner.network_ad_id()
    }

    /// Current lifecycle phase, for host-side diagnostics.
    #[must_use]
    pub fn lifecycle(&self) -> AdLifecycle {
        self.inner.lock_state().lifecycle
    }

    /// Whether the host should track impressions and clicks itself for
    /// this format.
    #[must_use]
    pub fn automatic_impression_and_click_tracking(&self) -> bool {
        F::AUTOMATIC_IMPRESSION_AND_CLICK_TRACKING
    }

    fn lock_state(&self) -> MutexGuard<'_, State<F>> {
        self.inner.lock_state()
    }
}

impl<F: FullscreenFormat> AdUnitAdapter<F> {
    /// Displays a loaded fullscreen ad.
    ///
    /// Gated on the vendor's readiness flag: when the vendor object is
    /// absent or not ready, the call fails immediately through the
    /// interaction listener with a fullscreen show error and the vendor is
    /// not contacted.
    pub fn show(&self) {
        let placement = self.inner.network_ad_id();
        tracing::info!(placement, format = F::FORMAT.name(), "ad show attempted");

        let mut state = self.inner.lock_state();
        let ready = state.ad.as_ref().is_some_and(|ad| ad.is_ready());
        if ready {
            state.lifecycle.advance(AdLifecycle::Showing);
            if let Some(ad) = state.ad.as_mut() {
                ad.show();
            }
        } else {
            drop(state);
            events::report_failure(
                HostErrorCode::FullscreenShowError,
                "fullscreen ad is not ready yet; ensure it is loaded first",
                &placement,
                None,
                Some(self.inner.interaction_listener.as_ref()),
            );
        }
    }
}

impl<F: FormatHooks> Inner<F> {
    fn lock_state(&self) -> MutexGuard<'_, State<F>> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn network_ad_id(&self) -> String {
        self.lock_state().placement.map(|p| p.to_string()).unwrap_or_default()
    }

    /// Fails the current load attempt once, through the load channel.
    fn fail_load(&self, error: &AdapterError, message: &str) {
        self.lock_state().lifecycle.advance(AdLifecycle::LoadFailed);
        events::report_failure(
            HostErrorCode::from(error),
            message,
            &self.network_ad_id(),
            Some(self.load_listener.as_ref()),
            None,
        );
    }

    /// Rejects a load call without disturbing the current lifecycle.
    fn reject_load(&self, error: &AdapterError, message: &str) {
        events::report_failure(
            HostErrorCode::from(error),
            message,
            &self.network_ad_id(),
            Some(self.load_listener.as_ref()),
            None,
        );
    }

    /// Builds the vendor ad object and issues the load call.
    ///
    /// Runs after vendor initialization succeeded, possibly on a
    /// vendor-owned thread.
    fn construct_and_load(
        inner: &Arc<Self>,
        placement: PlacementId,
        config: &NetworkConfig,
        request_id: Uuid,
    ) {
        let handler: VendorEventHandler = {
            let weak = Arc::downgrade(inner);
            Arc::new(move |event| {
                if let Some(inner) = weak.upgrade() {
                    Inner::on_vendor_event(&inner, &event);
                }
            })
        };

        let mut ad = match inner.sdk.create_ad(F::FORMAT, placement, handler) {
            Ok(ad) => ad,
            Err(VendorAdError::SdkNotInitialized) => {
                inner.fail_load(
                    &AdapterError::SdkNotInitialized,
                    "vendor ad object requested before the vendor SDK finished initializing; \
                     initialization will be attempted again on the next ad request",
                );
                return;
            }
            Err(VendorAdError::Other(message)) => {
                inner.fail_load(
                    &AdapterError::Vendor(message),
                    "vendor ad object construction failed due to a configuration issue",
                );
                return;
            }
        };

        if let Some(markup) = config.ad_markup() {
            tracing::info!(
                placement = %placement,
                request_id = %request_id,
                format = F::FORMAT.name(),
                "ad markup present, issuing bidding ad request",
            );
            ad.load_with_markup(markup.as_bytes());
        } else {
            tracing::info!(
                placement = %placement,
                request_id = %request_id,
                format = F::FORMAT.name(),
                "ad markup absent, issuing traditional ad request",
            );
            ad.set_extras(&partner_extras(inner.host_sdk_version.as_deref()));
            ad.load();
        }

        let mut state = inner.lock_state();
        if state.lifecycle == AdLifecycle::Invalidated {
            // Invalidation raced the construction; tear the fresh object
            // down instead of resurrecting the adapter.
            drop(state);
            ad.destroy();
        } else {
            state.ad = Some(ad);
        }
    }

    /// Entry point for vendor callbacks: bookkeeping, then translation.
    fn on_vendor_event(inner: &Arc<Self>, event: &VendorEvent) {
        {
            let mut state = inner.lock_state();
            match event {
                VendorEvent::LoadSucceeded => {
                    state.lifecycle.advance(AdLifecycle::Loaded);
                }
                VendorEvent::LoadFailed { .. } => {
                    state.lifecycle.advance(AdLifecycle::LoadFailed);
                }
                VendorEvent::Displayed if F::FORMAT.is_fullscreen() => {
                    state.lifecycle.advance(AdLifecycle::Shown);
                }
                VendorEvent::DisplayFailed => {
                    state.lifecycle.advance(AdLifecycle::ShowFailed);
                }
                VendorEvent::Dismissed if F::FORMAT.is_fullscreen() => {
                    state.lifecycle.advance(AdLifecycle::Dismissed);
                }
                _ => {}
            }
        }

        events::translate(
            F::FORMAT,
            &inner.network_ad_id(),
            event,
            inner.load_listener.as_ref(),
            inner.interaction_listener.as_ref(),
        );
    }
}

impl<F> State<F> {
    fn hooks(&self) -> &F {
        &self.hooks
    }
}
