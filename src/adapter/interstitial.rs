//! Interstitial format hooks.
//!
//! Interstitials carry no format-specific request data; the generic core
//! plus the fullscreen show gate is the whole story.

use crate::vendor::AdFormat;

use super::{AdUnitAdapter, FormatHooks, FullscreenFormat};

/// Interstitial ad adapter.
pub type InterstitialAdapter = AdUnitAdapter<InterstitialFormat>;

/// Format hooks for interstitial ads.
#[derive(Debug, Default)]
pub struct InterstitialFormat;

impl FormatHooks for InterstitialFormat {
    const FORMAT: AdFormat = AdFormat::Interstitial;
    const AUTOMATIC_IMPRESSION_AND_CLICK_TRACKING: bool = false;
}

impl FullscreenFormat for InterstitialFormat {}
