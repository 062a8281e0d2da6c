//! Banner format hooks: dimension validation and view container sizing.
//!
//! Banners are the only format with per-request dimensions. The requested
//! width and height arrive in density-independent pixels and must both be
//! present and non-zero before any vendor call; the adapter sizes a view
//! container by scaling them with the display density, mirroring how the
//! hosting platform lays the ad view out.

use crate::error::ConfigError;
use crate::vendor::AdFormat;

use super::{AdRequest, AdUnitAdapter, FormatHooks};

/// Banner ad adapter.
pub type BannerAdapter = AdUnitAdapter<BannerFormat>;

/// Pixel dimensions of the view container holding a loaded banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdViewContainer {
    /// Container width in physical pixels.
    pub width_px: u32,
    /// Container height in physical pixels.
    pub height_px: u32,
}

/// Format hooks for banner ads.
#[derive(Debug, Default)]
pub struct BannerFormat {
    container: Option<AdViewContainer>,
}

impl FormatHooks for BannerFormat {
    const FORMAT: AdFormat = AdFormat::Banner;
    const AUTOMATIC_IMPRESSION_AND_CLICK_TRACKING: bool = true;

    fn prepare(&mut self, request: &AdRequest) -> Result<(), ConfigError> {
        let (Some(width), Some(height)) = (request.width, request.height) else {
            return Err(ConfigError::AdSizeMissing);
        };
        if width == 0 || height == 0 {
            return Err(ConfigError::AdSizeZero);
        }
        self.container = Some(AdViewContainer {
            width_px: scale(width, request.density),
            height_px: scale(height, request.density),
        });
        Ok(())
    }

    fn release(&mut self) {
        self.container = None;
    }
}

fn scale(dp: u32, density: f64) -> u32 {
    (f64::from(dp) * density).round() as u32
}

impl BannerAdapter {
    /// The sized view container for the current banner request.
    ///
    /// `None` until a request with valid dimensions has been accepted, and
    /// again after [`invalidate`](AdUnitAdapter::invalidate).
    #[must_use]
    pub fn ad_view(&self) -> Option<AdViewContainer> {
        self.lock_state().hooks().container
    }
}
