//! Rewarded format hooks.
//!
//! Identical to interstitials from the lifecycle's point of view, plus the
//! reward payload delivered on completion; payload parsing lives in
//! [`events`](crate::events).

use crate::vendor::AdFormat;

use super::{AdUnitAdapter, FormatHooks, FullscreenFormat};

/// Rewarded ad adapter.
pub type RewardedAdapter = AdUnitAdapter<RewardedFormat>;

/// Format hooks for rewarded ads.
#[derive(Debug, Default)]
pub struct RewardedFormat;

impl FormatHooks for RewardedFormat {
    const FORMAT: AdFormat = AdFormat::Rewarded;
    const AUTOMATIC_IMPRESSION_AND_CLICK_TRACKING: bool = false;
}

impl FullscreenFormat for RewardedFormat {}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::super::tests::Harness;
    use super::*;
    use crate::events::VendorEvent;

    fn payload(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    #[test]
    fn empty_reward_payload_yields_default_reward() {
        let harness = Harness::new();
        let adapter: RewardedAdapter = harness.adapter();

        adapter.load(harness.request());
        harness.mock.emit(42, VendorEvent::LoadSucceeded);
        harness.mock.set_ready(42, true);
        adapter.show();
        harness.mock.emit(42, VendorEvent::Displayed);
        harness.mock.emit(42, VendorEvent::RewardsUnlocked(payload(json!({}))));

        assert_eq!(
            harness.listener.calls(),
            ["loaded", "shown", "impression", "complete::0"],
        );
    }

    #[test]
    fn string_amounts_are_parsed() {
        let harness = Harness::new();
        let adapter: RewardedAdapter = harness.adapter();

        adapter.load(harness.request());
        harness.mock.emit(42, VendorEvent::LoadSucceeded);
        harness.mock.emit(42, VendorEvent::RewardsUnlocked(payload(json!({ "gems": "25" }))));

        assert_eq!(harness.listener.calls(), ["loaded", "complete:gems:25"]);
    }
}
