//! Vendor-to-host event and error-code translation.
//!
//! Both the vendor SDK and the host framework use callback-object
//! registration; instead of scattering anonymous listener implementations
//! per format, every vendor callback is represented as a tagged
//! [`VendorEvent`] and dispatched through the single [`translate`]
//! function. Status codes cross the boundary through [`host_error_code`],
//! a total function over the vendor's closed status enumeration.
//!
//! Every failure is surfaced exactly once, on exactly one listener
//! channel: the load channel while a request is in flight, the
//! interaction channel once an ad is showing.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AdapterError;
use crate::listener::{InteractionListener, LoadListener};
use crate::vendor::{AdFormat, VendorStatus};

/// Reward label reported when the vendor payload carries none.
pub const NO_REWARD_LABEL: &str = "";

/// Reward amount reported when the vendor payload carries none.
pub const DEFAULT_REWARD_AMOUNT: i32 = 0;

/// Canonical error enumeration of the host mediation framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostErrorCode {
    /// No more specific code applies.
    Unspecified,
    /// The adapter's configuration (account, placement, dimensions) was
    /// rejected, or vendor initialization failed.
    AdapterConfigurationError,
    /// Vendor-internal failure.
    InternalError,
    /// The device has no network connection.
    NoConnection,
    /// The vendor returned no ad.
    NoFill,
    /// The vendor request timed out.
    NetworkTimeout,
    /// The vendor SDK is in a state where it cannot serve the request;
    /// recoverable on a later ad request.
    NetworkInvalidState,
    /// A fullscreen ad could not be displayed.
    FullscreenShowError,
}

impl fmt::Display for HostErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::AdapterConfigurationError => "ADAPTER_CONFIGURATION_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
            Self::NoConnection => "NO_CONNECTION",
            Self::NoFill => "NO_FILL",
            Self::NetworkTimeout => "NETWORK_TIMEOUT",
            Self::NetworkInvalidState => "NETWORK_INVALID_STATE",
            Self::FullscreenShowError => "FULLSCREEN_SHOW_ERROR",
        };
        f.write_str(name)
    }
}

impl From<&AdapterError> for HostErrorCode {
    /// Collapses the internal error taxonomy onto the host enumeration at
    /// the single point where a failure is surfaced.
    fn from(error: &AdapterError) -> Self {
        match error {
            AdapterError::Config(_) | AdapterError::Init(_) | AdapterError::Vendor(_) => {
                Self::AdapterConfigurationError
            }
            AdapterError::SdkNotInitialized => Self::NetworkInvalidState,
            AdapterError::LoadInFlight => Self::InternalError,
        }
    }
}

/// Maps a vendor status code onto the host's canonical error code.
///
/// Total over [`VendorStatus`]: statuses without a dedicated mapping fall
/// through to [`HostErrorCode::Unspecified`].
#[must_use]
pub fn host_error_code(status: VendorStatus) -> HostErrorCode {
    match status {
        VendorStatus::InternalError => HostErrorCode::InternalError,
        VendorStatus::NetworkUnreachable => HostErrorCode::NoConnection,
        VendorStatus::NoFill => HostErrorCode::NoFill,
        VendorStatus::RequestTimedOut => HostErrorCode::NetworkTimeout,
        VendorStatus::RequestInvalid | VendorStatus::ServerError => {
            HostErrorCode::NetworkInvalidState
        }
        _ => HostErrorCode::Unspecified,
    }
}

/// Reward unlocked by a completed rewarded ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Reward name, [`NO_REWARD_LABEL`] when the vendor supplied none.
    pub label: String,
    /// Reward amount, [`DEFAULT_REWARD_AMOUNT`] when the vendor supplied
    /// none.
    pub amount: i32,
}

impl Default for Reward {
    fn default() -> Self {
        Self {
            label: NO_REWARD_LABEL.to_owned(),
            amount: DEFAULT_REWARD_AMOUNT,
        }
    }
}

/// Parses the vendor's reward payload.
///
/// The payload is expected to hold a single entry mapping the reward name
/// to an integer amount (either a JSON number or a numeric string). An
/// absent, empty or malformed payload yields the default reward; reward
/// delivery is never blocked by malformed reward metadata.
#[must_use]
pub fn parse_reward(payload: &Map<String, Value>) -> Reward {
    let Some((label, value)) = payload.iter().next() else {
        return Reward::default();
    };

    let amount = match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.parse::<i32>().ok(),
        _ => None,
    };

    match amount {
        Some(amount) => Reward {
            label: label.clone(),
            amount,
        },
        None => {
            tracing::warn!(label = %label, "unparseable vendor reward amount, using default reward");
            Reward::default()
        }
    }
}

/// Lifecycle callbacks a vendor ad object can report, as tagged variants.
#[derive(Debug, Clone)]
pub enum VendorEvent {
    /// The ad request succeeded.
    LoadSucceeded,
    /// The ad request failed with a vendor status code.
    LoadFailed {
        /// Vendor status code for this failure.
        status: VendorStatus,
        /// Vendor-provided failure message, for logs only.
        message: String,
    },
    /// A fullscreen ad is about to display.
    WillDisplay,
    /// The ad was displayed. For banners this fires when fullscreen
    /// content opens over the banner after a click.
    Displayed,
    /// A fullscreen ad failed to display.
    DisplayFailed,
    /// The user clicked the ad.
    Clicked,
    /// The displayed ad was closed. For banners this fires when the
    /// expanded content collapses.
    Dismissed,
    /// The click sent the user out of the application.
    UserLeftApplication,
    /// A rewarded ad ran to completion; the payload carries the reward.
    RewardsUnlocked(Map<String, Value>),
}

/// Dispatches one vendor event onto the host listeners.
///
/// The per-format divergence of the original adapters (banners report
/// expand/collapse where fullscreen formats report shown/dismissed) lives
/// entirely in this function.
pub(crate) fn translate(
    format: AdFormat,
    placement: &str,
    event: &VendorEvent,
    load: &dyn LoadListener,
    interaction: &dyn InteractionListener,
) {
    match event {
        VendorEvent::LoadSucceeded => {
            tracing::info!(placement, format = format.name(), "ad load succeeded");
            load.on_ad_loaded();
        }
        VendorEvent::LoadFailed { status, message } => {
            let code = host_error_code(*status);
            tracing::warn!(
                placement,
                format = format.name(),
                status = ?status,
                %code,
                message,
                "ad load failed",
            );
            load.on_ad_load_failed(code);
        }
        VendorEvent::WillDisplay => {
            tracing::debug!(placement, format = format.name(), "ad will display");
        }
        VendorEvent::Displayed => {
            if format.is_fullscreen() {
                tracing::info!(placement, format = format.name(), "ad displayed");
                interaction.on_ad_shown();
                interaction.on_ad_impression();
            } else {
                tracing::info!(placement, "banner expanded fullscreen content");
                interaction.on_ad_expanded();
            }
        }
        VendorEvent::DisplayFailed => {
            report_failure(
                HostErrorCode::FullscreenShowError,
                "vendor reported a display failure",
                placement,
                None,
                Some(interaction),
            );
        }
        VendorEvent::Clicked => {
            tracing::info!(placement, format = format.name(), "ad clicked");
            interaction.on_ad_clicked();
        }
        VendorEvent::Dismissed => {
            if format.is_fullscreen() {
                tracing::info!(placement, format = format.name(), "ad dismissed");
                interaction.on_ad_dismissed();
            } else {
                tracing::info!(placement, "banner collapsed expanded content");
                interaction.on_ad_collapsed();
            }
        }
        VendorEvent::UserLeftApplication => {
            tracing::info!(placement, format = format.name(), "user left application");
        }
        VendorEvent::RewardsUnlocked(payload) => {
            if format == AdFormat::Rewarded {
                let reward = parse_reward(payload);
                tracing::info!(
                    placement,
                    label = %reward.label,
                    amount = reward.amount,
                    "reward unlocked",
                );
                interaction.on_ad_complete(reward);
            } else {
                tracing::warn!(
                    placement,
                    format = format.name(),
                    "ignoring reward event for non-rewarded format",
                );
            }
        }
    }
}

/// Reports a failure once, through exactly one listener channel.
///
/// Populate `load` while a request is in flight, `interaction` once the ad
/// has reached the showing phase; never both for the same event.
pub(crate) fn report_failure(
    code: HostErrorCode,
    message: &str,
    placement: &str,
    load: Option<&dyn LoadListener>,
    interaction: Option<&dyn InteractionListener>,
) {
    tracing::warn!(placement, %code, message, "ad request failed");

    if let Some(load) = load {
        load.on_ad_load_failed(code);
    } else if let Some(interaction) = interaction {
        interaction.on_ad_failed(code);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct RecordingListener {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingListener {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn push(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }
    }

    impl LoadListener for RecordingListener {
        fn on_ad_loaded(&self) {
            self.push("loaded");
        }

        fn on_ad_load_failed(&self, code: HostErrorCode) {
            self.push(format!("load_failed:{code}"));
        }
    }

    impl InteractionListener for RecordingListener {
        fn on_ad_clicked(&self) {
            self.push("clicked");
        }

        fn on_ad_shown(&self) {
            self.push("shown");
        }

        fn on_ad_impression(&self) {
            self.push("impression");
        }

        fn on_ad_expanded(&self) {
            self.push("expanded");
        }

        fn on_ad_collapsed(&self) {
            self.push("collapsed");
        }

        fn on_ad_dismissed(&self) {
            self.push("dismissed");
        }

        fn on_ad_failed(&self, code: HostErrorCode) {
            self.push(format!("failed:{code}"));
        }

        fn on_ad_complete(&self, reward: Reward) {
            self.push(format!("complete:{}:{}", reward.label, reward.amount));
        }
    }

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object payload, got {other:?}"),
        }
    }

    #[test]
    fn status_table_matches_contract() {
        assert_eq!(host_error_code(VendorStatus::InternalError), HostErrorCode::InternalError);
        assert_eq!(host_error_code(VendorStatus::NetworkUnreachable), HostErrorCode::NoConnection);
        assert_eq!(host_error_code(VendorStatus::NoFill), HostErrorCode::NoFill);
        assert_eq!(host_error_code(VendorStatus::RequestTimedOut), HostErrorCode::NetworkTimeout);
        assert_eq!(
            host_error_code(VendorStatus::RequestInvalid),
            HostErrorCode::NetworkInvalidState,
        );
        assert_eq!(host_error_code(VendorStatus::ServerError), HostErrorCode::NetworkInvalidState);
    }

    #[test]
    fn unmapped_statuses_default_to_unspecified() {
        for status in [
            VendorStatus::RequestPending,
            VendorStatus::AdActive,
            VendorStatus::EarlyRefreshRequest,
            VendorStatus::RepetitiveLoad,
            VendorStatus::MonetizationDisabled,
            VendorStatus::LowMemory,
        ] {
            assert_eq!(host_error_code(status), HostErrorCode::Unspecified, "status {status:?}");
        }
    }

    #[test]
    fn reward_parses_single_entry() {
        let reward = parse_reward(&payload(json!({ "coins": 10 })));
        assert_eq!(reward, Reward { label: "coins".to_owned(), amount: 10 });
    }

    #[test]
    fn reward_parses_numeric_string_amount() {
        let reward = parse_reward(&payload(json!({ "gems": "25" })));
        assert_eq!(reward, Reward { label: "gems".to_owned(), amount: 25 });
    }

    #[test]
    fn reward_empty_payload_falls_back_to_default() {
        let reward = parse_reward(&payload(json!({})));
        assert_eq!(reward, Reward::default());
        assert_eq!(reward.label, NO_REWARD_LABEL);
        assert_eq!(reward.amount, DEFAULT_REWARD_AMOUNT);
    }

    #[test]
    fn reward_malformed_amount_falls_back_to_default() {
        for value in [json!({ "coins": "lots" }), json!({ "coins": [1, 2] }), json!({ "coins": null })]
        {
            assert_eq!(parse_reward(&payload(value)), Reward::default());
        }
    }

    #[test]
    fn fullscreen_displayed_reports_shown_then_impression() {
        let listener = RecordingListener::default();
        translate(AdFormat::Interstitial, "42", &VendorEvent::Displayed, &listener, &listener);
        assert_eq!(listener.calls(), ["shown", "impression"]);
    }

    #[test]
    fn banner_displayed_reports_expanded() {
        let listener = RecordingListener::default();
        translate(AdFormat::Banner, "42", &VendorEvent::Displayed, &listener, &listener);
        assert_eq!(listener.calls(), ["expanded"]);
    }

    #[test]
    fn dismissal_diverges_per_format() {
        let banner = RecordingListener::default();
        translate(AdFormat::Banner, "42", &VendorEvent::Dismissed, &banner, &banner);
        assert_eq!(banner.calls(), ["collapsed"]);

        let rewarded = RecordingListener::default();
        translate(AdFormat::Rewarded, "42", &VendorEvent::Dismissed, &rewarded, &rewarded);
        assert_eq!(rewarded.calls(), ["dismissed"]);
    }

    #[test]
    fn display_failure_uses_interaction_channel_only() {
        let listener = RecordingListener::default();
        translate(AdFormat::Rewarded, "42", &VendorEvent::DisplayFailed, &listener, &listener);
        assert_eq!(listener.calls(), ["failed:FULLSCREEN_SHOW_ERROR"]);
    }

    #[test]
    fn load_failure_uses_load_channel_only() {
        let listener = RecordingListener::default();
        translate(
            AdFormat::Banner,
            "42",
            &VendorEvent::LoadFailed {
                status: VendorStatus::NoFill,
                message: "no fill".to_owned(),
            },
            &listener,
            &listener,
        );
        assert_eq!(listener.calls(), ["load_failed:NO_FILL"]);
    }

    #[test]
    fn reward_event_completes_interaction_even_when_malformed() {
        let listener = RecordingListener::default();
        translate(
            AdFormat::Rewarded,
            "42",
            &VendorEvent::RewardsUnlocked(payload(json!({ "coins": "many" }))),
            &listener,
            &listener,
        );
        assert_eq!(listener.calls(), ["complete::0"]);
    }

    #[test]
    fn reward_event_ignored_for_other_formats() {
        let listener = RecordingListener::default();
        translate(
            AdFormat::Interstitial,
            "42",
            &VendorEvent::RewardsUnlocked(payload(json!({ "coins": 10 }))),
            &listener,
            &listener,
        );
        assert!(listener.calls().is_empty());
    }

    proptest! {
        #[test]
        fn mapping_is_total(index in 0..VendorStatus::ALL.len()) {
            // Every defined vendor status has a host code; no panic, no gap.
            let status = VendorStatus::ALL[index];
            let _ = host_error_code(status);
        }

        #[test]
        fn reward_parsing_never_fails(label in "[a-z]{0,12}", amount in any::<i64>()) {
            let mut map = Map::new();
            map.insert(label.clone(), json!(amount));
            let reward = parse_reward(&map);
            if let Ok(expected) = i32::try_from(amount) {
                prop_assert_eq!(reward.amount, expected);
            } else {
                prop_assert_eq!(reward, Reward::default());
            }
        }
    }
}
