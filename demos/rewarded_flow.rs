//! Walks a rewarded ad through its full lifecycle against the scriptable
//! vendor double, including a premature show attempt and reward payload
//! delivery. Run with `cargo run --example rewarded_flow`.

use std::sync::Arc;

use serde_json::json;

use inmobi_mediation_bridge::configuration::AdapterConfiguration;
use inmobi_mediation_bridge::events::VendorEvent;
use inmobi_mediation_bridge::testing::MockVendorSdk;
use inmobi_mediation_bridge::{
    AdRequest, HostErrorCode, HostLogLevel, InteractionListener, LoadListener, NetworkConfig,
    Reward,
};

struct PrintingListener;

impl LoadListener for PrintingListener {
    fn on_ad_loaded(&self) {
        println!("host listener <- loaded");
    }

    fn on_ad_load_failed(&self, code: HostErrorCode) {
        println!("host listener <- load failed: {code}");
    }
}

impl InteractionListener for PrintingListener {
    fn on_ad_shown(&self) {
        println!("host listener <- shown");
    }

    fn on_ad_impression(&self) {
        println!("host listener <- impression");
    }

    fn on_ad_dismissed(&self) {
        println!("host listener <- dismissed");
    }

    fn on_ad_failed(&self, code: HostErrorCode) {
        println!("host listener <- failed: {code}");
    }

    fn on_ad_complete(&self, reward: Reward) {
        println!("host listener <- reward unlocked: {} x{}", reward.label, reward.amount);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let vendor = Arc::new(MockVendorSdk::new());
    vendor.auto_complete_init(Ok(()));

    let configuration =
        AdapterConfiguration::new(vendor.clone()).with_log_level(HostLogLevel::Info);
    let listener = Arc::new(PrintingListener);
    let adapter = configuration.rewarded_adapter(listener.clone(), listener.clone());

    let config: NetworkConfig = [
        ("accountid", "4028cb8b2c3a0b45012c406824e800ba"),
        ("placementid", "99"),
    ]
    .into_iter()
    .collect();
    adapter.load(AdRequest::new(config));

    // Showing before the vendor reports readiness fails fast.
    adapter.show();

    vendor.emit(99, VendorEvent::LoadSucceeded);
    vendor.set_ready(99, true);
    adapter.show();
    vendor.emit(99, VendorEvent::Displayed);

    let payload = match json!({ "coins": 50 }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    vendor.emit(99, VendorEvent::RewardsUnlocked(payload));
    vendor.emit(99, VendorEvent::Dismissed);

    adapter.invalidate();
}
