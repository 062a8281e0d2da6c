//! Walks a banner request through the adapter against the scriptable
//! vendor double: waterfall configuration, load, display events, and
//! invalidation. Run with `cargo run --example banner_waterfall`.

use std::sync::{Arc, Mutex};

use inmobi_mediation_bridge::configuration::AdapterConfiguration;
use inmobi_mediation_bridge::events::VendorEvent;
use inmobi_mediation_bridge::testing::MockVendorSdk;
use inmobi_mediation_bridge::{
    AdRequest, HostErrorCode, HostLogLevel, InteractionListener, LoadListener, NetworkConfig,
};

#[derive(Default)]
struct PrintingListener {
    events: Mutex<Vec<&'static str>>,
}

impl PrintingListener {
    fn record(&self, event: &'static str) {
        println!("host listener <- {event}");
        self.events.lock().unwrap().push(event);
    }
}

impl LoadListener for PrintingListener {
    fn on_ad_loaded(&self) {
        self.record("loaded");
    }

    fn on_ad_load_failed(&self, code: HostErrorCode) {
        println!("host listener <- load failed: {code}");
    }
}

impl InteractionListener for PrintingListener {
    fn on_ad_clicked(&self) {
        self.record("clicked");
    }

    fn on_ad_expanded(&self) {
        self.record("expanded");
    }

    fn on_ad_collapsed(&self) {
        self.record("collapsed");
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

    let configuration = AdapterConfiguration::new(vendor.clone())
        .with_log_level(HostLogLevel::Info)
        .with_host_sdk_version("5.18.0");
    println!("adapter {} for network {}", configuration.adapter_version(), configuration.network_name());

    let listener = Arc::new(PrintingListener::default());
    let adapter = configuration.banner_adapter(listener.clone(), listener.clone());

    let config: NetworkConfig = [
        ("accountid", "4028cb8b2c3a0b45012c406824e800ba"),
        ("placementid", "1473306788566"),
    ]
    .into_iter()
    .collect();

    adapter.load(AdRequest::new(config).with_size(320, 50).with_density(2.625));
    if let Some(view) = adapter.ad_view() {
        println!("banner container: {}x{} px", view.width_px, view.height_px);
    }

    vendor.emit(1_473_306_788_566, VendorEvent::LoadSucceeded);
    vendor.emit(1_473_306_788_566, VendorEvent::Displayed);
    vendor.emit(1_473_306_788_566, VendorEvent::Clicked);
    vendor.emit(1_473_306_788_566, VendorEvent::Dismissed);

    adapter.invalidate();
    println!("banner lifecycle finished: {:?}", listener.events.lock().unwrap());
}
