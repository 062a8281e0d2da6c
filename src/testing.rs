//! Scriptable in-memory vendor SDK for tests and demos.
//!
//! [`MockVendorSdk`] implements the [`VendorSdk`] and [`VendorAdUnit`]
//! traits against a shared journal of recorded calls. Tests script it from
//! the outside: complete or fail initialization, flip per-placement
//! readiness, emit vendor events into the handlers the adapters
//! registered, and then assert on the journal and on listener output.
//!
//! Event handlers and init callbacks are always invoked with the mock's
//! internal lock released, matching the asynchronous delivery contract
//! real vendor SDKs are held to.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{AccountId, PlacementId};
use crate::events::VendorEvent;
use crate::vendor::{
    AdFormat, VendorAdError, VendorAdUnit, VendorEventHandler, VendorInitCallback, VendorLogLevel,
    VendorSdk, VendorSdkError,
};

const MOCK_SDK_VERSION: &str = "10.6.2";

/// One recorded call into the mock vendor SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `set_log_level` was called.
    SetLogLevel(VendorLogLevel),
    /// `init` was called with this account id.
    Init {
        /// Account id passed to `init`.
        account: String,
    },
    /// `bidding_token` was queried with these extras.
    BiddingToken {
        /// Extras forwarded with the token request.
        extras: HashMap<String, String>,
    },
    /// An ad object was constructed.
    CreateAd {
        /// Format of the constructed ad.
        format: AdFormat,
        /// Placement the ad was constructed for.
        placement: i64,
    },
    /// Request extras were attached to an ad object.
    SetExtras {
        /// Placement of the ad object.
        placement: i64,
        /// The attached extras.
        extras: HashMap<String, String>,
    },
    /// A traditional load was issued.
    Load {
        /// Placement of the ad object.
        placement: i64,
    },
    /// A bidding load was issued with this markup.
    LoadWithMarkup {
        /// Placement of the ad object.
        placement: i64,
        /// The ad markup bytes.
        markup: Vec<u8>,
    },
    /// `show` was called on an ad object.
    Show {
        /// Placement of the ad object.
        placement: i64,
    },
    /// `destroy` was called on an ad object.
    Destroy {
        /// Placement of the ad object.
        placement: i64,
    },
}

#[derive(Default)]
struct MockState {
    journal: Vec<MockCall>,
    log_level: Option<VendorLogLevel>,
    init_calls: usize,
    pending_init: Vec<VendorInitCallback>,
    auto_init: Option<Result<(), String>>,
    fail_construction: Option<VendorAdError>,
    bidding_token: Option<String>,
    handlers: HashMap<i64, VendorEventHandler>,
    ready: HashSet<i64>,
}

/// Scriptable vendor SDK double.
#[derive(Default)]
pub struct MockVendorSdk {
    state: Arc<Mutex<MockState>>,
}

impl std::fmt::Debug for MockVendorSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MockVendorSdk")
            .field("journal", &state.journal)
            .field("init_calls", &state.init_calls)
            .finish_non_exhaustive()
    }
}

impl MockVendorSdk {
    /// Creates a mock with an empty journal and no scripted behavior.
    ///
    /// Initialization stays pending until [`complete_init`](Self::complete_init)
    /// unless [`auto_complete_init`](Self::auto_complete_init) is armed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Every call recorded so far, in order.
    #[must_use]
    pub fn journal(&self) -> Vec<MockCall> {
        self.lock().journal.clone()
    }

    /// Number of `init` calls received.
    #[must_use]
    pub fn init_calls(&self) -> usize {
        self.lock().init_calls
    }

    /// The most recently set vendor log level, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<VendorLogLevel> {
        self.lock().log_level
    }

    /// Completes init callbacks synchronously with this outcome from now on.
    pub fn auto_complete_init(&self, outcome: Result<(), String>) {
        self.lock().auto_init = Some(outcome);
    }

    /// Resolves all pending init callbacks with this outcome.
    pub fn complete_init(&self, outcome: Result<(), String>) {
        let callbacks: Vec<VendorInitCallback> = {
            let mut state = self.lock();
            state.pending_init.drain(..).collect()
        };
        for callback in callbacks {
            callback(outcome.clone().map_err(VendorSdkError));
        }
    }

    /// Makes the next `create_ad` call fail with this error.
    pub fn fail_next_construction(&self, error: VendorAdError) {
        self.lock().fail_construction = Some(error);
    }

    /// Scripts the token returned by `bidding_token`.
    pub fn set_bidding_token(&self, token: Option<&str>) {
        self.lock().bidding_token = token.map(str::to_owned);
    }

    /// Flips the readiness flag for a placement's ad object.
    pub fn set_ready(&self, placement: i64, ready: bool) {
        let mut state = self.lock();
        if ready {
            state.ready.insert(placement);
        } else {
            state.ready.remove(&placement);
        }
    }

    /// Delivers a vendor event to the handler registered for a placement.
    ///
    /// Does nothing when no ad object exists for the placement.
    pub fn emit(&self, placement: i64, event: VendorEvent) {
        let handler = self.lock().handlers.get(&placement).cloned();
        if let Some(handler) = handler {
            handler(event);
        }
    }
}

impl VendorSdk for MockVendorSdk {
    fn set_log_level(&self, level: VendorLogLevel) {
        let mut state = self.lock();
        state.log_level = Some(level);
        state.journal.push(MockCall::SetLogLevel(level));
    }

    fn init(&self, account_id: &AccountId, on_complete: VendorInitCallback) {
        let auto = {
            let mut state = self.lock();
            state.init_calls += 1;
            state.journal.push(MockCall::Init { account: account_id.as_str().to_owned() });
            match state.auto_init.clone() {
                Some(outcome) => Some(outcome),
                None => {
                    state.pending_init.push(on_complete);
                    return;
                }
            }
        };
        if let Some(outcome) = auto {
            on_complete(outcome.map_err(VendorSdkError));
        }
    }

    fn version(&self) -> String {
        MOCK_SDK_VERSION.to_owned()
    }

    fn bidding_token(&self, extras: &HashMap<String, String>) -> Option<String> {
        let mut state = self.lock();
        state.journal.push(MockCall::BiddingToken { extras: extras.clone() });
        state.bidding_token.clone()
    }

    fn create_ad(
        &self,
        format: AdFormat,
        placement: PlacementId,
        handler: VendorEventHandler,
    ) -> Result<Box<dyn VendorAdUnit>, VendorAdError> {
        let mut state = self.lock();
        if let Some(error) = state.fail_construction.take() {
            return Err(error);
        }
        state.journal.push(MockCall::CreateAd { format, placement: placement.get() });
        state.handlers.insert(placement.get(), handler);
        Ok(Box::new(MockAdUnit { state: self.state.clone(), placement: placement.get() }))
    }
}

/// Ad object handed out by [`MockVendorSdk::create_ad`].
pub struct MockAdUnit {
    state: Arc<Mutex<MockState>>,
    placement: i64,
}

impl std::fmt::Debug for MockAdUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAdUnit").field("placement", &self.placement).finish_non_exhaustive()
    }
}

impl MockAdUnit {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl VendorAdUnit for MockAdUnit {
    fn set_extras(&mut self, extras: &HashMap<String, String>) {
        let placement = self.placement;
        self.lock().journal.push(MockCall::SetExtras { placement, extras: extras.clone() });
    }

    fn load(&mut self) {
        let placement = self.placement;
        self.lock().journal.push(MockCall::Load { placement });
    }

    fn load_with_markup(&mut self, markup: &[u8]) {
        let placement = self.placement;
        self.lock()
            .journal
            .push(MockCall::LoadWithMarkup { placement, markup: markup.to_vec() });
    }

    fn is_ready(&self) -> bool {
        self.lock().ready.contains(&self.placement)
    }

    fn show(&mut self) {
        let placement = self.placement;
        self.lock().journal.push(MockCall::Show { placement });
    }

    fn destroy(&mut self) {
        let placement = self.placement;
        let mut state = self.lock();
        state.journal.push(MockCall::Destroy { placement });
        state.handlers.remove(&placement);
        state.ready.remove(&placement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NetworkConfig, ACCOUNT_ID_KEY};

    #[test]
    fn pending_init_resolves_on_complete() {
        let mock = MockVendorSdk::new();
        let config: NetworkConfig = [(ACCOUNT_ID_KEY, "acct")].into_iter().collect();
        let account = config.account_id().unwrap();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        mock.init(
            &account,
            Box::new(move |outcome| {
                *sink.lock().unwrap() = Some(outcome.is_ok());
            }),
        );
        assert_eq!(*seen.lock().unwrap(), None);

        mock.complete_init(Ok(()));
        assert_eq!(*seen.lock().unwrap(), Some(true));
        assert_eq!(mock.init_calls(), 1);
    }

    #[test]
    fn emit_without_ad_object_is_a_no_op() {
        let mock = MockVendorSdk::new();
        mock.emit(7, VendorEvent::LoadSucceeded);
        assert!(mock.journal().is_empty());
    }
}
