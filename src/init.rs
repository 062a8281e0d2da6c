//! Once-per-process vendor SDK initialization.
//!
//! Every ad request funnels through [`NetworkInitializer::initialize`].
//! The underlying vendor init call is issued at most once per process; all
//! callers registered before the vendor completes receive exactly one
//! completion callback with the same terminal outcome.
//!
//! # State machine
//!
//! ```text
//! NotStarted ──[first caller]──> InProgress ──[vendor success]──> Initialized
//!     ▲                              │
//!     └───────[vendor failure]───────┘
//! ```
//!
//! A failed vendor init resets to `NotStarted` so a later, independent ad
//! request can retry. Once `Initialized`, further calls complete
//! immediately with success and the vendor is not contacted again.

use std::mem;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::NetworkConfig;
use crate::error::InitError;
use crate::vendor::{VendorLogLevel, VendorSdk};

/// Host framework log verbosity, as reported to the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostLogLevel {
    /// Host logging disabled.
    None,
    /// Host debug logging.
    Debug,
    /// Host info logging.
    Info,
    /// Host warning logging.
    Warn,
    /// Host error logging.
    Error,
}

impl HostLogLevel {
    /// Maps the host level onto a vendor level.
    ///
    /// Debug/Info map to vendor debug, None maps to vendor none; any other
    /// host level leaves the vendor default untouched.
    #[must_use]
    pub fn vendor_level(self) -> Option<VendorLogLevel> {
        match self {
            Self::Debug | Self::Info => Some(VendorLogLevel::Debug),
            Self::None => Some(VendorLogLevel::None),
            Self::Warn | Self::Error => None,
        }
    }
}

/// Process-wide initialization state.
///
/// Numeric values back the atomic representation inside
/// [`NetworkInitializer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InitState {
    /// No vendor init has been issued, or the last one failed.
    NotStarted = 0,
    /// A vendor init call is in flight.
    InProgress = 1,
    /// The vendor SDK completed initialization successfully.
    Initialized = 2,
}

/// Completion callback registered by an initialization caller.
pub type InitCallback = Box<dyn FnOnce(Result<(), InitError>) + Send>;

/// Idempotent, fan-out initializer for the vendor SDK.
///
/// One instance is shared by every adapter in the process (the host
/// framework enforces a single global adapter configuration, which owns
/// this initializer). Thread-safe: state transitions are atomic and the
/// waiter list is drained all-or-nothing, so every waiter observes the
/// same terminal outcome.
#[derive(Default)]
pub struct NetworkInitializer {
    /// Current state (NotStarted=0, InProgress=1, Initialized=2).
    state: AtomicU8,

    /// Callers awaiting the in-flight vendor init.
    ///
    /// Also the synchronization point for state transitions: terminal
    /// stores happen under this lock so a caller can never register a
    /// waiter that no drain will pick up.
    waiters: Mutex<Vec<InitCallback>>,
}

impl std::fmt::Debug for NetworkInitializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkInitializer")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl NetworkInitializer {
    /// Creates an initializer in the `NotStarted` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current initialization state.
    pub fn state(&self) -> InitState {
        match self.state.load(Ordering::Acquire) {
            0 => InitState::NotStarted,
            1 => InitState::InProgress,
            _ => InitState::Initialized,
        }
    }

    /// Ensures the vendor SDK is initialized and reports completion.
    ///
    /// Extracts the account id from `config`; on failure `on_complete`
    /// fires immediately with the configuration error and the
    /// initialization state is left untouched. Otherwise the vendor log
    /// level is set synchronously from `log_level`, the caller is
    /// registered as a waiter, and the vendor async init is issued if no
    /// attempt is in flight yet. `on_complete` fires exactly once in every
    /// path, possibly on a vendor-owned thread.
    pub fn initialize(
        self: &Arc<Self>,
        config: &NetworkConfig,
        sdk: &Arc<dyn VendorSdk>,
        log_level: HostLogLevel,
        on_complete: InitCallback,
    ) {
        let account_id = match config.account_id() {
            Ok(account_id) => account_id,
            Err(error) => {
                tracing::warn!(%error, "vendor initialization rejected before SDK contact");
                on_complete(Err(InitError::Config(error)));
                return;
            }
        };

        if let Some(level) = log_level.vendor_level() {
            sdk.set_log_level(level);
        }

        {
            let mut waiters = self.lock_waiters();
            if self.state() == InitState::Initialized {
                drop(waiters);
                on_complete(Ok(()));
                return;
            }
            waiters.push(on_complete);
        }

        let became_owner = self
            .state
            .compare_exchange(
                InitState::NotStarted as u8,
                InitState::InProgress as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();

        if became_owner {
            tracing::info!(account = %account_id, "starting vendor SDK initialization");
            let this = Arc::clone(self);
            sdk.init(
                &account_id,
                Box::new(move |outcome| {
                    this.complete(outcome.map_err(|e| InitError::Vendor(e.0)));
                }),
            );
        }
    }

    /// Terminal transition driven by the vendor's completion callback.
    ///
    /// Stores the terminal state and drains the waiter list inside one
    /// critical section, so late callers either see the terminal state or
    /// get drained here; no waiter is ever left behind.
    fn complete(&self, outcome: Result<(), InitError>) {
        let drained = {
            let mut waiters = self.lock_waiters();
            let terminal = match &outcome {
                Ok(()) => InitState::Initialized,
                Err(_) => InitState::NotStarted,
            };
            self.state.store(terminal as u8, Ordering::Release);
            mem::take(&mut *waiters)
        };

        match &outcome {
            Ok(()) => tracing::info!(waiters = drained.len(), "vendor SDK initialization succeeded"),
            Err(error) => tracing::warn!(
                waiters = drained.len(),
                %error,
                "vendor SDK initialization failed, will retry on a later ad request",
            ),
        }

        for waiter in drained {
            waiter(outcome.clone());
        }
    }

    fn lock_waiters(&self) -> std::sync::MutexGuard<'_, Vec<InitCallback>> {
        // Waiter callbacks run after the lock is released, so the lock is
        // only ever held for list bookkeeping and cannot deadlock through
        // a poisoning panic in adapter code.
        match self.waiters.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::config::{ACCOUNT_ID_KEY, NetworkConfig};
    use crate::testing::MockVendorSdk;

    fn account_config() -> NetworkConfig {
        [(ACCOUNT_ID_KEY, "account-1")].into_iter().collect()
    }

    fn sdk_pair() -> (Arc<MockVendorSdk>, Arc<dyn VendorSdk>) {
        let mock = Arc::new(MockVendorSdk::new());
        let sdk: Arc<dyn VendorSdk> = mock.clone();
        (mock, sdk)
    }

    #[test]
    fn log_level_mapping() {
        assert_eq!(HostLogLevel::Debug.vendor_level(), Some(VendorLogLevel::Debug));
        assert_eq!(HostLogLevel::Info.vendor_level(), Some(VendorLogLevel::Debug));
        assert_eq!(HostLogLevel::None.vendor_level(), Some(VendorLogLevel::None));
        assert_eq!(HostLogLevel::Warn.vendor_level(), None);
        assert_eq!(HostLogLevel::Error.vendor_level(), None);
    }

    #[test]
    fn missing_account_id_fails_without_touching_state() {
        let (mock, sdk) = sdk_pair();
        let initializer = Arc::new(NetworkInitializer::new());
        let outcome = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&outcome);
        initializer.initialize(
            &NetworkConfig::new(),
            &sdk,
            HostLogLevel::Warn,
            Box::new(move |result| *slot.lock().unwrap() = Some(result)),
        );

        assert!(matches!(
            outcome.lock().unwrap().as_ref(),
            Some(Err(InitError::Config(crate::error::ConfigError::AccountIdMissing)))
        ));
        assert_eq!(initializer.state(), InitState::NotStarted);
        assert_eq!(mock.init_calls(), 0);
    }

    #[test]
    fn successful_init_transitions_and_notifies() {
        let (mock, sdk) = sdk_pair();
        let initializer = Arc::new(NetworkInitializer::new());
        let completions = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&completions);
        initializer.initialize(
            &account_config(),
            &sdk,
            HostLogLevel::Debug,
            Box::new(move |result| {
                assert!(result.is_ok());
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(initializer.state(), InitState::InProgress);
        mock.complete_init(Ok(()));
        assert_eq!(initializer.state(), InitState::Initialized);
        assert_eq!(completions.load(Ordering::SeqCst), 1);
        assert_eq!(mock.log_level(), Some(VendorLogLevel::Debug));
    }

    #[test]
    fn fan_out_single_vendor_call() {
        let (mock, sdk) = sdk_pair();
        let initializer = Arc::new(NetworkInitializer::new());
        let completions = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let counter = Arc::clone(&completions);
            initializer.initialize(
                &account_config(),
                &sdk,
                HostLogLevel::Warn,
                Box::new(move |result| {
                    assert!(result.is_ok());
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        assert_eq!(mock.init_calls(), 1);
        mock.complete_init(Ok(()));
        assert_eq!(completions.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn failure_resets_state_and_notifies_all_waiters() {
        let (mock, sdk) = sdk_pair();
        let initializer = Arc::new(NetworkInitializer::new());
        let failures = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = Arc::clone(&failures);
            initializer.initialize(
                &account_config(),
                &sdk,
                HostLogLevel::Warn,
                Box::new(move |result| {
                    assert!(matches!(result, Err(InitError::Vendor(_))));
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        mock.complete_init(Err("no consent".to_owned()));
        assert_eq!(failures.load(Ordering::SeqCst), 3);
        assert_eq!(initializer.state(), InitState::NotStarted);

        // A later request retries the vendor init.
        initializer.initialize(&account_config(), &sdk, HostLogLevel::Warn, Box::new(|_| {}));
        assert_eq!(mock.init_calls(), 2);
    }

    #[test]
    fn initialized_completes_immediately_without_new_vendor_call() {
        let (mock, sdk) = sdk_pair();
        let initializer = Arc::new(NetworkInitializer::new());

        initializer.initialize(&account_config(), &sdk, HostLogLevel::Warn, Box::new(|_| {}));
        mock.complete_init(Ok(()));

        let completed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&completed);
        initializer.initialize(
            &account_config(),
            &sdk,
            HostLogLevel::Warn,
            Box::new(move |result| {
                assert!(result.is_ok());
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert_eq!(mock.init_calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_observe_one_outcome() {
        let (mock, sdk) = sdk_pair();
        let initializer = Arc::new(NetworkInitializer::new());
        let completions = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let initializer = Arc::clone(&initializer);
            let sdk = Arc::clone(&sdk);
            let counter = Arc::clone(&completions);
            handles.push(tokio::task::spawn_blocking(move || {
                initializer.initialize(
                    &account_config(),
                    &sdk,
                    HostLogLevel::Warn,
                    Box::new(move |result| {
                        assert!(result.is_ok());
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(mock.init_calls(), 1);
        mock.complete_init(Ok(()));
        assert_eq!(completions.load(Ordering::SeqCst), 16);
    }
}
