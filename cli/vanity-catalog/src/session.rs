//! Fetch lifecycle for catalog searches.
//!
//! [`FetchController`] is the deterministic state machine: it hands out a
//! monotonically increasing token per dispatched request and only lets the
//! response carrying the newest token settle the state. [`SearchSession`]
//! is the async glue around it: it owns the filter, drives fetches against a
//! [`Client`] on the tokio runtime and exposes snapshots to views.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::{Client, ClientTrait};
use crate::error::SearchError;
use crate::types::{FilterField, Product, ProductFilter};

/// User-facing message for any failed fetch.
///
/// The distinction between transport and server failures stays in
/// [`SearchError`] for callers that want it; it is not surfaced here.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch products. Please try again later.";

/// Lifecycle of the current fetch.
///
/// Exactly one variant holds at any time. Once a fetch has completed there
/// is no way back to `Idle`: the last terminal outcome is held until a new
/// submission supersedes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(Vec<Product>),
    Error(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// The result set, if this is a `Success` state.
    pub fn products(&self) -> Option<&[Product]> {
        match self {
            FetchState::Success(products) => Some(products),
            _ => None,
        }
    }

    /// The message, if this is an `Error` state.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one dispatched request.
///
/// Tokens increase monotonically per controller; only the response carrying
/// the newest token may settle the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// State machine for one session's fetches.
///
/// [`FetchController::dispatch`] starts a request generation and
/// [`FetchController::settle`] applies its outcome. A response whose token
/// is not the newest one issued is dropped without touching the state, so a
/// slow early response can never overwrite a later submission's outcome.
#[derive(Debug, Default)]
pub struct FetchController {
    state: FetchState,
    latest_token: u64,
    last_success: Option<Vec<Product>>,
}

impl FetchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current lifecycle state.
    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// The most recent successful result set.
    ///
    /// Retained while a newer fetch is `Loading`, so a view can keep
    /// rendering stale results until the pending fetch resolves.
    pub fn last_results(&self) -> Option<&[Product]> {
        match &self.state {
            FetchState::Success(products) => Some(products),
            _ => self.last_success.as_deref(),
        }
    }

    /// Start a new request generation.
    ///
    /// Transitions any state to `Loading` and returns the token the
    /// response must present at settlement.
    pub fn dispatch(&mut self) -> RequestToken {
        self.latest_token += 1;
        self.state = FetchState::Loading;
        debug!(token = self.latest_token, "dispatched catalog fetch");
        RequestToken(self.latest_token)
    }

    /// Apply the outcome of the request identified by `token`.
    ///
    /// Stale responses are dropped; the state is unchanged and the newest
    /// request remains `Loading` until its own response arrives.
    pub fn settle(&mut self, token: RequestToken, outcome: Result<Vec<Product>, SearchError>) {
        if token.0 != self.latest_token {
            debug!(
                token = token.0,
                latest = self.latest_token,
                "dropping superseded catalog response"
            );
            return;
        }

        match outcome {
            Ok(products) => {
                debug!(token = token.0, n_products = products.len(), "fetch succeeded");
                self.last_success = Some(products.clone());
                self.state = FetchState::Success(products);
            },
            Err(err) => {
                debug!(token = token.0, %err, "fetch failed");
                self.state = FetchState::Error(FETCH_ERROR_MESSAGE.to_string());
            },
        }
    }
}

/// Whether a session issues a fetch at construction,
/// or waits for the first explicit submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitMode {
    /// Stay `Idle` until the first [`SearchSession::submit`].
    #[default]
    Manual,
    /// Fetch immediately with the current (possibly empty) filter.
    Eager,
}

/// One user's search session: the current filter and the fetch lifecycle.
///
/// The state is shared between the submit path and the spawned response
/// handlers; it has one writer at a time (whoever holds the lock) and many
/// readers (the view accessors). Critical sections never await.
#[derive(Debug, Clone)]
pub struct SearchSession {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    client: Client,
    state: Mutex<SessionState>,
}

#[derive(Debug, Default)]
struct SessionState {
    filter: ProductFilter,
    controller: FetchController,
}

impl SearchSession {
    /// Create a session around `client`.
    ///
    /// In [`SubmitMode::Eager`] an unfiltered fetch is issued immediately;
    /// that mode must be entered from within a tokio runtime.
    pub fn new(client: Client, mode: SubmitMode) -> Self {
        let session = Self {
            inner: Arc::new(SessionInner {
                client,
                state: Mutex::new(SessionState::default()),
            }),
        };
        if mode == SubmitMode::Eager {
            // detached: the outcome is observed through the session state
            let _ = session.submit();
        }
        session
    }

    /// Replace the value of one filter field.
    ///
    /// Other fields are unchanged; no fetch is triggered until the next
    /// submission.
    pub fn set_filter(&self, field: FilterField, value: impl Into<String>) {
        self.lock_state().filter.set(field, value);
    }

    /// Snapshot of the current filter.
    pub fn filter(&self) -> ProductFilter {
        self.lock_state().filter.clone()
    }

    /// Snapshot of the fetch lifecycle state.
    pub fn state(&self) -> FetchState {
        self.lock_state().controller.state().clone()
    }

    /// The most recent successful result set, if any.
    pub fn last_results(&self) -> Option<Vec<Product>> {
        self.lock_state().controller.last_results().map(<[_]>::to_vec)
    }

    /// Submit the current filter.
    ///
    /// Dispatches a token and spawns the fetch; the response settles the
    /// state under the session lock. Submitting while a request is
    /// outstanding supersedes it logically: the superseded request is not
    /// aborted on the wire, its response is dropped at settlement by token
    /// comparison. The returned handle resolves once this submission's
    /// response has been handled.
    pub fn submit(&self) -> JoinHandle<()> {
        let (filter, token) = {
            let mut state = self.lock_state();
            (state.filter.clone(), state.controller.dispatch())
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let outcome = inner.client.search_products(&filter).await;
            let mut state = inner.state.lock().expect("session state lock poisoned");
            state.controller.settle(token, outcome);
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state.lock().expect("session state lock poisoned")
    }
}
