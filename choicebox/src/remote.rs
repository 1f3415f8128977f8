//! Server-backed options with debounce and response supersession.
//!
//! `RemoteCombobox` wraps a [`Combobox`] and replaces its static candidate
//! list with an injected loader future keyed on the search text. Every query
//! edit bumps a monotonically increasing token; the debounce timer and the
//! fetch continuation both check the token before acting, so a keystroke
//! inside the debounce window restarts the timer and a response for a
//! superseded query is dropped on the floor even if it arrives after a newer
//! one. Responses can never land out of order in the visible results.
//!
//! The widget must live on a tokio runtime; call [`RemoteCombobox::shutdown`]
//! on teardown so outstanding timers and responses resolve into nothing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::future::BoxFuture;
use log::{trace, warn};

use crate::choice::Choice;
use crate::combobox::{Combobox, ComboboxEvents};
use crate::error::LoadError;
use crate::events::EventResult;
use crate::keybinds::KeyCombo;

/// Default debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Injected option loader: search text in, choices out.
pub type Loader<M> =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<Vec<Choice<M>>, LoadError>> + Send + Sync>;

/// Handler invoked with loader failures, supplied by the embedder.
pub type ErrorHandler = Arc<dyn Fn(LoadError) + Send + Sync>;

/// Token tagging one fetch; only the latest issued token may apply results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

#[derive(Debug)]
struct RemoteInner<M> {
    /// Options shown for an empty query (no fetch for those)
    defaults: Vec<Choice<M>>,
    /// Debounce window for query edits
    debounce: Duration,
    /// Last loader failure, kept for the embedding application
    last_error: Option<LoadError>,
}

/// A combobox whose options come from a debounced async loader.
pub struct RemoteCombobox<M: Clone = ()> {
    combobox: Combobox<M>,
    loader: Loader<M>,
    error_handler: Option<ErrorHandler>,
    inner: Arc<RwLock<RemoteInner<M>>>,
    /// Latest issued token; timers and responses for older tokens are stale
    token: Arc<AtomicU64>,
    /// Token of the fetch in flight (0 = none). Loading shows only while
    /// this matches the current token, so a superseded fetch marking itself
    /// late can never stick the indicator.
    fetching: Arc<AtomicU64>,
}

impl<M: Clone + Send + Sync + 'static> RemoteCombobox<M> {
    /// Create a remote combobox around a loader.
    pub fn new(loader: Loader<M>) -> Self {
        Self {
            combobox: Combobox::new(),
            loader,
            error_handler: None,
            inner: Arc::new(RwLock::new(RemoteInner {
                defaults: Vec::new(),
                debounce: DEFAULT_DEBOUNCE,
                last_error: None,
            })),
            token: Arc::new(AtomicU64::new(0)),
            fetching: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Set the options shown while the search text is empty. Also installs
    /// them as the current options.
    pub fn with_defaults(self, defaults: Vec<Choice<M>>) -> Self {
        self.combobox.set_choices(defaults.clone());
        if let Ok(mut guard) = self.inner.write() {
            guard.defaults = defaults;
        }
        self
    }

    /// Set the debounce window.
    pub fn with_debounce(self, debounce: Duration) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.debounce = debounce;
        }
        self
    }

    /// Install a handler for loader failures.
    pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = Some(handler);
        self
    }

    /// Access the wrapped combobox (selection, open/close, dropdown view).
    pub fn combobox(&self) -> &Combobox<M> {
        &self.combobox
    }

    /// Check whether a fetch for the current token is in flight.
    pub fn is_loading(&self) -> bool {
        let fetching = self.fetching.load(Ordering::SeqCst);
        fetching != 0 && fetching == self.token.load(Ordering::SeqCst)
    }

    /// Get the last loader failure, if any.
    pub fn last_error(&self) -> Option<LoadError> {
        self.inner
            .read()
            .map(|guard| guard.last_error.clone())
            .unwrap_or(None)
    }

    /// Change the debounce window.
    pub fn set_debounce(&self, debounce: Duration) {
        if let Ok(mut guard) = self.inner.write() {
            guard.debounce = debounce;
        }
    }

    /// Get the debounce window.
    pub fn debounce(&self) -> Duration {
        self.inner
            .read()
            .map(|guard| guard.debounce)
            .unwrap_or(DEFAULT_DEBOUNCE)
    }

    // -------------------------------------------------------------------------
    // Input handling
    // -------------------------------------------------------------------------

    /// Handle keyboard input, scheduling a fetch when the search text
    /// changed. Events pass through from the wrapped combobox.
    pub fn handle_key(&self, key: &KeyCombo) -> (EventResult, ComboboxEvents) {
        let before = self.combobox.search_text();
        let out = self.combobox.handle_key(key);
        let after = self.combobox.search_text();
        if after != before {
            self.schedule(after);
        }
        out
    }

    /// React to a query edit: debounce, then fetch.
    ///
    /// An empty query bypasses the debounce and the network entirely and
    /// restores the default options immediately; the token still advances so
    /// any in-flight response is discarded.
    pub fn schedule(&self, query: String) {
        let token = self.bump_token();

        if query.is_empty() {
            self.fetching.store(0, Ordering::SeqCst);
            let defaults = self
                .inner
                .read()
                .map(|guard| guard.defaults.clone())
                .unwrap_or_default();
            self.combobox.set_choices(defaults);
            trace!("{}: empty query, restored defaults", self.combobox.id());
            return;
        }

        let this = self.clone();
        let debounce = self.debounce();
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !this.is_current(token) {
                // A newer keystroke restarted the timer.
                return;
            }
            trace!(
                "{}: fetching {:?} (token {})",
                this.combobox.id(),
                query,
                token.0
            );
            this.mark_fetching(token);
            let result = (this.loader)(query).await;
            this.apply_response(token, result);
        });
    }

    // -------------------------------------------------------------------------
    // Token machinery
    // -------------------------------------------------------------------------

    /// Issue a new token, superseding all earlier ones.
    fn bump_token(&self) -> FetchToken {
        FetchToken(self.token.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Check whether a token is still the latest issued.
    pub fn is_current(&self, token: FetchToken) -> bool {
        self.token.load(Ordering::SeqCst) == token.0
    }

    /// Record that a fetch for a token is in flight.
    ///
    /// Called between debounce expiry and response application; loading
    /// shows only while the token is still current.
    pub fn mark_fetching(&self, token: FetchToken) {
        self.fetching.store(token.0, Ordering::SeqCst);
    }

    /// Start a fetch directly, bypassing the debounce.
    ///
    /// Marks loading and returns the token the eventual response must carry.
    pub fn begin_fetch(&self, _query: &str) -> FetchToken {
        let token = self.bump_token();
        self.mark_fetching(token);
        token
    }

    /// Apply a fetch response.
    ///
    /// Returns true when the response was applied; a response carrying a
    /// superseded token changes nothing and returns false. Failures apply an
    /// empty result set, record the error, and notify the error handler;
    /// they never propagate out of this call.
    pub fn apply_response(
        &self,
        token: FetchToken,
        result: Result<Vec<Choice<M>>, LoadError>,
    ) -> bool {
        if !self.is_current(token) {
            trace!(
                "{}: dropping stale response (token {})",
                self.combobox.id(),
                token.0
            );
            // Retire our in-flight marker, but never a newer fetch's.
            let _ = self.fetching.compare_exchange(
                token.0,
                0,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );
            return false;
        }

        self.fetching.store(0, Ordering::SeqCst);
        match result {
            Ok(choices) => {
                if let Ok(mut guard) = self.inner.write() {
                    guard.last_error = None;
                }
                self.combobox.clear_error();
                self.combobox.set_choices(choices);
            }
            Err(err) => {
                warn!("{}: load failed: {err}", self.combobox.id());
                if let Ok(mut guard) = self.inner.write() {
                    guard.last_error = Some(err.clone());
                }
                self.combobox.set_error(err.message.clone());
                self.combobox.set_choices(Vec::new());
                if let Some(handler) = &self.error_handler {
                    handler(err);
                }
            }
        }
        true
    }

    /// Invalidate every outstanding timer and in-flight fetch.
    ///
    /// Call on teardown so nothing resolves into the widget afterwards.
    /// Closing the dropdown deliberately does not do this; a fetch in flight
    /// when the user reopens still lands if its token is current.
    pub fn shutdown(&self) {
        self.bump_token();
        self.fetching.store(0, Ordering::SeqCst);
    }
}

impl<M: Clone> Clone for RemoteCombobox<M> {
    fn clone(&self) -> Self {
        Self {
            combobox: self.combobox.clone(),
            loader: Arc::clone(&self.loader),
            error_handler: self.error_handler.clone(),
            inner: Arc::clone(&self.inner),
            token: Arc::clone(&self.token),
            fetching: Arc::clone(&self.fetching),
        }
    }
}

impl<M: Clone> std::fmt::Debug for RemoteCombobox<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCombobox")
            .field("combobox", &self.combobox.id_string())
            .field("token", &self.token.load(Ordering::SeqCst))
            .field("fetching", &self.fetching.load(Ordering::SeqCst))
            .finish()
    }
}
