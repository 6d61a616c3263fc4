//! Entity store: independent slices behind a single writer.
//!
//! Each slice owns its initial value and an exhaustive `reduce`. The `Store`
//! funnels every transition through one `watch` channel, so writes are
//! serialized and readers always see a whole snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::trace;

pub mod auth;
pub mod catalog;
pub mod city;
pub mod current_offer;
pub mod favorites;

pub use auth::{AuthAction, AuthState};
pub use catalog::{sort_offers, CatalogAction, CatalogState};
pub use city::{CityAction, CityState};
pub use current_offer::{CurrentOfferAction, CurrentOfferState};
pub use favorites::{FavoritesAction, FavoritesState};

/// Outcome of the most recent fetch feeding a slice field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RemoteStatus {
    #[default]
    Idle,
    Loaded,
    /// Data belongs to a previously viewed offer and has not been replaced yet.
    Stale,
    /// The last fetch failed; `data` still holds the previous value.
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Remote<T> {
    pub data: T,
    pub status: RemoteStatus,
}

impl<T> Remote<T> {
    pub fn loaded(&mut self, data: T) {
        self.data = data;
        self.status = RemoteStatus::Loaded;
    }

    pub fn failed(&mut self, reason: String) {
        self.status = RemoteStatus::Failed(reason);
    }

    pub fn mark_stale(&mut self) {
        if self.status != RemoteStatus::Idle {
            self.status = RemoteStatus::Stale;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// Bumped by every applied action.
    pub version: u64,
    pub auth: AuthState,
    pub city: CityState,
    pub catalog: CatalogState,
    pub current_offer: CurrentOfferState,
    pub favorites: FavoritesState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    City(CityAction),
    Catalog(CatalogAction),
    CurrentOffer(CurrentOfferAction),
    Favorites(FavoritesAction),
}

impl From<AuthAction> for Action {
    fn from(a: AuthAction) -> Self {
        Action::Auth(a)
    }
}

impl From<CityAction> for Action {
    fn from(a: CityAction) -> Self {
        Action::City(a)
    }
}

impl From<CatalogAction> for Action {
    fn from(a: CatalogAction) -> Self {
        Action::Catalog(a)
    }
}

impl From<CurrentOfferAction> for Action {
    fn from(a: CurrentOfferAction) -> Self {
        Action::CurrentOffer(a)
    }
}

impl From<FavoritesAction> for Action {
    fn from(a: FavoritesAction) -> Self {
        Action::Favorites(a)
    }
}

impl State {
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Auth(a) => self.auth.reduce(a),
            Action::City(a) => self.city.reduce(a),
            Action::Catalog(a) => self.catalog.reduce(a),
            Action::CurrentOffer(a) => self.current_offer.reduce(a),
            Action::Favorites(a) => self.favorites.reduce(a),
        }
        self.version += 1;
    }
}

/// Cloneable handle to the shared state.
#[derive(Clone)]
pub struct Store {
    tx: Arc<watch::Sender<State>>,
    requests: Arc<AtomicU64>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("version", &self.tx.borrow().version)
            .finish_non_exhaustive()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(State::default())
    }

    pub fn with_state(state: State) -> Self {
        let last_request = state.current_offer.request;
        let (tx, _rx) = watch::channel(state);
        Self {
            tx: Arc::new(tx),
            requests: Arc::new(AtomicU64::new(last_request)),
        }
    }

    /// Monotonic number identifying a detail fetch.
    pub fn next_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply one transition. Transitions never interleave.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        trace!(?action, "dispatch");
        self.tx.send_modify(|state| state.apply(action));
    }

    pub fn snapshot(&self) -> State {
        self.tx.borrow().clone()
    }

    /// Read without cloning the whole state.
    pub fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver that wakes on every dispatched action.
    pub fn subscribe(&self) -> watch::Receiver<State> {
        self.tx.subscribe()
    }
}
