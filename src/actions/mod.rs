//! Action coordinators: call the API, then apply store transitions in order.
//!
//! A `Coordinator` is cheap to clone; clones share the API client, the token
//! store and the entity store.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::api::{ApiError, ApiService};
use crate::model::ValidationError;
use crate::store::Store;
use crate::token::{TokenError, TokenStore};

mod auth;
mod catalog;
mod favorites;
mod offer;

pub use favorites::ToggleOutcome;
pub use offer::{DetailFetch, SubFetchResults, SubFetches};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("background fetch did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ActionError {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ActionError::Api(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Coordinator {
    api: Arc<dyn ApiService>,
    tokens: Arc<dyn TokenStore>,
    store: Store,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    pub fn new(api: Arc<dyn ApiService>, tokens: Arc<dyn TokenStore>, store: Store) -> Self {
        Self { api, tokens, store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Start-up sequence: catalog, favorites and session check run
    /// concurrently. Only a catalog failure is reported.
    #[instrument(skip_all)]
    pub async fn bootstrap(&self) -> Result<(), ActionError> {
        let (catalog, favorites, ()) = futures::join!(
            self.fetch_catalog(),
            self.fetch_favorites(),
            self.check_session()
        );
        if let Err(err) = favorites {
            warn!(?err, "favorites unavailable at start-up");
        }
        catalog
    }
}
