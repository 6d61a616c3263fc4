use tracing::{info, instrument};

use super::{ActionError, Coordinator};
use crate::model::{FavoriteStatus, OfferDetail};
use crate::routes::Route;
use crate::store::FavoritesAction;

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// The server accepted the change and returned the updated offer.
    Sent(OfferDetail),
    /// Not signed in; the login route was handed to the caller instead.
    RedirectedToLogin,
}

impl Coordinator {
    /// Replace the favorites slice with the server's list.
    #[instrument(skip_all)]
    pub async fn fetch_favorites(&self) -> Result<(), ActionError> {
        let offers = self.api.favorites().await?;
        info!(count = offers.len(), "favorites loaded");
        self.store.dispatch(FavoritesAction::Loaded(offers));
        Ok(())
    }

    /// Flip the bookmark of `offer_id` on the server.
    ///
    /// Local state is left alone; callers re-read favorites when they need
    /// the new list.
    #[instrument(skip_all, fields(offer_id = %offer_id, currently_favorite = currently_favorite))]
    pub async fn toggle_favorite<F>(
        &self,
        offer_id: &str,
        currently_favorite: bool,
        navigate: F,
    ) -> Result<ToggleOutcome, ActionError>
    where
        F: FnOnce(Route) + Send,
    {
        if !self.store.read(|s| s.auth.status.is_authenticated()) {
            navigate(Route::Login);
            return Ok(ToggleOutcome::RedirectedToLogin);
        }

        let status = FavoriteStatus::toggled_from(currently_favorite);
        let updated = self.api.set_favorite(offer_id, status).await?;
        info!(status = status.as_u8(), "favorite status sent");
        Ok(ToggleOutcome::Sent(updated))
    }
}
