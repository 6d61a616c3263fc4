use tracing::{debug, info, instrument, warn};

use super::{ActionError, Coordinator};
use crate::model::{AuthData, AuthStatus};
use crate::routes::Route;
use crate::store::{AuthAction, FavoritesAction};

impl Coordinator {
    /// Resolve the bootstrap `Unknown` status. Never fails: any rejection
    /// means the user is not signed in.
    #[instrument(skip_all)]
    pub async fn check_session(&self) {
        match self.api.check_session().await {
            Ok(user) => {
                info!(name = %user.name, "session restored");
                self.store.dispatch(AuthAction::SetName(user.name));
                self.store
                    .dispatch(AuthAction::SetStatus(AuthStatus::Authenticated));
            }
            Err(err) => {
                debug!(?err, "no active session");
                self.store
                    .dispatch(AuthAction::SetStatus(AuthStatus::Unauthenticated));
            }
        }
    }

    /// Sign in and hand the catalog route to `on_success`. A rejected login
    /// changes nothing locally and is returned to the caller.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login<F>(&self, credentials: &AuthData, on_success: F) -> Result<(), ActionError>
    where
        F: FnOnce(Route) + Send,
    {
        let user = self.api.login(credentials).await?;
        self.tokens.save(&user.token)?;

        info!(name = %user.name, "signed in");
        self.store.dispatch(AuthAction::SetName(user.name));
        self.store
            .dispatch(AuthAction::SetStatus(AuthStatus::Authenticated));
        on_success(Route::Main);
        Ok(())
    }

    /// Sign out. Local session state is cleared even when the server call
    /// fails; that failure is still returned afterwards.
    #[instrument(skip_all)]
    pub async fn logout<F>(&self, on_success: F) -> Result<(), ActionError>
    where
        F: FnOnce(Route) + Send,
    {
        let remote = self.api.logout().await;
        if let Err(err) = &remote {
            warn!(?err, "logout request failed; clearing local session anyway");
        }
        let removed = self.tokens.remove();

        self.store.dispatch(AuthAction::SetName(String::new()));
        self.store
            .dispatch(AuthAction::SetStatus(AuthStatus::Unauthenticated));
        self.store.dispatch(FavoritesAction::Cleared);
        info!("signed out");
        on_success(Route::Main);

        remote?;
        removed?;
        Ok(())
    }
}
