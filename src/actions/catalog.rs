use tracing::{info, instrument, warn};

use super::{ActionError, Coordinator};
use crate::model::{City, SortOrder};
use crate::store::{CatalogAction, CityAction};

impl Coordinator {
    /// Fetch the full listing. The first offer's city becomes the selected
    /// city. The loading flag is cleared whatever the outcome.
    #[instrument(skip_all)]
    pub async fn fetch_catalog(&self) -> Result<(), ActionError> {
        self.store.dispatch(CatalogAction::SetLoading(true));

        let outcome = match self.api.offers().await {
            Ok(offers) => {
                match offers.first() {
                    Some(first) => self.store.dispatch(CityAction::Select(first.city.clone())),
                    None => warn!("catalog is empty; keeping the selected city"),
                }
                info!(count = offers.len(), "catalog loaded");
                self.store.dispatch(CatalogAction::Loaded(offers));
                Ok(())
            }
            Err(err) => {
                warn!(?err, "catalog fetch failed");
                Err(err.into())
            }
        };

        self.store.dispatch(CatalogAction::SetLoading(false));
        outcome
    }

    pub fn set_sort_order(&self, order: SortOrder) {
        self.store.dispatch(CatalogAction::SetSortOrder(order));
    }

    pub fn set_selected_city(&self, city: City) {
        self.store.dispatch(CityAction::Select(city));
    }
}
