use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::{ActionError, Coordinator};
use crate::model::{Offer, OfferDetail, Review, ReviewDraft};
use crate::routes::Route;
use crate::store::CurrentOfferAction;

/// Handles of the reviews and nearby fetches spawned next to a detail fetch.
///
/// Dropping it detaches the tasks; they still run and commit.
#[derive(Debug)]
pub struct SubFetches {
    reviews: JoinHandle<Result<Vec<Review>, ActionError>>,
    nearby: JoinHandle<Result<Vec<Offer>, ActionError>>,
}

#[derive(Debug)]
pub struct SubFetchResults {
    pub reviews: Result<Vec<Review>, ActionError>,
    pub nearby: Result<Vec<Offer>, ActionError>,
}

impl SubFetches {
    /// Wait for both fetches to settle.
    pub async fn join(self) -> SubFetchResults {
        let (reviews, nearby) = futures::join!(self.reviews, self.nearby);
        SubFetchResults {
            reviews: reviews.unwrap_or_else(|e| Err(e.into())),
            nearby: nearby.unwrap_or_else(|e| Err(e.into())),
        }
    }
}

#[derive(Debug)]
pub struct DetailFetch {
    pub detail: Result<OfferDetail, ActionError>,
    pub sub_fetches: SubFetches,
}

impl Coordinator {
    /// Load the detail page for `offer_id`.
    ///
    /// Reviews and nearby offers are spawned before the detail request and
    /// commit on their own schedule. A failed detail request sends the
    /// not-found route to `on_not_found`, unless a newer fetch has started.
    #[instrument(skip_all, fields(offer_id = %offer_id))]
    pub async fn fetch_current_offer<F>(&self, offer_id: &str, on_not_found: F) -> DetailFetch
    where
        F: FnOnce(Route) + Send,
    {
        let request = self.store.next_request();
        self.store.dispatch(CurrentOfferAction::Requested {
            offer_id: offer_id.to_string(),
            request,
        });

        let sub_fetches = self.spawn_sub_fetches(offer_id);

        let detail = match self.api.offer(offer_id).await {
            Ok(offer) => {
                debug!(request, "offer detail loaded");
                self.store.dispatch(CurrentOfferAction::DetailLoaded {
                    request,
                    offer: offer.clone(),
                });
                Ok(offer)
            }
            Err(err) => {
                warn!(?err, request, "offer detail unavailable");
                // a newer fetch owns navigation now
                if self.store.read(|s| s.current_offer.request == request) {
                    on_not_found(Route::NotFound);
                } else {
                    debug!(request, "superseded detail fetch failed; not redirecting");
                }
                Err(err.into())
            }
        };

        self.store.dispatch(CurrentOfferAction::Settled { request });
        DetailFetch {
            detail,
            sub_fetches,
        }
    }

    fn spawn_sub_fetches(&self, offer_id: &str) -> SubFetches {
        let reviews = {
            let this = self.clone();
            let offer_id = offer_id.to_string();
            tokio::spawn(async move { this.fetch_reviews(&offer_id).await })
        };
        let nearby = {
            let this = self.clone();
            let offer_id = offer_id.to_string();
            tokio::spawn(async move { this.fetch_nearby_offers(&offer_id).await })
        };
        SubFetches { reviews, nearby }
    }

    /// Replace the review list. Failures are recorded on the slice and
    /// returned, never surfaced otherwise.
    #[instrument(skip_all, fields(offer_id = %offer_id))]
    pub async fn fetch_reviews(&self, offer_id: &str) -> Result<Vec<Review>, ActionError> {
        match self.api.reviews(offer_id).await {
            Ok(reviews) => {
                debug!(count = reviews.len(), "reviews loaded");
                self.store.dispatch(CurrentOfferAction::ReviewsLoaded {
                    offer_id: offer_id.to_string(),
                    reviews: reviews.clone(),
                });
                Ok(reviews)
            }
            Err(err) => {
                debug!(?err, "reviews unavailable");
                self.store.dispatch(CurrentOfferAction::ReviewsFailed {
                    offer_id: offer_id.to_string(),
                    reason: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    #[instrument(skip_all, fields(offer_id = %offer_id))]
    pub async fn fetch_nearby_offers(&self, offer_id: &str) -> Result<Vec<Offer>, ActionError> {
        match self.api.nearby(offer_id).await {
            Ok(nearby) => {
                debug!(count = nearby.len(), "nearby offers loaded");
                self.store.dispatch(CurrentOfferAction::NearbyLoaded {
                    offer_id: offer_id.to_string(),
                    nearby: nearby.clone(),
                });
                Ok(nearby)
            }
            Err(err) => {
                debug!(?err, "nearby offers unavailable");
                self.store.dispatch(CurrentOfferAction::NearbyFailed {
                    offer_id: offer_id.to_string(),
                    reason: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// Submit a review, then re-read the authoritative list. Submission
    /// failures go back to the caller.
    #[instrument(skip_all, fields(offer_id = %offer_id, rating = rating))]
    pub async fn post_review(
        &self,
        offer_id: &str,
        rating: u8,
        comment: &str,
    ) -> Result<(), ActionError> {
        let draft = ReviewDraft::new(rating, comment);
        draft.validate()?;

        self.api.post_review(offer_id, &draft).await?;
        info!("review posted");

        // the refresh records its own failure on the slice
        let _ = self.fetch_reviews(offer_id).await;
        Ok(())
    }
}
