use std::sync::Arc;

use super::Remote;
use crate::model::{Offer, OfferDetail, Review};

/// Detail page slice.
///
/// Every detail fetch gets a request number. Only the latest request may
/// commit a detail or clear `loading`; reviews and nearby offers only commit
/// for the offer that is currently requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentOfferState {
    pub offer: Option<OfferDetail>,
    pub offer_id: Option<String>,
    pub loading: bool,
    pub request: u64,
    pub reviews: Remote<Arc<Vec<Review>>>,
    pub nearby: Remote<Arc<Vec<Offer>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CurrentOfferAction {
    Requested { offer_id: String, request: u64 },
    DetailLoaded { request: u64, offer: OfferDetail },
    Settled { request: u64 },
    ReviewsLoaded { offer_id: String, reviews: Vec<Review> },
    ReviewsFailed { offer_id: String, reason: String },
    NearbyLoaded { offer_id: String, nearby: Vec<Offer> },
    NearbyFailed { offer_id: String, reason: String },
}

impl CurrentOfferState {
    pub fn reduce(&mut self, action: CurrentOfferAction) {
        match action {
            CurrentOfferAction::Requested { offer_id, request } => {
                if request < self.request {
                    return;
                }
                if self.offer_id.as_deref() != Some(offer_id.as_str()) {
                    self.reviews.mark_stale();
                    self.nearby.mark_stale();
                }
                self.offer_id = Some(offer_id);
                self.request = request;
                self.loading = true;
            }
            CurrentOfferAction::DetailLoaded { request, offer } => {
                if request == self.request {
                    self.offer = Some(offer);
                }
            }
            CurrentOfferAction::Settled { request } => {
                if request == self.request {
                    self.loading = false;
                }
            }
            CurrentOfferAction::ReviewsLoaded { offer_id, reviews } => {
                if self.accepts(&offer_id) {
                    self.reviews.loaded(Arc::new(reviews));
                }
            }
            CurrentOfferAction::ReviewsFailed { offer_id, reason } => {
                if self.accepts(&offer_id) {
                    self.reviews.failed(reason);
                }
            }
            CurrentOfferAction::NearbyLoaded { offer_id, nearby } => {
                if self.accepts(&offer_id) {
                    self.nearby.loaded(Arc::new(nearby));
                }
            }
            CurrentOfferAction::NearbyFailed { offer_id, reason } => {
                if self.accepts(&offer_id) {
                    self.nearby.failed(reason);
                }
            }
        }
    }

    /// Sub-fetch results are accepted for the requested offer, or for any
    /// offer when no detail fetch has happened yet.
    fn accepts(&self, offer_id: &str) -> bool {
        self.offer_id.as_deref().map_or(true, |current| current == offer_id)
    }
}
