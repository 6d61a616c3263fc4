use std::cmp::Ordering;
use std::sync::Arc;

use crate::model::{Offer, SortOrder};

/// Catalog slice.
///
/// `pristine` is the list exactly as last fetched and is never reordered.
/// `display` is always `sort_offers(sort, &pristine)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    pub pristine: Arc<Vec<Offer>>,
    pub display: Arc<Vec<Offer>>,
    pub loading: bool,
    pub sort: SortOrder,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            pristine: Arc::default(),
            display: Arc::default(),
            loading: true,
            sort: SortOrder::Popular,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    /// A fresh listing arrived. The only writer of the pristine snapshot.
    Loaded(Vec<Offer>),
    SetLoading(bool),
    SetSortOrder(SortOrder),
}

impl CatalogState {
    pub fn reduce(&mut self, action: CatalogAction) {
        match action {
            CatalogAction::Loaded(offers) => {
                self.pristine = Arc::new(offers);
                self.display = Arc::new(sort_offers(self.sort, &self.pristine));
            }
            CatalogAction::SetLoading(loading) => self.loading = loading,
            CatalogAction::SetSortOrder(order) => {
                self.sort = order;
                self.display = Arc::new(sort_offers(order, &self.pristine));
            }
        }
    }
}

/// Stable sort of `offers` under `order`; equal keys keep their input order.
pub fn sort_offers(order: SortOrder, offers: &[Offer]) -> Vec<Offer> {
    let mut sorted = offers.to_vec();
    match order {
        SortOrder::Popular => {}
        SortOrder::PriceLowToHigh => sorted.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceHighToLow => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::TopRated => sorted.sort_by(|a, b| by_rating_desc(a, b)),
    }
    sorted
}

fn by_rating_desc(a: &Offer, b: &Offer) -> Ordering {
    b.rating.total_cmp(&a.rating)
}
