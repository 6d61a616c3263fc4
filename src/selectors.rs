//! View-ready data derived from the store. Nothing here writes state.
use chrono::DateTime;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::{City, Offer};
use crate::store::State;

/// The detail page shows at most this many nearby offers.
pub const NEARBY_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Default,
    /// Hovered or selected offer.
    Active,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub offer_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityGroup {
    pub city: String,
    pub offers: Vec<Offer>,
}

pub fn city_filtered_catalog(display: &[Offer], city: &City) -> Vec<Offer> {
    display
        .iter()
        .filter(|o| o.city.name == city.name)
        .cloned()
        .collect()
}

pub fn map_points(offers: &[Offer], active_offer_id: Option<&str>) -> Vec<MapPoint> {
    offers
        .iter()
        .map(|o| MapPoint {
            offer_id: o.id.clone(),
            latitude: o.location.latitude,
            longitude: o.location.longitude,
            marker: if active_offer_id == Some(o.id.as_str()) {
                Marker::Active
            } else {
                Marker::Default
            },
        })
        .collect()
}

/// Groups ordered by city name; each group keeps favorites-list order.
pub fn favorites_by_city(favorites: &[Offer]) -> Vec<CityGroup> {
    let mut groups: BTreeMap<&str, Vec<Offer>> = BTreeMap::new();
    for offer in favorites {
        groups
            .entry(offer.city.name.as_str())
            .or_default()
            .push(offer.clone());
    }
    groups
        .into_iter()
        .map(|(city, offers)| CityGroup {
            city: city.to_string(),
            offers,
        })
        .collect()
}

/// Distinct cities in order of first appearance.
pub fn cities(offers: &[Offer]) -> Vec<City> {
    let mut seen: Vec<City> = Vec::new();
    for offer in offers {
        if !seen.iter().any(|c| c.name == offer.city.name) {
            seen.push(offer.city.clone());
        }
    }
    seen
}

pub fn nearby_preview(nearby: &[Offer]) -> &[Offer] {
    &nearby[..nearby.len().min(NEARBY_LIMIT)]
}

pub fn is_favorite(favorites: &[Offer], offer_id: &str) -> bool {
    favorites.iter().any(|o| o.id == offer_id)
}

pub fn favorites_count(favorites: &[Offer]) -> usize {
    favorites.len()
}

/// Width of the star bar in percent.
pub fn rating_width(rating: f64) -> u8 {
    if !rating.is_finite() {
        return 0;
    }
    (rating.round().clamp(0.0, 5.0) as u8) * 20
}

/// `"May 2019"` style date for a review timestamp.
pub fn review_date(iso: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(iso)
        .ok()
        .map(|d| d.format("%B %Y").to_string())
}

/// Compares shared lists by identity.
#[derive(Debug, Clone)]
struct ByAddress<T>(Arc<T>);

impl<T> PartialEq for ByAddress<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug)]
struct Memo<K, V> {
    last: Option<(K, Arc<V>)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    fn get_or_compute(&mut self, key: K, counter: &mut u64, compute: impl FnOnce() -> V) -> Arc<V> {
        if let Some((last_key, value)) = &self.last {
            if *last_key == key {
                return Arc::clone(value);
            }
        }
        *counter += 1;
        let value = Arc::new(compute());
        self.last = Some((key, Arc::clone(&value)));
        value
    }
}

/// Memoizing front for the view layer. Recomputes only when an input list is
/// replaced or a scalar input changes.
#[derive(Debug, Default)]
pub struct Selectors {
    filtered: Memo<(ByAddress<Vec<Offer>>, String), Vec<Offer>>,
    points: Memo<(ByAddress<Vec<Offer>>, Option<String>), Vec<MapPoint>>,
    grouped: Memo<ByAddress<Vec<Offer>>, Vec<CityGroup>>,
    cities: Memo<ByAddress<Vec<Offer>>, Vec<City>>,
    recomputations: u64,
}

impl Selectors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city_filtered_catalog(&mut self, state: &State) -> Arc<Vec<Offer>> {
        let display = Arc::clone(&state.catalog.display);
        let city = &state.city.city;
        self.filtered.get_or_compute(
            (ByAddress(Arc::clone(&display)), city.name.clone()),
            &mut self.recomputations,
            || city_filtered_catalog(&display, city),
        )
    }

    /// Map points for the offers of the selected city.
    pub fn catalog_map_points(
        &mut self,
        state: &State,
        active_offer_id: Option<&str>,
    ) -> Arc<Vec<MapPoint>> {
        let offers = self.city_filtered_catalog(state);
        self.points.get_or_compute(
            (ByAddress(Arc::clone(&offers)), active_offer_id.map(str::to_string)),
            &mut self.recomputations,
            || map_points(&offers, active_offer_id),
        )
    }

    pub fn favorites_by_city(&mut self, state: &State) -> Arc<Vec<CityGroup>> {
        let favorites = Arc::clone(&state.favorites.offers);
        self.grouped.get_or_compute(
            ByAddress(Arc::clone(&favorites)),
            &mut self.recomputations,
            || favorites_by_city(&favorites),
        )
    }

    pub fn cities(&mut self, state: &State) -> Arc<Vec<City>> {
        let pristine = Arc::clone(&state.catalog.pristine);
        self.cities.get_or_compute(
            ByAddress(Arc::clone(&pristine)),
            &mut self.recomputations,
            || cities(&pristine),
        )
    }

    /// How many times any selector had to recompute.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
