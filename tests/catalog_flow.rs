mod common;

use common::{city, offer, status, Harness};
use six_cities::model::SortOrder;
use six_cities::selectors::{Marker, Selectors};

fn ids(offers: &[six_cities::model::Offer]) -> Vec<&str> {
    offers.iter().map(|o| o.id.as_str()).collect()
}

#[tokio::test]
async fn fetch_selects_city_of_first_offer() {
    let h = Harness::new();
    h.api
        .offers
        .push(
            "",
            Ok(vec![
                offer("1", "Paris", 120, 4.1),
                offer("2", "Amsterdam", 90, 4.8),
                offer("3", "Paris", 300, 3.2),
            ]),
        )
        .await;

    h.coordinator.fetch_catalog().await.unwrap();

    let state = h.store().snapshot();
    assert_eq!(state.city.city.name, "Paris");
    assert!(!state.catalog.loading);
    assert_eq!(ids(&state.catalog.pristine), vec!["1", "2", "3"]);

    let mut memo = Selectors::new();
    assert_eq!(ids(&memo.city_filtered_catalog(&state)), vec!["1", "3"]);
}

#[tokio::test]
async fn failed_fetch_clears_loading_and_keeps_city() {
    let h = Harness::new();
    h.coordinator.set_selected_city(city("Hamburg"));
    h.api.offers.push("", Err(status(500))).await;

    assert!(h.coordinator.fetch_catalog().await.is_err());

    let state = h.store().snapshot();
    assert!(!state.catalog.loading);
    assert_eq!(state.city.city.name, "Hamburg");
    assert!(state.catalog.pristine.is_empty());
}

#[tokio::test]
async fn empty_catalog_keeps_selected_city() {
    let h = Harness::new();
    h.coordinator.set_selected_city(city("Brussels"));
    h.api.offers.push("", Ok(Vec::new())).await;

    h.coordinator.fetch_catalog().await.unwrap();

    let state = h.store().snapshot();
    assert_eq!(state.city.city.name, "Brussels");
    assert!(state.catalog.display.is_empty());
    assert!(!state.catalog.loading);
}

#[tokio::test]
async fn sorting_is_stable_and_popular_restores_server_order() {
    let h = Harness::new();
    h.api
        .offers
        .push(
            "",
            Ok(vec![
                offer("a", "Paris", 100, 4.0),
                offer("b", "Paris", 80, 4.0),
                offer("c", "Paris", 100, 5.0),
                offer("d", "Paris", 80, 3.0),
            ]),
        )
        .await;
    h.coordinator.fetch_catalog().await.unwrap();

    h.coordinator.set_sort_order(SortOrder::PriceLowToHigh);
    assert_eq!(
        h.store().read(|s| ids(&s.catalog.display).join(",")),
        "b,d,a,c"
    );

    h.coordinator.set_sort_order(SortOrder::TopRated);
    h.coordinator.set_sort_order(SortOrder::TopRated);
    assert_eq!(
        h.store().read(|s| ids(&s.catalog.display).join(",")),
        "c,a,b,d"
    );

    h.coordinator.set_sort_order(SortOrder::PriceHighToLow);
    assert_eq!(
        h.store().read(|s| ids(&s.catalog.display).join(",")),
        "a,c,b,d"
    );

    h.coordinator.set_sort_order(SortOrder::Popular);
    let state = h.store().snapshot();
    assert_eq!(state.catalog.display, state.catalog.pristine);
    assert_eq!(ids(&state.catalog.pristine), vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn reload_keeps_active_sort() {
    let h = Harness::new();
    h.coordinator.set_sort_order(SortOrder::PriceHighToLow);
    h.api
        .offers
        .push(
            "",
            Ok(vec![offer("1", "Paris", 50, 4.0), offer("2", "Paris", 70, 4.0)]),
        )
        .await;

    h.coordinator.fetch_catalog().await.unwrap();

    let state = h.store().snapshot();
    assert_eq!(state.catalog.sort, SortOrder::PriceHighToLow);
    assert_eq!(ids(&state.catalog.display), vec!["2", "1"]);
}

#[tokio::test]
async fn switching_city_only_changes_filter() {
    let h = Harness::new();
    h.api
        .offers
        .push(
            "",
            Ok(vec![
                offer("1", "Paris", 100, 4.0),
                offer("2", "Amsterdam", 100, 4.0),
                offer("3", "Amsterdam", 60, 4.0),
            ]),
        )
        .await;
    h.coordinator.fetch_catalog().await.unwrap();
    let before = h.store().snapshot();

    h.coordinator.set_selected_city(city("Amsterdam"));
    let after = h.store().snapshot();

    assert_eq!(after.catalog, before.catalog);
    let mut memo = Selectors::new();
    let points = memo.catalog_map_points(&after, Some("3"));
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].marker, Marker::Default);
    assert_eq!(points[1].marker, Marker::Active);
}

#[tokio::test]
async fn bootstrap_loads_catalog_favorites_and_session() {
    let h = Harness::new();
    h.api
        .offers
        .push("", Ok(vec![offer("1", "Cologne", 100, 4.0)]))
        .await;
    h.api.favorites.push("", Err(status(401))).await;
    h.api.session.push("", Err(status(401))).await;

    h.coordinator.bootstrap().await.unwrap();

    let state = h.store().snapshot();
    assert_eq!(state.city.city.name, "Cologne");
    assert!(state.favorites.offers.is_empty());
    assert!(!state.auth.status.is_authenticated());
    let mut calls = h.api.calls().await;
    calls.sort();
    assert_eq!(calls, vec!["GET favorite", "GET login", "GET offers"]);
}
