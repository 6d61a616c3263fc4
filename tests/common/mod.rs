#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use six_cities::actions::Coordinator;
use six_cities::api::{ApiError, ApiService, Endpoint};
use six_cities::model::{
    AuthData, City, FavoriteStatus, Location, Offer, OfferDetail, OfferUser, Review, ReviewDraft,
    UserInfo,
};
use six_cities::store::Store;
use six_cities::token::{MemoryTokenStore, TokenStore};

/// Queued replies per key. Offer-scoped methods key by offer id, the rest use "".
pub struct Script<T> {
    replies: Mutex<HashMap<String, VecDeque<(Duration, Result<T, ApiError>)>>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> Script<T> {
    pub async fn push(&self, key: &str, reply: Result<T, ApiError>) {
        self.push_delayed(key, Duration::ZERO, reply).await;
    }

    pub async fn push_delayed(&self, key: &str, delay: Duration, reply: Result<T, ApiError>) {
        self.replies
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .push_back((delay, reply));
    }

    async fn next(&self, key: &str) -> Result<T, ApiError> {
        let reply = self
            .replies
            .lock()
            .await
            .get_mut(key)
            .and_then(VecDeque::pop_front);
        match reply {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Err(status(500)),
        }
    }
}

/// Scripted stand-in for the remote API that records every call it receives.
#[derive(Default)]
pub struct RecordingApi {
    pub session: Script<UserInfo>,
    pub login: Script<UserInfo>,
    pub logout: Script<()>,
    pub offers: Script<Vec<Offer>>,
    pub offer: Script<OfferDetail>,
    pub nearby: Script<Vec<Offer>>,
    pub reviews: Script<Vec<Review>>,
    pub post_review: Script<()>,
    pub favorites: Script<Vec<Offer>>,
    pub set_favorite: Script<OfferDetail>,
    calls: Mutex<Vec<String>>,
    logins: Mutex<Vec<AuthData>>,
    drafts: Mutex<Vec<(String, ReviewDraft)>>,
}

impl RecordingApi {
    async fn record(&self, method: &str, endpoint: Endpoint<'_>) {
        self.calls
            .lock()
            .await
            .push(format!("{} {}", method, endpoint.path()));
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn count(&self, call: &str) -> usize {
        self.calls.lock().await.iter().filter(|c| *c == call).count()
    }

    pub async fn logins(&self) -> Vec<AuthData> {
        self.logins.lock().await.clone()
    }

    pub async fn drafts(&self) -> Vec<(String, ReviewDraft)> {
        self.drafts.lock().await.clone()
    }
}

#[async_trait]
impl ApiService for RecordingApi {
    async fn check_session(&self) -> Result<UserInfo, ApiError> {
        self.record("GET", Endpoint::Login).await;
        self.session.next("").await
    }

    async fn login(&self, credentials: &AuthData) -> Result<UserInfo, ApiError> {
        self.record("POST", Endpoint::Login).await;
        self.logins.lock().await.push(credentials.clone());
        self.login.next("").await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("DELETE", Endpoint::Logout).await;
        self.logout.next("").await
    }

    async fn offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.record("GET", Endpoint::Offers).await;
        self.offers.next("").await
    }

    async fn offer(&self, offer_id: &str) -> Result<OfferDetail, ApiError> {
        self.record("GET", Endpoint::Offer(offer_id)).await;
        self.offer.next(offer_id).await
    }

    async fn nearby(&self, offer_id: &str) -> Result<Vec<Offer>, ApiError> {
        self.record("GET", Endpoint::Nearby(offer_id)).await;
        self.nearby.next(offer_id).await
    }

    async fn reviews(&self, offer_id: &str) -> Result<Vec<Review>, ApiError> {
        self.record("GET", Endpoint::Comments(offer_id)).await;
        self.reviews.next(offer_id).await
    }

    async fn post_review(&self, offer_id: &str, draft: &ReviewDraft) -> Result<(), ApiError> {
        self.record("POST", Endpoint::Comments(offer_id)).await;
        self.drafts
            .lock()
            .await
            .push((offer_id.to_string(), draft.clone()));
        self.post_review.next(offer_id).await
    }

    async fn favorites(&self) -> Result<Vec<Offer>, ApiError> {
        self.record("GET", Endpoint::Favorites).await;
        self.favorites.next("").await
    }

    async fn set_favorite(
        &self,
        offer_id: &str,
        status: FavoriteStatus,
    ) -> Result<OfferDetail, ApiError> {
        self.record("POST", Endpoint::FavoriteStatus { offer_id, status })
            .await;
        self.set_favorite.next(offer_id).await
    }
}

pub struct Harness {
    pub api: Arc<RecordingApi>,
    pub tokens: Arc<MemoryTokenStore>,
    pub coordinator: Coordinator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_tokens(MemoryTokenStore::default())
    }

    pub fn with_tokens(tokens: MemoryTokenStore) -> Self {
        let api = Arc::new(RecordingApi::default());
        let tokens = Arc::new(tokens);
        let coordinator = Coordinator::new(
            Arc::clone(&api) as Arc<dyn ApiService>,
            Arc::clone(&tokens) as Arc<dyn TokenStore>,
            Store::new(),
        );
        Self {
            api,
            tokens,
            coordinator,
        }
    }

    /// Harness whose session check has already succeeded.
    pub async fn signed_in(name: &str) -> Self {
        let harness = Self::with_tokens(MemoryTokenStore::with_token("t0"));
        harness.api.session.push("", Ok(user(name, "t0"))).await;
        harness.coordinator.check_session().await;
        harness
    }

    pub fn store(&self) -> &Store {
        self.coordinator.store()
    }
}

pub fn status(code: u16) -> ApiError {
    ApiError::Status {
        url: "http://test.local/".to_string(),
        status: StatusCode::from_u16(code).unwrap(),
        body: String::new(),
    }
}

pub fn city(name: &str) -> City {
    City {
        name: name.to_string(),
        location: Location {
            latitude: 52.37,
            longitude: 4.89,
            zoom: 10,
        },
    }
}

pub fn offer(id: &str, city_name: &str, price: u32, rating: f64) -> Offer {
    Offer {
        id: id.to_string(),
        title: format!("Place {}", id),
        kind: "apartment".to_string(),
        price,
        city: city(city_name),
        location: Location {
            latitude: 52.0,
            longitude: 4.0,
            zoom: 16,
        },
        is_favorite: false,
        is_premium: false,
        rating,
        preview_image: format!("https://img.test/{}.jpg", id),
    }
}

pub fn detail(id: &str) -> OfferDetail {
    OfferDetail {
        id: id.to_string(),
        title: format!("Place {}", id),
        kind: "house".to_string(),
        price: 200,
        city: city("Amsterdam"),
        location: Location {
            latitude: 52.0,
            longitude: 4.0,
            zoom: 16,
        },
        is_favorite: false,
        is_premium: true,
        rating: 4.4,
        description: "Quiet street near the canal.".to_string(),
        bedrooms: 2,
        goods: vec!["Wi-Fi".to_string(), "Kitchen".to_string()],
        host: OfferUser {
            name: "Angelina".to_string(),
            avatar_url: String::new(),
            is_pro: true,
        },
        images: Vec::new(),
        max_adults: 4,
    }
}

pub fn review(id: &str) -> Review {
    Review {
        id: id.to_string(),
        date: "2019-05-08T14:13:56.569Z".to_string(),
        user: OfferUser {
            name: "Max".to_string(),
            avatar_url: String::new(),
            is_pro: false,
        },
        comment: "A quiet cozy and picturesque place that hides behind a river.".to_string(),
        rating: 4.0,
    }
}

pub fn user(name: &str, token: &str) -> UserInfo {
    UserInfo {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        token: token.to_string(),
        ..Default::default()
    }
}
