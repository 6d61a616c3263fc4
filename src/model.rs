use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Geo-coordinate plus the zoom level the map should use around it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct City {
    pub name: String,
    pub location: Location,
}

/// Catalog entry as returned by the listing, nearby and favorites endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: u32,
    pub city: City,
    pub location: Location,
    #[serde(default)]
    pub is_favorite: bool,
    pub is_premium: bool,
    pub rating: f64,
    pub preview_image: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OfferUser {
    pub name: String,
    pub avatar_url: String,
    pub is_pro: bool,
}

/// Extended record shown on the single-offer page. Carries no preview image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferDetail {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: u32,
    pub city: City,
    pub location: Location,
    #[serde(default)]
    pub is_favorite: bool,
    pub is_premium: bool,
    pub rating: f64,
    pub description: String,
    pub bedrooms: u32,
    pub goods: Vec<String>,
    pub host: OfferUser,
    pub images: Vec<String>,
    pub max_adults: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,
    /// ISO-8601 timestamp as sent by the server.
    pub date: String,
    pub user: OfferUser,
    pub comment: String,
    pub rating: f64,
}

/// Identity returned by the session endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub is_pro: bool,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
}

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthData {
    pub email: String,
    pub password: String,
}

/// Body of a new review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewDraft {
    pub comment: String,
    pub rating: u8,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthStatus {
    /// Session check has not resolved yet. Not the same as logged out.
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

impl AuthStatus {
    pub fn is_authenticated(self) -> bool {
        self == AuthStatus::Authenticated
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Popular,
    PriceLowToHigh,
    PriceHighToLow,
    TopRated,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Popular,
        SortOrder::PriceLowToHigh,
        SortOrder::PriceHighToLow,
        SortOrder::TopRated,
    ];

    /// Caption shown in the sort drop-down.
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Popular => "Popular",
            SortOrder::PriceLowToHigh => "Price: low to high",
            SortOrder::PriceHighToLow => "Price: high to low",
            SortOrder::TopRated => "Top rated first",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Popular => "popular",
            SortOrder::PriceLowToHigh => "price-asc",
            SortOrder::PriceHighToLow => "price-desc",
            SortOrder::TopRated => "top-rated",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort order '{0}' (expected popular, price-asc, price-desc or top-rated)")]
pub struct ParseSortOrderError(String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortOrder::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(wanted) || o.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseSortOrderError(s.to_string()))
    }
}

/// Binary status segment of the favorite toggle endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteStatus {
    Remove = 0,
    Add = 1,
}

impl FavoriteStatus {
    /// Status that flips the current membership.
    pub fn toggled_from(currently_favorite: bool) -> Self {
        if currently_favorite {
            FavoriteStatus::Remove
        } else {
            FavoriteStatus::Add
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email address is not valid")]
    Email,
    #[error("password must contain at least one letter and one digit and no spaces")]
    Password,
    #[error("rating must be between {min} and {max}")]
    Rating { min: u8, max: u8 },
    #[error("comment must be between {min} and {max} characters")]
    Comment { min: usize, max: usize },
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PASSWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[^\s]*[A-Za-z][^\s]*\d|[^\s]*\d[^\s]*[A-Za-z])[^\s]*$").expect("valid password regex"));

impl AuthData {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(ValidationError::Email);
        }
        if !PASSWORD_RE.is_match(&self.password) {
            return Err(ValidationError::Password);
        }
        Ok(())
    }
}

impl ReviewDraft {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;
    pub const MIN_COMMENT: usize = 50;
    pub const MAX_COMMENT: usize = 300;

    pub fn new(rating: u8, comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            rating,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&self.rating) {
            return Err(ValidationError::Rating {
                min: Self::MIN_RATING,
                max: Self::MAX_RATING,
            });
        }
        let len = self.comment.chars().count();
        if !(Self::MIN_COMMENT..=Self::MAX_COMMENT).contains(&len) {
            return Err(ValidationError::Comment {
                min: Self::MIN_COMMENT,
                max: Self::MAX_COMMENT,
            });
        }
        Ok(())
    }
}
