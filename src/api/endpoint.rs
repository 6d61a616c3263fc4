use crate::model::FavoriteStatus;

/// Every resource the client talks to, rendered relative to the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Login,
    Logout,
    Offers,
    Offer(&'a str),
    Nearby(&'a str),
    Comments(&'a str),
    Favorites,
    FavoriteStatus {
        offer_id: &'a str,
        status: FavoriteStatus,
    },
}

impl Endpoint<'_> {
    /// Unescaped path segments. Each one becomes exactly one URL segment.
    pub fn segments(&self) -> Vec<String> {
        match self {
            Endpoint::Login => vec!["login".to_string()],
            Endpoint::Logout => vec!["logout".to_string()],
            Endpoint::Offers => vec!["offers".to_string()],
            Endpoint::Offer(id) => vec!["offers".to_string(), id.to_string()],
            Endpoint::Nearby(id) => vec!["offers".to_string(), id.to_string(), "nearby".to_string()],
            Endpoint::Comments(id) => vec!["comments".to_string(), id.to_string()],
            Endpoint::Favorites => vec!["favorite".to_string()],
            Endpoint::FavoriteStatus { offer_id, status } => vec![
                "favorite".to_string(),
                offer_id.to_string(),
                status.as_u8().to_string(),
            ],
        }
    }

    /// Human-readable path, used in logs.
    pub fn path(&self) -> String {
        self.segments().join("/")
    }
}
