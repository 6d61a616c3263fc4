use std::sync::Arc;

use crate::model::Offer;

/// Local cache of the server's favorites list, replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesState {
    pub offers: Arc<Vec<Offer>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesAction {
    Loaded(Vec<Offer>),
    Cleared,
}

impl FavoritesState {
    pub fn reduce(&mut self, action: FavoritesAction) {
        match action {
            FavoritesAction::Loaded(offers) => self.offers = Arc::new(offers),
            FavoritesAction::Cleared => self.offers = Arc::default(),
        }
    }

    /// Membership by id, never by value.
    pub fn contains(&self, offer_id: &str) -> bool {
        self.offers.iter().any(|o| o.id == offer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{City, Location};

    fn offer(id: &str, rating: f64) -> Offer {
        Offer {
            id: id.into(),
            title: "Favorite Offer".into(),
            kind: "house".into(),
            price: 150,
            city: City { name: "City 1".into(), location: Location::default() },
            location: Location::default(),
            is_favorite: true,
            is_premium: false,
            rating,
            preview_image: String::new(),
        }
    }

    #[test]
    fn loaded_replaces_list() {
        let mut state = FavoritesState::default();
        state.reduce(FavoritesAction::Loaded(vec![offer("1", 4.5), offer("2", 4.2)]));
        assert_eq!(state.offers.len(), 2);
        state.reduce(FavoritesAction::Loaded(vec![offer("3", 3.0)]));
        assert_eq!(state.offers.len(), 1);
        state.reduce(FavoritesAction::Cleared);
        assert!(state.offers.is_empty());
    }

    #[test]
    fn membership_uses_id() {
        let mut state = FavoritesState::default();
        state.reduce(FavoritesAction::Loaded(vec![offer("1", 4.5)]));
        // same id, different payload
        assert!(state.contains(&offer("1", 1.0).id));
        assert!(!state.contains("2"));
    }
}
