use crate::model::City;

/// The city the catalog is filtered by and the map is centred on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityState {
    pub city: City,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CityAction {
    Select(City),
}

impl CityState {
    pub fn reduce(&mut self, action: CityAction) {
        match action {
            CityAction::Select(city) => self.city = city,
        }
    }
}
