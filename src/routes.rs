use std::fmt;

/// Navigation targets handed to coordinator callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The catalog.
    Main,
    Login,
    Favorites,
    Offer(String),
    NotFound,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Main => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Favorites => "/favorites".to_string(),
            Route::Offer(id) => format!("/offer/{}", id),
            Route::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
