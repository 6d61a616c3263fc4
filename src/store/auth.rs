use crate::model::AuthStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub status: AuthStatus,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    SetStatus(AuthStatus),
    SetName(String),
}

impl AuthState {
    pub fn reduce(&mut self, action: AuthAction) {
        match action {
            AuthAction::SetStatus(status) => self.status = status,
            AuthAction::SetName(name) => self.name = name,
        }
    }
}
