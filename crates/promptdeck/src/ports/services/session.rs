//! Session Provider Port

use crate::domain::UserSession;

/// Source of the current authenticated session
///
/// Consulted synchronously before any favorite mutation.
pub trait SessionProvider: Send + Sync {
    fn current_session(&self) -> Option<UserSession>;
}

impl SessionProvider for Option<UserSession> {
    fn current_session(&self) -> Option<UserSession> {
        self.clone()
    }
}
