//! Bearer Token Sessions
//!
//! Tokens are registered at startup. The middleware resolves the
//! `Authorization: Bearer <token>` header to a `UserSession` and stores it
//! in the request extensions for the handlers behind it.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use promptdeck::{SessionProvider, UserSession};

/// Registered session tokens
#[derive(Debug, Default, Clone)]
pub struct SessionRegistry {
    by_token: HashMap<String, String>,
}

impl SessionRegistry {
    /// Parse `token:user` pairs separated by commas
    pub fn parse(entries: &str) -> Result<Self, String> {
        let mut by_token = HashMap::new();
        for pair in entries.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (token, user) = pair
                .split_once(':')
                .ok_or_else(|| format!("Session entry '{pair}' is not token:user"))?;
            let (token, user) = (token.trim(), user.trim());
            if token.is_empty() || user.is_empty() {
                return Err(format!("Session entry '{pair}' has an empty token or user"));
            }
            by_token.insert(token.to_string(), user.to_string());
        }
        Ok(Self { by_token })
    }

    pub fn resolve(&self, token: &str) -> Option<UserSession> {
        self.by_token
            .get(token)
            .map(|user| UserSession::new(user.clone(), token))
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

/// The session carried by one request's Authorization header
struct HeaderSession<'a> {
    registry: &'a SessionRegistry,
    header: Option<&'a str>,
}

impl SessionProvider for HeaderSession<'_> {
    fn current_session(&self) -> Option<UserSession> {
        let token = self.header?.strip_prefix("Bearer ")?;
        self.registry.resolve(token.trim())
    }
}

/// Authentication middleware
/// Rejects requests without a registered bearer token
pub async fn session_middleware(
    State(sessions): State<Arc<SessionRegistry>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let session = HeaderSession {
        registry: &sessions,
        header: auth_header.as_deref(),
    }
    .current_session();

    match session {
        Some(session) => {
            request.extensions_mut().insert(session);
            Ok(next.run(request).await)
        }
        None if auth_header.is_none() => {
            tracing::warn!("Missing Authorization header");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!("Invalid session token attempted");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
