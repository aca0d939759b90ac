//! Placeholder pages behind the gate. The real panel UI is rendered
//! elsewhere; these handlers exist so the gate has something to protect and
//! so integration tests can tell a pass-through from a redirect.

use crate::error::{AppError, Result};
use crate::gate::AccessToken;
use axum::{Extension, response::Html};

pub async fn home() -> Html<&'static str> {
    Html("<h1>Menu</h1>")
}

pub async fn login() -> Html<&'static str> {
    Html("<h1>Login</h1>")
}

/// The gate inserts the validated access token before letting a panel
/// request through; a missing extension means the route was mounted without
/// the gate in front of it.
pub async fn panel(token: Option<Extension<AccessToken>>) -> Result<Html<String>> {
    let Extension(token) = token.ok_or(AppError::Internal)?;
    tracing::debug!(token_len = token.0.len(), "Panel page served");
    Ok(Html("<h1>Panel</h1>".to_string()))
}
