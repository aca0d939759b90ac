//! The session gate: request-scoped authentication in front of the panel.
//!
//! Runs once per inbound request to the protected prefix or the login page
//! and decides between passing the request through, silently refreshing the
//! session, or redirecting. Rules are checked in a fixed order and the first
//! matching one wins; a request never produces more than one redirect.

use crate::api::AppState;
use crate::domain::session::is_expired;
use crate::services::refresh::RefreshOutcome;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

mod cookies;

use cookies::{append_cleared_cookies, append_session_cookies, read_session_cookies};

/// Access token the gate validated (or freshly rotated) for this request,
/// inserted into request extensions for downstream handlers.
#[derive(Clone, Debug)]
pub struct AccessToken(pub String);

pub async fn session_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let is_protected = path.starts_with(&state.config.routes.protected_prefix);
    let is_login = path == state.config.routes.login_path;

    // Route matcher: everything else is none of the gate's business.
    if !is_protected && !is_login {
        return next.run(request).await;
    }

    let session = read_session_cookies(request.headers());

    // Rule 1: expired access token with a refresh token present. The refresh
    // outcome is terminal either way.
    if is_expired(session.access_token_expire.as_deref()) {
        if let Some(refresh_token) = session.refresh_token.as_deref() {
            match state.refresh_service.refresh(refresh_token).await {
                RefreshOutcome::Rotated(pair) => {
                    if is_login {
                        let target = sanitized_return_url(request.uri().query());
                        let mut response = Redirect::temporary(&target).into_response();
                        append_session_cookies(response.headers_mut(), &pair, &state.config.cookies);
                        return response;
                    }

                    // The guard below runs against the rotated token. The
                    // rotation already happened server-side, so the new
                    // cookies ride along even on the unauthorized redirect.
                    if !state.authorization_service.has_active_business(&pair.access_token).await {
                        let mut response = Redirect::temporary("/").into_response();
                        append_session_cookies(response.headers_mut(), &pair, &state.config.cookies);
                        return response;
                    }

                    request.extensions_mut().insert(AccessToken(pair.access_token.clone()));
                    let mut response = next.run(request).await;
                    append_session_cookies(response.headers_mut(), &pair, &state.config.cookies);
                    return response;
                }
                RefreshOutcome::Denied => {
                    let mut response =
                        Redirect::temporary(&state.config.routes.login_path).into_response();
                    append_cleared_cookies(response.headers_mut());
                    return response;
                }
            }
        }
    }

    if is_protected {
        // Rule 2: no session at all on a protected path.
        let Some(access_token) = session.access_token else {
            let target =
                login_redirect_target(&state.config.routes.login_path, &path, request.uri().query());
            return Redirect::temporary(&target).into_response();
        };

        // Rule 3: a session without any business membership may not see the
        // panel; send it home rather than to the login page.
        if !state.authorization_service.has_active_business(&access_token).await {
            return Redirect::temporary("/").into_response();
        }

        request.extensions_mut().insert(AccessToken(access_token));
        return next.run(request).await;
    }

    // Rule 4: an authenticated user has no business on the login page.
    if is_login && session.access_token.is_some() {
        let target = sanitized_return_url(request.uri().query());
        return Redirect::temporary(&target).into_response();
    }

    next.run(request).await
}

/// Pulls `returnUrl` out of a query string and sanitizes it: only same-site
/// absolute paths are honored, anything else falls back to the home page.
fn sanitized_return_url(query: Option<&str>) -> String {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "returnUrl")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|value| value.starts_with('/'))
        .unwrap_or_else(|| "/".to_string())
}

/// Builds the login redirect preserving the originally requested location.
fn login_redirect_target(login_path: &str, path: &str, query: Option<&str>) -> String {
    let mut original = path.to_string();
    if let Some(query) = query {
        original.push('?');
        original.push_str(query);
    }
    let encoded: String = url::form_urlencoded::byte_serialize(original.as_bytes()).collect();
    format!("{login_path}?returnUrl={encoded}")
}
