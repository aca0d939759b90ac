use crate::config::CookieConfig;
use crate::domain::session::{
    ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_EXPIRE_COOKIE, REFRESH_TOKEN_COOKIE,
    REFRESH_TOKEN_EXPIRE_COOKIE, SESSION_COOKIE_NAMES, SessionCookies, TokenPair,
};
use axum::http::{HeaderMap, HeaderValue, header};
use cookie::{Cookie, SameSite};
use time::Duration;

/// Collects the four session cookies from a request's Cookie headers.
/// Unrelated cookies and malformed pairs are skipped.
pub(crate) fn read_session_cookies(headers: &HeaderMap) -> SessionCookies {
    let mut session = SessionCookies::default();
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for piece in Cookie::split_parse(raw) {
            let Ok(cookie) = piece else { continue };
            let value = || Some(cookie.value().to_string());
            match cookie.name() {
                ACCESS_TOKEN_COOKIE => session.access_token = value(),
                ACCESS_TOKEN_EXPIRE_COOKIE => session.access_token_expire = value(),
                REFRESH_TOKEN_COOKIE => session.refresh_token = value(),
                REFRESH_TOKEN_EXPIRE_COOKIE => session.refresh_token_expire = value(),
                _ => {}
            }
        }
    }
    session
}

/// Appends Set-Cookie headers writing all four cookies of a rotated pair.
pub(crate) fn append_session_cookies(headers: &mut HeaderMap, pair: &TokenPair, config: &CookieConfig) {
    let secure = !config.insecure;
    let cookies = [
        build(ACCESS_TOKEN_COOKIE, &pair.access_token, config.access_max_age_secs, secure),
        build(ACCESS_TOKEN_EXPIRE_COOKIE, &pair.access_token_expire, config.access_max_age_secs, secure),
        build(REFRESH_TOKEN_COOKIE, &pair.refresh_token, config.refresh_max_age_secs, secure),
        build(REFRESH_TOKEN_EXPIRE_COOKIE, &pair.refresh_token_expire, config.refresh_max_age_secs, secure),
    ];
    for cookie in cookies {
        append(headers, &cookie);
    }
}

/// Appends Set-Cookie headers deleting all four session cookies.
pub(crate) fn append_cleared_cookies(headers: &mut HeaderMap) {
    for name in SESSION_COOKIE_NAMES {
        let cookie = Cookie::build((name, "")).path("/").max_age(Duration::ZERO).build();
        append(headers, &cookie);
    }
}

fn build(name: &'static str, value: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value.to_owned()))
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn append(headers: &mut HeaderMap, cookie: &Cookie<'_>) {
    if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
        headers.append(header::SET_COOKIE, value);
    }
}
