use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const ACCESS_TOKEN_EXPIRE_COOKIE: &str = "accessTokenExpire";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";
pub const REFRESH_TOKEN_EXPIRE_COOKIE: &str = "refreshTokenExpire";

/// Every cookie that makes up a client session, in the order they are written.
pub const SESSION_COOKIE_NAMES: [&str; 4] = [
    ACCESS_TOKEN_COOKIE,
    ACCESS_TOKEN_EXPIRE_COOKIE,
    REFRESH_TOKEN_COOKIE,
    REFRESH_TOKEN_EXPIRE_COOKIE,
];

/// The session as carried by the client: four independent opaque cookie values.
/// The backend Auth module is the source of truth for validity; nothing here
/// is verified locally.
#[derive(Clone, Debug, Default)]
pub struct SessionCookies {
    pub access_token: Option<String>,
    pub access_token_expire: Option<String>,
    pub refresh_token: Option<String>,
    pub refresh_token_expire: Option<String>,
}

/// Token set returned by a refresh. All four values rotate together; the
/// backend never renews a pair partially.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub access_token_expire: String,
    pub refresh_token: String,
    pub refresh_token_expire: String,
}

/// Returns whether an expiry timestamp has passed.
///
/// Fails closed: an absent, empty, or unparseable value counts as expired so
/// the caller falls back to re-authentication rather than trusting a token of
/// unknown age. Only a parseable, strictly-future RFC 3339 instant is alive.
#[must_use]
pub fn is_expired(expiry: Option<&str>) -> bool {
    let Some(raw) = expiry else {
        return true;
    };
    if raw.is_empty() {
        return true;
    }
    match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(instant) => instant <= OffsetDateTime::now_utc(),
        Err(_) => true,
    }
}
