use crate::cache::TtlCache;
use crate::clients::business::BusinessDirectory;
use std::sync::Arc;
use std::time::Duration;

/// Decides whether a principal may see the management panel.
///
/// Fail closed: a network error, a non-success response, or an empty
/// membership list all mean "not authorized". Nothing here ever throws into
/// the gate.
#[derive(Clone, Debug)]
pub struct AuthorizationService {
    directory: Arc<dyn BusinessDirectory>,
    cache: Arc<TtlCache<bool>>,
    cache_ttl: Duration,
}

impl AuthorizationService {
    pub fn new(directory: Arc<dyn BusinessDirectory>, cache_ttl: Duration) -> Self {
        Self { directory, cache: Arc::new(TtlCache::new()), cache_ttl }
    }

    /// Returns whether the token's principal owns or staffs at least one
    /// business.
    ///
    /// Only positive answers are cached (keyed by access token), so a freshly
    /// created business or a recovered backend shows up on the next request.
    pub async fn has_active_business(&self, access_token: &str) -> bool {
        if let Some(authorized) = self.cache.get(access_token) {
            return authorized;
        }

        match self.directory.active_user_businesses(access_token).await {
            Ok(memberships) => {
                let authorized = !memberships.is_empty();
                if authorized {
                    self.cache.insert(access_token, true, self.cache_ttl);
                }
                authorized
            }
            Err(e) => {
                tracing::warn!(error = %e, "Business membership lookup failed, treating as unauthorized");
                false
            }
        }
    }
}
