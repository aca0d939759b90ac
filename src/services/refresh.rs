use crate::clients::auth::AuthApi;
use crate::domain::session::TokenPair;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::fmt;
use std::sync::Arc;

/// Result of a refresh attempt. Collaborator errors are already degraded to
/// `Denied` here so the gate only ever sees the two outcomes it can act on.
#[derive(Clone, Debug)]
pub enum RefreshOutcome {
    Rotated(TokenPair),
    Denied,
}

type Flight = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Coordinates token refresh against the Auth module.
///
/// Refresh tokens are invalidated on first use, so two concurrent requests
/// observing the same expired session must not race each other to the
/// collaborator: whichever arrives first starts the call, later arrivals
/// with the same token await that in-flight call and share its outcome.
#[derive(Clone)]
pub struct RefreshService {
    auth: Arc<dyn AuthApi>,
    flights: Arc<DashMap<String, Flight>>,
}

impl RefreshService {
    pub fn new(auth: Arc<dyn AuthApi>) -> Self {
        Self { auth, flights: Arc::new(DashMap::new()) }
    }

    pub async fn refresh(&self, refresh_token: &str) -> RefreshOutcome {
        let flight = match self.flights.entry(refresh_token.to_string()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let auth = Arc::clone(&self.auth);
                let token = refresh_token.to_string();
                let flight = async move {
                    match auth.refresh_token(&token).await {
                        Ok(Some(pair)) => {
                            tracing::info!("Session tokens rotated");
                            RefreshOutcome::Rotated(pair)
                        }
                        Ok(None) => {
                            tracing::warn!("Refresh token rejected, session ends");
                            RefreshOutcome::Denied
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Refresh call failed, session ends");
                            RefreshOutcome::Denied
                        }
                    }
                }
                .boxed()
                .shared();
                entry.insert(flight.clone());
                flight
            }
        };

        let outcome = flight.await;
        // The token generation is settled now; drop the flight so the next
        // generation's token starts a fresh call.
        self.flights.remove(refresh_token);
        outcome
    }
}

impl fmt::Debug for RefreshService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshService").field("in_flight", &self.flights.len()).finish_non_exhaustive()
    }
}
