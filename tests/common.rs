#![allow(dead_code, clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, unreachable_pub)]

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use menugate::api::{self, AppState, MgmtState};
use menugate::clients::auth::{AuthApi, HttpAuthApi};
use menugate::clients::business::{BusinessDirectory, HttpBusinessDirectory};
use menugate::config::{
    BackendConfig, Config, CookieConfig, LogFormat, RouteConfig, ServerConfig, TelemetryConfig,
};
use menugate::services::authorization::AuthorizationService;
use menugate::services::health::HealthService;
use menugate::services::refresh::RefreshService;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::Mutex;
use uuid::Uuid;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("menugate=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

#[derive(Clone, Copy, Debug)]
pub enum RefreshBehavior {
    Accept,
    Reject,
    ServerError,
}

#[derive(Clone, Copy, Debug)]
pub enum MembershipBehavior {
    Businesses(usize),
    Unauthorized,
}

/// In-process stand-in for the business-logic backend. Behavior is
/// programmable per test and calls are counted.
#[derive(Clone)]
pub struct StubBackend {
    inner: Arc<StubInner>,
}

struct StubInner {
    refresh_calls: AtomicUsize,
    membership_calls: AtomicUsize,
    refresh_behavior: Mutex<RefreshBehavior>,
    membership_behavior: Mutex<MembershipBehavior>,
    refresh_delay: Mutex<Duration>,
}

impl Default for StubBackend {
    fn default() -> Self {
        Self {
            inner: Arc::new(StubInner {
                refresh_calls: AtomicUsize::new(0),
                membership_calls: AtomicUsize::new(0),
                refresh_behavior: Mutex::new(RefreshBehavior::Accept),
                membership_behavior: Mutex::new(MembershipBehavior::Businesses(1)),
                refresh_delay: Mutex::new(Duration::ZERO),
            }),
        }
    }
}

impl StubBackend {
    pub async fn set_refresh(&self, behavior: RefreshBehavior) {
        *self.inner.refresh_behavior.lock().await = behavior;
    }

    pub async fn set_memberships(&self, behavior: MembershipBehavior) {
        *self.inner.membership_behavior.lock().await = behavior;
    }

    pub async fn set_refresh_delay(&self, delay: Duration) {
        *self.inner.refresh_delay.lock().await = delay;
    }

    pub fn refresh_calls(&self) -> usize {
        self.inner.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn membership_calls(&self) -> usize {
        self.inner.membership_calls.load(Ordering::SeqCst)
    }
}

async fn refresh_handler(
    State(stub): State<StubBackend>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    stub.inner.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let delay = *stub.inner.refresh_delay.lock().await;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    match *stub.inner.refresh_behavior.lock().await {
        RefreshBehavior::Accept => {
            let presented = body["refreshToken"].as_str().unwrap_or("?");
            let pair = json!({
                "accessToken": format!("rotated-access-for-{presented}"),
                "accessTokenExpire": future_timestamp(1800),
                "refreshToken": format!("rotated-refresh-{}", Uuid::new_v4()),
                "refreshTokenExpire": future_timestamp(604_800),
            });
            Json(json!({
                "isSuccess": true,
                "message": null,
                "statusCode": 200,
                "data": pair,
            }))
            .into_response()
        }
        RefreshBehavior::Reject => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "isSuccess": false,
                "message": "Invalid refresh token",
                "statusCode": 401,
                "data": null,
            })),
        )
            .into_response(),
        RefreshBehavior::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn memberships_handler(State(stub): State<StubBackend>) -> axum::response::Response {
    stub.inner.membership_calls.fetch_add(1, Ordering::SeqCst);

    match *stub.inner.membership_behavior.lock().await {
        MembershipBehavior::Businesses(count) => {
            let businesses: Vec<serde_json::Value> = (0..count)
                .map(|i| {
                    json!({
                        "business": {"id": Uuid::new_v4(), "name": format!("Business {i}")},
                        "role": 1,
                    })
                })
                .collect();
            Json(json!({"isSuccess": true, "message": null, "statusCode": 200, "data": businesses}))
                .into_response()
        }
        MembershipBehavior::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
    }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub backend: StubBackend,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_inner(None).await
    }

    /// Spawns the gate pointed at an arbitrary backend URL (for readiness
    /// failure tests). The stub backend still runs but is not wired up.
    pub async fn spawn_with_backend_url(backend_url: &str) -> Self {
        Self::spawn_inner(Some(backend_url.to_string())).await
    }

    async fn spawn_inner(backend_url_override: Option<String>) -> Self {
        setup_tracing();

        let backend = StubBackend::default();
        let backend_router = Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/api/Auth/refresh-token", post(refresh_handler))
            .route("/api/BusinessUser/active-user-businesses", get(memberships_handler))
            .with_state(backend.clone());

        let backend_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let backend_addr = backend_listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(backend_listener, backend_router).await.unwrap();
        });

        let backend_url = backend_url_override.unwrap_or_else(|| format!("http://{backend_addr}"));
        let config = test_config(&backend_url);

        let http = menugate::clients::http_client(Duration::from_secs(2)).unwrap();
        let auth_api: Arc<dyn AuthApi> = Arc::new(HttpAuthApi::new(http.clone(), &backend_url));
        let directory: Arc<dyn BusinessDirectory> =
            Arc::new(HttpBusinessDirectory::new(http.clone(), &backend_url));

        let state = AppState {
            config: config.clone(),
            refresh_service: RefreshService::new(auth_api),
            authorization_service: AuthorizationService::new(
                directory,
                Duration::from_secs(config.backend.authorization_cache_ttl_secs),
            ),
        };

        let app_router = api::app_router(state);
        let mgmt_app = api::mgmt_router(MgmtState {
            health_service: HealthService::new(http, &backend_url),
        });

        let api_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let api_addr = api_listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(api_listener, app_router).await.unwrap();
        });

        let mgmt_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_addr = mgmt_listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt_app).await.unwrap();
        });

        // Redirects stay observable and cookies are attached by hand.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            server_url: format!("http://{api_addr}"),
            mgmt_url: format!("http://{mgmt_addr}"),
            client,
            backend,
        }
    }
}

fn test_config(backend_url: &str) -> Config {
    Config {
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 0, mgmt_port: 0 },
        backend: BackendConfig {
            base_url: backend_url.to_string(),
            request_timeout_secs: 2,
            // Keep the authorization cache out of the way; caching itself is
            // covered by unit tests.
            authorization_cache_ttl_secs: 0,
        },
        routes: RouteConfig { protected_prefix: "/panel".to_string(), login_path: "/login".to_string() },
        cookies: CookieConfig { access_max_age_secs: 1800, refresh_max_age_secs: 604_800, insecure: true },
        telemetry: TelemetryConfig { log_format: LogFormat::Text },
    }
}

pub fn future_timestamp(secs: i64) -> String {
    (OffsetDateTime::now_utc() + time::Duration::seconds(secs)).format(&Rfc3339).unwrap()
}

pub fn past_timestamp(secs: i64) -> String {
    (OffsetDateTime::now_utc() - time::Duration::seconds(secs)).format(&Rfc3339).unwrap()
}

/// Cookie header for a session whose access token is still alive.
pub fn valid_session_header() -> String {
    format!(
        "accessToken=live-access; accessTokenExpire={}; refreshToken=live-refresh; refreshTokenExpire={}",
        future_timestamp(1800),
        future_timestamp(604_800),
    )
}

/// Cookie header for a session whose access token has expired but whose
/// refresh token is still valid.
pub fn expired_session_header() -> String {
    format!(
        "accessToken=stale-access; accessTokenExpire={}; refreshToken=stale-refresh; refreshTokenExpire={}",
        past_timestamp(60),
        future_timestamp(604_800),
    )
}

pub fn set_cookie_values(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

pub fn location(response: &reqwest::Response) -> &str {
    response.headers().get(reqwest::header::LOCATION).expect("missing Location header").to_str().unwrap()
}
