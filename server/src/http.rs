use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::{FromRef, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use platform_authn::{AuthnError, SessionStore, User, UserDirectory};
use serde::{Deserialize, Serialize};
use time::Duration as TimeDuration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    graphql::{Requester, SchemaType},
};

const SESSION_COOKIE: &str = "__Host-hr_session";

#[derive(Clone)]
pub struct AppState {
    pub schema: SchemaType,
    pub config: Arc<AppConfig>,
    pub directory: Arc<UserDirectory>,
    pub sessions: Arc<SessionStore>,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.config.cookie_key.clone()
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "hr server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let layer = CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::POST, Method::GET]);
    // Credentialed CORS cannot be combined with a wildcard origin.
    if allowed.is_empty() {
        layer.allow_origin(AllowOrigin::any())
    } else {
        layer
            .allow_credentials(true)
            .allow_origin(AllowOrigin::list(allowed))
    }
}

pub fn build_router(state: AppState) -> Router {
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/graphql", post(graphql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
}

#[derive(Serialize)]
struct LoginResponse {
    id: String,
    name: String,
    role: String,
    employee_id: String,
}

impl From<&User> for LoginResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            role: user.role.to_string(),
            employee_id: user.employee_id.to_string(),
        }
    }
}

async fn login_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(body): Json<LoginRequest>,
) -> HttpResult<(PrivateCookieJar, Json<LoginResponse>)> {
    let user = state.directory.login(&body.email).map_err(|err| match err {
        AuthnError::UnknownEmail(_) => {
            warn!("login rejected for unknown email");
            HttpError::new(StatusCode::UNAUTHORIZED, "unknown email")
        }
    })?;
    let session = state.sessions.create(user.clone());
    let max_age = TimeDuration::seconds(state.config.session_ttl.num_seconds());
    let cookie = Cookie::build((SESSION_COOKIE, session.id.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build();
    info!(user = %user.id, role = %user.role, "user logged in");
    Ok((jar.add(cookie), Json(LoginResponse::from(user))))
}

async fn logout_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> HttpResult<(PrivateCookieJar, StatusCode)> {
    if let Some(session_id) = session_id(&jar) {
        state.sessions.revoke(session_id);
    }
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    Ok((jar, StatusCode::NO_CONTENT))
}

async fn graphql_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let user = session_id(&jar)
        .and_then(|id| state.sessions.resolve(id))
        .map(|session| session.user);
    let req = request.into_inner().data(Requester::new(user));
    state.schema.execute(req).await.into()
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
}

fn session_id(jar: &PrivateCookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl+c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };

    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http_body_util::BodyExt;
    use products_hr::{HrService, HrStore, PatternPolisher};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::graphql::build_schema;

    fn state() -> AppState {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let service = HrService::new(
            Arc::new(HrStore::seeded()),
            Arc::new(PatternPolisher::new().unwrap()),
        );
        AppState {
            schema: build_schema(service),
            sessions: Arc::new(SessionStore::new(config.session_ttl)),
            config: Arc::new(config),
            directory: Arc::new(UserDirectory::demo()),
        }
    }

    fn json_request(uri: &str, body: Value, cookie: Option<&str>) -> http::Request<Body> {
        let mut builder = http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(http::header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn session_cookie(response: &Response) -> String {
        let raw = response
            .headers()
            .get(http::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = build_router(state())
            .oneshot(
                http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ok"], json!(true));
    }

    #[tokio::test]
    async fn unknown_email_cannot_log_in() {
        let response = build_router(state())
            .oneshot(json_request("/login", json!({"email": "ghost@newwork.com"}), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn session_cookie_binds_the_actor_for_graphql() {
        let router = build_router(state());
        let login = router
            .clone()
            .oneshot(json_request(
                "/login",
                json!({"email": "michael.chen@newwork.com"}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);
        let cookie = session_cookie(&login);
        assert_eq!(body_json(login).await["role"], json!("manager"));

        let query = json!({"query": "{ me { name } team { id } }"});
        let response = router
            .clone()
            .oneshot(json_request("/graphql", query.clone(), Some(&cookie)))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["me"]["name"], json!("Michael Chen"));
        assert_eq!(body["data"]["team"].as_array().unwrap().len(), 4);

        let response = router
            .clone()
            .oneshot(json_request("/logout", json!({}), Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = router
            .oneshot(json_request(
                "/graphql",
                json!({"query": "{ me { name } }"}),
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["data"]["me"], Value::Null);
    }
}
