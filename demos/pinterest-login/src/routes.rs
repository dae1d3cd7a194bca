use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use ras_identity_pinterest::{
    AuthOutcomeHandler, CallbackParams, ErrorRecord, NormalizedAuthResult, PinterestStrategy,
    dispatch,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub strategy: Arc<PinterestStrategy>,
}

/// Turns the login outcome into the HTTP response for the browser.
struct JsonOutcome;

impl AuthOutcomeHandler for JsonOutcome {
    type Output = Response;

    fn on_success(self, result: NormalizedAuthResult) -> Response {
        info!("User {} authenticated via Pinterest", result.info.nickname);
        (StatusCode::OK, Json(result)).into_response()
    }

    fn on_error(self, error: ErrorRecord) -> Response {
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

/// Start the flow by redirecting to Pinterest
async fn request_handler(State(state): State<AppState>) -> Response {
    match state.strategy.request().await {
        Ok(redirect) => Redirect::to(&redirect.url).into_response(),
        Err(e) => {
            error!("Failed to build Pinterest authorization URL: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to start Pinterest login",
            )
                .into_response()
        }
    }
}

/// Pinterest redirects back here with either `code` or `error`
async fn callback_handler(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    info!("Handling Pinterest callback");

    let outcome = state.strategy.callback(params).await;

    dispatch(outcome, JsonOutcome)
}

async fn health_handler() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/auth/pinterest", get(request_handler))
        .route("/auth/pinterest/int_callback", get(callback_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use ras_identity_pinterest::StrategyConfig;
    use tower::ServiceExt;

    fn app() -> Router {
        let config =
            StrategyConfig::new("demo-client", "demo-secret", "http://localhost:3000/auth/pinterest/")
                .unwrap();
        let strategy = PinterestStrategy::new(config).unwrap();
        router(AppState {
            strategy: Arc::new(strategy),
        })
    }

    async fn send(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(app(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_redirects_to_pinterest() {
        let response = send(app(), "/auth/pinterest").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.starts_with("https://api.pinterest.com/oauth/?response_type=code"));
        assert!(location.contains("client_id=demo-client"));
        assert!(location.contains("&state="));
    }

    #[tokio::test]
    async fn test_callback_error_is_reported_as_json() {
        let response = send(
            app(),
            "/auth/pinterest/int_callback?error=access_denied&error_description=Denied",
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let record: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(record["provider"], "Pinterest");
        assert_eq!(record["code"], "access_denied");
        assert_eq!(record["message"], "Denied");
        assert_eq!(record["raw"]["error"], "access_denied");
    }

    #[tokio::test]
    async fn test_callback_with_forged_state() {
        let response = send(
            app(),
            "/auth/pinterest/int_callback?code=abc123&state=forged1",
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let record: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(record["code"], "state_mismatch");
    }
}
