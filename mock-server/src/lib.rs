//! In-memory stand-in for the parts of the Calendly API the client uses.
//!
//! Every route requires `Authorization: Bearer <token>` with the token the
//! router was built with. Errors use Calendly's `{"title", "message"}` JSON
//! shape. A few fixture routes (`/plain`, `/broken-json`, `/boom`) return
//! bodies the real API never would, to exercise client-side decoding.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const API_URL: &str = "https://api.calendly.com";
pub const USER_URI: &str = "https://api.calendly.com/users/MOCKUSER";
pub const ORGANIZATION_URI: &str = "https://api.calendly.com/organizations/MOCKORG";

const EVENTS: [&str; 2] = ["invitee.created", "invitee.canceled"];
const NOT_FOUND_MESSAGE: &str = "The server could not find the requested resource.";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebhookSubscription {
    pub uri: String,
    pub callback_url: String,
    pub state: String,
    pub events: Vec<String>,
    pub scope: String,
    pub organization: String,
    pub user: Option<String>,
    pub creator: String,
}

#[derive(Deserialize)]
pub struct CreateWebhook {
    pub url: String,
    pub events: Vec<String>,
    pub organization: String,
    pub user: Option<String>,
    pub scope: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub organization: Option<String>,
    pub user: Option<String>,
    pub scope: Option<String>,
    pub count: Option<usize>,
}

pub struct AppState {
    token: String,
    webhooks: RwLock<Vec<(String, WebhookSubscription)>>,
}

pub type Db = Arc<AppState>;

/// Calendly-style error body.
pub struct ApiFailure {
    status: StatusCode,
    title: &'static str,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, title: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            title,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Resource Not Found", NOT_FOUND_MESSAGE)
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid Argument", message)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({"title": self.title, "message": self.message});
        (self.status, Json(body)).into_response()
    }
}

pub fn app(token: &str) -> Router {
    let db: Db = Arc::new(AppState {
        token: token.to_string(),
        webhooks: RwLock::new(Vec::new()),
    });
    Router::new()
        .route("/echo", get(echo))
        .route("/users/me", get(current_user))
        .route("/webhook_subscriptions", get(list_webhooks).post(create_webhook))
        .route("/webhook_subscriptions/{id}", get(get_webhook).delete(delete_webhook))
        .route("/plain", get(plain))
        .route("/broken-json", get(broken_json))
        .route("/boom", get(boom))
        .layer(middleware::from_fn_with_state(db.clone(), require_bearer))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_bearer(State(db): State<Db>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", db.token);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return ApiFailure::new(
            StatusCode::UNAUTHORIZED,
            "Unauthenticated",
            "The access token is invalid",
        )
        .into_response();
    }
    next.run(request).await
}

async fn echo() -> Json<Value> {
    Json(json!({"message": "pong"}))
}

async fn current_user() -> Json<Value> {
    Json(json!({
        "resource": {
            "uri": USER_URI,
            "name": "Mock User",
            "slug": "mock-user",
            "email": "mock@example.com",
            "scheduling_url": "https://calendly.com/mock-user",
            "timezone": "UTC",
            "current_organization": ORGANIZATION_URI,
        }
    }))
}

async fn list_webhooks(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Value> {
    let webhooks = db.webhooks.read().await;
    let collection: Vec<&WebhookSubscription> = webhooks
        .iter()
        .map(|(_, hook)| hook)
        .filter(|hook| params.organization.as_ref().is_none_or(|o| *o == hook.organization))
        .filter(|hook| params.user.is_none() || params.user == hook.user)
        .filter(|hook| params.scope.as_ref().is_none_or(|s| *s == hook.scope))
        .take(params.count.unwrap_or(usize::MAX))
        .collect();
    Json(json!({
        "collection": collection,
        "pagination": {
            "count": collection.len(),
            "next_page": null,
            "previous_page": null,
            "next_page_token": null,
            "previous_page_token": null,
        }
    }))
}

async fn create_webhook(
    State(db): State<Db>,
    input: Result<Json<CreateWebhook>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiFailure> {
    let Json(input) = input.map_err(|rejection| ApiFailure::invalid(rejection.body_text()))?;
    validate(&input)?;

    let id = Uuid::new_v4().to_string();
    let hook = WebhookSubscription {
        uri: format!("{API_URL}/webhook_subscriptions/{id}"),
        callback_url: input.url,
        state: "active".to_string(),
        events: input.events,
        scope: input.scope,
        organization: input.organization,
        user: input.user,
        creator: USER_URI.to_string(),
    };
    db.webhooks.write().await.push((id, hook.clone()));
    Ok((StatusCode::CREATED, Json(json!({"resource": hook}))))
}

fn validate(input: &CreateWebhook) -> Result<(), ApiFailure> {
    if !(input.url.starts_with("https://") || input.url.starts_with("http://")) {
        return Err(ApiFailure::invalid("url must be an http(s) URL"));
    }
    if input.events.is_empty() {
        return Err(ApiFailure::invalid("events must not be empty"));
    }
    if let Some(event) = input.events.iter().find(|e| !EVENTS.contains(&e.as_str())) {
        return Err(ApiFailure::invalid(format!("unknown event: {event}")));
    }
    if input.organization.is_empty() {
        return Err(ApiFailure::invalid("organization is required"));
    }
    match input.scope.as_str() {
        "user" if input.user.as_deref().is_none_or(str::is_empty) => {
            Err(ApiFailure::invalid("user is required for user scope"))
        }
        "user" | "organization" => Ok(()),
        other => Err(ApiFailure::invalid(format!("unknown scope: {other}"))),
    }
}

async fn get_webhook(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiFailure> {
    let webhooks = db.webhooks.read().await;
    webhooks
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, hook)| Json(json!({"resource": hook})))
        .ok_or_else(ApiFailure::not_found)
}

async fn delete_webhook(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    let mut webhooks = db.webhooks.write().await;
    let index = webhooks
        .iter()
        .position(|(key, _)| *key == id)
        .ok_or_else(ApiFailure::not_found)?;
    webhooks.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

async fn plain() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "pong")
}

async fn broken_json() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], r#"{"resource": "#)
}

async fn boom() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain")],
        "upstream exploded",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(url: &str, events: &[&str], scope: &str, user: Option<&str>) -> CreateWebhook {
        CreateWebhook {
            url: url.to_string(),
            events: events.iter().map(|e| e.to_string()).collect(),
            organization: ORGANIZATION_URI.to_string(),
            user: user.map(str::to_string),
            scope: scope.to_string(),
        }
    }

    #[test]
    fn validate_accepts_user_scope() {
        let ok = input("https://example.com/hook", &["invitee.created"], "user", Some(USER_URI));
        assert!(validate(&ok).is_ok());
    }

    #[test]
    fn validate_accepts_organization_scope_without_user() {
        let ok = input("https://example.com/hook", &EVENTS, "organization", None);
        assert!(validate(&ok).is_ok());
    }

    #[test]
    fn validate_rejects_bad_input() {
        let cases = [
            input("ftp://example.com", &["invitee.created"], "user", Some(USER_URI)),
            input("https://example.com", &[], "user", Some(USER_URI)),
            input("https://example.com", &["invitee.updated"], "user", Some(USER_URI)),
            input("https://example.com", &["invitee.created"], "user", None),
            input("https://example.com", &["invitee.created"], "group", Some(USER_URI)),
        ];
        for case in cases {
            let err = validate(&case).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn webhook_serializes_to_json() {
        let hook = WebhookSubscription {
            uri: format!("{API_URL}/webhook_subscriptions/W1"),
            callback_url: "https://example.com/hook".to_string(),
            state: "active".to_string(),
            events: vec!["invitee.created".to_string()],
            scope: "user".to_string(),
            organization: ORGANIZATION_URI.to_string(),
            user: Some(USER_URI.to_string()),
            creator: USER_URI.to_string(),
        };
        let json = serde_json::to_value(&hook).unwrap();
        assert_eq!(json["callback_url"], "https://example.com/hook");
        assert_eq!(json["events"][0], "invitee.created");
        assert_eq!(json["user"], USER_URI);
    }

    #[test]
    fn create_webhook_rejects_missing_url() {
        let result: Result<CreateWebhook, _> =
            serde_json::from_str(r#"{"events":[],"organization":"o","scope":"user"}"#);
        assert!(result.is_err());
    }
}
