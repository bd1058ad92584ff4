pub mod extract;
pub mod notes;
pub mod oauth;
pub mod state;
pub mod users;

pub use state::AppState;

use axum::http::{Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

#[derive(serde::Serialize)]
struct Health {
    status: String,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "notehub is working!".to_string(),
    })
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        // Credential auth
        .route("/register", post(users::register))
        .route("/login", get(oauth::oauth_login).post(users::login))
        .route("/logout", post(users::logout))
        // OAuth callback (providers differ on GET vs POST)
        .route(
            "/callback",
            get(oauth::oauth_callback).post(oauth::oauth_callback),
        )
        // Notes
        .route("/notes", get(notes::list_notes).post(notes::save_note))
        .route("/notes/{id}", get(notes::get_note))
        // Legacy variant surface
        .route("/note/{id}", get(notes::get_note))
        .route("/save", post(notes::save_note_form))
        .route("/approve", post(notes::approve_note))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::state::test_state;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn register_login_save_and_read_back() {
        let app = router(test_state());

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/register",
                None,
                json!({"username": "a", "password": "p"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/login",
                None,
                json!({"username": "a", "password": "p"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/notes",
                Some(&token),
                json!({"id": "x", "content": "hello"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, get_request("/notes/x", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["content"].as_str().unwrap().contains("hello"));
    }

    #[tokio::test]
    async fn legacy_form_save_is_still_routed() {
        let state = test_state();
        let token = state.sessions.mint("a").unwrap();
        let app = router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/save")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from("noteId=legacy&content=from+a+form"))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, get_request("/note/legacy", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["content"], json!("from a form"));
    }

    #[tokio::test]
    async fn notes_require_a_session() {
        let app = router(test_state());
        let (status, _) = send(&app, get_request("/notes", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, get_request("/notes", Some("forged"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_at_the_boundary() {
        let app = router(test_state());
        send(
            &app,
            json_request(
                "POST",
                "/register",
                None,
                json!({"username": "a", "password": "p"}),
            ),
        )
        .await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/login",
                None,
                json!({"username": "a", "password": "wrong"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], json!("error"));
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_conflict() {
        let app = router(test_state());
        let payload = json!({"username": "a", "password": "p"});
        send(&app, json_request("POST", "/register", None, payload.clone())).await;
        let (status, _) = send(&app, json_request("POST", "/register", None, payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let app = router(test_state());
        let (status, _) = send(&app, get_request("/no-such-route", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn oauth_login_without_a_provider_is_not_found() {
        let app = router(test_state());
        let (status, _) = send(&app, get_request("/login", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_answers_on_both_roots() {
        let app = router(test_state());
        let (status, body) = send(&app, get_request("/", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("notehub is working!"));

        let (status, _) = send(&app, get_request("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
