use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskboard::auth::{AuthMiddleware, AuthService, TokenIssuer};
use taskboard::routes::{self, health};
use taskboard::store::MemoryStore;
use taskboard::tasks::TaskService;

const SECRET: &str = "integration_test_secret";

fn token_issuer() -> TokenIssuer {
    TokenIssuer::new(SECRET, chrono::Duration::hours(1)).expect("valid issuer")
}

macro_rules! init_app {
    () => {{
        let store = Arc::new(MemoryStore::new());
        let auth = web::Data::new(AuthService::new(store.clone(), token_issuer(), 4));
        let tasks = web::Data::new(TaskService::new(store));
        test::init_service(
            App::new()
                .app_data(auth)
                .app_data(tasks)
                .wrap(Logger::default())
                .service(health::health)
                .service(
                    web::scope("/api")
                        .wrap(AuthMiddleware)
                        .configure(routes::config),
                ),
        )
        .await
    }};
}

/// Status and JSON body of a call, whether the error surfaced as a response or
/// as a middleware `Err`.
async fn send(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    req: actix_http::Request,
) -> (StatusCode, Value) {
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
    }
}

fn signup(username: &str, email: &str, password: &str) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({
            "username": username,
            "email": email,
            "firstName": "First",
            "lastName": "Last",
            "password": password
        }))
        .to_request()
}

fn signin(email: &str, password: &str) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({ "email": email, "password": password }))
        .to_request()
}

#[actix_rt::test]
async fn test_signup_and_signin_flow() {
    let app = init_app!();

    let (status, _) = send(&app, signup("a", "a@x.com", "p")).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same email, different username.
    let (status, body) = send(&app, signup("b", "a@x.com", "p")).await;
    assert_eq!(status, StatusCode::CONFLICT, "Body: {}", body);

    // Same username, different email.
    let (status, _) = send(&app, signup("a", "other@x.com", "p")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, signin("a@x.com", "p")).await;
    assert_eq!(status, StatusCode::OK, "Body: {}", body);
    assert_eq!(body["user"]["username"], "a");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("salt").is_none());

    let token = body["token"].as_str().expect("token in response");
    let claims = token_issuer().verify(token).expect("token signed with shared secret");
    assert_eq!(claims.username, "a");
}

#[actix_rt::test]
async fn test_signin_failures_are_indistinguishable() {
    let app = init_app!();
    let (status, _) = send(&app, signup("a", "a@x.com", "p")).await;
    assert_eq!(status, StatusCode::CREATED);

    let wrong_password = send(&app, signin("a@x.com", "wrong")).await;
    let unknown_email = send(&app, signin("nobody@x.com", "p")).await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.1, json!({ "error": "Invalid credentials" }));
}

#[actix_rt::test]
async fn test_protected_routes_require_a_valid_token() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/tasks").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing token");

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = TokenIssuer::new("some_other_secret", chrono::Duration::hours(1)).unwrap();
    let (status, _) = send(&app, signup("a", "a@x.com", "p")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = send(&app, signin("a@x.com", "p")).await;
    let user_id = body["user"]["id"].as_i64().unwrap() as i32;
    let forged = foreign
        .issue(&taskboard::models::User {
            id: user_id,
            username: "a".to_string(),
            email: "a@x.com".to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            password_hash: String::new(),
            salt: String::new(),
        })
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(("Authorization", format!("Bearer {}", forged)))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_health_is_public() {
    let app = init_app!();
    let req = test::TestRequest::get().uri("/health").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
