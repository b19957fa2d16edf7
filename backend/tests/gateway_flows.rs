//! End-to-end flows through the composed application: signup, login,
//! token-gated catalogue access, comment ownership, and favourites
//! semantics.

use actix_http::Request;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web, App};
use serde_json::{json, Value};

use backend::server::{self, AppConfig};
use backend::Trace;

fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: std::net::SocketAddr::from(([127, 0, 0, 1], 0)),
        cookie_key: Key::generate(),
        cookie_secure: false,
        token_secret: b"integration-test-signing-secret!!".to_vec(),
        token_ttl_seconds: 3600,
        session_ttl_seconds: 3600,
        provider_profile_url: None,
        seed_example_data: true,
    }
}

async fn spawn_app(
    config: &AppConfig,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> + use<> {
    let state = web::Data::new(server::build_state(config).await);
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    actix_test::init_service(
        App::new()
            .app_data(state)
            .wrap(session)
            .wrap(Trace)
            .configure(server::mount_routes),
    )
    .await
}

async fn signup(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
    password: &str,
) {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/users/signup")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

async fn login(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
    password: &str,
) -> String {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/users/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    body.get("token")
        .and_then(Value::as_str)
        .expect("token in login response")
        .to_owned()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

async fn create_dish(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    admin_token: &str,
    name: &str,
) -> String {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/dishes")
            .insert_header(bearer(admin_token))
            .set_json(json!({
                "name": name,
                "description": "integration dish",
                "image": "images/dish.png",
                "category": "mains",
                "priceCents": 499
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    body.get("id")
        .and_then(Value::as_str)
        .expect("dish id")
        .to_owned()
}

#[actix_web::test]
async fn unauthenticated_requests_never_reach_protected_resources() {
    let app = spawn_app(&test_config()).await;
    for uri in ["/dishes", "/favorites"] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "GET {uri}");
    }
}

#[actix_web::test]
async fn login_challenges_with_basic_when_credentials_are_absent() {
    let app = spawn_app(&test_config()).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users/login")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Basic")
    );
}

#[actix_web::test]
async fn alice_favourites_scenario() {
    let app = spawn_app(&test_config()).await;
    let admin_token = login(&app, "admin", "password").await;
    let dish = create_dish(&app, &admin_token, "dish-42").await;

    signup(&app, "alice", "secret").await;
    let alice_token = login(&app, "alice", "secret").await;

    let added = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/favorites/{dish}"))
            .insert_header(bearer(&alice_token))
            .to_request(),
    )
    .await;
    assert_eq!(added.status(), StatusCode::OK);

    let duplicate = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/favorites/{dish}"))
            .insert_header(bearer(&alice_token))
            .to_request(),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let ghost = uuid::Uuid::new_v4();
    let removed = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/favorites/{ghost}"))
            .insert_header(bearer(&alice_token))
            .to_request(),
    )
    .await;
    assert_eq!(removed.status(), StatusCode::NOT_FOUND);

    let listed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/favorites")
            .insert_header(bearer(&alice_token))
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(listed).await;
    let dishes = body
        .pointer("/favorites/dishes")
        .and_then(Value::as_array)
        .expect("dish list");
    assert_eq!(dishes.len(), 1);
    assert_eq!(
        dishes[0].get("id").and_then(Value::as_str),
        Some(dish.as_str())
    );
}

#[actix_web::test]
async fn comment_ownership_scenario() {
    let app = spawn_app(&test_config()).await;
    let admin_token = login(&app, "admin", "password").await;
    let dish = create_dish(&app, &admin_token, "dish-10").await;

    for user in ["bob", "carol"] {
        signup(&app, user, "secret").await;
    }
    let bob_token = login(&app, "bob", "secret").await;
    let carol_token = login(&app, "carol", "secret").await;

    let posted = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/dishes/{dish}/comments"))
            .insert_header(bearer(&bob_token))
            .set_json(json!({ "rating": 5, "comment": "bob was here" }))
            .to_request(),
    )
    .await;
    assert_eq!(posted.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(posted).await;
    let comment_id = body
        .pointer("/comments/0/id")
        .and_then(Value::as_str)
        .expect("comment id")
        .to_owned();

    // Carol is neither author nor admin.
    let carol_attempt = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/dishes/{dish}/comments/{comment_id}"))
            .insert_header(bearer(&carol_token))
            .set_json(json!({ "comment": "carol was here" }))
            .to_request(),
    )
    .await;
    assert_eq!(carol_attempt.status(), StatusCode::FORBIDDEN);

    // The admin is refused as well: comment ownership is strict.
    let admin_attempt = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/dishes/{dish}/comments/{comment_id}"))
            .insert_header(bearer(&admin_token))
            .set_json(json!({ "comment": "admin was here" }))
            .to_request(),
    )
    .await;
    assert_eq!(admin_attempt.status(), StatusCode::FORBIDDEN);

    // The same admin may clear the whole list: dish-level operations bypass
    // ownership entirely.
    let cleared = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/dishes/{dish}/comments"))
            .insert_header(bearer(&admin_token))
            .to_request(),
    )
    .await;
    assert_eq!(cleared.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(cleared).await;
    assert_eq!(
        body.pointer("/comments")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(0)
    );
}

#[actix_web::test]
async fn session_logout_round_trip() {
    let app = spawn_app(&test_config()).await;
    signup(&app, "alice", "secret").await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users/login")
            .set_json(json!({ "username": "alice", "password": "secret" }))
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = login_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();

    let logout = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout.status(), StatusCode::OK);

    // Without any session context the logout attempt is refused.
    let again = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users/logout")
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn check_token_diagnostic_round_trip() {
    let app = spawn_app(&test_config()).await;
    signup(&app, "alice", "secret").await;
    let token = login(&app, "alice", "secret").await;

    let valid = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users/checkToken")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(valid.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(valid).await;
    assert_eq!(body.get("success"), Some(&Value::Bool(true)));
    assert_eq!(
        body.pointer("/user/username").and_then(Value::as_str),
        Some("alice")
    );

    let invalid = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users/checkToken")
            .insert_header(("Authorization", "Bearer tampered"))
            .to_request(),
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn oauth_callback_fails_closed_without_a_provider() {
    let app = spawn_app(&test_config()).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users/oauth/callback?access_token=whatever")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn responses_carry_trace_ids() {
    let app = spawn_app(&test_config()).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/dishes").to_request(),
    )
    .await;
    assert!(res.headers().get("trace-id").is_some());
}
