use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, Role};
use migration::MigratorTrait;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine.new_user("alice", "password", Role::Editor).await.unwrap();
    engine.new_user("victor", "password", Role::Viewer).await.unwrap();
    server::router(engine)
}

fn basic(username: &str, password: &str) -> String {
    let token = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {token}")
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    user: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic(user, "password"));
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, uri: &str, body: Value) -> String {
    let (status, value) = call(app, Method::POST, uri, "alice", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{value}");
    value["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn missing_credentials_are_rejected() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/reports/revenues")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reports/revenues")
                .header(header::AUTHORIZATION, basic("alice", "nope"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_report_has_columns_and_zero_total() {
    let app = app().await;

    let (status, body) = call(&app, Method::GET, "/reports/revenues", "victor", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"], json!([]));
    assert_eq!(body["total_minor"], json!(0));
    let keys: Vec<&str> = body["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        keys,
        vec![
            "date",
            "invoice_number",
            "project_number",
            "project_name",
            "client_name",
            "description",
            "account_name",
            "amount_minor"
        ]
    );
    assert_eq!(body["columns"][7]["kind"], json!("currency"));
}

#[tokio::test]
async fn report_reconciles_recorded_revenues() {
    let app = app().await;

    let client_id = create(&app, "/clients", json!({ "name": "Beta Corp" })).await;
    let project_id = create(
        &app,
        "/projects",
        json!({ "project_number": "PR-1", "project_name": "Roof Job", "client_name": "Acme" }),
    )
    .await;

    create(
        &app,
        "/revenues",
        json!({ "date": "2026-07-01", "amount_minor": 10000, "project_id": project_id }),
    )
    .await;
    create(
        &app,
        "/revenues",
        json!({
            "date": "2026-07-15",
            "amount_minor": 5000,
            "client_id": client_id,
            "invoice_number": "INV-77",
            "description": ""
        }),
    )
    .await;

    let (status, body) = call(&app, Method::GET, "/reports/revenues", "victor", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_minor"], json!(15000));

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["date"], json!("2026-07-15"));
    assert_eq!(rows[0]["project_number"], json!("Unassigned"));
    assert_eq!(rows[0]["project_name"], json!("Unassigned"));
    assert_eq!(rows[0]["client_name"], json!("Beta Corp"));
    assert_eq!(rows[0]["invoice_number"], json!("INV-77"));
    assert_eq!(rows[0]["description"], Value::Null);

    assert_eq!(rows[1]["project_number"], json!("PR-1"));
    assert_eq!(rows[1]["project_name"], json!("Roof Job"));
    assert_eq!(rows[1]["client_name"], json!("Acme"));
    assert_eq!(rows[1]["amount_minor"], json!(10000));
}

#[tokio::test]
async fn viewer_cannot_write() {
    let app = app().await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/clients",
        "victor",
        Some(json!({ "name": "Gamma" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::GET, "/clients", "victor", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn validation_errors_map_to_status_codes() {
    let app = app().await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/revenues",
        "alice",
        Some(json!({ "date": "2026-07-01", "amount_minor": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(
        &app,
        Method::POST,
        "/revenues",
        "alice",
        Some(json!({
            "date": "2026-07-01",
            "amount_minor": 100,
            "project_id": uuid::Uuid::new_v4()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    create(
        &app,
        "/projects",
        json!({ "project_number": "PR-2", "project_name": "Deck" }),
    )
    .await;
    let (status, _) = call(
        &app,
        Method::POST,
        "/projects",
        "alice",
        Some(json!({ "project_number": "PR-2", "project_name": "Deck again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(&app, Method::GET, "/projects", "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["client_name"], Value::Null);
}
