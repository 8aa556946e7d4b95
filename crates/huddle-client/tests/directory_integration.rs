//! Directory client against an in-process axum stub.

use axum::{Json, Router, http::StatusCode, routing::get, routing::post};
use huddle_client::{ApiError, DirectoryClient};
use huddle_proto::{LoginRequest, UserId};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{addr}")
}

async fn rooms() -> Json<Value> {
    Json(json!([
        {"id": "r1", "name": "general", "adminId": null},
        {"id": "r2", "name": "ops", "adminId": "u9", "admin": {"id": "u9", "name": "root", "isAdmin": true}}
    ]))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let is_admin = body["isAdmin"].as_bool().unwrap_or(false);
    if is_admin && body["adminPassword"] != json!("secret") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad password"})));
    }
    (StatusCode::CREATED, Json(json!({"id": "u1", "name": body["name"], "isAdmin": is_admin})))
}

fn stub() -> Router {
    Router::new().route("/rooms", get(rooms)).route("/users", post(login))
}

#[tokio::test]
async fn fetches_rooms() {
    let base = serve(stub()).await;
    let client = DirectoryClient::new(format!("{base}/"));

    let rooms = client.fetch_rooms().await.expect("fetch rooms");
    assert_eq!(rooms.len(), 2);
    assert!(rooms[0].admin_id.is_none());
    assert!(rooms[1].is_owned_by(&UserId::new("u9")));
}

#[tokio::test]
async fn logs_in_regular_and_admin_users() {
    let client = DirectoryClient::new(serve(stub()).await);

    let user = client
        .login(&LoginRequest { name: "alice".into(), is_admin: false, admin_password: None })
        .await
        .expect("login");
    assert_eq!(user.name, "alice");
    assert!(!user.is_admin);

    let admin = client
        .login(&LoginRequest { name: "root".into(), is_admin: true, admin_password: Some("secret".into()) })
        .await
        .expect("admin login");
    assert!(admin.is_admin);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let client = DirectoryClient::new(serve(stub()).await);

    let err = client
        .login(&LoginRequest { name: "root".into(), is_admin: true, admin_password: Some("wrong".into()) })
        .await
        .expect_err("rejected login");
    assert!(matches!(err, ApiError::Status { status: 401, .. }));
    assert_eq!(err.to_string(), "Failed to login: 401");

    let broken = Router::new().route("/rooms", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let client = DirectoryClient::new(serve(broken).await);
    let err = client.fetch_rooms().await.expect_err("server error");
    assert_eq!(err.to_string(), "Failed to fetch rooms: 500");
}

#[tokio::test]
async fn unreachable_server_is_a_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = DirectoryClient::new(format!("http://{addr}"));
    assert!(matches!(client.fetch_rooms().await, Err(ApiError::Request(_))));
}
