//! End-to-end route tests against PostgreSQL.
//!
//! Each test gets a fresh, migrated database from `#[sqlx::test]`, which needs
//! `DATABASE_URL`. Object storage points at a closed port; none of these
//! flows touch stored files.
//! Run with: cargo test -p skyferry-api --test workflow -- --ignored

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use skyferry_api::{auth, build_router, AppState};
use skyferry_common::{
    config::{
        self, AppConfig, AuthConfig, DatabaseConfig, LimitsConfig, ServerConfig, StorageConfig,
    },
    ids::generate_id,
};
use skyferry_db::{
    repository::{organizations, profiles, users},
    storage::StorageClient,
    Database,
};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "workflow-test-secret-0123456789abcdef";

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".into(),
            max_connections: 1,
            min_connections: 0,
        },
        auth: AuthConfig {
            jwt_secret: SECRET.into(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 3600,
        },
        storage: StorageConfig {
            endpoint: "http://127.0.0.1:1".into(),
            bucket: "skyferry-test".into(),
            access_key: "test".into(),
            secret_key: "test".into(),
            region: "us-east-1".into(),
            signed_url_ttl_secs: 60,
        },
        limits: LimitsConfig {
            max_document_bytes: 1024 * 1024,
            max_aircraft_per_organization: 10,
        },
    }
}

struct TestApp {
    router: Router,
    pool: PgPool,
}

/// A signed-in member of some organization.
struct Member {
    id: Uuid,
    token: String,
}

impl TestApp {
    fn new(pool: PgPool) -> Self {
        let cfg = config::install(test_config());
        let router = build_router(AppState {
            db: Database::from_pool(pool.clone()),
            storage: StorageClient::new(&cfg.storage),
        });
        Self { router, pool }
    }

    async fn user(&self, email: &str) -> Member {
        let (user, _) =
            users::create_with_profile(&self.pool, generate_id(), email, "$argon2id$stub", "Test User")
                .await
                .unwrap();
        let token = auth::generate_access_token(user.id, email, SECRET, 900).unwrap();
        Member { id: user.id, token }
    }

    /// A user owning a fresh organization.
    async fn owner(&self, email: &str) -> (Member, Uuid) {
        let member = self.user(email).await;
        let org = organizations::create_with_owner(&self.pool, generate_id(), "Northwind Ferry", member.id)
            .await
            .unwrap()
            .unwrap();
        (member, org.id)
    }

    async fn member(&self, email: &str, organization_id: Uuid, role: &str) -> Member {
        let member = self.user(email).await;
        profiles::join_organization(&self.pool, member.id, organization_id, role)
            .await
            .unwrap()
            .unwrap();
        member
    }

    async fn send(&self, method: Method, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn aircraft(&self, owner: &Member, tail_number: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/aircraft",
                &owner.token,
                Some(json!({ "tail_number": tail_number, "make": "Cessna", "model": "182T" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn flight(&self, owner: &Member, aircraft_id: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/flights",
                &owner.token,
                Some(json!({
                    "aircraft_id": aircraft_id,
                    "origin": "KPAE",
                    "destination": "KBOI",
                    "reason": "Repositioning for annual inspection",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["status"], "draft");
        body["id"].as_str().unwrap().to_string()
    }
}

#[sqlx::test(migrations = "../skyferry-db/migrations")]
#[ignore] // needs DATABASE_URL
async fn deleting_a_missing_flight_is_not_found(pool: PgPool) {
    let app = TestApp::new(pool);
    let (owner, _) = app.owner("owner@example.com").await;

    let uri = format!("/api/flights/{}/delete", Uuid::now_v7());
    let (status, body) = app.send(Method::DELETE, &uri, &owner.token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../skyferry-db/migrations")]
#[ignore] // needs DATABASE_URL
async fn flights_of_other_organizations_are_forbidden(pool: PgPool) {
    let app = TestApp::new(pool);
    let (owner, _) = app.owner("owner@example.com").await;
    let (rival, _) = app.owner("rival@example.com").await;

    let ac = app.aircraft(&owner, "N12345").await;
    let flight = app.flight(&owner, &ac).await;

    let uri = format!("/api/flights/{flight}");
    let (status, body) = app.send(Method::GET, &uri, &rival.token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let uri = format!("/api/flights/{flight}/delete");
    let (status, _) = app.send(Method::DELETE, &uri, &rival.token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::GET, &format!("/api/flights/{flight}"), &owner.token, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "../skyferry-db/migrations")]
#[ignore] // needs DATABASE_URL
async fn deleting_needs_the_delete_permission(pool: PgPool) {
    let app = TestApp::new(pool);
    let (owner, org) = app.owner("owner@example.com").await;
    let mechanic = app.member("mechanic@example.com", org, "mechanic").await;

    let ac = app.aircraft(&owner, "N12345").await;
    let flight = app.flight(&owner, &ac).await;

    let uri = format!("/api/flights/{flight}/delete");
    let (status, body) = app.send(Method::DELETE, &uri, &mechanic.token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "MISSING_PERMISSION");

    let (status, body) = app.send(Method::DELETE, &uri, &owner.token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted_documents"], 0);

    let (status, _) = app.send(Method::DELETE, &uri, &owner.token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../skyferry-db/migrations")]
#[ignore] // needs DATABASE_URL
async fn stale_status_change_conflicts(pool: PgPool) {
    let app = TestApp::new(pool);
    let (owner, _) = app.owner("owner@example.com").await;
    let ac = app.aircraft(&owner, "N12345").await;
    let flight = app.flight(&owner, &ac).await;

    let uri = format!("/api/flights/{flight}/status");
    let advance = json!({ "status": "pending_documents" });

    let (status, body) = app.send(Method::POST, &uri, &owner.token, Some(advance.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending_documents");

    // Replaying the same change: the flight is no longer where the caller left it
    let (status, body) = app.send(Method::POST, &uri, &owner.token, Some(advance)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "INVALID_TRANSITION");
}

#[sqlx::test(migrations = "../skyferry-db/migrations")]
#[ignore] // needs DATABASE_URL
async fn flight_fields_can_be_cleared(pool: PgPool) {
    let app = TestApp::new(pool);
    let (owner, org) = app.owner("owner@example.com").await;
    let pilot = app.member("pilot@example.com", org, "pilot").await;
    let ac = app.aircraft(&owner, "N12345").await;
    let flight = app.flight(&owner, &ac).await;
    let uri = format!("/api/flights/{flight}");

    let assign = json!({ "pilot_id": pilot.id, "notes": "Fuel stop at KPDT" });
    let (status, body) = app.send(Method::PATCH, &uri, &owner.token, Some(assign)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["pilot_id"], json!(pilot.id));

    let clear = json!({ "pilot_id": null, "notes": null });
    let (status, body) = app.send(Method::PATCH, &uri, &owner.token, Some(clear)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["pilot_id"], Value::Null);
    assert_eq!(body["notes"], Value::Null);
    assert_eq!(body["origin"], "KPAE");
}

#[sqlx::test(migrations = "../skyferry-db/migrations")]
#[ignore] // needs DATABASE_URL
async fn second_organization_is_refused(pool: PgPool) {
    let app = TestApp::new(pool);
    let (owner, org) = app.owner("owner@example.com").await;

    let (status, body) = app
        .send(Method::POST, "/api/organizations", &owner.token, Some(json!({ "name": "Shadow Air" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ALREADY_EXISTS");

    let (_, current) = app.send(Method::GET, "/api/organizations/current", &owner.token, None).await;
    assert_eq!(current["id"], json!(org));
}

#[sqlx::test(migrations = "../skyferry-db/migrations")]
#[ignore] // needs DATABASE_URL
async fn example_cleanup_leaves_real_data_alone(pool: PgPool) {
    let app = TestApp::new(pool);
    let (owner, _) = app.owner("owner@example.com").await;
    let real_aircraft = app.aircraft(&owner, "N12345").await;
    let real_flight = app.flight(&owner, &real_aircraft).await;

    let (status, seeded) = app.send(Method::POST, "/api/seed/example-data", &owner.token, None).await;
    assert_eq!(status, StatusCode::OK, "{seeded}");
    assert_eq!(seeded, json!({ "aircraft": 2, "flights": 3, "discrepancies": 1 }));

    let (status, _) = app.send(Method::POST, "/api/seed/example-data", &owner.token, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Book a real flight on an example aircraft
    let (_, fleet) = app.send(Method::GET, "/api/aircraft", &owner.token, None).await;
    let example = fleet
        .as_array()
        .unwrap()
        .iter()
        .find(|ac| ac["is_example"] == true)
        .unwrap();
    let on_example = app.flight(&owner, example["id"].as_str().unwrap()).await;

    let (status, deleted) = app.send(Method::POST, "/api/delete-example", &owner.token, None).await;
    assert_eq!(status, StatusCode::OK, "{deleted}");
    assert_eq!(deleted["flights"], 3);
    assert_eq!(deleted["discrepancies"], 1);
    assert_eq!(deleted["aircraft"], 1);
    assert_eq!(deleted["retained_aircraft"], 1);

    for flight in [&real_flight, &on_example] {
        let (status, body) = app.send(Method::GET, &format!("/api/flights/{flight}"), &owner.token, None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["is_example"], false);
    }

    let (_, flights) = app.send(Method::GET, "/api/flights", &owner.token, None).await;
    assert_eq!(flights.as_array().unwrap().len(), 2);
}
