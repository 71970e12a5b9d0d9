use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::SessionStore;
use medical_records_cell::models::{NewVital, RecordKind, RecordsError};
use medical_records_cell::{records_routes, RecordsService};
use shared_database::storage::MemoryStorage;
use shared_utils::test_utils::{MockBackendResponses, TestConfig, DEMO_EMAIL, DEMO_PASSWORD};

async fn setup(server: &MockServer) -> Router {
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::users()))
        .mount(server)
        .await;

    let config = TestConfig::with_backend(&server.uri());
    let session = Arc::new(SessionStore::restore(&config.to_app_config(), Arc::new(MemoryStorage::new())).await);
    session.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

    Router::new().nest("/records", records_routes(config.to_arc(), session))
}

async fn mount_records(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/vitals"))
        .and(query_param("userId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::vital("1", "2026-02-01", 120, 80, 72),
            MockBackendResponses::vital("2", "2026-01-15", 118, 78, 68),
            MockBackendResponses::vital("3", "2026-01-01", 122, 82, 75),
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/labTests"))
        .and(query_param("userId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::lab_test("1", "2026-01-20", "Complete Blood Count", "Blood Test"),
            MockBackendResponses::lab_test("2", "2026-01-20", "Lipid Panel", "Blood Test"),
            MockBackendResponses::lab_test("3", "2025-12-15", "Chest X-Ray", "Imaging"),
            MockBackendResponses::lab_test("4", "2026-01-05", "Urinalysis", "Lab Test"),
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/prescriptions"))
        .and(query_param("userId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::prescription("1", "2026-01-28", "Lisinopril", "active"),
            MockBackendResponses::prescription("2", "2026-01-15", "Metformin", "active"),
            MockBackendResponses::prescription("3", "2025-12-20", "Amoxicillin", "completed"),
        ])))
        .mount(server)
        .await;
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_overview_combines_all_records() {
    let server = MockServer::start().await;
    mount_records(&server).await;
    let router = setup(&server).await;

    let (status, body) = send(&router, "GET", "/records/overview", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["latest_vital"]["id"], "1");
    assert_eq!(body["latest_vital"]["bloodPressure"]["systolic"], 120.0);
    let labs: Vec<_> = body["recent_labs"].as_array().unwrap().iter().map(|l| l["id"].clone()).collect();
    assert_eq!(labs, vec![json!("1"), json!("2"), json!("4")]);
    assert_eq!(body["active_prescriptions"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_vitals_view_has_ascending_chart() {
    let server = MockServer::start().await;
    mount_records(&server).await;
    let router = setup(&server).await;

    let (status, body) = send(&router, "GET", "/records/vitals", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vitals"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["chart"][0]["label"], "Jan 1");
    assert_eq!(body["chart"][2]["label"], "Feb 1");
    assert_eq!(body["chart"][2]["heart_rate"], 72.0);
}

#[tokio::test]
async fn test_labs_filtered_by_category() {
    let server = MockServer::start().await;
    mount_records(&server).await;
    let router = setup(&server).await;

    let (_, body) = send(&router, "GET", "/records/labs?category=Imaging", None).await;

    assert_eq!(body["categories"], json!(["all", "Blood Test", "Imaging", "Lab Test"]));
    assert_eq!(body["selected"], "Imaging");
    assert_eq!(body["labs"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["labs"][0]["testName"], "Chest X-Ray");
    assert_eq!(body["labs"][0]["results"][0]["range"], "13.5-17.5");
}

#[tokio::test]
async fn test_prescriptions_split_active() {
    let server = MockServer::start().await;
    mount_records(&server).await;
    let router = setup(&server).await;

    let (_, body) = send(&router, "GET", "/records/prescriptions", None).await;

    assert_eq!(body["prescriptions"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["active"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_lists_degrade_to_empty_on_backend_failure() {
    let server = MockServer::start().await;
    for collection in ["/vitals", "/labTests", "/prescriptions"] {
        Mock::given(method("GET"))
            .and(path(collection))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
    }
    let router = setup(&server).await;

    let (status, body) = send(&router, "GET", "/records/overview", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["latest_vital"], Value::Null);
    assert_eq!(body["recent_labs"], json!([]));
    assert_eq!(body["active_prescriptions"], json!([]));
}

#[tokio::test]
async fn test_add_vital_posts_with_generated_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vitals"))
        .and(body_partial_json(json!({
            "userId": "1",
            "date": "2026-02-01",
            "bloodPressure": { "systolic": 121.0, "diastolic": 79.0 }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(MockBackendResponses::vital("42", "2026-02-01", 121, 79, 70)))
        .expect(1)
        .mount(&server)
        .await;
    let router = setup(&server).await;

    let (status, body) = send(
        &router,
        "POST",
        "/records/vitals",
        Some(json!({
            "date": "2026-02-01",
            "bloodPressure": { "systolic": 121, "diastolic": 79 },
            "heartRate": 70
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "42");

    let requests = server.received_requests().await.unwrap();
    let posted: Value = requests
        .iter()
        .find(|r| r.url.path() == "/vitals")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .unwrap();
    assert!(!posted["id"].as_str().unwrap().is_empty());
    let created_at = posted["createdAt"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
    assert!(created_at.ends_with('Z'));
}

#[tokio::test]
async fn test_add_lab_test_requires_name() {
    let server = MockServer::start().await;
    let router = setup(&server).await;

    let (status, body) = send(&router, "POST", "/records/labs", Some(json!({ "date": "2026-02-01" }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Test name is required");
}

#[tokio::test]
async fn test_add_prescription_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prescriptions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let router = setup(&server).await;

    let (status, body) = send(
        &router,
        "POST",
        "/records/prescriptions",
        Some(json!({ "date": "2026-02-01", "medication": "Lisinopril" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to save prescription");
}

#[tokio::test]
async fn test_records_require_session() {
    let server = MockServer::start().await;
    let config = TestConfig::with_backend(&server.uri());
    let session = Arc::new(SessionStore::restore(&config.to_app_config(), Arc::new(MemoryStorage::new())).await);
    let router = Router::new().nest("/records", records_routes(config.to_arc(), session));

    let (status, body) = send(&router, "GET", "/records/overview", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please sign in to continue");
}

#[tokio::test]
async fn test_service_against_unreachable_backend() {
    let config = TestConfig::with_backend("http://127.0.0.1:1").to_app_config();
    let service = RecordsService::new(&config);

    assert!(service.list_vitals("1", None).await.is_empty());
    let input = NewVital { date: "2026-02-01".to_string(), ..Default::default() };
    assert_matches!(
        service.add_vital("1", input, None).await,
        Err(RecordsError::SaveFailed(RecordKind::Vital))
    );
}
