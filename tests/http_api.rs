use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

async fn send(request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    send_to(&lifeplan::api::router(), request).await
}

async fn send_to(router: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = serde_json::from_slice(&bytes).expect("body should be JSON");
    (status, cache_control, body)
}

fn post_plan(json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/plan")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .expect("request should build")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, cache_control, body) = send(get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_control.as_deref(), Some("no-store"));
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn post_plan_returns_full_projection() {
    let (status, _, body) = send(post_plan(
        r#"{ "hasChildren": true, "children": [{ "age": 5 }] }"#,
    ))
    .await;
    assert_eq!(status, StatusCode::OK);

    let balances = body["savingsBalance"].as_array().expect("savingsBalance array");
    assert_eq!(balances.len(), 71);
    assert_eq!(balances[0]["age"], 25);
    assert_eq!(balances[0]["generalSavings"], 100.0);
    assert_eq!(body["investment"].as_array().map(Vec::len), Some(41));
    assert_eq!(body["education"]["children"][0]["yearsUntil18"], 13);
    assert!(body["shortfall"]["minMonthlyInvestment"].as_f64().unwrap_or(0.0) > 0.0);
    assert!(body["contributionPlan"]["educationMonthly"].as_f64().unwrap_or(0.0) > 0.0);
}

#[tokio::test]
async fn get_plan_accepts_query_overrides() {
    let (status, _, body) =
        send(get("/api/plan?currentAge=40&retirementAge=60&finalAge=85&inflationRate=0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shortfall"]["inflationMultiplier"], 1.0);
    assert_eq!(body["shortfall"]["yearsUntilRetirement"], 20);
    assert_eq!(body["savingsBalance"].as_array().map(Vec::len), Some(46));
}

#[tokio::test]
async fn invalid_plan_is_rejected_with_json_error() {
    let (status, cache_control, body) =
        send(post_plan(r#"{ "currentAge": 70, "retirementAge": 65 }"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(cache_control.as_deref(), Some("no-store"));
    let message = body["error"].as_str().expect("error message");
    assert!(message.contains("current < retirement < final"));

    let (status, _, body) = send(post_plan("{ not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (status, _, body) = send(get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn oversized_ages_are_rejected_and_router_keeps_serving() {
    let router = lifeplan::api::router();

    let (status, _, body) = send_to(&router, post_plan(r#"{ "finalAge": 300000000 }"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().expect("error message");
    assert!(message.contains("finalAge"));

    let (status, _, _) = send_to(
        &router,
        post_plan(r#"{ "loanStartAge": 4294967295, "loanYears": 1 }"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = send_to(&router, post_plan("{}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["savingsBalance"].is_array());
}

#[tokio::test]
async fn repeated_plan_on_one_router_returns_identical_body() {
    let router = lifeplan::api::router();
    let json = r#"{ "hasChildren": true, "children": [{ "age": 5 }], "inflationRate": 1.5 }"#;

    let (first_status, _, first) = send_to(&router, post_plan(json)).await;
    let (second_status, _, second) = send_to(&router, post_plan(json)).await;
    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
}
