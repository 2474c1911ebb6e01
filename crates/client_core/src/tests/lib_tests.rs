use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use super::*;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct SolverState {
    status: StatusCode,
    body: Arc<String>,
    hits: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn handle_riddle(
    State(state): State<SolverState>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.queries.lock().await.push(query);
    (state.status, state.body.as_str().to_owned())
}

async fn handle_hung_riddle() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(5)).await;
    StatusCode::OK
}

async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn spawn_solver(status: StatusCode, body: impl Into<String>) -> (Url, SolverState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = SolverState {
        status,
        body: Arc::new(body.into()),
        hits: Arc::new(AtomicUsize::new(0)),
        queries: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api/v1/riddle", get(handle_riddle))
        .route("/api/v1/health", get(handle_health))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let url = Url::parse(&format!("http://{addr}")).expect("url");
    (url, state)
}

fn json_body(value: Value) -> String {
    value.to_string()
}

#[tokio::test]
async fn empty_parameters_still_issue_exactly_one_request() {
    let (endpoint, solver) = spawn_solver(
        StatusCode::BAD_REQUEST,
        json_body(json!({
            "message": "invalid parameters",
            "description": "every param must be a positive integer"
        })),
    )
    .await;
    let client = RiddleClient::new(endpoint);
    let mut machine = ResolutionMachine::new();

    let generation = machine.submit();
    assert!(machine.state().is_loading());
    let outcome = client.solve(&RiddleParameters::default()).await;

    assert_eq!(solver.hits.load(Ordering::SeqCst), 1);
    let queries = solver.queries.lock().await;
    assert_eq!(queries[0].get("x").map(String::as_str), Some(""));
    assert_eq!(queries[0].get("y").map(String::as_str), Some(""));
    assert_eq!(queries[0].get("z").map(String::as_str), Some(""));

    assert_eq!(
        machine.resolve(generation, outcome.map_err(ResolutionFailure::from)),
        Commit::Applied
    );
    assert!(matches!(machine.state(), ResolutionState::Failure(_)));
}

#[tokio::test]
async fn success_body_resolves_and_renders_table() {
    let (endpoint, _solver) = spawn_solver(
        StatusCode::OK,
        json_body(json!({
            "jug": "a",
            "operations": [{"step": 1, "operation": "fill", "jug": "a", "amount": 3}],
            "total_steps": 1
        })),
    )
    .await;
    let client = RiddleClient::new(endpoint);
    let mut machine = ResolutionMachine::new();

    let generation = machine.submit();
    let outcome = client
        .solve(&RiddleParameters::new("3", "5", "4"))
        .await
        .map_err(ResolutionFailure::from);
    assert_eq!(machine.resolve(generation, outcome), Commit::Applied);

    let ResolutionView::Table(table) = render(machine.state()) else {
        panic!("expected a table, got {:?}", machine.state());
    };
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].cells(), ["#1", "FILL", "A", "3"]);
    assert_eq!(table.target_header(), "Jug with desired amount of water: A");
}

#[tokio::test]
async fn service_error_body_becomes_error_panel() {
    let (endpoint, _solver) = spawn_solver(
        StatusCode::BAD_REQUEST,
        json_body(json!({
            "message": "invalid params",
            "description": "x must be positive"
        })),
    )
    .await;
    let client = RiddleClient::new(endpoint);

    let err = client
        .solve(&RiddleParameters::new("-1", "5", "4"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, SolveError::Service { status: 400, .. }));
    assert_eq!(err.status(), Some(400));

    let mut machine = ResolutionMachine::new();
    let generation = machine.submit();
    assert_eq!(
        machine.resolve(generation, Err(ResolutionFailure::from(err))),
        Commit::Applied
    );
    let ResolutionView::ErrorPanel(panel) = render(machine.state()) else {
        panic!("expected an error panel");
    };
    assert_eq!(panel.message_line(), "MESSAGE: INVALID PARAMS");
    assert_eq!(panel.description_line(), "DESCRIPTION: X MUST BE POSITIVE");
}

#[tokio::test]
async fn raw_values_travel_verbatim_as_query_parameters() {
    let (endpoint, solver) = spawn_solver(
        StatusCode::BAD_REQUEST,
        json_body(json!({"message": "invalid parameters", "description": "value is not integer"})),
    )
    .await;
    let client = RiddleClient::new(endpoint);

    let params = RiddleParameters::new(" 3", "five&y=9", "4.0");
    let url = client.riddle_url(&params).expect("url");
    assert_eq!(url.path(), "/api/v1/riddle");

    let _ = client.solve(&params).await;
    let queries = solver.queries.lock().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].get("x").map(String::as_str), Some(" 3"));
    assert_eq!(queries[0].get("y").map(String::as_str), Some("five&y=9"));
    assert_eq!(queries[0].get("z").map(String::as_str), Some("4.0"));
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_failure() {
    let (endpoint, _solver) = spawn_solver(
        StatusCode::OK,
        json_body(json!({
            "jug": "x",
            "operations": [{"step": 1, "operation": "fill", "jug": "x", "jug_origin": "y", "jug_destination": "x", "amount": 1}],
            "total_steps": 1
        })),
    )
    .await;
    let client = RiddleClient::new(endpoint);

    let err = client
        .solve(&RiddleParameters::new("1", "2", "1"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, SolveError::Decode { status: 200, .. }));
    assert_eq!(ResolutionFailure::from(err).kind, FailureKind::Decode);
}

#[tokio::test]
async fn non_json_error_body_is_a_decode_failure() {
    let (endpoint, _solver) = spawn_solver(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").await;
    let client = RiddleClient::new(endpoint);

    let err = client
        .solve(&RiddleParameters::new("3", "5", "4"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, SolveError::Decode { status: 502, .. }));
}

#[tokio::test]
async fn unreachable_solver_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let client = RiddleClient::new(Url::parse(&format!("http://{addr}")).expect("url"));
    let err = client
        .solve(&RiddleParameters::new("3", "5", "4"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, SolveError::Transport(_)));

    let failure = ResolutionFailure::from(err);
    assert_eq!(failure.kind, FailureKind::Transport);
    assert_eq!(failure.error.message, "transport error");
}

#[tokio::test]
async fn configured_timeout_turns_hung_solver_into_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route("/api/v1/riddle", get(handle_hung_riddle));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let settings = Settings {
        endpoint: format!("http://{addr}"),
        request_timeout_secs: Some(1),
    };
    let client = RiddleClient::from_settings(&settings).expect("client");
    let err = client
        .solve(&RiddleParameters::new("3", "5", "4"))
        .await
        .expect_err("must time out");
    assert!(matches!(err, SolveError::Transport(_)), "got {err:?}");

    let mut machine = ResolutionMachine::new();
    let generation = machine.submit();
    assert_eq!(
        machine.resolve(generation, Err(ResolutionFailure::from(err))),
        Commit::Applied
    );
    let ResolutionState::Failure(failure) = machine.state() else {
        panic!("expected a failure, got {:?}", machine.state());
    };
    assert_eq!(failure.kind, FailureKind::Transport);
}

#[tokio::test]
async fn health_probe_hits_health_endpoint() {
    let (endpoint, solver) = spawn_solver(StatusCode::OK, "{}").await;
    let client = RiddleClient::new(endpoint);

    client.health().await.expect("healthy");
    assert_eq!(solver.hits.load(Ordering::SeqCst), 0);
}

#[test]
fn endpoint_path_prefix_is_kept() {
    let client = RiddleClient::new(Url::parse("http://solver.example/jugs/?debug=1").expect("url"));
    let url = client
        .riddle_url(&RiddleParameters::new("3", "5", "4"))
        .expect("url");
    assert_eq!(
        url.as_str(),
        "http://solver.example/jugs/api/v1/riddle?x=3&y=5&z=4"
    );
}

#[test]
fn client_from_settings_validates_endpoint() {
    let settings = Settings {
        endpoint: "http://localhost:8080".into(),
        request_timeout_secs: Some(10),
    };
    let client = RiddleClient::from_settings(&settings).expect("client");
    assert_eq!(client.endpoint().as_str(), "http://localhost:8080/");

    let bad = Settings {
        endpoint: "not a url".into(),
        request_timeout_secs: None,
    };
    assert!(RiddleClient::from_settings(&bad).is_err());
}
