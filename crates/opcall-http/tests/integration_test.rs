//! HTTP integration tests using a mock Axum server

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use opcall_core::{
    transform_fn, CallArgs, EndpointRegistry, Method, OperationDescriptor, TransformError,
};
use opcall_http::OpClient;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

type Hits = Arc<AtomicUsize>;

async fn user_todos(State(hits): State<Hits>, Path(id): Path<String>) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    if id == "1" {
        (
            StatusCode::OK,
            Json(json!([{"id": 1, "title": "Buy milk", "completed": false}])),
        )
            .into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response()
    }
}

async fn create_todo(State(hits): State<Hits>, Json(body): Json<Value>) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::CREATED, Json(json!({"id": 101, "received": body})))
}

async fn delete_todo(State(hits): State<Hits>, Path(_id): Path<String>) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

async fn broken(State(hits): State<Hits>) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, "this is not json")
}

/// Start a mock server and return its address plus a request counter
async fn start_test_server() -> (SocketAddr, Hits) {
    let hits: Hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/users/:id/todos", get(user_todos))
        .route("/todos", post(create_todo))
        .route("/todos/:id", delete(delete_todo))
        .route("/broken", get(broken))
        .with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start
    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

    (addr, hits)
}

fn todos_output_transform() -> opcall_core::Transform {
    transform_fn(|value| {
        let items = match value {
            Value::Array(items) => items,
            _ => return Err(TransformError::new("expected array")),
        };
        items
            .into_iter()
            .map(|item| {
                let mut todo = match item {
                    Value::Object(todo) => todo,
                    _ => return Err(TransformError::new("expected object")),
                };
                let completed = todo
                    .remove("completed")
                    .and_then(|v| v.as_bool())
                    .ok_or_else(|| TransformError::new("missing 'completed' flag"))?;
                todo.insert(
                    "status".to_string(),
                    json!(if completed { "done" } else { "pending" }),
                );
                Ok(Value::Object(todo))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    })
}

fn test_client(addr: SocketAddr) -> OpClient {
    let registry = EndpointRegistry::builder(format!("http://{addr}"))
        .register(
            OperationDescriptor::new("getUserTodos", Method::Get, "users/{userId}/todos")
                .unwrap()
                .with_output_transform(todos_output_transform()),
        )
        .unwrap()
        .operation("getUserTodosRaw", Method::Get, "users/{userId}/todos")
        .unwrap()
        .operation("createTodo", Method::Post, "todos")
        .unwrap()
        .operation("deleteTodo", Method::Delete, "todos/{id}")
        .unwrap()
        .operation("getBroken", Method::Get, "broken")
        .unwrap()
        .build()
        .unwrap();
    OpClient::new(Arc::new(registry))
}

#[tokio::test]
async fn test_success_with_output_transform() {
    let (addr, _) = start_test_server().await;
    let client = test_client(addr);

    let args = CallArgs::new().with("userId", "1");
    let result = client.call("getUserTodos", None, &args).await;

    assert!(result.error().is_none());
    assert_eq!(
        result.data(),
        Some(&json!([{"id": 1, "title": "Buy milk", "status": "pending"}]))
    );
}

#[tokio::test]
async fn test_success_without_transform_returns_raw_body() {
    let (addr, _) = start_test_server().await;
    let client = test_client(addr);

    let args = CallArgs::new().with("userId", "1");
    let result = client.call("getUserTodosRaw", None, &args).await;

    assert_eq!(
        result.data(),
        Some(&json!([{"id": 1, "title": "Buy milk", "completed": false}]))
    );
}

#[tokio::test]
async fn test_not_found_maps_status_and_cause() {
    let (addr, _) = start_test_server().await;
    let client = test_client(addr);

    let args = CallArgs::new().with("userId", "2");
    let result = client.call("getUserTodos", None, &args).await;

    assert!(result.data().is_none());
    let error = result.error().unwrap();
    assert_eq!(error.status_code, Some(404));
    assert!(error.message.contains("404"));
    assert_eq!(error.cause, Some(json!({"error": "not found"})));
}

#[tokio::test]
async fn test_unknown_operation_makes_no_network_call() {
    let (addr, hits) = start_test_server().await;
    let client = test_client(addr);

    let result = client.call("doesNotExist", None, &CallArgs::new()).await;

    assert!(result.data().is_none());
    let error = result.error().unwrap();
    assert!(error.message.contains("doesNotExist"));
    assert!(error.status_code.is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_argument_makes_no_network_call() {
    let (addr, hits) = start_test_server().await;
    let client = test_client(addr);

    let result = client.call("getUserTodos", None, &CallArgs::new()).await;

    assert!(result.is_err());
    assert!(result.error().unwrap().message.contains("userId"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_transport_failure() {
    // Bind and immediately drop a listener to get a port nothing serves
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = test_client(addr);
    let args = CallArgs::new().with("userId", "1");
    let result = client.call("getUserTodos", None, &args).await;

    assert!(result.data().is_none());
    let error = result.error().unwrap();
    assert_eq!(error.status_code, None);
    assert_eq!(error.message, "request failed before a response was received");
    assert!(error.cause.is_some());
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (addr, _) = start_test_server().await;
    let client = test_client(addr);

    let result = client.call("getBroken", None, &CallArgs::new()).await;

    let error = result.error().unwrap();
    assert_eq!(error.message, "failed to parse response body as JSON");
    assert!(error.status_code.is_none());
}

#[tokio::test]
async fn test_empty_success_body_is_null_data() {
    let (addr, _) = start_test_server().await;
    let client = test_client(addr);

    let args = CallArgs::new().with("id", "1");
    let result = client.call("deleteTodo", None, &args).await;

    assert!(result.is_ok());
    assert_eq!(result.data(), Some(&Value::Null));
}

#[tokio::test]
async fn test_output_transform_failure_becomes_error_result() {
    let (addr, _) = start_test_server().await;

    let registry = EndpointRegistry::builder(format!("http://{addr}"))
        .register(
            OperationDescriptor::new("createTodo", Method::Post, "todos")
                .unwrap()
                .with_output_transform(transform_fn(|_| {
                    Err(TransformError::new("always fails"))
                })),
        )
        .unwrap()
        .build()
        .unwrap();
    let client = OpClient::new(Arc::new(registry));

    let result = client
        .call("createTodo", Some(json!({"title": "x"})), &CallArgs::new())
        .await;

    assert!(result.data().is_none());
    let error = result.error().unwrap();
    assert_eq!(error.message, "response transform failed");
    assert_eq!(error.cause, Some(json!("always fails")));
}

#[tokio::test]
async fn test_input_transform_runs_before_serialization() {
    let (addr, _) = start_test_server().await;

    let registry = EndpointRegistry::builder(format!("http://{addr}"))
        .register(
            OperationDescriptor::new("createTodo", Method::Post, "todos")
                .unwrap()
                .with_input_transform(transform_fn(|payload| {
                    Ok(json!({"wire": payload}))
                })),
        )
        .unwrap()
        .build()
        .unwrap();
    let client = OpClient::new(Arc::new(registry));

    let result = client
        .call("createTodo", Some(json!({"title": "Buy milk"})), &CallArgs::new())
        .await;

    // The echo server shows us exactly what went over the wire
    assert_eq!(
        result.data(),
        Some(&json!({"id": 101, "received": {"wire": {"title": "Buy milk"}}}))
    );
}

#[tokio::test]
async fn test_input_transform_failure_makes_no_network_call() {
    let (addr, hits) = start_test_server().await;

    let registry = EndpointRegistry::builder(format!("http://{addr}"))
        .register(
            OperationDescriptor::new("createTodo", Method::Post, "todos")
                .unwrap()
                .with_input_transform(transform_fn(|_| {
                    Err(TransformError::new("bad payload"))
                })),
        )
        .unwrap()
        .build()
        .unwrap();
    let client = OpClient::new(Arc::new(registry));

    let result = client
        .call("createTodo", Some(json!({})), &CallArgs::new())
        .await;

    let error = result.error().unwrap();
    assert_eq!(error.message, "request transform failed");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrent_calls_do_not_interact() {
    let (addr, hits) = start_test_server().await;
    let client = Arc::new(test_client(addr));

    let ok_args = CallArgs::new().with("userId", "1");
    let missing_args = CallArgs::new().with("userId", "2");

    let ok_call = {
        let client = client.clone();
        let args = ok_args.clone();
        tokio::spawn(async move { client.call("getUserTodos", None, &args).await })
    };
    let missing_call = {
        let client = client.clone();
        let args = missing_args.clone();
        tokio::spawn(async move { client.call("getUserTodos", None, &args).await })
    };

    let ok_result = ok_call.await.unwrap();
    let missing_result = missing_call.await.unwrap();

    assert!(ok_result.is_ok());
    assert_eq!(missing_result.error().unwrap().status_code, Some(404));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
