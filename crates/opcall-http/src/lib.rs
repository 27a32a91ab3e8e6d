//! # opcall HTTP
//!
//! Reqwest-based execution layer for operation-keyed calls.
//!
//! This crate provides:
//! - [`RequestExecutor`]: one request per invocation, transport and status
//!   failures converted into structured errors
//! - [`normalize`]: output-transform application and final result assembly
//! - [`OpClient`]: the facade running resolve -> transform -> execute ->
//!   normalize and always returning the uniform `{data, error}` result
//!
//! ## Example
//!
//! ```ignore
//! use opcall_core::{CallArgs, EndpointRegistry, Method};
//! use opcall_http::OpClient;
//! use std::sync::Arc;
//!
//! let registry = EndpointRegistry::builder("https://api.example.com")
//!     .operation("getUserTodos", Method::Get, "users/{userId}/todos")?
//!     .build()?;
//! let client = OpClient::new(Arc::new(registry));
//! let result = client
//!     .call("getUserTodos", None, &CallArgs::new().with("userId", "1"))
//!     .await;
//! ```

mod client;
mod executor;
mod normalizer;

pub use client::OpClient;
pub use executor::RequestExecutor;
pub use normalizer::normalize;
