//! HTTP client for the roomfit backend.
//!
//! Wraps the catalog, room, fitness-check and saved-design endpoints with
//! typed requests and responses. Every response body is decoded against an
//! explicit schema; anything that does not match is reported as a service
//! failure instead of leaking into the layout state.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use roomfit_client::RoomfitClient;
//! use roomfit_core::PlacementStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = RoomfitClient::with_base_url("http://localhost:8000");
//!     let catalog = client.list_furniture().await.unwrap();
//!
//!     let mut store = PlacementStore::new();
//!     store.add(Arc::new(catalog[0].clone()));
//!
//!     let report = client.check_fitness(1, &store.snapshot()).await.unwrap();
//!     println!("{}", report.overall_message);
//! }
//! ```

mod client;
mod convert;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, RoomfitClient};
pub use convert::{build_fitness_request, build_save_request, error_message, parse_body};
pub use error::ClientError;
pub use types::{FitnessCheckRequest, SaveDesignRequest};
