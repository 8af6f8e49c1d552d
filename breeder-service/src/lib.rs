//! # breeder-service
//!
//! HTTP CRUD service for breeder records.
//!
//! ## Features
//!
//! - **CRUD**: create, list, fetch, partially update and delete breeders
//! - **Hypermedia**: every representation carries `self`/`collection` links,
//!   lists add `next`, and responses repeat them in an RFC 8288 `Link` header
//! - **Delayed creation**: submissions persisted after a fixed delay, with a
//!   pollable `pending`/`completed`/`failed` status
//! - **Storage**: PostgreSQL (`database` feature) or an in-process store
//! - **Middleware stack**: request IDs, tracing, timeouts, body limits, CORS,
//!   compression, panic recovery
//! - **Health checks**: liveness and readiness probes
//! - **Graceful shutdown**: SIGTERM/SIGINT stop the listener, then scheduled
//!   creations are drained
//!
//! ## Example
//!
//! ```rust,no_run
//! use breeder_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::builder().config(config.clone()).build().await?;
//!
//!     Server::new(config).serve(router(state.clone())).await?;
//!     state.shutdown().await;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
#[cfg(feature = "database")]
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod links;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod responses;
pub mod server;
pub mod state;
pub mod tasks;

pub mod prelude {
    pub use crate::config::{
        Config, DatabaseConfig, LinksConfig, MiddlewareConfig, ServiceConfig, TasksConfig,
    };
    pub use crate::error::{Error, ErrorResponse, Result};

    #[cfg(feature = "database")]
    pub use crate::error::{DatabaseError, DatabaseErrorKind, DatabaseOperation};

    pub use crate::handlers::router;
    pub use crate::health::{health, readiness};
    pub use crate::ids::{BreederId, MakeTypedRequestId, RequestId};
    pub use crate::links::{BreederDelayResponse, BreederListResponse, BreederOut, LinkBuilder};
    pub use crate::models::{Breeder, BreederUpdate, NewBreeder, PriceLevel};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        BreederFilter, BreederRepository, BreederStore, InMemoryBreederRepository, Pagination,
        RepositoryError,
    };

    #[cfg(feature = "database")]
    pub use crate::repository::PgBreederRepository;

    pub use crate::responses::{Accepted, Created, Message, ValidationError, WithLinks};
    pub use crate::server::Server;
    pub use crate::state::{AppState, AppStateBuilder};
    pub use crate::tasks::{DelayedCreationWorker, TaskState, TaskStatusResponse, TaskTracker};

    pub use axum::{
        extract::{Path, Query, State},
        routing::{delete, get, post, put},
        Json, Router,
    };
    pub use serde::{Deserialize, Serialize};
}
