//! Documentation of an inventory and clock-in service.
//!
//! # Resources
//! - **Items**: inventory entries owned by an email, with a quantity and a free-form expiry date
//! - **Clock-in records**: an email checking in at a location
//!
//! Both are stored as MongoDB documents. The server stamps the insertion time on creation and
//! never changes it afterwards.
//!
//!
//!
//! # Endpoints
//!
//! | Verb     | Path                  | Operation                        |
//! |----------|-----------------------|----------------------------------|
//! | `POST`   | `/items/`             | create                           |
//! | `GET`    | `/items/{id}`         | fetch one                        |
//! | `GET`    | `/items/filter`       | `email`, `expiry_date`, `insert_date`, `quantity` |
//! | `GET`    | `/items/aggregate`    | item count per email             |
//! | `PUT`    | `/items/{id}`         | partial update                   |
//! | `DELETE` | `/items/{id}`         | delete                           |
//! | `POST`   | `/clock-in/`          | create                           |
//! | `GET`    | `/clock-in/{id}`      | fetch one                        |
//! | `GET`    | `/clock-in/filter`    | `email`, `location`, `insert_datetime` |
//! | `PUT`    | `/clock-in/{id}`      | partial update                   |
//! | `DELETE` | `/clock-in/{id}`      | delete                           |
//!
//! Errors come back as `{"detail": ...}`: 404 for unknown or malformed ids, 422 for payloads
//! that do not fit the schema, 500 for unparsable timestamp filters and anything the store rejects.
//!
//!
//!
//! # Notes
//!
//! ## Updates
//! An update that changes nothing is reported as 404, same as an unknown id. The store only
//! tells us how many documents were modified.
//!
//! ## Expiry dates
//! `expiry_date` is a plain string. The `expiry_date` filter compares strings, so it only
//! behaves like a date filter when callers stick to `YYYY-MM-DD`.
//!
//!
//!
//! # Setup
//!
//! Environment (or `.env`):
//! ```sh
//! RUST_PORT=8000
//! MONGO_URI=mongodb://localhost:27017
//! DB_NAME=fastapi_crud
//! RUST_LOG=info
//! ```
//!
//! Atlas credentials can come from `DB_USER` / `DB_PASSWORD`, either as variables or as
//! files under `/run/secrets/`.
//!
//! Run.
//! ```sh
//! cargo run -p pantry-backend
//! ```
//!
//! Smoke test a running server.
//! ```sh
//! cargo run -p pantry-tester -- --base-url http://localhost:8000
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod clock_in;
pub mod config;
pub mod database;
pub mod error;
pub mod items;
pub mod memory;
pub mod records;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod utils;

use routes::{
    aggregate_items_handler, create_clock_in_handler, create_item_handler,
    delete_clock_in_handler, delete_item_handler, filter_clock_in_handler, filter_items_handler,
    get_clock_in_handler, get_item_handler, update_clock_in_handler, update_item_handler,
};
use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(600));

    Router::new()
        .route("/items", post(create_item_handler))
        .route("/items/", post(create_item_handler))
        .route("/items/filter", get(filter_items_handler))
        .route("/items/aggregate", get(aggregate_items_handler))
        .route(
            "/items/{id}",
            get(get_item_handler)
                .put(update_item_handler)
                .delete(delete_item_handler),
        )
        .route("/clock-in", post(create_clock_in_handler))
        .route("/clock-in/", post(create_clock_in_handler))
        .route("/clock-in/filter", get(filter_clock_in_handler))
        .route(
            "/clock-in/{id}",
            get(get_clock_in_handler)
                .put(update_clock_in_handler)
                .delete(delete_clock_in_handler),
        )
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    let dotenv = dotenv::dotenv();

    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = dotenv {
        info!("No .env loaded: {e}");
    }

    info!("Initializing state...");
    let state = AppState::new().await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = build_router(state);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
