use std::{net::SocketAddr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{
    net::TcpListener,
    sync::{Mutex, OnceCell},
};

use crate::{api, config::Config, pipeline::Pipeline, types::PkceToken};

/// State shared by every route of the local server.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<Mutex<Option<PkceToken>>>,
    /// Set once the user has authorized; the form is inert until then.
    pub pipeline: Arc<OnceCell<Pipeline>>,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        AppState {
            config,
            auth: Arc::new(Mutex::new(None)),
            pipeline: Arc::new(OnceCell::new()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::form_page).post(api::submit_form))
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener, String> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))
}

pub async fn start_api_server(listener: TcpListener, state: AppState) -> Result<(), String> {
    axum::serve(listener, router(state))
        .await
        .map_err(|e| e.to_string())
}
