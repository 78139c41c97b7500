mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};

use crate::api::{DynAPI, API};
use crate::server::handlers::places;

pub async fn serve<T: API + Send + Sync + 'static>(api: T) {
    tracing_subscriber::fmt::init();

    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/places", get(places::list))
        .layer(Extension(api));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
