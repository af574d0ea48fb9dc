use std::sync::Arc;

use axum::Router;

use crate::main_lib::AppState;

mod destination;
mod settings;
mod source;
mod sync;

pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(sync::router())
        .merge(destination::router())
        .merge(settings::router())
        .merge(source::router());

    Router::new().nest("/api", api).with_state(state)
}
