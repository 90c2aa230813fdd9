use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, cars, dealerships, health};
use crate::middleware::{log_request, require_bearer};
use crate::state::AppState;

/// Build the full router. `enable_cors` adds a permissive CORS layer.
pub fn app(state: AppState, enable_cors: bool) -> Router {
    let protected = Router::new()
        .merge(dealership_routes())
        .merge(car_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let router = Router::new()
        // Public
        .route("/login", post(auth::login))
        .route("/health", get(health::health))
        // Bearer token required
        .merge(protected)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(state.clone(), log_request)),
        );

    let router = if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

fn dealership_routes() -> Router<AppState> {
    Router::new()
        .route("/dealerships", get(dealerships::list).post(dealerships::create))
        .route(
            "/dealerships/:id",
            get(dealerships::get)
                .put(dealerships::update)
                .delete(dealerships::delete),
        )
}

fn car_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/dealerships/:id/cars",
            get(cars::list).post(cars::create).delete(cars::delete_all),
        )
        .route(
            "/dealerships/:id/cars/:car_id",
            get(cars::get).put(cars::update).delete(cars::delete),
        )
}
