use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{auth_handlers, cart_handlers, middleware as auth_middleware, payment_handlers, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(|| async { "Orderin API running" }))
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/renew-token", post(auth_handlers::renew_token));

    // Protected user routes (require an access token)
    let user_routes = Router::new()
        .route("/users/profile", get(auth_handlers::profile))
        .route("/users/sessions/{id}/block", post(auth_handlers::block_session))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    // Protected cart routes
    let cart_routes = Router::new()
        .route("/carts", post(cart_handlers::add_cart).get(cart_handlers::get_all))
        .route(
            "/carts/{id}",
            put(cart_handlers::update_qty).delete(cart_handlers::delete_cart),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    // Protected payment routes
    let payment_routes = Router::new()
        .route("/payments", post(payment_handlers::create_payment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(cart_routes)
        .merge(payment_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
