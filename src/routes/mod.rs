use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{admin, auth, checkout, coverage, pharmacy, profile, requests};
use crate::middleware::auth::{
    auth_middleware, optional_auth_middleware, require_admin,
};
use crate::middleware::rate_limit::{create_public_governor, log_request};
use crate::middleware::user_rate_limit::create_user_governor;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // IP-based governor for everything reachable without a token
    let public_governor = create_public_governor();
    // Per-user governor for authenticated routes
    let user_governor = create_user_governor();

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/login/verify", post(auth::verify_login_otp))
        .layer(public_governor.clone());

    // Public catalog, coverage and intake-form routes
    let public_routes = Router::new()
        .route("/pharmacies", get(pharmacy::list_pharmacies))
        .route("/pharmacies/nearby", get(pharmacy::nearby_pharmacies))
        .route("/pharmacies/{id}", get(pharmacy::get_pharmacy))
        .route("/geocode", get(coverage::geocode_address))
        .route("/coverage/zips", get(coverage::list_zips))
        .route("/coverage/check", get(coverage::check_zip))
        .route("/coverage/validate", post(coverage::validate_location))
        .route("/coverage/notify", post(coverage::notify_me))
        .route("/quote", post(checkout::quote_order))
        .route("/requests/{kind}", post(requests::submit_service_request))
        .route("/contact", post(requests::submit_contact_message))
        .route(
            "/business-inquiries",
            post(requests::submit_business_inquiry),
        )
        .layer(public_governor.clone());

    // Checkout serves both guests and logged-in users; ownership of the
    // draft is resolved per request from the optional token
    let checkout_routes = Router::new()
        .route("/draft", get(checkout::get_draft))
        .route("/draft", put(checkout::update_draft))
        .route("/draft", delete(checkout::clear_draft))
        .route("/contact-details", post(checkout::submit_contact))
        .route("/back", post(checkout::back_to_contact))
        .route("/submit", post(checkout::submit_order))
        .layer(public_governor)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    // Profile routes (requires auth; per-user rate limiting)
    let profile_routes = Router::new()
        .route("/", get(profile::get_profile))
        .route("/", put(profile::update_profile))
        .route("/two-factor", put(profile::set_two_factor))
        .route("/password/otp", post(profile::request_password_otp))
        .route("/password", put(profile::change_password))
        .route("/activity", get(profile::activity_log))
        .layer(user_governor)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        // Pharmacy management
        .route("/pharmacies", post(admin::create_pharmacy))
        .route("/pharmacies/{id}", put(admin::update_pharmacy))
        .route("/pharmacies/{id}", delete(admin::delete_pharmacy))
        // Coverage management
        .route("/coverage/zips", post(admin::add_coverage_zip))
        .route("/coverage/zips/{zip}", delete(admin::remove_coverage_zip))
        .route(
            "/coverage/notifications",
            get(admin::list_coverage_notifications),
        )
        // Order management
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}/status", put(admin::update_order_status))
        // User management
        .route("/users", get(admin::list_all_users))
        .route("/users/{id}", delete(admin::delete_user))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes)
        .nest("/api/checkout", checkout_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/admin", admin_routes)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
