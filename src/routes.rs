use std::time::Duration;

use axum::Router;
use axum::routing::{get, patch, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::controllers::admin::{
	create_hotel,
	create_room,
	delete_hotel,
	delete_room,
	export_report,
	get_all_bookings,
	get_all_hotels,
	get_report,
	update_hotel,
	update_room,
};
use crate::controllers::auth::{login_user, logout_user, register_user};
use crate::controllers::booking::{
	cancel_booking,
	create_booking,
	create_payment,
	get_booking,
	get_bookings,
};
use crate::controllers::healthcheck;
use crate::controllers::hotel::{create_review, get_hotel, search_hotels};
use crate::controllers::profile::{
	get_current_profile,
	update_current_profile,
};
use crate::middleware::AuthLayer;

/// Get the app router
pub fn get_app_router(state: AppState) -> Router {
	let api_routes = Router::new()
		.route("/healthcheck", get(healthcheck))
		.nest("/auth", auth_routes(&state))
		.nest("/profile", profile_routes(&state))
		.nest("/hotels", hotel_routes(&state))
		.nest("/bookings", booking_routes(&state))
		.nest("/payments", payment_routes(&state))
		.nest("/admin", admin_routes(&state));

	Router::new()
		.merge(api_routes)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(Duration::from_secs(10)))
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

/// Authentication routes
fn auth_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/register", post(register_user))
		.route("/login", post(login_user))
		.route(
			"/logout",
			post(logout_user).route_layer(AuthLayer::new(state.clone())),
		)
}

/// Profile routes for the logged-in user
fn profile_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route(
			"/me",
			get(get_current_profile).patch(update_current_profile),
		)
		.route_layer(AuthLayer::new(state.clone()))
}

/// Public hotel catalogue routes, reviews require a session
fn hotel_routes(state: &AppState) -> Router<AppState> {
	let authenticated = Router::new()
		.route("/{id}/reviews", post(create_review))
		.route_layer(AuthLayer::new(state.clone()));

	Router::new()
		.route("/search", get(search_hotels))
		.route("/{id}", get(get_hotel))
		.merge(authenticated)
}

/// Booking routes, all behind a session
fn booking_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/", post(create_booking).get(get_bookings))
		.route("/{id}", get(get_booking))
		.route("/{id}/cancel", post(cancel_booking))
		.route_layer(AuthLayer::new(state.clone()))
}

/// Payment routes, all behind a session
fn payment_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/", post(create_payment))
		.route_layer(AuthLayer::new(state.clone()))
}

/// Admin back office, the handlers additionally require an admin session
fn admin_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/hotels", get(get_all_hotels).post(create_hotel))
		.route("/hotels/{id}", patch(update_hotel).delete(delete_hotel))
		.route("/hotels/{id}/rooms", post(create_room))
		.route("/rooms/{id}", patch(update_room).delete(delete_room))
		.route("/bookings", get(get_all_bookings))
		.route("/reports", get(get_report))
		.route("/reports/export", get(export_report))
		.route_layer(AuthLayer::new(state.clone()))
}
