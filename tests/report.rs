//! Admin booking oversight and reporting
//!
//! These tests drive a real server against a oneshot database, run them
//! with `cargo test -- --ignored` and `DATABASE_URL`/`REDIS_URL` set

use axum::http::StatusCode;

mod common;

use common::TestEnv;

/// Seed two paid-for bookings made today by an admin user
async fn seed_admin_with_bookings(env: &TestEnv) {
	let (hotel_id, room_id) = env.seed_hotel().await;
	let second_room = env.seed_room(hotel_id, "Suite", 40_000, 4).await;

	env.register("admin@example.com").await;
	env.promote_to_admin("admin@example.com").await;
	env.login("admin@example.com").await;

	let first = env
		.create_booking(hotel_id, room_id, "2024-02-15", "2024-02-18", 45_000)
		.await;
	assert_eq!(first.status_code(), StatusCode::CREATED);

	let second = env
		.create_booking(
			hotel_id,
			second_room,
			"2024-02-15",
			"2024-02-16",
			40_000,
		)
		.await;
	assert_eq!(second.status_code(), StatusCode::CREATED);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn the_report_buckets_bookings_by_creation_day() {
	let env = TestEnv::new().await;

	seed_admin_with_bookings(&env).await;

	let response = env.app.get("/admin/reports?groupBy=day").await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<serde_json::Value>();

	// Both bookings were created just now, they share one bucket
	assert_eq!(body["data"].as_array().unwrap().len(), 1);
	assert_eq!(body["data"][0]["totalBookings"], 2);
	assert_eq!(body["data"][0]["totalRevenueCents"], 85_000);
	assert_eq!(body["summary"]["totalBookings"], 2);
	assert_eq!(body["summary"]["totalRevenueCents"], 85_000);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn identical_report_queries_return_identical_results() {
	let env = TestEnv::new().await;

	seed_admin_with_bookings(&env).await;

	let url = "/admin/reports?dateFrom=2024-01-01&groupBy=day";

	let first = env.app.get(url).await.json::<serde_json::Value>();
	let second = env.app.get(url).await.json::<serde_json::Value>();

	assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn the_csv_export_carries_the_same_series() {
	let env = TestEnv::new().await;

	seed_admin_with_bookings(&env).await;

	let response = env.app.get("/admin/reports/export").await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.text();

	assert!(body.starts_with("bucket,total_bookings,total_revenue_cents\n"));
	assert!(body.contains(",2,85000\n"));
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn an_inverted_report_window_is_rejected() {
	let env = TestEnv::new().await;

	env.register("admin@example.com").await;
	env.promote_to_admin("admin@example.com").await;
	env.login("admin@example.com").await;

	let response = env
		.app
		.get("/admin/reports?dateFrom=2024-03-01&dateTo=2024-02-01")
		.await;

	assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn the_back_office_is_forbidden_for_regular_users() {
	let env = TestEnv::new().await;

	env.signup_and_login("bob@example.com").await;

	let response = env.app.get("/admin/reports").await;

	assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn admins_see_all_bookings_with_filters() {
	let env = TestEnv::new().await;

	seed_admin_with_bookings(&env).await;

	let all = env.app.get("/admin/bookings").await;
	assert_eq!(all.status_code(), StatusCode::OK);
	assert_eq!(all.json::<serde_json::Value>()["total"], 2);

	let pending = env.app.get("/admin/bookings?status=pending").await;
	assert_eq!(pending.json::<serde_json::Value>()["total"], 2);

	let cancelled = env.app.get("/admin/bookings?status=cancelled").await;
	assert_eq!(cancelled.json::<serde_json::Value>()["total"], 0);
}
