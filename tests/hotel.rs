//! Hotel search and detail flows
//!
//! These tests drive a real server against a oneshot database, run them
//! with `cargo test -- --ignored` and `DATABASE_URL`/`REDIS_URL` set

use axum::http::StatusCode;

mod common;

use common::TestEnv;

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn search_matches_location_substrings_case_insensitively() {
	let env = TestEnv::new().await;

	env.seed_hotel().await;

	let hit = env.app.get("/hotels/search?location=zubrow").await;
	assert_eq!(hit.status_code(), StatusCode::OK);
	assert_eq!(hit.json::<serde_json::Value>()["total"], 1);

	let miss = env.app.get("/hotels/search?location=atlantis").await;
	assert_eq!(miss.json::<serde_json::Value>()["total"], 0);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn search_excludes_rooms_with_overlapping_bookings() {
	let env = TestEnv::new().await;

	let (hotel_id, room_id) = env.seed_hotel().await;

	env.signup_and_login("bob@example.com").await;

	let created = env
		.create_booking(hotel_id, room_id, "2024-02-15", "2024-02-18", 45_000)
		.await;
	assert_eq!(created.status_code(), StatusCode::CREATED);

	// Overlapping range, the only room is taken
	let taken = env
		.app
		.get("/hotels/search?checkIn=2024-02-16&checkOut=2024-02-17")
		.await;
	assert_eq!(taken.json::<serde_json::Value>()["total"], 0);

	// Back-to-back range, checkout day equals the new check-in
	let free = env
		.app
		.get("/hotels/search?checkIn=2024-02-18&checkOut=2024-02-20")
		.await;
	assert_eq!(free.json::<serde_json::Value>()["total"], 1);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn search_counts_distinct_room_types_for_the_rooms_filter() {
	let env = TestEnv::new().await;

	let (hotel_id, _) = env.seed_hotel().await;
	env.seed_room(hotel_id, "Suite", 40_000, 4).await;

	let two = env.app.get("/hotels/search?rooms=2").await;
	assert_eq!(two.json::<serde_json::Value>()["total"], 1);

	// Two room types exist, three are requested
	let three = env.app.get("/hotels/search?rooms=3").await;
	assert_eq!(three.json::<serde_json::Value>()["total"], 0);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn search_rejects_one_sided_date_ranges() {
	let env = TestEnv::new().await;

	let response = env.app.get("/hotels/search?checkIn=2024-02-15").await;

	assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn hotel_detail_includes_rooms_facilities_and_reviews() {
	let env = TestEnv::new().await;

	let (hotel_id, _) = env.seed_hotel().await;

	env.signup_and_login("bob@example.com").await;

	let review = env
		.app
		.post(&format!("/hotels/{hotel_id}/reviews"))
		.json(&serde_json::json!({ "rating": 5, "body": "Lovely lobby" }))
		.await;
	assert_eq!(review.status_code(), StatusCode::CREATED);

	let response = env.app.get(&format!("/hotels/{hotel_id}")).await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<serde_json::Value>();

	assert_eq!(body["name"], "Grand Budapest");
	assert_eq!(body["rooms"].as_array().unwrap().len(), 1);
	assert_eq!(body["facilities"].as_array().unwrap().len(), 2);
	assert_eq!(body["reviewCount"], 1);
	assert_eq!(body["averageRating"], 5.0);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn unknown_hotels_are_not_found() {
	let env = TestEnv::new().await;

	let response = env.app.get("/hotels/9999").await;

	assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn a_second_review_on_the_same_hotel_conflicts() {
	let env = TestEnv::new().await;

	let (hotel_id, _) = env.seed_hotel().await;

	env.signup_and_login("bob@example.com").await;

	let first = env
		.app
		.post(&format!("/hotels/{hotel_id}/reviews"))
		.json(&serde_json::json!({ "rating": 5 }))
		.await;
	assert_eq!(first.status_code(), StatusCode::CREATED);

	let second = env
		.app
		.post(&format!("/hotels/{hotel_id}/reviews"))
		.json(&serde_json::json!({ "rating": 1 }))
		.await;
	assert_eq!(second.status_code(), StatusCode::CONFLICT);
}
