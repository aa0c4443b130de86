//! Registration, login, and profile flows
//!
//! These tests drive a real server against a oneshot database, run them
//! with `cargo test -- --ignored` and `DATABASE_URL`/`REDIS_URL` set

use axum::http::StatusCode;

mod common;

use common::{TEST_PASSWORD, TestEnv};

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn register_login_and_fetch_profile() {
	let env = TestEnv::new().await;

	env.signup_and_login("bob@example.com").await;

	let response = env.app.get("/profile/me").await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<serde_json::Value>();

	assert_eq!(body["email"], "bob@example.com");
	assert_eq!(body["isAdmin"], false);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn duplicate_email_registration_conflicts() {
	let env = TestEnv::new().await;

	env.register("bob@example.com").await;

	let response = env
		.app
		.post("/auth/register")
		.json(&serde_json::json!({
			"fullName": "Bob again",
			"email": "bob@example.com",
			"password": TEST_PASSWORD,
			"confirmPassword": TEST_PASSWORD,
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn short_passwords_are_rejected_before_any_write() {
	let env = TestEnv::new().await;

	let response = env
		.app
		.post("/auth/register")
		.json(&serde_json::json!({
			"fullName": "Bob de Bouwer",
			"email": "bob@example.com",
			"password": "short",
			"confirmPassword": "short",
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

	// The email must still be free afterwards
	env.register("bob@example.com").await;
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn mismatched_passwords_are_rejected() {
	let env = TestEnv::new().await;

	let response = env
		.app
		.post("/auth/register")
		.json(&serde_json::json!({
			"fullName": "Bob de Bouwer",
			"email": "bob@example.com",
			"password": TEST_PASSWORD,
			"confirmPassword": "something else entirely",
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn wrong_password_is_unauthorized() {
	let env = TestEnv::new().await;

	env.register("bob@example.com").await;

	let response = env
		.app
		.post("/auth/login")
		.json(&serde_json::json!({
			"email": "bob@example.com",
			"password": "not the password",
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn profile_requires_a_session() {
	let env = TestEnv::new().await;

	let response = env.app.get("/profile/me").await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs live postgres and redis"]
async fn profile_update_changes_the_name() {
	let env = TestEnv::new().await;

	env.signup_and_login("bob@example.com").await;

	let response = env
		.app
		.patch("/profile/me")
		.json(&serde_json::json!({ "fullName": "Robert de Bouwer" }))
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<serde_json::Value>();

	assert_eq!(body["fullName"], "Robert de Bouwer");
}
