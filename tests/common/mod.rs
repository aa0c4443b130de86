use axum_extra::extract::cookie::Key;
use axum_test::TestServer;
use diesel::prelude::*;
use staymap::models::{NewHotel, NewRoom};
use staymap::schema::users;
use staymap::{AppState, Config, DbPool, routes};

mod mock_db;
mod mock_redis;

use mock_db::{DATABASE_PROVIDER, DatabaseGuard};
use mock_redis::{RedisUrlGuard, RedisUrlLock};

pub const TEST_PASSWORD: &str = "bobdebouwer1234!";

#[allow(dead_code)]
pub struct TestEnv {
	pub app:         TestServer,
	pub pool:        DbPool,
	pub db_guard:    DatabaseGuard,
	pub redis_guard: RedisUrlGuard,
}

#[allow(dead_code)]
impl TestEnv {
	/// Get a test environment with mocked resources for running tests
	///
	/// # Panics
	/// Panics if building the test server fails
	pub async fn new() -> Self {
		let config = Config::from_env();

		let test_pool_guard = (*DATABASE_PROVIDER).acquire().await;
		let test_pool = test_pool_guard.create_pool();

		let redis_url_guard = RedisUrlLock::get();
		let redis_connection = redis_url_guard.connect().await;

		let cookie_jar_key = Key::from(&[0u8; 64]);

		let state = AppState {
			config,
			database_pool: test_pool.clone(),
			redis_connection,
			cookie_jar_key,
		};
		let app = routes::get_app_router(state);

		let test_server =
			TestServer::builder().save_cookies().build(app).unwrap();

		TestEnv {
			app:         test_server,
			pool:        test_pool,
			db_guard:    test_pool_guard,
			redis_guard: redis_url_guard,
		}
	}

	/// Register a user and log them in, the session cookie sticks to the
	/// test server
	pub async fn signup_and_login(&self, email: &str) {
		self.register(email).await;
		self.login(email).await;
	}

	/// Register a user without logging them in
	pub async fn register(&self, email: &str) {
		let response = self
			.app
			.post("/auth/register")
			.json(&serde_json::json!({
				"fullName": "Bob de Bouwer",
				"email": email,
				"password": TEST_PASSWORD,
				"confirmPassword": TEST_PASSWORD,
			}))
			.await;

		assert_eq!(response.status_code(), 201);
	}

	/// Log a registered user in
	pub async fn login(&self, email: &str) {
		let response = self
			.app
			.post("/auth/login")
			.json(&serde_json::json!({
				"email": email,
				"password": TEST_PASSWORD,
			}))
			.await;

		assert_eq!(response.status_code(), 200);
	}

	/// Flip the admin flag of a registered user
	///
	/// Must happen before login, the session snapshots the flag
	pub async fn promote_to_admin(&self, email: &str) {
		let conn = self.pool.get().await.unwrap();
		let email = email.to_string();

		conn.interact(move |conn| {
			diesel::update(users::table.filter(users::email.eq(email)))
				.set(users::is_admin.eq(true))
				.execute(conn)
		})
		.await
		.unwrap()
		.unwrap();
	}

	/// Seed a hotel with a single double room at 150.00 per night
	pub async fn seed_hotel(&self) -> (i32, i32) {
		let conn = self.pool.get().await.unwrap();

		let hotel = NewHotel {
			name:        "Grand Budapest".to_string(),
			location:    "Zubrowka".to_string(),
			description: Some("A once-grand mountain resort".to_string()),
			rating:      Some(4.5),
		}
		.insert(vec!["wifi".to_string(), "pool".to_string()], &conn)
		.await
		.unwrap();

		let room = NewRoom {
			hotel_id:    hotel.id,
			room_type:   "Double".to_string(),
			price_cents: 15_000,
			capacity:    2,
			quantity:    1,
		}
		.insert(vec!["balcony".to_string()], &conn)
		.await
		.unwrap();

		(hotel.id, room.id)
	}

	/// Add another room type to a seeded hotel
	pub async fn seed_room(
		&self,
		hotel_id: i32,
		room_type: &str,
		price_cents: i64,
		capacity: i32,
	) -> i32 {
		let conn = self.pool.get().await.unwrap();

		let room = NewRoom {
			hotel_id,
			room_type: room_type.to_string(),
			price_cents,
			capacity,
			quantity: 1,
		}
		.insert(vec![], &conn)
		.await
		.unwrap();

		room.id
	}

	/// Create a booking through the API and return the response
	pub async fn create_booking(
		&self,
		hotel_id: i32,
		room_id: i32,
		check_in: &str,
		check_out: &str,
		total_price_cents: i64,
	) -> axum_test::TestResponse {
		self.app
			.post("/bookings")
			.json(&serde_json::json!({
				"hotelId": hotel_id,
				"roomId": room_id,
				"checkIn": check_in,
				"checkOut": check_out,
				"guests": 2,
				"totalPriceCents": total_price_cents,
			}))
			.await
	}
}
