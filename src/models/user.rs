use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::users;
use crate::{DbConn, Error};

/// A single registered user
///
/// Users are never physically deleted
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
	pub id:            i32,
	pub email:         String,
	#[serde(skip)]
	pub password_hash: String,
	pub full_name:     String,
	pub is_admin:      bool,
	pub created_at:    NaiveDateTime,
}

impl User {
	/// Get a [`User`] given its id
	#[instrument(skip(conn))]
	pub async fn get(u_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let user = conn
			.interact(move |conn| {
				use self::users::dsl::*;

				users.find(u_id).select(Self::as_select()).get_result(conn)
			})
			.await??;

		Ok(user)
	}

	/// Get a [`User`] given its email, if one exists
	#[instrument(skip(conn))]
	pub async fn get_by_email(
		query_email: String,
		conn: &DbConn,
	) -> Result<Option<Self>, Error> {
		let user = conn
			.interact(|conn| {
				use self::users::dsl::*;

				users
					.filter(email.eq(query_email))
					.select(Self::as_select())
					.first(conn)
					.optional()
			})
			.await??;

		Ok(user)
	}

	/// Verify a plaintext password against this user's stored hash
	pub fn verify_password(&self, password: &str) -> Result<(), Error> {
		let password_hash = PasswordHash::new(&self.password_hash)?;

		Argon2::default()
			.verify_password(password.as_bytes(), &password_hash)?;

		Ok(())
	}

	/// Hash a plaintext password for storage
	pub fn hash_password(password: &str) -> Result<String, Error> {
		let salt = SaltString::generate(&mut OsRng);
		let hash = Argon2::default()
			.hash_password(password.as_bytes(), &salt)?
			.to_string();

		Ok(hash)
	}
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
	pub email:         String,
	pub password_hash: String,
	pub full_name:     String,
}

impl NewUser {
	/// Insert this [`NewUser`]
	#[instrument(skip(conn), fields(email = %self.email))]
	pub async fn insert(self, conn: &DbConn) -> Result<User, Error> {
		let user = conn
			.interact(|conn| {
				use self::users::dsl::*;

				diesel::insert_into(users)
					.values(self)
					.returning(User::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("registered new user {} ({})", user.id, user.email);

		Ok(user)
	}
}

#[derive(AsChangeset, Clone, Debug, Default)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserUpdate {
	pub full_name:     Option<String>,
	pub password_hash: Option<String>,
}

impl UserUpdate {
	/// Apply this update to the [`User`] with the given id
	#[instrument(skip(self, conn))]
	pub async fn apply_to(self, u_id: i32, conn: &DbConn) -> Result<User, Error> {
		let user = conn
			.interact(move |conn| {
				use self::users::dsl::*;

				diesel::update(users.find(u_id))
					.set(self)
					.returning(User::as_returning())
					.get_result(conn)
			})
			.await??;

		Ok(user)
	}
}
