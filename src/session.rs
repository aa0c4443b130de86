//! User sessions and tokens
//!
//! A session is an opaque random token handed out at login and stored in
//! the cache next to the caller context it stands for. Handlers pick the
//! access level they need through the type parameter:
//!
//! ```rs
//! pub async fn user_route(session: Session) -> impl IntoResponse { ... }
//! pub async fn admin_route(session: AdminSession) -> impl IntoResponse { ... }
//! ```

use std::fmt;
use std::marker::PhantomData;

use axum::RequestPartsExt;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, SameSite};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use time::Duration;
use uuid::Uuid;

use crate::models::User;
use crate::{AppState, Error, InternalServerError, RedisConn};

/// Opaque identifier of a stored session
///
/// Random rather than derived from the user id, so the token is not
/// guessable and one user can hold independent sessions on several devices
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SessionId(Uuid);

impl SessionId {
	fn generate() -> Self { Self(Uuid::new_v4()) }

	/// Parse a session id from an access token cookie value
	#[must_use]
	pub fn parse(value: &str) -> Option<Self> {
		Uuid::parse_str(value).ok().map(Self)
	}

	fn cache_key(self) -> String { format!("session:{}", self.0.simple()) }
}

impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.simple())
	}
}

/// The caller context stored for every session
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct SessionData {
	pub user_id:  i32,
	pub is_admin: bool,
}

/// The access level a handler demands from its session argument
pub trait AccessLevel {
	/// Reject callers whose context does not clear this level
	fn authorize(data: SessionData) -> Result<(), Error>;
}

/// Any logged-in user
#[derive(Clone, Copy, Debug)]
pub struct AnyUser;

/// Only users carrying the admin flag
#[derive(Clone, Copy, Debug)]
pub struct AdminOnly;

impl AccessLevel for AnyUser {
	fn authorize(_: SessionData) -> Result<(), Error> { Ok(()) }
}

impl AccessLevel for AdminOnly {
	fn authorize(data: SessionData) -> Result<(), Error> {
		if data.is_admin { Ok(()) } else { Err(Error::Forbidden) }
	}
}

/// A live session, parameterized over the access level it has cleared
#[derive(Clone, Copy, Debug)]
pub struct Session<L: AccessLevel = AnyUser> {
	pub id:   SessionId,
	pub data: SessionData,

	level: PhantomData<L>,
}

/// A [`Session`] that only admits admin users
pub type AdminSession = Session<AdminOnly>;

impl<L: AccessLevel> FromRequestParts<AppState> for Session<L> {
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		// The auth middleware leaves the verified id behind as an extension
		let Some(&id) = parts.extensions.get::<SessionId>() else {
			return Err(InternalServerError::SessionWithoutAuthError.into());
		};

		let State(mut conn) = parts
			.extract_with_state::<State<RedisConn>, AppState>(state)
			.await
			.map_err(|_| Error::InternalServerError)?;

		let Some(data) = fetch_data(id, &mut conn).await? else {
			return Err(Error::Infallible(
				"failed to retrieve session despite passing auth middleware"
					.to_string(),
			));
		};

		L::authorize(data)?;

		Ok(Self { id, data, level: PhantomData })
	}
}

/// Load the stored caller context of a session, if it is still alive
async fn fetch_data(
	id: SessionId,
	conn: &mut RedisConn,
) -> Result<Option<SessionData>, Error> {
	let stored: Option<String> = conn.get(id.cache_key()).await?;

	stored
		.map(|data| {
			serde_json::from_str(&data)
				.map_err(|e| InternalServerError::SerdeJsonError(e).into())
		})
		.transpose()
}

impl Session {
	/// Open a fresh [`Session`] for a user who just proved their identity
	///
	/// The cache entry outlives the cookie by a few seconds so the cookie
	/// never refers to an already-expired session
	#[instrument(skip(user, conn), fields(user_id = user.id))]
	pub async fn create(
		lifetime: Duration,
		user: &User,
		conn: &mut RedisConn,
	) -> Result<Self, Error> {
		let id = SessionId::generate();
		let data = SessionData { user_id: user.id, is_admin: user.is_admin };

		let stored = serde_json::to_string(&data)
			.map_err(InternalServerError::SerdeJsonError)?;
		let expiry = (lifetime.whole_seconds() + 10).unsigned_abs();

		let _: () = conn.set_ex(id.cache_key(), stored, expiry).await?;

		debug!("stored session {id} for user {}", user.id);

		Ok(Self { id, data, level: PhantomData })
	}

	/// Check whether a session with this id is still alive
	#[instrument(skip(conn))]
	pub async fn exists(
		id: SessionId,
		conn: &mut RedisConn,
	) -> Result<bool, Error> {
		let exists: bool = conn.exists(id.cache_key()).await?;

		Ok(exists)
	}

	/// Drop a session, logging out the device that holds its cookie
	#[instrument(skip(conn))]
	pub async fn delete(
		id: SessionId,
		conn: &mut RedisConn,
	) -> Result<(), Error> {
		let _: i32 = conn.del(id.cache_key()).await?;

		Ok(())
	}

	/// Convert this [`Session`] into an access token cookie
	#[must_use]
	pub fn to_access_token_cookie(
		self,
		name: String,
		lifetime: Duration,
		secure: bool,
	) -> Cookie<'static> {
		Cookie::build((name, self.id.to_string()))
			.http_only(true)
			.max_age(lifetime)
			.path("/")
			.same_site(SameSite::Lax)
			.secure(secure)
			.into()
	}
}
