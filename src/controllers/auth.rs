//! Controllers for registration and login

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::models::{NewUser, User};
use crate::schemas::auth::{LoginRequest, RegisterRequest};
use crate::schemas::profile::UserResponse;
use crate::{Config, DbPool, Error, LoginError, RedisConn, Session};

#[instrument(skip_all)]
pub(crate) async fn register_user(
	State(pool): State<DbPool>,
	Json(register_data): Json<RegisterRequest>,
) -> Result<impl IntoResponse, Error> {
	register_data.validate()?;

	// Nothing is written until every field check has passed
	let password_hash = User::hash_password(&register_data.password)?;

	let new_user = NewUser {
		email: register_data.email,
		password_hash,
		full_name: register_data.full_name,
	};

	let conn = pool.get().await?;
	let user = new_user.insert(&conn).await?;

	Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[instrument(skip_all)]
pub(crate) async fn login_user(
	State(pool): State<DbPool>,
	State(mut r_conn): State<RedisConn>,
	State(config): State<Config>,
	jar: PrivateCookieJar,
	Json(login_data): Json<LoginRequest>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let Some(user) = User::get_by_email(login_data.email, &conn).await?
	else {
		return Err(LoginError::InvalidCredentials.into());
	};

	user.verify_password(&login_data.password)?;

	let session =
		Session::create(config.access_token_lifetime, &user, &mut r_conn)
			.await?;

	let access_token_cookie = session.to_access_token_cookie(
		config.access_token_name.clone(),
		config.access_token_lifetime,
		config.production,
	);

	let jar = jar.add(access_token_cookie);

	info!("logged in user {}", user.id);

	Ok((jar, Json(UserResponse::from(user))))
}

#[instrument(skip(config, r_conn, jar))]
pub(crate) async fn logout_user(
	State(config): State<Config>,
	State(mut r_conn): State<RedisConn>,
	jar: PrivateCookieJar,
	session: Session,
) -> Result<(PrivateCookieJar, NoContent), Error> {
	Session::delete(session.id, &mut r_conn).await?;

	let access_token = Cookie::build(config.access_token_name).path("/");
	let jar = jar.remove(access_token);

	info!("logged out user {}", session.data.user_id);

	Ok((jar, NoContent))
}
