//! Controllers for the logged-in user's own profile

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use validator::Validate;

use crate::models::{User, UserUpdate};
use crate::schemas::profile::{UpdateProfileRequest, UserResponse};
use crate::{DbPool, Error, Session};

#[instrument(skip(pool))]
pub(crate) async fn get_current_profile(
	State(pool): State<DbPool>,
	session: Session,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let user = User::get(session.data.user_id, &conn).await?;

	Ok((StatusCode::OK, Json(UserResponse::from(user))))
}

#[instrument(skip_all)]
pub(crate) async fn update_current_profile(
	State(pool): State<DbPool>,
	session: Session,
	Json(update): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, Error> {
	update.validate()?;

	let conn = pool.get().await?;

	if update.full_name.is_none() && update.password.is_none() {
		let user = User::get(session.data.user_id, &conn).await?;

		return Ok((StatusCode::OK, Json(UserResponse::from(user))));
	}

	let password_hash = match update.password {
		Some(password) => Some(User::hash_password(&password)?),
		None => None,
	};

	let user_update =
		UserUpdate { full_name: update.full_name, password_hash };

	let user = user_update.apply_to(session.data.user_id, &conn).await?;

	info!("updated profile of user {}", user.id);

	Ok((StatusCode::OK, Json(UserResponse::from(user))))
}
