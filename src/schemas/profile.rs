use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

use crate::models::User;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
	pub id:         i32,
	pub email:      String,
	pub full_name:  String,
	pub is_admin:   bool,
	pub created_at: NaiveDateTime,
}

impl From<User> for UserResponse {
	fn from(value: User) -> Self {
		Self {
			id:         value.id,
			email:      value.email,
			full_name:  value.full_name,
			is_admin:   value.is_admin,
			created_at: value.created_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
	#[validate(length(
		min = 2,
		max = 100,
		message = "full name must be between 2 and 100 characters long",
		code = "full-name-length"
	))]
	pub full_name: Option<String>,
	#[validate(length(
		min = 8,
		message = "password must be at least 8 characters long",
		code = "password-length"
	))]
	pub password:  Option<String>,
}
