use serde::{Deserialize, Serialize};
use validator_derive::Validate;

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
	#[validate(length(
		min = 2,
		max = 100,
		message = "full name must be between 2 and 100 characters long",
		code = "full-name-length"
	))]
	pub full_name:        String,
	#[validate(email(message = "invalid email", code = "email"))]
	pub email:            String,
	#[validate(length(
		min = 8,
		message = "password must be at least 8 characters long",
		code = "password-length"
	))]
	pub password:         String,
	#[validate(must_match(
		other = "password",
		message = "passwords do not match",
		code = "password-match"
	))]
	pub confirm_password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
	pub email:    String,
	pub password: String,
}
