//! Library-wide error types and [`From`] impls

use std::collections::HashMap;
use std::sync::LazyLock;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use diesel::result::DatabaseErrorKind;
use thiserror::Error;

use crate::models::BookingStatus;

/// Top level application error, can be converted into a [`Response`]
#[derive(Debug, Error)]
pub enum Error {
	/// Duplicate resource created
	#[error("{0}")]
	Duplicate(String),
	/// Request/operation forbidden
	#[error("forbidden")]
	Forbidden,
	/// An error that should never happen
	#[error("{0}")]
	Infallible(String),
	/// Opaque internal server error
	#[error("internal server error")]
	InternalServerError,
	/// Resource not found
	#[error("not found - {0}")]
	NotFound(String),
	/// Any error related to logging in
	#[error(transparent)]
	LoginError(#[from] LoginError),
	/// Invalid or missing token
	#[error(transparent)]
	TokenError(#[from] TokenError),
	/// Any error related to the booking lifecycle
	#[error(transparent)]
	BookingError(#[from] BookingError),
	/// Resource could not be validated
	#[error("{0}")]
	ValidationError(String),
}

impl Error {
	/// Return a unique identifying code for this error
	///
	/// When modifying this function the error code should only ever increase,
	/// an error code should never be reused once its assigned to avoid
	/// unexpectedly breaking the frontend
	fn code(&self) -> i32 {
		match self {
			Self::Duplicate(_) => 1,
			Self::Forbidden => 2,
			Self::Infallible(_) => 3,
			Self::InternalServerError => 4,
			Self::NotFound(_) => 5,
			Self::LoginError(LoginError::InvalidCredentials) => 6,
			Self::TokenError(e) => {
				match e {
					TokenError::MissingAccessToken => 7,
					TokenError::MissingSession => 8,
				}
			},
			Self::BookingError(e) => {
				match e {
					BookingError::InvalidDateRange => 9,
					BookingError::RoomUnavailable { .. } => 10,
					BookingError::TooManyGuests { .. } => 11,
					BookingError::PriceMismatch { .. } => 12,
					BookingError::NotPayable(_) => 13,
					BookingError::NotCancellable(_) => 14,
					BookingError::AmountMismatch { .. } => 15,
				}
			},
			Self::ValidationError(_) => 16,
		}
	}

	/// Return additional information about the error
	fn info(&self) -> Option<String> {
		match self {
			Self::Duplicate(m)
			| Self::Infallible(m)
			| Self::NotFound(m)
			| Self::ValidationError(m) => Some(m.to_owned()),
			Self::BookingError(e) => {
				match e {
					BookingError::RoomUnavailable { check_in, check_out } => {
						Some(
							serde_json::json!({
								"checkIn": check_in,
								"checkOut": check_out,
							})
							.to_string(),
						)
					},
					BookingError::TooManyGuests { capacity } => {
						Some(
							serde_json::json!({ "capacity": capacity })
								.to_string(),
						)
					},
					BookingError::PriceMismatch { expected_cents }
					| BookingError::AmountMismatch { expected_cents } => {
						Some(
							serde_json::json!({ "expectedCents": expected_cents })
								.to_string(),
						)
					},
					_ => None,
				}
			},
			_ => None,
		}
	}
}

/// Convert an error into a [`Response`]
impl IntoResponse for Error {
	fn into_response(self) -> Response {
		error!("{self:?}");

		let message = self.to_string();

		let data = serde_json::json!({
			"message": message,
			"code": self.code(),
			"info": self.info(),
		});

		let status = match self {
			Self::Duplicate(_)
			| Self::BookingError(BookingError::RoomUnavailable { .. }) => {
				StatusCode::CONFLICT
			},
			Self::InternalServerError | Self::Infallible(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			},
			Self::LoginError(_) | Self::TokenError(_) => {
				StatusCode::UNAUTHORIZED
			},
			Self::Forbidden => StatusCode::FORBIDDEN,
			Self::NotFound(_) => StatusCode::NOT_FOUND,
			Self::BookingError(_) | Self::ValidationError(_) => {
				StatusCode::BAD_REQUEST
			},
		};

		(status, axum::Json(data)).into_response()
	}
}

/// Any error related to logging in
///
/// A single opaque variant on purpose, an unknown email and a wrong password
/// must be indistinguishable to the caller
#[derive(Debug, Error)]
pub enum LoginError {
	#[error("invalid email or password")]
	InvalidCredentials,
}

/// Any error related to a token
#[derive(Debug, Error)]
pub enum TokenError {
	#[error("missing or invalid access token")]
	MissingAccessToken,
	#[error("missing session")]
	MissingSession,
}

/// Any error related to the booking lifecycle
#[derive(Debug, Error)]
pub enum BookingError {
	/// Check-out must be strictly after check-in, same-day stays are invalid
	#[error("check-out date must be after check-in date")]
	InvalidDateRange,
	/// Another non-cancelled booking overlaps the requested range
	#[error("room is not available for the selected dates")]
	RoomUnavailable { check_in: NaiveDate, check_out: NaiveDate },
	/// The guest count exceeds the room capacity
	#[error("guest count exceeds the room capacity")]
	TooManyGuests { capacity: i32 },
	/// The submitted total does not match the server-side price
	#[error("total price does not match the room rate for this stay")]
	PriceMismatch { expected_cents: i64 },
	/// Payment was attempted on a booking that is not pending
	#[error("booking is not awaiting payment")]
	NotPayable(BookingStatus),
	/// Cancellation was attempted on an already cancelled booking
	#[error("booking is already cancelled")]
	NotCancellable(BookingStatus),
	/// The payment amount does not equal the booking total
	#[error("payment amount does not match the booking total")]
	AmountMismatch { expected_cents: i64 },
}

/// A list of possible internal errors
///
/// API end users should never see these details
#[derive(Debug, Error)]
pub enum InternalServerError {
	/// Unknown database constraint violation
	#[error("constraint error -- {0:?}")]
	ConstraintError(String),
	/// Error executing some database operation
	#[error("database error -- {0:?}")]
	DatabaseError(diesel::result::Error),
	/// Error interacting with a database connection
	#[error("database interaction error -- {0:?}")]
	DatabaseInteractionError(deadpool_diesel::InteractError),
	/// Error hashing some value
	#[error("hash error -- {0:?}")]
	HashError(argon2::password_hash::Error),
	/// Error acquiring database pool connection
	#[error("database pool error -- {0:?}")]
	PoolError(deadpool_diesel::PoolError),
	/// Error executing some redis operation
	#[error("redis error -- {0:?}")]
	RedisError(redis::RedisError),
	/// Error related to `serde_json`
	#[error("serde_json error -- {0:?}")]
	SerdeJsonError(serde_json::Error),
	/// Attempted to extract a session from a request that has not been
	/// authorized
	#[error("attempted to extract session without checking authorization")]
	SessionWithoutAuthError,
	/// Ran out of attempts while generating a unique confirmation code
	#[error("confirmation code generation exhausted its retry budget")]
	ConfirmationCodeExhausted,
}

// Map internal server errors to application errors
impl From<InternalServerError> for Error {
	fn from(value: InternalServerError) -> Self {
		error!("internal server error -- {value}");

		Self::InternalServerError
	}
}

/// Map validation errors to application errors
impl From<validator::ValidationErrors> for Error {
	fn from(err: validator::ValidationErrors) -> Self {
		let errs = err.field_errors();
		let repr = errs
			.values()
			.map(|v| {
				v.iter()
					.map(ToString::to_string)
					.collect::<Vec<String>>()
					.join("\n")
			})
			.collect::<Vec<String>>()
			.join("\n");

		Self::ValidationError(repr)
	}
}

/// Map password hashing errors to application errors
impl From<argon2::password_hash::Error> for Error {
	fn from(err: argon2::password_hash::Error) -> Self {
		match err {
			argon2::password_hash::Error::Password => {
				LoginError::InvalidCredentials.into()
			},
			_ => InternalServerError::HashError(err).into(),
		}
	}
}

/// Map database interaction errors to application errors
impl From<deadpool_diesel::InteractError> for Error {
	fn from(value: deadpool_diesel::InteractError) -> Self {
		InternalServerError::DatabaseInteractionError(value).into()
	}
}

/// Map of constraint names to column names.
static CONSTRAINT_TO_COLUMN: LazyLock<HashMap<&str, &str>> =
	LazyLock::new(|| {
		HashMap::from([
			("users_email_key", "email"),
			("bookings_confirmation_code_key", "confirmation_code"),
			("payments_transaction_id_key", "transaction_id"),
			("reviews_user_id_hotel_id_key", "review"),
		])
	});

/// Map database result errors to application errors.
impl From<diesel::result::Error> for Error {
	fn from(err: diesel::result::Error) -> Self {
		match &err {
			// No rows returned by query that expected at least one
			diesel::result::Error::NotFound => {
				Self::NotFound("no context provided".to_string())
			},
			// Unique constraint violation
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::UniqueViolation,
				info,
			) => {
				let constraint_name = info.constraint_name().unwrap();

				match CONSTRAINT_TO_COLUMN.get(constraint_name) {
					Some(field) => {
						Self::Duplicate(format!("{field} is already in use"))
					},
					None => {
						InternalServerError::ConstraintError(
							constraint_name.to_string(),
						)
						.into()
					},
				}
			},
			// Foreign key constraint violation
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::ForeignKeyViolation,
				info,
			) => Error::ValidationError(info.message().to_string()),
			_ => InternalServerError::DatabaseError(err).into(),
		}
	}
}

impl From<deadpool_diesel::PoolError> for Error {
	fn from(value: deadpool_diesel::PoolError) -> Self {
		InternalServerError::PoolError(value).into()
	}
}

impl From<redis::RedisError> for Error {
	fn from(err: redis::RedisError) -> Self {
		InternalServerError::RedisError(err).into()
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		InternalServerError::SerdeJsonError(err).into()
	}
}
