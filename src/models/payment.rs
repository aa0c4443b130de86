use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use crate::schema::payments;
use crate::{DbConn, Error};

#[derive(
	Clone, Copy, DbEnum, Debug, Deserialize, Eq, PartialEq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::PaymentStatus"]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
	Pending,
	Completed,
	Failed,
}

/// A payment record for a booking
///
/// Immutable once completed, cancellation never touches it
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Payment {
	pub id:             i32,
	pub booking_id:     i32,
	pub amount_cents:   i64,
	pub payment_method: String,
	pub transaction_id: String,
	pub status:         PaymentStatus,
	pub created_at:     NaiveDateTime,
}

impl Payment {
	/// Get the [`Payment`] for a booking, if one was recorded
	#[instrument(skip(conn))]
	pub async fn for_booking(
		b_id: i32,
		conn: &DbConn,
	) -> Result<Option<Self>, Error> {
		let payment = conn
			.interact(move |conn| {
				use self::payments::dsl::*;

				payments
					.filter(booking_id.eq(b_id))
					.select(Self::as_select())
					.first(conn)
					.optional()
			})
			.await??;

		Ok(payment)
	}
}
