use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Hotel, Payment, PaymentStatus, Room, User};
use crate::schema::{bookings, hotels, payments, rooms, users};
use crate::{
	BookingError,
	DbConn,
	Error,
	InternalServerError,
	SessionData,
};

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, Eq, PartialEq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::BookingStatus"]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
	#[default]
	Pending,
	Confirmed,
	Cancelled,
}

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, Eq, PartialEq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::BookingPaymentStatus"]
#[serde(rename_all = "lowercase")]
pub enum BookingPaymentStatus {
	#[default]
	Unpaid,
	Paid,
}

/// A single booking
///
/// The stay covers the half-open range `[check_in, check_out)`, a booking
/// checking out on the day another checks in does not overlap it
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Booking {
	pub id:                i32,
	pub user_id:           i32,
	pub room_id:           i32,
	pub check_in:          NaiveDate,
	pub check_out:         NaiveDate,
	pub guests:            i32,
	pub total_price_cents: i64,
	pub special_requests:  Option<String>,
	pub status:            BookingStatus,
	pub payment_status:    BookingPaymentStatus,
	pub confirmation_code: String,
	pub created_at:        NaiveDateTime,
}

/// A booking joined with its hotel, room, and optional payment
#[derive(Clone, Debug)]
pub struct BookingDetails {
	pub booking: Booking,
	pub room:    Room,
	pub hotel:   Hotel,
	pub payment: Option<Payment>,
}

/// An admin view of a booking, including the guest who made it
#[derive(Clone, Debug)]
pub struct AdminBookingRow {
	pub booking: Booking,
	pub user:    User,
	pub room:    Room,
	pub hotel:   Hotel,
	pub payment: Option<Payment>,
}

/// Temporal filter for a user's own booking list
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingTimeframe {
	Upcoming,
	Past,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
	pub timeframe: Option<BookingTimeframe>,
}

/// Filters for the admin booking overview
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBookingFilter {
	pub status:    Option<BookingStatus>,
	pub date_from: Option<NaiveDate>,
	pub date_to:   Option<NaiveDate>,
	pub hotel_id:  Option<i32>,
}

const CONFIRMATION_CODE_LENGTH: usize = 8;
const CONFIRMATION_CODE_ATTEMPTS: u32 = 8;
const CONFIRMATION_CODE_CHARSET: &[u8] =
	b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a human-facing confirmation code of 8 uppercase alphanumerics
fn generate_confirmation_code<R: Rng>(rng: &mut R) -> String {
	(0..CONFIRMATION_CODE_LENGTH)
		.map(|_| {
			let idx = rng.random_range(0..CONFIRMATION_CODE_CHARSET.len());

			CONFIRMATION_CODE_CHARSET[idx] as char
		})
		.collect()
}

/// Generate a confirmation code that is not in use yet
///
/// The code space is small enough that collisions are possible, so every
/// candidate is checked against the existing codes. The unique index on the
/// column backstops the remaining insert race.
fn generate_unique_code(conn: &mut PgConnection) -> Result<String, Error> {
	let mut rng = rand::rng();

	for _ in 0..CONFIRMATION_CODE_ATTEMPTS {
		let code = generate_confirmation_code(&mut rng);

		let exists: bool = diesel::select(diesel::dsl::exists(
			bookings::table.filter(bookings::confirmation_code.eq(&code)),
		))
		.get_result(conn)?;

		if !exists {
			return Ok(code);
		}
	}

	Err(InternalServerError::ConfirmationCodeExhausted.into())
}

/// The number of nights covered by a half-open stay range
pub(crate) fn stay_nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
	(check_out - check_in).num_days()
}

/// Count the non-cancelled bookings of a room that overlap the half-open
/// candidate range
///
/// Runs inside the caller's transaction so the check is atomic with any
/// insert that depends on it
pub(crate) fn overlapping_bookings(
	conn: &mut PgConnection,
	r_id: i32,
	check_in: NaiveDate,
	check_out: NaiveDate,
) -> QueryResult<i64> {
	bookings::table
		.filter(bookings::room_id.eq(r_id))
		.filter(bookings::status.ne(BookingStatus::Cancelled))
		.filter(bookings::check_in.lt(check_out))
		.filter(bookings::check_out.gt(check_in))
		.count()
		.get_result(conn)
}

impl Booking {
	/// Check whether a room is free for the given half-open range
	///
	/// This is a read-only convenience, booking creation re-evaluates the
	/// same predicate inside its own transaction
	#[instrument(skip(conn))]
	pub async fn room_is_available(
		r_id: i32,
		check_in: NaiveDate,
		check_out: NaiveDate,
		conn: &DbConn,
	) -> Result<bool, Error> {
		let overlapping = conn
			.interact(move |conn| {
				overlapping_bookings(conn, r_id, check_in, check_out)
			})
			.await??;

		Ok(overlapping == 0)
	}

	/// Get all bookings of a user, newest first
	#[instrument(skip(conn))]
	pub async fn get_for_user(
		u_id: i32,
		filter: BookingFilter,
		conn: &DbConn,
	) -> Result<Vec<BookingDetails>, Error> {
		let today = Utc::now().date_naive();

		let rows: Vec<(Self, Room, Hotel, Option<Payment>)> = conn
			.interact(move |conn| {
				let mut query = bookings::table
					.inner_join(rooms::table.inner_join(hotels::table))
					.left_outer_join(payments::table)
					.filter(bookings::user_id.eq(u_id))
					.select((
						Self::as_select(),
						Room::as_select(),
						Hotel::as_select(),
						payments::all_columns.nullable(),
					))
					.into_boxed();

				match filter.timeframe {
					Some(BookingTimeframe::Upcoming) => {
						query = query.filter(bookings::check_in.ge(today));
					},
					Some(BookingTimeframe::Past) => {
						query = query.filter(bookings::check_out.lt(today));
					},
					None => {},
				}

				query.order(bookings::created_at.desc()).load(conn)
			})
			.await??;

		let details = rows.into_iter().map(BookingDetails::from).collect();

		Ok(details)
	}

	/// Get a single booking of a user
	///
	/// Bookings of other users are indistinguishable from absent ones
	#[instrument(skip(conn))]
	pub async fn get_for_user_by_id(
		b_id: i32,
		u_id: i32,
		conn: &DbConn,
	) -> Result<BookingDetails, Error> {
		let row: (Self, Room, Hotel, Option<Payment>) = conn
			.interact(move |conn| {
				bookings::table
					.inner_join(rooms::table.inner_join(hotels::table))
					.left_outer_join(payments::table)
					.filter(bookings::id.eq(b_id))
					.filter(bookings::user_id.eq(u_id))
					.select((
						Self::as_select(),
						Room::as_select(),
						Hotel::as_select(),
						payments::all_columns.nullable(),
					))
					.first(conn)
			})
			.await??;

		Ok(row.into())
	}

	/// Get all bookings matching an [`AdminBookingFilter`], newest first
	#[instrument(skip(conn))]
	pub async fn get_admin(
		filter: AdminBookingFilter,
		conn: &DbConn,
	) -> Result<Vec<AdminBookingRow>, Error> {
		let rows: Vec<(Self, User, Room, Hotel, Option<Payment>)> = conn
			.interact(move |conn| {
				let mut query = bookings::table
					.inner_join(users::table)
					.inner_join(rooms::table.inner_join(hotels::table))
					.left_outer_join(payments::table)
					.select((
						Self::as_select(),
						User::as_select(),
						Room::as_select(),
						Hotel::as_select(),
						payments::all_columns.nullable(),
					))
					.into_boxed();

				if let Some(status) = filter.status {
					query = query.filter(bookings::status.eq(status));
				}

				if let Some(date_from) = filter.date_from {
					query = query.filter(bookings::check_in.ge(date_from));
				}

				if let Some(date_to) = filter.date_to {
					query = query.filter(bookings::check_out.le(date_to));
				}

				if let Some(h_id) = filter.hotel_id {
					query = query.filter(hotels::id.eq(h_id));
				}

				query.order(bookings::created_at.desc()).load(conn)
			})
			.await??;

		let rows = rows
			.into_iter()
			.map(|(booking, user, room, hotel, payment)| {
				AdminBookingRow { booking, user, room, hotel, payment }
			})
			.collect();

		Ok(rows)
	}

	/// Record a payment for a pending booking and confirm it
	///
	/// The payment insert and the status flip are one transaction, a failure
	/// of either rolls back both. The row is locked for the duration so a
	/// double payment is impossible.
	#[instrument(skip(payment_method, conn))]
	pub async fn pay(
		b_id: i32,
		u_id: i32,
		payment_method: String,
		amount_cents: i64,
		conn: &DbConn,
	) -> Result<(Self, Payment), Error> {
		let transaction_id =
			format!("TXN{}", Uuid::new_v4().simple().to_string().to_uppercase());

		let (booking, payment) = conn
			.interact(move |conn| {
				conn.transaction(|conn| {
					let booking: Self = bookings::table
						.filter(bookings::id.eq(b_id))
						.filter(bookings::user_id.eq(u_id))
						.select(Self::as_select())
						.for_update()
						.first(conn)?;

					if booking.status != BookingStatus::Pending {
						return Err(
							BookingError::NotPayable(booking.status).into()
						);
					}

					if amount_cents != booking.total_price_cents {
						return Err(BookingError::AmountMismatch {
							expected_cents: booking.total_price_cents,
						}
						.into());
					}

					let payment: Payment =
						diesel::insert_into(payments::table)
							.values((
								payments::booking_id.eq(b_id),
								payments::amount_cents.eq(amount_cents),
								payments::payment_method.eq(&payment_method),
								payments::transaction_id.eq(&transaction_id),
								payments::status.eq(PaymentStatus::Completed),
							))
							.returning(Payment::as_returning())
							.get_result(conn)?;

					let booking: Self =
						diesel::update(bookings::table.find(b_id))
							.set((
								bookings::status.eq(BookingStatus::Confirmed),
								bookings::payment_status
									.eq(BookingPaymentStatus::Paid),
							))
							.returning(Self::as_returning())
							.get_result(conn)?;

					Ok::<_, Error>((booking, payment))
				})
			})
			.await??;

		info!(
			"confirmed booking {} with payment {} ({})",
			booking.id, payment.id, payment.transaction_id
		);

		Ok((booking, payment))
	}

	/// Cancel a booking from `pending` or `confirmed`
	///
	/// Owners may cancel their own bookings, admins may cancel any. The
	/// status flip immediately frees the room for the cancelled range. A
	/// recorded payment is left untouched.
	#[instrument(skip(conn))]
	pub async fn cancel(
		b_id: i32,
		caller: SessionData,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let booking = conn
			.interact(move |conn| {
				conn.transaction(|conn| {
					let booking: Self = bookings::table
						.filter(bookings::id.eq(b_id))
						.select(Self::as_select())
						.for_update()
						.first(conn)?;

					// Bookings of other users are presented as absent
					if !caller.is_admin && booking.user_id != caller.user_id {
						return Err(diesel::result::Error::NotFound.into());
					}

					if booking.status == BookingStatus::Cancelled {
						return Err(
							BookingError::NotCancellable(booking.status).into()
						);
					}

					let booking: Self =
						diesel::update(bookings::table.find(b_id))
							.set(bookings::status.eq(BookingStatus::Cancelled))
							.returning(Self::as_returning())
							.get_result(conn)?;

					Ok::<_, Error>(booking)
				})
			})
			.await??;

		info!("cancelled booking {}", booking.id);

		Ok(booking)
	}
}

impl From<(Booking, Room, Hotel, Option<Payment>)> for BookingDetails {
	fn from(value: (Booking, Room, Hotel, Option<Payment>)) -> Self {
		let (booking, room, hotel, payment) = value;

		Self { booking, room, hotel, payment }
	}
}

/// A validated booking request, ready to be inserted
#[derive(Clone, Debug)]
pub struct NewBooking {
	pub user_id:           i32,
	pub hotel_id:          i32,
	pub room_id:           i32,
	pub check_in:          NaiveDate,
	pub check_out:         NaiveDate,
	pub guests:            i32,
	pub total_price_cents: i64,
	pub special_requests:  Option<String>,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct InsertableBooking {
	user_id:           i32,
	room_id:           i32,
	check_in:          NaiveDate,
	check_out:         NaiveDate,
	guests:            i32,
	total_price_cents: i64,
	special_requests:  Option<String>,
	confirmation_code: String,
}

impl NewBooking {
	/// Insert this [`NewBooking`] as a pending booking
	///
	/// The availability check and the insert run in a single serializable
	/// transaction, two colliding requests cannot both observe a free room.
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Booking, Error> {
		if self.check_in >= self.check_out {
			return Err(BookingError::InvalidDateRange.into());
		}

		let booking = conn
			.interact(move |conn| {
				conn.build_transaction().serializable().run(|conn| {
					let room: Option<Room> = rooms::table
						.find(self.room_id)
						.select(Room::as_select())
						.first(conn)
						.optional()?;

					// A room id under the wrong hotel is treated as absent
					let room = room
						.filter(|r| r.hotel_id == self.hotel_id)
						.ok_or_else(|| Error::NotFound("room".to_string()))?;

					if self.guests > room.capacity {
						return Err(BookingError::TooManyGuests {
							capacity: room.capacity,
						}
						.into());
					}

					let expected_cents =
						stay_nights(self.check_in, self.check_out)
							* room.price_cents;

					if expected_cents != self.total_price_cents {
						return Err(BookingError::PriceMismatch {
							expected_cents,
						}
						.into());
					}

					let overlapping = overlapping_bookings(
						conn,
						self.room_id,
						self.check_in,
						self.check_out,
					)?;

					if overlapping > 0 {
						return Err(BookingError::RoomUnavailable {
							check_in:  self.check_in,
							check_out: self.check_out,
						}
						.into());
					}

					let confirmation_code = generate_unique_code(conn)?;

					let booking = diesel::insert_into(bookings::table)
						.values(InsertableBooking {
							user_id: self.user_id,
							room_id: self.room_id,
							check_in: self.check_in,
							check_out: self.check_out,
							guests: self.guests,
							total_price_cents: self.total_price_cents,
							special_requests: self.special_requests,
							confirmation_code,
						})
						.returning(Booking::as_returning())
						.get_result(conn)?;

					Ok::<_, Error>(booking)
				})
			})
			.await??;

		info!(
			"created booking {} for room {} ({} -> {})",
			booking.id, booking.room_id, booking.check_in, booking.check_out
		);

		Ok(booking)
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn confirmation_codes_use_the_uppercase_alphanumeric_charset() {
		let mut rng = StdRng::seed_from_u64(7);

		for _ in 0..64 {
			let code = generate_confirmation_code(&mut rng);

			assert_eq!(code.len(), CONFIRMATION_CODE_LENGTH);
			assert!(
				code.chars().all(|c| c.is_ascii_uppercase()
					|| c.is_ascii_digit())
			);
		}
	}

	#[test]
	fn confirmation_codes_vary() {
		let mut rng = StdRng::seed_from_u64(7);

		let a = generate_confirmation_code(&mut rng);
		let b = generate_confirmation_code(&mut rng);

		assert_ne!(a, b);
	}

	#[test]
	fn stay_nights_counts_the_half_open_range() {
		let check_in = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
		let check_out = NaiveDate::from_ymd_opt(2024, 2, 18).unwrap();

		assert_eq!(stay_nights(check_in, check_out), 3);
		assert_eq!(stay_nights(check_in, check_in), 0);
	}
}
