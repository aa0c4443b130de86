//! Controllers for the booking and payment flow

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use validator::Validate;

use crate::models::{Booking, BookingFilter, NewBooking};
use crate::schemas::booking::{
	BookingListResponse,
	BookingResponse,
	CreateBookingRequest,
	CreateBookingResponse,
	PaymentConfirmationResponse,
	PaymentRequest,
};
use crate::{DbPool, Error, Session};

#[instrument(skip(pool, request))]
pub(crate) async fn create_booking(
	State(pool): State<DbPool>,
	session: Session,
	Json(request): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let new_booking = NewBooking {
		user_id:           session.data.user_id,
		hotel_id:          request.hotel_id,
		room_id:           request.room_id,
		check_in:          request.check_in,
		check_out:         request.check_out,
		guests:            request.guests,
		total_price_cents: request.total_price_cents,
		special_requests:  request.special_requests,
	};

	let conn = pool.get().await?;
	let booking = new_booking.insert(&conn).await?;

	Ok((StatusCode::CREATED, Json(CreateBookingResponse::from(booking))))
}

#[instrument(skip(pool))]
pub(crate) async fn get_bookings(
	State(pool): State<DbPool>,
	session: Session,
	Query(filter): Query<BookingFilter>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let bookings =
		Booking::get_for_user(session.data.user_id, filter, &conn).await?;

	let bookings: Vec<BookingResponse> =
		bookings.into_iter().map(Into::into).collect();
	let total = bookings.len();

	Ok((StatusCode::OK, Json(BookingListResponse { bookings, total })))
}

#[instrument(skip(pool))]
pub(crate) async fn get_booking(
	State(pool): State<DbPool>,
	session: Session,
	Path(b_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let details =
		Booking::get_for_user_by_id(b_id, session.data.user_id, &conn)
			.await?;

	Ok((StatusCode::OK, Json(BookingResponse::from(details))))
}

#[instrument(skip(pool))]
pub(crate) async fn cancel_booking(
	State(pool): State<DbPool>,
	session: Session,
	Path(b_id): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	Booking::cancel(b_id, session.data, &conn).await?;

	Ok(NoContent)
}

#[instrument(skip(pool, request))]
pub(crate) async fn create_payment(
	State(pool): State<DbPool>,
	session: Session,
	Json(request): Json<PaymentRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let (booking, payment) = Booking::pay(
		request.booking_id,
		session.data.user_id,
		request.payment_method,
		request.amount_cents,
		&conn,
	)
	.await?;

	let response = PaymentConfirmationResponse {
		booking_id:     booking.id,
		status:         booking.status,
		transaction_id: payment.transaction_id.clone(),
		payment:        payment.into(),
	};

	Ok((StatusCode::OK, Json(response)))
}
