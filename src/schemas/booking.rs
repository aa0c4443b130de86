use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

use crate::models::{
	AdminBookingRow,
	Booking,
	BookingDetails,
	BookingPaymentStatus,
	BookingStatus,
	Payment,
	PaymentStatus,
};

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
	pub hotel_id:          i32,
	pub room_id:           i32,
	pub check_in:          NaiveDate,
	pub check_out:         NaiveDate,
	#[validate(range(min = 1, message = "at least one guest is required"))]
	pub guests:            i32,
	#[validate(range(min = 0, message = "total price cannot be negative"))]
	pub total_price_cents: i64,
	pub special_requests:  Option<String>,
}

/// The acknowledgement returned when a booking is created
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
	pub booking_id:             i32,
	pub confirmation_code:      String,
	pub status:                 BookingStatus,
	pub payment_required_cents: i64,
}

impl From<Booking> for CreateBookingResponse {
	fn from(value: Booking) -> Self {
		Self {
			booking_id:             value.id,
			confirmation_code:      value.confirmation_code,
			status:                 value.status,
			payment_required_cents: value.total_price_cents,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
	pub id:                i32,
	pub hotel_name:        String,
	pub hotel_location:    String,
	pub room_type:         String,
	pub check_in:          NaiveDate,
	pub check_out:         NaiveDate,
	pub guests:            i32,
	pub total_price_cents: i64,
	pub special_requests:  Option<String>,
	pub status:            BookingStatus,
	pub payment_status:    BookingPaymentStatus,
	pub confirmation_code: String,
	pub created_at:        NaiveDateTime,
	pub payment:           Option<PaymentResponse>,
}

impl From<BookingDetails> for BookingResponse {
	fn from(value: BookingDetails) -> Self {
		let BookingDetails { booking, room, hotel, payment } = value;

		Self {
			id:                booking.id,
			hotel_name:        hotel.name,
			hotel_location:    hotel.location,
			room_type:         room.room_type,
			check_in:          booking.check_in,
			check_out:         booking.check_out,
			guests:            booking.guests,
			total_price_cents: booking.total_price_cents,
			special_requests:  booking.special_requests,
			status:            booking.status,
			payment_status:    booking.payment_status,
			confirmation_code: booking.confirmation_code,
			created_at:        booking.created_at,
			payment:           payment.map(Into::into),
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListResponse {
	pub bookings: Vec<BookingResponse>,
	pub total:    usize,
}

/// The admin view of a booking, including the guest who made it
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBookingResponse {
	pub id:                i32,
	pub user_name:         String,
	pub user_email:        String,
	pub hotel_name:        String,
	pub room_type:         String,
	pub check_in:          NaiveDate,
	pub check_out:         NaiveDate,
	pub guests:            i32,
	pub total_price_cents: i64,
	pub status:            BookingStatus,
	pub payment_status:    BookingPaymentStatus,
	pub confirmation_code: String,
	pub created_at:        NaiveDateTime,
	pub payment:           Option<PaymentResponse>,
}

impl From<AdminBookingRow> for AdminBookingResponse {
	fn from(value: AdminBookingRow) -> Self {
		let AdminBookingRow { booking, user, room, hotel, payment } = value;

		Self {
			id:                booking.id,
			user_name:         user.full_name,
			user_email:        user.email,
			hotel_name:        hotel.name,
			room_type:         room.room_type,
			check_in:          booking.check_in,
			check_out:         booking.check_out,
			guests:            booking.guests,
			total_price_cents: booking.total_price_cents,
			status:            booking.status,
			payment_status:    booking.payment_status,
			confirmation_code: booking.confirmation_code,
			created_at:        booking.created_at,
			payment:           payment.map(Into::into),
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBookingListResponse {
	pub bookings: Vec<AdminBookingResponse>,
	pub total:    usize,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
	pub booking_id:      i32,
	#[validate(length(
		min = 1,
		max = 50,
		message = "payment method must be between 1 and 50 characters long",
		code = "payment-method-length"
	))]
	pub payment_method:  String,
	#[validate(range(min = 0, message = "amount cannot be negative"))]
	pub amount_cents:    i64,
	/// Opaque gateway payload, accepted but never stored
	pub payment_details: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
	pub transaction_id: String,
	pub amount_cents:   i64,
	pub payment_method: String,
	pub status:         PaymentStatus,
	pub created_at:     NaiveDateTime,
}

impl From<Payment> for PaymentResponse {
	fn from(value: Payment) -> Self {
		Self {
			transaction_id: value.transaction_id,
			amount_cents:   value.amount_cents,
			payment_method: value.payment_method,
			status:         value.status,
			created_at:     value.created_at,
		}
	}
}

/// The acknowledgement returned when a payment confirms a booking
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmationResponse {
	pub booking_id:     i32,
	pub status:         BookingStatus,
	pub transaction_id: String,
	pub payment:        PaymentResponse,
}
