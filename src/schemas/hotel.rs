use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

use crate::models::{Hotel, HotelSummary, Review, ReviewStats, Room};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelResponse {
	pub id:          i32,
	pub name:        String,
	pub location:    String,
	pub description: Option<String>,
	pub rating:      f64,
	pub created_at:  NaiveDateTime,
}

impl From<Hotel> for HotelResponse {
	fn from(value: Hotel) -> Self {
		Self {
			id:          value.id,
			name:        value.name,
			location:    value.location,
			description: value.description,
			rating:      value.rating,
			created_at:  value.created_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSummaryResponse {
	pub id:                   i32,
	pub name:                 String,
	pub location:             String,
	pub description:          Option<String>,
	pub rating:               f64,
	pub min_price_cents:      i64,
	pub max_price_cents:      i64,
	pub available_room_types: i64,
	pub facilities:           Vec<String>,
}

impl From<HotelSummary> for HotelSummaryResponse {
	fn from(value: HotelSummary) -> Self {
		Self {
			id:                   value.hotel.id,
			name:                 value.hotel.name,
			location:             value.hotel.location,
			description:          value.hotel.description,
			rating:               value.hotel.rating,
			min_price_cents:      value.min_price_cents,
			max_price_cents:      value.max_price_cents,
			available_room_types: value.matching_room_types,
			facilities:           value.facilities,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	pub hotels: Vec<HotelSummaryResponse>,
	pub total:  usize,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
	pub id:          i32,
	pub room_type:   String,
	pub price_cents: i64,
	pub capacity:    i32,
	pub quantity:    i32,
	pub facilities:  Vec<String>,
}

impl RoomResponse {
	#[must_use]
	pub fn new(room: Room, facilities: Vec<String>) -> Self {
		Self {
			id: room.id,
			room_type: room.room_type,
			price_cents: room.price_cents,
			capacity: room.capacity,
			quantity: room.quantity,
			facilities,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
	pub id:         i32,
	pub rating:     i32,
	pub body:       Option<String>,
	pub user_name:  String,
	pub created_at: NaiveDateTime,
}

impl From<Review> for ReviewResponse {
	fn from(value: Review) -> Self {
		Self {
			id:         value.review.id,
			rating:     value.review.rating,
			body:       value.review.body,
			user_name:  value.author.full_name,
			created_at: value.review.created_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDetailResponse {
	pub id:             i32,
	pub name:           String,
	pub location:       String,
	pub description:    Option<String>,
	pub rating:         f64,
	pub review_count:   i64,
	pub average_rating: Option<f64>,
	pub facilities:     Vec<String>,
	pub rooms:          Vec<RoomResponse>,
	pub reviews:        Vec<ReviewResponse>,
}

impl HotelDetailResponse {
	#[must_use]
	pub fn new(
		hotel: Hotel,
		stats: ReviewStats,
		facilities: Vec<String>,
		rooms: Vec<RoomResponse>,
		reviews: Vec<ReviewResponse>,
	) -> Self {
		Self {
			id: hotel.id,
			name: hotel.name,
			location: hotel.location,
			description: hotel.description,
			rating: hotel.rating,
			review_count: stats.review_count,
			average_rating: stats.average_rating,
			facilities,
			rooms,
			reviews,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHotelRequest {
	#[validate(length(
		min = 1,
		max = 200,
		message = "name must be between 1 and 200 characters long",
		code = "name-length"
	))]
	pub name:        String,
	#[validate(length(
		min = 1,
		max = 200,
		message = "location must be between 1 and 200 characters long",
		code = "location-length"
	))]
	pub location:    String,
	pub description: Option<String>,
	#[validate(range(
		min = 0.0,
		max = 5.0,
		message = "rating must be between 0 and 5",
		code = "rating-range"
	))]
	pub rating:      Option<f64>,
	#[serde(default)]
	pub facilities:  Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHotelRequest {
	#[validate(length(min = 1, max = 200, code = "name-length"))]
	pub name:        Option<String>,
	#[validate(length(min = 1, max = 200, code = "location-length"))]
	pub location:    Option<String>,
	pub description: Option<String>,
	#[validate(range(min = 0.0, max = 5.0, code = "rating-range"))]
	pub rating:      Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
	#[validate(length(
		min = 1,
		max = 100,
		message = "room type must be between 1 and 100 characters long",
		code = "room-type-length"
	))]
	pub room_type:   String,
	#[validate(range(min = 0, message = "price cannot be negative"))]
	pub price_cents: i64,
	#[validate(range(min = 1, message = "capacity must be at least 1"))]
	pub capacity:    i32,
	#[validate(range(min = 1, message = "quantity must be at least 1"))]
	#[serde(default = "default_quantity")]
	pub quantity:    i32,
	#[serde(default)]
	pub facilities:  Vec<String>,
}

const fn default_quantity() -> i32 { 1 }

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
	#[validate(length(min = 1, max = 100, code = "room-type-length"))]
	pub room_type:   Option<String>,
	#[validate(range(min = 0))]
	pub price_cents: Option<i64>,
	#[validate(range(min = 1))]
	pub capacity:    Option<i32>,
	#[validate(range(min = 1))]
	pub quantity:    Option<i32>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
	#[validate(range(
		min = 1,
		max = 5,
		message = "rating must be between 1 and 5",
		code = "rating-range"
	))]
	pub rating: i32,
	pub body:   Option<String>,
}

#[cfg(test)]
mod tests {
	use validator::Validate;

	use super::*;

	#[test]
	fn review_ratings_outside_one_to_five_are_rejected() {
		let ok = CreateReviewRequest { rating: 4, body: None };
		let low = CreateReviewRequest { rating: 0, body: None };
		let high = CreateReviewRequest { rating: 6, body: None };

		assert!(ok.validate().is_ok());
		assert!(low.validate().is_err());
		assert!(high.validate().is_err());
	}
}
