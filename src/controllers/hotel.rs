//! Controllers for the public hotel catalogue

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use validator::Validate;

use crate::models::{Hotel, HotelFilter, NewReview, Review, Room};
use crate::schemas::hotel::{
	CreateReviewRequest,
	HotelDetailResponse,
	HotelSummaryResponse,
	ReviewResponse,
	RoomResponse,
	SearchResponse,
};
use crate::{BookingError, DbPool, Error, Session};

#[instrument(skip(pool))]
pub(crate) async fn search_hotels(
	State(pool): State<DbPool>,
	Query(filter): Query<HotelFilter>,
) -> Result<impl IntoResponse, Error> {
	match (filter.check_in, filter.check_out) {
		(Some(_), None) | (None, Some(_)) => {
			return Err(Error::ValidationError(
				"check-in and check-out must be provided together"
					.to_string(),
			));
		},
		(Some(check_in), Some(check_out)) if check_in >= check_out => {
			return Err(BookingError::InvalidDateRange.into());
		},
		_ => {},
	}

	let conn = pool.get().await?;

	let summaries = Hotel::search(filter, &conn).await?;

	let hotels: Vec<HotelSummaryResponse> =
		summaries.into_iter().map(Into::into).collect();
	let total = hotels.len();

	Ok((StatusCode::OK, Json(SearchResponse { hotels, total })))
}

#[instrument(skip(pool))]
pub(crate) async fn get_hotel(
	State(pool): State<DbPool>,
	Path(h_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let hotel = Hotel::get(h_id, &conn).await?;

	let rooms = Room::for_hotel(h_id, &conn).await?;
	let room_ids = rooms.iter().map(|r| r.id).collect();
	let mut room_facilities = Room::facilities_for(room_ids, &conn).await?;

	let rooms: Vec<RoomResponse> = rooms
		.into_iter()
		.map(|room| {
			let facilities =
				room_facilities.remove(&room.id).unwrap_or_default();

			RoomResponse::new(room, facilities)
		})
		.collect();

	let facilities = Hotel::facilities_for(vec![h_id], &conn)
		.await?
		.remove(&h_id)
		.unwrap_or_default();

	let stats = Review::stats_for_hotel(h_id, &conn).await?;
	let reviews: Vec<ReviewResponse> = Review::recent_for_hotel(h_id, &conn)
		.await?
		.into_iter()
		.map(Into::into)
		.collect();

	let response =
		HotelDetailResponse::new(hotel, stats, facilities, rooms, reviews);

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool, request))]
pub(crate) async fn create_review(
	State(pool): State<DbPool>,
	session: Session,
	Path(h_id): Path<i32>,
	Json(request): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	// 404 before any write when the hotel is absent
	Hotel::get(h_id, &conn).await?;

	let new_review = NewReview {
		user_id:  session.data.user_id,
		hotel_id: h_id,
		rating:   request.rating,
		body:     request.body,
	};

	let review = new_review.insert(&conn).await?;

	Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}
