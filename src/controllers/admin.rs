//! Controllers for the admin back office

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, NoContent};
use chrono::{Days, NaiveDate, Utc};
use validator::Validate;

use crate::models::{
	AdminBookingFilter,
	Booking,
	BookingReport,
	Hotel,
	HotelUpdate,
	NewHotel,
	NewRoom,
	ReportGroupBy,
	Room,
	RoomUpdate,
};
use crate::schemas::booking::{AdminBookingListResponse, AdminBookingResponse};
use crate::schemas::hotel::{
	CreateHotelRequest,
	CreateRoomRequest,
	HotelResponse,
	RoomResponse,
	UpdateHotelRequest,
	UpdateRoomRequest,
};
use crate::schemas::report::{ReportQuery, ReportResponse};
use crate::{AdminSession, DbPool, Error};

/// The default report window when no dates are given
const DEFAULT_REPORT_WINDOW_DAYS: u64 = 30;

#[instrument(skip(pool))]
pub(crate) async fn get_all_hotels(
	State(pool): State<DbPool>,
	session: AdminSession,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let hotels = Hotel::get_all(&conn).await?;
	let response: Vec<HotelResponse> =
		hotels.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool, request))]
pub(crate) async fn create_hotel(
	State(pool): State<DbPool>,
	session: AdminSession,
	Json(request): Json<CreateHotelRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let new_hotel = NewHotel {
		name:        request.name,
		location:    request.location,
		description: request.description,
		rating:      request.rating,
	};

	let conn = pool.get().await?;
	let hotel = new_hotel.insert(request.facilities, &conn).await?;

	Ok((StatusCode::CREATED, Json(HotelResponse::from(hotel))))
}

#[instrument(skip(pool, request))]
pub(crate) async fn update_hotel(
	State(pool): State<DbPool>,
	session: AdminSession,
	Path(h_id): Path<i32>,
	Json(request): Json<UpdateHotelRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let update = HotelUpdate {
		name:        request.name,
		location:    request.location,
		description: request.description,
		rating:      request.rating,
	};

	let hotel = if update.name.is_none()
		&& update.location.is_none()
		&& update.description.is_none()
		&& update.rating.is_none()
	{
		Hotel::get(h_id, &conn).await?
	} else {
		update.apply_to(h_id, &conn).await?
	};

	Ok((StatusCode::OK, Json(HotelResponse::from(hotel))))
}

#[instrument(skip(pool))]
pub(crate) async fn delete_hotel(
	State(pool): State<DbPool>,
	session: AdminSession,
	Path(h_id): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	Hotel::delete_by_id(h_id, &conn).await?;

	Ok(NoContent)
}

#[instrument(skip(pool, request))]
pub(crate) async fn create_room(
	State(pool): State<DbPool>,
	session: AdminSession,
	Path(h_id): Path<i32>,
	Json(request): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	// 404 before any write when the hotel is absent
	Hotel::get(h_id, &conn).await?;

	let new_room = NewRoom {
		hotel_id:    h_id,
		room_type:   request.room_type,
		price_cents: request.price_cents,
		capacity:    request.capacity,
		quantity:    request.quantity,
	};

	let facilities = request.facilities.clone();
	let room = new_room.insert(request.facilities, &conn).await?;

	Ok((StatusCode::CREATED, Json(RoomResponse::new(room, facilities))))
}

#[instrument(skip(pool, request))]
pub(crate) async fn update_room(
	State(pool): State<DbPool>,
	session: AdminSession,
	Path(r_id): Path<i32>,
	Json(request): Json<UpdateRoomRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let update = RoomUpdate {
		room_type:   request.room_type,
		price_cents: request.price_cents,
		capacity:    request.capacity,
		quantity:    request.quantity,
	};

	let room = if update.room_type.is_none()
		&& update.price_cents.is_none()
		&& update.capacity.is_none()
		&& update.quantity.is_none()
	{
		Room::get(r_id, &conn).await?
	} else {
		update.apply_to(r_id, &conn).await?
	};

	let facilities = Room::facilities_for(vec![r_id], &conn)
		.await?
		.remove(&r_id)
		.unwrap_or_default();

	Ok((StatusCode::OK, Json(RoomResponse::new(room, facilities))))
}

#[instrument(skip(pool))]
pub(crate) async fn delete_room(
	State(pool): State<DbPool>,
	session: AdminSession,
	Path(r_id): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	Room::delete_by_id(r_id, &conn).await?;

	Ok(NoContent)
}

#[instrument(skip(pool))]
pub(crate) async fn get_all_bookings(
	State(pool): State<DbPool>,
	session: AdminSession,
	Query(filter): Query<AdminBookingFilter>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let rows = Booking::get_admin(filter, &conn).await?;

	let bookings: Vec<AdminBookingResponse> =
		rows.into_iter().map(Into::into).collect();
	let total = bookings.len();

	Ok((StatusCode::OK, Json(AdminBookingListResponse { bookings, total })))
}

/// Fill in the report defaults: the last 30 days, bucketed by day
fn resolve_report_window(
	query: ReportQuery,
) -> Result<(NaiveDate, NaiveDate, ReportGroupBy), Error> {
	let today = Utc::now().date_naive();

	let date_to = query.date_to.unwrap_or(today);
	let date_from = query.date_from.unwrap_or_else(|| {
		date_to
			.checked_sub_days(Days::new(DEFAULT_REPORT_WINDOW_DAYS))
			.unwrap_or(date_to)
	});

	if date_from > date_to {
		return Err(Error::ValidationError(
			"the report window is inverted".to_string(),
		));
	}

	Ok((date_from, date_to, query.group_by.unwrap_or_default()))
}

#[instrument(skip(pool))]
pub(crate) async fn get_report(
	State(pool): State<DbPool>,
	session: AdminSession,
	Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, Error> {
	let (date_from, date_to, group_by) = resolve_report_window(query)?;

	let conn = pool.get().await?;

	let report =
		BookingReport::generate(date_from, date_to, group_by, &conn).await?;

	Ok((StatusCode::OK, Json(ReportResponse::from(report))))
}

#[instrument(skip(pool))]
pub(crate) async fn export_report(
	State(pool): State<DbPool>,
	session: AdminSession,
	Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, Error> {
	let (date_from, date_to, group_by) = resolve_report_window(query)?;

	let conn = pool.get().await?;

	let report =
		BookingReport::generate(date_from, date_to, group_by, &conn).await?;

	let headers = [
		(header::CONTENT_TYPE, "text/csv"),
		(
			header::CONTENT_DISPOSITION,
			"attachment; filename=\"booking_report.csv\"",
		),
	];

	Ok((StatusCode::OK, headers, report.to_csv()))
}
