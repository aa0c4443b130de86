use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{BookingStatus, Room};
use crate::schema::{
	bookings,
	hotel_facilities,
	hotel_facility_mappings,
	hotels,
	rooms,
};
use crate::{DbConn, Error};

/// A single hotel
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = hotels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Hotel {
	pub id:          i32,
	pub name:        String,
	pub location:    String,
	pub description: Option<String>,
	pub rating:      f64,
	pub created_at:  NaiveDateTime,
}

/// Search filters for the public hotel search
///
/// Dates are only applied when both ends of the range are present, the
/// controller rejects one-sided ranges before this filter is used
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelFilter {
	pub location:  Option<String>,
	pub check_in:  Option<NaiveDate>,
	pub check_out: Option<NaiveDate>,

	pub guests: Option<i32>,
	pub rooms:  Option<i64>,

	pub price_min_cents: Option<i64>,
	pub price_max_cents: Option<i64>,
	pub min_rating:      Option<f64>,
}

/// A hotel search hit with aggregates over its matching rooms
#[derive(Clone, Debug)]
pub struct HotelSummary {
	pub hotel:               Hotel,
	pub min_price_cents:     i64,
	pub max_price_cents:     i64,
	pub matching_room_types: i64,
	pub facilities:          Vec<String>,
}

impl Hotel {
	/// Get a [`Hotel`] given its id
	#[instrument(skip(conn))]
	pub async fn get(h_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let hotel = conn
			.interact(move |conn| {
				use self::hotels::dsl::*;

				hotels.find(h_id).select(Self::as_select()).get_result(conn)
			})
			.await??;

		Ok(hotel)
	}

	/// Get a list of all [`Hotel`]s ordered by name
	#[instrument(skip(conn))]
	pub async fn get_all(conn: &DbConn) -> Result<Vec<Self>, Error> {
		let all_hotels = conn
			.interact(|conn| {
				use self::hotels::dsl::*;

				hotels.order(name.asc()).select(Self::as_select()).load(conn)
			})
			.await??;

		Ok(all_hotels)
	}

	/// Search through all [`Hotel`]s with a given [`HotelFilter`]
	///
	/// A hotel matches when at least `rooms` (default 1) of its room types
	/// survive every room-level filter. Room types are counted as rows in the
	/// rooms table, not as physical units.
	#[instrument(skip(conn))]
	pub async fn search(
		filter: HotelFilter,
		conn: &DbConn,
	) -> Result<Vec<HotelSummary>, Error> {
		let min_rooms = filter.rooms.unwrap_or(1).max(1);

		let rows: Vec<(Self, Room)> = conn
			.interact(move |conn| {
				let mut query = hotels::table
					.inner_join(rooms::table)
					.select((Self::as_select(), Room::as_select()))
					.into_boxed();

				if let Some(loc) = filter.location {
					query = query
						.filter(hotels::location.ilike(format!("%{loc}%")));
				}

				if let Some(min_rating) = filter.min_rating {
					query = query.filter(hotels::rating.ge(min_rating));
				}

				if let Some(price_min) = filter.price_min_cents {
					query = query.filter(rooms::price_cents.ge(price_min));
				}

				if let Some(price_max) = filter.price_max_cents {
					query = query.filter(rooms::price_cents.le(price_max));
				}

				if let Some(guests) = filter.guests {
					query = query.filter(rooms::capacity.ge(guests));
				}

				if let (Some(check_in), Some(check_out)) =
					(filter.check_in, filter.check_out)
				{
					// A room is taken when any non-cancelled booking overlaps
					// the half-open [check_in, check_out) range
					let overlapping = bookings::table
						.filter(bookings::status.ne(BookingStatus::Cancelled))
						.filter(bookings::check_in.lt(check_out))
						.filter(bookings::check_out.gt(check_in))
						.select(bookings::room_id);

					query = query.filter(rooms::id.ne_all(overlapping));
				}

				query
					.order((hotels::id.asc(), rooms::id.asc()))
					.load(conn)
			})
			.await??;

		let mut grouped: BTreeMap<i32, (Self, Vec<Room>)> = BTreeMap::new();

		for (hotel, room) in rows {
			grouped
				.entry(hotel.id)
				.or_insert_with(|| (hotel, vec![]))
				.1
				.push(room);
		}

		let hits: Vec<(Self, Vec<Room>)> = grouped
			.into_values()
			.filter(|(_, matching)| matching.len() as i64 >= min_rooms)
			.collect();

		let hotel_ids = hits.iter().map(|(h, _)| h.id).collect();
		let mut facilities = Self::facilities_for(hotel_ids, conn).await?;

		let summaries = hits
			.into_iter()
			.map(|(hotel, matching)| {
				let min_price_cents =
					matching.iter().map(|r| r.price_cents).min().unwrap_or(0);
				let max_price_cents =
					matching.iter().map(|r| r.price_cents).max().unwrap_or(0);
				let facilities =
					facilities.remove(&hotel.id).unwrap_or_default();

				HotelSummary {
					hotel,
					min_price_cents,
					max_price_cents,
					matching_room_types: matching.len() as i64,
					facilities,
				}
			})
			.collect();

		Ok(summaries)
	}

	/// Get the facility names for a set of hotels, keyed by hotel id
	#[instrument(skip(conn))]
	pub async fn facilities_for(
		hotel_ids: Vec<i32>,
		conn: &DbConn,
	) -> Result<HashMap<i32, Vec<String>>, Error> {
		let rows: Vec<(i32, String)> = conn
			.interact(move |conn| {
				hotel_facility_mappings::table
					.inner_join(hotel_facilities::table)
					.filter(
						hotel_facility_mappings::hotel_id.eq_any(hotel_ids),
					)
					.select((
						hotel_facility_mappings::hotel_id,
						hotel_facilities::name,
					))
					.load(conn)
			})
			.await??;

		let mut map: HashMap<i32, Vec<String>> = HashMap::new();

		for (h_id, name) in rows {
			map.entry(h_id).or_default().push(name);
		}

		Ok(map)
	}

	/// Delete a [`Hotel`] given its id, cascading to its rooms and facilities
	#[instrument(skip(conn))]
	pub async fn delete_by_id(h_id: i32, conn: &DbConn) -> Result<(), Error> {
		let deleted = conn
			.interact(move |conn| {
				use self::hotels::dsl::*;

				diesel::delete(hotels.find(h_id)).execute(conn)
			})
			.await??;

		if deleted == 0 {
			return Err(Error::NotFound("hotel".to_string()));
		}

		info!("deleted hotel with id {h_id}");

		Ok(())
	}
}

/// Upsert a list of facility names and map them onto a hotel
///
/// Runs inside the caller's transaction
pub(crate) fn attach_hotel_facilities(
	conn: &mut PgConnection,
	h_id: i32,
	names: Vec<String>,
) -> QueryResult<()> {
	for facility_name in names {
		diesel::insert_into(hotel_facilities::table)
			.values(hotel_facilities::name.eq(&facility_name))
			.on_conflict(hotel_facilities::name)
			.do_nothing()
			.execute(conn)?;

		let f_id: i32 = hotel_facilities::table
			.filter(hotel_facilities::name.eq(&facility_name))
			.select(hotel_facilities::id)
			.get_result(conn)?;

		diesel::insert_into(hotel_facility_mappings::table)
			.values((
				hotel_facility_mappings::hotel_id.eq(h_id),
				hotel_facility_mappings::facility_id.eq(f_id),
			))
			.on_conflict_do_nothing()
			.execute(conn)?;
	}

	Ok(())
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = hotels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewHotel {
	pub name:        String,
	pub location:    String,
	pub description: Option<String>,
	pub rating:      Option<f64>,
}

impl NewHotel {
	/// Insert this [`NewHotel`] together with its facility set
	#[instrument(skip(conn))]
	pub async fn insert(
		self,
		facilities: Vec<String>,
		conn: &DbConn,
	) -> Result<Hotel, Error> {
		let hotel = conn
			.interact(move |conn| {
				conn.transaction(|conn| {
					let hotel: Hotel = diesel::insert_into(hotels::table)
						.values(self)
						.returning(Hotel::as_returning())
						.get_result(conn)?;

					attach_hotel_facilities(conn, hotel.id, facilities)?;

					Ok::<_, diesel::result::Error>(hotel)
				})
			})
			.await??;

		info!("created hotel {} ({})", hotel.id, hotel.name);

		Ok(hotel)
	}
}

#[derive(AsChangeset, Clone, Debug, Default, Deserialize, Serialize)]
#[diesel(table_name = hotels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HotelUpdate {
	pub name:        Option<String>,
	pub location:    Option<String>,
	pub description: Option<String>,
	pub rating:      Option<f64>,
}

impl HotelUpdate {
	/// Apply this update to the [`Hotel`] with the given id
	#[instrument(skip(conn))]
	pub async fn apply_to(
		self,
		h_id: i32,
		conn: &DbConn,
	) -> Result<Hotel, Error> {
		let hotel = conn
			.interact(move |conn| {
				use self::hotels::dsl::*;

				diesel::update(hotels.find(h_id))
					.set(self)
					.returning(Hotel::as_returning())
					.get_result(conn)
			})
			.await??;

		Ok(hotel)
	}
}
