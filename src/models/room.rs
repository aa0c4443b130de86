use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{room_facilities, room_facility_mappings, rooms};
use crate::{DbConn, Error};

/// A bookable room type within a hotel
///
/// `quantity` describes the physical inventory of this type, the
/// availability check deliberately does not consult it (see DESIGN.md)
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Room {
	pub id:          i32,
	pub hotel_id:    i32,
	pub room_type:   String,
	pub price_cents: i64,
	pub capacity:    i32,
	pub quantity:    i32,
	pub created_at:  NaiveDateTime,
}

impl Room {
	/// Get a [`Room`] given its id
	#[instrument(skip(conn))]
	pub async fn get(r_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let room = conn
			.interact(move |conn| {
				use self::rooms::dsl::*;

				rooms.find(r_id).select(Self::as_select()).get_result(conn)
			})
			.await??;

		Ok(room)
	}

	/// Get all [`Room`]s of a hotel
	#[instrument(skip(conn))]
	pub async fn for_hotel(
		h_id: i32,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let hotel_rooms = conn
			.interact(move |conn| {
				use self::rooms::dsl::*;

				rooms
					.filter(hotel_id.eq(h_id))
					.order(id.asc())
					.select(Self::as_select())
					.load(conn)
			})
			.await??;

		Ok(hotel_rooms)
	}

	/// Get the facility names for a set of rooms, keyed by room id
	#[instrument(skip(conn))]
	pub async fn facilities_for(
		room_ids: Vec<i32>,
		conn: &DbConn,
	) -> Result<HashMap<i32, Vec<String>>, Error> {
		let rows: Vec<(i32, String)> = conn
			.interact(move |conn| {
				room_facility_mappings::table
					.inner_join(room_facilities::table)
					.filter(room_facility_mappings::room_id.eq_any(room_ids))
					.select((
						room_facility_mappings::room_id,
						room_facilities::name,
					))
					.load(conn)
			})
			.await??;

		let mut map: HashMap<i32, Vec<String>> = HashMap::new();

		for (r_id, name) in rows {
			map.entry(r_id).or_default().push(name);
		}

		Ok(map)
	}

	/// Delete a [`Room`] given its id
	#[instrument(skip(conn))]
	pub async fn delete_by_id(r_id: i32, conn: &DbConn) -> Result<(), Error> {
		let deleted = conn
			.interact(move |conn| {
				use self::rooms::dsl::*;

				diesel::delete(rooms.find(r_id)).execute(conn)
			})
			.await??;

		if deleted == 0 {
			return Err(Error::NotFound("room".to_string()));
		}

		info!("deleted room with id {r_id}");

		Ok(())
	}
}

/// Upsert a list of facility names and map them onto a room
///
/// Runs inside the caller's transaction
pub(crate) fn attach_room_facilities(
	conn: &mut PgConnection,
	r_id: i32,
	names: Vec<String>,
) -> QueryResult<()> {
	for facility_name in names {
		diesel::insert_into(room_facilities::table)
			.values(room_facilities::name.eq(&facility_name))
			.on_conflict(room_facilities::name)
			.do_nothing()
			.execute(conn)?;

		let f_id: i32 = room_facilities::table
			.filter(room_facilities::name.eq(&facility_name))
			.select(room_facilities::id)
			.get_result(conn)?;

		diesel::insert_into(room_facility_mappings::table)
			.values((
				room_facility_mappings::room_id.eq(r_id),
				room_facility_mappings::facility_id.eq(f_id),
			))
			.on_conflict_do_nothing()
			.execute(conn)?;
	}

	Ok(())
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRoom {
	pub hotel_id:    i32,
	pub room_type:   String,
	pub price_cents: i64,
	pub capacity:    i32,
	pub quantity:    i32,
}

impl NewRoom {
	/// Insert this [`NewRoom`] together with its facility set
	#[instrument(skip(conn))]
	pub async fn insert(
		self,
		facilities: Vec<String>,
		conn: &DbConn,
	) -> Result<Room, Error> {
		let room = conn
			.interact(move |conn| {
				conn.transaction(|conn| {
					let room: Room = diesel::insert_into(rooms::table)
						.values(self)
						.returning(Room::as_returning())
						.get_result(conn)?;

					attach_room_facilities(conn, room.id, facilities)?;

					Ok::<_, diesel::result::Error>(room)
				})
			})
			.await??;

		info!("created room {} in hotel {}", room.id, room.hotel_id);

		Ok(room)
	}
}

#[derive(AsChangeset, Clone, Debug, Default, Deserialize, Serialize)]
#[diesel(table_name = rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoomUpdate {
	pub room_type:   Option<String>,
	pub price_cents: Option<i64>,
	pub capacity:    Option<i32>,
	pub quantity:    Option<i32>,
}

impl RoomUpdate {
	/// Apply this update to the [`Room`] with the given id
	#[instrument(skip(conn))]
	pub async fn apply_to(
		self,
		r_id: i32,
		conn: &DbConn,
	) -> Result<Room, Error> {
		let room = conn
			.interact(move |conn| {
				use self::rooms::dsl::*;

				diesel::update(rooms.find(r_id))
					.set(self)
					.returning(Room::as_returning())
					.get_result(conn)
			})
			.await??;

		Ok(room)
	}
}
