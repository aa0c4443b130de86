use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::User;
use crate::schema::{reviews, users};
use crate::{DbConn, Error};

/// The number of recent reviews shown on a hotel detail page
const RECENT_REVIEW_LIMIT: i64 = 10;

/// A single hotel review with its author
#[derive(Clone, Debug)]
pub struct Review {
	pub review: PrimitiveReview,
	pub author: User,
}

#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PrimitiveReview {
	pub id:         i32,
	pub user_id:    i32,
	pub hotel_id:   i32,
	pub rating:     i32,
	pub body:       Option<String>,
	pub created_at: NaiveDateTime,
}

/// Aggregate review figures for a hotel
#[derive(Clone, Copy, Debug, Default)]
pub struct ReviewStats {
	pub review_count:   i64,
	pub average_rating: Option<f64>,
}

impl Review {
	/// Get the most recent reviews for a hotel with their authors
	#[instrument(skip(conn))]
	pub async fn recent_for_hotel(
		h_id: i32,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let rows: Vec<(PrimitiveReview, User)> = conn
			.interact(move |conn| {
				reviews::table
					.inner_join(users::table)
					.filter(reviews::hotel_id.eq(h_id))
					.order(reviews::created_at.desc())
					.limit(RECENT_REVIEW_LIMIT)
					.select((
						PrimitiveReview::as_select(),
						User::as_select(),
					))
					.load(conn)
			})
			.await??;

		let hotel_reviews = rows
			.into_iter()
			.map(|(review, author)| Self { review, author })
			.collect();

		Ok(hotel_reviews)
	}

	/// Get the review count and average rating for a hotel
	#[instrument(skip(conn))]
	pub async fn stats_for_hotel(
		h_id: i32,
		conn: &DbConn,
	) -> Result<ReviewStats, Error> {
		let ratings: Vec<i32> = conn
			.interact(move |conn| {
				use self::reviews::dsl::*;

				reviews
					.filter(hotel_id.eq(h_id))
					.select(rating)
					.load(conn)
			})
			.await??;

		let review_count = ratings.len() as i64;
		let average_rating = if ratings.is_empty() {
			None
		} else {
			Some(ratings.iter().sum::<i32>() as f64 / review_count as f64)
		};

		Ok(ReviewStats { review_count, average_rating })
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewReview {
	pub user_id:  i32,
	pub hotel_id: i32,
	pub rating:   i32,
	pub body:     Option<String>,
}

impl NewReview {
	/// Insert this [`NewReview`]
	///
	/// A second review by the same user on the same hotel surfaces as a
	/// duplicate error through the unique constraint
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Review, Error> {
		let (review, author) = conn
			.interact(move |conn| {
				conn.transaction(|conn| {
					let r_id: i32 = diesel::insert_into(reviews::table)
						.values(self)
						.returning(reviews::id)
						.get_result(conn)?;

					reviews::table
						.find(r_id)
						.inner_join(users::table)
						.select((
							PrimitiveReview::as_select(),
							User::as_select(),
						))
						.get_result(conn)
				})
			})
			.await??;

		info!("created review {} for hotel {}", review.id, review.hotel_id);

		Ok(Review { review, author })
	}
}
