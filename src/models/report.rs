use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::BookingStatus;
use crate::schema::bookings;
use crate::{DbConn, Error};

/// Calendar bucketing for the booking report
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportGroupBy {
	#[default]
	Day,
	Week,
	Month,
}

/// One time bucket of the report series
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBucket {
	pub bucket:              String,
	pub total_bookings:      i64,
	pub total_revenue_cents: i64,
}

/// Aggregate figures over the whole report window
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
	pub total_bookings:              i64,
	pub total_revenue_cents:         i64,
	pub average_daily_bookings:      f64,
	pub average_daily_revenue_cents: f64,
}

/// A bookings/revenue time series over a date window
///
/// Bookings are bucketed by their creation timestamp, cancelled bookings do
/// not count towards the series
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReport {
	pub date_from: NaiveDate,
	pub date_to:   NaiveDate,
	pub group_by:  ReportGroupBy,
	pub data:      Vec<ReportBucket>,
	pub summary:   ReportSummary,
}

impl BookingReport {
	/// Build the report for all bookings created in `[date_from, date_to]`
	///
	/// Read-only, identical inputs over unchanged data produce identical
	/// output
	#[instrument(skip(conn))]
	pub async fn generate(
		date_from: NaiveDate,
		date_to: NaiveDate,
		group_by: ReportGroupBy,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let window_start = date_from.and_time(NaiveTime::MIN);
		let window_end = date_to
			.checked_add_days(Days::new(1))
			.unwrap_or(date_to)
			.and_time(NaiveTime::MIN);

		let rows: Vec<(NaiveDateTime, i64)> = conn
			.interact(move |conn| {
				use self::bookings::dsl::*;

				bookings
					.filter(created_at.ge(window_start))
					.filter(created_at.lt(window_end))
					.filter(status.ne(BookingStatus::Cancelled))
					.select((created_at, total_price_cents))
					.load(conn)
			})
			.await??;

		Ok(Self::from_rows(date_from, date_to, group_by, &rows))
	}

	/// Bucket a set of (creation timestamp, revenue) rows into the series
	fn from_rows(
		date_from: NaiveDate,
		date_to: NaiveDate,
		group_by: ReportGroupBy,
		rows: &[(NaiveDateTime, i64)],
	) -> Self {
		let mut buckets: BTreeMap<String, (i64, i64)> = BTreeMap::new();

		for (created_at, revenue_cents) in rows {
			let key = bucket_key(created_at.date(), group_by);
			let entry = buckets.entry(key).or_insert((0, 0));

			entry.0 += 1;
			entry.1 += revenue_cents;
		}

		let data: Vec<ReportBucket> = buckets
			.into_iter()
			.map(|(bucket, (total_bookings, total_revenue_cents))| {
				ReportBucket { bucket, total_bookings, total_revenue_cents }
			})
			.collect();

		let total_bookings = data.iter().map(|b| b.total_bookings).sum();
		let total_revenue_cents =
			data.iter().map(|b| b.total_revenue_cents).sum();

		let elapsed_days = (date_to - date_from).num_days();

		// A zero-day window yields zero averages, not an error
		let (average_daily_bookings, average_daily_revenue_cents) =
			if elapsed_days > 0 {
				(
					round2(total_bookings as f64 / elapsed_days as f64),
					round2(
						total_revenue_cents as f64 / elapsed_days as f64,
					),
				)
			} else {
				(0.0, 0.0)
			};

		let summary = ReportSummary {
			total_bookings,
			total_revenue_cents,
			average_daily_bookings,
			average_daily_revenue_cents,
		};

		Self { date_from, date_to, group_by, data, summary }
	}

	/// Render the report series as CSV
	#[must_use]
	pub fn to_csv(&self) -> String {
		let mut out =
			String::from("bucket,total_bookings,total_revenue_cents\n");

		for bucket in &self.data {
			out.push_str(&format!(
				"{},{},{}\n",
				bucket.bucket, bucket.total_bookings,
				bucket.total_revenue_cents
			));
		}

		out
	}
}

/// Truncate a date to its calendar bucket
fn bucket_key(date: NaiveDate, group_by: ReportGroupBy) -> String {
	match group_by {
		ReportGroupBy::Day => date.format("%Y-%m-%d").to_string(),
		ReportGroupBy::Week => {
			let iso = date.iso_week();

			format!("{}-W{:02}", iso.year(), iso.week())
		},
		ReportGroupBy::Month => date.format("%Y-%m").to_string(),
	}
}

fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

#[cfg(test)]
mod tests {
	use super::*;

	fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(y, m, d)
			.unwrap()
			.and_hms_opt(12, 0, 0)
			.unwrap()
	}

	fn day(y: i32, m: u32, d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, d).unwrap()
	}

	#[test]
	fn daily_buckets_are_calendar_days_in_order() {
		let rows = vec![
			(at(2024, 2, 15), 45_000),
			(at(2024, 2, 15), 30_000),
			(at(2024, 2, 17), 10_000),
		];

		let report = BookingReport::from_rows(
			day(2024, 2, 1),
			day(2024, 3, 1),
			ReportGroupBy::Day,
			&rows,
		);

		assert_eq!(report.data, vec![
			ReportBucket {
				bucket:              "2024-02-15".to_string(),
				total_bookings:      2,
				total_revenue_cents: 75_000,
			},
			ReportBucket {
				bucket:              "2024-02-17".to_string(),
				total_bookings:      1,
				total_revenue_cents: 10_000,
			},
		]);
	}

	#[test]
	fn weekly_buckets_use_iso_weeks() {
		// 2024-01-01 is a Monday in ISO week 2024-W01
		let rows = vec![
			(at(2024, 1, 1), 100),
			(at(2024, 1, 7), 100),
			(at(2024, 1, 8), 100),
		];

		let report = BookingReport::from_rows(
			day(2024, 1, 1),
			day(2024, 1, 31),
			ReportGroupBy::Week,
			&rows,
		);

		let keys: Vec<&str> =
			report.data.iter().map(|b| b.bucket.as_str()).collect();

		assert_eq!(keys, vec!["2024-W01", "2024-W02"]);
		assert_eq!(report.data[0].total_bookings, 2);
	}

	#[test]
	fn monthly_buckets_truncate_to_the_month() {
		let rows = vec![
			(at(2024, 1, 31), 100),
			(at(2024, 2, 1), 200),
		];

		let report = BookingReport::from_rows(
			day(2024, 1, 1),
			day(2024, 2, 29),
			ReportGroupBy::Month,
			&rows,
		);

		let keys: Vec<&str> =
			report.data.iter().map(|b| b.bucket.as_str()).collect();

		assert_eq!(keys, vec!["2024-01", "2024-02"]);
	}

	#[test]
	fn summary_averages_divide_by_elapsed_days() {
		let rows = vec![(at(2024, 2, 2), 30_000), (at(2024, 2, 3), 30_000)];

		let report = BookingReport::from_rows(
			day(2024, 2, 1),
			day(2024, 2, 5),
			ReportGroupBy::Day,
			&rows,
		);

		assert_eq!(report.summary.total_bookings, 2);
		assert_eq!(report.summary.total_revenue_cents, 60_000);
		assert_eq!(report.summary.average_daily_bookings, 0.5);
		assert_eq!(report.summary.average_daily_revenue_cents, 15_000.0);
	}

	#[test]
	fn zero_day_window_yields_zero_averages() {
		let rows = vec![(at(2024, 2, 1), 30_000)];

		let report = BookingReport::from_rows(
			day(2024, 2, 1),
			day(2024, 2, 1),
			ReportGroupBy::Day,
			&rows,
		);

		assert_eq!(report.summary.total_bookings, 1);
		assert_eq!(report.summary.average_daily_bookings, 0.0);
		assert_eq!(report.summary.average_daily_revenue_cents, 0.0);
	}

	#[test]
	fn identical_inputs_produce_identical_reports() {
		let rows = vec![
			(at(2024, 2, 2), 30_000),
			(at(2024, 2, 10), 45_000),
		];

		let a = BookingReport::from_rows(
			day(2024, 2, 1),
			day(2024, 2, 28),
			ReportGroupBy::Day,
			&rows,
		);
		let b = BookingReport::from_rows(
			day(2024, 2, 1),
			day(2024, 2, 28),
			ReportGroupBy::Day,
			&rows,
		);

		assert_eq!(a.data, b.data);
		assert_eq!(a.summary, b.summary);
	}

	#[test]
	fn csv_rendering_includes_the_header_and_rows() {
		let rows = vec![(at(2024, 2, 15), 45_000)];

		let report = BookingReport::from_rows(
			day(2024, 2, 1),
			day(2024, 3, 1),
			ReportGroupBy::Day,
			&rows,
		);

		let csv = report.to_csv();

		assert!(csv.starts_with("bucket,total_bookings,total_revenue_cents\n"));
		assert!(csv.contains("2024-02-15,1,45000\n"));
	}
}
