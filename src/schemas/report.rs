use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
	BookingReport,
	ReportBucket,
	ReportGroupBy,
	ReportSummary,
};

/// Query parameters for the admin report
///
/// Defaults (last 30 days, daily buckets) are filled in by the controller
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
	pub date_from: Option<NaiveDate>,
	pub date_to:   Option<NaiveDate>,
	pub group_by:  Option<ReportGroupBy>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
	pub from: NaiveDate,
	pub to:   NaiveDate,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
	pub period:   ReportPeriod,
	pub group_by: ReportGroupBy,
	pub data:     Vec<ReportBucket>,
	pub summary:  ReportSummary,
}

impl From<BookingReport> for ReportResponse {
	fn from(value: BookingReport) -> Self {
		Self {
			period:   ReportPeriod {
				from: value.date_from,
				to:   value.date_to,
			},
			group_by: value.group_by,
			data:     value.data,
			summary:  value.summary,
		}
	}
}
