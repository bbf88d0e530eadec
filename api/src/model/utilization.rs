use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{
    id::{LabId, UtilizationId},
    utilization::{event::CreateUtilization, Utilization, UtilizationQuery, UtilizationSummary},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUtilizationRequest {
    #[garde(skip)]
    pub lab_id: LabId,
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    pub hours_used: f64,
}

impl From<CreateUtilizationRequest> for CreateUtilization {
    fn from(value: CreateUtilizationRequest) -> Self {
        let CreateUtilizationRequest {
            lab_id,
            date,
            hours_used,
        } = value;
        CreateUtilization::new(lab_id, date, hours_used)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationQueryParams {
    pub lab_id: Option<LabId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl From<UtilizationQueryParams> for UtilizationQuery {
    fn from(value: UtilizationQueryParams) -> Self {
        let UtilizationQueryParams { lab_id, from, to } = value;
        Self { lab_id, from, to }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationsResponse {
    pub items: Vec<UtilizationResponse>,
}

impl From<Vec<Utilization>> for UtilizationsResponse {
    fn from(value: Vec<Utilization>) -> Self {
        Self {
            items: value.into_iter().map(UtilizationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationResponse {
    pub utilization_id: UtilizationId,
    pub lab_id: LabId,
    pub date: NaiveDate,
    pub hours_used: f64,
}

impl From<Utilization> for UtilizationResponse {
    fn from(value: Utilization) -> Self {
        let Utilization {
            utilization_id,
            lab_id,
            date,
            hours_used,
        } = value;
        Self {
            utilization_id,
            lab_id,
            date,
            hours_used,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyHours {
    pub date: NaiveDate,
    pub hours: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBookings {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationSummaryResponse {
    pub hours_by_date: Vec<DailyHours>,
    pub bookings_by_date: Vec<DailyBookings>,
    pub total_hours: f64,
}

impl From<UtilizationSummary> for UtilizationSummaryResponse {
    fn from(value: UtilizationSummary) -> Self {
        let total_hours = value.total_hours();
        let UtilizationSummary {
            hours_by_date,
            bookings_by_date,
        } = value;
        Self {
            hours_by_date: hours_by_date
                .into_iter()
                .map(|(date, hours)| DailyHours { date, hours })
                .collect(),
            bookings_by_date: bookings_by_date
                .into_iter()
                .map(|(date, count)| DailyBookings { date, count })
                .collect(),
            total_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_is_listed_by_date() {
        let d1 = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let summary = UtilizationSummary::new([(d2, 2.0), (d1, 1.5)], [(d1, 3)]);

        let json = serde_json::to_value(UtilizationSummaryResponse::from(summary)).unwrap();
        assert_eq!(json["totalHours"], 3.5);
        assert_eq!(json["hoursByDate"][0]["date"], "2025-03-01");
        assert_eq!(json["hoursByDate"][1]["hours"], 2.0);
        assert_eq!(json["bookingsByDate"][0]["count"], 3);
    }

    #[test]
    fn query_params_are_optional() {
        let params: UtilizationQueryParams =
            serde_json::from_value(serde_json::json!({ "from": "2025-03-01" })).unwrap();
        let query = UtilizationQuery::from(params);
        assert!(query.lab_id.is_none());
        assert_eq!(query.from, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert!(query.to.is_none());
    }
}
