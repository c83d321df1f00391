//! JSON endpoints: chart series and activity capture.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use platform_api::{ApiError, ApiResult, SuccessEnvelope};
use products_hr::{
    DashboardData, DashboardQuery, activity,
    analytics::{
        AttendanceSummary, AverageBucket, CountBucket, DepartmentAttendance, DepartmentSummary,
        ExitBucket, LeaveBucket, LeaveTotals, WorkforceSummary,
    },
    charts::{self, ChartSeries},
    dashboard,
    validation::{AttendanceForm, LeaveForm, today},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::http::AppState;

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub success: bool,
    pub data: Value,
    pub chart: ChartSeries,
}

impl ChartResponse {
    fn new(data: Value, chart: ChartSeries) -> Self {
        if chart.is_empty() {
            Self {
                success: false,
                data: json!({}),
                chart,
            }
        } else {
            Self {
                success: true,
                data,
                chart,
            }
        }
    }
}

async fn load(state: &AppState, query: &DashboardQuery) -> ApiResult<DashboardData> {
    let data =
        dashboard::dashboard_for_query(&state.pool, query, state.config.windows, today()).await?;
    Ok(data)
}

fn to_value(value: impl Serialize) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(platform_api::internal_error)
}

#[derive(Serialize)]
struct AttendanceData<'a> {
    summary: &'a AttendanceSummary,
    departments: &'a [DepartmentAttendance],
}

#[derive(Serialize)]
struct LeaveData<'a> {
    totals: &'a LeaveTotals,
    by_type: &'a [LeaveBucket],
}

#[derive(Serialize)]
struct AttritionData<'a> {
    attrition_rate: f64,
    period_exit_rate: f64,
    departments: &'a [DepartmentSummary],
    exits: &'a [ExitBucket],
}

#[derive(Serialize)]
struct WorkforceData<'a> {
    summary: &'a WorkforceSummary,
    gender: &'a [CountBucket],
    salary_by_gender: &'a [AverageBucket],
    salary_by_age: &'a [AverageBucket],
}

pub async fn attendance_chart(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<ChartResponse>> {
    let data = load(&state, &query).await?;
    let payload = to_value(AttendanceData {
        summary: &data.attendance,
        departments: &data.department_attendance,
    })?;
    Ok(Json(ChartResponse::new(
        payload,
        charts::attendance_chart(&data),
    )))
}

pub async fn leave_chart(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<ChartResponse>> {
    let data = load(&state, &query).await?;
    let payload = to_value(LeaveData {
        totals: &data.leave_totals,
        by_type: &data.leaves,
    })?;
    Ok(Json(ChartResponse::new(payload, charts::leave_chart(&data))))
}

pub async fn attrition_chart(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<ChartResponse>> {
    let data = load(&state, &query).await?;
    let payload = to_value(AttritionData {
        attrition_rate: data.summary.attrition_rate,
        period_exit_rate: data.period_exit_rate,
        departments: &data.departments,
        exits: &data.exits,
    })?;
    Ok(Json(ChartResponse::new(
        payload,
        charts::attrition_chart(&data),
    )))
}

pub async fn workforce_chart(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<ChartResponse>> {
    let data = load(&state, &query).await?;
    let payload = to_value(WorkforceData {
        summary: &data.summary,
        gender: &data.gender,
        salary_by_gender: &data.salary_by_gender,
        salary_by_age: &data.salary_by_age,
    })?;
    Ok(Json(ChartResponse::new(
        payload,
        charts::headcount_chart(&data),
    )))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))
}

pub async fn record_attendance(
    State(state): State<AppState>,
    body: Result<Json<AttendanceForm>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SuccessEnvelope<Value>>)> {
    let input = json_body(body)?
        .parse(today())
        .map_err(|errors| ApiError::Validation(errors.messages()))?;
    let record = activity::record_attendance(&state.pool, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(SuccessEnvelope::new(
            "Attendance recorded",
            json!({ "id": record.id }),
        )),
    ))
}

pub async fn record_leave(
    State(state): State<AppState>,
    body: Result<Json<LeaveForm>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SuccessEnvelope<Value>>)> {
    let input = json_body(body)?
        .parse(today())
        .map_err(|errors| ApiError::Validation(errors.messages()))?;
    let record = activity::record_leave(&state.pool, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(SuccessEnvelope::new(
            "Leave recorded",
            json!({ "id": record.id, "duration": record.duration }),
        )),
    ))
}
