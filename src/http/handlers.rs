//! Route handlers. Each one hands its synchronous query to the blocking
//! pool through `AppState::with_db` and converts domain values to JSON shapes.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::ApiError;
use super::AppState;
use crate::calendar::{
    group_activities_by_month, recent_months, requested_months, ActivityEntry, ActivityGroup,
    MonthActivities,
};
use crate::capacity::{build_summary, CapacitySummary, MAX_WINDOW};
use crate::models::{
    check_amount, AllocationRecord, CapacityRecord, CategoryBucket, EmployeeListing, Initiative, Month,
};

type ApiResult<T> = Result<T, ApiError>;

/// Exact decimal rendered as a JSON number (`5`, `-2.5`).
fn json_number(d: Decimal) -> serde_json::Number {
    serde_json::Number::from_str(&d.normalize().to_string())
        .ok()
        .or_else(|| {
            use rust_decimal::prelude::ToPrimitive;
            d.to_f64().and_then(serde_json::Number::from_f64)
        })
        .unwrap_or_else(|| serde_json::Number::from(0))
}

fn json_numbers(values: Vec<Decimal>) -> Vec<serde_json::Number> {
    values.into_iter().map(json_number).collect()
}

fn parse_amount(n: &serde_json::Number) -> ApiResult<Decimal> {
    let text = n.to_string();
    let amount = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ApiError::bad_request(format!("amount {text} is out of range")))?;
    check_amount(amount).map_err(|e| ApiError::bad_request(e.to_string()))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(v)| v)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// ── Calendar ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct FormattedMonth {
    yyyymm: Month,
    label: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CalendarMonthsResponse {
    months: Vec<Month>,
    formatted: Vec<FormattedMonth>,
}

/// GET /calendar/months
pub(crate) async fn calendar_months(State(state): State<AppState>) -> ApiResult<Json<CalendarMonthsResponse>> {
    let stored = state.with_db(|db| db.get_allocation_months()).await?;
    let months = recent_months(&stored, state.today());
    let formatted = months
        .iter()
        .map(|&m| FormattedMonth {
            yyyymm: m,
            label: m.label(),
        })
        .collect();
    Ok(Json(CalendarMonthsResponse { months, formatted }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivitiesRequest {
    months: Option<Vec<Month>>,
    emp_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ActivityJson {
    activity: String,
    category: String,
}

impl From<ActivityEntry> for ActivityJson {
    fn from(e: ActivityEntry) -> Self {
        Self {
            activity: e.activity,
            category: e.category,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ActivityGroupJson {
    category: String,
    activities: Vec<ActivityJson>,
}

impl From<ActivityGroup> for ActivityGroupJson {
    fn from(g: ActivityGroup) -> Self {
        Self {
            category: g.category,
            activities: g.activities.into_iter().map(ActivityJson::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MonthActivitiesJson {
    yyyymm: Month,
    label: String,
    activities: Vec<ActivityJson>,
    groups: Vec<ActivityGroupJson>,
}

impl From<MonthActivities> for MonthActivitiesJson {
    fn from(m: MonthActivities) -> Self {
        Self {
            yyyymm: m.month,
            label: m.month.label(),
            activities: m.activities.into_iter().map(ActivityJson::from).collect(),
            groups: m.groups.into_iter().map(ActivityGroupJson::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActivitiesResponse {
    activities_by_month: Vec<MonthActivitiesJson>,
}

/// POST /calendar/activities
pub(crate) async fn calendar_activities(
    State(state): State<AppState>,
    payload: Result<Json<ActivitiesRequest>, JsonRejection>,
) -> ApiResult<Json<ActivitiesResponse>> {
    let req = body(payload)?;
    let months = req
        .months
        .ok_or_else(|| ApiError::bad_request("months array is required"))?;
    let months = requested_months(&months).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let emp_id = req.emp_id.filter(|e| !e.trim().is_empty());

    let query = months.clone();
    let rows = state
        .with_db(move |db| db.get_activities(&query, emp_id.as_deref()))
        .await?;
    let grouped = group_activities_by_month(&months, &rows);
    Ok(Json(ActivitiesResponse {
        activities_by_month: grouped.into_iter().map(MonthActivitiesJson::from).collect(),
    }))
}

// ── Capacity summary ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct LabeledMonth {
    label: String,
    value: Month,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummaryMonthsResponse {
    months: Vec<LabeledMonth>,
}

/// GET /capacity-summary/months
pub(crate) async fn summary_months(State(state): State<AppState>) -> ApiResult<Json<SummaryMonthsResponse>> {
    let stored = state.with_db(|db| db.get_all_months()).await?;
    let months = recent_months(&stored, state.today())
        .into_iter()
        .map(|m| LabeledMonth {
            label: m.label(),
            value: m,
        })
        .collect();
    Ok(Json(SummaryMonthsResponse { months }))
}

#[derive(Debug, Serialize)]
pub(crate) struct CategorySeries {
    label: String,
    values: Vec<serde_json::Number>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CapacitySummaryResponse {
    months: Vec<String>,
    categories: Vec<CategorySeries>,
    totals: Vec<serde_json::Number>,
    people_capacity: Vec<serde_json::Number>,
    remaining_capacity: Vec<serde_json::Number>,
}

impl From<CapacitySummary> for CapacitySummaryResponse {
    fn from(summary: CapacitySummary) -> Self {
        Self {
            months: summary.labels(),
            categories: CategoryBucket::SUMMARY_ORDER
                .iter()
                .map(|b| CategorySeries {
                    label: b.summary_label().to_string(),
                    values: json_numbers(summary.category_values(*b)),
                })
                .collect(),
            totals: json_numbers(summary.totals()),
            people_capacity: json_numbers(summary.people_capacity()),
            remaining_capacity: json_numbers(summary.remaining()),
        }
    }
}

/// GET /capacity-summary?start=YYYYMM&months=N
pub(crate) async fn capacity_summary(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<CapacitySummaryResponse>> {
    let start = match params.get("start").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(raw) => Some(Month::parse(raw).map_err(|e| ApiError::bad_request(e.to_string()))?),
        None => None,
    };
    let window = match params.get("months").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let n: usize = raw
                .parse()
                .map_err(|_| ApiError::bad_request(format!("months must be a positive integer, got '{raw}'")))?;
            if n == 0 || n > MAX_WINDOW {
                return Err(ApiError::bad_request(format!(
                    "months must be between 1 and {MAX_WINDOW}"
                )));
            }
            n
        }
        None => state.window_size,
    };

    let today = state.today();
    let summary = state
        .with_db(move |db| build_summary(db, start, window, today))
        .await?;
    Ok(Json(summary.into()))
}

// ── Record maintenance ────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct NewAllocation {
    category: String,
    date: Month,
    amount: serde_json::Number,
    #[serde(default)]
    emp_id: Option<String>,
    #[serde(default)]
    activity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewCapacity {
    date: Month,
    amount: serde_json::Number,
}

/// POST /allocation
pub(crate) async fn create_allocation(
    State(state): State<AppState>,
    payload: Result<Json<NewAllocation>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let new = body(payload)?;
    if new.category.trim().is_empty() {
        return Err(ApiError::bad_request("category must not be empty"));
    }
    let mut rec = AllocationRecord::new(new.category.trim().to_string(), new.date, parse_amount(&new.amount)?)
        .with_activity(new.activity.unwrap_or_default());
    if let Some(emp) = new.emp_id.filter(|e| !e.trim().is_empty()) {
        rec = rec.with_emp_id(emp);
    }

    let (month, category) = (rec.date, rec.category.clone());
    let id = state.with_db(move |db| db.insert_allocation(&rec)).await?;
    tracing::info!(id, month = %month, category = %category, "allocation created");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// POST /capacity
pub(crate) async fn create_capacity(
    State(state): State<AppState>,
    payload: Result<Json<NewCapacity>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let new = body(payload)?;
    let rec = CapacityRecord::new(new.date, parse_amount(&new.amount)?);
    let month = rec.date;
    let id = state.with_db(move |db| db.insert_capacity(&rec)).await?;
    tracing::info!(id, month = %month, "capacity created");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// DELETE /allocation/{id}
pub(crate) async fn delete_allocation(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    if state.with_db(move |db| db.delete_allocation(id)).await? {
        tracing::info!(id, "allocation deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("allocation {id} not found")))
    }
}

// ── Directory ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct EmployeeJson {
    emp_id: String,
    emp_name: String,
    department: Option<String>,
}

impl From<EmployeeListing> for EmployeeJson {
    fn from(e: EmployeeListing) -> Self {
        Self {
            emp_id: e.emp_id,
            emp_name: e.emp_name,
            department: e.department,
        }
    }
}

/// GET /employees
pub(crate) async fn employees(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let listing = state.with_db(|db| db.list_employees()).await?;
    let employees: Vec<EmployeeJson> = listing.into_iter().map(EmployeeJson::from).collect();
    Ok(Json(json!({ "employees": employees })))
}

/// GET /accounts/{username}
pub(crate) async fn account(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let lookup = username.clone();
    let (account, employee) = state
        .with_db(move |db| {
            let Some(account) = db.get_account_by_username(&lookup)? else {
                return Ok((None, None));
            };
            let employee = db.get_employee_by_id(&account.emp_id)?;
            Ok((Some(account), employee))
        })
        .await?;
    let account = account.ok_or_else(|| ApiError::NotFound(format!("account '{username}' not found")))?;

    let capabilities: Vec<&str> = account.role.capabilities().iter().map(|c| c.as_str()).collect();
    Ok(Json(json!({
        "username": account.username,
        "emp_id": account.emp_id,
        "role": account.role.as_str(),
        "capabilities": capabilities,
        "employee": employee.map(|e| json!({ "emp_id": e.emp_id, "emp_name": e.emp_name })),
    })))
}

#[derive(Debug, Serialize)]
pub(crate) struct InitiativeJson {
    id: Option<i64>,
    name: String,
    leader: String,
    status: String,
}

impl From<Initiative> for InitiativeJson {
    fn from(i: Initiative) -> Self {
        Self {
            id: i.id,
            name: i.name,
            leader: i.leader,
            status: i.status,
        }
    }
}

/// GET /initiatives[?mine=username]
pub(crate) async fn initiatives(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<serde_json::Value>> {
    let mine = params
        .get("mine")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let list = state
        .with_db(move |db| match mine {
            Some(username) => db.get_initiatives_led_by(&username),
            None => db.get_initiatives(),
        })
        .await?;
    let initiatives: Vec<InitiativeJson> = list.into_iter().map(InitiativeJson::from).collect();
    Ok(Json(json!({ "initiatives": initiatives })))
}
