//! HTTP request handlers for the shift planner API.
//!
//! This module contains the handler functions for all API endpoints.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{PlannerError, PlannerResult};
use crate::export::report_to_csv;
use crate::models::{Employee, EmployeeId};
use crate::planner::{AbsenceRow, LatenessRow, OvertimeRow, ShiftRow};

use super::request::{
    CreateEmployeeRequest, EmployeeListQuery, GenerateWeekRequest, RangeQuery,
    UpdateEmployeeRequest,
};
use super::response::{ApiError, ApiErrorResponse, GenerateWeekResponse, LatenessView};
use super::state::AppState;

/// File name offered for the CSV report download.
pub const REPORT_FILE_NAME: &str = "rapport_heures.csv";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/:id", put(update_employee))
        .route("/settings", get(get_settings).put(save_settings))
        .route("/weeks/generate", post(generate_week))
        .route("/shifts", get(list_shifts).put(save_shifts))
        .route("/absences", get(list_absences).put(save_absences))
        .route("/lateness", get(list_lateness).put(save_lateness))
        .route("/overtime", get(list_overtime).put(save_overtime))
        .route("/report", get(get_report))
        .route("/report.csv", get(get_report_csv))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: PlannerError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn respond<T: Serialize>(correlation_id: Uuid, status: StatusCode, result: PlannerResult<T>) -> Response {
    match result {
        Ok(body) => json_response(status, body),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Unwraps a JSON body, turning a rejection into a 400 response.
fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the failure
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(json_response(StatusCode::BAD_REQUEST, error))
}

/// Unwraps a query string, turning a rejection into a 400 response.
fn query_params<T>(
    correlation_id: Uuid,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, Response> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => {
            let body_text = rejection.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "Query string error"
            );
            Err(json_response(
                StatusCode::BAD_REQUEST,
                ApiError::invalid_query(body_text),
            ))
        }
    }
}

/// Handler for GET /employees.
async fn list_employees(
    State(state): State<AppState>,
    query: Result<Query<EmployeeListQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query_params(correlation_id, query) {
        Ok(q) => q,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, active_only = query.active_only, "Listing employees");

    let result = state.planner().await.employees(query.active_only).await;
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for POST /employees.
async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match json_body(correlation_id, payload) {
        Ok(r) => r,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, employee_id = request.id, "Creating employee");

    let employee: Employee = request.into();
    let result = state.planner().await.create_employee(employee).await;
    respond(correlation_id, StatusCode::CREATED, result)
}

/// Handler for PUT /employees/:id.
async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match json_body(correlation_id, payload) {
        Ok(r) => r,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, employee_id = id, "Updating employee");

    let result = state.planner().await.update_employee(id, request.into()).await;
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /settings.
async fn get_settings(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Reading settings");
    let result = state.planner().await.settings().await;
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for PUT /settings.
///
/// Accepts a partial key/value map and answers with the full stored map.
async fn save_settings(
    State(state): State<AppState>,
    payload: Result<Json<BTreeMap<String, String>>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let updates = match json_body(correlation_id, payload) {
        Ok(u) => u,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, keys = updates.len(), "Saving settings");

    let result = {
        let mut planner = state.planner().await;
        match planner.save_settings(updates).await {
            Ok(_) => planner.settings().await,
            Err(err) => Err(err),
        }
    };
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for POST /weeks/generate.
async fn generate_week(
    State(state): State<AppState>,
    payload: Result<Json<GenerateWeekRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match json_body(correlation_id, payload) {
        Ok(r) => r,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, week_start = %request.week_start, "Generating week");

    let result = state
        .planner()
        .await
        .generate_week(request.week_start)
        .await
        .map(|created| GenerateWeekResponse {
            week_start: request.week_start,
            created,
        });
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /shifts.
async fn list_shifts(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query_params(correlation_id, query) {
        Ok(q) => q,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, from = %query.from, to = %query.to, "Listing shifts");

    let range = match query.range() {
        Ok(range) => range,
        Err(err) => return error_response(correlation_id, err),
    };
    let result = state.planner().await.shifts(range).await;
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for PUT /shifts.
async fn save_shifts(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
    payload: Result<Json<Vec<ShiftRow>>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query_params(correlation_id, query) {
        Ok(q) => q,
        Err(response) => return response,
    };
    let rows = match json_body(correlation_id, payload) {
        Ok(r) => r,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, rows = rows.len(), "Saving shifts");

    let range = match query.range() {
        Ok(range) => range,
        Err(err) => return error_response(correlation_id, err),
    };
    let result = state.planner().await.save_shifts(range, rows).await;
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /absences.
async fn list_absences(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query_params(correlation_id, query) {
        Ok(q) => q,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, from = %query.from, to = %query.to, "Listing absences");

    let range = match query.range() {
        Ok(range) => range,
        Err(err) => return error_response(correlation_id, err),
    };
    let result = state.planner().await.absences(range).await;
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for PUT /absences.
async fn save_absences(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
    payload: Result<Json<Vec<AbsenceRow>>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query_params(correlation_id, query) {
        Ok(q) => q,
        Err(response) => return response,
    };
    let rows = match json_body(correlation_id, payload) {
        Ok(r) => r,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, rows = rows.len(), "Saving absences");

    let range = match query.range() {
        Ok(range) => range,
        Err(err) => return error_response(correlation_id, err),
    };
    let result = state.planner().await.save_absences(range, rows).await;
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /lateness.
///
/// Each record carries its derived `late_minutes`.
async fn list_lateness(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query_params(correlation_id, query) {
        Ok(q) => q,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, from = %query.from, to = %query.to, "Listing lateness");

    let range = match query.range() {
        Ok(range) => range,
        Err(err) => return error_response(correlation_id, err),
    };
    let result = state
        .planner()
        .await
        .lateness(range)
        .await
        .map(|lateness| lateness.into_iter().map(LatenessView::from).collect::<Vec<_>>());
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for PUT /lateness.
async fn save_lateness(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
    payload: Result<Json<Vec<LatenessRow>>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query_params(correlation_id, query) {
        Ok(q) => q,
        Err(response) => return response,
    };
    let rows = match json_body(correlation_id, payload) {
        Ok(r) => r,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, rows = rows.len(), "Saving lateness");

    let range = match query.range() {
        Ok(range) => range,
        Err(err) => return error_response(correlation_id, err),
    };
    let result = state.planner().await.save_lateness(range, rows).await;
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /overtime.
async fn list_overtime(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query_params(correlation_id, query) {
        Ok(q) => q,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, from = %query.from, to = %query.to, "Listing overtime");

    let range = match query.range() {
        Ok(range) => range,
        Err(err) => return error_response(correlation_id, err),
    };
    let result = state.planner().await.overtime(range).await;
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for PUT /overtime.
async fn save_overtime(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
    payload: Result<Json<Vec<OvertimeRow>>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query_params(correlation_id, query) {
        Ok(q) => q,
        Err(response) => return response,
    };
    let rows = match json_body(correlation_id, payload) {
        Ok(r) => r,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, rows = rows.len(), "Saving overtime");

    let range = match query.range() {
        Ok(range) => range,
        Err(err) => return error_response(correlation_id, err),
    };
    let result = state.planner().await.save_overtime(range, rows).await;
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /report.
async fn get_report(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query_params(correlation_id, query) {
        Ok(q) => q,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, from = %query.from, to = %query.to, "Building report");

    let range = match query.range() {
        Ok(range) => range,
        Err(err) => return error_response(correlation_id, err),
    };
    let result = state.planner().await.build_report(range).await;
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /report.csv.
async fn get_report_csv(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query_params(correlation_id, query) {
        Ok(q) => q,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, from = %query.from, to = %query.to, "Exporting report");

    let range = match query.range() {
        Ok(range) => range,
        Err(err) => return error_response(correlation_id, err),
    };
    let result = state
        .planner()
        .await
        .build_report(range)
        .await
        .and_then(|report| report_to_csv(&report));
    match result {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", REPORT_FILE_NAME),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(err) => error_response(correlation_id, err),
    }
}
