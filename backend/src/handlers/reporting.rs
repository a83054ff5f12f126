//! Reporting handlers for grow reports and data export

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::AppResult;
use crate::services::reporting::{
    DashboardMetrics, ReportFormat, ReportRequest, ReportResponse, ReportingService,
};
use crate::AppState;

fn reporting_service(state: &AppState) -> ReportingService {
    ReportingService::new(state.plantings.clone(), state.harvests.clone())
}

/// Get dashboard metrics
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardMetrics>> {
    let metrics = reporting_service(&state).get_dashboard_metrics(state.clock.today())?;
    Ok(Json(metrics))
}

/// Build a planting report as JSON or CSV
pub async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> AppResult<impl IntoResponse> {
    let report = reporting_service(&state).build(&request.config, state.clock.today())?;

    if request.format == ReportFormat::Csv {
        let csv = ReportingService::export_to_csv(&report)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"plantings.csv\""),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(ReportResponse::from(report)).into_response())
    }
}
