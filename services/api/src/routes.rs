use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Local;
use puntorojo::error::AppError;
use puntorojo::workflows::intake::{InputFormat, LossDatasetImporter, LossImportError, RawTable};
use puntorojo::workflows::losses::{
    demo_assets, render_table, top_critical, AnnotatedAsset, ExportTable, LossAnalysis,
    PriorityFilter, DEFAULT_TOP_CRITICAL,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::io::Cursor;

/// Dataset plus view options shared by the analyze and export endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnalyzeRequest {
    /// Delimited text; parsed as `format` (CSV when omitted).
    #[serde(default)]
    pub(crate) csv: Option<String>,
    #[serde(default)]
    pub(crate) format: Option<InputFormat>,
    #[serde(default)]
    pub(crate) rows: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub(crate) filter: PriorityFilter,
    #[serde(default)]
    pub(crate) top: Option<usize>,
}

impl AnalyzeRequest {
    fn take_table(&mut self) -> Result<RawTable, LossImportError> {
        if let Some(csv) = self.csv.take() {
            let format = self.format.unwrap_or(InputFormat::Csv);
            return LossDatasetImporter::from_reader(Cursor::new(csv.into_bytes()), format);
        }

        match self.rows.take() {
            Some(rows) => Ok(LossDatasetImporter::from_rows(&rows)),
            None => Err(LossImportError::MissingData),
        }
    }

    fn top(&self) -> usize {
        self.top.unwrap_or(DEFAULT_TOP_CRITICAL)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportRequest {
    pub(crate) table: ExportTable,
    #[serde(flatten)]
    pub(crate) input: AnalyzeRequest,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeResponse {
    #[serde(flatten)]
    pub(crate) analysis: LossAnalysis,
    pub(crate) priority_list: Vec<AnnotatedAsset>,
    pub(crate) top_critical: Vec<AnnotatedAsset>,
}

impl AnalyzeResponse {
    fn new(analysis: LossAnalysis, filter: &PriorityFilter, top: usize) -> Self {
        let priority_list = filter.apply(&analysis.assets).into_iter().cloned().collect();
        let top_critical = top_critical(&analysis.assets, top).to_vec();
        Self {
            analysis,
            priority_list,
            top_critical,
        }
    }
}

pub(crate) fn loss_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/losses/analyze", post(analyze_endpoint))
        .route("/api/v1/losses/export", post(export_endpoint))
        .route("/api/v1/losses/demo", get(demo_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn analyze_endpoint(
    Extension(state): Extension<AppState>,
    Json(mut payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let table = payload.take_table()?;
    let analysis = state.engine.run(&table)?;
    Ok(Json(AnalyzeResponse::new(
        analysis,
        &payload.filter,
        payload.top(),
    )))
}

pub(crate) async fn export_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ExportRequest { table, mut input } = payload;
    let analysis = state.engine.run(&input.take_table()?)?;
    let top = input.top();
    let body = render_table(&analysis, table, &input.filter, top)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        table.file_name(top, &Local::now())
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub(crate) async fn demo_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let analysis = state.engine.analyze(demo_assets())?;
    Ok(Json(AnalyzeResponse::new(
        analysis,
        &PriorityFilter::default(),
        DEFAULT_TOP_CRITICAL,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use puntorojo::workflows::losses::LossPrioritizationEngine;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    const FLEET_CSV: &str = "ID_Trafo,Sector,Latitud,Longitud,Capacidad_kVA,kWh_Entregado,kWh_Facturado\n\
TF-SIS-001,San Isidro,18.4532,-69.7123,300,278000,97240\n\
TF-GAZ-001,Gazcue,18.4709,-69.9312,150,125000,52500\n\
TF-BCH-002,Boca Chica,18.4478,-69.6089,225,198000,89100\n";

    fn app(ready: bool) -> Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            engine: Arc::new(LossPrioritizationEngine::default()),
        };
        loss_routes().layer(Extension(state))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds");
        let response = app.oneshot(request).await.expect("handler responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let request = Request::builder()
            .uri("/ready")
            .body(Body::empty())
            .expect("request builds");
        let response = app(false).oneshot(request).await.expect("handler responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn analyze_ranks_csv_payload() {
        let (status, body) = post_json(
            app(true),
            "/api/v1/losses/analyze",
            json!({
                "csv": FLEET_CSV,
                "filter": { "sectors": ["Gazcue"] },
                "top": 2
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let body: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(body["assets"].as_array().map(Vec::len), Some(3));
        assert_eq!(body["assets"][0]["asset_id"], "TF-SIS-001");
        assert_eq!(body["assets"][0]["category"], "CRITICAL_OPERATIONAL");
        let directives = body["assets"][0]["directives"]
            .as_array()
            .expect("directive list");
        assert_eq!(directives.len(), 3);
        assert!(directives[0]
            .as_str()
            .is_some_and(|text| text.starts_with("NETWORK NORMALIZATION OPERATIVE")));
        assert!(directives[1]
            .as_str()
            .is_some_and(|text| text.starts_with("TRANSFORMER REPLACEMENT: 159% load")));
        assert_eq!(
            body["assets"][0]["interventions"][0]["kind"],
            "network_normalization"
        );
        assert_eq!(body["top_critical"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["priority_list"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["priority_list"][0]["asset_id"], "TF-GAZ-001");
        assert_eq!(body["fleet"]["asset_count"], 3);
        assert!(body["sectors"].is_array());
        assert!(body["skipped"].as_array().is_some_and(Vec::is_empty));
    }

    #[tokio::test]
    async fn analyze_reports_missing_column() {
        let (status, body) = post_json(
            app(true),
            "/api/v1/losses/analyze",
            json!({ "csv": "ID_Trafo,Sector\nTF-1,Gazcue\n" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = serde_json::from_slice(&body).expect("json body");
        let message = body["error"].as_str().expect("error message");
        assert!(message.contains("latitude"));
        assert!(message.contains("Latitud, Lat, latitude"));
    }

    #[tokio::test]
    async fn analyze_without_data_is_bad_request() {
        let (status, _) = post_json(app(true), "/api/v1/losses/analyze", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn export_returns_csv_attachment() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/losses/export")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "table": "sectors", "csv": FLEET_CSV }).to_string(),
            ))
            .expect("request builds");
        let response = app(true).oneshot(request).await.expect("handler responds");
        assert_eq!(response.status(), StatusCode::OK);

        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .expect("content disposition");
        assert!(disposition.starts_with("attachment; filename=\"sector_summary_"));
        assert!(disposition.ends_with(".csv\""));

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let text = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("sector,total_loss_kwh"));
    }

    #[tokio::test]
    async fn demo_endpoint_ranks_builtin_fleet() {
        let Json(body) = demo_endpoint(Extension(AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            engine: Arc::new(LossPrioritizationEngine::default()),
        }))
        .await
        .expect("demo analysis");

        assert_eq!(body.analysis.assets.len(), 20);
        assert_eq!(body.top_critical.len(), DEFAULT_TOP_CRITICAL);
        assert_eq!(body.priority_list.len(), 20);
        assert_eq!(body.top_critical[0].record.asset_id, "TF-SIS-001");
    }
}
