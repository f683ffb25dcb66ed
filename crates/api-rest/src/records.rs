//! Record, validation and metrics endpoints.

use crate::{ApiError, AppState};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use prontuario_core::model::PatientBasics;
use prontuario_core::{
    bmi_class, compute_bmi, decode_payload, validate_json, BmiClass, Record, RecordKind,
    ValidationResult,
};
use prontuario_uuid::EntryId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

pub(crate) async fn create(
    State(state): State<AppState>,
    Json(basics): Json<PatientBasics>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let record = state.store.create(basics)?;
    state
        .records
        .write()
        .await
        .insert(record.id(), Arc::new(Mutex::new(record.clone())));
    Ok((StatusCode::CREATED, Json(record)))
}

pub(crate) async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let handle = state.record_handle(EntryId::parse(&id)?).await?;
    let record = handle.lock().await.clone();
    Ok(Json(record))
}

/// Validates and appends one entry.
///
/// The record's lock is held from reading the current snapshot until the new one is stored, so
/// concurrent appends to the same record cannot lose each other's entries.
pub(crate) async fn append(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
    Json(value): Json<serde_json::Value>,
) -> Result<Json<Record>, ApiError> {
    let kind: RecordKind = kind.parse()?;
    let handle = state.record_handle(EntryId::parse(&id)?).await?;
    let payload = decode_payload(kind, value).map_err(|errors| ApiError::Invalid { kind, errors })?;

    let mut current = handle.lock().await;
    let next = state.store.submit(&current, payload)?;
    *current = next.clone();
    Ok(Json(next))
}

pub(crate) async fn validate(
    Path(kind): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> Result<Json<ValidationResult>, ApiError> {
    let kind: RecordKind = kind.parse()?;
    Ok(Json(validate_json(kind, value)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BmiQuery {
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BmiRes {
    bmi: Option<f64>,
    class: Option<BmiClass>,
}

pub(crate) async fn bmi(Query(query): Query<BmiQuery>) -> Json<BmiRes> {
    let bmi = compute_bmi(query.weight_kg, query.height_cm);
    Json(BmiRes {
        bmi,
        class: bmi.and_then(bmi_class),
    })
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::StatusCode;
    use axum::Router;
    use serde_json::json;
    use tower::ServiceExt;

    fn medication(continuous_use: bool) -> serde_json::Value {
        json!({
            "name": "Losartana",
            "activeIngredient": "Losartana potássica",
            "dosingInstructions": "1 comprimido pela manhã",
            "dosageForm": "Comprimido",
            "route": "Oral",
            "startDate": "2024-03-01",
            "continuousUse": continuous_use,
        })
    }

    async fn create_record(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/records",
                json!({ "name": "Maria da Silva", "birthDate": "1980-05-17", "sex": "female" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn create_then_get_record() {
        let app = app();
        let id = create_record(&app).await;

        let response = app
            .oneshot(get_request(&format!("/records/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["patient"]["name"], "Maria da Silva");
        assert_eq!(body["lastUpdated"], body["createdAt"]);
    }

    #[tokio::test]
    async fn create_with_blank_name_is_bad_request() {
        let response = app()
            .oneshot(json_request("POST", "/records", json!({ "name": "  " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "MALFORMED_PAYLOAD");
    }

    #[tokio::test]
    async fn append_valid_medication() {
        let app = app();
        let id = create_record(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/records/{id}/medication"),
                medication(true),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["medications"].as_array().unwrap().len(), 1);
        assert_eq!(body["allergies"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn append_invalid_medication_reports_fields() {
        let app = app();
        let id = create_record(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/records/{id}/medication"),
                medication(false),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        assert!(body["error"]["fields"]["endDate"].is_string());

        let response = app
            .oneshot(get_request(&format!("/records/{id}")))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["medications"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn append_rejects_unknown_kind_and_missing_record() {
        let app = app();
        let id = create_record(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/records/{id}/prescription"),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let missing = prontuario_uuid::EntryId::new();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/records/{missing}/observation"),
                json!({ "text": "Retorno em 30 dias" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(get_request("/records/not-an-id"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn validate_endpoint_returns_result() {
        let response = app()
            .oneshot(json_request("POST", "/validate/medication", medication(false)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "invalid");
        assert!(body["errors"]["endDate"].is_string());

        let response = app()
            .oneshot(json_request("POST", "/validate/family-history", json!({
                "disease": "Diabetes tipo 2",
                "relationship": "Mãe",
            })))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body, json!({ "status": "valid" }));
    }

    #[tokio::test]
    async fn bmi_endpoint() {
        let response = app()
            .oneshot(get_request("/metrics/bmi?weightKg=70&heightCm=175"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["bmi"], 22.9);
        assert_eq!(body["class"], "normal");

        let response = app()
            .oneshot(get_request("/metrics/bmi?weightKg=70"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert!(body["bmi"].is_null());
    }
}
