use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bolso_core::{Money, TransactionKind, TransactionRecord};
use bolso_import::import::classify_statement;
use bolso_import::StatementLayout;
use bolso_storage::{BudgetLimit, StoredTransaction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTransaction {
    pub description: String,
    pub amount: Money,
    /// Free text on the wire; anything outside {income, expense} is a 400.
    pub kind: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Users may type any category; when absent the classifier assigns one.
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub imported: u64,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Json(input): Json<CreateTransaction>,
) -> Result<impl IntoResponse> {
    let kind: TransactionKind = input
        .kind
        .parse()
        .map_err(|_| ApiError::InvalidKind(input.kind.clone()))?;

    if input.amount <= Money::zero() {
        return Err(ApiError::NonPositiveAmount);
    }

    let category = match input.category {
        Some(c) if !c.trim().is_empty() => c,
        _ => state.classifier.classify(&input.description, input.amount, kind),
    };

    let record = TransactionRecord {
        date: input.date.unwrap_or_else(|| chrono::Utc::now().date_naive()),
        description: input.description,
        amount: input.amount,
        kind,
        category,
    };

    let stored = bolso_storage::insert_transaction(&state.db, &record).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<StoredTransaction>>> {
    let transactions =
        bolso_storage::list_transactions(&state.db, params.skip, params.limit).await?;
    Ok(Json(transactions))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    if bolso_storage::delete_transaction(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::TransactionNotFound(id))
    }
}

/// One statement per call: the pipeline normalizes and classifies every
/// line it can, the batch goes to storage in one commit, and the response
/// carries the count of records that made it through. Malformed lines are
/// logged by the reader and simply missing from the count.
pub async fn import_statement(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportSummary>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;

        let records: Vec<TransactionRecord> = classify_statement(
            data.as_ref(),
            StatementLayout::default(),
            state.classifier.as_ref(),
        )
        .collect();

        let imported = bolso_storage::insert_statement_batch(&state.db, &records).await?;
        tracing::info!(imported, "statement import finished");
        return Ok(Json(ImportSummary { imported }));
    }

    Err(ApiError::MissingFilePart)
}

pub async fn list_budget_limits(
    State(state): State<AppState>,
) -> Result<Json<Vec<BudgetLimit>>> {
    let limits = bolso_storage::list_budget_limits(&state.db).await?;
    Ok(Json(limits))
}

pub async fn upsert_budget_limit(
    State(state): State<AppState>,
    Json(limit): Json<BudgetLimit>,
) -> Result<Json<BudgetLimit>> {
    if limit.monthly_limit <= Money::zero() {
        return Err(ApiError::NonPositiveAmount);
    }
    bolso_storage::upsert_budget_limit(&state.db, &limit).await?;
    Ok(Json(limit))
}

pub async fn delete_budget_limit(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<StatusCode> {
    if bolso_storage::delete_budget_limit(&state.db, &category).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::BudgetLimitNotFound(category))
    }
}
