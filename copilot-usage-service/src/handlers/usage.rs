//! Copilot usage endpoint.

use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use service_core::error::AppError;

use crate::{
    dtos::{parse_usage_request, UsageQuery},
    models::{OrgType, TransformedUsage},
    services::{
        github::{ClassifiedError, UpstreamErrorKind},
        metrics::{record_rejected_request, record_usage_fetch},
        transform_usage_data,
    },
    AppState,
};

const AUTH_FAILED_MESSAGE: &str = "Authentication failed, please check that the token is valid";

/// Fetch, aggregate and return Copilot usage for an organization or
/// enterprise.
///
/// The body is read as raw bytes so that a malformed payload is reported with
/// the same `{ "error": ... }` shape as every other failure.
pub async fn fetch_usage(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TransformedUsage>, AppError> {
    let query = parse_usage_request(&body).map_err(|e| {
        tracing::warn!(reason = %e, "Rejected usage request");
        record_rejected_request();
        AppError::BadRequest(anyhow::anyhow!(e))
    })?;

    tracing::info!(
        org_name = %query.org_name,
        org_type = %query.org_type,
        start_date = ?query.start_date,
        end_date = ?query.end_date,
        "Fetching Copilot usage"
    );

    let UsageQuery {
        token,
        org_name,
        org_type,
        start_date,
        end_date,
    } = query;

    let source = state.sources.create(token).map_err(|e| {
        tracing::error!(error = %e, "Failed to create usage source");
        AppError::InternalError(e)
    })?;

    let result = match org_type {
        OrgType::Organization => {
            source
                .fetch_org_usage(&org_name, start_date.as_deref(), end_date.as_deref())
                .await
        }
        OrgType::Enterprise => {
            source
                .fetch_enterprise_usage(&org_name, start_date.as_deref(), end_date.as_deref())
                .await
        }
    };

    let days = match result {
        Ok(days) => days,
        Err(err) => {
            record_usage_fetch(org_type, err.kind.as_str());
            tracing::warn!(
                org_name = %org_name,
                kind = err.kind.as_str(),
                status = ?err.status,
                "Upstream usage fetch failed"
            );
            return Err(upstream_error(err));
        }
    };

    record_usage_fetch(org_type, "success");

    Ok(Json(transform_usage_data(&days, Utc::now().date_naive())))
}

/// Only an authentication failure surfaces as 401; everything else from
/// GitHub, 404 included, is a 500 carrying the classified message.
fn upstream_error(err: ClassifiedError) -> AppError {
    match err.kind {
        UpstreamErrorKind::Auth => AppError::Unauthorized(anyhow::anyhow!(AUTH_FAILED_MESSAGE)),
        _ => AppError::UpstreamError(format!("Failed to fetch data: {}", err.message)),
    }
}
