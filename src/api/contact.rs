//! Contact form endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use super::{created, ApiResult, Created};
use crate::errors::AppError;
use crate::models::ContactSubmission;
use crate::validation::validate_contact;
use crate::AppState;

/// POST /api/contact - Validate and store a contact or join request.
pub async fn create_contact(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Created<ContactSubmission>> {
    let Json(raw) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let contact = validate_contact(&raw).map_err(|err| {
        tracing::debug!(violations = err.violations.len(), "contact submission rejected");
        AppError::from(err)
    })?;

    let submission = state.store.create_contact_submission(contact).await?;
    tracing::info!(
        submission_id = %submission.id,
        interest = %submission.interest,
        volunteer = submission.volunteer,
        "contact submission stored"
    );

    created(submission)
}

/// GET /api/contact - List every stored submission.
pub async fn list_contacts(State(state): State<AppState>) -> ApiResult<Json<Vec<ContactSubmission>>> {
    let submissions = state.store.list_contact_submissions().await?;
    Ok(Json(submissions))
}
