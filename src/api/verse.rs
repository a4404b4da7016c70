//! Verse endpoint.

use axum::{extract::State, Json};

use crate::models::Verse;
use crate::AppState;

/// GET /api/verse/random - Pick a verse for the home page.
pub async fn random_verse(State(state): State<AppState>) -> Json<Verse> {
    Json(state.store.random_verse())
}
