use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::info;

use crate::{
    store::WaitlistRow,
    web::{
        types::{DeserSignup, ValidSignup},
        Error, WebResult,
    },
    AppState,
};

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<WaitlistRow>,
}

/// Adds a new entry to the waitlist.
///
/// The body is parsed by hand instead of through the `Json` extractor: a body that isn't a
/// JSON object is an internal error for this endpoint, not an extractor rejection.
#[tracing::instrument(name = "Adding a new waitlist entry", skip_all, fields(email = tracing::field::Empty))]
pub async fn join(
    State(app_state): State<AppState>,
    body: Bytes,
) -> WebResult<(StatusCode, Json<JoinResponse>)> {
    let signup: DeserSignup = serde_json::from_slice(&body)?;
    let signup = ValidSignup::try_from(signup)?;
    tracing::Span::current().record("email", signup.email.as_ref());

    let row = app_state.store.insert_entry(&signup.into_entry()).await?;
    info!("SUCCESS");

    Ok((
        StatusCode::CREATED,
        Json(JoinResponse {
            success: true,
            message: "Successfully added to waitlist!",
            data: row,
        }),
    ))
}

pub async fn method_not_allowed() -> WebResult<()> {
    Err(Error::MethodNotAllowed)
}
