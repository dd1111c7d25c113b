use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use movelead_core::{
    is_present, is_valid_email, is_valid_name, is_valid_phone, is_valid_zip, parse_iso_date,
    ZipPolicy,
};
use movelead_domain::{FieldError, ProxyPayload, ProxyRequest};

use super::upstream::strip_brands;
use super::{RelayError, RelayState};

pub async fn proxy(State(state): State<RelayState>, body: Bytes) -> Response {
    match relay_lead(&state, &body).await {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => err.into_response_with_detail(state.config.exposes_error_detail()),
    }
}

pub async fn healthz(State(state): State<RelayState>) -> Json<Value> {
    let mode = if state.upstream.is_simulated() {
        "simulated"
    } else {
        "live"
    };
    Json(json!({
        "status": "ok",
        "upstream": mode,
        "affiliates": state.config.use_affiliates,
    }))
}

async fn relay_lead(state: &RelayState, body: &[u8]) -> Result<Value, RelayError> {
    let request: ProxyRequest =
        serde_json::from_slice(body).map_err(RelayError::MalformedBody)?;

    let errors = validate_request(&request);
    if !errors.is_empty() {
        debug!(count = errors.len(), "lead failed field checks");
        return Err(RelayError::Invalid(errors));
    }

    let payload = ProxyPayload::new(
        state.config.credentials.clone(),
        state.config.test_mode,
        &request,
    );
    debug!(?payload, "payload for upstream");

    let mut reply = state.upstream.send(&payload).await?;
    if !state.config.use_affiliates {
        strip_brands(&mut reply);
    }
    Ok(reply)
}

/// Field checks on an inbound lead, in wire order. Contact fields are only
/// checked when the caller sent them.
pub fn validate_request(request: &ProxyRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut check = |field: &str, value: &str, ok: bool, message: &str| {
        if !ok {
            errors.push(FieldError::new(field, message).with_value(value));
        }
    };

    check(
        "zip_code",
        &request.zip_code,
        is_valid_zip(&request.zip_code, ZipPolicy::ZipPlusFour),
        "Invalid ZIP code.",
    );
    check(
        "move_to_zip_code",
        &request.move_to_zip_code,
        is_valid_zip(&request.move_to_zip_code, ZipPolicy::ZipPlusFour),
        "Invalid Move To ZIP code.",
    );
    check(
        "move_to_state",
        &request.move_to_state,
        is_present(&request.move_to_state),
        "Move to state is required.",
    );
    check(
        "move_date",
        &request.move_date,
        parse_iso_date(&request.move_date).is_some(),
        "Invalid move date.",
    );
    check(
        "moving_size",
        &request.moving_size,
        is_present(&request.moving_size),
        "Moving size is required.",
    );

    if let Some(first) = &request.first_name {
        check("first_name", first, is_valid_name(first), "Invalid first name.");
    }
    if let Some(last) = &request.last_name {
        check("last_name", last, is_valid_name(last), "Invalid last name.");
    }
    if let Some(phone) = &request.phone_number {
        check("phone_number", phone, is_valid_phone(phone), "Invalid phone number.");
    }
    if let Some(email) = &request.email_address {
        check("email_address", email, is_valid_email(email), "Invalid email address.");
    }
    errors
}
