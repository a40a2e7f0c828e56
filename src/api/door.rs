//! Door endpoints - the four operations the device and the operator use.
//!
//! Request bodies are read as raw bytes and parsed leniently: anything that
//! is not a JSON object counts as an empty object, so a malformed body fails
//! field validation (400) instead of being rejected by the extractor.

use crate::{
    core::{
        Relay,
        door::Command,
        gate::API_KEY_HEADER,
        relay::DoorSnapshot,
    },
    errors::Result,
};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Set Command confirmation echoing the normalized command.
#[derive(Debug, Serialize)]
pub struct CommandAccepted {
    /// Always `true`
    pub ok: bool,
    /// Command now in effect
    pub command: Command,
}

/// Post Status acknowledgement.
#[derive(Debug, Serialize)]
pub struct Ack {
    /// Always `true`
    pub ok: bool,
}

fn json_object(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn string_field<'a>(body: &'a Map<String, Value>, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// `GET /door/command` - bare token for the device.
pub async fn get_command(State(relay): State<Relay>) -> Result<impl IntoResponse> {
    let command = relay.current_command().await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        command.as_str(),
    ))
}

/// `POST /door/command` - operator sets the desired command.
pub async fn set_command(
    State(relay): State<Relay>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CommandAccepted>> {
    let token = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    let body = json_object(&body);
    let command = relay
        .set_command(token, string_field(&body, "command"))
        .await?;
    Ok(Json(CommandAccepted { ok: true, command }))
}

/// `POST /door/status` - device reports its observed state.
pub async fn post_status(State(relay): State<Relay>, body: Bytes) -> Result<Json<Ack>> {
    let body = json_object(&body);
    relay
        .report_status(string_field(&body, "state"), body.get("ts_ms"))
        .await?;
    Ok(Json(Ack { ok: true }))
}

/// `GET /door/status` - current command paired with the last report.
pub async fn get_status(State(relay): State<Relay>) -> Result<Json<DoorSnapshot>> {
    Ok(Json(relay.snapshot().await?))
}
