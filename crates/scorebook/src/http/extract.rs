//! Request body extraction and the password guard.
//!
//! Clients send loosely-typed JSON: numbers as strings, booleans as `1`,
//! missing bodies. [`Body`] accepts all of it as a JSON object and the
//! coercion helpers below turn individual fields into what the roster expects.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use super::AppState;
use crate::error::Error;

/// A request body as a JSON object.
///
/// A missing body, a non-JSON content type, or a JSON value that is not an
/// object all read as `{}`. Malformed JSON is rejected.
#[derive(Debug, Clone, Default)]
pub struct Body(pub Map<String, Value>);

impl<S: Send + Sync> FromRequest<S> for Body {
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| {
                let mime = value.split(';').next().unwrap_or_default().trim();
                mime == "application/json" || mime.ends_with("+json")
            });

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::validation(format!("failed to read request body: {e}")))?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| Error::validation(format!("invalid JSON body: {e}")))?;
        Ok(match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        })
    }
}

impl Body {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A string field, untrimmed. Non-string values count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(Value::as_str).map(str::to_string)
    }

    /// A string field where any present value counts: non-strings become `""`.
    pub fn text_or_blank(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .map(|value| value.as_str().unwrap_or_default().to_string())
    }

    /// `password`, falling back to `currentPassword` when absent or null.
    pub fn password(&self) -> Option<&str> {
        ["password", "currentPassword"]
            .into_iter()
            .filter_map(|key| self.0.get(key))
            .find(|value| !value.is_null())
            .and_then(Value::as_str)
    }
}

/// A body whose `password` has been checked against the `{user_id}` path segment.
///
/// Must be the last extractor of a handler since it consumes the body.
#[derive(Debug)]
pub struct Guarded {
    pub user_id: String,
    pub body: Body,
}

impl FromRequest<AppState> for Guarded {
    type Rejection = Error;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map_err(|e| Error::validation(e.body_text()))?;
        let user_id = params.get("user_id").cloned().unwrap_or_default();

        let body = Body::from_request(Request::from_parts(parts, body), state).await?;
        state.roster.verify_password(&user_id, body.password()).await?;

        Ok(Self { user_id, body })
    }
}

/// Loose numeric coercion: `null` and blank strings are 0, booleans are 0/1,
/// numeric strings parse, everything else is NaN.
pub fn number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// A game statistic: the truncated number, or 0 when absent or not numeric.
pub fn stat(value: Option<&Value>) -> i64 {
    let n = value.map(number).unwrap_or(f64::NAN);
    if n.is_finite() {
        n.trunc() as i64
    } else {
        0
    }
}

pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// A match date in epoch ms, when the value coerces to a finite non-zero number.
pub fn date(value: Option<&Value>) -> Option<i64> {
    value
        .map(number)
        .filter(|n| n.is_finite() && *n != 0.0)
        .map(|n| n.trunc() as i64)
}

/// Graduation year as sent on create: absent or null means "no year".
pub fn year_on_create(value: Option<&Value>) -> Option<f64> {
    value.filter(|v| !v.is_null()).map(number)
}

/// Graduation year as sent on update: a present null is an invalid year.
pub fn year_on_update(value: Option<&Value>) -> Option<f64> {
    value.map(|v| if v.is_null() { f64::NAN } else { number(v) })
}
