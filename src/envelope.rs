//! Uniform JSON envelope returned by every endpoint.
//!
//! - success with data: `{"data":...,"error":0}`
//! - success without data: `{"error":0,"msg":"ok"}`
//! - failure: `{"error":1,"msg":"..."}` (rendered by [`ApiError`])

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::errors::ApiError;

const SUCCESS: u8 = 0;
const FAILURE: u8 = 1;

#[derive(Serialize)]
struct Data<'a, T> {
    data: &'a T,
    error: u8,
}

#[derive(Serialize)]
struct Message<'a> {
    error: u8,
    msg: &'a str,
}

/// Failure body, `{"error":1,"msg":...}`.
#[derive(Serialize)]
pub(crate) struct Failure<'a>(Message<'a>);

impl<'a> Failure<'a> {
    pub(crate) fn new(msg: &'a str) -> Self {
        Self(Message {
            error: FAILURE,
            msg,
        })
    }
}

/// A serialized success envelope, ready to be written as the response body.
#[derive(Debug, Clone)]
pub struct Reply(Vec<u8>);

impl Reply {
    /// Wrap `data` as `{"data":...,"error":0}`.
    ///
    /// Field order of `data` is preserved as serialized.
    ///
    /// # Errors
    ///
    /// Returns an internal error if `data` fails to serialize.
    pub fn data<T: Serialize>(data: &T) -> Result<Self, ApiError> {
        serde_json::to_vec(&Data {
            data,
            error: SUCCESS,
        })
        .map(Self)
        .map_err(|err| ApiError::internal("Failed to encode response", Some(err.to_string())))
    }

    /// `{"error":0,"msg":"ok"}`
    #[must_use]
    pub fn ok() -> Self {
        Self(br#"{"error":0,"msg":"ok"}"#.to_vec())
    }

    /// Raw JSON bytes of the envelope.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            self.0,
        )
            .into_response()
    }
}
