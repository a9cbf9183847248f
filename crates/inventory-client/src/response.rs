//! Translation of HTTP exchanges into typed results.
//!
//! A 2xx response either decodes into the requested type or is accepted
//! without looking at the body. Anything else must carry the service's error
//! envelope, which becomes a remote error chosen by the HTTP status.

use inventory_core::error::ErrorEnvelope;
use inventory_core::{ApiError, Error, Result};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// A completed request: what was asked and what came back.
#[derive(Debug, Clone)]
pub struct Exchange {
    method: Method,
    path: String,
    status: StatusCode,
    body: Vec<u8>,
}

impl Exchange {
    /// Record a completed exchange.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        status: StatusCode,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            status,
            body: body.into(),
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Decode a successful response body as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if a 2xx body does not decode as
    /// `T`, or the remote error for any other status.
    pub fn decode<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if !self.status.is_success() {
            return Err(self.into_error());
        }

        let decoded = if self.body.is_empty() {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_slice(&self.body)
        };
        decoded.map_err(|err| {
            Error::MalformedResponse(format!(
                "unable to decode response to {} {}: {err}",
                self.method, self.path
            ))
        })
    }

    /// Accept a successful response without decoding its body.
    ///
    /// # Errors
    ///
    /// Returns the remote error for any non-2xx status.
    pub fn discard(self) -> Result<()> {
        if self.status.is_success() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    fn into_error(self) -> Error {
        let http_status = self.status.as_u16();
        match serde_json::from_slice::<ErrorEnvelope>(&self.body) {
            Ok(envelope) => {
                debug!(
                    method = %self.method,
                    path = %self.path,
                    http_status,
                    status = %envelope.status,
                    "inventory request rejected"
                );
                Error::from_status(ApiError::new(
                    self.method.as_str(),
                    self.path,
                    http_status,
                    envelope,
                ))
            }
            Err(err) => Error::MalformedErrorResponse {
                http_status,
                message: format!(
                    "unable to decode error response to {} {}: {err}",
                    self.method, self.path
                ),
            },
        }
    }
}
