/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::warn;
use reqwest::blocking::Client;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::TransportConfig;
use crate::shared::{Payload, ServerResponse};

/***************************************/
/*             Public API              */
/***************************************/

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("submission to {endpoint} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        endpoint: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
}

/// One request/response exchange per turn. The session never has more than
/// one submission in flight, so implementations can block.
pub trait Transport {
    fn submit(&self, endpoint: &str, payload: &Payload) -> Result<ServerResponse, TransportError>;
}

/**
 * HTTP transport for the simulation service.
 *
 * Serializes the payload as a JSON POST body and deserializes the JSON
 * response. Transport-level failures (connect, timeout, non-2xx status,
 * malformed body) are retried with exponential backoff up to the configured
 * bound; exhaustion surfaces as `TransportError::RetriesExhausted`, which the
 * session treats as a fatal run abort.
 *
 * # Fields
 * - `client`:        reqwest blocking client with the per-request timeout.
 * - `max_retries`:   retries after the first attempt before giving up.
 * - `backoff_base`:  first retry delay; doubles on every further retry.
 */
pub struct HttpTransport {
    client: Client,
    max_retries: u32,
    backoff_base: Duration,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<HttpTransport, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(TransportError::Build)?;

        Ok(HttpTransport {
            client,
            max_retries: config.max_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        })
    }

    fn try_submit(&self, endpoint: &str, payload: &Payload) -> Result<ServerResponse, reqwest::Error> {
        let response = self
            .client
            .post(endpoint)
            .json(payload)
            .send()?
            .error_for_status()?;
        response.json::<ServerResponse>()
    }
}

impl Transport for HttpTransport {
    fn submit(&self, endpoint: &str, payload: &Payload) -> Result<ServerResponse, TransportError> {
        let mut attempt = 0;
        loop {
            match self.try_submit(endpoint, payload) {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.max_retries => {
                    let delay = backoff_delay(self.backoff_base, attempt);
                    warn!(
                        "Submission to {} failed ({}), retrying in {:?}",
                        endpoint, e, delay
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(TransportError::RetriesExhausted {
                        endpoint: endpoint.to_string(),
                        attempts: attempt + 1,
                        source: e,
                    })
                }
            }
        }
    }
}

/// Exponential backoff schedule: `base * 2^attempt`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt)
}
