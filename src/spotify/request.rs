//! Resilient request execution against the catalog API.
//!
//! Every catalog operation goes through [`send`], which classifies each
//! response into an explicit [`Outcome`] and drives the retry loop:
//!
//! - rate limits sleep for twice the server's `retry-after` hint and retry,
//!   not counted against any budget;
//! - authentication expiry delegates to the session manager and retries
//!   with the refreshed credential, not counted against the transient
//!   ceiling but bounded by its own recovery limit;
//! - transport failures and HTTP 500 sleep a short fixed interval and
//!   retry, both counted against a shared ten-attempt ceiling;
//! - any other non-2xx status is fatal and surfaces to the caller.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use tokio::time::sleep;

use crate::{Res, management::SharedSession, warning};

/// Upper bound on transient retries (network failures and 500s) for a
/// single logical request.
pub const RETRY_CEILING: u32 = 10;

/// 401 recoveries tolerated for one logical request. A token that
/// refreshes fine at the token endpoint but keeps getting rejected by the
/// API (revoked scope) must not loop forever.
pub const AUTH_RECOVERY_LIMIT: u32 = 5;

/// The provider's retry-after hint is not trusted at face value.
pub const RATE_LIMIT_MULTIPLIER: u64 = 2;

/// Sleep before retrying a failed connection or timed-out read.
pub const TRANSIENT_BACKOFF: Duration = Duration::from_secs(5);

/// Sleep before retrying an HTTP 500.
pub const SERVER_ERROR_BACKOFF: Duration = Duration::from_secs(3);

/// Classification of one catalog response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    RateLimited(u64),
    AuthExpired,
    ServerError,
    Fatal(u16),
}

/// Maps an HTTP status (plus the `retry-after` hint, when present) onto an
/// [`Outcome`]. A 429 without a usable hint backs off for one second.
pub fn classify(status: u16, retry_after: Option<u64>) -> Outcome {
    match status {
        200..=299 => Outcome::Success,
        401 => Outcome::AuthExpired,
        429 => Outcome::RateLimited(retry_after.unwrap_or(1)),
        500 => Outcome::ServerError,
        other => Outcome::Fatal(other),
    }
}

/// Sleep duration mandated by an outcome, when it calls for one.
pub fn backoff(outcome: &Outcome) -> Option<Duration> {
    match outcome {
        Outcome::RateLimited(secs) => Some(Duration::from_secs(secs * RATE_LIMIT_MULTIPLIER)),
        Outcome::ServerError => Some(SERVER_ERROR_BACKOFF),
        _ => None,
    }
}

fn retry_after_hint(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}

/// Executes one logical request, retrying according to the policy above
/// until it succeeds or becomes fatal.
///
/// `build` is invoked once per attempt with the client and the bearer token
/// currently held by the session, so a refreshed credential is picked up
/// transparently on the retry following a 401.
pub async fn send<F>(session: &SharedSession, build: F) -> Res<Response>
where
    F: Fn(&Client, &str) -> RequestBuilder,
{
    let client = Client::new();
    let mut attempts: u32 = 0;
    let mut auth_recoveries: u32 = 0;

    loop {
        let (token, generation) = session.bearer().await?;
        let response = match build(&client, &token).send().await {
            Ok(r) => r,
            Err(e) => {
                attempts += 1;
                if attempts >= RETRY_CEILING {
                    return Err(
                        format!("giving up after {} network failures: {}", attempts, e).into(),
                    );
                }
                warning!("Transient network failure, retrying: {}", e);
                sleep(TRANSIENT_BACKOFF).await;
                continue;
            }
        };

        let hint = retry_after_hint(&response);
        let outcome = classify(response.status().as_u16(), hint);
        match outcome {
            Outcome::Success => return Ok(response),
            Outcome::RateLimited(secs) => {
                warning!("Rate limit exceeded, sleeping for {} seconds", secs * RATE_LIMIT_MULTIPLIER);
                if let Some(delay) = backoff(&outcome) {
                    sleep(delay).await;
                }
            }
            Outcome::AuthExpired => {
                auth_recoveries += 1;
                if auth_recoveries > AUTH_RECOVERY_LIMIT {
                    return Err(format!(
                        "credential still rejected after {} refreshes",
                        AUTH_RECOVERY_LIMIT
                    )
                    .into());
                }
                session.recover_auth(generation).await?;
            }
            Outcome::ServerError => {
                attempts += 1;
                if attempts >= RETRY_CEILING {
                    return Err(format!("giving up after {} failed attempts", attempts).into());
                }
                if let Some(delay) = backoff(&outcome) {
                    sleep(delay).await;
                }
            }
            Outcome::Fatal(status) => {
                let body = response.text().await.unwrap_or_default();
                return Err(format!("catalog API returned status {}: {}", status, body).into());
            }
        }
    }
}
