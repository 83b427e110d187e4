use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id of the current request, available as an `Extension`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Counter for one fixed window.
#[derive(Debug)]
struct FixedWindow {
    opened: Instant,
    admitted: usize,
}

impl FixedWindow {
    /// Admits one request, or returns how long until the window reopens.
    fn admit(&mut self, now: Instant, len: Duration, cap: usize) -> Result<(), Duration> {
        let elapsed = now.saturating_duration_since(self.opened);
        if elapsed >= len {
            self.opened = now;
            self.admitted = 0;
        }
        if self.admitted >= cap {
            return Err(len.saturating_sub(elapsed));
        }
        self.admitted += 1;
        Ok(())
    }
}

/// Fixed-window limiter in front of `/api/coffee`.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    cap: usize,
    len: Duration,
    window: Arc<Mutex<FixedWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(cap: usize, len: Duration) -> Self {
        Self {
            cap,
            len,
            window: Arc::new(Mutex::new(FixedWindow {
                opened: Instant::now(),
                admitted: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(cap: usize) -> Self {
        Self::new(cap, Duration::from_secs(60))
    }
}

#[derive(Serialize)]
struct RejectionBody {
    error: Rejection,
}

#[derive(Serialize)]
struct Rejection {
    code: &'static str,
    message: &'static str,
}

fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToOwned::to_owned)
}

/// Tags every request with an id: the caller's `x-request-id` if it sent one,
/// otherwise a fresh UUID v4. The id is echoed on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = incoming_request_id(req.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

/// Rejects requests beyond the window cap with `429` and a `Retry-After` hint.
pub async fn enforce_rate_limit(
    State(limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let verdict = limit
        .window
        .lock()
        .await
        .admit(Instant::now(), limit.len, limit.cap);

    match verdict {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            let retry_after = wait.as_secs().max(1);
            tracing::warn!(path = %req.uri().path(), retry_after, "rate limit exceeded");
            let body = Json(RejectionBody {
                error: Rejection {
                    code: "rate_limited",
                    message: "too many requests, slow down",
                },
            });
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, retry_after.to_string())],
                body,
            )
                .into_response()
        }
    }
}
