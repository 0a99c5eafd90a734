use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    admitted: u32,
}

/// Fixed-window limiter shared by every route of one router.
#[derive(Clone, Debug)]
pub struct RequestBudget {
    per_window: u32,
    window_len: Duration,
    window: Arc<Mutex<Window>>,
}

impl RequestBudget {
    pub fn new(per_window: u32, window_len: Duration) -> Self {
        Self {
            per_window: per_window.max(1),
            window_len,
            window: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                admitted: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Window> {
        match self.window.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// `Ok(())` when admitted, otherwise the time until the window reopens.
    fn try_admit(&self) -> Result<(), Duration> {
        let mut window = self.lock();
        let now = Instant::now();
        let elapsed = now.duration_since(window.opened_at);
        if elapsed >= self.window_len {
            window.opened_at = now;
            window.admitted = 0;
        }
        if window.admitted < self.per_window {
            window.admitted += 1;
            Ok(())
        } else {
            Err(self.window_len.saturating_sub(elapsed))
        }
    }
}

pub fn per_second(rps: u32) -> RequestBudget {
    RequestBudget::new(rps, Duration::from_secs(1))
}

pub async fn enforce_budget(
    State(budget): State<RequestBudget>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Err(wait) = budget.try_admit() {
        tracing::debug!(path = %req.uri().path(), "request rejected by rate limiter");
        let retry_after = wait.as_secs().max(1).to_string();
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_after)],
            Json(json!({"success": false, "error": "rate_limit_exceeded"})),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_up_to_budget_within_one_window() {
        let budget = RequestBudget::new(3, Duration::from_secs(60));
        assert!(budget.try_admit().is_ok());
        assert!(budget.try_admit().is_ok());
        assert!(budget.try_admit().is_ok());
        let wait = budget.try_admit().unwrap_err();
        assert!(wait <= Duration::from_secs(60));
    }

    #[test]
    fn zero_budget_still_admits_one_request() {
        let budget = RequestBudget::new(0, Duration::from_secs(60));
        assert!(budget.try_admit().is_ok());
        assert!(budget.try_admit().is_err());
    }

    #[test]
    fn window_reopens_after_its_length() {
        let budget = RequestBudget::new(1, Duration::from_millis(20));
        assert!(budget.try_admit().is_ok());
        assert!(budget.try_admit().is_err());
        std::thread::sleep(Duration::from_millis(30));
        assert!(budget.try_admit().is_ok());
    }
}
