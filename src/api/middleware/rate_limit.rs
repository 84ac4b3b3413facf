use crate::AppState;
use crate::api::error::AppError;
use crate::services::rate_limiter::Admission;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

/// Identifies the caller: first `x-forwarded-for` hop, then the socket peer.
pub fn client_key(req: &Request) -> String {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "anonymous".to_string())
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return next.run(req).await;
    };

    let key = client_key(&req);
    match limiter.check(&key) {
        Admission::Allowed { .. } => next.run(req).await,
        Admission::Limited { retry_after_secs } => {
            tracing::warn!("🚦 Rate limit exceeded for {}", key);
            AppError::TooManyRequests { retry_after_secs }.into_response()
        }
    }
}
