//! Per-route authorization gate.
//!
//! Routes declare their [`AccessPolicy`] when the router is built; a single
//! middleware evaluates it before the handler and its extractors run, so a
//! rejected caller never reaches a resolver or a service.

use axum::extract::{Request, State};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use axum::routing::MethodRouter;

use carehub_auth::{AccessPolicy, CallerIdentity};
use carehub_core::error::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// Reject the request unless the authenticated caller satisfies `policy`.
pub async fn authorize(
    State(policy): State<AccessPolicy>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let caller = request
        .extensions()
        .get::<CallerIdentity>()
        .ok_or_else(|| AppError::authentication("Authentication required"))?;
    policy.evaluate(caller)?;
    Ok(next.run(request).await)
}

/// Attach an access policy to a method router.
pub trait Gated {
    fn gated(self, policy: AccessPolicy) -> Self;
}

impl Gated for MethodRouter<AppState> {
    fn gated(self, policy: AccessPolicy) -> Self {
        self.route_layer(from_fn_with_state(policy, authorize))
    }
}
