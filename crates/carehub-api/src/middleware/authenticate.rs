//! Bearer-token authentication for the protected router.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use carehub_auth::CallerIdentity;
use carehub_core::error::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// Validates the access token and stores the [`CallerIdentity`] in the
/// request extensions. Staff assignments are loaded here so the context
/// resolvers stay free of I/O.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let Authorization(bearer) = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::authentication("Missing or malformed bearer token"))?;

    let claims = state.jwt_decoder.decode_access_token(bearer.token())?;
    let assigned = state.account_service.assigned_hospitals(claims.sub).await?;
    let identity = CallerIdentity::from_claims(claims, assigned);

    tracing::debug!(subject = %identity.subject, "Authenticated request");
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
