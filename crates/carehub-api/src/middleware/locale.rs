//! Locale negotiation scope.

use axum::extract::Request;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::middleware::Next;
use axum::response::Response;

use carehub_core::types::Locale;

use crate::context::resolve_locale;
use crate::i18n;

/// Negotiate the locale once (an upstream `Locale` extension wins) and keep it in scope for the whole request,
/// error rendering included.
pub async fn locale_scope(request: Request, next: Next) -> Response {
    let locale = resolve_locale(
        request.extensions().get::<Locale>(),
        request
            .headers()
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok()),
    );
    i18n::with_locale(locale, next.run(request)).await
}
