//! Localized message catalog for error titles.
//!
//! The negotiated locale travels in a task-local set by
//! [`crate::middleware::locale::locale_scope`], so error rendering can pick a
//! title without threading the locale through every handler.

use std::future::Future;

use carehub_core::error::ErrorKind;
use carehub_core::types::Locale;

tokio::task_local! {
    static REQUEST_LOCALE: Locale;
}

/// Run `fut` with `locale` as the request locale.
pub async fn with_locale<F: Future>(locale: Locale, fut: F) -> F::Output {
    REQUEST_LOCALE.scope(locale, fut).await
}

/// Locale of the request being served, or the default outside a scope.
pub fn current_locale() -> Locale {
    REQUEST_LOCALE
        .try_with(Clone::clone)
        .unwrap_or_default()
}

/// Short, human-readable title for an error kind.
///
/// Unknown languages fall back to English.
pub fn title(kind: ErrorKind, locale: &Locale) -> &'static str {
    match locale.language.as_str() {
        "fr" => title_fr(kind),
        "es" => title_es(kind),
        _ => title_en(kind),
    }
}

fn title_en(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "Resource not found",
        ErrorKind::Authentication => "Authentication required",
        ErrorKind::Authorization => "Access denied",
        ErrorKind::Validation => "Invalid request",
        ErrorKind::Conflict => "Conflict with current state",
        ErrorKind::ServiceUnavailable => "Service unavailable",
        _ => "Internal server error",
    }
}

fn title_fr(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "Ressource introuvable",
        ErrorKind::Authentication => "Authentification requise",
        ErrorKind::Authorization => "Accès refusé",
        ErrorKind::Validation => "Requête invalide",
        ErrorKind::Conflict => "Conflit avec l'état actuel",
        ErrorKind::ServiceUnavailable => "Service indisponible",
        _ => "Erreur interne du serveur",
    }
}

fn title_es(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "Recurso no encontrado",
        ErrorKind::Authentication => "Autenticación requerida",
        ErrorKind::Authorization => "Acceso denegado",
        ErrorKind::Validation => "Solicitud no válida",
        ErrorKind::Conflict => "Conflicto con el estado actual",
        ErrorKind::ServiceUnavailable => "Servicio no disponible",
        _ => "Error interno del servidor",
    }
}
