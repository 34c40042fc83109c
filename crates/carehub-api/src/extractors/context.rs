//! Request context extractors.
//!
//! [`Meta`] is available on every route. [`AuthContext`] and
//! [`HospitalContext`] require the identity stored by the authentication
//! middleware and run after the route's authorization gate.

use std::net::SocketAddr;
use std::ops::Deref;

use axum::extract::{ConnectInfo, FromRequestParts, Query};
use axum::http::HeaderMap;
use axum::http::header::{ACCEPT_LANGUAGE, USER_AGENT};
use axum::http::request::Parts;
use serde::Deserialize;
use uuid::Uuid;

use carehub_auth::{Authority, CallerIdentity};
use carehub_core::error::{AppError, ErrorKind};
use carehub_core::types::Locale;
use carehub_service::account::HOSPITAL_CLAIM;
use carehub_service::context::missing_hospital_context;
use carehub_service::{ActingAs, RequestContext, RequestMeta};

use crate::context::{
    ACT_AS_HEADER, HOSPITAL_HEADER, HospitalInputs, ROLE_CODE_HEADER, resolve_client_ip,
    resolve_hospital, resolve_locale,
};
use crate::error::ApiError;
use crate::state::AppState;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Locale, client IP and user agent of the request.
#[derive(Debug, Clone)]
pub struct Meta(pub RequestMeta);

impl Meta {
    fn from_parts(parts: &Parts) -> RequestMeta {
        let remote = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        RequestMeta::new(
            resolve_locale(
                parts.extensions.get::<Locale>(),
                header(&parts.headers, ACCEPT_LANGUAGE.as_str()),
            ),
            resolve_client_ip(
                None,
                header(&parts.headers, "x-forwarded-for"),
                header(&parts.headers, "x-real-ip"),
                &remote,
            ),
            header(&parts.headers, USER_AGENT.as_str()).map(String::from),
        )
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Meta {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Self::from_parts(parts)))
    }
}

/// Authenticated context without hospital scope.
#[derive(Debug, Clone)]
pub struct AuthContext(pub RequestContext);

impl Deref for AuthContext {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AuthContext {
    fn from_parts(parts: &Parts) -> Result<RequestContext, AppError> {
        let identity = parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::authentication("Authentication required"))?;

        let requested = header(&parts.headers, ACT_AS_HEADER)
            .map(str::parse::<ActingAs>)
            .transpose()?;
        let acting_as = ActingAs::for_caller(requested, &identity)?;

        let active_role = match header(&parts.headers, ROLE_CODE_HEADER) {
            Some(raw) => {
                let role = raw.parse::<Authority>()?;
                if !identity.has_authority(role) {
                    return Err(AppError::authorization("Access is denied"));
                }
                Some(role)
            }
            None => None,
        };

        let mut ctx = RequestContext::new(identity, Meta::from_parts(parts));
        ctx.acting_as = acting_as;
        ctx.active_role = active_role;
        Ok(ctx)
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(Self::from_parts(parts)?))
    }
}

#[derive(Debug, Default, Deserialize)]
struct HospitalQueryParam {
    #[serde(rename = "hospitalId")]
    hospital_id: Option<String>,
}

/// Authenticated context scoped to a resolved hospital.
#[derive(Debug, Clone)]
pub struct HospitalContext(pub RequestContext);

impl Deref for HospitalContext {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl HospitalContext {
    /// `Ok(None)` when no channel supplied a hospital.
    fn resolve(
        parts: &Parts,
        state: &AppState,
        ctx: &RequestContext,
    ) -> Result<Option<Uuid>, AppError> {
        let query = Query::<HospitalQueryParam>::try_from_uri(&parts.uri)
            .map(|Query(q)| q)
            .unwrap_or_default();
        let inputs = HospitalInputs {
            query: query.hospital_id.as_deref(),
            header: header(&parts.headers, HOSPITAL_HEADER),
            claim: ctx.identity.claim(HOSPITAL_CLAIM),
            assignments: &ctx.identity.assigned_hospitals,
        };

        // A patient's hospital comes from their token, never from the request.
        let explicit = [inputs.query, inputs.header]
            .into_iter()
            .flatten()
            .any(|v| !v.trim().is_empty());
        if ctx.is_acting_as_patient() && explicit {
            return Err(AppError::authorization(
                "A patient cannot select the hospital explicitly",
            ));
        }

        let (hospital_id, source) = match resolve_hospital(&inputs) {
            Ok(resolved) => resolved,
            Err(err) if err.kind == ErrorKind::Authorization => return Ok(None),
            Err(err) => return Err(err),
        };

        let identity = &ctx.identity;
        if state.config.tenancy.enforce_membership
            && !identity.assigned_hospitals.is_empty()
            && !identity.is_super_admin()
            && !identity.assigned_hospitals.contains(&hospital_id)
        {
            tracing::warn!(
                subject = %identity.subject,
                hospital_id = %hospital_id,
                ?source,
                "Hospital outside the caller's assignments"
            );
            return Err(AppError::authorization("Access is denied"));
        }

        Ok(Some(hospital_id))
    }
}

impl FromRequestParts<AppState> for HospitalContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_parts(parts)?;
        let hospital_id =
            Self::resolve(parts, state, &ctx)?.ok_or_else(missing_hospital_context)?;
        Ok(Self(ctx.scoped_to(hospital_id)))
    }
}

/// Context scoped to a hospital when one resolves, unscoped otherwise.
///
/// For routes whose service decides what an unscoped caller may see.
#[derive(Debug, Clone)]
pub struct OptionalHospitalContext(pub RequestContext);

impl Deref for OptionalHospitalContext {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for OptionalHospitalContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_parts(parts)?;
        Ok(Self(match HospitalContext::resolve(parts, state, &ctx)? {
            Some(hospital_id) => ctx.scoped_to(hospital_id),
            None => ctx,
        }))
    }
}
