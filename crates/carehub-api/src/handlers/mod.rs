//! HTTP handlers, one module per resource group.
//!
//! Every handler binds its inputs, calls exactly one service method and maps
//! the result to a status code and body.

pub mod account;
pub mod announcement;
pub mod appointment;
pub mod audit;
pub mod auth;
pub mod discharge;
pub mod feature_flag;
pub mod health;
pub mod hospital;
pub mod invoice;
pub mod lab_order;
pub mod notification;
pub mod permission;
pub mod prescription;
pub mod treatment_plan;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

use carehub_service::ExportDocument;

/// Binary download with `Content-Disposition: attachment`.
pub(crate) fn attachment(document: ExportDocument) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    (
        [
            (CONTENT_TYPE, document.content_type.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response()
}
