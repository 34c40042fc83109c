//! Route definitions for the CareHub HTTP API.
//!
//! All routes are organized by resource group and mounted under `/api`.
//! Protected routes pass through bearer authentication first, then the
//! access policy declared next to each route.

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};

use carehub_auth::rbac::policies::*;

use crate::handlers;
use crate::middleware::Gated;
use crate::middleware::authenticate::authenticate;
use crate::state::AppState;

/// Build the `/api` router with every route, without ambient layers.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(account_routes())
        .merge(session_routes())
        .merge(hospital_routes())
        .merge(announcement_routes())
        .merge(appointment_routes())
        .merge(lab_order_routes())
        .merge(prescription_routes())
        .merge(treatment_plan_routes())
        .merge(discharge_routes())
        .merge(permission_routes())
        .merge(audit_routes())
        .merge(feature_flag_routes())
        .merge(notification_routes())
        .merge(invoice_routes())
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let api = Router::new().merge(public_routes()).merge(protected);

    Router::new().nest("/api", api).with_state(state)
}

/// Health check and the unauthenticated auth flows.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route(
            "/auth/password-reset/request",
            post(handlers::auth::request_password_reset),
        )
        .route(
            "/auth/password-reset/confirm",
            post(handlers::auth::confirm_password_reset),
        )
        .route(
            "/auth/username-reminder",
            post(handlers::auth::username_reminder),
        )
}

fn session_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(handlers::auth::me).gated(AUTHENTICATED))
}

fn account_routes() -> Router<AppState> {
    Router::new().route(
        "/accounts",
        post(handlers::account::create_account).gated(ACCOUNT_CREATE),
    )
}

fn hospital_routes() -> Router<AppState> {
    use handlers::hospital::*;

    Router::new()
        .route(
            "/hospitals",
            get(list_hospitals)
                .gated(AUTHENTICATED)
                .merge(post(create_hospital).gated(HOSPITAL_CREATE)),
        )
        .route(
            "/hospitals/import",
            post(import_hospitals).gated(HOSPITAL_IMPORT),
        )
        .route(
            "/hospitals/{id}",
            get(get_hospital)
                .gated(AUTHENTICATED)
                .merge(put(update_hospital).gated(HOSPITAL_UPDATE))
                .merge(delete(delete_hospital).gated(HOSPITAL_DELETE)),
        )
}

fn announcement_routes() -> Router<AppState> {
    use handlers::announcement::*;

    Router::new()
        .route(
            "/announcements",
            get(list_announcements)
                .gated(AUTHENTICATED)
                .merge(post(create_announcement).gated(ANNOUNCEMENT_MANAGE)),
        )
        .route(
            "/announcements/{id}",
            get(get_announcement)
                .gated(AUTHENTICATED)
                .merge(put(update_announcement).gated(ANNOUNCEMENT_MANAGE))
                .merge(delete(delete_announcement).gated(ANNOUNCEMENT_MANAGE)),
        )
}

fn appointment_routes() -> Router<AppState> {
    use handlers::appointment::*;

    Router::new()
        .route(
            "/appointments",
            get(list_appointments)
                .gated(APPOINTMENT_READ)
                .merge(post(create_appointment).gated(APPOINTMENT_CREATE)),
        )
        .route(
            "/appointments/{id}",
            get(get_appointment)
                .gated(APPOINTMENT_READ)
                .merge(delete(delete_appointment).gated(APPOINTMENT_DELETE)),
        )
        .route(
            "/appointments/{id}/status",
            put(change_status).gated(APPOINTMENT_STATUS),
        )
}

fn lab_order_routes() -> Router<AppState> {
    use handlers::lab_order::*;

    Router::new()
        .route(
            "/lab-orders",
            get(list_lab_orders)
                .gated(LAB_ORDER_READ)
                .merge(post(create_lab_order).gated(LAB_ORDER_CREATE)),
        )
        .route(
            "/lab-orders/export",
            get(export_lab_orders).gated(LAB_ORDER_EXPORT),
        )
        .route("/lab-orders/{id}", get(get_lab_order).gated(LAB_ORDER_READ))
        .route(
            "/lab-orders/{id}/result",
            put(record_result).gated(LAB_ORDER_RESULT),
        )
        .route(
            "/lab-orders/{id}/cancel",
            post(cancel_lab_order).gated(LAB_ORDER_CANCEL),
        )
}

fn prescription_routes() -> Router<AppState> {
    use handlers::prescription::*;

    Router::new()
        .route(
            "/prescriptions",
            get(list_prescriptions)
                .gated(PRESCRIPTION_READ)
                .merge(post(create_prescription).gated(PRESCRIPTION_WRITE)),
        )
        .route(
            "/prescriptions/{id}",
            get(get_prescription).gated(PRESCRIPTION_READ),
        )
        .route(
            "/prescriptions/{id}/discontinue",
            post(discontinue_prescription).gated(PRESCRIPTION_WRITE),
        )
}

fn treatment_plan_routes() -> Router<AppState> {
    use handlers::treatment_plan::*;

    Router::new()
        .route(
            "/treatment-plans",
            get(list_treatment_plans)
                .gated(TREATMENT_PLAN_READ)
                .merge(post(create_treatment_plan).gated(TREATMENT_PLAN_WRITE)),
        )
        .route(
            "/treatment-plans/{id}",
            get(get_treatment_plan)
                .gated(TREATMENT_PLAN_READ)
                .merge(put(update_treatment_plan).gated(TREATMENT_PLAN_WRITE))
                .merge(delete(delete_treatment_plan).gated(TREATMENT_PLAN_DELETE)),
        )
}

fn discharge_routes() -> Router<AppState> {
    use handlers::discharge::*;

    Router::new()
        .route(
            "/discharge-approvals",
            get(list_discharges)
                .gated(DISCHARGE_READ)
                .merge(post(request_discharge).gated(DISCHARGE_REQUEST)),
        )
        .route(
            "/discharge-approvals/{id}",
            get(get_discharge).gated(DISCHARGE_READ),
        )
        .route(
            "/discharge-approvals/{id}/approve",
            post(approve_discharge).gated(DISCHARGE_DECIDE),
        )
        .route(
            "/discharge-approvals/{id}/reject",
            post(reject_discharge).gated(DISCHARGE_DECIDE),
        )
}

fn permission_routes() -> Router<AppState> {
    use handlers::permission::*;

    Router::new()
        .route(
            "/permissions",
            get(list_permissions)
                .gated(PERMISSION_MANAGE)
                .merge(post(grant_permission).gated(PERMISSION_MANAGE)),
        )
        .route("/permissions/me", get(my_permissions).gated(AUTHENTICATED))
        .route(
            "/permissions/{id}",
            delete(revoke_permission).gated(PERMISSION_MANAGE),
        )
}

fn audit_routes() -> Router<AppState> {
    use handlers::audit::*;

    Router::new()
        .route("/audit-logs", get(list_audit_logs).gated(AUDIT_READ))
        .route("/audit-logs/events", post(record_event).gated(AUTHENTICATED))
        .route("/audit-logs/export", get(export_audit_logs).gated(AUDIT_READ))
}

fn feature_flag_routes() -> Router<AppState> {
    use handlers::feature_flag::*;

    Router::new()
        .route("/feature-flags", get(list_flags).gated(AUTHENTICATED))
        .route(
            "/feature-flags/{key}",
            put(set_flag)
                .gated(FEATURE_FLAG_MANAGE)
                .merge(delete(delete_flag).gated(FEATURE_FLAG_MANAGE)),
        )
        .route(
            "/feature-flags/{key}/evaluate",
            get(evaluate_flag).gated(AUTHENTICATED),
        )
}

fn notification_routes() -> Router<AppState> {
    use handlers::notification::*;

    Router::new()
        .route("/notifications", get(list_notifications).gated(AUTHENTICATED))
        .route(
            "/notifications/unread-count",
            get(unread_count).gated(AUTHENTICATED),
        )
        .route(
            "/notifications/read-all",
            put(mark_all_read).gated(AUTHENTICATED),
        )
        .route(
            "/notifications/{id}/read",
            put(mark_read).gated(AUTHENTICATED),
        )
        .route(
            "/notifications/{id}",
            delete(delete_notification).gated(AUTHENTICATED),
        )
}

fn invoice_routes() -> Router<AppState> {
    use handlers::invoice::*;

    Router::new()
        .route(
            "/invoices",
            get(list_invoices)
                .gated(INVOICE_READ)
                .merge(post(create_invoice).gated(INVOICE_CREATE)),
        )
        .route("/invoices/{id}", get(get_invoice).gated(INVOICE_READ))
        .route(
            "/invoices/{id}/send-to",
            post(send_invoice).gated(INVOICE_SEND),
        )
}
