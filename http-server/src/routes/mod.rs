pub mod api;
pub mod games;
pub mod pages;
pub mod preferences;
pub mod users;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use vitrine::VitrineError;

use crate::{
    AppState,
    middleware::VisitorId,
    models::VisitorController,
    views::{PageContext, render},
};

pub fn status_for(error: &VitrineError) -> StatusCode {
    match error {
        VitrineError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        VitrineError::InvalidCredentials | VitrineError::NotLoggedIn => StatusCode::UNAUTHORIZED,
        VitrineError::DuplicateEmail => StatusCode::CONFLICT,
        VitrineError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        VitrineError::AccountNotFound(_) => StatusCode::NOT_FOUND,
    }
}

/// Runs one intent against the visitor's controller.
///
/// Success redirects to the page the controller ended on. Failure re-renders
/// that page with the error shown inline.
pub fn run_intent<F>(state: &AppState, visitor: &VisitorId, ctx: PageContext<'_>, intent: F) -> Response
where
    F: FnOnce(&mut VisitorController) -> vitrine::Result<()>,
{
    state.visitors.with_visitor(visitor, |controller| match intent(controller) {
        Ok(()) => Redirect::to(controller.route().path()).into_response(),
        Err(e) => {
            tracing::info!("Visitor {} intent failed: {}", visitor.short(), e);
            let message = e.to_string();
            let ctx = PageContext {
                filter: ctx.filter,
                error: Some(&message),
                email: ctx.email,
                display_name: ctx.display_name,
            };
            (status_for(&e), Html(render(controller, &ctx))).into_response()
        }
    })
}
