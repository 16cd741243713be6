use axum::{
    Form,
    extract::State,
    response::Response,
};
use serde::Deserialize;
use vitrine::types::Route;

use super::run_intent;
use crate::{AppState, middleware::VisitorId, views::PageContext};

// Login form
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Registration form
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
}

pub async fn login(
    State(state): State<AppState>,
    visitor: VisitorId,
    Form(payload): Form<LoginRequest>,
) -> Response {
    let ctx = PageContext {
        email: &payload.email,
        ..Default::default()
    };
    run_intent(&state, &visitor, ctx, |controller| {
        controller.navigate(Route::Login);
        controller
            .login(&payload.email, &payload.password)
            .map(|_| ())
    })
}

pub async fn register(
    State(state): State<AppState>,
    visitor: VisitorId,
    Form(payload): Form<RegisterRequest>,
) -> Response {
    let ctx = PageContext {
        email: &payload.email,
        display_name: &payload.display_name,
        ..Default::default()
    };
    run_intent(&state, &visitor, ctx, |controller| {
        controller.navigate(Route::Register);
        controller
            .register(&payload.email, &payload.password, &payload.display_name)
            .map(|_| ())
    })
}

pub async fn logout(State(state): State<AppState>, visitor: VisitorId) -> Response {
    run_intent(&state, &visitor, PageContext::default(), |controller| {
        controller.logout()
    })
}
