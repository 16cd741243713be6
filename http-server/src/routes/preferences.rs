use axum::{
    extract::State,
    response::{Redirect, Response},
};

use super::run_intent;
use crate::{AppState, middleware::VisitorId, views::PageContext};

pub async fn accept_cookies(State(state): State<AppState>, visitor: VisitorId) -> Response {
    run_intent(&state, &visitor, PageContext::default(), |controller| {
        controller.accept_cookies()
    })
}

pub async fn decline_cookies(State(state): State<AppState>, visitor: VisitorId) -> Redirect {
    state.visitors.with_visitor(&visitor, |controller| {
        controller.decline_cookies();
        Redirect::to(controller.route().path())
    })
}

pub async fn toggle_theme(State(state): State<AppState>, visitor: VisitorId) -> Response {
    run_intent(&state, &visitor, PageContext::default(), |controller| {
        controller.toggle_theme().map(|_| ())
    })
}
