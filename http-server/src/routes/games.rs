use axum::{
    Form,
    extract::{Path, State},
    response::{Redirect, Response},
};
use serde::Deserialize;
use vitrine::session::parse_deposit_amount;
use vitrine::types::Route;

use super::run_intent;
use crate::{AppState, middleware::VisitorId, views::PageContext};

// Deposit form; the amount arrives as typed
#[derive(Deserialize)]
pub struct DepositRequest {
    #[serde(default)]
    pub amount: String,
}

pub async fn play(
    State(state): State<AppState>,
    visitor: VisitorId,
    Path(game_id): Path<String>,
) -> Response {
    run_intent(&state, &visitor, PageContext::default(), |controller| {
        let outcome = controller.play(&game_id)?;
        tracing::debug!("Visitor {} play {}: {:?}", visitor.short(), game_id, outcome);
        Ok(())
    })
}

pub async fn close_game(State(state): State<AppState>, visitor: VisitorId) -> Redirect {
    state.visitors.with_visitor(&visitor, |controller| {
        controller.close_game();
        Redirect::to(controller.route().path())
    })
}

pub async fn deposit(
    State(state): State<AppState>,
    visitor: VisitorId,
    Form(payload): Form<DepositRequest>,
) -> Response {
    run_intent(&state, &visitor, PageContext::default(), |controller| {
        controller.navigate(Route::Deposit);
        let amount = parse_deposit_amount(&payload.amount)?;
        controller.deposit(amount).map(|_| ())
    })
}

pub async fn claim_bonus(State(state): State<AppState>, visitor: VisitorId) -> Response {
    run_intent(&state, &visitor, PageContext::default(), |controller| {
        controller.navigate(Route::Dashboard);
        controller.claim_bonus().map(|_| ())
    })
}

pub async fn hero_cta(State(state): State<AppState>, visitor: VisitorId) -> Redirect {
    state
        .visitors
        .with_visitor(&visitor, |controller| Redirect::to(controller.hero_cta().path()))
}
