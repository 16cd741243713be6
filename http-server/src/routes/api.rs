use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Serialize;
use vitrine::catalogue::CATEGORIES;
use vitrine::money::format_eur;
use vitrine::session::Session;
use vitrine::types::{Category, Game, Route};

use super::pages::CatalogueQuery;
use crate::{AppState, middleware::VisitorId};

// Games response
#[derive(Serialize)]
pub struct GamesResponse {
    pub success: bool,
    pub message: String,
    pub games: Vec<Game>,
}

// Session response
#[derive(Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub message: String,
    pub route: Route,
    pub session: Option<Session>,
    pub balance_display: Option<String>,
}

pub async fn get_categories() -> Json<Vec<Category>> {
    Json(CATEGORIES.to_vec())
}

pub async fn get_games(Query(query): Query<CatalogueQuery>) -> (StatusCode, Json<GamesResponse>) {
    match query.to_filter() {
        Ok(filter) => {
            let games: Vec<Game> = filter.apply().into_iter().copied().collect();
            let response = GamesResponse {
                success: true,
                message: format!("{} game(s)", games.len()),
                games,
            };
            (StatusCode::OK, Json(response))
        }
        Err(message) => (
            StatusCode::BAD_REQUEST,
            Json(GamesResponse {
                success: false,
                message,
                games: Vec::new(),
            }),
        ),
    }
}

pub async fn get_session(State(state): State<AppState>, visitor: VisitorId) -> Json<SessionResponse> {
    state.visitors.with_visitor(&visitor, |controller| {
        let session = controller.session().cloned();
        let response = SessionResponse {
            success: session.is_some(),
            message: match &session {
                Some(_) => "Session active".to_string(),
                None => "Aucune session".to_string(),
            },
            route: controller.route(),
            balance_display: session.as_ref().map(|s| format_eur(s.balance)),
            session,
        };
        Json(response)
    })
}
