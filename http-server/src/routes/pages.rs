use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use vitrine::catalogue::CatalogueFilter;
use vitrine::types::{CategoryId, Route};

use crate::{
    AppState,
    middleware::VisitorId,
    views::{PageContext, render},
};

// Catalogue query parameters
#[derive(Debug, Default, Deserialize)]
pub struct CatalogueQuery {
    pub cat: Option<String>,
    pub q: Option<String>,
}

impl CatalogueQuery {
    pub fn to_filter(&self) -> Result<CatalogueFilter, String> {
        let category = match self.cat.as_deref() {
            None | Some("") => CategoryId::Pop,
            Some(raw) => raw.parse()?,
        };
        Ok(CatalogueFilter::new(
            category,
            self.q.clone().unwrap_or_default(),
        ))
    }
}

fn show(state: &AppState, visitor: &VisitorId, route: Route, filter: CatalogueFilter) -> Html<String> {
    state.visitors.with_visitor(visitor, |controller| {
        controller.navigate(route);
        let ctx = PageContext {
            filter,
            ..Default::default()
        };
        Html(render(controller, &ctx))
    })
}

fn catalogue_filter(query: &CatalogueQuery) -> CatalogueFilter {
    query.to_filter().unwrap_or_else(|e| {
        tracing::warn!("{}; showing all games", e);
        CatalogueFilter::default()
    })
}

pub async fn home(
    State(state): State<AppState>,
    visitor: VisitorId,
    Query(query): Query<CatalogueQuery>,
) -> Html<String> {
    show(&state, &visitor, Route::Home, catalogue_filter(&query))
}

pub async fn casino(
    State(state): State<AppState>,
    visitor: VisitorId,
    Query(query): Query<CatalogueQuery>,
) -> Html<String> {
    show(&state, &visitor, Route::Casino, catalogue_filter(&query))
}

pub async fn promos(State(state): State<AppState>, visitor: VisitorId) -> Html<String> {
    show(&state, &visitor, Route::Promos, CatalogueFilter::default())
}

pub async fn dashboard(State(state): State<AppState>, visitor: VisitorId) -> Html<String> {
    show(&state, &visitor, Route::Dashboard, CatalogueFilter::default())
}

pub async fn login(State(state): State<AppState>, visitor: VisitorId) -> Html<String> {
    show(&state, &visitor, Route::Login, CatalogueFilter::default())
}

pub async fn register(State(state): State<AppState>, visitor: VisitorId) -> Html<String> {
    show(&state, &visitor, Route::Register, CatalogueFilter::default())
}

pub async fn deposit(State(state): State<AppState>, visitor: VisitorId) -> Html<String> {
    show(&state, &visitor, Route::Deposit, CatalogueFilter::default())
}
