use std::fmt::Write;
use vitrine::catalogue::{CATEGORIES, CatalogueFilter, PROMOTIONS};
use vitrine::money::format_eur;
use vitrine::session::{CLAIM_AMOUNT, Session};
use vitrine::types::{Game, Route};

use super::{PageContext, escape};

pub fn hero() -> String {
    String::from(
        r##"<section class="hero"><h1>Bienvenue au <span class="gold">Casino Vitrine</span></h1><p>Ambiance VIP, jackpots, et une expérience fluide sur tous vos appareils.</p><div class="actions"><form method="post" action="/cta"><button class="button primary">Commencer</button></form><a class="button outline" href="#games">Voir les jeux</a></div></section>"##,
    )
}

/// The catalogue: category buttons, title search and one card per game.
///
/// Category buttons and the search box are plain GET forms on `route`, so the
/// current filter lives in the query string.
pub fn games_grid(filter: &CatalogueFilter, route: Route) -> String {
    let action = route.path();
    let query = escape(&filter.query);

    let mut html = String::from(
        r#"<section id="games"><div class="categories"><h2>Catalogue</h2>"#,
    );
    for category in CATEGORIES {
        let class = if category.id == filter.category {
            "button primary"
        } else {
            "button outline"
        };
        let _ = write!(
            html,
            r#"<form method="get" action="{action}#games"><input type="hidden" name="cat" value="{id}"><input type="hidden" name="q" value="{query}"><button class="{class}">{label}</button></form>"#,
            id = category.id,
            label = escape(category.label),
        );
    }
    let _ = write!(
        html,
        r#"</div><form method="get" action="{action}#games" class="search"><input type="hidden" name="cat" value="{cat}"><label><span>Rechercher un jeu</span><input type="search" name="q" placeholder="Ex: Roulette, Fruits…" value="{query}"></label></form><div class="grid">"#,
        cat = filter.category,
    );

    let games = filter.apply();
    if games.is_empty() {
        html.push_str(r#"<p class="meta">Aucun jeu ne correspond à votre recherche.</p>"#);
    }
    for game in games {
        html.push_str(&game_card(game));
    }
    html.push_str("</div></section>");
    html
}

fn game_card(game: &Game) -> String {
    format!(
        r#"<div class="card"><img src="{image}" alt="{title}"><div class="actions"><strong>{title}</strong><span class="badge">{provider}</span></div><div class="meta">RTP {rtp}% · Volatilité {volatility}</div><form method="post" action="/play/{id}"><button class="button primary">Jouer</button></form></div>"#,
        image = escape(game.image),
        title = escape(game.title),
        provider = escape(game.provider),
        rtp = game.rtp,
        volatility = escape(game.volatility),
        id = game.id,
    )
}

pub fn promotions() -> String {
    let mut html = String::from(r#"<section><h2>Promotions</h2><div class="grid">"#);
    for promo in PROMOTIONS {
        let _ = write!(
            html,
            r##"<div class="card"><div class="gold"><strong>{}</strong></div><p>{}</p><a class="button primary" href="#top">Déposer</a></div>"##,
            escape(promo.title),
            escape(promo.text)
        );
    }
    html.push_str("</div></section>");
    html
}

pub fn dashboard(session: Option<&Session>) -> String {
    let Some(session) = session else {
        return String::from(r#"<div class="card">Veuillez vous connecter.</div>"#);
    };
    format!(
        r#"<section><h2>Tableau de bord</h2><div class="grid"><div class="card"><div class="meta">Solde</div><div class="gold"><strong>{balance}</strong></div><form method="post" action="/dashboard/claim"><button class="button primary">Réclamer +{claim}</button></form></div><div class="card"><div class="meta">Compte</div><strong>{name}</strong><div class="meta">{email}</div><div class="meta">Créé le {created}</div></div><div class="card"><div class="meta">Actions</div><div class="actions"><button class="button outline" type="button">Vérifier</button><button class="button outline" type="button">Historique</button></div></div></div></section>"#,
        balance = format_eur(session.balance),
        claim = CLAIM_AMOUNT,
        name = escape(&session.display_name),
        email = escape(&session.email),
        created = session.created_at.format("%d/%m/%Y"),
    )
}

/// Shown when a signed-in visitor without a deposit tries to play.
pub fn deposit_gate(game: Option<&Game>, session: Option<&Session>, error: Option<&str>) -> String {
    let title = escape(game.map(|g| g.title).unwrap_or("ce jeu"));
    let image = game
        .map(|g| format!(r#"<img src="{}" alt="{}">"#, escape(g.image), escape(g.title)))
        .unwrap_or_default();
    let error = error
        .map(|e| format!(r#"<div class="error">{}</div>"#, escape(e)))
        .unwrap_or_default();
    let balance = format_eur(session.map(|s| s.balance).unwrap_or(0));

    format!(
        r#"<section class="card">{image}<h2>Dépôt requis</h2><p>Vous ne pouvez pas jouer à <strong>{title}</strong> tant que vous n’avez pas effectué un dépôt.</p><div class="bonus"><div class="gold"><strong>Bonus de bienvenue 100%</strong></div><div>Votre premier dépôt est <strong>doublé</strong> automatiquement.</div></div><form method="post" action="/deposit"><label><span>Montant du dépôt (€)</span><input type="number" name="amount" min="1" step="1" placeholder="Ex: 50" required></label>{error}<div class="actions"><button class="button primary">Déposer et jouer</button><a class="button outline" href="/casino">Retour</a></div></form><p class="meta">Solde actuel: <span class="gold">{balance}</span></p></section>"#
    )
}

pub fn login_form(ctx: &PageContext<'_>) -> String {
    format!(
        r#"<form method="post" action="/login"><label><span>Email</span><input type="email" name="email" placeholder="vous@exemple.com" value="{email}" required></label><label><span>Mot de passe</span><input type="password" name="password" required></label>{error}<div class="actions"><button class="button primary">Connexion</button><a class="button outline" href="/register">Créer un compte</a></div></form>"#,
        email = escape(ctx.email),
        error = form_error(ctx.error),
    )
}

pub fn register_form(ctx: &PageContext<'_>) -> String {
    format!(
        r#"<form method="post" action="/register"><label><span>Pseudo</span><input name="display_name" placeholder="Votre pseudo" value="{name}"></label><label><span>Email</span><input type="email" name="email" placeholder="vous@exemple.com" value="{email}" required></label><label><span>Mot de passe</span><input type="password" name="password" required></label>{error}<button class="button primary">Créer le compte</button></form>"#,
        name = escape(ctx.display_name),
        email = escape(ctx.email),
        error = form_error(ctx.error),
    )
}

fn form_error(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<div class="error">{}</div>"#, escape(e)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine::catalogue::find_game;
    use vitrine::types::CategoryId;

    #[test]
    fn test_games_grid_lists_filtered_games() {
        let filter = CatalogueFilter::new(CategoryId::Table, "");
        let html = games_grid(&filter, Route::Casino);

        assert!(html.contains("Blackjack Pro"));
        assert!(html.contains(r#"action="/play/g8""#));
        assert!(!html.contains("Wild West"));
        // Active category is highlighted
        assert!(html.contains(r#"<button class="button primary">Jeux de table</button>"#));
    }

    #[test]
    fn test_games_grid_escapes_query_and_titles() {
        let filter = CatalogueFilter::new(CategoryId::Pop, "\"><script>");
        let html = games_grid(&filter, Route::Casino);
        assert!(!html.contains("<script>"));
        assert!(html.contains("Aucun jeu"));

        let html = games_grid(&CatalogueFilter::default(), Route::Home);
        assert!(html.contains("Mine d&#39;Or"));
        assert!(html.contains("RTP 96%"));
        assert!(html.contains("RTP 96.2%"));
    }

    #[test]
    fn test_deposit_gate_names_pending_game() {
        let game = find_game("g5");
        let html = deposit_gate(game, None, Some("Entrez un montant valide."));
        assert!(html.contains("Mega Roue (Live)"));
        assert!(html.contains(r#"<div class="error">Entrez un montant valide.</div>"#));
        assert!(html.contains("0\u{a0}€"));
    }

    #[test]
    fn test_dashboard_requires_session() {
        assert!(dashboard(None).contains("Veuillez vous connecter."));
    }
}
