//! HTML rendering of the site.
//!
//! `render` is the view router: it picks the page component for the
//! controller's current route and wraps it in the shared layout (header,
//! footer, game modal, cookie banner).

mod pages;

use chrono::{Datelike, Utc};
use std::fmt::Write;
use vitrine::Controller;
use vitrine::catalogue::CatalogueFilter;
use vitrine::money::format_eur;
use vitrine::storage::KeyValueStore;
use vitrine::types::{Game, Route, Theme};

pub use pages::{dashboard, deposit_gate, games_grid, hero, login_form, promotions, register_form};

/// Everything a page needs besides the controller.
#[derive(Debug, Default)]
pub struct PageContext<'a> {
    pub filter: CatalogueFilter,
    /// Inline error from the last intent
    pub error: Option<&'a str>,
    /// Values to put back into the auth forms after an error
    pub email: &'a str,
    pub display_name: &'a str,
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render<S: KeyValueStore>(controller: &Controller<S>, ctx: &PageContext<'_>) -> String {
    let route = controller.route();
    let body = match route {
        Route::Home => format!(
            "{}{}{}",
            hero(),
            games_grid(&ctx.filter, Route::Home),
            promotions()
        ),
        Route::Casino => games_grid(&ctx.filter, Route::Casino),
        Route::Promos => promotions(),
        Route::Dashboard => dashboard(controller.session()),
        Route::Deposit => deposit_gate(controller.pending_game(), controller.session(), ctx.error),
        // Shown as a modal over an empty page
        Route::Login | Route::Register => String::new(),
    };

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!doctype html>
<html lang="fr" class="{theme}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Casino Vitrine</title>
<style>{STYLE}</style>
</head>
<body id="top">
"#,
        theme = controller.theme().as_str(),
    );
    html.push_str(&header(controller));

    // Pages with a form show their own error
    if let Some(error) = ctx.error {
        if !matches!(route, Route::Login | Route::Register | Route::Deposit) {
            let _ = write!(html, r#"<div class="error banner">{}</div>"#, escape(error));
        }
    }

    let _ = write!(html, "<main>{}</main>", body);
    html.push_str(&footer());

    if route.is_auth() {
        let (title, form) = if route == Route::Register {
            ("Créer un compte", register_form(ctx))
        } else {
            ("Connexion", login_form(ctx))
        };
        html.push_str(&modal(title, &form, r#"<a class="close" href="/">✕</a>"#));
    }
    if let Some(game) = controller.open_game() {
        html.push_str(&game_modal(game));
    }
    if controller.cookie_banner_visible() {
        html.push_str(&cookie_banner());
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn header<S: KeyValueStore>(controller: &Controller<S>) -> String {
    let route = controller.route();
    let mut html = String::from(
        r#"<header><a class="brand" href="/"><span class="logo">CV</span> Casino Vitrine</a><nav>"#,
    );
    for (target, label) in [
        (Route::Home, "Accueil"),
        (Route::Casino, "Casino"),
        (Route::Promos, "Promotions"),
    ] {
        let class = if route == target { "button primary" } else { "button ghost" };
        let _ = write!(html, r#"<a class="{}" href="{}">{}</a>"#, class, target.path(), label);
    }
    html.push_str(r#"</nav><div class="account">"#);

    match controller.session() {
        Some(session) => {
            let _ = write!(
                html,
                r#"<span class="badge">💰 <span class="gold">{}</span></span><a class="button outline" href="/dashboard">Tableau de bord</a><form method="post" action="/logout"><button class="button primary">Déconnexion</button></form>"#,
                format_eur(session.balance)
            );
        }
        None => html.push_str(
            r#"<a class="button outline" href="/login">Connexion</a><a class="button primary" href="/register">S'inscrire</a>"#,
        ),
    }

    let _ = write!(
        html,
        r#"<form method="post" action="/theme"><button class="button ghost" title="Thème">{}</button></form></div></header>"#,
        if controller.theme() == Theme::Dark { "☀" } else { "☾" }
    );
    html
}

fn footer() -> String {
    let year = Utc::now().year();
    format!(
        r#"<footer><span class="gold">Casino Vitrine</span><nav><a href="/promos">Promotions</a><a href="/casino">Jeux</a><a href="/">Accueil</a></nav><p>© {} Casino Vitrine</p></footer>"#,
        year
    )
}

fn modal(title: &str, content: &str, close: &str) -> String {
    format!(
        r#"<div class="overlay" role="dialog" aria-modal="true"><div class="modal"><div class="modal-head"><strong>{}</strong>{}</div><div class="modal-body">{}</div></div></div>"#,
        escape(title),
        close,
        content
    )
}

fn game_modal(game: &Game) -> String {
    let content = format!(
        r#"<img src="{image}" alt="{title}"><p>Fournisseur: {provider}</p><p>RTP: {rtp}%</p><p>Volatilité: {volatility}</p><div class="actions"><button class="button primary" type="button">Jouer</button><form method="post" action="/game/close"><button class="button outline">Fermer</button></form></div>"#,
        image = escape(game.image),
        title = escape(game.title),
        provider = escape(game.provider),
        rtp = game.rtp,
        volatility = escape(game.volatility),
    );
    modal(
        game.title,
        &content,
        r#"<form method="post" action="/game/close"><button class="close">✕</button></form>"#,
    )
}

fn cookie_banner() -> String {
    String::from(
        r#"<div class="cookies"><span>Nous utilisons des cookies essentiels pour améliorer votre expérience.</span><form method="post" action="/cookies/decline"><button class="button outline">Refuser</button></form><form method="post" action="/cookies/accept"><button class="button primary">Accepter</button></form></div>"#,
    )
}

const STYLE: &str = "\
body{margin:0;font-family:Inter,system-ui,Arial,sans-serif;background:#000;color:#f3f4f6}\
html.light body{background:#f9fafb;color:#111827}\
header,footer{display:flex;flex-wrap:wrap;gap:.75rem;align-items:center;padding:.75rem 1rem;border-bottom:1px solid #1f2937}\
footer{border-top:1px solid #1f2937;border-bottom:0;margin-top:2rem;color:#9ca3af}\
nav,.account,.actions,.categories{display:flex;flex-wrap:wrap;gap:.5rem;align-items:center}\
.account{margin-left:auto}\
main{max-width:80rem;margin:0 auto;padding:1rem}\
a{color:inherit;text-decoration:none}\
form{display:inline}\
.brand{font-weight:800;font-size:1.1rem}\
.logo{display:inline-grid;place-items:center;width:2.2rem;height:2.2rem;border-radius:.75rem;background:linear-gradient(135deg,#facc15,#9333ea);color:#000}\
.button{display:inline-block;border:1px solid transparent;border-radius:1rem;padding:.6rem 1rem;font-weight:600;cursor:pointer;background:none;color:inherit;font-size:.9rem}\
.primary{background:linear-gradient(90deg,#facc15,#ca8a04);color:#000}\
.outline{border-color:#374151}\
.badge{border:1px solid #374151;border-radius:999px;padding:.25rem .6rem;font-size:.8rem}\
.gold{color:#facc15}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(14rem,1fr));gap:1rem}\
.card{border:1px solid #1f2937;border-radius:1rem;padding:1rem;background:linear-gradient(#111827,#000)}\
.card img{width:100%;aspect-ratio:16/9;object-fit:cover;border-radius:.75rem}\
.meta{font-size:.75rem;color:#9ca3af}\
.error{color:#f87171;font-size:.9rem}\
.banner{max-width:80rem;margin:1rem auto;padding:0 1rem}\
.bonus{border:1px solid #a16207;border-radius:1rem;padding:1rem;background:rgba(234,179,8,.1)}\
input{width:100%;box-sizing:border-box;border:1px solid #374151;border-radius:1rem;background:rgba(0,0,0,.6);color:inherit;padding:.7rem}\
label{display:grid;gap:.25rem;margin-bottom:.75rem}\
.overlay{position:fixed;inset:0;display:grid;place-items:center;background:rgba(0,0,0,.6)}\
.modal{width:min(32rem,100%);border:1px solid #1f2937;border-radius:1.5rem;background:#111827}\
.modal-head{display:flex;justify-content:space-between;padding:1rem;border-bottom:1px solid #1f2937}\
.modal-body{padding:1rem}\
.close{background:none;border:0;color:inherit;cursor:pointer}\
.cookies{position:fixed;left:.75rem;right:.75rem;bottom:.75rem;display:flex;flex-wrap:wrap;gap:.75rem;align-items:center;border:1px solid #1f2937;border-radius:1.5rem;padding:1rem;background:#000}\
.cookies span{flex:1}\
";
