//! Page routing and the intents a visitor can trigger.
//!
//! The controller owns one visitor's local storage together with the
//! in-memory UI state: current route, session, open game modal, the game
//! waiting behind the deposit gate, theme and cookie banner. Every intent runs
//! synchronously and either completes or leaves the state as it was.

use chrono::Utc;

use crate::accounts::{AccountStore, UserAccount};
use crate::catalogue::find_game;
use crate::error::{Result, VitrineError};
use crate::session::{CLAIM_AMOUNT, DepositCredit, Session};
use crate::storage::{KeyValueStore, LocalStorage, keys};
use crate::types::{CookieConsent, Game, Route, Theme};

/// Where a play request ended up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PlayOutcome {
    /// No session; the visitor was sent to the login page.
    LoginRequired,
    /// Signed in but never deposited; the game waits behind the deposit gate.
    DepositRequired(&'static Game),
    Opened(&'static Game),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepositReceipt {
    pub credit: DepositCredit,
    pub balance: u64,
    /// Game reopened after the deposit, if one was pending
    pub resumed: Option<&'static Game>,
}

pub struct Controller<S> {
    storage: LocalStorage<S>,
    route: Route,
    session: Option<Session>,
    open_game: Option<&'static Game>,
    pending_game: Option<&'static Game>,
    theme: Theme,
    cookie_banner_visible: bool,
}

impl<S: KeyValueStore> Controller<S> {
    /// Builds a controller over `store`, restoring whatever the store holds.
    pub fn new(store: S) -> Self {
        let storage = LocalStorage::new(store);
        let session: Option<Session> = storage.load(keys::SESSION);
        let theme: Theme = storage.load(keys::THEME).unwrap_or_default();
        let consent: Option<CookieConsent> = storage.load(keys::COOKIES);

        if let Some(session) = &session {
            tracing::debug!("Restored session for {}", session.email);
        }

        Controller {
            storage,
            route: Route::Home,
            session,
            open_game: None,
            pending_game: None,
            theme,
            cookie_banner_visible: consent.is_none(),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn open_game(&self) -> Option<&'static Game> {
        self.open_game
    }

    pub fn pending_game(&self) -> Option<&'static Game> {
        self.pending_game
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn cookie_banner_visible(&self) -> bool {
        self.cookie_banner_visible
    }

    pub fn storage(&self) -> &LocalStorage<S> {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut LocalStorage<S> {
        &mut self.storage
    }

    pub fn accounts(&mut self) -> AccountStore<'_, S> {
        AccountStore::new(&mut self.storage)
    }

    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            tracing::debug!("Route {} -> {}", self.route, route);
        }
        self.route = route;
    }

    /// "Commencer" on the hero banner.
    pub fn hero_cta(&mut self) -> Route {
        let target = if self.session.is_some() {
            Route::Casino
        } else {
            Route::Register
        };
        self.navigate(target);
        target
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<&Session> {
        let account = self.accounts().find_by_credentials(email, password)?;
        let session = Session::from_account(&account);
        self.storage
            .save(keys::SESSION, &session)
            .map_err(VitrineError::storage(
                "Connexion impossible (stockage bloqué). Désactivez le mode privé et réessayez.",
            ))?;

        tracing::info!("Signed in {}", session.email);
        self.navigate(Route::Home);
        Ok(self.session.insert(session))
    }

    pub fn register(&mut self, email: &str, password: &str, display_name: &str) -> Result<&Session> {
        let session = self.accounts().register(email, password, display_name)?;
        self.storage
            .save(keys::SESSION, &session)
            .map_err(VitrineError::storage(
                "Compte créé, mais session non sauvegardée (stockage bloqué). Connectez-vous à nouveau.",
            ))?;

        self.navigate(Route::Home);
        Ok(self.session.insert(session))
    }

    /// Clears the stored session first; a visitor whose storage refuses the
    /// write stays signed in.
    pub fn logout(&mut self) -> Result<()> {
        self.storage
            .save(keys::SESSION, &Option::<Session>::None)
            .map_err(VitrineError::storage(
                "Déconnexion impossible (stockage bloqué).",
            ))?;

        if let Some(session) = self.session.take() {
            tracing::info!("Signed out {}", session.email);
        }
        self.pending_game = None;
        self.open_game = None;
        self.navigate(Route::Home);
        Ok(())
    }

    /// "Jouer" on a catalogue card.
    pub fn play(&mut self, game_id: &str) -> Result<PlayOutcome> {
        let game = find_game(game_id)
            .ok_or_else(|| VitrineError::invalid_input(format!("Jeu inconnu: {}", game_id)))?;

        let Some(session) = &self.session else {
            self.navigate(Route::Login);
            return Ok(PlayOutcome::LoginRequired);
        };

        if !session.has_deposit {
            tracing::debug!("Holding {} until {} deposits", game.id, session.email);
            self.pending_game = Some(game);
            self.navigate(Route::Deposit);
            return Ok(PlayOutcome::DepositRequired(game));
        }

        self.open_game = Some(game);
        Ok(PlayOutcome::Opened(game))
    }

    pub fn close_game(&mut self) {
        self.open_game = None;
    }

    /// Credits a deposit, matched on the first one, then resumes the game
    /// held at the deposit gate.
    pub fn deposit(&mut self, amount: u64) -> Result<DepositReceipt> {
        let Some(session) = &self.session else {
            self.navigate(Route::Login);
            return Err(VitrineError::NotLoggedIn);
        };
        let (updated, credit) = session.with_deposit(amount)?;

        self.commit_balance(&updated, "Dépôt non enregistré (stockage bloqué).")?;

        tracing::info!(
            "Deposit of {} (+{} bonus) for {}, balance now {}",
            credit.amount,
            credit.bonus,
            updated.email,
            updated.balance
        );
        let balance = updated.balance;
        self.session = Some(updated);

        self.navigate(Route::Casino);
        let resumed = self.pending_game.take();
        if let Some(game) = resumed {
            self.open_game = Some(game);
        }

        Ok(DepositReceipt {
            credit,
            balance,
            resumed,
        })
    }

    /// "Réclamer +100" on the dashboard.
    pub fn claim_bonus(&mut self) -> Result<u64> {
        let Some(session) = &self.session else {
            self.navigate(Route::Login);
            return Err(VitrineError::NotLoggedIn);
        };
        let updated = session.with_credit(CLAIM_AMOUNT)?;

        self.commit_balance(&updated, "Bonus non enregistré (stockage bloqué).")?;

        let balance = updated.balance;
        self.session = Some(updated);
        Ok(balance)
    }

    pub fn accept_cookies(&mut self) -> Result<()> {
        let consent = CookieConsent {
            essential: true,
            at: Utc::now(),
        };
        self.storage
            .save(keys::COOKIES, &consent)
            .map_err(VitrineError::storage(
                "Préférence non enregistrée (stockage bloqué).",
            ))?;
        self.cookie_banner_visible = false;
        Ok(())
    }

    /// Hides the banner without storing anything; it comes back next visit.
    pub fn decline_cookies(&mut self) {
        self.cookie_banner_visible = false;
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme.toggled();
        self.storage
            .save(keys::THEME, &theme)
            .map_err(VitrineError::storage(
                "Préférence non enregistrée (stockage bloqué).",
            ))?;
        self.theme = theme;
        Ok(theme)
    }

    // Store a balance change on the account, then the session. The account
    // list is written back as it was when the session cannot be stored.
    fn commit_balance(&mut self, updated: &Session, message: &'static str) -> Result<()> {
        let previous: Vec<UserAccount> = self.accounts().accounts();
        self.sync_account(updated)?;

        if let Err(e) = self.storage.save(keys::SESSION, updated) {
            if self.storage.save(keys::USERS, &previous).is_err() {
                tracing::error!(
                    "Account {} credited without its session, balance {}",
                    updated.uid,
                    updated.balance
                );
            }
            return Err(VitrineError::storage(message)(e));
        }
        Ok(())
    }

    // Mirror a session balance change onto the stored account
    fn sync_account(&mut self, session: &Session) -> Result<()> {
        match self
            .accounts()
            .update_balance(&session.uid, session.balance, session.has_deposit)
        {
            Ok(_) => Ok(()),
            Err(VitrineError::AccountNotFound(id)) => {
                tracing::warn!("Session refers to unknown account {}", id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
