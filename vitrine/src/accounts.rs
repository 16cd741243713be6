use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{Result, VitrineError};
use crate::session::Session;
use crate::storage::{KeyValueStore, LocalStorage, keys};

/// A registered account. The password is kept in plaintext: this is a mock
/// sign-up flow, not a credential system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "pseudo")]
    pub display_name: String,
    #[serde(default)]
    pub balance: u64,
    #[serde(default)]
    pub has_deposit: bool,
    pub created_at: DateTime<Utc>,
}

// Generate an account id from random bytes
fn generate_uid() -> String {
    let bytes: [u8; 16] = rand::random();
    format!("uid-{}", hex::encode(bytes))
}

static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").ok());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(email))
}

/// Registered accounts, persisted as one list under [`keys::USERS`].
///
/// Every mutation reads the whole list, changes it and writes it back.
pub struct AccountStore<'a, S> {
    storage: &'a mut LocalStorage<S>,
}

impl<'a, S: KeyValueStore> AccountStore<'a, S> {
    pub fn new(storage: &'a mut LocalStorage<S>) -> Self {
        Self { storage }
    }

    pub fn accounts(&self) -> Vec<UserAccount> {
        self.storage.load_or_default(keys::USERS)
    }

    pub fn find(&self, account_id: &str) -> Option<UserAccount> {
        self.accounts().into_iter().find(|a| a.id == account_id)
    }

    /// Creates an account and returns the session for it.
    pub fn register(&mut self, email: &str, password: &str, display_name: &str) -> Result<Session> {
        if email.is_empty() || password.is_empty() {
            return Err(VitrineError::invalid_input(
                "Email et mot de passe sont requis.",
            ));
        }
        if !is_valid_email(email) {
            return Err(VitrineError::invalid_input("Email invalide."));
        }

        let mut accounts = self.accounts();
        if accounts.iter().any(|a| a.email == email) {
            return Err(VitrineError::DuplicateEmail);
        }

        let display_name = if display_name.trim().is_empty() {
            email.split('@').next().unwrap_or(email)
        } else {
            display_name
        };
        let account = UserAccount {
            id: generate_uid(),
            email: email.to_string(),
            password: password.to_string(),
            display_name: display_name.trim().to_string(),
            balance: 0,
            has_deposit: false,
            created_at: Utc::now(),
        };

        accounts.push(account.clone());
        self.storage
            .save(keys::USERS, &accounts)
            .map_err(VitrineError::storage(
                "Impossible d'enregistrer le compte (stockage bloqué). Désactivez le mode privé et réessayez.",
            ))?;

        tracing::info!("Registered account {} for {}", account.id, account.email);
        Ok(Session::from_account(&account))
    }

    pub fn find_by_credentials(&self, email: &str, password: &str) -> Result<UserAccount> {
        self.accounts()
            .into_iter()
            .find(|a| a.email == email && a.password == password)
            .ok_or(VitrineError::InvalidCredentials)
    }

    /// Replaces the balance and deposit flag of one account and writes the
    /// whole list back.
    ///
    /// The balance may not go down and the deposit flag, once set, stays set.
    pub fn update_balance(
        &mut self,
        account_id: &str,
        new_balance: u64,
        has_deposit: bool,
    ) -> Result<UserAccount> {
        let mut accounts = self.accounts();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == account_id)
            .ok_or_else(|| VitrineError::AccountNotFound(account_id.to_string()))?;

        if new_balance < account.balance {
            return Err(VitrineError::invalid_input(
                "Le solde ne peut pas diminuer.",
            ));
        }
        account.balance = new_balance;
        account.has_deposit = account.has_deposit || has_deposit;
        let updated = account.clone();

        self.storage
            .save(keys::USERS, &accounts)
            .map_err(VitrineError::storage(
                "Impossible de mettre à jour le solde (stockage bloqué).",
            ))?;
        Ok(updated)
    }
}
