use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounts::UserAccount;
use crate::error::{Result, VitrineError};

/// Match applied to the first deposit, in percent.
pub const WELCOME_BONUS_PERCENT: u64 = 100;

/// Credit granted by the dashboard claim button.
pub const CLAIM_AMOUNT: u64 = 100;

/// The signed-in visitor's view of their account.
///
/// A session is never edited in place: every balance change produces a new
/// value that replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub uid: String,
    pub email: String,
    #[serde(rename = "pseudo")]
    pub display_name: String,
    #[serde(default)]
    pub balance: u64,
    #[serde(default)]
    pub has_deposit: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub signed_in_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deposit_at: Option<DateTime<Utc>>,
}

/// What a deposit added to the balance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DepositCredit {
    pub amount: u64,
    pub bonus: u64,
}

impl DepositCredit {
    pub fn total(&self) -> u64 {
        self.amount + self.bonus
    }
}

impl Session {
    pub fn from_account(account: &UserAccount) -> Self {
        Session {
            uid: account.id.clone(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            balance: account.balance,
            has_deposit: account.has_deposit,
            created_at: account.created_at,
            signed_in_at: Utc::now(),
            last_deposit_at: None,
        }
    }

    /// Bonus earned by depositing `amount` now. Only the first deposit is
    /// matched.
    pub fn deposit_bonus(&self, amount: u64) -> u64 {
        if self.has_deposit {
            0
        } else {
            amount.saturating_mul(WELCOME_BONUS_PERCENT) / 100
        }
    }

    /// Returns the session after depositing `amount`, with the deposit flag set.
    pub fn with_deposit(&self, amount: u64) -> Result<(Session, DepositCredit)> {
        if amount == 0 {
            return Err(VitrineError::invalid_input("Entrez un montant valide."));
        }
        let credit = DepositCredit {
            amount,
            bonus: self.deposit_bonus(amount),
        };
        let balance = self
            .balance
            .checked_add(amount)
            .and_then(|b| b.checked_add(credit.bonus))
            .ok_or_else(|| VitrineError::invalid_input("Montant trop élevé."))?;

        let updated = Session {
            balance,
            has_deposit: true,
            last_deposit_at: Some(Utc::now()),
            ..self.clone()
        };
        Ok((updated, credit))
    }

    /// Returns the session with `amount` added to the balance.
    pub fn with_credit(&self, amount: u64) -> Result<Session> {
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| VitrineError::invalid_input("Montant trop élevé."))?;
        Ok(Session {
            balance,
            ..self.clone()
        })
    }
}

/// Parses the amount typed on the deposit form. Only whole, positive euros
/// are accepted.
pub fn parse_deposit_amount(input: &str) -> Result<u64> {
    match input.trim().parse::<u64>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(VitrineError::invalid_input("Entrez un montant valide.")),
    }
}
