//! Core of the Casino Vitrine demo site: static catalogue, local key/value
//! persistence, mock accounts and the per-visitor page controller.

pub mod accounts;
pub mod catalogue;
pub mod controller;
pub mod error;
pub mod money;
pub mod session;
pub mod storage;
pub mod types;

pub use controller::{Controller, DepositReceipt, PlayOutcome};
pub use error::{Result, VitrineError};
