use cosmwasm_std::{ConversionOverflowError, OverflowError, StdError};
use score_ledger::{SettlementKind, StoreError};
use thiserror::Error;
use wallet_client::WalletError;

#[derive(Error, Debug, PartialEq)]
pub enum FlowError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    ConversionOverflow(#[from] ConversionOverflowError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Wallet not connected")]
    WalletNotConnected {},

    #[error("A {kind} is already in flight")]
    ClaimInFlight { kind: SettlementKind },

    #[error("No score record for {wallet}")]
    NoRecordFound { wallet: String },

    #[error("Nothing to {kind} for {wallet}")]
    NothingToClaim { kind: SettlementKind, wallet: String },

    #[error("{kind} for {wallet} is locked until {tx} is reconciled manually")]
    WalletLocked {
        kind: SettlementKind,
        wallet: String,
        tx: String,
    },

    #[error("No pending {kind} reconciliation for {wallet}")]
    NotLocked { kind: SettlementKind, wallet: String },

    #[error("User rejected the transaction")]
    UserRejected {},

    #[error("Wallet session error: {0}")]
    SessionError(String),

    #[error("Wallet request timed out")]
    Timeout {},

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Wallet returned transaction {tx}, which was already reconciled")]
    DuplicateTransaction { tx: String },

    #[error("Transaction {tx} failed: {reason}")]
    TransactionFailed { tx: String, reason: String },

    #[error("Transaction {tx} confirmed but record {record_id} was not updated: {reason}")]
    BookkeepingFailed {
        tx: String,
        record_id: String,
        reason: String,
    },
}

impl From<WalletError> for FlowError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::UserRejected {} => FlowError::UserRejected {},
            WalletError::SessionError(msg) => FlowError::SessionError(msg),
            WalletError::Timeout {} => FlowError::Timeout {},
            WalletError::Rejected(msg) => FlowError::SubmissionFailed(msg),
        }
    }
}

impl FlowError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self, kind: SettlementKind) -> String {
        match self {
            FlowError::WalletNotConnected {} => "Please connect your wallet first!".to_string(),
            FlowError::NoRecordFound { .. } => "No score found for your wallet.".to_string(),
            FlowError::NothingToClaim { .. } => match kind {
                SettlementKind::Claim => "You have already claimed your reward!".to_string(),
                SettlementKind::Purchase => {
                    "You have already completed your purchase!".to_string()
                }
            },
            FlowError::WalletLocked { .. } | FlowError::BookkeepingFailed { .. } => {
                format!("Error updating {} status. Please contact support.", kind)
            }
            FlowError::SessionError(_) => {
                "Wallet connection issue. Please refresh the page and try again.".to_string()
            }
            FlowError::Timeout {} => "Request timed out. Please try again.".to_string(),
            FlowError::UserRejected {} => "Transaction was cancelled by user.".to_string(),
            FlowError::TransactionFailed { .. } => {
                format!("{} transaction failed. Please try again.", capitalize(kind))
            }
            FlowError::ClaimInFlight { .. } => {
                "A transaction is already in progress. Please wait.".to_string()
            }
            _ => format!("Error initiating {}. Please try again.", kind),
        }
    }
}

fn capitalize(kind: SettlementKind) -> &'static str {
    match kind {
        SettlementKind::Claim => "Claim",
        SettlementKind::Purchase => "Purchase",
    }
}
