use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::Map;
use score_ledger::SettlementKind;
use wallet_client::TxHandle;

#[cw_serde]
#[derive(Copy, Eq)]
pub enum ClaimPhase {
    Idle,
    Submitting,
    AwaitingConfirmation,
    Reconciling,
}

/// How an attempt ended. The flow is back in `Idle` after any of them.
/// `Reconciling` is only seen in the ledger, while the settlement write runs.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum AttemptOutcome {
    Reconciling,
    Done,
    BookkeepingFailed,
    Failed,
}

/// The single in-flight settlement. The amount is copied at submission so
/// later writes to the record by the scoring process cannot change what gets
/// reconciled.
#[cw_serde]
pub struct ClaimAttempt {
    pub kind: SettlementKind,
    pub wallet: Addr,
    pub record_id: String,
    pub amount_at_submission: Uint128,
    pub tx: Option<TxHandle>,
}

#[cw_serde]
pub struct ReconciledTx {
    pub tx: String,
    pub kind: SettlementKind,
    pub wallet: Addr,
    pub record_id: String,
    pub amount: Uint128,
    pub outcome: AttemptOutcome,
    pub at: Timestamp,
}

// key: transaction hash
pub const RECONCILED: Map<&str, ReconciledTx> = Map::new("reconciled_tx");

// key: (settlement kind, normalized wallet); set from before the settlement
// write until the record store has accepted it
pub const LOCKED_WALLETS: Map<(&str, &str), ReconciledTx> = Map::new("locked_wallets");
