use std::time::{SystemTime, UNIX_EPOCH};

use cosmwasm_std::{attr, Addr, MemoryStorage, Response, StdResult, Storage, Timestamp, Uint128};
use score_ledger::{normalize_wallet, RecordStore, RecordUpdate, ScoreRecord, SettlementKind};
use tracing::{debug, error, info, warn};
use wallet_client::{ConfirmationStatus, TxHandle, WalletClient};

use crate::config::ClaimConfig;
use crate::error::FlowError;
use crate::event::{Event, ReleasedEvent, SettledEvent, SkippedEvent, SubmittedEvent};
use crate::state::{
    AttemptOutcome, ClaimAttempt, ClaimPhase, ReconciledTx, LOCKED_WALLETS, RECONCILED,
};

pub trait Clock {
    fn now(&self) -> Timestamp;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Timestamp::from_nanos(nanos)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Eligibility {
    NoRecord,
    Settled,
    /// A confirmed transaction never reached the record store.
    Locked { tx: String },
    Claimable { amount: Uint128 },
}

/// Drives one wallet session's claims: submits the transaction, then settles
/// the score record once the chain confirms it. Holds at most one attempt.
pub struct ClaimReconciler<W, S> {
    config: ClaimConfig,
    wallet: W,
    store: S,
    clock: Box<dyn Clock>,
    ledger: Box<dyn Storage>,
    records: Vec<ScoreRecord>,
    phase: ClaimPhase,
    attempt: Option<ClaimAttempt>,
    last_outcome: Option<AttemptOutcome>,
}

impl<W: WalletClient, S: RecordStore> ClaimReconciler<W, S> {
    pub fn new(config: ClaimConfig, wallet: W, store: S) -> Result<Self, FlowError> {
        config.validate()?;
        Ok(ClaimReconciler {
            config,
            wallet,
            store,
            clock: Box::new(SystemClock),
            ledger: Box::new(MemoryStorage::new()),
            records: vec![],
            phase: ClaimPhase::Idle,
            attempt: None,
            last_outcome: None,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Keeps reconciled transactions and wallet locks in `ledger` instead of
    /// process memory.
    pub fn with_ledger(mut self, ledger: Box<dyn Storage>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut W {
        &mut self.wallet
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Last records read from the store, with this session's writes applied.
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn phase(&self) -> ClaimPhase {
        self.phase
    }

    pub fn attempt(&self) -> Option<&ClaimAttempt> {
        self.attempt.as_ref()
    }

    pub fn last_outcome(&self) -> Option<AttemptOutcome> {
        self.last_outcome
    }

    pub fn is_claiming(&self) -> bool {
        self.attempt.is_some()
    }

    pub fn is_confirming(&self) -> bool {
        matches!(
            self.phase,
            ClaimPhase::AwaitingConfirmation | ClaimPhase::Reconciling
        )
    }

    pub fn reconciled(&self, tx: &TxHandle) -> StdResult<Option<ReconciledTx>> {
        RECONCILED.may_load(&*self.ledger, tx.as_str())
    }

    pub fn lock(&self, kind: SettlementKind, wallet: &str) -> StdResult<Option<ReconciledTx>> {
        let wallet = normalize_wallet(wallet);
        LOCKED_WALLETS.may_load(&*self.ledger, (kind.as_str(), wallet.as_str()))
    }

    pub fn refresh_records(&mut self) -> Result<&[ScoreRecord], FlowError> {
        self.records = self.store.list_records()?;
        Ok(&self.records)
    }

    /// Answers from the mirrored records; call `refresh_records` first for a
    /// fresh view.
    pub fn eligibility(
        &self,
        kind: SettlementKind,
        wallet: &str,
    ) -> Result<Eligibility, FlowError> {
        if let Some(locked) = self.lock(kind, wallet)? {
            return Ok(Eligibility::Locked { tx: locked.tx });
        }
        let eligibility = match self.find_record(wallet) {
            None => Eligibility::NoRecord,
            Some(record) if record.is_settled(kind) => Eligibility::Settled,
            Some(record) => Eligibility::Claimable {
                amount: record.amount(kind),
            },
        };
        Ok(eligibility)
    }

    pub fn initiate_claim(&mut self, wallet: &str) -> Result<Response, FlowError> {
        self.initiate(SettlementKind::Claim, wallet)
    }

    pub fn initiate_purchase(&mut self, wallet: &str) -> Result<Response, FlowError> {
        self.initiate(SettlementKind::Purchase, wallet)
    }

    /// Settles for whichever address the wallet currently reports.
    pub fn initiate_for_connected(&mut self, kind: SettlementKind) -> Result<Response, FlowError> {
        let wallet = self
            .wallet
            .connected_address()
            .ok_or(FlowError::WalletNotConnected {})?;
        self.initiate(kind, &wallet)
    }

    pub fn initiate(&mut self, kind: SettlementKind, wallet: &str) -> Result<Response, FlowError> {
        if let Some(attempt) = &self.attempt {
            return Err(FlowError::ClaimInFlight { kind: attempt.kind });
        }
        let wallet = normalize_wallet(wallet);
        if wallet.is_empty() {
            return Err(FlowError::WalletNotConnected {});
        }
        let settlement = self.config.settlement(kind)?.clone();
        if let Some(locked) = self.lock(kind, &wallet)? {
            return Err(FlowError::WalletLocked {
                kind,
                wallet,
                tx: locked.tx,
            });
        }

        self.refresh_records()?;
        let record = self
            .find_record(&wallet)
            .cloned()
            .ok_or_else(|| FlowError::NoRecordFound {
                wallet: wallet.clone(),
            })?;
        if record.is_settled(kind) {
            return Err(FlowError::NothingToClaim { kind, wallet });
        }

        let amount = record.amount(kind);
        let request = settlement.build_request(amount)?;
        let mut attempt = ClaimAttempt {
            kind,
            wallet: Addr::unchecked(wallet.as_str()),
            record_id: record.id.clone(),
            amount_at_submission: amount,
            tx: None,
        };

        self.phase = ClaimPhase::Submitting;
        let tx = match self.wallet.submit_transaction(&request) {
            Ok(tx) => tx,
            Err(err) => {
                warn!(%kind, %wallet, error = %err, "submission failed");
                self.finish(AttemptOutcome::Failed);
                return Err(err.into());
            }
        };

        if RECONCILED.has(&*self.ledger, tx.as_str()) {
            warn!(%kind, %wallet, %tx, "wallet returned an already reconciled transaction");
            self.finish(AttemptOutcome::Failed);
            return Err(FlowError::DuplicateTransaction { tx: tx.to_string() });
        }

        info!(%kind, %wallet, %tx, amount = %amount, "transaction submitted");
        attempt.tx = Some(tx.clone());
        self.attempt = Some(attempt);
        self.phase = ClaimPhase::AwaitingConfirmation;

        let mut rsp = Response::new();
        SubmittedEvent {
            kind,
            wallet: &wallet,
            record_id: &record.id,
            amount,
            tx: tx.as_str(),
        }
        .add_attributes(&mut rsp);
        Ok(rsp)
    }

    /// Confirmation callback. Each transaction is settled at most once;
    /// repeated or unknown events come back as a `skip` response and
    /// `Pending` leaves the attempt waiting. A transaction reported failed
    /// that is later confirmed is still settled.
    pub fn on_confirmation(
        &mut self,
        tx: &TxHandle,
        status: ConfirmationStatus,
    ) -> Result<Response, FlowError> {
        if let Some(mut entry) = self.reconciled(tx)? {
            if entry.outcome != AttemptOutcome::Failed || status != ConfirmationStatus::Confirmed {
                debug!(%tx, outcome = ?entry.outcome, "confirmation already reconciled");
                return Ok(skipped(tx, "already_reconciled"));
            }
            warn!(
                %tx,
                kind = %entry.kind,
                wallet = %entry.wallet,
                "transaction confirmed after it was reported failed"
            );
            entry.at = self.clock.now();
            return self.settle(entry);
        }
        let attempt = match &self.attempt {
            Some(attempt) if attempt.tx.as_ref() == Some(tx) => attempt.clone(),
            _ => {
                debug!(%tx, "confirmation for a transaction not in flight");
                return Ok(skipped(tx, "unknown_transaction"));
            }
        };

        let mut entry = ReconciledTx {
            tx: tx.to_string(),
            kind: attempt.kind,
            wallet: attempt.wallet,
            record_id: attempt.record_id,
            amount: attempt.amount_at_submission,
            outcome: AttemptOutcome::Reconciling,
            at: self.clock.now(),
        };

        match status {
            ConfirmationStatus::Pending => Ok(Response::new().add_attributes(vec![
                attr("action", "await_confirmation"),
                attr("tx", tx.as_str()),
            ])),
            ConfirmationStatus::Failed { reason } => {
                entry.outcome = AttemptOutcome::Failed;
                RECONCILED.save(&mut *self.ledger, tx.as_str(), &entry)?;
                warn!(%tx, %reason, "transaction failed on chain");
                self.finish(AttemptOutcome::Failed);
                Err(FlowError::TransactionFailed {
                    tx: tx.to_string(),
                    reason,
                })
            }
            ConfirmationStatus::Confirmed => {
                self.phase = ClaimPhase::Reconciling;
                let result = self.settle(entry);
                self.finish(if result.is_ok() {
                    AttemptOutcome::Done
                } else {
                    AttemptOutcome::BookkeepingFailed
                });
                result
            }
        }
    }

    /// Asks the wallet client for the in-flight transaction's status and
    /// feeds it to `on_confirmation`. A failing status query leaves the
    /// attempt in flight.
    pub fn poll_confirmation(&mut self) -> Result<Response, FlowError> {
        let tx = match self.attempt.as_ref().and_then(|attempt| attempt.tx.clone()) {
            Some(tx) => tx,
            None => {
                return Ok(Response::new()
                    .add_attributes(vec![attr("action", "poll"), attr("status", "idle")]))
            }
        };
        let status = self.wallet.confirmation_status(&tx)?;
        self.on_confirmation(&tx, status)
    }

    /// Operator action for a locked wallet: issues the recorded settlement
    /// write once more. The lock stays if the store rejects it again.
    pub fn manual_reconcile(
        &mut self,
        kind: SettlementKind,
        wallet: &str,
    ) -> Result<Response, FlowError> {
        let wallet = normalize_wallet(wallet);
        let mut locked = self
            .lock(kind, &wallet)?
            .ok_or_else(|| FlowError::NotLocked {
                kind,
                wallet: wallet.clone(),
            })?;

        let update = RecordUpdate::settle(kind, &locked.tx, locked.amount, locked.at);
        self.store.update_record(&locked.record_id, &update)?;

        locked.outcome = AttemptOutcome::Done;
        RECONCILED.save(&mut *self.ledger, &locked.tx, &locked)?;
        LOCKED_WALLETS.remove(&mut *self.ledger, (kind.as_str(), wallet.as_str()));
        self.apply_to_mirror(&locked.record_id, &update);
        info!(tx = %locked.tx, %kind, %wallet, "record settled manually");

        let mut rsp = Response::new();
        SettledEvent {
            kind,
            wallet: &wallet,
            record_id: &locked.record_id,
            amount: locked.amount,
            tx: &locked.tx,
            manual: true,
        }
        .add_attributes(&mut rsp);
        Ok(rsp)
    }

    /// Operator action after the record was fixed outside this flow.
    pub fn release_wallet(
        &mut self,
        kind: SettlementKind,
        wallet: &str,
    ) -> Result<Response, FlowError> {
        let wallet = normalize_wallet(wallet);
        let locked = self
            .lock(kind, &wallet)?
            .ok_or_else(|| FlowError::NotLocked {
                kind,
                wallet: wallet.clone(),
            })?;
        LOCKED_WALLETS.remove(&mut *self.ledger, (kind.as_str(), wallet.as_str()));
        info!(tx = %locked.tx, %kind, %wallet, "wallet released");

        let mut rsp = Response::new();
        ReleasedEvent {
            kind,
            wallet: &wallet,
            tx: &locked.tx,
        }
        .add_attributes(&mut rsp);
        Ok(rsp)
    }

    fn find_record(&self, wallet: &str) -> Option<&ScoreRecord> {
        self.records
            .iter()
            .find(|record| record.matches_wallet(wallet))
    }

    fn apply_to_mirror(&mut self, record_id: &str, update: &RecordUpdate) {
        if let Some(record) = self.records.iter_mut().find(|r| r.id == record_id) {
            record.apply(update);
        }
    }

    /// Writes the settlement for a confirmed transaction. The handle stays
    /// `Reconciling` and the wallet locked until the store accepts the write.
    fn settle(&mut self, mut entry: ReconciledTx) -> Result<Response, FlowError> {
        let kind = entry.kind;
        let wallet = entry.wallet.to_string();
        let key = (kind.as_str(), wallet.as_str());
        // a lock held for another transaction stays in place
        let owns_lock = match LOCKED_WALLETS.may_load(&*self.ledger, key)? {
            Some(held) => held.tx == entry.tx,
            None => true,
        };

        entry.outcome = AttemptOutcome::Reconciling;
        RECONCILED.save(&mut *self.ledger, &entry.tx, &entry)?;
        if owns_lock {
            LOCKED_WALLETS.save(&mut *self.ledger, key, &entry)?;
        }

        let update = RecordUpdate::settle(kind, &entry.tx, entry.amount, entry.at);
        if let Err(err) = self.store.update_record(&entry.record_id, &update) {
            entry.outcome = AttemptOutcome::BookkeepingFailed;
            RECONCILED.save(&mut *self.ledger, &entry.tx, &entry)?;
            if owns_lock {
                LOCKED_WALLETS.save(&mut *self.ledger, key, &entry)?;
            }
            error!(
                tx = %entry.tx,
                %kind,
                %wallet,
                record_id = %entry.record_id,
                amount = %entry.amount,
                error = %err,
                "confirmed on chain but the score record was not updated"
            );
            return Err(FlowError::BookkeepingFailed {
                tx: entry.tx,
                record_id: entry.record_id,
                reason: err.to_string(),
            });
        }

        entry.outcome = AttemptOutcome::Done;
        RECONCILED.save(&mut *self.ledger, &entry.tx, &entry)?;
        if owns_lock {
            LOCKED_WALLETS.remove(&mut *self.ledger, key);
        }
        self.apply_to_mirror(&entry.record_id, &update);
        info!(tx = %entry.tx, %kind, %wallet, "record settled");

        let mut rsp = Response::new();
        SettledEvent {
            kind,
            wallet: &wallet,
            record_id: &entry.record_id,
            amount: entry.amount,
            tx: &entry.tx,
            manual: false,
        }
        .add_attributes(&mut rsp);
        Ok(rsp)
    }

    fn finish(&mut self, outcome: AttemptOutcome) {
        self.attempt = None;
        self.phase = ClaimPhase::Idle;
        self.last_outcome = Some(outcome);
    }
}

fn skipped(tx: &TxHandle, reason: &str) -> Response {
    let mut rsp = Response::new();
    SkippedEvent {
        tx: tx.as_str(),
        reason,
    }
    .add_attributes(&mut rsp);
    rsp
}
