use std::collections::{HashMap, VecDeque};

use crate::{ConfirmationStatus, TxHandle, TxRequest, WalletClient, WalletError};

/// Scripted wallet. Submissions succeed with `0xTX<n>` unless a result was
/// queued with [`MockWallet::queue_submission`]; unknown handles report
/// `Pending`.
#[derive(Default)]
pub struct MockWallet {
    connected: Option<String>,
    queued: VecDeque<Result<TxHandle, WalletError>>,
    submissions: Vec<TxRequest>,
    statuses: HashMap<TxHandle, ConfirmationStatus>,
}

impl MockWallet {
    pub fn connected(address: &str) -> Self {
        MockWallet {
            connected: Some(address.to_string()),
            ..MockWallet::default()
        }
    }

    pub fn disconnect(&mut self) {
        self.connected = None;
    }

    pub fn queue_submission(&mut self, result: Result<TxHandle, WalletError>) {
        self.queued.push_back(result);
    }

    pub fn set_status(&mut self, tx: &TxHandle, status: ConfirmationStatus) {
        self.statuses.insert(tx.clone(), status);
    }

    /// Every request passed to `submit_transaction`, failed ones included.
    pub fn submissions(&self) -> &[TxRequest] {
        &self.submissions
    }
}

impl WalletClient for MockWallet {
    fn connected_address(&self) -> Option<String> {
        self.connected.clone()
    }

    fn submit_transaction(&mut self, request: &TxRequest) -> Result<TxHandle, WalletError> {
        self.submissions.push(request.clone());
        match self.queued.pop_front() {
            Some(result) => result,
            None => Ok(TxHandle(format!("0xTX{}", self.submissions.len()))),
        }
    }

    fn confirmation_status(&self, tx: &TxHandle) -> Result<ConfirmationStatus, WalletError> {
        Ok(self
            .statuses
            .get(tx)
            .cloned()
            .unwrap_or(ConfirmationStatus::Pending))
    }
}
