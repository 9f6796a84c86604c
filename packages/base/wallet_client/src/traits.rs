use crate::{ConfirmationStatus, TxHandle, TxRequest, WalletError};

/// Connected wallet plus the RPC it broadcasts through.
pub trait WalletClient {
    fn connected_address(&self) -> Option<String>;

    fn submit_transaction(&mut self, request: &TxRequest) -> Result<TxHandle, WalletError>;

    fn confirmation_status(&self, tx: &TxHandle) -> Result<ConfirmationStatus, WalletError>;
}
