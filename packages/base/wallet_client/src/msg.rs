use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A transaction the wallet is asked to sign and broadcast.
#[cw_serde]
pub enum TxRequest {
    /// Native value transfer, `value` in the chain's base unit.
    Transfer { to: String, value: Uint128 },
    /// Contract method call taking the settled amount as its argument.
    ContractCall {
        contract: String,
        method: String,
        amount: Uint128,
        value: Uint128,
    },
}

impl TxRequest {
    pub fn target(&self) -> &str {
        match self {
            TxRequest::Transfer { to, .. } => to,
            TxRequest::ContractCall { contract, .. } => contract,
        }
    }

    pub fn value(&self) -> Uint128 {
        match self {
            TxRequest::Transfer { value, .. } => *value,
            TxRequest::ContractCall { value, .. } => *value,
        }
    }
}

/// Chain-assigned transaction identifier (the transaction hash).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, JsonSchema)]
pub struct TxHandle(pub String);

impl TxHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TxHandle {
    fn from(hash: &str) -> Self {
        TxHandle(hash.to_string())
    }
}

impl fmt::Display for TxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cw_serde]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
    /// Reverted or dropped by the chain.
    Failed { reason: String },
}
