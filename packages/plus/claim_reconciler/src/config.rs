use cosmwasm_schema::cw_serde;
use cosmwasm_std::{from_json, Decimal, Uint128, Uint256};
use score_ledger::SettlementKind;
use wallet_client::TxRequest;

use crate::error::FlowError;

/// `Decimal` stores 18 fractional digits in its atomics.
const DECIMAL_FRACTIONAL: u128 = 1_000_000_000_000_000_000;
const MAX_DECIMALS: u32 = 36;

#[cw_serde]
pub struct ClaimConfig {
    pub chain_id: String,
    pub claim: SettlementConfig,
    pub purchase: Option<SettlementConfig>,
}

#[cw_serde]
pub struct SettlementConfig {
    /// 0x-prefixed EVM address receiving the transaction.
    pub target: String,
    pub payout: PayoutPolicy,
}

#[cw_serde]
pub enum PayoutPolicy {
    /// Send `amount * unit_price` native tokens; `decimals` converts whole
    /// tokens into the base unit (18 for wei).
    NativeTransfer { unit_price: Decimal, decimals: u32 },
    /// Call `method(amount)` on the target with no attached value.
    ContractCall { method: String },
}

impl ClaimConfig {
    pub fn from_json(data: impl AsRef<[u8]>) -> Result<Self, FlowError> {
        let config: ClaimConfig = from_json(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FlowError> {
        if self.chain_id.trim().is_empty() {
            return Err(FlowError::InvalidConfig("chain_id is empty".to_string()));
        }
        self.claim.validate(SettlementKind::Claim)?;
        if let Some(purchase) = &self.purchase {
            purchase.validate(SettlementKind::Purchase)?;
        }
        Ok(())
    }

    pub fn settlement(&self, kind: SettlementKind) -> Result<&SettlementConfig, FlowError> {
        match kind {
            SettlementKind::Claim => Ok(&self.claim),
            SettlementKind::Purchase => self
                .purchase
                .as_ref()
                .ok_or_else(|| {
                    FlowError::InvalidConfig("no purchase target configured".to_string())
                }),
        }
    }
}

impl SettlementConfig {
    pub fn validate(&self, kind: SettlementKind) -> Result<(), FlowError> {
        validate_evm_address(&self.target)
            .map_err(|msg| FlowError::InvalidConfig(format!("{} target: {}", kind, msg)))?;
        match &self.payout {
            PayoutPolicy::NativeTransfer { decimals, .. } if *decimals > MAX_DECIMALS => {
                Err(FlowError::InvalidConfig(format!(
                    "{} decimals must not exceed {}",
                    kind, MAX_DECIMALS
                )))
            }
            PayoutPolicy::ContractCall { method } if method.trim().is_empty() => Err(
                FlowError::InvalidConfig(format!("{} contract method is empty", kind)),
            ),
            _ => Ok(()),
        }
    }

    pub fn build_request(&self, amount: Uint128) -> Result<TxRequest, FlowError> {
        let request = match &self.payout {
            PayoutPolicy::NativeTransfer {
                unit_price,
                decimals,
            } => TxRequest::Transfer {
                to: self.target.clone(),
                value: transfer_value(amount, *unit_price, *decimals)?,
            },
            PayoutPolicy::ContractCall { method } => TxRequest::ContractCall {
                contract: self.target.clone(),
                method: method.clone(),
                amount,
                value: Uint128::zero(),
            },
        };
        Ok(request)
    }
}

/// `amount * unit_price * 10^decimals`, floored to the base unit.
pub fn transfer_value(
    amount: Uint128,
    unit_price: Decimal,
    decimals: u32,
) -> Result<Uint128, FlowError> {
    let scale = Uint256::from(10u128).checked_pow(decimals)?;
    let value = amount.full_mul(unit_price.atomics()).checked_mul(scale)?
        / Uint256::from(DECIMAL_FRACTIONAL);
    Ok(Uint128::try_from(value)?)
}

fn validate_evm_address(addr: &str) -> Result<(), String> {
    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .ok_or_else(|| format!("{} is missing the 0x prefix", addr))?;
    let bytes = hex::decode(digits).map_err(|e| format!("{} is not hex: {}", addr, e))?;
    if bytes.len() != 20 {
        return Err(format!("{} is {} bytes, expected 20", addr, bytes.len()));
    }
    Ok(())
}
