use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Timestamp, Uint128};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which pair of amount/flag fields on a [`ScoreRecord`] a settlement touches.
#[cw_serde]
#[derive(Copy, Eq, Hash)]
pub enum SettlementKind {
    Claim,
    Purchase,
}

impl SettlementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementKind::Claim => "claim",
            SettlementKind::Purchase => "purchase",
        }
    }
}

impl fmt::Display for SettlementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wallet addresses are compared case-insensitively.
pub fn normalize_wallet(wallet: &str) -> String {
    wallet.trim().to_lowercase()
}

/// One document of the `scores` collection. Field names follow the stored
/// document so records round-trip through the remote store untouched.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ScoreRecord {
    /// Store-assigned document id.
    #[serde(default)]
    pub id: String,
    pub wallet: String,
    #[serde(rename = "claim_value", default)]
    pub claimable_amount: Uint128,
    #[serde(default)]
    pub claim_done: bool,
    #[serde(rename = "Purchase_Value", default)]
    pub purchase_amount: Uint128,
    #[serde(rename = "Purchase_Done", default)]
    pub purchase_done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_claim_transaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_claim_amount: Option<Uint128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_claim_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchase_transaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchase_amount: Option<Uint128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchase_at: Option<Timestamp>,
}

impl ScoreRecord {
    pub fn new(
        id: impl Into<String>,
        wallet: impl Into<String>,
        claimable_amount: Uint128,
    ) -> Self {
        ScoreRecord {
            id: id.into(),
            wallet: wallet.into(),
            claimable_amount,
            claim_done: false,
            purchase_amount: Uint128::zero(),
            purchase_done: false,
            last_claim_transaction: None,
            last_claim_amount: None,
            last_claim_at: None,
            last_purchase_transaction: None,
            last_purchase_amount: None,
            last_purchase_at: None,
        }
    }

    pub fn with_purchase(mut self, purchase_amount: Uint128) -> Self {
        self.purchase_amount = purchase_amount;
        self
    }

    pub fn matches_wallet(&self, wallet: &str) -> bool {
        normalize_wallet(&self.wallet) == normalize_wallet(wallet)
    }

    pub fn amount(&self, kind: SettlementKind) -> Uint128 {
        match kind {
            SettlementKind::Claim => self.claimable_amount,
            SettlementKind::Purchase => self.purchase_amount,
        }
    }

    pub fn is_done(&self, kind: SettlementKind) -> bool {
        match kind {
            SettlementKind::Claim => self.claim_done,
            SettlementKind::Purchase => self.purchase_done,
        }
    }

    /// Nothing left to settle: either flagged done or the amount is zero.
    pub fn is_settled(&self, kind: SettlementKind) -> bool {
        self.is_done(kind) || self.amount(kind).is_zero()
    }

    /// Merges a partial update the way the document store does: only the
    /// fields carried by `update` change.
    pub fn apply(&mut self, update: &RecordUpdate) {
        if let Some(amount) = update.claimable_amount {
            self.claimable_amount = amount;
        }
        if let Some(done) = update.claim_done {
            self.claim_done = done;
        }
        if let Some(amount) = update.purchase_amount {
            self.purchase_amount = amount;
        }
        if let Some(done) = update.purchase_done {
            self.purchase_done = done;
        }
        if let Some(tx) = &update.last_claim_transaction {
            self.last_claim_transaction = Some(tx.clone());
        }
        if let Some(amount) = update.last_claim_amount {
            self.last_claim_amount = Some(amount);
        }
        if let Some(at) = update.last_claim_at {
            self.last_claim_at = Some(at);
        }
        if let Some(tx) = &update.last_purchase_transaction {
            self.last_purchase_transaction = Some(tx.clone());
        }
        if let Some(amount) = update.last_purchase_amount {
            self.last_purchase_amount = Some(amount);
        }
        if let Some(at) = update.last_purchase_at {
            self.last_purchase_at = Some(at);
        }
    }
}

/// Partial field update for one record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default, JsonSchema)]
pub struct RecordUpdate {
    #[serde(rename = "claim_value", default, skip_serializing_if = "Option::is_none")]
    pub claimable_amount: Option<Uint128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_done: Option<bool>,
    #[serde(rename = "Purchase_Value", default, skip_serializing_if = "Option::is_none")]
    pub purchase_amount: Option<Uint128>,
    #[serde(rename = "Purchase_Done", default, skip_serializing_if = "Option::is_none")]
    pub purchase_done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_claim_transaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_claim_amount: Option<Uint128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_claim_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchase_transaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchase_amount: Option<Uint128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchase_at: Option<Timestamp>,
}

impl RecordUpdate {
    /// Zeroes the amount and raises the flag together, with the audit trail of
    /// the settling transaction.
    pub fn settle(kind: SettlementKind, tx: &str, amount: Uint128, at: Timestamp) -> Self {
        match kind {
            SettlementKind::Claim => RecordUpdate {
                claimable_amount: Some(Uint128::zero()),
                claim_done: Some(true),
                last_claim_transaction: Some(tx.to_string()),
                last_claim_amount: Some(amount),
                last_claim_at: Some(at),
                ..RecordUpdate::default()
            },
            SettlementKind::Purchase => RecordUpdate {
                purchase_amount: Some(Uint128::zero()),
                purchase_done: Some(true),
                last_purchase_transaction: Some(tx.to_string()),
                last_purchase_amount: Some(amount),
                last_purchase_at: Some(at),
                ..RecordUpdate::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::{from_json, to_json_vec};

    #[test]
    fn wallet_comparison_ignores_case() {
        let record = ScoreRecord::new("doc-1", "0xAbCdEf", Uint128::new(10));
        assert!(record.matches_wallet("0xabcdef"));
        assert!(record.matches_wallet(" 0XABCDEF "));
        assert!(!record.matches_wallet("0xabcdee"));
    }

    #[test]
    fn settle_writes_amount_and_flag_together() {
        let mut record = ScoreRecord::new("doc-1", "0xaaa", Uint128::new(250));
        let at = Timestamp::from_seconds(1_700_000_000);
        record.apply(&RecordUpdate::settle(
            SettlementKind::Claim,
            "0xTX1",
            Uint128::new(250),
            at,
        ));

        assert!(record.claim_done);
        assert_eq!(record.claimable_amount, Uint128::zero());
        assert_eq!(record.last_claim_transaction.as_deref(), Some("0xTX1"));
        assert_eq!(record.last_claim_amount, Some(Uint128::new(250)));
        assert_eq!(record.last_claim_at, Some(at));
        // purchase side untouched
        assert!(!record.purchase_done);
        assert_eq!(record.last_purchase_transaction, None);
    }

    #[test]
    fn settled_when_done_or_empty() {
        let mut record = ScoreRecord::new("doc-1", "0xaaa", Uint128::zero());
        assert!(record.is_settled(SettlementKind::Claim));

        record.claimable_amount = Uint128::new(5);
        assert!(!record.is_settled(SettlementKind::Claim));

        record.claim_done = true;
        assert!(record.is_settled(SettlementKind::Claim));
        assert!(record.is_settled(SettlementKind::Purchase));
    }

    #[test]
    fn record_uses_document_field_names() {
        let json = br#"{"id":"doc-9","wallet":"0xBBB","claim_value":"40","Purchase_Value":"3","Purchase_Done":false,"rank":7}"#;
        let record: ScoreRecord = from_json(json).unwrap();
        assert_eq!(record.claimable_amount, Uint128::new(40));
        assert!(!record.claim_done);
        assert_eq!(record.purchase_amount, Uint128::new(3));

        let update = RecordUpdate::settle(
            SettlementKind::Purchase,
            "0xTX2",
            Uint128::new(3),
            Timestamp::from_seconds(1),
        );
        let raw = String::from_utf8(to_json_vec(&update).unwrap()).unwrap();
        assert!(raw.contains("\"Purchase_Done\":true"));
        assert!(raw.contains("\"Purchase_Value\":\"0\""));
        assert!(!raw.contains("claim_done"));
    }
}
