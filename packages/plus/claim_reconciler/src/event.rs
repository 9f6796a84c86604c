use cosmwasm_std::{attr, Response, Uint128};
use score_ledger::SettlementKind;

pub trait Event {
    /// Append attributes to response
    fn add_attributes(&self, response: &mut Response);
}

/// A settlement transaction was accepted by the wallet.
pub struct SubmittedEvent<'a> {
    pub kind: SettlementKind,
    pub wallet: &'a str,
    pub record_id: &'a str,
    pub amount: Uint128,
    pub tx: &'a str,
}

impl<'a> Event for SubmittedEvent<'a> {
    fn add_attributes(&self, rsp: &mut Response) {
        rsp.attributes.push(attr("action", "submit"));
        rsp.attributes.push(attr("kind", self.kind.as_str()));
        rsp.attributes.push(attr("wallet", self.wallet));
        rsp.attributes.push(attr("record_id", self.record_id));
        rsp.attributes.push(attr("amount", self.amount.to_string()));
        rsp.attributes.push(attr("tx", self.tx));
    }
}

/// The record store now reflects a confirmed transaction.
pub struct SettledEvent<'a> {
    pub kind: SettlementKind,
    pub wallet: &'a str,
    pub record_id: &'a str,
    pub amount: Uint128,
    pub tx: &'a str,
    pub manual: bool,
}

impl<'a> Event for SettledEvent<'a> {
    fn add_attributes(&self, rsp: &mut Response) {
        let action = if self.manual { "manual_reconcile" } else { "settle" };
        rsp.attributes.push(attr("action", action));
        rsp.attributes.push(attr("kind", self.kind.as_str()));
        rsp.attributes.push(attr("wallet", self.wallet));
        rsp.attributes.push(attr("record_id", self.record_id));
        rsp.attributes.push(attr("amount", self.amount.to_string()));
        rsp.attributes.push(attr("tx", self.tx));
    }
}

/// A confirmation event that caused no write.
pub struct SkippedEvent<'a> {
    pub tx: &'a str,
    pub reason: &'a str,
}

impl<'a> Event for SkippedEvent<'a> {
    fn add_attributes(&self, rsp: &mut Response) {
        rsp.attributes.push(attr("action", "skip"));
        rsp.attributes.push(attr("tx", self.tx));
        rsp.attributes.push(attr("reason", self.reason));
    }
}

pub struct ReleasedEvent<'a> {
    pub kind: SettlementKind,
    pub wallet: &'a str,
    pub tx: &'a str,
}

impl<'a> Event for ReleasedEvent<'a> {
    fn add_attributes(&self, rsp: &mut Response) {
        rsp.attributes.push(attr("action", "release_wallet"));
        rsp.attributes.push(attr("kind", self.kind.as_str()));
        rsp.attributes.push(attr("wallet", self.wallet));
        rsp.attributes.push(attr("tx", self.tx));
    }
}
