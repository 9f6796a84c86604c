use std::env::current_dir;
use std::fs::create_dir_all;

use cosmwasm_schema::{export_schema, remove_schemas, schema_for};

fn main() {
    let mut out_dir = current_dir().unwrap();
    out_dir.push("artifacts/schema");
    create_dir_all(&out_dir).unwrap();
    remove_schemas(&out_dir).unwrap();

    export_schema(&schema_for!(claim_reconciler::ClaimConfig), &out_dir);
    export_schema(&schema_for!(claim_reconciler::ReconciledTx), &out_dir);
    export_schema(&schema_for!(score_ledger::ScoreRecord), &out_dir);
    export_schema(&schema_for!(score_ledger::RecordUpdate), &out_dir);
    export_schema(&schema_for!(wallet_client::TxRequest), &out_dir);
    export_schema(&schema_for!(wallet_client::ConfirmationStatus), &out_dir);
}
