use cosmwasm_std::{MemoryStorage, Order, StdResult};
use cw_storage_plus::{Item, Map};

use crate::{RecordStore, RecordUpdate, ScoreRecord, StoreError};

const RECORDS: Map<&str, ScoreRecord> = Map::new("scores");
const RECORD_COUNT: Item<u64> = Item::new("scores_count");

/// In-process record store with failure injection. Every `update_record` call
/// is logged, including the ones made to fail.
#[derive(Default)]
pub struct MemoryRecordStore {
    storage: MemoryStorage,
    update_calls: Vec<(String, RecordUpdate)>,
    failing_updates: u32,
    unavailable: bool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, assigning `doc-<n>` when `record.id` is empty.
    pub fn insert(&mut self, mut record: ScoreRecord) -> StdResult<String> {
        if record.id.is_empty() {
            let count = RECORD_COUNT
                .may_load(&self.storage)?
                .unwrap_or_default()
                + 1;
            RECORD_COUNT.save(&mut self.storage, &count)?;
            record.id = format!("doc-{}", count);
        }
        RECORDS.save(&mut self.storage, &record.id, &record)?;
        Ok(record.id)
    }

    pub fn get(&self, id: &str) -> StdResult<Option<ScoreRecord>> {
        RECORDS.may_load(&self.storage, id)
    }

    /// The next `count` updates fail with `Unavailable`.
    pub fn fail_next_updates(&mut self, count: u32) {
        self.failing_updates = count;
    }

    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn update_calls(&self) -> &[(String, RecordUpdate)] {
        &self.update_calls
    }
}

impl RecordStore for MemoryRecordStore {
    fn list_records(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("scores collection offline".to_string()));
        }
        let records = RECORDS
            .range(&self.storage, None, None, Order::Ascending)
            .map(|item| item.map(|(_, record)| record))
            .collect::<StdResult<Vec<_>>>()?;
        Ok(records)
    }

    fn update_record(&mut self, id: &str, update: &RecordUpdate) -> Result<(), StoreError> {
        self.update_calls.push((id.to_string(), update.clone()));
        if self.unavailable {
            return Err(StoreError::Unavailable("scores collection offline".to_string()));
        }
        if self.failing_updates > 0 {
            self.failing_updates -= 1;
            return Err(StoreError::Unavailable(format!("write to {} rejected", id)));
        }
        let mut record = RECORDS
            .may_load(&self.storage, id)?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        record.apply(update);
        RECORDS.save(&mut self.storage, id, &record)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SettlementKind;
    use cosmwasm_std::{Timestamp, Uint128};

    #[test]
    fn assigns_ids_and_lists_in_order() {
        let mut store = MemoryRecordStore::new();
        let first = store
            .insert(ScoreRecord::new("", "0xAAA", Uint128::new(1)))
            .unwrap();
        let second = store
            .insert(ScoreRecord::new("", "0xBBB", Uint128::new(2)))
            .unwrap();
        assert_eq!(first, "doc-1");
        assert_eq!(second, "doc-2");

        let records = store.list_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].wallet, "0xAAA");
        assert_eq!(
            store.find_by_wallet("0xbbb").unwrap().map(|r| r.id),
            Some("doc-2".to_string())
        );
    }

    #[test]
    fn injected_failure_leaves_record_untouched() {
        let mut store = MemoryRecordStore::new();
        let id = store
            .insert(ScoreRecord::new("", "0xAAA", Uint128::new(9)))
            .unwrap();
        let update = RecordUpdate::settle(
            SettlementKind::Claim,
            "0xTX",
            Uint128::new(9),
            Timestamp::from_seconds(10),
        );

        store.fail_next_updates(1);
        assert!(matches!(
            store.update_record(&id, &update),
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.get(&id).unwrap().unwrap().claimable_amount, Uint128::new(9));

        store.update_record(&id, &update).unwrap();
        assert!(store.get(&id).unwrap().unwrap().claim_done);
        assert_eq!(store.update_calls().len(), 2);
    }

    #[test]
    fn update_of_missing_record_fails() {
        let mut store = MemoryRecordStore::new();
        let err = store
            .update_record("doc-404", &RecordUpdate::default())
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                id: "doc-404".to_string()
            }
        );
    }
}
