use crate::{RecordUpdate, ScoreRecord, StoreError};

/// The hosted document collection holding one [`ScoreRecord`] per wallet.
pub trait RecordStore {
    fn list_records(&self) -> Result<Vec<ScoreRecord>, StoreError>;

    /// Writes only the fields present in `update`.
    fn update_record(&mut self, id: &str, update: &RecordUpdate) -> Result<(), StoreError>;

    fn find_by_wallet(&self, wallet: &str) -> Result<Option<ScoreRecord>, StoreError> {
        Ok(self
            .list_records()?
            .into_iter()
            .find(|record| record.matches_wallet(wallet)))
    }
}
