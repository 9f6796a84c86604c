use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    #[error("Record not found: {id}")]
    NotFound { id: String },
}
