pub mod config;
mod error;
pub mod event;
pub mod reconciler;
pub mod state;

pub use crate::config::{ClaimConfig, PayoutPolicy, SettlementConfig};
pub use crate::error::FlowError;
pub use crate::reconciler::{Clock, ClaimReconciler, Eligibility, SystemClock};
pub use crate::state::{AttemptOutcome, ClaimAttempt, ClaimPhase, ReconciledTx};
