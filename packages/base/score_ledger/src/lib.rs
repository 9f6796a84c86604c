pub use crate::error::*;
pub use crate::state::*;
pub use crate::traits::*;

mod error;
mod state;
mod traits;

#[cfg(not(target_arch = "wasm32"))]
pub mod mock;
