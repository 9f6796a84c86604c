pub use crate::error::*;
pub use crate::msg::*;
pub use crate::traits::*;

mod error;
mod msg;
mod traits;

#[cfg(not(target_arch = "wasm32"))]
pub mod mock;
