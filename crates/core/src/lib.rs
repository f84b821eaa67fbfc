//! Core data types shared by every exchange adapter.

pub mod orderbook;
pub mod pair;
pub mod symbol;

pub use orderbook::*;
pub use pair::*;
pub use symbol::*;
