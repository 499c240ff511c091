//! Wire types for the Delivery API.

pub mod entities;
pub mod sync;

pub use entities::*;
pub use sync::*;
