//! Domain models for shop-floor production data.

pub mod entry;
pub mod macros;
pub mod user;

pub use entry::*;
pub use user::*;
