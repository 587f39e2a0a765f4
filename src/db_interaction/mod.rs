pub mod catalog;
pub mod ledger;
pub mod purchase;
pub mod user;

pub use catalog::*;
pub use ledger::*;
pub use purchase::*;
pub use user::*;
