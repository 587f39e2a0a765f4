mod authentication;
mod health_check;
mod order;
mod product;
mod users;

pub use authentication::*;
pub use health_check::*;
pub use order::*;
pub use product::*;
pub use users::*;
