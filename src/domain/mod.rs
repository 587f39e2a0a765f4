pub mod capabilities;
pub mod phone_number;
pub mod quantity;
pub mod unit_price;
pub mod user_email;
