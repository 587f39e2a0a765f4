use chrono::NaiveDateTime;
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::domain::capabilities::Capabilities;
use crate::schema::{orders, products, users};

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User{
    pub id: i32,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub password_hash: String,
    pub can_buy: bool,
    pub can_sell: bool
}

impl User {
    pub fn capabilities(&self) -> Capabilities {
        Capabilities{
            can_buy: self.can_buy,
            can_sell: self.can_sell
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser{
    pub email: String,
    pub phone: String,
    pub name: String,
    pub password_hash: String,
    pub can_buy: bool,
    pub can_sell: bool
}

// Public projection of a user, never carries the password hash
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = users)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary{
    pub id: i32,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub can_buy: bool,
    pub can_sell: bool
}

// Product row as stored: description is a serialized JSON document
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductRow{
    pub id: i32,
    pub name: String,
    pub price: String,
    pub rating: f64,
    pub description: String,
    pub image_url: String,
    pub seller_id: i32,
    pub stock: i32
}

#[derive(Insertable, Debug)]
#[diesel(table_name = products)]
pub struct NewProductRow{
    pub name: String,
    pub price: String,
    pub rating: f64,
    pub description: String,
    pub image_url: String,
    pub seller_id: i32,
    pub stock: i32
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product{
    pub id: i32,
    pub name: String,
    pub price: String,
    pub rating: f64,
    pub description: serde_json::Value,
    pub image_url: String,
    pub seller_id: i32,
    pub stock: i32
}

impl TryFrom<ProductRow> for Product {
    type Error = serde_json::Error;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product{
            id: row.id,
            name: row.name,
            price: row.price,
            rating: row.rating,
            description: serde_json::from_str(&row.description)?,
            image_url: row.image_url,
            seller_id: row.seller_id,
            stock: row.stock
        })
    }
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Order{
    pub id: i32,
    pub product_id: i32,
    pub buyer_id: i32,
    pub seller_id: i32,
    pub quantity: i32,
    pub total_price: f64,
    pub created_at: NaiveDateTime
}

#[derive(Insertable, Debug)]
#[diesel(table_name = orders)]
pub struct NewOrderRow{
    pub product_id: i32,
    pub buyer_id: i32,
    pub seller_id: i32,
    pub quantity: i32,
    pub total_price: f64,
    pub created_at: NaiveDateTime
}
