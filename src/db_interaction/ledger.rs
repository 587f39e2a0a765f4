use std::{error::Error, fmt::Debug};

use chrono::Utc;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper, SqliteConnection};
use thiserror::Error;

use crate::{
    models::{NewOrderRow, Order},
    schema::orders,
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection}
};

// Order fields supplied by the caller; id and timestamp are assigned here
#[derive(Debug, Clone)]
pub struct NewOrder{
    pub product_id: i32,
    pub buyer_id: i32,
    pub seller_id: i32,
    pub quantity: i32,
    pub total_price: f64
}

#[derive(Error)]
pub enum LedgerError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run ledger query")]
    QueryError(#[from] diesel::result::Error)
}

impl Debug for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

pub fn insert_order(
    conn: &mut SqliteConnection,
    order: NewOrder
) -> Result<Order, diesel::result::Error>{
    let row = NewOrderRow{
        product_id: order.product_id,
        buyer_id: order.buyer_id,
        seller_id: order.seller_id,
        quantity: order.quantity,
        total_price: order.total_price,
        created_at: Utc::now().naive_utc()
    };

    diesel::insert_into(orders::table)
        .values(&row)
        .returning(Order::as_returning())
        .get_result::<Order>(conn)
}

#[tracing::instrument(
    "Appending order to ledger",
    skip(conn)
)]
pub async fn append_order(
    mut conn: DbConnection,
    order: NewOrder
) -> Result<Order, LedgerError>{
    Ok(spawn_blocking_with_tracing(move || {
        insert_order(&mut conn, order)
    })
    .await??)
}

#[derive(Debug, Clone, Copy)]
pub enum OrderParty{
    Buyer(i32),
    Seller(i32)
}

// Newest first; id breaks ties between orders created in the same instant
pub fn load_orders(
    conn: &mut SqliteConnection,
    party: OrderParty
) -> Result<Vec<Order>, diesel::result::Error>{
    let mut query = orders::table
        .select(Order::as_select())
        .into_boxed();

    query = match party {
        OrderParty::Buyer(id) => query.filter(orders::buyer_id.eq(id)),
        OrderParty::Seller(id) => query.filter(orders::seller_id.eq(id))
    };

    query
        .order((orders::created_at.desc(), orders::id.desc()))
        .load::<Order>(conn)
}

#[tracing::instrument(
    "Listing orders placed by buyer",
    skip(conn)
)]
pub async fn list_orders_by_buyer(
    mut conn: DbConnection,
    buyer_id: i32
) -> Result<Vec<Order>, LedgerError>{
    Ok(spawn_blocking_with_tracing(move || {
        load_orders(&mut conn, OrderParty::Buyer(buyer_id))
    })
    .await??)
}

#[tracing::instrument(
    "Listing orders received by seller",
    skip(conn)
)]
pub async fn list_orders_by_seller(
    mut conn: DbConnection,
    seller_id: i32
) -> Result<Vec<Order>, LedgerError>{
    Ok(spawn_blocking_with_tracing(move || {
        load_orders(&mut conn, OrderParty::Seller(seller_id))
    })
    .await??)
}
