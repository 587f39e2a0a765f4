use std::{error::Error, fmt::Debug};

use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper, SqliteConnection};
use thiserror::Error;

use crate::{
    domain::quantity::Quantity,
    models::{NewProductRow, Product, ProductRow},
    schema::products,
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection}
};

// Errors raised by catalog reads and inserts
#[derive(Error)]
pub enum CatalogError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run catalog query")]
    QueryError(#[from] diesel::result::Error),
    #[error("Stored product description is not valid JSON")]
    CorruptDescription(#[from] serde_json::Error)
}

impl Debug for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[derive(Error)]
pub enum StockDecrementError{
    #[error("product {0} does not exist")]
    NotFound(i32),
    #[error("only {available} units in stock")]
    InsufficientStock{ available: i32 },
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run stock update")]
    QueryError(#[from] diesel::result::Error)
}

impl Debug for StockDecrementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

pub fn find_product(
    conn: &mut SqliteConnection,
    product_id: i32
) -> Result<Option<ProductRow>, diesel::result::Error>{
    products::table
        .find(product_id)
        .select(ProductRow::as_select())
        .first::<ProductRow>(conn)
        .optional()
}

// Conditional update: the row is only touched when stock covers the amount,
// so concurrent decrements on one product can never drive stock below zero.
// `Quantity` is always >= 1, so stock only ever goes down here.
pub fn decrement_stock(
    conn: &mut SqliteConnection,
    product_id: i32,
    amount: Quantity
) -> Result<i32, StockDecrementError>{
    let amount = amount.inner();
    let updated = diesel::update(
            products::table
                .filter(products::id.eq(product_id))
                .filter(products::stock.ge(amount))
        )
        .set(products::stock.eq(products::stock - amount))
        .returning(products::stock)
        .get_result::<i32>(conn)
        .optional()?;

    if let Some(new_stock) = updated {
        return Ok(new_stock)
    }

    let current = products::table
        .find(product_id)
        .select(products::stock)
        .first::<i32>(conn)
        .optional()?;

    match current {
        Some(available) => Err(StockDecrementError::InsufficientStock{ available }),
        None => Err(StockDecrementError::NotFound(product_id))
    }
}

#[tracing::instrument(
    "Inserting product into catalog",
    skip_all,
    fields(seller_id = new_product.seller_id)
)]
pub async fn create_product(
    mut conn: DbConnection,
    new_product: NewProductRow
) -> Result<Product, CatalogError>{
    let row = spawn_blocking_with_tracing(move || {
        diesel::insert_into(products::table)
            .values(&new_product)
            .returning(ProductRow::as_returning())
            .get_result::<ProductRow>(&mut conn)
    })
    .await??;

    Ok(Product::try_from(row)?)
}

#[tracing::instrument(
    "Getting product by id",
    skip(conn)
)]
pub async fn get_product_by_id(
    mut conn: DbConnection,
    product_id: i32
) -> Result<Option<Product>, CatalogError>{
    let row = spawn_blocking_with_tracing(move || {
        find_product(&mut conn, product_id)
    })
    .await??;

    Ok(row.map(Product::try_from).transpose()?)
}

#[tracing::instrument(
    "Listing all products",
    skip_all
)]
pub async fn list_products(
    mut conn: DbConnection
) -> Result<Vec<Product>, CatalogError>{
    let rows = spawn_blocking_with_tracing(move || {
        products::table
            .select(ProductRow::as_select())
            .order(products::id.asc())
            .load::<ProductRow>(&mut conn)
    })
    .await??;

    Ok(rows.into_iter()
        .map(Product::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

#[tracing::instrument(
    "Decrementing product stock",
    skip(conn)
)]
pub async fn decrement_product_stock(
    mut conn: DbConnection,
    product_id: i32,
    amount: Quantity
) -> Result<i32, StockDecrementError>{
    spawn_blocking_with_tracing(move || {
        decrement_stock(&mut conn, product_id, amount)
    })
    .await?
}
