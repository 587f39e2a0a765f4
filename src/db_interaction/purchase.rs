use std::{error::Error, fmt::Debug};

use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    domain::{quantity::Quantity, unit_price::UnitPrice},
    models::Order,
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection, ErrorBody, ErrorKind}
};

use super::{catalog::{decrement_stock, find_product, StockDecrementError}, ledger::{insert_order, NewOrder}};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt{
    pub order: Order,
    pub new_stock: i32
}

// Error associated with buying a product
#[derive(Error)]
pub enum PurchaseError{
    #[error("{0}")]
    InvalidRequest(String),
    #[error("product {0} does not exist")]
    ProductNotFound(i32),
    #[error("sellers cannot buy their own products")]
    SelfPurchaseForbidden,
    #[error("requested {requested} units but only {available} are in stock")]
    InsufficientStock{ requested: i32, available: i32 },
    #[error("stored price {price:?} of product {product_id} is not a number")]
    CorruptPrice{ product_id: i32, price: String },
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run purchase queries")]
    StorageFault(#[from] diesel::result::Error)
}

impl Debug for PurchaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl PurchaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PurchaseError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            PurchaseError::ProductNotFound(_) => ErrorKind::ProductNotFound,
            PurchaseError::SelfPurchaseForbidden => ErrorKind::SelfPurchaseForbidden,
            PurchaseError::InsufficientStock{ .. } => ErrorKind::InsufficientStock,
            PurchaseError::CorruptPrice{ .. }
                | PurchaseError::ThreadpoolError(_)
                | PurchaseError::StorageFault(_) => ErrorKind::StorageFault
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        match self {
            PurchaseError::InsufficientStock{ available, .. } => {
                ErrorBody::new(self.kind(), self.to_string()).with_available_stock(*available)
            },
            e if e.kind() == ErrorKind::StorageFault => {
                ErrorBody::new(ErrorKind::StorageFault, "Failed due to internal error")
            },
            e => ErrorBody::new(e.kind(), e.to_string())
        }
    }
}

// Runs inside a single immediate transaction so the stock decrement and the
// ledger append commit or roll back together.
fn execute_purchase(
    conn: &mut SqliteConnection,
    buyer_id: i32,
    product_id: i32,
    quantity: Quantity
) -> Result<PurchaseReceipt, PurchaseError>{
    conn.immediate_transaction::<PurchaseReceipt, PurchaseError, _>(|conn| {
        let product = find_product(conn, product_id)?
            .ok_or(PurchaseError::ProductNotFound(product_id))?;

        if product.seller_id == buyer_id {
            return Err(PurchaseError::SelfPurchaseForbidden)
        }

        if product.stock < quantity.inner() {
            return Err(PurchaseError::InsufficientStock{
                requested: quantity.inner(),
                available: product.stock
            })
        }

        let unit_price = UnitPrice::parse_stored(&product.price)
            .map_err(|_| PurchaseError::CorruptPrice{
                product_id,
                price: product.price.clone()
            })?;
        let total_price = unit_price.total_for(quantity.inner())
            .ok_or_else(|| PurchaseError::InvalidRequest(format!(
                "total price of {} units is too large", quantity
            )))?;

        let new_stock = decrement_stock(conn, product_id, quantity)
            .map_err(|e| match e {
                StockDecrementError::NotFound(id) => PurchaseError::ProductNotFound(id),
                StockDecrementError::InsufficientStock{ available } => PurchaseError::InsufficientStock{
                    requested: quantity.inner(),
                    available
                },
                StockDecrementError::QueryError(e) => PurchaseError::StorageFault(e),
                StockDecrementError::ThreadpoolError(e) => PurchaseError::ThreadpoolError(e)
            })?;

        let order = insert_order(conn, NewOrder{
            product_id,
            buyer_id,
            seller_id: product.seller_id,
            quantity: quantity.inner(),
            total_price
        })?;

        Ok(PurchaseReceipt{ order, new_stock })
    })
}

#[tracing::instrument(
    "Purchasing product",
    skip(conn)
)]
pub async fn purchase_product(
    mut conn: DbConnection,
    buyer_id: i32,
    product_id: i32,
    quantity: i64
) -> Result<PurchaseReceipt, PurchaseError>{
    let quantity = Quantity::parse(quantity)
        .map_err(PurchaseError::InvalidRequest)?;

    let res = spawn_blocking_with_tracing(move || {
        execute_purchase(&mut conn, buyer_id, product_id, quantity)
    })
    .await?;

    match &res {
        Ok(receipt) => tracing::info!(
            order_id = receipt.order.id,
            new_stock = receipt.new_stock,
            "Purchase recorded"
        ),
        Err(e) if e.kind() == ErrorKind::StorageFault => tracing::error!(error = ?e, "Purchase failed"),
        Err(e) => tracing::info!(error = %e, "Purchase rejected")
    }

    res
}
