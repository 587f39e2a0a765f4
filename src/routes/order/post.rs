use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    auth::extractors::IsUser,
    db_interaction::{purchase_product, PurchaseError},
    utils::{get_pooled_connection, DbPool, ErrorBody, ErrorKind, PoolGetError}
};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseJson{
    pub product_id: i32,
    pub quantity: i64
}

#[derive(Error, Debug)]
pub enum PostPurchaseError{
    #[error("user is not allowed to buy products")]
    Forbidden,
    #[error(transparent)]
    Purchase(#[from] PurchaseError),
    #[error("Failed to get connection from pool")]
    PoolError(#[from] PoolGetError)
}

impl ResponseError for PostPurchaseError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            PostPurchaseError::Forbidden => {
                ErrorBody::new(ErrorKind::Forbidden, self.to_string()).into_response()
            },
            PostPurchaseError::Purchase(e) => e.to_error_body().into_response(),
            PostPurchaseError::PoolError(e) => {
                tracing::error!(error = ?e, "Failed to get connection");
                ErrorBody::new(ErrorKind::StorageFault, "Failed due to internal error").into_response()
            }
        }
    }
}

#[tracing::instrument(
    "Posting purchase",
    skip(pool, uid),
    fields(buyer_id = uid.0.id)
)]
pub async fn post_purchase(
    pool: web::Data<DbPool>,
    json: web::Json<PurchaseJson>,
    uid: IsUser
) -> Result<HttpResponse, PostPurchaseError> {
    let buyer = uid.0;

    if !buyer.capabilities.can_buy {
        tracing::warn!("Caller without buyer capability tried to purchase");
        return Err(PostPurchaseError::Forbidden)
    }

    let conn = get_pooled_connection(&pool).await?;
    let receipt = purchase_product(conn, buyer.id, json.product_id, json.quantity).await?;

    Ok(HttpResponse::Ok().json(receipt))
}
