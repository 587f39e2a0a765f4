use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    auth::extractors::IsUser,
    db_interaction::{list_orders_by_buyer, list_orders_by_seller},
    models::Order,
    utils::{get_pooled_connection, DbPool, ErrorBody, ErrorKind}
};

#[derive(Serialize, Deserialize, Debug)]
pub struct OrdersResponse{
    pub orders: Vec<Order>
}

fn internal_error() -> HttpResponse {
    ErrorBody::new(ErrorKind::StorageFault, "Failed due to internal error").into_response()
}

#[tracing::instrument(
    "Getting purchases of caller",
    skip(pool, uid),
    fields(buyer_id = uid.0.id)
)]
pub async fn get_purchases(
    pool: web::Data<DbPool>,
    uid: IsUser
) -> HttpResponse {
    let conn = match get_pooled_connection(&pool).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to get connection");
            return internal_error()
        }
    };

    match list_orders_by_buyer(conn, uid.0.id).await {
        Ok(orders) => HttpResponse::Ok().json(OrdersResponse{ orders }),
        Err(e) => {
            tracing::error!(error = ?e, "Failed to list purchases");
            internal_error()
        }
    }
}

#[tracing::instrument(
    "Getting sales of caller",
    skip(pool, uid),
    fields(seller_id = uid.0.id)
)]
pub async fn get_sales(
    pool: web::Data<DbPool>,
    uid: IsUser
) -> HttpResponse {
    let conn = match get_pooled_connection(&pool).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to get connection");
            return internal_error()
        }
    };

    match list_orders_by_seller(conn, uid.0.id).await {
        Ok(orders) => HttpResponse::Ok().json(OrdersResponse{ orders }),
        Err(e) => {
            tracing::error!(error = ?e, "Failed to list sales");
            internal_error()
        }
    }
}
