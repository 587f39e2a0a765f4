use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    db_interaction::{get_product_by_id, list_products, CatalogError},
    models::Product,
    utils::{error_fmt_chain, get_pooled_connection, DbPool, ErrorBody, ErrorKind, PoolGetError}
};

#[derive(Serialize, Deserialize, Debug)]
pub struct ProductsResponse{
    pub products: Vec<Product>
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProductResponse{
    pub product: Product
}

#[derive(Error)]
pub enum GetProductError{
    #[error("product {0} does not exist")]
    NotFound(i32),
    #[error("Failed to read catalog")]
    CatalogError(#[from] CatalogError),
    #[error("Failed to get connection from pool")]
    PoolError(#[from] PoolGetError)
}

impl Debug for GetProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for GetProductError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            GetProductError::NotFound(_) => {
                ErrorBody::new(ErrorKind::ProductNotFound, self.to_string()).into_response()
            },
            _ => {
                tracing::error!(error = ?self, "Catalog read failed");
                ErrorBody::new(ErrorKind::StorageFault, "Failed due to internal error").into_response()
            }
        }
    }
}

#[tracing::instrument(
    "Get all products",
    skip(pool)
)]
pub async fn get_products(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, GetProductError> {
    let conn = get_pooled_connection(&pool).await?;
    let products = list_products(conn).await?;

    Ok(HttpResponse::Ok().json(ProductsResponse{ products }))
}

#[tracing::instrument(
    "Get product by id",
    skip(pool)
)]
pub async fn get_product(
    pool: web::Data<DbPool>,
    path: web::Path<i32>
) -> Result<HttpResponse, GetProductError> {
    let product_id = path.into_inner();
    let conn = get_pooled_connection(&pool).await?;

    match get_product_by_id(conn, product_id).await? {
        Some(product) => Ok(HttpResponse::Ok().json(ProductResponse{ product })),
        None => Err(GetProductError::NotFound(product_id))
    }
}
