use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    auth::extractors::IsUser,
    db_interaction::{create_product, CatalogError},
    domain::unit_price::{PriceInput, UnitPrice},
    models::{NewProductRow, Product},
    utils::{error_fmt_chain, get_pooled_connection, DbPool, ErrorBody, ErrorKind, PoolGetError}
};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProductJson{
    name: Option<String>,
    price: Option<PriceInput>,
    rating: Option<f64>,
    description: Option<serde_json::Value>,
    image_url: Option<String>,
    stock: Option<i64>
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateProductResponse{
    pub message: String,
    pub product: Product
}

#[derive(Error)]
pub enum CreateProductError{
    #[error("{0}")]
    InvalidRequest(String),
    #[error("user is not allowed to sell products")]
    Forbidden,
    #[error("Failed to insert product into catalog")]
    CatalogError(#[from] CatalogError),
    #[error("Failed to get connection from pool")]
    PoolError(#[from] PoolGetError)
}

impl Debug for CreateProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for CreateProductError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            CreateProductError::InvalidRequest(_) => {
                ErrorBody::new(ErrorKind::InvalidRequest, self.to_string()).into_response()
            },
            CreateProductError::Forbidden => {
                ErrorBody::new(ErrorKind::Forbidden, self.to_string()).into_response()
            },
            _ => {
                tracing::error!(error = ?self, "Product creation failed");
                ErrorBody::new(ErrorKind::StorageFault, "Failed due to internal error").into_response()
            }
        }
    }
}

fn missing(field: &str) -> CreateProductError {
    CreateProductError::InvalidRequest(format!("{} is required", field))
}

// Turns the submitted fields into a row owned by the seller
pub fn validate_product(json: ProductJson, seller_id: i32) -> Result<NewProductRow, CreateProductError> {
    let name = json.name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| missing("name"))?;

    let price = UnitPrice::parse(json.price.ok_or_else(|| missing("price"))?)
        .map_err(CreateProductError::InvalidRequest)?;

    let rating = json.rating.ok_or_else(|| missing("rating"))?;
    if !rating.is_finite() {
        return Err(CreateProductError::InvalidRequest("rating must be a number".to_string()))
    }

    let description = match json.description {
        None | Some(serde_json::Value::Null) => return Err(missing("description")),
        Some(d) => d
    };

    let image_url = json.image_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| missing("imageUrl"))?;

    let stock = json.stock.ok_or_else(|| missing("stock"))?;
    let stock = i32::try_from(stock)
        .ok()
        .filter(|s| *s >= 0)
        .ok_or_else(|| CreateProductError::InvalidRequest(
            format!("stock must be a non-negative integer, got {}", stock)
        ))?;

    Ok(NewProductRow{
        name,
        price: price.to_stored(),
        rating,
        description: description.to_string(),
        image_url,
        seller_id,
        stock
    })
}

#[tracing::instrument(
    "Posting product to catalog",
    skip(pool, json, uid),
    fields(seller_id = uid.0.id)
)]
pub async fn post_product(
    pool: web::Data<DbPool>,
    json: web::Json<ProductJson>,
    uid: IsUser
) -> Result<HttpResponse, CreateProductError>{
    let caller = uid.0;

    if !caller.capabilities.can_sell {
        tracing::warn!("Caller without seller capability tried to list a product");
        return Err(CreateProductError::Forbidden)
    }

    let new_product = validate_product(json.into_inner(), caller.id)?;

    let conn = get_pooled_connection(&pool).await?;
    let product = create_product(conn, new_product).await?;

    tracing::info!(product_id = product.id, "Product created");

    Ok(HttpResponse::Ok().json(CreateProductResponse{
        message: "Product created successfully.".to_string(),
        product
    }))
}
