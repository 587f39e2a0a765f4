use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    auth::extractors::IsUser,
    db_interaction::list_users,
    models::UserSummary,
    utils::{get_pooled_connection, DbPool, ErrorBody, ErrorKind}
};

#[derive(Serialize, Deserialize, Debug)]
pub struct UsersResponse{
    pub users: Vec<UserSummary>
}

#[tracing::instrument(
    "Listing registered users",
    skip(pool, _uid)
)]
pub async fn get_users(
    pool: web::Data<DbPool>,
    _uid: IsUser
) -> HttpResponse {
    let conn = match get_pooled_connection(&pool).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to get connection");
            return ErrorBody::new(ErrorKind::StorageFault, "Failed due to internal error").into_response()
        }
    };

    match list_users(conn).await {
        Ok(users) => HttpResponse::Ok().json(UsersResponse{ users }),
        Err(e) => {
            tracing::error!(error = ?e, "Failed to list users");
            ErrorBody::new(ErrorKind::StorageFault, "Failed due to internal error").into_response()
        }
    }
}
