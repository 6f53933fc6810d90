use rocket::serde::json::Json;
use rocket::get;

use crate::db::Db;
use crate::types::{ApiError, ApiResult};

pub mod models;

use self::models::User;

#[get("/users")]
pub async fn list(db: Db) -> ApiResult<Vec<User>> {
    let users = db
        .run(|conn| User::load_all(conn).map_err(ApiError::from))
        .await?;
    Ok(Json(users))
}
