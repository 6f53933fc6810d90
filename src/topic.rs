use diesel::pg::PgConnection;
use diesel::prelude::*;
use rocket::serde::json::Json;
use rocket::get;
use serde::Serialize;

use crate::db::schema::topics;
use crate::db::Db;
use crate::types::ApiResult;

#[derive(Debug, Queryable, Selectable, Serialize, PartialEq)]
#[diesel(table_name = topics)]
pub struct Topic {
    pub slug: String,
    pub description: String,
}

impl Topic {
    pub fn load_all(connection: &mut PgConnection) -> QueryResult<Vec<Topic>> {
        use crate::db::schema::topics::dsl::*;
        topics
            .select(Topic::as_select())
            .order(slug.asc())
            .load(connection)
    }
}

#[get("/topics")]
pub async fn list(db: Db) -> ApiResult<Vec<Topic>> {
    let topics = db.run(|conn| Ok(Topic::load_all(conn)?)).await?;
    Ok(Json(topics))
}
