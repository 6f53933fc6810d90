use chrono::{NaiveDateTime, Utc};
use diesel::insert_into;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{delete, get, post};
use rocket::tokio::try_join;
use serde::{Deserialize, Serialize};

use crate::db::schema::comments;
use crate::db::{Db, Reference};
use crate::types::{parse_id, ApiError, ApiResult};
use crate::utils::serialize_date;

pub const EMPTY_COMMENT: &str = "400: Comment is empty";

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, PartialEq)]
#[diesel(table_name = comments, primary_key(comment_id))]
pub struct Comment {
    pub comment_id: i32,
    pub body: String,
    pub article_id: i32,
    pub author: String,
    pub votes: i32,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    article_id: i32,
    author: String,
    body: String,
    votes: i32,
    created_at: NaiveDateTime,
}

impl Comment {
    /// Newest first.
    pub fn load_for_article(connection: &mut PgConnection, id: i32) -> QueryResult<Vec<Comment>> {
        use crate::db::schema::comments::dsl::*;
        comments
            .filter(article_id.eq(id))
            .order((created_at.desc(), comment_id.desc()))
            .select(Comment::as_select())
            .load(connection)
    }

    pub fn create(connection: &mut PgConnection, new_comment: &NewComment) -> QueryResult<Comment> {
        insert_into(comments::table)
            .values(new_comment)
            .returning(Comment::as_returning())
            .get_result(connection)
    }

    /// Returns the number of rows removed.
    pub fn delete(connection: &mut PgConnection, id: i32) -> QueryResult<usize> {
        use crate::db::schema::comments::dsl::*;
        diesel::delete(comments.filter(comment_id.eq(id))).execute(connection)
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

impl CommentBody {
    /// Checks the request shape and returns the author and body.
    fn validate(self) -> Result<(String, String), ApiError> {
        let username = self.username.unwrap_or_default();
        Reference::user(username.as_str())?;
        match self.body {
            Some(body) if !body.trim().is_empty() => Ok((username, body)),
            _ => Err(ApiError::validation(EMPTY_COMMENT)),
        }
    }
}

#[get("/articles/<article_id>/comments")]
pub async fn list(db: Db, article_id: &str) -> ApiResult<Vec<Comment>> {
    let id = parse_id(article_id)?;
    db.exists(Reference::article(id)).await?;

    let comments = db
        .run(move |conn| Ok(Comment::load_for_article(conn, id)?))
        .await?;
    Ok(Json(comments))
}

#[post("/articles/<article_id>/comments", data = "<details>")]
pub async fn create(
    db: Db,
    article_id: &str,
    details: Json<CommentBody>,
) -> Result<(Status, Json<Comment>), ApiError> {
    let id = parse_id(article_id)?;
    let (username, body) = details.into_inner().validate()?;
    let author = Reference::user(username.as_str())?;

    try_join!(db.exists(author), db.exists(Reference::article(id)))?;

    let new_comment = NewComment {
        article_id: id,
        author: username,
        body,
        votes: 0,
        created_at: Utc::now().naive_utc(),
    };
    let comment = db
        .run(move |conn| Ok(Comment::create(conn, &new_comment)?))
        .await?;
    Ok((Status::Created, Json(comment)))
}

#[delete("/comments/<comment_id>")]
pub async fn delete(db: Db, comment_id: &str) -> Result<Status, ApiError> {
    let id = parse_id(comment_id)?;
    let removed = db.run(move |conn| Ok(Comment::delete(conn, id)?)).await?;
    if removed == 0 {
        return Err(Reference::comment(id).not_found());
    }
    Ok(Status::NoContent)
}
