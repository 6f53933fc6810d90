use rocket::serde::json::Json;
use rocket::{get, patch};
use rocket::tokio::try_join;
use serde::Deserialize;
use serde_json::Value;

use crate::db::{Db, Reference};
use crate::types::{parse_id, ApiError, ApiResult};

pub mod models;
pub mod query;

use self::models::{Article, ArticleDetail, ArticleSummary};
use self::query::ListingFilter;

pub const NO_VOTES: &str = "400 Bad Request: no votes found!";
pub const VOTES_NOT_NUMERIC: &str = "400 Bad Request: votes have to be a number";
pub const VOTES_NOT_WHOLE: &str = "400 Bad Request: votes have to be a whole number";

#[derive(Debug, Deserialize)]
pub struct VoteChange {
    #[serde(default)]
    inc_votes: Option<Value>,
}

impl VoteChange {
    /// Zero is a valid increment; only an absent or null key counts as missing.
    pub fn increment(&self) -> Result<i32, ApiError> {
        match &self.inc_votes {
            None | Some(Value::Null) => Err(ApiError::validation(NO_VOTES)),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| ApiError::validation(VOTES_NOT_WHOLE)),
            Some(_) => Err(ApiError::validation(VOTES_NOT_NUMERIC)),
        }
    }
}

#[get("/articles?<topic>&<sort_by>&<order>")]
pub async fn list(
    db: Db,
    topic: Option<String>,
    sort_by: Option<&str>,
    order: Option<&str>,
) -> ApiResult<Vec<ArticleSummary>> {
    let filter = ListingFilter::parse(topic, sort_by, order)?;
    let topic = filter.topic.clone().map(Reference::topic).transpose()?;

    let listing = db.run(move |conn| Ok(Article::list(conn, &filter)?));
    let articles = match topic {
        Some(topic) => try_join!(db.exists(topic), listing)?.1,
        None => listing.await?,
    };
    Ok(Json(articles))
}

#[get("/articles/<article_id>")]
pub async fn get(db: Db, article_id: &str) -> ApiResult<Vec<ArticleDetail>> {
    let id = parse_id(article_id)?;
    let reference = Reference::article(id);
    db.exists(reference.clone()).await?;

    let article = db
        .run(move |conn| Article::load_with_count(conn, id)?.ok_or_else(|| reference.not_found()))
        .await?;
    Ok(Json(vec![article]))
}

#[patch("/articles/<article_id>", data = "<change>")]
pub async fn update(db: Db, article_id: &str, change: Json<VoteChange>) -> ApiResult<Article> {
    let id = parse_id(article_id)?;
    let inc = change.increment()?;
    let reference = Reference::article(id);

    let missing = reference.not_found();
    let updating = db.run(move |conn| {
        Article::increment_votes(conn, id, inc)?.ok_or(missing)
    });
    let (_, article) = try_join!(db.exists(reference), updating)?;
    Ok(Json(article))
}
