use chrono::NaiveDateTime;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Integer, Text, Timestamp};
use serde::Serialize;
use tracing::debug;

use super::query::{self, ListingFilter};
use crate::db::schema::articles;
use crate::utils::serialize_date;

static SELECT_ARTICLE_WITH_COUNT: &str = "SELECT articles.article_id, articles.title, articles.topic,
       articles.author, articles.body, articles.created_at, articles.votes,
       COUNT(comments.comment_id)::int AS comment_count
  FROM articles LEFT JOIN comments ON comments.article_id = articles.article_id
 WHERE articles.article_id = $1
 GROUP BY articles.article_id;";

/// A stored article row.
#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, PartialEq)]
#[diesel(table_name = articles, primary_key(article_id))]
pub struct Article {
    pub article_id: i32,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    pub votes: i32,
}

/// One row of the article listing. Omits the body.
#[derive(Debug, QueryableByName, Serialize)]
pub struct ArticleSummary {
    #[diesel(sql_type = Integer)]
    pub article_id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub author: String,
    #[diesel(sql_type = Timestamp)]
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    #[diesel(sql_type = Text)]
    pub topic: String,
    #[diesel(sql_type = Integer)]
    pub votes: i32,
    #[diesel(sql_type = Integer)]
    pub comment_count: i32,
}

#[derive(Debug, QueryableByName, Serialize)]
pub struct ArticleDetail {
    #[diesel(sql_type = Integer)]
    pub article_id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub topic: String,
    #[diesel(sql_type = Text)]
    pub author: String,
    #[diesel(sql_type = Text)]
    pub body: String,
    #[diesel(sql_type = Timestamp)]
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    #[diesel(sql_type = Integer)]
    pub votes: i32,
    #[diesel(sql_type = Integer)]
    pub comment_count: i32,
}

impl Article {
    pub fn list(
        connection: &mut PgConnection,
        filter: &ListingFilter,
    ) -> QueryResult<Vec<ArticleSummary>> {
        let query = query::build(filter);
        debug!(sql = %query.sql, params = ?query.params, "listing articles");

        let mut statement = sql_query(query.sql).into_boxed::<Pg>();
        for param in query.params {
            statement = statement.bind::<Text, _>(param);
        }
        statement.load::<ArticleSummary>(connection)
    }

    pub fn load_with_count(
        connection: &mut PgConnection,
        id: i32,
    ) -> QueryResult<Option<ArticleDetail>> {
        sql_query(SELECT_ARTICLE_WITH_COUNT)
            .bind::<Integer, _>(id)
            .get_result::<ArticleDetail>(connection)
            .optional()
    }

    /// Adds `inc` to the stored vote count and returns the updated row.
    pub fn increment_votes(
        connection: &mut PgConnection,
        id: i32,
        inc: i32,
    ) -> QueryResult<Option<Article>> {
        use crate::db::schema::articles::dsl::*;
        diesel::update(articles.filter(article_id.eq(id)))
            .set(votes.eq(votes + inc))
            .returning(Article::as_returning())
            .get_result(connection)
            .optional()
    }
}
