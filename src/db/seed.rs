//! Rebuilds the schema and loads a dataset.
//!
//! Datasets are four JSON files in one directory. Timestamps are epoch
//! milliseconds and comments point at their article by title, so the
//! helpers here resolve both before rows are inserted.

use chrono::{DateTime, NaiveDateTime};
use diesel::connection::SimpleConnection;
use diesel::insert_into;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::db::schema::{articles, comments, topics, users};
use crate::errors::{Error, ErrorKind, Result};

static SCHEMA: &str = include_str!("../../db/schema.sql");

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = topics)]
pub struct TopicSeed {
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = users)]
pub struct UserSeed {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ArticleSeed {
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: i64,
    #[serde(default)]
    pub votes: i32,
}

#[derive(Debug, Deserialize)]
pub struct CommentSeed {
    pub body: String,
    pub belongs_to: String,
    pub created_by: String,
    #[serde(default)]
    pub votes: i32,
    pub created_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = articles)]
struct NewArticleRow<'a> {
    title: &'a str,
    topic: &'a str,
    author: &'a str,
    body: &'a str,
    created_at: NaiveDateTime,
    votes: i32,
}

#[derive(Debug, PartialEq, Insertable)]
#[diesel(table_name = comments)]
pub struct CommentRow<'a> {
    pub body: &'a str,
    pub article_id: i32,
    pub author: &'a str,
    pub votes: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Default)]
pub struct SeedData {
    pub topics: Vec<TopicSeed>,
    pub users: Vec<UserSeed>,
    pub articles: Vec<ArticleSeed>,
    pub comments: Vec<CommentSeed>,
}

impl SeedData {
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<SeedData> {
        let dir = dir.as_ref();
        Ok(SeedData {
            topics: read_json(&dir.join("topics.json"))?,
            users: read_json(&dir.join("users.json"))?,
            articles: read_json(&dir.join("articles.json"))?,
            comments: read_json(&dir.join("comments.json"))?,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn convert_timestamp(ms: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms)
        .map(|d| d.naive_utc())
        .ok_or_else(|| ErrorKind::InvalidTimestamp(ms).into())
}

/// Builds a lookup from one field of each row to another.
pub fn create_ref<T, K, V, FK, FV>(rows: &[T], key: FK, value: FV) -> HashMap<K, V>
where
    K: std::hash::Hash + Eq,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> V,
{
    rows.iter().map(|row| (key(row), value(row))).collect()
}

pub fn format_comments<'a>(
    raw: &'a [CommentSeed],
    article_ids: &HashMap<String, i32>,
) -> Result<Vec<CommentRow<'a>>> {
    raw.iter()
        .map(|comment| {
            let article_id = *article_ids
                .get(&comment.belongs_to)
                .ok_or_else(|| ErrorKind::UnknownArticle(comment.belongs_to.clone()))?;
            Ok(CommentRow {
                body: &comment.body,
                article_id,
                author: &comment.created_by,
                votes: comment.votes,
                created_at: convert_timestamp(comment.created_at)?,
            })
        })
        .collect()
}

pub fn seed(conn: &mut PgConnection, data: &SeedData) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        conn.batch_execute(SCHEMA)?;

        insert_into(topics::table)
            .values(&data.topics)
            .execute(conn)?;
        insert_into(users::table).values(&data.users).execute(conn)?;

        let new_articles = data
            .articles
            .iter()
            .map(|article| {
                Ok(NewArticleRow {
                    title: &article.title,
                    topic: &article.topic,
                    author: &article.author,
                    body: &article.body,
                    created_at: convert_timestamp(article.created_at)?,
                    votes: article.votes,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let inserted = insert_into(articles::table)
            .values(&new_articles)
            .returning((articles::title, articles::article_id))
            .get_results::<(String, i32)>(conn)?;

        let article_ids = create_ref(&inserted, |row| row.0.clone(), |row| row.1);
        let new_comments = format_comments(&data.comments, &article_ids)?;
        insert_into(comments::table)
            .values(&new_comments)
            .execute(conn)?;

        info!(
            topics = data.topics.len(),
            users = data.users.len(),
            articles = inserted.len(),
            comments = new_comments.len(),
            "database seeded"
        );
        Ok(())
    })
}
