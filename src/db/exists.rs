//! Guard queries run before a dependent read or write.
//!
//! A `Reference` names one row by table and key column. Building one
//! validates the request shape (an empty key is a client error), and
//! `check` turns a missing row into the not-found failure for that entity.

use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::select;
use tracing::debug;

use crate::db::schema::{articles, comments, topics, users};
use crate::types::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    Article(i32),
    Comment(i32),
    Topic(String),
    User(String),
}

impl Reference {
    pub fn article(article_id: i32) -> Self {
        Reference::Article(article_id)
    }

    pub fn comment(comment_id: i32) -> Self {
        Reference::Comment(comment_id)
    }

    pub fn topic<S: Into<String>>(slug: S) -> Result<Self, ApiError> {
        let slug = slug.into();
        Self::require(&slug, "topics", "slug")?;
        Ok(Reference::Topic(slug))
    }

    pub fn user<S: Into<String>>(username: S) -> Result<Self, ApiError> {
        let username = username.into();
        Self::require(&username, "users", "username")?;
        Ok(Reference::User(username))
    }

    fn require(value: &str, table: &str, column: &str) -> Result<(), ApiError> {
        if value.trim().is_empty() {
            Err(ApiError::validation(format!(
                "400: Missing value for {}.{}",
                table, column
            )))
        } else {
            Ok(())
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Reference::Article(_) => "articles",
            Reference::Comment(_) => "comments",
            Reference::Topic(_) => "topics",
            Reference::User(_) => "users",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Reference::Article(_) => "article_id",
            Reference::Comment(_) => "comment_id",
            Reference::Topic(_) => "slug",
            Reference::User(_) => "username",
        }
    }

    pub fn not_found(&self) -> ApiError {
        let (entity, value) = match self {
            Reference::Article(id) => ("article", id.to_string()),
            Reference::Comment(id) => ("comment", id.to_string()),
            Reference::Topic(slug) => ("topic", slug.clone()),
            Reference::User(username) => ("user", username.clone()),
        };
        ApiError::NotFound(format!(
            "No {} found for {}: {}",
            entity,
            self.column(),
            value
        ))
    }

    fn is_present(&self, conn: &mut PgConnection) -> QueryResult<bool> {
        match self {
            Reference::Article(id) => {
                select(exists(articles::table.filter(articles::article_id.eq(*id)))).get_result(conn)
            }
            Reference::Comment(id) => {
                select(exists(comments::table.filter(comments::comment_id.eq(*id)))).get_result(conn)
            }
            Reference::Topic(slug) => {
                select(exists(topics::table.filter(topics::slug.eq(slug)))).get_result(conn)
            }
            Reference::User(username) => {
                select(exists(users::table.filter(users::username.eq(username)))).get_result(conn)
            }
        }
    }
}

pub fn check(conn: &mut PgConnection, reference: &Reference) -> Result<(), ApiError> {
    if reference.is_present(conn)? {
        Ok(())
    } else {
        debug!(
            table = reference.table(),
            column = reference.column(),
            "referenced row missing"
        );
        Err(reference.not_found())
    }
}
