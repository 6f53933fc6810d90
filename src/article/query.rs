//! Builds the article listing statement.
//!
//! Caller-supplied values only ever reach the statement as bound
//! parameters. Sort columns are parsed into `SortColumn`, and only the
//! identifier that variant maps to is written into the SQL text.

use std::fmt;
use std::str::FromStr;

use crate::types::ApiError;

pub const COLUMN_NOT_FOUND: &str = "400: Column not found";
pub const ORDER_INVALID: &str = "400: Order is invalid";

static SELECT_LISTING: &str = "SELECT articles.article_id, articles.title, articles.author, \
articles.created_at, articles.topic, articles.votes, \
COUNT(comments.comment_id)::int AS comment_count \
FROM articles LEFT JOIN comments ON comments.article_id = articles.article_id";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    ArticleId,
    Title,
    Topic,
    Author,
    Body,
    #[default]
    CreatedAt,
    Votes,
}

impl SortColumn {
    pub fn identifier(self) -> &'static str {
        match self {
            SortColumn::ArticleId => "articles.article_id",
            SortColumn::Title => "articles.title",
            SortColumn::Topic => "articles.topic",
            SortColumn::Author => "articles.author",
            SortColumn::Body => "articles.body",
            SortColumn::CreatedAt => "articles.created_at",
            SortColumn::Votes => "articles.votes",
        }
    }
}

impl FromStr for SortColumn {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article_id" => Ok(SortColumn::ArticleId),
            "title" => Ok(SortColumn::Title),
            "topic" => Ok(SortColumn::Topic),
            "author" => Ok(SortColumn::Author),
            "body" => Ok(SortColumn::Body),
            "created_at" => Ok(SortColumn::CreatedAt),
            "votes" => Ok(SortColumn::Votes),
            _ => Err(ApiError::validation(COLUMN_NOT_FOUND)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl FromStr for Order {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Order::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Order::Desc)
        } else {
            Err(ApiError::validation(ORDER_INVALID))
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Order::Asc => f.write_str("ASC"),
            Order::Desc => f.write_str("DESC"),
        }
    }
}

/// Parsed listing parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub topic: Option<String>,
    pub sort_by: SortColumn,
    pub order: Order,
}

impl ListingFilter {
    /// Empty `sort_by`/`order` values are treated as absent.
    pub fn parse(
        topic: Option<String>,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> Result<Self, ApiError> {
        let sort_by = match sort_by.filter(|s| !s.is_empty()) {
            Some(column) => column.parse()?,
            None => SortColumn::default(),
        };
        let order = match order.filter(|s| !s.is_empty()) {
            Some(order) => order.parse()?,
            None => Order::default(),
        };
        Ok(ListingFilter {
            topic,
            sort_by,
            order,
        })
    }
}

#[derive(Debug, PartialEq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<String>,
}

impl QueryBuf {
    fn new(base: &str) -> Self {
        QueryBuf {
            sql: base.to_string(),
            params: Vec::new(),
        }
    }

    fn push_param<S: Into<String>>(&mut self, v: S) -> usize {
        self.params.push(v.into());
        self.params.len()
    }
}

pub fn build(filter: &ListingFilter) -> QueryBuf {
    let mut q = QueryBuf::new(SELECT_LISTING);
    if let Some(topic) = &filter.topic {
        let n = q.push_param(topic.as_str());
        q.sql.push_str(&format!(" WHERE articles.topic = ${}", n));
    }
    q.sql.push_str(&format!(
        " GROUP BY articles.article_id ORDER BY {} {};",
        filter.sort_by.identifier(),
        filter.order
    ));
    q
}
