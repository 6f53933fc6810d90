//! End-to-end tests against a seeded PostgreSQL database.
//!
//! Set `TEST_DATABASE_URL` to run them; each test reseeds the test dataset.

mod common;

use rocket::http::{ContentType, Status};
use rocket::local::blocking::{Client, LocalResponse};
use serde_json::{json, Value};
use serial_test::serial;

macro_rules! seeded_client {
    () => {
        match common::seeded_client() {
            Some(client) => client,
            None => {
                eprintln!("TEST_DATABASE_URL not set, skipping");
                return;
            }
        }
    };
}

fn get_json(client: &Client, uri: &str) -> (Status, Value) {
    into_parts(client.get(uri.to_string()).dispatch())
}

fn into_parts(response: LocalResponse) -> (Status, Value) {
    let status = response.status();
    (status, response.into_json::<Value>().expect("json body"))
}

fn keys(value: &Value) -> Vec<&str> {
    let mut keys = value
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>();
    keys.sort();
    keys
}

fn is_sorted_desc_by(items: &[Value], field: &str) -> bool {
    items
        .windows(2)
        .all(|w| w[0][field].as_str() >= w[1][field].as_str())
}

#[test]
#[serial]
fn lists_topics() {
    let client = seeded_client!();
    let (status, topics) = get_json(&client, "/api/topics");
    assert_eq!(status, Status::Ok);
    let topics = topics.as_array().unwrap();
    assert_eq!(topics.len(), 3);
    for topic in topics {
        assert_eq!(keys(topic), vec!["description", "slug"]);
    }
}

#[test]
#[serial]
fn lists_users() {
    let client = seeded_client!();
    let (status, users) = get_json(&client, "/api/users");
    assert_eq!(status, Status::Ok);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 4);
    for user in users {
        assert_eq!(keys(user), vec!["avatar_url", "name", "username"]);
    }
}

#[test]
#[serial]
fn lists_articles_newest_first_with_comment_counts() {
    let client = seeded_client!();
    let (status, articles) = get_json(&client, "/api/articles");
    assert_eq!(status, Status::Ok);
    let articles = articles.as_array().unwrap();
    assert_eq!(articles.len(), 12);
    for article in articles {
        assert_eq!(
            keys(article),
            vec!["article_id", "author", "comment_count", "created_at", "title", "topic", "votes"]
        );
    }
    assert!(is_sorted_desc_by(articles, "created_at"));
    assert_eq!(articles[0]["article_id"], 3);

    let first = articles.iter().find(|a| a["article_id"] == 1).unwrap();
    assert_eq!(first["comment_count"], 11);
    let uncommented = articles.iter().find(|a| a["article_id"] == 2).unwrap();
    assert_eq!(uncommented["comment_count"], 0);
}

#[test]
#[serial]
fn filters_articles_by_topic() {
    let client = seeded_client!();
    let (status, articles) = get_json(&client, "/api/articles?topic=mitch");
    assert_eq!(status, Status::Ok);
    let articles = articles.as_array().unwrap();
    assert_eq!(articles.len(), 11);
    assert!(articles.iter().all(|a| a["topic"] == "mitch"));
    assert!(is_sorted_desc_by(articles, "created_at"));
}

#[test]
#[serial]
fn existing_topic_without_articles_is_an_empty_list() {
    let client = seeded_client!();
    let (status, articles) = get_json(&client, "/api/articles?topic=paper");
    assert_eq!(status, Status::Ok);
    assert_eq!(articles, json!([]));
}

#[test]
#[serial]
fn unknown_topic_is_not_found() {
    let client = seeded_client!();
    let (status, body) = get_json(&client, "/api/articles?topic=dogs");
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["msg"], "No topic found for slug: dogs");
}

#[test]
#[serial]
fn sorts_articles_by_requested_column_and_order() {
    let client = seeded_client!();
    let (status, articles) = get_json(&client, "/api/articles?sort_by=votes&order=asc");
    assert_eq!(status, Status::Ok);
    let articles = articles.as_array().unwrap();
    assert!(articles
        .windows(2)
        .all(|w| w[0]["votes"].as_i64() <= w[1]["votes"].as_i64()));
    assert_eq!(articles.last().unwrap()["article_id"], 1);

    let (status, articles) = get_json(&client, "/api/articles?topic=mitch&sort_by=title&order=ASC");
    assert_eq!(status, Status::Ok);
    assert_eq!(articles[0]["title"], "A");
}

#[test]
#[serial]
fn gets_article_by_id_as_single_element_list() {
    let client = seeded_client!();
    let (status, body) = get_json(&client, "/api/articles/1");
    assert_eq!(status, Status::Ok);
    let body = body.as_array().unwrap();
    assert_eq!(body.len(), 1);
    let article = &body[0];
    assert_eq!(
        keys(article),
        vec!["article_id", "author", "body", "comment_count", "created_at", "title", "topic", "votes"]
    );
    assert_eq!(article["article_id"], 1);
    assert_eq!(article["votes"], 100);
    assert_eq!(article["comment_count"], 11);
    assert_eq!(article["created_at"], "2020-07-09T21:11:00.000Z");
}

#[test]
#[serial]
fn article_without_comments_counts_zero() {
    let client = seeded_client!();
    let (status, body) = get_json(&client, "/api/articles/2");
    assert_eq!(status, Status::Ok);
    assert_eq!(body[0]["comment_count"], 0);
}

#[test]
#[serial]
fn missing_article_is_not_found() {
    let client = seeded_client!();
    let (status, body) = get_json(&client, "/api/articles/99999");
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["msg"], "No article found for article_id: 99999");

    let (status, body) = get_json(&client, "/api/articles/99999/comments");
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["msg"], "No article found for article_id: 99999");
}

#[test]
#[serial]
fn lists_article_comments_newest_first() {
    let client = seeded_client!();
    let (status, comments) = get_json(&client, "/api/articles/1/comments");
    assert_eq!(status, Status::Ok);
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 11);
    assert!(comments.iter().all(|c| c["article_id"] == 1));
    assert!(is_sorted_desc_by(comments, "created_at"));
    assert_eq!(comments[0]["body"], "I hate streaming noses");
    assert_eq!(
        keys(&comments[0]),
        vec!["article_id", "author", "body", "comment_id", "created_at", "votes"]
    );

    let (status, comments) = get_json(&client, "/api/articles/2/comments");
    assert_eq!(status, Status::Ok);
    assert_eq!(comments, json!([]));
}

fn patch_votes(client: &Client, uri: &str, body: Value) -> (Status, Value) {
    into_parts(
        client
            .patch(uri.to_string())
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch(),
    )
}

#[test]
#[serial]
fn patch_increments_and_decrements_votes() {
    let client = seeded_client!();
    let (status, article) = patch_votes(&client, "/api/articles/1", json!({ "inc_votes": 50 }));
    assert_eq!(status, Status::Ok);
    assert!(article.is_object());
    assert_eq!(article["article_id"], 1);
    assert_eq!(article["votes"], 150);
    assert_eq!(article["title"], "Living in the shadow of a great man");

    let (status, article) = patch_votes(&client, "/api/articles/1", json!({ "inc_votes": -10 }));
    assert_eq!(status, Status::Ok);
    assert_eq!(article["votes"], 140);
}

#[test]
#[serial]
fn patch_with_zero_leaves_votes_unchanged() {
    let client = seeded_client!();
    let (status, article) = patch_votes(&client, "/api/articles/1", json!({ "inc_votes": 0 }));
    assert_eq!(status, Status::Ok);
    assert_eq!(article["votes"], 100);
}

#[test]
#[serial]
fn patch_overflowing_votes_is_a_bad_request() {
    let client = seeded_client!();
    let (status, body) = patch_votes(
        &client,
        "/api/articles/1",
        json!({ "inc_votes": i32::MAX }),
    );
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["msg"], "400: Bad Request!");

    let (_, article) = get_json(&client, "/api/articles/1");
    assert_eq!(article[0]["votes"], 100);
}

#[test]
#[serial]
fn patch_missing_article_is_not_found() {
    let client = seeded_client!();
    let (status, body) = patch_votes(&client, "/api/articles/99999", json!({ "inc_votes": 1 }));
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["msg"], "No article found for article_id: 99999");
}

fn post_comment(client: &Client, uri: &str, body: Value) -> (Status, Value) {
    into_parts(
        client
            .post(uri.to_string())
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch(),
    )
}

#[test]
#[serial]
fn posts_a_comment() {
    let client = seeded_client!();
    let (status, comment) = post_comment(
        &client,
        "/api/articles/2/comments",
        json!({ "username": "lurker", "body": "Finally, a laptop article." }),
    );
    assert_eq!(status, Status::Created);
    assert_eq!(comment["comment_id"], 19);
    assert_eq!(comment["article_id"], 2);
    assert_eq!(comment["author"], "lurker");
    assert_eq!(comment["body"], "Finally, a laptop article.");
    assert_eq!(comment["votes"], 0);
    assert!(comment["created_at"].is_string());

    let (_, comments) = get_json(&client, "/api/articles/2/comments");
    assert_eq!(comments.as_array().unwrap().len(), 1);
    let (_, article) = get_json(&client, "/api/articles/2");
    assert_eq!(article[0]["comment_count"], 1);
}

#[test]
#[serial]
fn comment_from_unknown_user_is_not_found() {
    let client = seeded_client!();
    let (status, body) = post_comment(
        &client,
        "/api/articles/1/comments",
        json!({ "username": "nobody", "body": "hello" }),
    );
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["msg"], "No user found for username: nobody");
}

#[test]
#[serial]
fn comment_on_missing_article_is_not_found() {
    let client = seeded_client!();
    let (status, body) = post_comment(
        &client,
        "/api/articles/99999/comments",
        json!({ "username": "lurker", "body": "hello" }),
    );
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["msg"], "No article found for article_id: 99999");
}

#[test]
#[serial]
fn deletes_a_comment() {
    let client = seeded_client!();
    let response = client.delete("/api/comments/1").dispatch();
    assert_eq!(response.status(), Status::NoContent);
    assert!(response.into_string().unwrap_or_default().is_empty());

    let (_, comments) = get_json(&client, "/api/articles/9/comments");
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert!(comments.iter().all(|c| c["comment_id"] != 1));

    let (status, body) = into_parts(client.delete("/api/comments/1").dispatch());
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["msg"], "No comment found for comment_id: 1");
}

#[test]
#[serial]
fn deleting_missing_comment_is_not_found() {
    let client = seeded_client!();
    let (status, body) = into_parts(client.delete("/api/comments/99999").dispatch());
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["msg"], "No comment found for comment_id: 99999");
}

#[test]
#[serial]
fn repeated_reads_are_identical() {
    let client = seeded_client!();
    for uri in &["/api/topics", "/api/users", "/api/articles", "/api/articles/1/comments"] {
        let first = get_json(&client, uri);
        let second = get_json(&client, uri);
        assert_eq!(first, second, "{}", uri);
    }
}
