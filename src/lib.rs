#[macro_use]
extern crate diesel;
#[macro_use]
extern crate error_chain;

pub mod article;
pub mod comment;
pub mod config;
pub mod db;
pub mod errors;
pub mod topic;
pub mod types;
pub mod users;
pub mod utils;

use rocket::http::Status;
use rocket::serde::json::Value;
use rocket::{catch, catchers, routes, Build, Rocket};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use db::Pool;
use types::{BAD_REQUEST, INTERNAL_ERROR, ROUTE_NOT_FOUND};

#[catch(400)]
fn bad_request() -> Value {
    json!({ "msg": BAD_REQUEST })
}

/// Bodies that parse as JSON but not into the expected shape.
#[catch(422)]
fn unprocessable() -> (Status, Value) {
    (Status::BadRequest, json!({ "msg": BAD_REQUEST }))
}

#[catch(404)]
fn not_found() -> Value {
    json!({ "msg": ROUTE_NOT_FOUND })
}

#[catch(500)]
fn internal_error() -> Value {
    json!({ "msg": INTERNAL_ERROR })
}

/// Assembles the server: managed pool, every `/api` route and the catchers.
pub fn build(pool: Pool) -> Rocket<Build> {
    rocket::build()
        .manage(pool)
        .mount("/api", routes![topic::list, users::list])
        .mount(
            "/api",
            routes![article::list, article::get, article::update],
        )
        .mount(
            "/api",
            routes![comment::list, comment::create, comment::delete],
        )
        .register(
            "/",
            catchers![bad_request, unprocessable, not_found, internal_error],
        )
}

/// `RUST_LOG` wins over the configured filter when set.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
