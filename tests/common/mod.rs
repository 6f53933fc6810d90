#![allow(dead_code)]

use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel::Connection;
use news_api::db::seed::{seed, SeedData};
use news_api::{build, db};
use rocket::local::blocking::Client;
use std::env;
use std::path::Path;
use std::time::Duration;

/// A client whose pool never connects. Only requests rejected before any
/// database work can be answered meaningfully.
pub fn offline_client() -> Client {
    let manager = ConnectionManager::<PgConnection>::new("postgres://news@127.0.0.1:1/offline");
    let pool = r2d2::Pool::builder()
        .connection_timeout(Duration::from_millis(250))
        .build_unchecked(manager);
    Client::tracked(build(pool)).expect("valid rocket instance")
}

/// Reseeds the test database and returns a client for it, or `None` when
/// `TEST_DATABASE_URL` is not set.
pub fn seeded_client() -> Option<Client> {
    let url = env::var("TEST_DATABASE_URL").ok()?;
    let data = SeedData::load(Path::new(env!("CARGO_MANIFEST_DIR")).join("db/data/test"))
        .expect("test data loads");
    let mut conn = PgConnection::establish(&url).expect("test database reachable");
    seed(&mut conn, &data).expect("test database seeded");

    let pool = db::init_pool(&url).expect("pool created");
    Some(Client::tracked(build(pool)).expect("valid rocket instance"))
}
