use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest};
use rocket::tokio::task;
use rocket::{Request, State};
use tracing::error;

use crate::errors::Result;
use crate::types::ApiError;

pub mod exists;
pub mod schema;
pub mod seed;

pub use self::exists::Reference;

// An alias to the type for a pool of Diesel Postgres connections.
pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Handle to the managed pool. Every accessor call checks out its own
/// connection, so independent calls for one request can run side by side.
#[derive(Clone)]
pub struct Db(Pool);

/// Fails with `InternalServerError` if no pool is currently managed.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for Db {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Db, ()> {
        match request.guard::<&State<Pool>>().await {
            Outcome::Success(pool) => Outcome::Success(Db(pool.inner().clone())),
            _ => Outcome::Error((Status::InternalServerError, ())),
        }
    }
}

impl Db {
    /// Runs a blocking accessor on a pooled connection off the async workers.
    pub async fn run<F, T>(&self, f: F) -> std::result::Result<T, ApiError>
    where
        F: FnOnce(&mut PgConnection) -> std::result::Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.0.clone();
        task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut *conn)
        })
        .await
        .map_err(|e| {
            error!(error = %e, "database task failed");
            ApiError::Internal
        })?
    }

    /// Resolves once the referenced row is known to exist.
    pub async fn exists(&self, reference: Reference) -> std::result::Result<(), ApiError> {
        self.run(move |conn| exists::check(conn, &reference)).await
    }
}

pub fn init_pool(database_url: &str) -> Result<Pool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Ok(Pool::new(manager)?)
}
