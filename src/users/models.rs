use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::users;

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, PartialEq)]
#[diesel(table_name = users, primary_key(username))]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

impl User {
    pub fn load_all(connection: &mut PgConnection) -> QueryResult<Vec<User>> {
        use crate::db::schema::users::dsl::*;
        users
            .select(User::as_select())
            .order(username.asc())
            .load(connection)
    }
}
