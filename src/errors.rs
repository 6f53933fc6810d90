use diesel::result::{ConnectionError, Error as DieselError};

error_chain! {
    foreign_links {
        Var(::std::env::VarError);
        Io(::std::io::Error);
        Json(::serde_json::Error);
        R2D2(r2d2::Error);
        Connection(ConnectionError);
        Diesel(DieselError);
    }

    errors {
        InvalidTimestamp(ms: i64) {
            description("timestamp out of range")
            display("timestamp out of range: {}", ms)
        }
        UnknownArticle(title: String) {
            description("comment references an unknown article")
            display("no seeded article titled '{}'", title)
        }
    }
}
