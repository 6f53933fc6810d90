use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use serde_json::json;
use std::num::ParseIntError;
use tracing::error;

use crate::utils::try_respond;

pub const BAD_REQUEST: &str = "400: Bad Request!";
pub const INTERNAL_ERROR: &str = "500: Internal Server Error";
pub const ROUTE_NOT_FOUND: &str = "404: Route Not Found!";
pub const REFERENCE_NOT_FOUND: &str = "404: Referenced resource not found";

/// SQLSTATE 22P02 is reported by the driver only through its message.
const INVALID_INPUT_SYNTAX: &str = "invalid input syntax";
/// SQLSTATE 22003, raised when arithmetic leaves the column's range.
const OUT_OF_RANGE: &str = "out of range";

#[derive(Debug)]
pub enum ApiError {
    Diesel(DieselError),
    Pool(r2d2::Error),
    NotFound(String),
    Validation(String),
    BadRequest,
    Internal,
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> ApiError {
        ApiError::Diesel(err)
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(err: r2d2::Error) -> ApiError {
        ApiError::Pool(err)
    }
}

impl From<ParseIntError> for ApiError {
    fn from(_: ParseIntError) -> ApiError {
        ApiError::BadRequest
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl ApiError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn status(&self) -> Status {
        match self {
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Validation(_) | ApiError::BadRequest => Status::BadRequest,
            ApiError::Diesel(DieselError::DatabaseError(kind, info)) => match kind {
                DatabaseErrorKind::ForeignKeyViolation => Status::NotFound,
                _ if info.message().starts_with(INVALID_INPUT_SYNTAX) => Status::BadRequest,
                _ if info.message().contains(OUT_OF_RANGE) => Status::BadRequest,
                _ => Status::InternalServerError,
            },
            _ => Status::InternalServerError,
        }
    }

    /// Message sent to the client. Unclassified failures never carry detail.
    pub fn message(&self) -> String {
        match self {
            ApiError::NotFound(msg) | ApiError::Validation(msg) => msg.clone(),
            _ => match self.status().code {
                400 => BAD_REQUEST.to_string(),
                404 => REFERENCE_NOT_FOUND.to_string(),
                _ => INTERNAL_ERROR.to_string(),
            },
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!(error = ?self, uri = %req.uri(), "unhandled failure");
        }
        let body = json!({ "msg": self.message() });
        try_respond(req, &body, status)
    }
}

/// Parses a numeric path segment. Anything else is the generic bad request.
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    Ok(raw.trim().parse::<i32>()?)
}
