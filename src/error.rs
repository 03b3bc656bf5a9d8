use argon2::Error as Argon2Error;
use log::{error, warn};
use mongodb::error::Error as DbError;
use rocket::{
    http::{Status, StatusClass},
    response::{self, content::RawHtml, Responder},
    Request,
};
use thiserror::Error;

use crate::render;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Db(#[from] DbError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Password hashing error: {0}")]
    Argon2(#[from] Argon2Error),
    #[error("Error generating the HTML page")]
    Render(#[from] std::fmt::Error),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Invalid survey id '{0}'")]
    InvalidSurveyId(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid password")]
    Unauthorized,
    #[error("The survey you are trying to access is not open.")]
    NotOpen,
}

impl Error {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Db(_) | Self::Storage(_) | Self::Argon2(_) | Self::Render(_) => {
                Status::InternalServerError
            }
            Self::BadRequest(_) | Self::InvalidSurveyId(_) => Status::BadRequest,
            Self::NotFound(_) => Status::NotFound,
            Self::Unauthorized => Status::Unauthorized,
            Self::NotOpen => Status::Forbidden,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        let message = self.to_string();
        if status.class() == StatusClass::ServerError {
            error!("{} {}: {message}", req.method(), req.uri());
        } else {
            warn!("{} {}: {message}", req.method(), req.uri());
        }

        // If even the error page fails to render, fall back to the bare message.
        let body = render::message_page("Error", &message).unwrap_or(message);
        (status, RawHtml(body)).respond_to(req)
    }
}
