use jsonwebtoken::errors::Error as JwtError;
use rocket::{
    http::Status,
    response::{self, Responder},
    serde::json::Json,
    Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::common::error::LedgerError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Ledger(err) => match err {
                LedgerError::InvalidInput(_) => Status::BadRequest,
                LedgerError::NotAuthorized(_) | LedgerError::NotEligible(_) => Status::Forbidden,
                LedgerError::NotFound(_) => Status::NotFound,
                LedgerError::AlreadyHasCredential(_) | LedgerError::AlreadyVoted(_) => {
                    Status::Conflict
                }
                LedgerError::NotVerified(_) | LedgerError::UnknownCandidate(_) => {
                    Status::UnprocessableEntity
                }
                LedgerError::InvalidConfiguration(_) => Status::InternalServerError,
            },
            Self::Jwt(_) => Status::Unauthorized,
            Self::Status(status, _) => *status,
        }
    }

    /// The failure kind reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.kind(),
            Self::Jwt(_) => "Unauthorized",
            Self::Status(status, _) => status.reason().unwrap_or("Error"),
        }
    }
}

/// The JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        debug!("Rejecting request: {self}");
        let body = ErrorBody {
            kind: self.kind().to_string(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).respond_to(req)
    }
}
