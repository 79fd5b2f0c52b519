use rocket::{
    http::Status,
    request::Request,
    response::{self, status::Custom, Responder},
    serde::json::Json,
};
use thiserror::Error;

use crate::views::ErrorView;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("Station not found")]
    NotFound,

    #[error("Admin key mismatch")]
    Unauthorized,

    #[error("Capacity exceeded")]
    CapacityExceeded,

    #[error("Station key already in use")]
    DuplicateKey,

    #[error("No poll at index {0}")]
    IndexOutOfRange(usize),

    #[error("Invalid choice {0}")]
    InvalidChoice(usize),

    #[error("Unknown poll type {0}")]
    UnknownKind(u8),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Station lock poisoned")]
    LockPoisoned,
}

impl PollError {
    pub fn status(&self) -> Status {
        match self {
            PollError::NotFound
            | PollError::Unauthorized
            | PollError::CapacityExceeded
            | PollError::DuplicateKey => Status::Forbidden,
            PollError::IndexOutOfRange(_)
            | PollError::InvalidChoice(_)
            | PollError::UnknownKind(_)
            | PollError::MissingField(_) => Status::BadRequest,
            PollError::LockPoisoned => Status::InternalServerError,
        }
    }

    /// Access failures collapse into the same view so a caller cannot probe
    /// which stations exist.
    pub fn view(&self) -> ErrorView {
        match self {
            PollError::NotFound
            | PollError::Unauthorized
            | PollError::CapacityExceeded
            | PollError::DuplicateKey => ErrorView::illegal(),
            PollError::IndexOutOfRange(_)
            | PollError::InvalidChoice(_)
            | PollError::UnknownKind(_)
            | PollError::MissingField(_) => ErrorView::bad_request(self.to_string()),
            PollError::LockPoisoned => ErrorView::internal(),
        }
    }
}

impl<'r> Responder<'r, 'static> for PollError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        Custom(self.status(), Json(self.view())).respond_to(req)
    }
}
