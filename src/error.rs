use ::warp::http::StatusCode;

/// Failures a board operation reports to its caller.
///
/// Notification failures are logged by the board and never reach the caller.
#[derive(::thiserror::Error, Debug)]
pub enum BoardError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{message}")]
    Storage {
        message: String,
        cause: ::anyhow::Error,
    },
}

impl BoardError {
    pub fn storage(message: &str, cause: ::anyhow::Error) -> BoardError {
        BoardError::Storage {
            message: message.to_string(),
            cause,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BoardError::Validation(_) => StatusCode::BAD_REQUEST,
            BoardError::NotFound(_) => StatusCode::NOT_FOUND,
            BoardError::Conflict(_) => StatusCode::CONFLICT,
            BoardError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
