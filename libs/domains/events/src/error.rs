use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use email::NotificationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found")]
    NotFound,

    #[error("Event ID is required")]
    MissingId,

    #[error("Invalid event id: {0}")]
    InvalidId(String),

    #[error("{0}")]
    Database(String),

    #[error("Error sending email")]
    Delivery(#[from] NotificationError),
}

pub type EventResult<T> = Result<T, EventError>;

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound => AppError::NotFound("Event not found".to_string()),
            EventError::MissingId => AppError::MissingId("Event ID is required".to_string()),
            EventError::InvalidId(raw) => AppError::InvalidId(raw),
            EventError::Database(msg) => AppError::Database(msg),
            EventError::Delivery(e) => {
                // The relay's reason stays in the logs, clients get a fixed message.
                tracing::error!(error = %e, "Join confirmation delivery failed");
                AppError::Delivery("Error sending email".to_string())
            }
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        EventError::Database(err.to_string())
    }
}
