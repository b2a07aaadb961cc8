use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::templates::ErrorTemplate;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Pipeline(#[from] shared::Error),

    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Pipeline(shared::Error::Http(_))
            | AppError::Pipeline(shared::Error::MarketData(_)) => StatusCode::BAD_GATEWAY,
            AppError::Pipeline(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {self}");
        let code = self.status_code();
        let message = self.to_string();
        let body = ErrorTemplate { message: message.clone() }
            .render()
            .unwrap_or(message);
        (code, Html(body)).into_response()
    }
}
