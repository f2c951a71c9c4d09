// Reading Tracker - Book, author and reader tracking service
// Copyright (C) 2025 Reading Tracker contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! HTTP error responses
//!
//! Maps [`TrackerError`] to a status code and a `{"detail": ...}` JSON body,
//! and turns axum extractor rejections into validation errors.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::TrackerError;

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        } else {
            tracing::error!(error = ?self, "request failed");
        }

        (status, Json(json!({ "detail": self.user_message() }))).into_response()
    }
}

impl From<JsonRejection> for TrackerError {
    fn from(rejection: JsonRejection) -> Self {
        TrackerError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for TrackerError {
    fn from(rejection: QueryRejection) -> Self {
        TrackerError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for TrackerError {
    fn from(rejection: PathRejection) -> Self {
        TrackerError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = TrackerError::not_found("No users found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = TrackerError::conflict("UNIQUE constraint failed").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = TrackerError::validation("missing field `name`").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = TrackerError::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
