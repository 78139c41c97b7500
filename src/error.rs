use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

#[derive(Clone, Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        self.code == 110
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == 111
    }
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        network_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        schema_mismatch_error(&err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            110 => (StatusCode::NOT_FOUND, self.message.as_str()),
            111 => (StatusCode::UNAUTHORIZED, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn network_error<T: Debug>(_: T) -> Error {
    Error {
        code: 3,
        message: "network error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn invalid_invocation_error() -> Error {
    Error {
        code: 100,
        message: "invalid invocation".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn encode_error(detail: &str) -> Error {
    Error {
        code: 102,
        message: format!("encode failure: {}", detail),
    }
}

pub fn schema_mismatch_error(detail: &str) -> Error {
    Error {
        code: 103,
        message: format!("schema mismatch: {}", detail),
    }
}

pub fn not_found_error() -> Error {
    Error {
        code: 110,
        message: "not found".into(),
    }
}

pub fn unauthorized_error() -> Error {
    Error {
        code: 111,
        message: "unauthorized".into(),
    }
}
