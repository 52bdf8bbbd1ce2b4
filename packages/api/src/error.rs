use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use petal_ml::MlError;
use serde::Serialize;

/// Whether the error carries server-side diagnostics worth correlating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportPolicy {
    Ignore,
    Report,
}

/// Client-facing error: HTTP status, stable code, public message.
///
/// Internal detail (paths, causes) stays in the tracing logs; reported
/// errors get an `x-error-id` header so a client message can be matched to
/// the server-side log line.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    public_code: &'static str,
    public_message: String,
    report_policy: ReportPolicy,
}

impl ApiError {
    fn new(
        status: StatusCode,
        public_code: &'static str,
        public_message: impl Into<String>,
        report_policy: ReportPolicy,
    ) -> Self {
        Self {
            status,
            public_code,
            public_message: public_message.into(),
            report_policy,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self::new(StatusCode::BAD_REQUEST, "INVALID_INPUT", msg, ReportPolicy::Ignore)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Not found: {}", msg);
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", msg, ReportPolicy::Ignore)
    }

    pub fn service_unavailable(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::error!("Service unavailable: {}", detail);
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Model not ready. Train a model and try again later.",
            ReportPolicy::Report,
        )
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::error!("Internal error: {}", detail);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Prediction failed",
            ReportPolicy::Report,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope<'a> {
            error: ErrorBody<'a>,
        }

        #[derive(Serialize)]
        struct ErrorBody<'a> {
            code: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            id: Option<&'a str>,
            message: &'a str,
        }

        let error_id = match self.report_policy {
            ReportPolicy::Report => Some(uuid::Uuid::new_v4().to_string()),
            ReportPolicy::Ignore => None,
        };

        let mut response = (
            self.status,
            Json(ErrorEnvelope {
                error: ErrorBody {
                    code: self.public_code,
                    id: error_id.as_deref(),
                    message: &self.public_message,
                },
            }),
        )
            .into_response();

        if let Some(id) = error_id.as_deref() {
            tracing::error!(error_id = id, code = self.public_code, "Reported API error");
            if let Ok(v) = HeaderValue::from_str(id) {
                response.headers_mut().insert("x-error-id", v);
            }
        }

        response
    }
}

impl From<MlError> for ApiError {
    fn from(err: MlError) -> Self {
        match &err {
            MlError::InvalidInput { .. } => Self::bad_request(err.to_string()),
            // The artifact path must not leak to callers; the detail lands
            // in the logs only.
            MlError::ArtifactNotFound { .. } => Self::service_unavailable(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.public_code)
    }
}

impl std::error::Error for ApiError {}
