use oig_core::AppError;
use serde::Deserialize;

/// Okta error document returned with non-success responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OktaErrorBody {
    error_code: Option<String>,
    error_summary: Option<String>,
    #[serde(default)]
    error_causes: Vec<OktaErrorCause>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OktaErrorCause {
    error_summary: Option<String>,
}

/// Folds an error body into one message: code, summary, then causes.
pub(super) fn remote_message(status: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<OktaErrorBody>(body).ok();
    let Some(OktaErrorBody {
        error_code,
        error_summary: Some(summary),
        error_causes,
    }) = parsed
    else {
        let body = body.trim();
        return if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body.to_owned()
        };
    };

    let mut message = match error_code {
        Some(code) => format!("{code}: {summary}"),
        None => summary,
    };
    let causes: Vec<String> = error_causes
        .into_iter()
        .filter_map(|cause| cause.error_summary)
        .filter(|cause| !cause.trim().is_empty())
        .collect();
    if !causes.is_empty() {
        message.push_str(" (");
        message.push_str(&causes.join("; "));
        message.push(')');
    }
    message
}

pub(super) fn status_error(status: u16, body: &str) -> AppError {
    let message = remote_message(status, body);
    match status {
        401 => AppError::Unauthorized(message),
        403 => AppError::Forbidden(message),
        404 => AppError::NotFound(message),
        409 => AppError::Conflict(message),
        _ => AppError::Remote { status, message },
    }
}

pub(super) fn transport_error(error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        return AppError::Internal(format!("governance request timed out: {error}"));
    }
    AppError::Internal(format!("governance transport error: {error}"))
}

#[cfg(test)]
mod tests {
    use oig_core::AppError;

    use super::{remote_message, status_error};

    #[test]
    fn okta_body_folds_code_summary_and_causes() {
        let body = r#"{
            "errorCode": "E0000001",
            "errorSummary": "Api validation failed: name",
            "errorCauses": [
                {"errorSummary": "name: must not be blank"},
                {"errorSummary": "  "},
                {"errorSummary": "name: too long"}
            ]
        }"#;

        assert_eq!(
            remote_message(400, body),
            "E0000001: Api validation failed: name (name: must not be blank; name: too long)"
        );
    }

    #[test]
    fn non_okta_bodies_pass_through() {
        assert_eq!(remote_message(502, "  Bad Gateway\n"), "Bad Gateway");
        assert_eq!(remote_message(500, ""), "HTTP 500");
        assert_eq!(remote_message(500, r#"{"message":"boom"}"#), r#"{"message":"boom"}"#);
    }

    #[test]
    fn statuses_map_to_error_categories() {
        assert!(matches!(status_error(401, ""), AppError::Unauthorized(_)));
        assert!(matches!(status_error(403, ""), AppError::Forbidden(_)));
        assert!(status_error(404, "").is_not_found());
        assert!(matches!(status_error(409, ""), AppError::Conflict(_)));
        assert!(matches!(
            status_error(429, ""),
            AppError::Remote { status: 429, .. }
        ));
    }
}
