//! Contact form relay endpoint

use crate::{
    error::{AppError, Result},
    models::{ContactReply, ContactSubmission},
    AppState,
};
use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    response::IntoResponse,
    Json,
};
use tracing::info;

pub const SUCCESS_MESSAGE: &str = "Email sent successfully";

/// Accepts every method so that non-POST requests get the relay's own 405
/// body instead of the router's empty one.
pub async fn handle_contact(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<impl IntoResponse> {
    if method != Method::POST {
        info!("{} /api/contact rejected", method);
        return Err(AppError::MethodNotAllowed);
    }

    let submission = parse_submission(&body)?;
    info!(
        body_bytes = body.len(),
        "POST /api/contact - relaying submission"
    );

    state.relay.relay(&submission).await?;

    Ok(Json(ContactReply::sent(SUCCESS_MESSAGE)))
}

/// An empty body or a JSON `null` reads as a submission with every field
/// empty; anything else must be a JSON object.
fn parse_submission(body: &[u8]) -> Result<ContactSubmission> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ContactSubmission::default());
    }

    let submission: Option<ContactSubmission> = serde_json::from_slice(body)?;
    Ok(submission.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_body() {
        assert_eq!(parse_submission(b"").unwrap(), ContactSubmission::default());
        assert_eq!(parse_submission(b"  \n").unwrap(), ContactSubmission::default());
        assert_eq!(parse_submission(b"null").unwrap(), ContactSubmission::default());
    }

    #[test]
    fn test_parse_object() {
        let submission = parse_submission(
            br#"{"name":"Jane","email":"jane@x.com","message":"Hello","extra":1}"#,
        )
        .unwrap();

        assert_eq!(submission.name, "Jane");
        assert_eq!(submission.subject, "");
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_submission(b"{\"name\": "),
            Err(AppError::JsonError(_))
        ));
        assert!(matches!(
            parse_submission(b"[1, 2]"),
            Err(AppError::JsonError(_))
        ));
    }
}
