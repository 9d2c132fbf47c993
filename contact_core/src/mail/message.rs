use crate::models::ContactSubmission;
use crate::validation::{escape_html, single_line, unescape_html};

pub const SUBJECT_PREFIX: &str = "Contact form: ";

/// A fully rendered contact email, independent of the transport that sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Display name shown in `From`; the submitter's name.
    pub from_name: String,
    /// Mailbox the message is actually sent from.
    pub from_address: String,
    pub to: String,
    /// Submitter's address, so a reply goes straight back to them.
    pub reply_to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Renders a submission into the email sent to `destination` from `sender`.
///
/// Every submitted value is HTML-escaped before it lands in either body. The
/// HTML body turns newlines into `<br>`, the text body keeps them.
pub fn compose_contact_email(
    submission: &ContactSubmission,
    sender: &str,
    destination: &str,
) -> OutgoingEmail {
    let name = submission.name.trim();
    let email = submission.email.trim();
    let subject = submission.subject_or_default();

    let clean_name = escape_html(name);
    let clean_email = escape_html(email);
    let clean_subject = escape_html(subject);
    let clean_message = escape_html(&submission.message);
    let html_message = clean_message.replace("\r\n", "\n").replace('\n', "<br>");

    let html = format!(
        r#"<div style="font-family:system-ui,Segoe UI,Roboto,Helvetica,Arial,sans-serif;color:#111;">
  <h2>New contact from {name}</h2>
  <p><strong>From:</strong> {name} &lt;{email}&gt;</p>
  <p><strong>Subject:</strong> {subject}</p>
  <hr />
  <div style="white-space:pre-wrap;">{message}</div>
  <hr />
  <p style="font-size:12px;color:#666">This message was sent from your website contact form.</p>
</div>"#,
        name = clean_name,
        email = clean_email,
        subject = clean_subject,
        message = html_message,
    );

    let text = format!(
        "{}\n\nFrom: {} <{}>",
        clean_message, clean_name, clean_email
    );

    OutgoingEmail {
        from_name: single_line(name),
        from_address: sender.to_string(),
        to: destination.to_string(),
        // The browser form escapes every field, addresses included.
        reply_to: single_line(&unescape_html(email)),
        subject: format!("{}{}", SUBJECT_PREFIX, single_line(subject)),
        text,
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_SUBJECT;

    fn compose(submission: &ContactSubmission) -> OutgoingEmail {
        compose_contact_email(submission, "relay@example.com", "owner@example.com")
    }

    #[test]
    fn test_envelope_fields() {
        let email = compose(&ContactSubmission::new(
            "Jane Doe",
            " jane@x.com ",
            "Collaboration",
            "Hello",
        ));

        assert_eq!(email.from_name, "Jane Doe");
        assert_eq!(email.from_address, "relay@example.com");
        assert_eq!(email.to, "owner@example.com");
        assert_eq!(email.reply_to, "jane@x.com");
        assert_eq!(email.subject, "Contact form: Collaboration");
    }

    #[test]
    fn test_reply_to_is_unescaped() {
        let email = compose(&ContactSubmission::new(
            "Sean",
            "o&#039;brien@x.com",
            "",
            "Hello",
        ));

        assert_eq!(email.reply_to, "o'brien@x.com");
        assert!(email.text.ends_with("<o&amp;#039;brien@x.com>"));
    }

    #[test]
    fn test_default_subject() {
        let email = compose(&ContactSubmission::new("Jane", "jane@x.com", "", "Hello"));

        assert_eq!(email.subject, format!("{}{}", SUBJECT_PREFIX, DEFAULT_SUBJECT));
        assert!(email.html.contains(DEFAULT_SUBJECT));
    }

    #[test]
    fn test_script_is_escaped_in_both_bodies() {
        let email = compose(&ContactSubmission::new(
            "Jane",
            "jane@x.com",
            "",
            "<script>alert('hi')</script>",
        ));

        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;alert(&#039;hi&#039;)&lt;/script&gt;"));
        assert!(!email.text.contains("<script>"));
        assert!(email.text.starts_with("&lt;script&gt;"));
    }

    #[test]
    fn test_newlines_become_breaks_only_in_html() {
        let email = compose(&ContactSubmission::new(
            "Jane",
            "jane@x.com",
            "",
            "line one\nline two\r\nline three",
        ));

        assert!(email.html.contains("line one<br>line two<br>line three"));
        assert!(email.text.contains("line one\nline two\r\nline three"));
        assert!(!email.text.contains("<br>"));
    }

    #[test]
    fn test_text_body_signature() {
        let email = compose(&ContactSubmission::new("Tom & Jerry", "tj@x.com", "", "Hi"));

        assert_eq!(email.text, "Hi\n\nFrom: Tom &amp; Jerry <tj@x.com>");
        assert!(email.html.contains("<h2>New contact from Tom &amp; Jerry</h2>"));
    }

    #[test]
    fn test_header_values_are_single_line() {
        let email = compose(&ContactSubmission::new(
            "Jane\r\nBcc: victim@example.com",
            "jane@x.com",
            "Hi\nthere",
            "Hello",
        ));

        assert!(!email.from_name.contains('\n'));
        assert!(!email.subject.contains('\n'));
        assert_eq!(email.subject, "Contact form: Hi there");
    }
}
