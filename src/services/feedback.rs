use std::sync::OnceLock;

use regex::Regex;

use crate::{
    error::{AppError, AppResult},
    models::FeedbackRequest,
    services::mailer::{Email, EmailTag, Mailer},
};

const LABEL: &str = "Vidoza Feedback";

/// Validated contact form
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> AppResult<&'static Regex> {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    if let Some(regex) = EMAIL.get() {
        return Ok(regex);
    }

    let regex = Regex::new(EMAIL_PATTERN)
        .map_err(|e| AppError::Internal(format!("Invalid email pattern: {}", e)))?;
    Ok(EMAIL.get_or_init(|| regex))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<FeedbackRequest> for Feedback {
    type Error = AppError;

    fn try_from(request: FeedbackRequest) -> AppResult<Self> {
        let (Some(name), Some(email), Some(message)) = (
            non_blank(request.name),
            non_blank(request.email),
            non_blank(request.message),
        ) else {
            return Err(AppError::InvalidInput(
                "Name, email and message are required".to_string(),
            ));
        };

        if !email_regex()?.is_match(&email) {
            return Err(AppError::InvalidInput("Invalid email address".to_string()));
        }

        Ok(Self {
            name,
            email,
            subject: non_blank(request.subject),
            message,
        })
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl Feedback {
    pub fn email_subject(&self) -> String {
        match &self.subject {
            Some(subject) => format!("[{}] {}", LABEL, subject),
            None => format!("[{}] New feedback from {}", LABEL, self.name),
        }
    }

    pub fn html_body(&self) -> String {
        let name = escape_html(&self.name);
        let email = escape_html(&self.email);
        let subject = self
            .subject
            .as_deref()
            .map(escape_html)
            .unwrap_or_else(|| "N/A".to_string());
        let message = escape_html(&self.message);

        format!(
            r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2 style="color: #7c3aed;">New Feedback - Vidoza</h2>
    <table style="width: 100%; border-collapse: collapse; margin-top: 16px;">
        <tr><td style="font-weight: bold; width: 100px;">Name</td><td>{name}</td></tr>
        <tr><td style="font-weight: bold;">Email</td><td><a href="mailto:{email}">{email}</a></td></tr>
        <tr><td style="font-weight: bold;">Subject</td><td>{subject}</td></tr>
    </table>
    <div style="margin-top: 20px; padding: 16px; background: #f9fafb; border-left: 4px solid #7c3aed;">
        <p style="margin: 0; font-weight: bold;">Message</p>
        <p style="margin: 8px 0 0; white-space: pre-wrap;">{message}</p>
    </div>
    <p style="font-size: 12px; color: #9ca3af; margin-top: 12px;">Sent via Vidoza Feedback Form</p>
</div>"#
        )
    }

    pub fn to_email(&self, from: &str, to: &str) -> Email {
        Email {
            from: from.to_string(),
            to: vec![to.to_string()],
            subject: self.email_subject(),
            html: self.html_body(),
            tags: vec![EmailTag {
                name: "category".to_string(),
                value: "feedback".to_string(),
            }],
        }
    }
}

/// Validates and delivers a feedback submission, returning the mail id
pub async fn send_feedback(
    mailer: Option<&Mailer>,
    request: FeedbackRequest,
) -> AppResult<Option<String>> {
    let feedback = Feedback::try_from(request)?;

    let Some(mailer) = mailer else {
        return Err(AppError::Mail("RESEND_API_KEY is not configured".to_string()));
    };

    mailer.send(&feedback.to_email(&mailer.from, &mailer.to)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, subject: Option<&str>, message: &str) -> FeedbackRequest {
        FeedbackRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            subject: subject.map(str::to_string),
            message: Some(message.to_string()),
        }
    }

    #[test]
    fn test_missing_fields_rejected() {
        let err = Feedback::try_from(request("Neo", "  ", None, "hi")).unwrap_err();
        assert_eq!(err.public_message(), "Name, email and message are required");

        let err = Feedback::try_from(FeedbackRequest {
            name: None,
            email: Some("neo@matrix.io".to_string()),
            subject: None,
            message: Some("hi".to_string()),
        })
        .unwrap_err();
        assert_eq!(err.public_message(), "Name, email and message are required");
    }

    #[test]
    fn test_invalid_email_rejected() {
        for bad in ["neo", "neo@matrix", "neo @matrix.io", "@matrix.io"] {
            let err = Feedback::try_from(request("Neo", bad, None, "hi")).unwrap_err();
            assert_eq!(err.public_message(), "Invalid email address", "{bad}");
        }
    }

    #[test]
    fn test_email_pattern_compiles_once() {
        let first = email_regex().unwrap();
        let second = email_regex().unwrap();

        assert!(std::ptr::eq(first, second));
        assert!(first.is_match("neo@matrix.io"));
    }

    #[test]
    fn test_subject_defaults_to_sender() {
        let feedback = Feedback::try_from(request("Neo", "neo@matrix.io", None, "hi")).unwrap();
        assert_eq!(feedback.email_subject(), "[Vidoza Feedback] New feedback from Neo");

        let feedback =
            Feedback::try_from(request("Neo", "neo@matrix.io", Some("Bug"), "hi")).unwrap();
        assert_eq!(feedback.email_subject(), "[Vidoza Feedback] Bug");
    }

    #[test]
    fn test_html_body_escapes_user_input() {
        let feedback = Feedback::try_from(request(
            "<script>alert(1)</script>",
            "neo@matrix.io",
            None,
            "a & b",
        ))
        .unwrap();

        let html = feedback.html_body();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("N/A"));
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_fails_after_validation() {
        let err = send_feedback(None, request("Neo", "neo@matrix.io", None, "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Mail(_)));

        let err = send_feedback(None, request("Neo", "bad", None, "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
