use crate::{
    error::Error,
    gateway::mailersend::{is_valid_email, EmailContact, MailerSendClient, SendEmailRequest},
};

use log::*;
use service::config::Config;

/// Content of a session summary email.
#[derive(Debug, Clone, Default)]
pub struct SessionSummaryEmail {
    pub recipient: String,
    pub session_id: String,
    pub summary: Option<String>,
    pub transcript: Option<String>,
}

pub fn summary_subject(session_id: &str) -> String {
    format!("Educational Session Summary - {session_id}")
}

/// Escapes text for inclusion in HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value.filter(|value| !value.trim().is_empty()) {
        Some(value) => escape_html(value),
        None => placeholder.to_string(),
    }
}

pub fn summary_html(email: &SessionSummaryEmail) -> String {
    let session_id = escape_html(&email.session_id);
    let summary = or_placeholder(email.summary.as_deref(), "No summary available");
    let transcript = or_placeholder(email.transcript.as_deref(), "No transcript available");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; text-align: center; border-radius: 10px; }}
    .content {{ background: #f9f9f9; padding: 30px; border-radius: 10px; margin-top: 20px; }}
    .summary {{ background: white; padding: 20px; border-left: 4px solid #667eea; margin: 20px 0; border-radius: 5px; }}
    .transcript {{ background: white; padding: 20px; border-left: 4px solid #764ba2; margin: 20px 0; border-radius: 5px; }}
    .footer {{ text-align: center; margin-top: 30px; color: #666; font-size: 12px; }}
    .message {{ white-space: pre-wrap; font-family: monospace; background: #f5f5f5; padding: 15px; border-radius: 5px; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Educational Session Summary</h1>
      <p>Session ID: {session_id}</p>
    </div>
    <div class="content">
      <div class="summary">
        <h2>AI Generated Summary</h2>
        <p>{summary}</p>
      </div>
      <div class="transcript">
        <h2>Full Transcript</h2>
        <div class="message">{transcript}</div>
      </div>
    </div>
    <div class="footer">
      <p>This email was automatically generated from your educational session.</p>
    </div>
  </div>
</body>
</html>"#
    )
}

/// Emails a session's summary and transcript. Returns the provider's message id.
pub async fn send_session_summary(
    config: &Config,
    email: &SessionSummaryEmail,
) -> Result<Option<String>, Error> {
    info!("Initiating summary email for session: {}", email.session_id);

    if !is_valid_email(&email.recipient) {
        warn!("Refusing to send summary to invalid address");
        return Err(Error::invalid());
    }

    let mailersend_client = MailerSendClient::new(config)?;

    let email_request = SendEmailRequest {
        from: EmailContact {
            email: config.email_from_address().to_string(),
            name: Some(config.email_from_name().to_string()),
        },
        to: vec![EmailContact {
            email: email.recipient.clone(),
            name: None,
        }],
        subject: summary_subject(&email.session_id),
        text: None,
        html: Some(summary_html(email)),
    };
    debug!("Email request created for session {}", email.session_id);

    let response = mailersend_client.send_email(email_request).await?;
    Ok(response.message_id)
}
