//! Click-to-chat links for sharing session material over WhatsApp.
//!
//! Nothing is sent from here: the link opens WhatsApp with the message prefilled.

use crate::error::Error;
use log::*;

const COUNTRY_CODE: &str = "91";
const DEFAULT_MESSAGE: &str = "Educational Material";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppLink {
    pub url: String,
    /// International number with a leading "+".
    pub phone_number: String,
}

/// Keeps the digits of `phone_number` and adds the country code to bare
/// ten digit local numbers.
pub fn normalize_phone_number(phone_number: &str) -> Option<String> {
    let digits: String = phone_number.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        None
    } else if digits.len() == 10 && !digits.starts_with(COUNTRY_CODE) {
        Some(format!("{COUNTRY_CODE}{digits}"))
    } else {
        Some(digits)
    }
}

pub fn build_link(
    phone_number: &str,
    message: Option<&str>,
    video_url: Option<&str>,
) -> Result<WhatsAppLink, Error> {
    let number = normalize_phone_number(phone_number).ok_or_else(|| {
        warn!("WhatsApp link requested without a usable phone number");
        Error::invalid()
    })?;

    let message = message
        .filter(|message| !message.is_empty())
        .unwrap_or(DEFAULT_MESSAGE);
    let mut text = urlencoding::encode(message).into_owned();
    if let Some(video_url) = video_url.filter(|url| !url.is_empty()) {
        text.push_str(&urlencoding::encode(&format!("\n\nVideo: {video_url}")));
    }

    let url = format!("https://wa.me/{number}?text={text}");
    debug!("WhatsApp URL generated: {url}");

    Ok(WhatsAppLink {
        url,
        phone_number: format!("+{number}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_numbers_get_the_country_code() {
        assert_eq!(
            normalize_phone_number("98765 43210"),
            Some("919876543210".to_string())
        );
        assert_eq!(
            normalize_phone_number("+91 98765-43210"),
            Some("919876543210".to_string())
        );
        // ten digits already starting with the code are left alone
        assert_eq!(
            normalize_phone_number("9123456789"),
            Some("9123456789".to_string())
        );
        assert_eq!(
            normalize_phone_number("+1 (415) 555-0100"),
            Some("14155550100".to_string())
        );
        assert_eq!(normalize_phone_number("call me"), None);
    }

    #[test]
    fn links_carry_the_encoded_message_and_video() {
        let link = build_link(
            "9876543210",
            Some("Notes on qubits & gates"),
            Some("https://example.com/v.mp4"),
        )
        .unwrap();

        assert_eq!(link.phone_number, "+919876543210");
        assert_eq!(
            link.url,
            "https://wa.me/919876543210?text=Notes%20on%20qubits%20%26%20gates%0A%0AVideo%3A%20https%3A%2F%2Fexample.com%2Fv.mp4"
        );
    }

    #[test]
    fn missing_message_uses_the_default() {
        let link = build_link("14155550100", None, None).unwrap();

        assert_eq!(
            link.url,
            "https://wa.me/14155550100?text=Educational%20Material"
        );
    }

    #[test]
    fn numbers_without_digits_are_rejected() {
        assert!(build_link("n/a", Some("hi"), None).is_err());
    }
}
