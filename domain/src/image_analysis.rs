//! Describes what the annotation provider found in an uploaded picture.

use crate::error::Error;
use log::*;
use tutor_ai::traits::annotation::Provider;
use tutor_ai::types::annotation::Annotation;

const MAX_TEXT_CHARS: usize = 200;
const LABELS_IN_DESCRIPTION: usize = 5;

/// Annotation results plus a ready-to-display summary of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnalysis {
    pub description: String,
    pub annotation: Annotation,
}

/// Removes a `data:image/<type>;base64,` prefix if the image came as a data URL.
pub fn strip_data_url_prefix(image: &str) -> &str {
    let Some(rest) = image.strip_prefix("data:image/") else {
        return image;
    };
    let Some((subtype, payload)) = rest.split_once(";base64,") else {
        return image;
    };

    let is_word = !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_word {
        payload
    } else {
        image
    }
}

pub fn describe(annotation: &Annotation) -> String {
    if annotation.is_empty() {
        return "🔍 Could not detect any specific objects or text in the image.".to_string();
    }

    let mut description = String::from("🔍 **Vision AI Analysis**\n\n");

    if !annotation.objects.is_empty() {
        description.push_str(&format!(
            "📦 **Objects Detected:**\n{}\n\n",
            annotation.objects.join(", ")
        ));
    }

    if !annotation.labels.is_empty() {
        let labels: Vec<&str> = annotation
            .labels
            .iter()
            .take(LABELS_IN_DESCRIPTION)
            .map(String::as_str)
            .collect();
        description.push_str(&format!("🏷️ **Labels:**\n{}\n\n", labels.join(", ")));
    }

    if !annotation.text.is_empty() {
        let shown: String = annotation.text.chars().take(MAX_TEXT_CHARS).collect();
        let ellipsis = if annotation.text.chars().count() > MAX_TEXT_CHARS {
            "..."
        } else {
            ""
        };
        description.push_str(&format!("📝 **Text Found:**\n{shown}{ellipsis}"));
    }

    description
}

pub async fn analyze(provider: &dyn Provider, image: &str) -> Result<ImageAnalysis, Error> {
    let image = strip_data_url_prefix(image.trim());
    if image.is_empty() {
        return Err(Error::invalid());
    }

    let annotation = provider.annotate(image).await?;
    info!(
        "{} found {} labels, {} objects",
        provider.provider_id(),
        annotation.labels.len(),
        annotation.objects.len()
    );

    Ok(ImageAnalysis {
        description: describe(&annotation),
        annotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_ai::traits::annotation::MockProvider;

    #[test]
    fn data_url_prefixes_are_removed() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,iVBOR"), "iVBOR");
        assert_eq!(strip_data_url_prefix("data:image/jpeg;base64,/9j/"), "/9j/");
        assert_eq!(strip_data_url_prefix("iVBOR"), "iVBOR");
        assert_eq!(
            strip_data_url_prefix("data:image/svg+xml;base64,PHN2"),
            "data:image/svg+xml;base64,PHN2"
        );
    }

    #[test]
    fn description_lists_objects_top_labels_and_truncated_text() {
        let annotation = Annotation {
            labels: (1..=7).map(|i| format!("label{i}")).collect(),
            objects: vec!["Person".to_string(), "Whiteboard".to_string()],
            text: "x".repeat(250),
        };

        let description = describe(&annotation);

        assert!(description.contains("Person, Whiteboard"));
        assert!(description.contains("label1, label2, label3, label4, label5\n"));
        assert!(!description.contains("label6"));
        assert!(description.ends_with(&format!("{}...", "x".repeat(200))));
    }

    #[test]
    fn short_text_is_not_ellipsized() {
        let annotation = Annotation {
            text: "E = mc^2".to_string(),
            ..Annotation::default()
        };

        assert!(describe(&annotation).ends_with("📝 **Text Found:**\nE = mc^2"));
    }

    #[test]
    fn nothing_detected_has_its_own_line() {
        assert_eq!(
            describe(&Annotation::default()),
            "🔍 Could not detect any specific objects or text in the image."
        );
    }

    #[tokio::test]
    async fn analyze_sends_the_bare_base64_payload() {
        let mut provider = MockProvider::new();
        provider.expect_provider_id().return_const("mock");
        provider
            .expect_annotate()
            .withf(|image| image.to_string() == "iVBOR")
            .times(1)
            .returning(|_| {
                Ok(Annotation {
                    labels: vec!["Diagram".to_string()],
                    ..Annotation::default()
                })
            });

        let analysis = analyze(&provider, "data:image/png;base64,iVBOR").await.unwrap();

        assert_eq!(analysis.annotation.labels, vec!["Diagram"]);
        assert!(analysis.description.contains("Diagram"));
    }
}
