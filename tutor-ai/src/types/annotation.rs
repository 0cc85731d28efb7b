//! Types for image annotation.

use serde::{Deserialize, Serialize};

/// What an annotation provider found in one image.
///
/// Lists keep the provider's ranking order, most confident first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub labels: Vec<String>,
    pub objects: Vec<String>,
    /// Full text detected in the image, empty when none was found.
    pub text: String,
}

impl Annotation {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.objects.is_empty() && self.text.is_empty()
    }
}
