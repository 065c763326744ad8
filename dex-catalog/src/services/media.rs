//! Image URL and display-number formatting

use crate::types::RecordId;
use dex_common::config::DEFAULT_IMAGE_URL_TEMPLATE;

/// Formats image URLs from a template containing `{id}`
#[derive(Debug, Clone)]
pub struct ImageUrlFormatter {
    template: String,
}

impl ImageUrlFormatter {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// `{id}` replaced by the id padded to at least three digits
    pub fn url_for(&self, id: RecordId) -> String {
        self.template.replace("{id}", &padded_id(id))
    }
}

impl Default for ImageUrlFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_URL_TEMPLATE)
    }
}

/// `7` → `007`, `1025` → `1025`
pub fn padded_id(id: RecordId) -> String {
    format!("{:03}", id)
}

/// `7` → `#007`
pub fn display_number(id: RecordId) -> String {
    format!("#{}", padded_id(id))
}
