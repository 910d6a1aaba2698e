//! Project metadata for the report cover page.

use serde::{Deserialize, Serialize};

/// Project details rendered on the cover page.
///
/// Supplied whole by the caller's configuration layer; the acquisition
/// pipeline treats it as opaque. Empty fields are skipped when rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    pub site: String,
    pub technician: String,
    pub company: String,
    /// Raw logo image bytes (PNG or JPEG); scaled into a fixed box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Vec<u8>>,
}

impl ProjectMetadata {
    pub fn new(
        name: impl Into<String>,
        site: impl Into<String>,
        technician: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            site: site.into(),
            technician: technician.into(),
            company: company.into(),
            logo: None,
        }
    }

    pub fn with_logo(mut self, logo: Vec<u8>) -> Self {
        self.logo = Some(logo);
        self
    }
}
