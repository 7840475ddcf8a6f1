//! Extension data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API extension advertised by a Neutron endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Extension {
    /// Human readable name.
    pub name: String,
    /// Namespace URI of the extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Short alias used to address the extension, e.g. `provider`.
    pub alias: String,
    /// Last update of the extension definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Related documents.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Hyperlink attached to an extension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// Target URI.
    pub href: String,
    /// Link relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    /// Media type of the target.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtensionResponse {
    pub extension: Extension,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtensionsResponse {
    pub extensions: Vec<Extension>,
}
