//! Structured output module for JSON and YAML serialization.
//!
//! One report per invocation. In document mode each target yields a
//! [`DocumentEntry`] whose `fields` is `null` when no usable document was
//! found; in contacts mode each target yields a [`ResolvedContacts`].
//! Field names are lowercase strings and field values are either a string
//! or a list of strings.

use schemars::JsonSchema;
use serde::Serialize;

use crate::errors::Result;
use crate::parser::FieldMap;
use crate::resolver::ResolvedContacts;
use crate::sources::DocumentOrigin;

/// Root structure for all sectxt output in structured formats
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct SecTxtOutput {
    /// Tool version and metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OutputMetadata>,

    /// Parsed documents, one per target (document / file mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentEntry>,

    /// Resolved reporting addresses, one per host (contacts mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<ResolvedContacts>,
}

/// Tool metadata and versioning information
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct OutputMetadata {
    /// Tool name
    pub tool_name: String,

    /// Tool version
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl Default for OutputMetadata {
    fn default() -> Self {
        Self {
            tool_name: crate::NAME.to_string(),
            version: crate::VERSION.to_string(),
            generated_at: chrono::Utc::now(),
        }
    }
}

/// Kind of target a document was read for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSourceKind {
    Network,
    File,
}

impl From<&DocumentOrigin> for DocumentSourceKind {
    fn from(origin: &DocumentOrigin) -> Self {
        match origin {
            DocumentOrigin::Network { .. } => DocumentSourceKind::Network,
            DocumentOrigin::File { .. } => DocumentSourceKind::File,
        }
    }
}

/// A single parsed document.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct DocumentEntry {
    /// Hostname or file path as given
    pub target: String,

    /// Where the bytes were read from
    pub source: DocumentSourceKind,

    /// Parsed fields; `null` when no document was available or it was not UTF-8
    pub fields: Option<FieldMap>,
}

impl SecTxtOutput {
    /// Empty report, optionally stamped with tool metadata.
    pub fn new(include_metadata: bool) -> Self {
        Self {
            metadata: include_metadata.then(OutputMetadata::default),
            documents: Vec::new(),
            contacts: Vec::new(),
        }
    }

    pub fn push_document(
        &mut self,
        target: impl Into<String>,
        source: DocumentSourceKind,
        fields: Option<FieldMap>,
    ) {
        self.documents.push(DocumentEntry {
            target: target.into(),
            source,
            fields,
        });
    }

    /// Generate JSON schema for this output format
    pub fn generate_json_schema() -> Result<String> {
        let schema = schemars::schema_for!(SecTxtOutput);
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
