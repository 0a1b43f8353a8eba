use serde::{Deserialize, Serialize};

/// One FAQ entry in canonical shape: plain strings and string lists only.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FaqRecord {
    pub id: String,

    #[serde(default)]
    pub category: String,

    /// Empty means "uncategorized".
    #[serde(default)]
    pub subcategory: String,

    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub symptoms: Vec<String>,

    #[serde(default)]
    pub root_causes: Vec<String>,

    #[serde(default)]
    pub solution_steps: Vec<String>,

    #[serde(default)]
    pub notes: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub error_codes: Vec<String>,

    #[serde(default)]
    pub related_faq_ids: Vec<String>,

    #[serde(default)]
    pub images: Vec<ImageAttachment>,

    #[serde(default)]
    pub last_updated: String,

    /// Question in the other search languages (unified datasets only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_questions: Vec<String>,

    /// Category, subcategory, section lists and captions in the other
    /// search languages (unified datasets only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_text: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ImageAttachment {
    #[serde(default)]
    pub id: String,

    /// Relative asset path or `data:` URI.
    #[serde(default, rename = "dataUrl", alias = "src", alias = "path")]
    pub source: String,

    #[serde(default)]
    pub caption: String,
}

impl ImageAttachment {
    pub fn is_inline(&self) -> bool {
        self.source.starts_with("data:")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMeta {
    #[serde(default)]
    pub last_updated: String,

    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    #[serde(default)]
    pub faqs: Vec<FaqRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DatasetMeta>,
}

impl Dataset {
    pub fn find(&self, id: &str) -> Option<&FaqRecord> {
        self.faqs.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.faqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faqs.is_empty()
    }
}
