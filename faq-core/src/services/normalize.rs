use std::collections::HashSet;

use serde_json::Value;

use crate::model::faq::{Dataset, DatasetMeta, FaqRecord, ImageAttachment};
use crate::model::lang::Lang;
use crate::model::localized::{LocalizedText, Resolution};

/// Trim, lower-case and collapse whitespace runs to single spaces.
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn string_field(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

/// String items of an array, in order. Non-string items are dropped.
pub fn list_field(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn localized_field(value: Option<&Value>, resolution: Resolution) -> String {
    value
        .and_then(LocalizedText::from_value)
        .map(|t| t.resolve(resolution))
        .unwrap_or_default()
}

// List fields in unified datasets look like `{ "zh": [..], "en": [..] }`.
// Only the active language is used, there is no fallback.
fn localized_list(value: Option<&Value>, resolution: Resolution) -> Vec<String> {
    match (value, resolution) {
        (Some(Value::Array(_)), _) => list_field(value),
        (Some(Value::Object(map)), Resolution::Localized(lang)) => list_field(map.get(lang.code())),
        _ => Vec::new(),
    }
}

/// Languages a unified dataset is always searchable in, whatever the
/// active language.
pub const SEARCH_LANGS: [Lang; 2] = [Lang::Zh, Lang::En];

// Text of a per-language object in the search languages other than the
// active one. Strings and string lists are both accepted.
fn alternates(value: Option<&Value>, resolution: Resolution) -> Vec<String> {
    let (Some(Value::Object(map)), Resolution::Localized(active)) = (value, resolution) else {
        return Vec::new();
    };

    SEARCH_LANGS
        .iter()
        .filter(|lang| **lang != active)
        .flat_map(|lang| match map.get(lang.code()) {
            Some(Value::String(s)) => vec![s.clone()],
            other => list_field(other),
        })
        .collect()
}

fn search_text(raw: &Value, resolution: Resolution) -> Vec<String> {
    let mut text = list_field(raw.get("searchText"));

    for key in ["category", "subcategory", "symptoms", "rootCauses", "solutionSteps", "notes"] {
        text.extend(alternates(raw.get(key), resolution));
    }

    if let Some(Value::Array(images)) = raw.get("images") {
        for img in images {
            text.extend(alternates(img.get("caption"), resolution));
        }
    }

    text
}

pub fn normalize_image(raw: &Value, resolution: Resolution) -> Option<ImageAttachment> {
    let obj = raw.as_object()?;

    let source = ["dataUrl", "src", "path"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    Some(ImageAttachment {
        id: string_field(obj.get("id")),
        source,
        caption: localized_field(obj.get("caption"), resolution),
    })
}

pub fn normalize_record(raw: &Value, resolution: Resolution) -> FaqRecord {
    let images = match raw.get("images") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| normalize_image(v, resolution))
            .collect(),
        _ => Vec::new(),
    };

    FaqRecord {
        id: string_field(raw.get("id")),
        category: localized_field(raw.get("category"), resolution),
        subcategory: localized_field(raw.get("subcategory"), resolution),
        question: localized_field(raw.get("question"), resolution),
        symptoms: localized_list(raw.get("symptoms"), resolution),
        root_causes: localized_list(raw.get("rootCauses"), resolution),
        solution_steps: localized_list(raw.get("solutionSteps"), resolution),
        notes: localized_list(raw.get("notes"), resolution),
        tags: list_field(raw.get("tags")),
        keywords: list_field(raw.get("keywords")),
        error_codes: list_field(raw.get("errorCodes")),
        related_faq_ids: list_field(raw.get("relatedFaqIds")),
        images,
        last_updated: string_field(raw.get("lastUpdated")),
        alt_questions: list_field(raw.get("altQuestions"))
            .into_iter()
            .chain(alternates(raw.get("question"), resolution))
            .collect(),
        search_text: search_text(raw, resolution),
    }
}

/// Never fails: a document without a `faqs` array has no records.
pub fn normalize_dataset(raw: &Value, resolution: Resolution) -> Dataset {
    let faqs: Vec<FaqRecord> = match raw.get("faqs") {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| v.is_object())
            .map(|v| normalize_record(v, resolution))
            .collect(),
        _ => {
            tracing::warn!("dataset has no faqs array; treating it as empty");
            Vec::new()
        }
    };

    let mut seen = HashSet::new();
    for f in &faqs {
        if !seen.insert(f.id.as_str()) {
            tracing::warn!(id = %f.id, "duplicate record id in dataset");
        }
    }

    let meta = raw.get("meta").and_then(Value::as_object).map(|m| DatasetMeta {
        last_updated: string_field(m.get("lastUpdated")),
        scope: localized_field(m.get("scope"), resolution),
    });

    Dataset { faqs, meta }
}
