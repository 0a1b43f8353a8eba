use std::cmp::Ordering;

use serde::Serialize;

use super::normalize::normalize_text;
use crate::model::faq::FaqRecord;

pub const WEIGHT_ERROR_CODE: u32 = 100;
pub const WEIGHT_QUESTION: u32 = 60;
pub const WEIGHT_TAG: u32 = 40;
pub const WEIGHT_KEYWORD: u32 = 25;
pub const WEIGHT_BLOB: u32 = 10;
pub const WEIGHT_TOKEN_HIT: u32 = 5;
pub const TOKEN_BONUS_CAP: u32 = 20;

/// A record that survived filtering, with its relevance score
/// (0 when the query was empty).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Ranked<'a> {
    #[serde(flatten)]
    pub record: &'a FaqRecord,
    pub score: u32,
}

/// Normalized searchable text of a record, including its text in the other
/// search languages. Inline `data:` image sources are left out.
pub fn build_blob(record: &FaqRecord) -> String {
    let mut fields: Vec<&str> = vec![
        record.category.as_str(),
        record.subcategory.as_str(),
        record.question.as_str(),
    ];

    for list in [
        &record.tags,
        &record.keywords,
        &record.error_codes,
        &record.symptoms,
        &record.root_causes,
        &record.solution_steps,
        &record.notes,
        &record.alt_questions,
        &record.search_text,
    ] {
        fields.extend(list.iter().map(String::as_str));
    }

    for img in &record.images {
        fields.push(img.caption.as_str());
        if !img.is_inline() {
            fields.push(img.source.as_str());
        }
    }

    normalize_text(&fields.join(" | "))
}

fn any_contains(items: &[String], query: &str) -> bool {
    items.iter().map(|s| normalize_text(s)).any(|s| s.contains(query))
}

/// Relevance of `record` for an already-normalized query. Zero means no match.
pub fn score(record: &FaqRecord, query: &str) -> u32 {
    if query.is_empty() {
        return 0;
    }

    let mut score = 0;

    // "equals" is subsumed by "contains" for every list below
    if any_contains(&record.error_codes, query) {
        score += WEIGHT_ERROR_CODE;
    }

    if normalize_text(&record.question).contains(query) || any_contains(&record.alt_questions, query) {
        score += WEIGHT_QUESTION;
    }

    if any_contains(&record.tags, query) {
        score += WEIGHT_TAG;
    }

    if any_contains(&record.keywords, query) {
        score += WEIGHT_KEYWORD;
    }

    let blob = build_blob(record);
    if blob.contains(query) {
        score += WEIGHT_BLOB;
    }

    let tokens: Vec<&str> = query.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.len() > 1 {
        let hits = tokens.iter().filter(|t| blob.contains(**t)).count() as u32;
        score += (hits * WEIGHT_TOKEN_HIT).min(TOKEN_BONUS_CAP);
    }

    score
}

/// Category, then subcategory, ascending; newest `lastUpdated` first.
/// Names compare by code point after normalization, not by locale.
pub fn natural_cmp(a: &FaqRecord, b: &FaqRecord) -> Ordering {
    normalize_text(&a.category)
        .cmp(&normalize_text(&b.category))
        .then_with(|| normalize_text(&a.subcategory).cmp(&normalize_text(&b.subcategory)))
        .then_with(|| normalize_text(&b.last_updated).cmp(&normalize_text(&a.last_updated)))
}

/// Scores and orders `records` for a raw query.
///
/// An empty query keeps every record in natural order with score 0.
/// Otherwise records scoring 0 are dropped and the rest are sorted by
/// descending score; equal scores keep their input order.
pub fn rank<'a, I>(records: I, query: &str) -> Vec<Ranked<'a>>
where
    I: IntoIterator<Item = &'a FaqRecord>,
{
    let q = normalize_text(query);

    if q.is_empty() {
        let mut all: Vec<Ranked<'a>> = records
            .into_iter()
            .map(|record| Ranked { record, score: 0 })
            .collect();
        all.sort_by(|a, b| natural_cmp(a.record, b.record));
        return all;
    }

    let mut hits: Vec<Ranked<'a>> = records
        .into_iter()
        .map(|record| Ranked {
            record,
            score: score(record, &q),
        })
        .filter(|r| r.score > 0)
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}
