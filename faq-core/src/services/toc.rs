use std::collections::HashMap;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

use crate::model::faq::FaqRecord;

/// Bucket name for records without a subcategory.
pub const UNCATEGORIZED: &str = "—";

#[derive(Debug, Clone, Default, Serialize)]
pub struct TocTree<'a> {
    pub categories: Vec<CategoryNode<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode<'a> {
    pub name: String,
    /// Records across all subcategories.
    pub count: usize,
    pub subcategories: Vec<SubcategoryNode<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryNode<'a> {
    pub name: String,
    pub uncategorized: bool,
    #[serde(serialize_with = "serialize_entries")]
    pub records: Vec<&'a FaqRecord>,
}

#[derive(Serialize)]
struct TocEntry<'a> {
    id: &'a str,
    question: &'a str,
}

fn serialize_entries<S: Serializer>(records: &[&FaqRecord], s: S) -> Result<S::Ok, S::Error> {
    let mut seq = s.serialize_seq(Some(records.len()))?;
    for r in records {
        seq.serialize_element(&TocEntry {
            id: &r.id,
            question: &r.question,
        })?;
    }
    seq.end()
}

pub fn subcategory_key(record: &FaqRecord) -> &str {
    if record.subcategory.is_empty() {
        UNCATEGORIZED
    } else {
        &record.subcategory
    }
}

/// Groups records by category then subcategory, keeping first-seen order at
/// both levels and input order within each bucket.
pub fn group<'a, I>(records: I) -> TocTree<'a>
where
    I: IntoIterator<Item = &'a FaqRecord>,
{
    let mut categories: Vec<CategoryNode<'a>> = Vec::new();
    let mut cat_index: HashMap<&'a str, usize> = HashMap::new();
    let mut sub_index: HashMap<(usize, &'a str), usize> = HashMap::new();

    for record in records {
        let ci = *cat_index.entry(record.category.as_str()).or_insert_with(|| {
            categories.push(CategoryNode {
                name: record.category.clone(),
                count: 0,
                subcategories: Vec::new(),
            });
            categories.len() - 1
        });

        let cat = &mut categories[ci];
        let sub = subcategory_key(record);
        let si = *sub_index.entry((ci, sub)).or_insert_with(|| {
            cat.subcategories.push(SubcategoryNode {
                name: sub.to_string(),
                uncategorized: record.subcategory.is_empty(),
                records: Vec::new(),
            });
            cat.subcategories.len() - 1
        });

        cat.subcategories[si].records.push(record);
        cat.count += 1;
    }

    TocTree { categories }
}

/// TOC for the current view: the visible records, or the whole dataset when
/// nothing is visible so navigation never collapses.
pub fn build_toc<'a>(visible: &[&'a FaqRecord], all: &'a [FaqRecord]) -> TocTree<'a> {
    if visible.is_empty() {
        group(all)
    } else {
        group(visible.iter().copied())
    }
}

impl<'a> TocTree<'a> {
    pub fn category(&self, name: &str) -> Option<&CategoryNode<'a>> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn total(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }
}

impl<'a> CategoryNode<'a> {
    pub fn subcategory(&self, name: &str) -> Option<&SubcategoryNode<'a>> {
        self.subcategories.iter().find(|s| s.name == name)
    }
}
