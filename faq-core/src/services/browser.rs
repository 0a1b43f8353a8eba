use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::search::{rank, Ranked};
use super::toc::{build_toc, subcategory_key, TocTree};
use crate::error::{FaqError, Result};
use crate::model::faq::{Dataset, FaqRecord};
use crate::model::lang::Lang;

/// Navigation selection. Each part is optional; present parts intersect.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub subcategory: Option<String>,

    #[serde(default)]
    pub faq_id: Option<String>,
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_string)
}

impl Filter {
    /// Empty strings count as absent.
    pub fn new(category: Option<&str>, subcategory: Option<&str>, faq_id: Option<&str>) -> Self {
        Filter {
            category: non_empty(category),
            subcategory: non_empty(subcategory),
            faq_id: non_empty(faq_id),
        }
    }

    pub fn record(faq_id: &str) -> Self {
        Filter::new(None, None, Some(faq_id))
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.subcategory.is_none() && self.faq_id.is_none()
    }

    pub fn matches(&self, record: &FaqRecord) -> bool {
        if let Some(cat) = &self.category {
            if &record.category != cat {
                return false;
            }
        }
        if let Some(sub) = &self.subcategory {
            if subcategory_key(record) != sub.as_str() {
                return false;
            }
        }
        if let Some(id) = &self.faq_id {
            if &record.id != id {
                return false;
            }
        }
        true
    }

    /// `category / subcategory / #id`, skipping absent parts.
    pub fn label(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(c) = &self.category {
            parts.push(c.clone());
        }
        if let Some(s) = &self.subcategory {
            parts.push(s.clone());
        }
        if let Some(id) = &self.faq_id {
            parts.push(format!("#{id}"));
        }
        parts.join(" / ")
    }
}

#[derive(Debug, Clone)]
pub enum BrowserEvent {
    SetQuery(String),
    ClearQuery,
    Select(Filter),
    Jump(String),
    ResetFilter,
    Toggle(String),
    ExpandAll,
    CollapseAll,
    /// Language switch: the dataset is replaced, never merged.
    ReplaceDataset { lang: Lang, dataset: Dataset },
}

impl BrowserEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BrowserEvent::SetQuery(_) => "set_query",
            BrowserEvent::ClearQuery => "clear_query",
            BrowserEvent::Select(_) => "select",
            BrowserEvent::Jump(_) => "jump",
            BrowserEvent::ResetFilter => "reset_filter",
            BrowserEvent::Toggle(_) => "toggle",
            BrowserEvent::ExpandAll => "expand_all",
            BrowserEvent::CollapseAll => "collapse_all",
            BrowserEvent::ReplaceDataset { .. } => "replace_dataset",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRecord<'a> {
    #[serde(flatten)]
    pub ranked: Ranked<'a>,
    pub expanded: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View<'a> {
    pub lang: Lang,
    pub query: &'a str,
    pub filter: &'a Filter,
    pub active_filter: String,
    pub result_count: usize,
    pub visible: Vec<VisibleRecord<'a>>,
    pub toc: TocTree<'a>,
}

#[derive(Debug, Clone, Default)]
pub struct BrowserState {
    lang: Lang,
    dataset: Dataset,
    query: String,
    filter: Filter,
    expanded: BTreeSet<String>,
}

impl BrowserState {
    pub fn new(lang: Lang, dataset: Dataset) -> Self {
        BrowserState {
            lang,
            dataset,
            ..Default::default()
        }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn apply(&mut self, event: BrowserEvent) {
        tracing::debug!(event = event.name(), "browser event");

        match event {
            BrowserEvent::SetQuery(q) => self.query = q,
            BrowserEvent::ClearQuery => self.query.clear(),
            BrowserEvent::Select(filter) => self.filter = filter,
            BrowserEvent::Jump(id) => self.filter = Filter::record(&id),
            BrowserEvent::ResetFilter => self.filter = Filter::default(),
            BrowserEvent::Toggle(id) => {
                if id.is_empty() {
                    return;
                }
                if !self.expanded.remove(&id) {
                    self.expanded.insert(id);
                }
            }
            BrowserEvent::ExpandAll => {
                self.expanded = self.dataset.faqs.iter().map(|f| f.id.clone()).collect();
            }
            BrowserEvent::CollapseAll => self.expanded.clear(),
            BrowserEvent::ReplaceDataset { lang, dataset } => {
                self.lang = lang;
                self.dataset = dataset;
                self.expanded.clear();
            }
        }
    }

    /// Filter selection, then text ranking.
    pub fn visible(&self) -> Vec<Ranked<'_>> {
        let selected = self.dataset.faqs.iter().filter(|f| self.filter.matches(f));
        rank(selected, &self.query)
    }

    pub fn view(&self) -> View<'_> {
        let visible = self.visible();
        let records: Vec<&FaqRecord> = visible.iter().map(|r| r.record).collect();
        let toc = build_toc(&records, &self.dataset.faqs);

        View {
            lang: self.lang,
            query: &self.query,
            filter: &self.filter,
            active_filter: self.filter.label(),
            result_count: visible.len(),
            visible: visible
                .into_iter()
                .map(|ranked| VisibleRecord {
                    expanded: self.is_expanded(&ranked.record.id),
                    ranked,
                })
                .collect(),
            toc,
        }
    }

    /// Plain-text answer for the "copy solution" action.
    pub fn solution_text(&self, id: &str) -> Result<String> {
        let faq = self
            .dataset
            .find(id)
            .ok_or_else(|| FaqError::NotFound(format!("record {id}")))?;

        let (steps_label, codes_label) = match self.lang {
            l if l.is_chinese() => ("解決步驟：", "錯誤碼"),
            Lang::Th => ("ขั้นตอนการแก้ไข:", "รหัสข้อผิดพลาด"),
            _ => ("Solution Steps:", "Error Codes"),
        };

        let mut lines = vec![format!("Q: {}", faq.question)];

        if !faq.solution_steps.is_empty() {
            lines.push(steps_label.to_string());
            for (i, step) in faq.solution_steps.iter().enumerate() {
                lines.push(format!("{}. {}", i + 1, step));
            }
        }

        if !faq.error_codes.is_empty() {
            lines.push(format!("{}: {}", codes_label, faq.error_codes.join(", ")));
        }

        Ok(lines.join("\n"))
    }
}
