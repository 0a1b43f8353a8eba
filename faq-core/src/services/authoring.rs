use std::fs;
use std::path::Path;

use base64::Engine as _;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::normalize::{normalize_record, string_field};
use super::storage::{write_atomic, LocalStore};
use crate::error::{FaqError, Result};
use crate::model::faq::ImageAttachment;
use crate::model::localized::{LocalizedText, Resolution};

#[derive(Debug, Clone)]
pub struct StagedImage {
    pub file_name: String,
    pub data_url: String,
    pub size_kb: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordSummary {
    pub id: String,
    pub question: String,
}

/// Edits an in-memory copy of a raw dataset document. Fields the editor
/// does not know about are preserved on export.
#[derive(Debug, Clone)]
pub struct AuthoringSession {
    document: Value,
    resolution: Resolution,
    selected: Option<String>,
    staged: Option<StagedImage>,
}

fn faqs(document: &Value) -> Option<&Vec<Value>> {
    document.get("faqs").and_then(Value::as_array)
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

impl AuthoringSession {
    pub fn open(document: Value, resolution: Resolution) -> Result<Self> {
        if faqs(&document).is_none() {
            return Err(FaqError::InvalidDataset("faqs must be an array".into()));
        }

        let mut session = AuthoringSession {
            document,
            resolution,
            selected: None,
            staged: None,
        };
        session.select_first();
        Ok(session)
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn staged(&self) -> Option<&StagedImage> {
        self.staged.as_ref()
    }

    pub fn records(&self) -> Vec<RecordSummary> {
        faqs(&self.document)
            .map(|items| {
                items
                    .iter()
                    .filter(|v| v.is_object())
                    .map(|v| RecordSummary {
                        id: string_field(v.get("id")),
                        question: normalize_record(v, self.resolution).question,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn select_first(&mut self) {
        let first = faqs(&self.document)
            .and_then(|items| items.iter().find_map(record_id))
            .map(str::to_string);
        self.selected = first;
        self.staged = None;
    }

    fn record(&self, id: &str) -> Option<&Value> {
        faqs(&self.document)?
            .iter()
            .find(|r| record_id(r) == Some(id))
    }

    fn selected_record(&self) -> Result<&Value> {
        let id = self.selected.as_deref().ok_or(FaqError::NoSelection)?;
        self.record(id)
            .ok_or_else(|| FaqError::NotFound(format!("record {id}")))
    }

    fn selected_record_mut(&mut self) -> Result<&mut Map<String, Value>> {
        let id = self.selected.clone().ok_or(FaqError::NoSelection)?;
        self.document
            .get_mut("faqs")
            .and_then(Value::as_array_mut)
            .and_then(|items| {
                items
                    .iter_mut()
                    .filter_map(Value::as_object_mut)
                    .find(|r| r.get("id").and_then(Value::as_str) == Some(id.as_str()))
            })
            .ok_or_else(|| FaqError::NotFound(format!("record {id}")))
    }

    /// Selecting clears any staged image. An unknown id clears the selection.
    pub fn select(&mut self, id: &str) -> String {
        self.staged = None;
        if self.record(id).is_some() {
            self.selected = Some(id.to_string());
            format!("selected {id}")
        } else {
            self.selected = None;
            format!("record {id} not found")
        }
    }

    pub fn images(&self) -> Vec<ImageAttachment> {
        self.selected_record()
            .map(|r| normalize_record(r, self.resolution).images)
            .unwrap_or_default()
    }

    pub fn stage_image(&mut self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| FaqError::io(format!("failed to read {}", path.display()), e))?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(self.stage_bytes(&file_name, &bytes))
    }

    pub fn stage_bytes(&mut self, file_name: &str, bytes: &[u8]) -> String {
        let size_kb = (bytes.len() as u64 + 512) / 1024;
        self.staged = Some(StagedImage {
            file_name: file_name.to_string(),
            data_url: data_url(file_name, bytes),
            size_kb,
        });
        format!("encoded {file_name} (~{size_kb} KB)")
    }

    /// Attaches the staged image to the selected record. A blank id gets a
    /// generated `img-xxxxxxxx` id.
    pub fn add_image(&mut self, image_id: Option<&str>, caption: LocalizedText) -> Result<String> {
        self.selected_record()?;
        let staged = self.staged.take().ok_or(FaqError::NoStagedImage)?;

        let id = match image_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.to_string(),
            None => generate_image_id(),
        };

        let entry = json!({
            "id": id,
            "dataUrl": staged.data_url,
            "caption": caption,
        });

        let record = self.selected_record_mut()?;
        match record.get_mut("images") {
            Some(Value::Array(images)) => images.push(entry),
            _ => {
                record.insert("images".to_string(), Value::Array(vec![entry]));
            }
        }

        tracing::info!(image = %id, file = %staged.file_name, "image attached");
        Ok(format!("added image {id}"))
    }

    pub fn remove_image(&mut self, image_id: &str) -> Result<String> {
        let record = self.selected_record_mut()?;
        let mut removed = 0usize;
        if let Some(Value::Array(images)) = record.get_mut("images") {
            let before = images.len();
            images.retain(|img| img.get("id").and_then(Value::as_str) != Some(image_id));
            removed = before - images.len();
        }

        if removed == 0 {
            Ok(format!("image {image_id} not found"))
        } else {
            Ok(format!("removed image {image_id}"))
        }
    }

    pub fn save_draft(&self, store: &LocalStore, key: &str) -> Result<String> {
        let text = serde_json::to_string(&self.document).map_err(|e| FaqError::json("draft", e))?;
        store.set(key, &text)?;
        Ok("draft saved".to_string())
    }

    /// A malformed draft leaves the session untouched.
    pub fn load_draft(&mut self, store: &LocalStore, key: &str) -> Result<String> {
        let Some(raw) = store.get(key)? else {
            return Ok("no draft to load".to_string());
        };

        let document: Value = serde_json::from_str(&raw).map_err(|e| FaqError::json("draft", e))?;
        if faqs(&document).is_none() {
            return Err(FaqError::InvalidDataset("draft has no faqs array".into()));
        }

        self.document = document;
        self.select_first();
        Ok("draft loaded".to_string())
    }

    /// Stamps `meta.lastUpdated` with today's date and writes the document.
    pub fn export(&mut self, path: &Path) -> Result<String> {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();

        if let Some(obj) = self.document.as_object_mut() {
            let meta = obj.entry("meta").or_insert_with(|| json!({}));
            if !meta.is_object() {
                *meta = json!({});
            }
            if let Some(m) = meta.as_object_mut() {
                m.insert("lastUpdated".to_string(), Value::String(today));
            }
        }

        let text = serde_json::to_string_pretty(&self.document).map_err(|e| FaqError::json("export", e))?;
        write_atomic(path, text.as_bytes())?;

        tracing::info!(path = %path.display(), "dataset exported");
        Ok(format!("exported {}", path.display()))
    }
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// `data:<mime>;base64,<payload>`; the MIME type comes from the bytes, then
/// the extension, then defaults to JPEG.
pub fn data_url(file_name: &str, bytes: &[u8]) -> String {
    let mime = infer::get(bytes)
        .filter(|t| t.matcher_type() == infer::MatcherType::Image)
        .map(|t| t.mime_type())
        .or_else(|| mime_from_extension(file_name))
        .unwrap_or("image/jpeg");
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{b64}")
}

fn generate_image_id() -> String {
    let bytes: [u8; 4] = rand::random();
    format!("img-{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::DRAFT_KEY;
    use tempfile::TempDir;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn doc() -> Value {
        json!({
            "faqs": [
                { "id": "a", "question": "Boot loop", "x-owner": "ops" },
                { "id": "b", "question": "Arm drift", "images": [
                    { "id": "old", "dataUrl": "assets/old.png", "caption": "Old" }
                ] }
            ]
        })
    }

    #[test]
    fn open_requires_faqs_array() {
        assert!(AuthoringSession::open(json!({ "faqs": {} }), Resolution::Strict).is_err());
        let s = AuthoringSession::open(doc(), Resolution::Strict).unwrap();
        assert_eq!(s.selected(), Some("a"));
        assert_eq!(s.records().len(), 2);
    }

    #[test]
    fn data_url_prefers_magic_bytes() {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.extend_from_slice(&[0; 16]);
        assert!(data_url("photo.jpg", &bytes).starts_with("data:image/png;base64,"));
        assert!(data_url("icon.svg", b"<svg/>").starts_with("data:image/svg+xml;base64,"));
        assert_eq!(data_url("blob", b"abc"), "data:image/jpeg;base64,YWJj");
    }

    #[test]
    fn add_requires_staged_image() {
        let mut s = AuthoringSession::open(doc(), Resolution::Strict).unwrap();
        assert!(matches!(s.add_image(None, "cap".into()), Err(FaqError::NoStagedImage)));

        s.select("missing");
        s.stage_bytes("a.png", &PNG_HEADER);
        assert!(matches!(s.add_image(None, "cap".into()), Err(FaqError::NoSelection)));
    }

    #[test]
    fn add_and_remove_images() {
        let mut s = AuthoringSession::open(doc(), Resolution::Strict).unwrap();
        s.select("b");
        s.stage_bytes("wiring.png", &PNG_HEADER);
        s.add_image(Some("  "), "Wiring".into()).unwrap();
        assert!(s.staged().is_none());

        let images = s.images();
        assert_eq!(images.len(), 2);
        let added = &images[1];
        assert!(added.id.starts_with("img-"));
        assert_eq!(added.id.len(), "img-".len() + 8);
        assert_eq!(added.caption, "Wiring");
        assert!(added.is_inline());

        s.remove_image("old").unwrap();
        assert_eq!(s.images().len(), 1);
        assert_eq!(s.remove_image("old").unwrap(), "image old not found");
    }

    #[test]
    fn add_creates_images_array_with_localized_caption() {
        let mut s = AuthoringSession::open(doc(), Resolution::Strict).unwrap();
        s.stage_bytes("a.png", &PNG_HEADER);
        let caption = LocalizedText::from_value(&json!({ "zh": "接線圖", "en": "Wiring" })).unwrap();
        s.add_image(Some("img-1"), caption).unwrap();

        let img = &s.document()["faqs"][0]["images"][0];
        assert_eq!(img["id"], "img-1");
        assert_eq!(img["caption"], json!({ "en": "Wiring", "zh": "接線圖" }));
        assert_eq!(s.document()["faqs"][0]["x-owner"], "ops");
    }

    #[test]
    fn selecting_clears_staged_image() {
        let mut s = AuthoringSession::open(doc(), Resolution::Strict).unwrap();
        s.stage_bytes("a.png", &PNG_HEADER);
        assert_eq!(s.select("b"), "selected b");
        assert!(s.staged().is_none());
        assert_eq!(s.select("zzz"), "record zzz not found");
        assert_eq!(s.selected(), None);
        assert!(s.images().is_empty());
    }

    #[test]
    fn drafts_round_trip_and_reject_garbage() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        let mut s = AuthoringSession::open(doc(), Resolution::Strict).unwrap();
        assert_eq!(s.load_draft(&store, DRAFT_KEY).unwrap(), "no draft to load");

        s.stage_bytes("a.png", &PNG_HEADER);
        s.add_image(Some("new"), "x".into()).unwrap();
        s.save_draft(&store, DRAFT_KEY).unwrap();

        let mut fresh = AuthoringSession::open(doc(), Resolution::Strict).unwrap();
        fresh.load_draft(&store, DRAFT_KEY).unwrap();
        assert_eq!(fresh.document(), s.document());

        store.set(DRAFT_KEY, "{ broken").unwrap();
        let before = fresh.document().clone();
        assert!(matches!(fresh.load_draft(&store, DRAFT_KEY), Err(FaqError::InvalidJson { .. })));
        assert_eq!(fresh.document(), &before);
    }

    #[test]
    fn export_stamps_last_updated() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("faqs.en.json");

        let mut s = AuthoringSession::open(doc(), Resolution::Strict).unwrap();
        s.export(&out).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(written["meta"]["lastUpdated"], today.as_str());
        assert_eq!(written["faqs"][0]["x-owner"], "ops");
    }

    #[test]
    fn stage_image_reads_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("panel.png");
        fs::write(&path, PNG_HEADER).unwrap();

        let mut s = AuthoringSession::open(doc(), Resolution::Strict).unwrap();
        let status = s.stage_image(&path).unwrap();
        assert!(status.contains("panel.png"));
        assert!(s.staged().unwrap().data_url.starts_with("data:image/png;base64,"));

        assert!(s.stage_image(&tmp.path().join("missing.png")).is_err());
    }
}
