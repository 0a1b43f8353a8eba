//! Line-delimited JSON protocol.
//!
//! Request: `{ "id": any, "cmd": "browse.query", "payload": { .. } }`.
//! Response: `{ "id", "status": "ok", "payload" }` or
//! `{ "id", "status": "error", "message" }`.

use serde_json::{json, Value};

use crate::config::Settings;
use crate::error::{FaqError, Result};
use crate::model::lang::Lang;
use crate::services::authoring::AuthoringSession;
use crate::services::browser::{BrowserEvent, BrowserState};
use crate::services::debounce::Debouncer;
use crate::services::loader::DatasetSource;
use crate::services::storage::LocalStore;

mod admin;
mod browse;
mod command;

pub use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

pub(crate) fn payload_str<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub(crate) fn required_str<'a>(payload: &'a Value, key: &str) -> Result<&'a str> {
    payload_str(payload, key).ok_or_else(|| FaqError::BadRequest(format!("payload.{key} is required")))
}

/// Everything one front-end needs between requests: the browsing state, the
/// pending debounced search input and the authoring session.
pub struct Session {
    settings: Settings,
    source: DatasetSource,
    store: LocalStore,
    browser: Option<BrowserState>,
    input: Debouncer<String>,
    authoring: Option<AuthoringSession>,
    authoring_lang: Lang,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let source = DatasetSource::from_settings(&settings);
        let store = LocalStore::new(settings.storage_dir());
        let input = Debouncer::new(settings.debounce());
        let authoring_lang = settings.data.default_lang;

        Session {
            settings,
            source,
            store,
            browser: None,
            input,
            authoring: None,
            authoring_lang,
        }
    }

    pub fn handle(&mut self, input: &str) -> String {
        let req: Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(_) => {
                return json!({
                    "status": "error",
                    "message": "invalid json"
                })
                .to_string();
            }
        };

        let id = get_id(&req);
        let cmd_str = get_cmd(&req);
        let payload = get_payload(&req);

        let cmd = Command::from(cmd_str);
        tracing::debug!(cmd = cmd_str, "request");

        match self.dispatch(cmd, payload) {
            Ok(v) => ok(id, v),
            Err(e) => {
                tracing::warn!(cmd = cmd_str, "{e}");
                err(id, e.to_string())
            }
        }
    }

    fn dispatch(&mut self, cmd: Command, payload: &Value) -> Result<Value> {
        match cmd {
            Command::Ping => Ok(json!({ "message": "faq-core alive" })),

            Command::LangGet => Ok(json!({ "lang": self.preferred_lang() })),

            Command::LangSet => {
                let lang: Lang = required_str(payload, "lang")?.parse()?;
                self.store.save_lang(lang)?;
                Ok(json!({ "lang": lang }))
            }

            Command::DatasetLoad => self.load_dataset(payload),

            c if c.is_browse() => {
                let state = self.browser.as_mut().ok_or(FaqError::NotLoaded("dataset"))?;
                browse::handle(state, &mut self.input, c, payload)
            }

            c if c.is_admin() => admin::handle(self, c, payload),

            _ => Err(FaqError::BadRequest("unknown command".into())),
        }
    }

    fn preferred_lang(&self) -> Lang {
        self.store.load_lang().unwrap_or(self.settings.data.default_lang)
    }

    fn requested_lang(&self, payload: &Value) -> Result<Lang> {
        match payload_str(payload, "lang") {
            Some(code) => code.parse(),
            None => Ok(self.preferred_lang()),
        }
    }

    // A failed fetch leaves the current dataset in place.
    fn load_dataset(&mut self, payload: &Value) -> Result<Value> {
        let lang = self.requested_lang(payload)?;
        let dataset = self.source.load(lang)?;

        if let Err(e) = self.store.save_lang(lang) {
            tracing::warn!("failed to persist language preference: {e}");
        }

        let count = dataset.len();
        let meta = dataset.meta.clone();

        match self.browser.as_mut() {
            Some(state) => state.apply(BrowserEvent::ReplaceDataset { lang, dataset }),
            None => self.browser = Some(BrowserState::new(lang, dataset)),
        }
        self.input.cancel();

        Ok(json!({
            "lang": lang,
            "count": count,
            "meta": meta
        }))
    }
}
