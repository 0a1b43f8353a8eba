use std::path::PathBuf;

use serde_json::{json, Value};

use super::{payload_str, required_str, Command, Session};
use crate::error::{FaqError, Result};
use crate::model::localized::LocalizedText;
use crate::services::authoring::AuthoringSession;
use crate::services::storage::draft_key;

impl Session {
    fn authoring_draft_key(&self) -> String {
        draft_key(self.source.is_per_language().then_some(self.authoring_lang))
    }
}

fn session_mut(session: &mut Session) -> Result<&mut AuthoringSession> {
    session
        .authoring
        .as_mut()
        .ok_or(FaqError::NotLoaded("authoring session"))
}

pub fn handle(session: &mut Session, cmd: Command, payload: &Value) -> Result<Value> {
    match cmd {
        Command::AdminOpen => {
            let lang = session.requested_lang(payload)?;
            let doc = session.source.fetch_document(lang)?;
            let authoring = AuthoringSession::open(doc, session.source.resolution(lang))?;
            let records = authoring.records();
            let selected = authoring.selected().map(str::to_string);

            session.authoring = Some(authoring);
            session.authoring_lang = lang;

            Ok(json!({
                "status": format!("loaded {} records", records.len()),
                "lang": lang,
                "records": records,
                "selected": selected
            }))
        }

        Command::AdminSelect => {
            let id = required_str(payload, "faqId")?;
            let authoring = session_mut(session)?;
            let status = authoring.select(id);
            Ok(json!({ "status": status, "images": authoring.images() }))
        }

        Command::AdminStageImage => {
            let path = PathBuf::from(required_str(payload, "path")?);
            let status = session_mut(session)?.stage_image(&path)?;
            Ok(json!({ "status": status }))
        }

        Command::AdminAddImage => {
            let caption = payload
                .get("caption")
                .and_then(LocalizedText::from_value)
                .unwrap_or_else(|| LocalizedText::from(""));
            let authoring = session_mut(session)?;
            let status = authoring.add_image(payload_str(payload, "imageId"), caption)?;
            Ok(json!({ "status": status, "images": authoring.images() }))
        }

        Command::AdminRemoveImage => {
            let image_id = required_str(payload, "imageId")?;
            let authoring = session_mut(session)?;
            let status = authoring.remove_image(image_id)?;
            Ok(json!({ "status": status, "images": authoring.images() }))
        }

        Command::AdminSaveDraft => {
            let key = session.authoring_draft_key();
            let authoring = session
                .authoring
                .as_ref()
                .ok_or(FaqError::NotLoaded("authoring session"))?;
            Ok(json!({ "status": authoring.save_draft(&session.store, &key)? }))
        }

        Command::AdminLoadDraft => {
            let key = session.authoring_draft_key();
            let authoring = session
                .authoring
                .as_mut()
                .ok_or(FaqError::NotLoaded("authoring session"))?;
            let status = authoring.load_draft(&session.store, &key)?;
            Ok(json!({ "status": status, "selected": authoring.selected() }))
        }

        Command::AdminExport => {
            let path = match payload_str(payload, "path") {
                Some(p) => PathBuf::from(p),
                None => session.source.export_path(session.authoring_lang),
            };
            let status = session_mut(session)?.export(&path)?;
            Ok(json!({ "status": status, "path": path.to_string_lossy() }))
        }

        _ => Err(FaqError::BadRequest("unknown command".into())),
    }
}
