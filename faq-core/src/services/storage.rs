use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{FaqError, Result};
use crate::model::lang::Lang;

/// Last-selected browsing language.
pub const LANG_KEY: &str = "faq_lang_v1";
/// Authoring draft (full serialized dataset).
pub const DRAFT_KEY: &str = "faq_admin_draft_v1";

/// Draft key for a dataset. Per-language datasets keep one draft per
/// language so a draft is never exported over another language's file.
pub fn draft_key(lang: Option<Lang>) -> String {
    match lang {
        Some(lang) => format!("{DRAFT_KEY}.{}", lang.code()),
        None => DRAFT_KEY.to_string(),
    }
}

/// Directory-backed string store, one file per key.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FaqError::io(format!("failed to read {}", path.display()), e)),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        write_atomic(&self.path_for(key), value.as_bytes())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FaqError::io(format!("failed to remove {}", path.display()), e)),
        }
    }

    /// Stored language preference. Unreadable or unknown values are ignored.
    pub fn load_lang(&self) -> Option<Lang> {
        match self.get(LANG_KEY) {
            Ok(Some(code)) => match code.parse() {
                Ok(lang) => Some(lang),
                Err(e) => {
                    tracing::warn!("ignoring stored language: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("failed to read language preference: {e}");
                None
            }
        }
    }

    pub fn save_lang(&self, lang: Lang) -> Result<()> {
        self.set(LANG_KEY, lang.code())
    }
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| FaqError::io(format!("failed to create {}", parent.display()), e))?;
    }

    fs::write(&tmp, bytes).map_err(|e| FaqError::io(format!("failed to write {}", tmp.display()), e))?;

    if let Err(e) = fs::rename(&tmp, path) {
        // Windows will not rename over an existing file
        if !path.exists() {
            return Err(FaqError::io(format!("failed to write {}", path.display()), e));
        }
        fs::remove_file(path)
            .map_err(|e| FaqError::io(format!("failed to replace {}", path.display()), e))?;
        fs::rename(&tmp, path).map_err(|e| FaqError::io(format!("failed to write {}", path.display()), e))?;
    }

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "faq".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
