use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FaqError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lang {
    #[default]
    #[serde(rename = "zh")]
    Zh,

    #[serde(rename = "zh-CN", alias = "zh-cn")]
    ZhCn,

    #[serde(rename = "en")]
    En,

    #[serde(rename = "th")]
    Th,
}

impl Lang {
    pub const ALL: [Lang; 4] = [Lang::Zh, Lang::ZhCn, Lang::En, Lang::Th];

    pub fn code(self) -> &'static str {
        match self {
            Lang::Zh => "zh",
            Lang::ZhCn => "zh-CN",
            Lang::En => "en",
            Lang::Th => "th",
        }
    }

    pub fn is_chinese(self) -> bool {
        matches!(self, Lang::Zh | Lang::ZhCn)
    }
}

impl FromStr for Lang {
    type Err = FaqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" => Ok(Lang::Zh),
            "zh-cn" => Ok(Lang::ZhCn),
            "en" => Ok(Lang::En),
            "th" => Ok(Lang::Th),
            _ => Err(FaqError::UnknownLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("zh".parse::<Lang>().unwrap(), Lang::Zh);
        assert_eq!("zh-cn".parse::<Lang>().unwrap(), Lang::ZhCn);
        assert_eq!("ZH-CN".parse::<Lang>().unwrap(), Lang::ZhCn);
        assert_eq!(" en ".parse::<Lang>().unwrap(), Lang::En);
        assert_eq!("th".parse::<Lang>().unwrap(), Lang::Th);
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = "fr".parse::<Lang>().unwrap_err();
        assert!(matches!(err, FaqError::UnknownLanguage(code) if code == "fr"));
    }

    #[test]
    fn serde_uses_wire_codes() {
        assert_eq!(serde_json::to_string(&Lang::ZhCn).unwrap(), "\"zh-CN\"");
        let parsed: Lang = serde_json::from_str("\"zh-cn\"").unwrap();
        assert_eq!(parsed, Lang::ZhCn);
        for lang in Lang::ALL {
            assert_eq!(lang.to_string(), lang.code());
        }
    }
}
