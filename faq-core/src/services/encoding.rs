use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DecodedText {
    pub text: String,
    pub encoding: String,
    pub had_errors: bool,
}

/// Decodes dataset bytes: BOM first, then strict UTF-8, then a charset guess
/// (legacy Big5/GBK/TIS-620 exports).
pub fn decode(bytes: &[u8]) -> DecodedText {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        let name = if encoding == UTF_8 {
            "utf-8-sig".to_string()
        } else {
            encoding.name().to_lowercase()
        };
        return DecodedText {
            text: text.into_owned(),
            encoding: name,
            had_errors,
        };
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return DecodedText {
            text: text.to_string(),
            encoding: "utf-8".into(),
            had_errors: false,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::warn!(encoding = encoding.name(), "dataset decoded with replacement characters");
    }

    DecodedText {
        text: text.into_owned(),
        encoding: encoding.name().to_lowercase(),
        had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("{\"faqs\":[]}".as_bytes());
        let d = decode(&bytes);
        assert_eq!(d.text, "{\"faqs\":[]}");
        assert_eq!(d.encoding, "utf-8-sig");
        assert!(!d.had_errors);
    }

    #[test]
    fn plain_utf8_passes_through() {
        let d = decode("{\"q\":\"無法開機\"}".as_bytes());
        assert_eq!(d.text, "{\"q\":\"無法開機\"}");
        assert_eq!(d.encoding, "utf-8");
    }

    #[test]
    fn legacy_bytes_are_decoded() {
        let (bytes, _, _) = encoding_rs::BIG5.encode("{\"question\":\"馬達過熱，無法啟動。請檢查電源供應器與保險絲。\"}");
        let d = decode(&bytes);
        assert!(!d.text.is_empty());
        assert!(d.text.starts_with("{\"question\":\""));
    }
}
