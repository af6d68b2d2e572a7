use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("manifest is not valid {encoding}")]
    DecodeFailure { encoding: String },
}

/// Decode a manifest file into UTF-8: BOM -> strict UTF-8 -> chardetng guess.
///
/// Spreadsheet tools commonly save CSV as Windows-1252 or with a UTF-8/UTF-16 BOM.
pub fn decode_manifest_bytes(bytes: &[u8]) -> Result<DecodedText, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if std::str::from_utf8(bytes).is_ok() {
        return decode_with(bytes, UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    decode_with(bytes, encoding)
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedText, DecodeError> {
    // `decode` strips a matching BOM.
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: used.name().to_string(),
        });
    }
    Ok(DecodedText {
        text: text.into_owned(),
        encoding_label: used.name().to_string(),
    })
}
