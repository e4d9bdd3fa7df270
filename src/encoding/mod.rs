//! Strict decoding of legacy help files.
//!
//! Help archives produced by Chinese-locale tooling are usually GB18030/GBK,
//! sometimes UTF-8. Decoding tries a fixed list of encodings in order and
//! takes the first one that accepts every byte without replacement.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use log::debug;

use crate::utils::error::{BoxResult, ChmError};

/// Text decoded from raw bytes, plus the encoding that accepted them
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
}

/// No candidate encoding accepted the input
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeFailure {
    /// Names of the encodings that were tried, in order
    pub tried: Vec<&'static str>,
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no candidate encoding accepted the input (tried {})", self.tried.join(", "))
    }
}

impl std::error::Error for DecodeFailure {}

impl From<DecodeFailure> for ChmError {
    fn from(failure: DecodeFailure) -> Self {
        ChmError::Decode(failure.to_string())
    }
}

/// Decodes bytes by trying a fixed priority list of encodings
#[derive(Debug, Clone)]
pub struct EncodingResolver {
    candidates: Vec<&'static Encoding>,
}

impl EncodingResolver {
    /// Build a resolver from encoding labels such as `gb18030` or `utf-8`.
    ///
    /// Unknown labels are an error. Labels that resolve to an encoding
    /// already in the list are skipped, so `gb2312` after `gbk` costs nothing.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> BoxResult<Self> {
        let mut candidates: Vec<&'static Encoding> = Vec::new();
        for label in labels {
            let label = label.as_ref();
            let encoding = Encoding::for_label(label.as_bytes())
                .ok_or_else(|| ChmError::Config(format!("Unknown encoding label: {}", label)))?;
            if !candidates.contains(&encoding) {
                candidates.push(encoding);
            }
        }

        if candidates.is_empty() {
            return Err(ChmError::Config("At least one encoding must be configured".to_string()).into());
        }

        Ok(EncodingResolver { candidates })
    }

    /// The encodings this resolver tries, in order
    pub fn candidates(&self) -> &[&'static Encoding] {
        &self.candidates
    }

    /// Decode bytes with the first candidate that accepts them.
    ///
    /// A leading byte-order mark selects its own encoding before the list is
    /// consulted; the mark itself is not part of the returned text.
    pub fn decode(&self, bytes: &[u8]) -> Result<Decoded, DecodeFailure> {
        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..]) {
                debug!("Decoded {} bytes as {} (byte-order mark)", bytes.len(), encoding.name());
                return Ok(Decoded { text: text.into_owned(), encoding });
            }
        }

        for &encoding in &self.candidates {
            if let Some(text) = strict_decode(encoding, bytes) {
                return Ok(Decoded { text: text.into_owned(), encoding });
            }
        }

        Err(DecodeFailure {
            tried: self.candidates.iter().map(|e| e.name()).collect(),
        })
    }

    /// Read a file and decode it; IO errors and decode failures both surface
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> BoxResult<Decoded> {
        let bytes = fs::read(path.as_ref())?;
        self.decode(&bytes).map_err(|failure| {
            ChmError::Decode(format!("{}: {}", path.as_ref().display(), failure)).into()
        })
    }
}

impl Default for EncodingResolver {
    fn default() -> Self {
        EncodingResolver {
            candidates: vec![encoding_rs::GB18030, encoding_rs::GBK, encoding_rs::UTF_8],
        }
    }
}

fn strict_decode<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}
