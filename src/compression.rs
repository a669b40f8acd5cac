use std::io::Write;

use flate2::write::GzEncoder;

/// Request body compression scheme.
///
/// Chunking is applied to the uncompressed bytes; the maximum content length
/// bounds what the collector decodes, not what travels on the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Compression {
    #[default]
    None,
    Gzip(flate2::Compression),
}

impl Compression {
    pub const fn gzip_default() -> Self {
        Compression::Gzip(flate2::Compression::new(6))
    }

    /// Value for the `Content-Encoding` header, when one applies.
    pub const fn content_encoding(self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Gzip(_) => Some("gzip"),
        }
    }

    pub(crate) fn encode(self, body: Vec<u8>) -> std::io::Result<Vec<u8>> {
        match self {
            Compression::None => Ok(body),
            Compression::Gzip(level) => {
                let mut encoder = GzEncoder::new(Vec::with_capacity(body.len()), level);
                encoder.write_all(&body)?;
                encoder.finish()
            }
        }
    }
}
