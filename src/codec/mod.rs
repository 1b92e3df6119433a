//! Payload byte transforms for embedded assets.
//!
//! The registry treats compression as an injected capability: a [`Codec`]
//! turns raw bytes into the stored payload and back. `Gzip` is the default;
//! `Stored` keeps payloads verbatim for `--no-compress` builds.

use std::io::{self, Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

/// A reversible byte transform applied to asset payloads.
///
/// Implementations must be pure: `decode(encode(x)) == x` for all inputs,
/// and `encode` must be deterministic within one build.
pub trait Codec: Send + Sync {
    /// Short codec name, recorded in generated-file headers.
    fn name(&self) -> &'static str;

    /// Transform raw content into the stored payload.
    fn encode(&self, raw: &[u8]) -> io::Result<Vec<u8>>;

    /// Recover raw content from a stored payload.
    fn decode(&self, stored: &[u8]) -> io::Result<Vec<u8>>;

    /// Whether this codec stores payloads verbatim.
    fn is_stored(&self) -> bool {
        false
    }
}

/// Gzip codec (default compression level, zero header mtime).
pub struct Gzip {
    level: Compression,
}

impl Gzip {
    pub fn new() -> Self {
        Self {
            level: Compression::default(),
        }
    }
}

impl Default for Gzip {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for Gzip {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn encode(&self, raw: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), self.level);
        encoder.write_all(raw)?;
        encoder.finish()
    }

    fn decode(&self, stored: &[u8]) -> io::Result<Vec<u8>> {
        let mut decoder = GzDecoder::new(stored);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        Ok(out)
    }
}

/// Identity codec: payloads are stored uncompressed.
pub struct Stored;

impl Codec for Stored {
    fn name(&self) -> &'static str {
        "stored"
    }

    fn encode(&self, raw: &[u8]) -> io::Result<Vec<u8>> {
        Ok(raw.to_vec())
    }

    fn decode(&self, stored: &[u8]) -> io::Result<Vec<u8>> {
        Ok(stored.to_vec())
    }

    fn is_stored(&self) -> bool {
        true
    }
}

/// Pick the codec for a build.
pub fn codec_for(compress: bool) -> Box<dyn Codec> {
    if compress {
        Box::new(Gzip::new())
    } else {
        Box::new(Stored)
    }
}
