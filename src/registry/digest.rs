//! Content digests for embedded assets (blake3).
//!
//! A digest is computed over the *uncompressed* bytes of an asset at insert
//! time. Two records with the same digest carry identical original content,
//! which backs change detection and the generated `asset_digest` function.

use std::io::{self, Read};

/// A 256-bit content digest (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Create a new ContentDigest from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string (64 chars).
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Create from hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        if bytes.len() != 32 {
            return None;
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Some(Self(arr))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display first 16 chars of hex for brevity
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Compute the digest of a byte slice.
#[inline]
pub fn digest(bytes: &[u8]) -> ContentDigest {
    ContentDigest::new(*blake3::hash(bytes).as_bytes())
}

/// Compute a digest from a reader (streaming, for large files).
pub fn digest_reader(mut reader: impl Read) -> io::Result<ContentDigest> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(ContentDigest::new(*hasher.finalize().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_deterministic() {
        let a = digest(b"// sample file\n");
        let b = digest(b"// sample file\n");
        assert_eq!(a, b);

        let c = digest(b"// other file\n");
        assert_ne!(a, c);
    }

    #[test]
    fn test_digest_hex_roundtrip() {
        let original = digest(b"hello world");
        let recovered = ContentDigest::from_hex(&original.to_hex()).unwrap();
        assert_eq!(original, recovered);
    }

    #[test]
    fn test_digest_display_is_short() {
        let d = ContentDigest::new([0xab; 32]);
        assert_eq!(format!("{}", d), "abababababababab");
    }

    #[test]
    fn test_digest_reader_matches_slice() {
        let data = vec![0x42u8; 200_000];
        let from_slice = digest(&data);
        let from_reader = digest_reader(&data[..]).unwrap();
        assert_eq!(from_slice, from_reader);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(ContentDigest::from_hex("zz").is_none());
        assert!(ContentDigest::from_hex("abcd").is_none());
    }
}
