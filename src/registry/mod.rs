//! The asset registry: canonical names, duplicate detection, and the
//! namespace index behind lookup, directory listing, and restore.
//!
//! # Module Structure
//!
//! - [`canonical`] - OS path → canonical asset name
//! - [`record`] - immutable per-file asset records
//! - [`digest`] - blake3 content digests
//! - [`restore`] - bulk restore-to-filesystem
//! - [`error`] - the registry error taxonomy
//!
//! A registry is built once per invocation and read-only afterwards. File
//! reading, digesting, and payload encoding run in parallel; insertion (the
//! duplicate-check-then-insert sequence) is serialized in deterministic key
//! order, so a build can never race itself into a half-checked table.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod record;
pub mod restore;

pub use canonical::canonicalize;
pub use digest::{ContentDigest, digest};
pub use error::{RegistryError, RestoreFailures};
pub use record::{AssetRecord, RecordMeta};
pub use restore::{RestoredSet, restore};

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use rayon::prelude::*;

use crate::codec::Codec;

// ============================================================================
// Input & build options
// ============================================================================

/// One scanned input: where it lives on disk and the name it packages under.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source: PathBuf,
    pub key: String,
}

/// What to do when two inputs package under the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Abort the build (default). A silently shadowed asset is a correctness
    /// bug for consumers of the generated API.
    #[default]
    Fail,
    /// Keep the first occurrence, log the rest.
    Warn,
}

/// Options for [`AssetRegistry::from_files`].
pub struct BuildOptions {
    pub codec: Box<dyn Codec>,
    pub keep_mode: bool,
    pub keep_mtime: bool,
    pub duplicates: DuplicatePolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            codec: crate::codec::codec_for(true),
            keep_mode: false,
            keep_mtime: false,
            duplicates: DuplicatePolicy::Fail,
        }
    }
}

// ============================================================================
// AssetRegistry
// ============================================================================

/// A namespace entry: either an asset or a directory of child names.
///
/// One tagged map keeps lookup and directory listing consistent by
/// construction; a name is a leaf or a directory, never both.
#[derive(Debug)]
enum Node {
    Leaf(AssetRecord),
    Dir(BTreeSet<String>),
}

impl Node {
    fn as_record(&self) -> Option<&AssetRecord> {
        match self {
            Node::Leaf(record) => Some(record),
            Node::Dir(_) => None,
        }
    }
}

/// Central map from canonical asset name to record, with a derived
/// directory index. The empty name `""` is the root directory.
pub struct AssetRegistry {
    nodes: BTreeMap<String, Node>,
    codec: Box<dyn Codec>,
    record_count: usize,
}

impl AssetRegistry {
    /// Create an empty registry around the given payload codec.
    pub fn new(codec: Box<dyn Codec>) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(String::new(), Node::Dir(BTreeSet::new()));
        Self {
            nodes,
            codec,
            record_count: 0,
        }
    }

    /// Build a registry from scanned files.
    ///
    /// Reads, digests, and encodes every file in parallel, then inserts the
    /// prepared records serially in key order. Any error aborts the build;
    /// the registry value never escapes on failure, so a partial table
    /// cannot be queried or emitted.
    pub fn from_files(
        files: Vec<SourceFile>,
        options: BuildOptions,
    ) -> Result<Self, RegistryError> {
        Self::from_files_with(files, options, None)
    }

    /// [`Self::from_files`] with a progress counter ticking per prepared file.
    pub fn from_files_with(
        files: Vec<SourceFile>,
        options: BuildOptions,
        progress: Option<&crate::logger::ProgressCounter>,
    ) -> Result<Self, RegistryError> {
        let BuildOptions {
            codec,
            keep_mode,
            keep_mtime,
            duplicates,
        } = options;

        let mut prepared = files
            .into_par_iter()
            .map(|file| {
                let raw =
                    std::fs::read(&file.source).map_err(|e| RegistryError::io(&file.source, e))?;
                let meta = RecordMeta::capture(&file.source, keep_mode, keep_mtime)?;
                let record = AssetRecord::prepare(file.key, file.source, raw, meta, codec.as_ref());
                if let Some(progress) = progress {
                    progress.inc();
                }
                record
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        // Stable sort: equal keys keep scan order, so under the warn policy
        // the first scanned occurrence wins.
        prepared.sort_by(|a, b| a.key.cmp(&b.key));

        let mut registry = Self::new(codec);
        for record in prepared {
            match registry.insert_record(record) {
                Ok(()) => {}
                Err(e @ RegistryError::Duplicate { .. })
                    if duplicates == DuplicatePolicy::Warn =>
                {
                    crate::log!("warning"; "{e}; keeping the first");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(registry)
    }

    /// Digest, encode, and insert raw content under `key`.
    pub fn insert(
        &mut self,
        key: String,
        source: PathBuf,
        raw: Vec<u8>,
        meta: RecordMeta,
    ) -> Result<(), RegistryError> {
        let record = AssetRecord::prepare(key, source, raw, meta, self.codec.as_ref())?;
        self.insert_record(record)
    }

    /// Insert a prepared record, registering its ancestor directories.
    ///
    /// All collision checks run before any mutation, so a failed insert
    /// leaves the registry exactly as it was.
    pub fn insert_record(&mut self, record: AssetRecord) -> Result<(), RegistryError> {
        match self.nodes.get(&record.key) {
            Some(Node::Leaf(existing)) => {
                return Err(RegistryError::Duplicate {
                    key: record.key.clone(),
                    first: existing.source.clone(),
                    second: record.source,
                });
            }
            Some(Node::Dir(_)) => {
                return Err(RegistryError::DirConflict {
                    key: record.key.clone(),
                    origin: record.source,
                });
            }
            None => {}
        }

        for (dir, _) in parent_links(&record.key) {
            if let Some(Node::Leaf(existing)) = self.nodes.get(dir) {
                return Err(RegistryError::DirConflict {
                    key: dir.to_string(),
                    origin: existing.source.clone(),
                });
            }
        }

        for (dir, child) in parent_links(&record.key) {
            if let Node::Dir(children) = self
                .nodes
                .entry(dir.to_string())
                .or_insert_with(|| Node::Dir(BTreeSet::new()))
            {
                children.insert(child.to_string());
            }
        }

        self.nodes.insert(record.key.clone(), Node::Leaf(record));
        self.record_count += 1;
        Ok(())
    }

    /// Exact-match lookup. Directory names and unknown names fail with a
    /// message that echoes the requested name verbatim: requested names are
    /// never normalized, only packaged names were.
    pub fn lookup(&self, name: &str) -> Result<&AssetRecord, RegistryError> {
        match self.nodes.get(name) {
            Some(Node::Leaf(record)) => Ok(record),
            _ => Err(RegistryError::NotFound(name.to_string())),
        }
    }

    /// Original content of an asset: lookup + payload decode.
    pub fn contents(&self, name: &str) -> Result<Vec<u8>, RegistryError> {
        let record = self.lookup(name)?;
        self.decode_payload(record)
            .map_err(|e| RegistryError::io(&record.source, e))
    }

    /// Decode a record's stored payload back to its original bytes.
    pub fn decode_payload(&self, record: &AssetRecord) -> std::io::Result<Vec<u8>> {
        if record.compressed {
            self.codec.decode(&record.payload)
        } else {
            Ok(record.payload.clone())
        }
    }

    /// Immediate children of a directory name, lexicographically ordered.
    /// Leaf names and unknown names fail; `""` lists the top level.
    pub fn children(&self, name: &str) -> Result<Vec<&str>, RegistryError> {
        match self.nodes.get(name) {
            Some(Node::Dir(children)) => Ok(children.iter().map(String::as_str).collect()),
            _ => Err(RegistryError::NotFound(name.to_string())),
        }
    }

    /// Content digest of an asset.
    pub fn digest_of(&self, name: &str) -> Result<ContentDigest, RegistryError> {
        self.lookup(name).map(|record| record.digest)
    }

    /// Resolve a name to the records it denotes: a leaf is itself, a
    /// directory is every record below it (depth-first, key order).
    pub fn select(&self, name: &str) -> Result<Vec<&AssetRecord>, RegistryError> {
        match self.nodes.get(name) {
            Some(Node::Leaf(record)) => Ok(vec![record]),
            Some(Node::Dir(_)) => {
                let prefix = if name.is_empty() {
                    String::new()
                } else {
                    format!("{name}/")
                };
                Ok(self
                    .nodes
                    .range(prefix.clone()..)
                    .take_while(|(key, _)| key.starts_with(&prefix))
                    .filter_map(|(_, node)| node.as_record())
                    .collect())
            }
            None => Err(RegistryError::NotFound(name.to_string())),
        }
    }

    /// All records in key order.
    pub fn records(&self) -> impl Iterator<Item = &AssetRecord> {
        self.nodes.values().filter_map(Node::as_record)
    }

    /// All asset names in key order.
    pub fn names(&self) -> Vec<&str> {
        self.records().map(|record| record.key.as_str()).collect()
    }

    /// All directory names with their sorted children, in key order.
    /// Includes the root `""`.
    pub fn directories(&self) -> impl Iterator<Item = (&str, Vec<&str>)> {
        self.nodes.iter().filter_map(|(key, node)| match node {
            Node::Dir(children) => Some((
                key.as_str(),
                children.iter().map(String::as_str).collect::<Vec<_>>(),
            )),
            Node::Leaf(_) => None,
        })
    }

    /// Number of asset records (directories excluded).
    pub fn len(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// The payload codec this registry was built with.
    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }
}

/// `(parent directory, immediate child segment)` pairs from the root down,
/// ending with the leaf segment itself.
fn parent_links(key: &str) -> Vec<(&str, &str)> {
    let mut links = Vec::new();
    let mut dir_end = 0;
    let mut seg_start = 0;
    for (i, b) in key.bytes().enumerate() {
        if b == b'/' {
            links.push((&key[..dir_end], &key[seg_start..i]));
            dir_end = i;
            seg_start = i + 1;
        }
    }
    links.push((&key[..dir_end], &key[seg_start..]));
    links
}
