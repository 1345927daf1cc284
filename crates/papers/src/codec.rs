//! Path codec: bidirectional mapping between filesystem paths and record
//! identity.
//!
//! Paths follow the layout `root/<subject>/<year>_<series>/<tag>_<number>.<ext>`
//! where the tag is a fixed two-character variant prefix.

use std::path::{Path, PathBuf};

use crate::error::{PapersError, Result};
use crate::types::{PaperId, Series, Variant, HINDI_SUBJECT, ICT_SUBJECT};

/// A single decoded file: record identity plus the file's variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPaper {
    pub id: PaperId,
    pub variant: Variant,
}

/// Decodes a paper file path relative to `root` into its raw tuple.
///
/// The indexer pre-filters paths through a glob pattern that structurally
/// guarantees this shape; anything else is a malformed-path error the caller
/// should skip.
pub fn decode_path(root: &Path, path: &Path) -> Result<RawPaper> {
    let malformed = || PapersError::MalformedPath(path.to_path_buf());

    let rel = path.strip_prefix(root).map_err(|_| malformed())?;
    let mut parts = rel.iter();
    let subject = parts.next().and_then(|s| s.to_str()).ok_or_else(malformed)?;
    let session = parts.next().and_then(|s| s.to_str()).ok_or_else(malformed)?;
    let leaf = parts.next().and_then(|s| s.to_str()).ok_or_else(malformed)?;
    if parts.next().is_some() {
        return Err(malformed());
    }

    let (year, series) = session.split_once('_').ok_or_else(malformed)?;
    let series: Series = series.parse().map_err(|_| malformed())?;

    let stem = leaf.split_once('.').map_or(leaf, |(stem, _)| stem);
    let tag = stem.get(..2).ok_or_else(malformed)?;
    if stem.get(2..3) != Some("_") {
        return Err(malformed());
    }
    let paper_number = stem.get(3..).filter(|n| !n.is_empty()).ok_or_else(malformed)?;
    let variant: Variant = tag.parse().map_err(|_| malformed())?;

    Ok(RawPaper {
        id: PaperId::new(subject, year, series, paper_number),
        variant,
    })
}

/// Encodes a record identity and variant back into its file path under `root`.
pub fn encode_path(root: &Path, id: &PaperId, variant: Variant) -> PathBuf {
    let ext = extension_for(&id.subject, variant);
    root.join(&id.subject)
        .join(format!("{}_{}", id.year, id.series))
        .join(format!("{}_{}.{ext}", variant, id.paper_number))
}

/// Extension rule, order matters: ICT supplementary files are zip archives,
/// Hindi supplementary files are mp3 audio, everything else is pdf.
pub fn extension_for(subject: &str, variant: Variant) -> &'static str {
    if variant == Variant::Sf && subject == ICT_SUBJECT {
        return "zip";
    }
    if variant == Variant::Sf && subject == HINDI_SUBJECT {
        return "mp3";
    }
    "pdf"
}
