//! Record indexer: scans the paper tree and groups raw files into logical
//! records with normalized variant slots.

use std::path::Path;

use crate::codec::{decode_path, RawPaper};
use crate::error::{PapersError, Result};
use crate::types::{PaperRecord, VariantSlots};

/// Glob suffix selecting paper files: two path segments below the root, a
/// two-character tag, an underscore and a two-character paper number.
const LISTING_PATTERN: &str = "*/*/??_??.*";

/// Scans `root` for paper files and builds the logical record list.
///
/// Malformed entries are skipped with a warning rather than failing the whole
/// scan. Record order is the order of first appearance in the listing.
pub fn index_records(root: &Path) -> Result<Vec<PaperRecord>> {
    let pattern = root.join(LISTING_PATTERN);
    let pattern = pattern
        .to_str()
        .ok_or_else(|| PapersError::Pattern(pattern.to_string_lossy().into_owned()))?;

    let mut raws = Vec::new();
    let listing = glob::glob(pattern).map_err(|error| PapersError::Pattern(error.to_string()))?;
    for entry in listing {
        let path = match entry {
            Ok(path) => path,
            Err(error) => {
                log::warn!("skipping unreadable listing entry: {error}");
                continue;
            }
        };
        match decode_path(root, &path) {
            Ok(raw) => raws.push(raw),
            Err(error) => log::warn!("skipping malformed paper path: {error}"),
        }
    }

    let records = group_records(&raws);
    log::info!(
        "indexed {} records from {} files under {}",
        records.len(),
        raws.len(),
        root.display()
    );
    Ok(records)
}

/// Groups raw decoded files by identity prefix.
///
/// Files sharing an identity collapse into one record whose variant slots are
/// normalized by [`VariantSlots::from_variants`]. A prefix that already
/// produced a record is not reprocessed; its later files were captured by the
/// group-matching pass.
pub fn group_records(raws: &[RawPaper]) -> Vec<PaperRecord> {
    let mut records: Vec<PaperRecord> = Vec::new();
    for raw in raws {
        if records.iter().any(|record| record.id == raw.id) {
            continue;
        }
        let variants: Vec<_> = raws
            .iter()
            .filter(|other| other.id == raw.id)
            .map(|other| other.variant)
            .collect();
        records.push(PaperRecord {
            id: raw.id.clone(),
            slots: VariantSlots::from_variants(&variants),
            completed: false,
        });
    }
    records
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use tempfile::tempdir;

    use super::*;
    use crate::types::{PaperId, Series, Variant};

    fn raw(subject: &str, paper_number: &str, variant: Variant) -> RawPaper {
        RawPaper {
            id: PaperId::new(subject, "2022", Series::MayJun, paper_number),
            variant,
        }
    }

    #[test]
    fn groups_qp_and_ms_into_one_record() {
        let records = group_records(&[raw("0620", "21", Variant::Qp), raw("0620", "21", Variant::Ms)]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slots.as_strs(), ["qp", "ms", ""]);
        assert!(!records[0].completed);
    }

    #[test]
    fn supplementary_file_fills_third_slot() {
        let records = group_records(&[
            raw("0620", "21", Variant::Qp),
            raw("0620", "21", Variant::Ms),
            raw("0620", "21", Variant::Sf),
        ]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slots.as_strs(), ["qp", "ms", "sf"]);
    }

    #[test]
    fn distinct_identities_stay_separate() {
        let records = group_records(&[
            raw("0620", "21", Variant::Qp),
            raw("0625", "21", Variant::Qp),
            raw("0620", "22", Variant::Qp),
        ]);
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn order_follows_first_appearance() {
        let records = group_records(&[
            raw("0625", "22", Variant::Ms),
            raw("0620", "21", Variant::Qp),
            raw("0625", "22", Variant::Qp),
        ]);
        assert_eq!(records[0].id.subject, "0625");
        assert_eq!(records[1].id.subject, "0620");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn ms_only_record_leaves_first_slot_empty() {
        let records = group_records(&[raw("0580", "41", Variant::Ms)]);
        assert_eq!(records[0].slots.as_strs(), ["", "ms", ""]);
    }

    #[test]
    fn scans_filesystem_through_listing_pattern() {
        let dir = tempdir().expect("tempdir");
        let session = dir.path().join("0620/2022_MayJun");
        fs::create_dir_all(&session).expect("mkdir");
        File::create(session.join("qp_21.pdf")).expect("touch");
        File::create(session.join("ms_21.pdf")).expect("touch");
        File::create(session.join("qp_22.pdf")).expect("touch");
        // Does not match the two-character tag shape, must be ignored.
        File::create(session.join("notes.txt")).expect("touch");

        let records = index_records(dir.path()).expect("index");
        assert_eq!(records.len(), 2);
        let first = records
            .iter()
            .find(|record| record.id.paper_number == "21")
            .expect("paper 21");
        assert_eq!(first.slots.as_strs(), ["qp", "ms", ""]);
    }

    #[test]
    fn empty_root_yields_no_records() {
        let dir = tempdir().expect("tempdir");
        let records = index_records(dir.path()).expect("index");
        assert!(records.is_empty());
    }
}
