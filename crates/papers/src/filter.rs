//! Filter engine: incremental multi-dimensional filtering and completion
//! aggregation over the owned record set.
//!
//! The engine is the single owner of the in-memory records. The display layer
//! only observes snapshots returned by [`FilterEngine::compute_filtered`] and
//! drives mutation through [`FilterEngine::toggle_completion`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::codec::encode_path;
use crate::error::{PapersError, Result};
use crate::indexer::index_records;
use crate::status::{reconcile, StatusStore};
use crate::types::{Aggregate, PaperId, PaperRecord, Variant};

/// A filter dimension. At most one active value per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    Subject,
    Year,
    Series,
    PaperTens,
}

/// An active filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Membership match across a record's searchable fields.
    Text(String),
    /// Matches records whose numeric paper number divided by ten equals this.
    Tens(u32),
}

/// A snapshot of the filtered record set plus its completion aggregate.
#[derive(Debug, Clone)]
pub struct FilteredView {
    pub records: Vec<PaperRecord>,
    pub aggregate: Aggregate,
}

/// Owns the record set, the active filter criteria and the running aggregate.
#[derive(Debug)]
pub struct FilterEngine {
    root: PathBuf,
    records: Vec<PaperRecord>,
    active: HashMap<FilterDimension, FilterValue>,
    aggregate: Aggregate,
    status: StatusStore,
}

impl FilterEngine {
    /// Builds an engine from already reconciled records.
    pub fn new(root: PathBuf, records: Vec<PaperRecord>, status: StatusStore) -> Self {
        let aggregate = aggregate_over(records.iter());
        Self {
            root,
            records,
            active: HashMap::new(),
            aggregate,
            status,
        }
    }

    /// Indexes `root`, reconciles persisted completion and builds the engine.
    ///
    /// This is the startup control flow: indexer, then status reconcile, then
    /// the engine owns all subsequent traffic.
    pub fn load(root: PathBuf, status_path: PathBuf) -> Result<Self> {
        let mut records = index_records(&root)?;
        let status = StatusStore::new(status_path);
        let persisted = status.load()?;
        reconcile(&mut records, &persisted);
        Ok(Self::new(root, records, status))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The full record set, unfiltered.
    pub fn records(&self) -> &[PaperRecord] {
        &self.records
    }

    /// The running aggregate over the current filtered set.
    pub fn aggregate(&self) -> Aggregate {
        self.aggregate
    }

    /// Sets or replaces the active value for a dimension. `None` is the blank
    /// sentinel and clears the dimension.
    pub fn set_filter(&mut self, dimension: FilterDimension, value: Option<FilterValue>) {
        match value {
            Some(value) => {
                self.active.insert(dimension, value);
            }
            None => {
                self.active.remove(&dimension);
            }
        }
    }

    /// Computes the filtered snapshot and refreshes the running aggregate.
    /// All active dimensions combine by logical AND.
    pub fn compute_filtered(&mut self) -> FilteredView {
        let records: Vec<PaperRecord> = self
            .records
            .iter()
            .filter(|record| self.matches_filters(record))
            .cloned()
            .collect();
        self.aggregate = aggregate_over(records.iter());
        FilteredView {
            aggregate: self.aggregate,
            records,
        }
    }

    /// Flips the completion flag of the record with `id` and rewrites the
    /// whole persisted store. Returns the new flag value.
    ///
    /// The running aggregate is adjusted by one without recomputing the
    /// filtered set; a record currently excluded by the active filters leaves
    /// the visible aggregate untouched. A failed write leaves the in-memory
    /// flag unchanged and propagates the error.
    pub fn toggle_completion(&mut self, id: &PaperId) -> Result<bool> {
        let position = self
            .records
            .iter()
            .position(|record| record.id == *id)
            .ok_or_else(|| PapersError::UnknownRecord(id.to_string()))?;

        self.records[position].completed = !self.records[position].completed;
        if let Err(error) = self.status.save(&self.records) {
            self.records[position].completed = !self.records[position].completed;
            return Err(error);
        }

        let record = &self.records[position];
        if self.matches_filters(record) {
            if record.completed {
                self.aggregate.completed += 1;
            } else {
                self.aggregate.completed = self.aggregate.completed.saturating_sub(1);
            }
        }
        log::debug!("toggled {} -> {}", record.id, record.completed);
        Ok(record.completed)
    }

    /// Resolves the on-disk path for one of a record's variant files.
    pub fn resolve_open_path(&self, id: &PaperId, variant: Variant) -> Result<PathBuf> {
        let record = self
            .records
            .iter()
            .find(|record| record.id == *id)
            .ok_or_else(|| PapersError::UnknownRecord(id.to_string()))?;
        if !record.slots.contains(variant) {
            return Err(PapersError::MissingVariant {
                id: id.to_string(),
                variant: variant.to_string(),
            });
        }
        Ok(encode_path(&self.root, id, variant))
    }

    fn matches_filters(&self, record: &PaperRecord) -> bool {
        self.active.values().all(|value| match value {
            FilterValue::Tens(tens) => record
                .paper_number_value()
                .is_some_and(|number| number / 10 == *tens),
            FilterValue::Text(text) => record.matches_value(text),
        })
    }
}

fn aggregate_over<'a>(records: impl Iterator<Item = &'a PaperRecord>) -> Aggregate {
    let mut aggregate = Aggregate::default();
    for record in records {
        aggregate.total += 1;
        if record.completed {
            aggregate.completed += 1;
        }
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::status::StatusStore;
    use crate::types::{Series, VariantSlots};

    fn record(subject: &str, year: &str, paper_number: &str) -> PaperRecord {
        PaperRecord {
            id: PaperId::new(subject, year, Series::MayJun, paper_number),
            slots: VariantSlots::from_variants(&[Variant::Qp, Variant::Ms]),
            completed: false,
        }
    }

    fn engine_with(records: Vec<PaperRecord>) -> (FilterEngine, tempfile::TempDir) {
        let dir = tempdir().expect("tempdir");
        let status = StatusStore::new(dir.path().join("data.json"));
        let engine = FilterEngine::new(dir.path().join("Papers"), records, status);
        (engine, dir)
    }

    fn subjects_of(view: &FilteredView) -> Vec<&str> {
        view.records
            .iter()
            .map(|record| record.id.subject.as_str())
            .collect()
    }

    #[test]
    fn active_dimensions_combine_by_and() {
        let (mut engine, _dir) = engine_with(vec![
            record("0620", "2021", "21"),
            record("0620", "2022", "21"),
            record("0625", "2021", "21"),
            record("0625", "2022", "21"),
        ]);

        engine.set_filter(
            FilterDimension::Subject,
            Some(FilterValue::Text("0620".into())),
        );
        engine.set_filter(FilterDimension::Year, Some(FilterValue::Text("2022".into())));
        let view = engine.compute_filtered();
        assert_eq!(subjects_of(&view), ["0620"]);
        assert_eq!(view.records[0].id.year, "2022");
    }

    #[test]
    fn clearing_a_dimension_restores_its_records() {
        let (mut engine, _dir) = engine_with(vec![
            record("0620", "2021", "21"),
            record("0620", "2022", "21"),
            record("0625", "2022", "21"),
        ]);

        engine.set_filter(
            FilterDimension::Subject,
            Some(FilterValue::Text("0620".into())),
        );
        engine.set_filter(FilterDimension::Year, Some(FilterValue::Text("2022".into())));
        assert_eq!(engine.compute_filtered().records.len(), 1);

        engine.set_filter(FilterDimension::Subject, None);
        let view = engine.compute_filtered();
        assert_eq!(subjects_of(&view), ["0620", "0625"]);
    }

    #[test]
    fn replacing_a_dimension_value_never_accumulates() {
        let (mut engine, _dir) = engine_with(vec![
            record("0620", "2022", "21"),
            record("0625", "2022", "21"),
        ]);

        engine.set_filter(
            FilterDimension::Subject,
            Some(FilterValue::Text("0620".into())),
        );
        engine.set_filter(
            FilterDimension::Subject,
            Some(FilterValue::Text("0625".into())),
        );
        let view = engine.compute_filtered();
        assert_eq!(subjects_of(&view), ["0625"]);
    }

    #[test]
    fn paper_tens_uses_integer_division() {
        let (mut engine, _dir) = engine_with(vec![
            record("0620", "2022", "21"),
            record("0620", "2022", "23"),
            record("0620", "2022", "05"),
            record("0620", "2022", "ab"),
        ]);

        engine.set_filter(FilterDimension::PaperTens, Some(FilterValue::Tens(2)));
        let view = engine.compute_filtered();
        let numbers: Vec<&str> = view
            .records
            .iter()
            .map(|record| record.id.paper_number.as_str())
            .collect();
        assert_eq!(numbers, ["21", "23"]);

        engine.set_filter(FilterDimension::PaperTens, Some(FilterValue::Tens(0)));
        let view = engine.compute_filtered();
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.records[0].id.paper_number, "05");
    }

    #[test]
    fn non_numeric_paper_number_never_matches_tens() {
        let (mut engine, _dir) = engine_with(vec![record("0620", "2022", "ab")]);
        for tens in 0..7 {
            engine.set_filter(FilterDimension::PaperTens, Some(FilterValue::Tens(tens)));
            assert!(engine.compute_filtered().records.is_empty());
        }
        engine.set_filter(FilterDimension::PaperTens, None);
        assert_eq!(engine.compute_filtered().records.len(), 1);
    }

    #[test]
    fn toggle_updates_aggregate_incrementally() {
        let (mut engine, _dir) = engine_with(vec![
            record("0620", "2022", "21"),
            record("0620", "2022", "22"),
        ]);
        let view = engine.compute_filtered();
        assert_eq!(view.aggregate, Aggregate { total: 2, completed: 0 });

        let id = view.records[0].id.clone();
        assert!(engine.toggle_completion(&id).expect("toggle"));
        assert_eq!(engine.aggregate(), Aggregate { total: 2, completed: 1 });

        assert!(!engine.toggle_completion(&id).expect("toggle"));
        assert_eq!(engine.aggregate(), Aggregate { total: 2, completed: 0 });
    }

    #[test]
    fn toggling_a_filtered_out_record_leaves_aggregate_alone() {
        let (mut engine, _dir) = engine_with(vec![
            record("0620", "2022", "21"),
            record("0625", "2022", "21"),
        ]);
        engine.set_filter(
            FilterDimension::Subject,
            Some(FilterValue::Text("0620".into())),
        );
        let view = engine.compute_filtered();
        assert_eq!(view.aggregate, Aggregate { total: 1, completed: 0 });

        let hidden = PaperId::new("0625", "2022", Series::MayJun, "21");
        assert!(engine.toggle_completion(&hidden).expect("toggle"));
        assert_eq!(engine.aggregate(), Aggregate { total: 1, completed: 0 });
        // The flag itself still flips on the record.
        assert!(engine
            .records()
            .iter()
            .find(|record| record.id == hidden)
            .expect("record")
            .completed);
    }

    #[test]
    fn toggle_persists_the_whole_record_set() {
        let dir = tempdir().expect("tempdir");
        let status = StatusStore::new(dir.path().join("data.json"));
        let mut engine = FilterEngine::new(
            dir.path().join("Papers"),
            vec![record("0620", "2022", "21"), record("0625", "2022", "22")],
            status.clone(),
        );

        let id = PaperId::new("0620", "2022", Series::MayJun, "21");
        engine.toggle_completion(&id).expect("toggle");

        let persisted = status.load().expect("load");
        assert_eq!(persisted.len(), 2);
        assert!(persisted[0].completed);
        assert!(!persisted[1].completed);
    }

    #[test]
    fn toggle_write_failure_leaves_flag_unchanged() {
        let dir = tempdir().expect("tempdir");
        let status = StatusStore::new(dir.path().join("missing-dir/data.json"));
        let mut engine = FilterEngine::new(
            dir.path().join("Papers"),
            vec![record("0620", "2022", "21")],
            status,
        );

        let id = PaperId::new("0620", "2022", Series::MayJun, "21");
        let err = engine.toggle_completion(&id).expect_err("toggle");
        assert!(matches!(err, PapersError::StatusWrite { .. }));
        assert!(!engine.records()[0].completed);
    }

    #[test]
    fn toggle_unknown_identity_is_an_error() {
        let (mut engine, _dir) = engine_with(vec![record("0620", "2022", "21")]);
        let unknown = PaperId::new("0680", "2020", Series::FebMar, "11");
        assert!(matches!(
            engine.toggle_completion(&unknown),
            Err(PapersError::UnknownRecord(_))
        ));
    }

    #[test]
    fn resolve_open_path_uses_the_codec() {
        let (engine, _dir) = engine_with(vec![record("0620", "2022", "21")]);
        let id = PaperId::new("0620", "2022", Series::MayJun, "21");
        let path = engine.resolve_open_path(&id, Variant::Qp).expect("resolve");
        assert!(path.ends_with("Papers/0620/2022_MayJun/qp_21.pdf"));
    }

    #[test]
    fn resolve_open_path_requires_the_variant() {
        let (engine, _dir) = engine_with(vec![record("0620", "2022", "21")]);
        let id = PaperId::new("0620", "2022", Series::MayJun, "21");
        assert!(matches!(
            engine.resolve_open_path(&id, Variant::Sf),
            Err(PapersError::MissingVariant { .. })
        ));
    }

    #[test]
    fn load_indexes_and_reconciles_from_disk() {
        let dir = tempdir().expect("tempdir");
        let root = dir.path().join("Papers");
        let session = root.join("0620/2022_MayJun");
        std::fs::create_dir_all(&session).expect("mkdir");
        std::fs::File::create(session.join("qp_21.pdf")).expect("touch");
        std::fs::File::create(session.join("ms_21.pdf")).expect("touch");
        std::fs::File::create(session.join("qp_22.pdf")).expect("touch");

        let status_path = dir.path().join("data.json");
        let status = StatusStore::new(status_path.clone());
        status
            .save(&[PaperRecord {
                id: PaperId::new("0620", "2022", Series::MayJun, "21"),
                slots: VariantSlots::default(),
                completed: true,
            }])
            .expect("seed status");

        let mut engine = FilterEngine::load(root, status_path).expect("load");
        let view = engine.compute_filtered();
        assert_eq!(view.aggregate, Aggregate { total: 2, completed: 1 });
        let reconciled = view
            .records
            .iter()
            .find(|record| record.id.paper_number == "21")
            .expect("paper 21");
        assert!(reconciled.completed);
        assert_eq!(reconciled.slots.as_strs(), ["qp", "ms", ""]);
    }

    #[test]
    fn series_filter_matches_series_field() {
        let (mut engine, _dir) = engine_with(vec![record("0620", "2022", "21")]);
        engine.set_filter(
            FilterDimension::Series,
            Some(FilterValue::Text("MayJun".into())),
        );
        assert_eq!(engine.compute_filtered().records.len(), 1);
        engine.set_filter(
            FilterDimension::Series,
            Some(FilterValue::Text("OctNov".into())),
        );
        assert!(engine.compute_filtered().records.is_empty());
    }
}
