//! Core record types for the paper shelf.
//!
//! A logical record is named by its identity prefix (subject, year, series,
//! paper number) and carries three fixed variant slots plus a user-maintained
//! completion flag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PapersError;

/// Known subjects, readable name paired with syllabus code.
pub const SUBJECTS: &[(&str, &str)] = &[
    ("Chemistry", "0620"),
    ("Physics", "0625"),
    ("ICT", "0417"),
    ("Business Studies", "0450"),
    ("English", "0500"),
    ("Hindi", "0549"),
    ("Mathematics", "0580"),
    ("Environmental Management", "0680"),
];

/// ICT syllabus code. Supplementary files for this subject are zip archives.
pub const ICT_SUBJECT: &str = "0417";
/// Hindi syllabus code. Supplementary files for this subject are mp3 audio.
pub const HINDI_SUBJECT: &str = "0549";
/// English syllabus code. Every paper ships with an insert.
pub const ENGLISH_SUBJECT: &str = "0500";
/// Business Studies syllabus code. Papers numbered 2x ship with an insert.
pub const BUSINESS_SUBJECT: &str = "0450";

/// Returns the readable name for a subject code, if known.
pub fn subject_name(code: &str) -> Option<&'static str> {
    SUBJECTS
        .iter()
        .find(|(_, subject_code)| *subject_code == code)
        .map(|(name, _)| *name)
}

/// Exam series within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Series {
    FebMar,
    OctNov,
    MayJun,
}

impl Series {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FebMar => "FebMar",
            Self::OctNov => "OctNov",
            Self::MayJun => "MayJun",
        }
    }

    /// The single-letter code used in remote file names.
    pub fn letter(self) -> char {
        match self {
            Self::FebMar => 'm',
            Self::OctNov => 'w',
            Self::MayJun => 's',
        }
    }
}

impl FromStr for Series {
    type Err = PapersError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "FebMar" => Ok(Self::FebMar),
            "OctNov" => Ok(Self::OctNov),
            "MayJun" => Ok(Self::MayJun),
            other => Err(PapersError::UnknownSeries(other.to_string())),
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File variant within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Question paper.
    Qp,
    /// Marking scheme.
    Ms,
    /// Supplementary file (listening audio, source files).
    Sf,
    /// Insert.
    In,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qp => "qp",
            Self::Ms => "ms",
            Self::Sf => "sf",
            Self::In => "in",
        }
    }
}

impl FromStr for Variant {
    type Err = PapersError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "qp" => Ok(Self::Qp),
            "ms" => Ok(Self::Ms),
            "sf" => Ok(Self::Sf),
            "in" => Ok(Self::In),
            other => Err(PapersError::UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity prefix uniquely naming a logical record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaperId {
    /// Syllabus code, e.g. "0620".
    pub subject: String,
    /// Four-digit year, e.g. "2022".
    pub year: String,
    pub series: Series,
    /// Two-character paper number, usually numeric, e.g. "21".
    pub paper_number: String,
}

impl PaperId {
    pub fn new(
        subject: impl Into<String>,
        year: impl Into<String>,
        series: Series,
        paper_number: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            year: year.into(),
            series,
            paper_number: paper_number.into(),
        }
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.subject, self.year, self.series, self.paper_number
        )
    }
}

/// The three fixed variant slots of a record.
///
/// Slot 0 holds `qp` or nothing, slot 1 holds `ms` or nothing, slot 2 holds
/// at most one of `sf`/`in`. A record never carries both `sf` and `in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VariantSlots([Option<Variant>; 3]);

impl VariantSlots {
    /// Normalizes an unordered set of raw variants into the fixed slots.
    pub fn from_variants(variants: &[Variant]) -> Self {
        let mut slots = [None; 3];
        if variants.contains(&Variant::Qp) {
            slots[0] = Some(Variant::Qp);
        }
        if variants.contains(&Variant::Ms) {
            slots[1] = Some(Variant::Ms);
        }
        if variants.contains(&Variant::Sf) {
            slots[2] = Some(Variant::Sf);
        } else if variants.contains(&Variant::In) {
            slots[2] = Some(Variant::In);
        }
        Self(slots)
    }

    pub fn contains(&self, variant: Variant) -> bool {
        self.0.contains(&Some(variant))
    }

    /// The slots as display strings, empty string for an empty slot.
    pub fn as_strs(&self) -> [&'static str; 3] {
        self.0.map(|slot| slot.map_or("", Variant::as_str))
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Variant>> + '_ {
        self.0.iter().copied()
    }
}

/// A logical paper record: identity, variant slots, completion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRecord {
    pub id: PaperId,
    pub slots: VariantSlots,
    pub completed: bool,
}

impl PaperRecord {
    /// Membership test across the record's searchable fields: subject code,
    /// year, series and variant slot values.
    pub fn matches_value(&self, value: &str) -> bool {
        self.id.subject == value
            || self.id.year == value
            || self.id.series.as_str() == value
            || (!value.is_empty() && self.slots.as_strs().iter().any(|slot| *slot == value))
    }

    /// The paper number as an integer, `None` when non-numeric.
    pub fn paper_number_value(&self) -> Option<u32> {
        self.id.paper_number.parse().ok()
    }
}

/// Completion aggregate over a filtered record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Aggregate {
    pub total: usize,
    pub completed: usize,
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}
