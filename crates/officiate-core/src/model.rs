//! Referee, match and problem records.
//!
//! All records are plain values owned by the caller. [`Match`] enforces
//! `end > start` at construction, including when it is deserialized, so a
//! match with a non-positive duration cannot exist.

#![allow(clippy::module_name_repetitions)]

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{ProblemFileError, ValidationError};

pub type RefereeId = usize;
pub type MatchId = usize;
/// Day index within the scheduling horizon.
pub type Day = u32;
/// Whole hours.
pub type Hours = u32;

// ---------------------------------------------------------------------------
// Certifications
// ---------------------------------------------------------------------------

/// A certification tag from a small enumerated domain (`0..64`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Certification(u8);

impl Certification {
    /// Number of distinct tags a [`CertificationSet`] can hold.
    pub const MAX: u8 = 64;

    /// Create a tag.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CertificationOutOfRange`] when `tag >= 64`.
    pub const fn new(tag: u8) -> Result<Self, ValidationError> {
        if tag >= Self::MAX {
            return Err(ValidationError::CertificationOutOfRange {
                tag,
                max: Self::MAX - 1,
            });
        }
        Ok(Self(tag))
    }

    #[must_use]
    pub const fn tag(self) -> u8 {
        self.0
    }

    const fn bit(self) -> u64 {
        1_u64 << self.0
    }
}

impl TryFrom<u8> for Certification {
    type Error = ValidationError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::new(tag)
    }
}

impl From<Certification> for u8 {
    fn from(cert: Certification) -> Self {
        cert.0
    }
}

impl fmt::Display for Certification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Fixed-width bitset of held certifications.
///
/// Serialized as a sorted list of tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Certification>", into = "Vec<Certification>")]
pub struct CertificationSet(u64);

impl CertificationSet {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn insert(&mut self, cert: Certification) {
        self.0 |= cert.bit();
    }

    #[must_use]
    pub const fn with(mut self, cert: Certification) -> Self {
        self.insert(cert);
        self
    }

    #[must_use]
    pub const fn contains(self, cert: Certification) -> bool {
        self.0 & cert.bit() != 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Held tags in ascending order.
    pub fn iter(self) -> impl Iterator<Item = Certification> {
        (0..Certification::MAX)
            .filter(move |tag| self.0 & (1_u64 << *tag) != 0)
            .map(Certification)
    }
}

impl FromIterator<Certification> for CertificationSet {
    fn from_iter<I: IntoIterator<Item = Certification>>(iter: I) -> Self {
        let mut set = Self::empty();
        for cert in iter {
            set.insert(cert);
        }
        set
    }
}

impl From<Vec<Certification>> for CertificationSet {
    fn from(certs: Vec<Certification>) -> Self {
        certs.into_iter().collect()
    }
}

impl From<CertificationSet> for Vec<Certification> {
    fn from(set: CertificationSet) -> Self {
        set.iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A match that needs an officiating referee for its whole duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatchRecord", into = "MatchRecord")]
pub struct Match {
    id: MatchId,
    day: Day,
    start: u32,
    end: u32,
    certification: Certification,
}

/// Wire shape of a [`Match`]; conversion enforces `end > start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MatchRecord {
    id: MatchId,
    day: Day,
    start: u32,
    end: u32,
    certification: Certification,
}

impl TryFrom<MatchRecord> for Match {
    type Error = ValidationError;

    fn try_from(raw: MatchRecord) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.day, raw.start, raw.end, raw.certification)
    }
}

impl From<Match> for MatchRecord {
    fn from(m: Match) -> Self {
        Self {
            id: m.id,
            day: m.day,
            start: m.start,
            end: m.end,
            certification: m.certification,
        }
    }
}

impl Match {
    /// Create a match occupying `[start, end)` on `day`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeRange`] when `end <= start`.
    pub const fn new(
        id: MatchId,
        day: Day,
        start: u32,
        end: u32,
        certification: Certification,
    ) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange {
                match_id: id,
                start,
                end,
            });
        }
        Ok(Self {
            id,
            day,
            start,
            end,
            certification,
        })
    }

    #[must_use]
    pub const fn id(&self) -> MatchId {
        self.id
    }

    #[must_use]
    pub const fn day(&self) -> Day {
        self.day
    }

    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// `end - start`, always positive.
    #[must_use]
    pub const fn duration(&self) -> Hours {
        self.end - self.start
    }

    #[must_use]
    pub const fn certification(&self) -> Certification {
        self.certification
    }

    /// True when both matches run on the same day and their half-open
    /// intervals intersect.
    ///
    /// The flow network does not consult this; a single referee-day budget
    /// can cover overlapping matches as long as the hours fit.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

/// All pairs of matches that overlap in time on the same day, as
/// `(lower id, higher id)` sorted ascending.
#[must_use]
pub fn overlapping_pairs(matches: &[Match]) -> Vec<(MatchId, MatchId)> {
    let mut order: Vec<&Match> = matches.iter().collect();
    order.sort_by_key(|m| (m.day, m.start, m.id));

    let mut pairs = Vec::new();
    for (i, a) in order.iter().enumerate() {
        for b in &order[i + 1..] {
            if b.day != a.day || b.start >= a.end {
                break;
            }
            pairs.push((a.id.min(b.id), a.id.max(b.id)));
        }
    }
    pairs.sort_unstable();
    pairs
}

// ---------------------------------------------------------------------------
// Referee
// ---------------------------------------------------------------------------

/// Hour budget for one specific day, overriding the referee's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub day: Day,
    pub hours: Hours,
}

/// A referee with held certifications and a daily hour budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referee {
    pub id: RefereeId,
    #[serde(default)]
    pub certifications: CertificationSet,
    pub max_hours_per_day: Hours,
    /// Per-day overrides of `max_hours_per_day`. The last entry for a day
    /// wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability: Vec<DayHours>,
}

impl Referee {
    #[must_use]
    pub const fn new(id: RefereeId, max_hours_per_day: Hours) -> Self {
        Self {
            id,
            certifications: CertificationSet::empty(),
            max_hours_per_day,
            availability: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_certification(mut self, cert: Certification) -> Self {
        self.certifications = self.certifications.with(cert);
        self
    }

    #[must_use]
    pub fn with_day_hours(mut self, day: Day, hours: Hours) -> Self {
        self.availability.push(DayHours { day, hours });
        self
    }

    #[must_use]
    pub const fn holds(&self, cert: Certification) -> bool {
        self.certifications.contains(cert)
    }

    /// Hour budget for `day`, honoring overrides.
    #[must_use]
    pub fn hours_on(&self, day: Day) -> Hours {
        self.availability
            .iter()
            .rev()
            .find(|entry| entry.day == day)
            .map_or(self.max_hours_per_day, |entry| entry.hours)
    }
}

// ---------------------------------------------------------------------------
// Problem
// ---------------------------------------------------------------------------

/// A complete feasibility query: horizon length, referee pool and matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub days: Day,
    #[serde(default)]
    pub referees: Vec<Referee>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl Problem {
    #[must_use]
    pub const fn new(days: Day, referees: Vec<Referee>, matches: Vec<Match>) -> Self {
        Self {
            days,
            referees,
            matches,
        }
    }

    /// Sum of all match durations, or `None` on overflow.
    #[must_use]
    pub fn total_match_hours(&self) -> Option<u64> {
        self.matches
            .iter()
            .try_fold(0_u64, |acc, m| acc.checked_add(u64::from(m.duration())))
    }

    /// Read a problem from a `.json` or `.toml` file.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemFileError::UnsupportedExtension`] before touching the
    /// file, [`ProblemFileError::Read`] if it cannot be read, and
    /// [`ProblemFileError::Parse`] if it fails to parse (including a match
    /// with `end <= start`).
    pub fn load(path: &Path) -> Result<Self, ProblemFileError> {
        let extension = path.extension().and_then(|ext| ext.to_str());
        if !matches!(extension, Some("json" | "toml")) {
            return Err(ProblemFileError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension: extension.unwrap_or("").to_string(),
            });
        }

        let content =
            std::fs::read_to_string(path).map_err(|source| ProblemFileError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let parsed: Result<Self, String> = if extension == Some("json") {
            serde_json::from_str(&content).map_err(|err| err.to_string())
        } else {
            toml::from_str(&content).map_err(|err| err.to_string())
        };
        parsed.map_err(|message| ProblemFileError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Pretty JSON encoding used for problem files.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize problem")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
