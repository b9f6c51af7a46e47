//! Game segments and level generation.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::{ModelError, Result};
use crate::observable::{Notifier, Observable, copy_props, str_props};
use crate::trainer::Trainer;

/// A stretch of the game bounded by a completion flag, with the level span
/// trainers in it should fall into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DifficultyGameSegment {
    completion_flag: String,
    minimum_level: u32,
    maximum_level: u32,
    notifier: Notifier,
}

impl DifficultyGameSegment {
    pub fn new(completion_flag: impl Into<String>, minimum_level: u32, maximum_level: u32) -> Self {
        Self {
            completion_flag: completion_flag.into(),
            minimum_level,
            maximum_level,
            notifier: Notifier::new(),
        }
    }

    str_props! {
        completion_flag => set_completion_flag;
    }

    copy_props! {
        minimum_level: u32 => set_minimum_level;
        maximum_level: u32 => set_maximum_level;
    }

    /// Half-open level range `[start, end)` covered by `section`.
    ///
    /// The span is split into thirds, rounding the width of a third up.
    pub fn section_range(&self, section: Section) -> (u32, u32) {
        let full = self.maximum_level.saturating_sub(self.minimum_level);
        let third = full.div_ceil(3);
        let start = self.minimum_level + section.index() as u32 * third;
        (start, start + third)
    }

    /// Assign every party member of `trainer` a level drawn uniformly from
    /// `section` of this segment.
    pub fn generate_levels(&self, trainer: &mut Trainer, section: Section, rng: &mut impl Rng) {
        let (start, end) = self.section_range(section);
        let party = trainer.party_mut();
        for index in 0..party.len() {
            let level = if start < end {
                rng.gen_range(start..end)
            } else {
                start
            };
            party.set_level(index, level);
        }
    }
}

impl fmt::Display for DifficultyGameSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.minimum_level, self.maximum_level)
    }
}

impl Observable for DifficultyGameSegment {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

/// Thirds of a game segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Early,
    Middle,
    Late,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Early, Section::Middle, Section::Late];

    pub fn index(self) -> usize {
        match self {
            Section::Early => 0,
            Section::Middle => 1,
            Section::Late => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Early => "early",
            Section::Middle => "middle",
            Section::Late => "late",
        }
    }
}

impl FromStr for Section {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "early" => Ok(Section::Early),
            "middle" => Ok(Section::Middle),
            "late" => Ok(Section::Late),
            _ => Err(ModelError::InvalidSection(value.to_string())),
        }
    }
}

impl TryFrom<usize> for Section {
    type Error = ModelError;

    fn try_from(index: usize) -> Result<Self> {
        Section::ALL
            .get(index)
            .copied()
            .ok_or(ModelError::SectionOutOfRange(index))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a game segment by position, or the unknown segment that
/// could be anywhere in the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SegmentRef {
    #[default]
    Unknown,
    Known(usize),
}

impl SegmentRef {
    pub fn is_known(self) -> bool {
        matches!(self, SegmentRef::Known(_))
    }

    pub fn index(self) -> Option<usize> {
        match self {
            SegmentRef::Known(index) => Some(index),
            SegmentRef::Unknown => None,
        }
    }

    /// Render against the segment list: `[min, max]`, or `???` when unknown.
    pub fn describe(self, segments: &[DifficultyGameSegment]) -> String {
        match self.index().and_then(|index| segments.get(index)) {
            Some(segment) => segment.to_string(),
            None => "???".to_string(),
        }
    }

    /// Regenerate `trainer`'s party levels for `section` of the referenced
    /// segment. Leveling the unknown segment leaves the party untouched.
    pub fn generate_levels(
        self,
        segments: &[DifficultyGameSegment],
        trainer: &mut Trainer,
        section: Section,
        rng: &mut impl Rng,
    ) -> Result<()> {
        let SegmentRef::Known(index) = self else {
            return Ok(());
        };
        let segment = segments.get(index).ok_or(ModelError::UnknownSegment(index))?;
        segment.generate_levels(trainer, section, rng);
        Ok(())
    }
}
