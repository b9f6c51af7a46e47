//! Game segments used to scale trainer levels.

use decomp_model::{
    DifficultyGameSegment, Notifier, Observable, Section, SegmentRef, Seq, Session, Trainer,
    TrackedItems,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::database::{Database, LoadContext, SaveContext};
use crate::error::Result;
use crate::io;

pub const NAME: &str = "Difficulty Database";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DifficultyFile {
    game_segments: Vec<SegmentRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SegmentRecord {
    completion_flag: String,
    minimum_level: u32,
    maximum_level: u32,
}

#[derive(Debug)]
pub struct DifficultyDatabase {
    game_segments: TrackedItems<Seq<DifficultyGameSegment>>,
    notifier: Notifier,
}

impl DifficultyDatabase {
    pub fn new() -> Self {
        let notifier = Notifier::new();
        let game_segments = TrackedItems::bind(&notifier, Seq::new(), "game_segments");
        Self {
            game_segments,
            notifier,
        }
    }

    pub fn game_segments(&self) -> &Seq<DifficultyGameSegment> {
        &self.game_segments
    }

    pub fn game_segments_mut(&mut self) -> &mut Seq<DifficultyGameSegment> {
        self.game_segments.get_mut()
    }

    /// Reference to the segment at `index`, or the unknown segment.
    pub fn segment_ref(&self, index: Option<usize>) -> SegmentRef {
        match index {
            Some(index) if index < self.game_segments.len() => SegmentRef::Known(index),
            _ => SegmentRef::Unknown,
        }
    }

    pub fn describe(&self, segment: SegmentRef) -> String {
        segment.describe(self.game_segments.as_slice())
    }

    /// Regenerate `trainer`'s party levels within `section` of `segment`.
    pub fn generate_levels(
        &self,
        segment: SegmentRef,
        trainer: &mut Trainer,
        section: Section,
        rng: &mut impl Rng,
    ) -> Result<()> {
        segment.generate_levels(self.game_segments.as_slice(), trainer, section, rng)?;
        Ok(())
    }
}

impl Default for DifficultyDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for DifficultyDatabase {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Database for DifficultyDatabase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn reset(&mut self) {
        self.game_segments.get_mut().clear();
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
        self.game_segments.attach(session);
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<()> {
        let file: DifficultyFile = io::read_json(&ctx.path(&ctx.layout.difficulty))?;
        let segments = self.game_segments.get_mut();
        for record in file.game_segments {
            segments.push(DifficultyGameSegment::new(
                record.completion_flag,
                record.minimum_level,
                record.maximum_level,
            ));
        }
        Ok(())
    }

    fn save(&mut self, ctx: &SaveContext<'_>) -> Result<()> {
        let file = DifficultyFile {
            game_segments: self
                .game_segments
                .iter()
                .map(|segment| SegmentRecord {
                    completion_flag: segment.completion_flag().to_string(),
                    minimum_level: segment.minimum_level(),
                    maximum_level: segment.maximum_level(),
                })
                .collect(),
        };
        io::write_json(&ctx.path(&ctx.layout.difficulty), &file)
    }

    fn entity_count(&self) -> usize {
        self.game_segments.len()
    }
}
