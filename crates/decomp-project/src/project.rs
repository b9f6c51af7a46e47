//! The project: every database plus the root they load from.

use std::path::{Path, PathBuf};

use decomp_model::{Notifier, Observable, RenameLedger, Section, SegmentRef, Session};
use rand::Rng;
use tracing::{info, info_span};

use crate::database::{Database, LoadContext, SaveContext};
use crate::difficulty::DifficultyDatabase;
use crate::error::Result;
use crate::event_objects::EventObjectDatabase;
use crate::items::ItemDatabase;
use crate::layout::ProjectLayout;
use crate::species::SpeciesDatabase;
use crate::substitute;
use crate::trainers::{self, TrainerDatabase};
use crate::wild_encounters::WildEncounterDatabase;

/// Entity count of one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSummary {
    pub name: &'static str,
    pub entities: usize,
}

#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    layout: ProjectLayout,
    session: Session,
    ledger: RenameLedger,
    loaded: bool,
    species: SpeciesDatabase,
    items: ItemDatabase,
    difficulty: DifficultyDatabase,
    event_objects: EventObjectDatabase,
    trainers: TrainerDatabase,
    wild_encounters: WildEncounterDatabase,
    notifier: Notifier,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_layout(root, ProjectLayout::default())
    }

    pub fn with_layout(root: impl Into<PathBuf>, layout: ProjectLayout) -> Self {
        Self {
            root: root.into(),
            layout,
            session: Session::new(),
            ledger: RenameLedger::new(),
            loaded: false,
            species: SpeciesDatabase::new(),
            items: ItemDatabase::new(),
            difficulty: DifficultyDatabase::new(),
            event_objects: EventObjectDatabase::new(),
            trainers: TrainerDatabase::new(),
            wild_encounters: WildEncounterDatabase::new(),
            notifier: Notifier::new(),
        }
    }

    /// Create a project at `root` and load it.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let mut project = Self::new(root);
        project.load()?;
        Ok(project)
    }

    /// Reset every database and load it again from disk.
    ///
    /// Databases load in dependency order. Change notifications raised
    /// during the load are collapsed into one per source, delivered when the
    /// load ends; the project then raises its own "everything changed"
    /// notification. A failed load leaves the databases partially filled and
    /// the project marked as not loaded.
    pub fn load(&mut self) -> Result<()> {
        let span = info_span!("load", root = %self.root.display());
        let _enter = span.enter();

        self.loaded = false;
        let guard = self.session.begin_load();
        let mut ctx = LoadContext::new(&self.root, &self.layout);
        let databases: [&mut dyn Database; 6] = [
            &mut self.species,
            &mut self.items,
            &mut self.difficulty,
            &mut self.event_objects,
            &mut self.trainers,
            &mut self.wild_encounters,
        ];
        for database in databases {
            database.reset();
            database.attach(&self.session);
            database.load(&mut ctx)?;
            info!(
                database = database.name(),
                entities = database.entity_count(),
                "loaded database"
            );
        }
        self.ledger.clear();
        guard.finish();

        self.loaded = true;
        self.notifier.raise_all();
        Ok(())
    }

    /// Apply pending renames to the source tree, then write every database.
    pub fn save(&mut self) -> Result<()> {
        let span = info_span!("save", root = %self.root.display());
        let _enter = span.enter();

        let rewritten = substitute::apply_renames(&self.root, &self.layout, &self.ledger)?;
        if !self.ledger.is_empty() {
            info!(
                renames = self.ledger.len(),
                files = rewritten,
                "applied pending renames"
            );
        }

        let ctx = SaveContext {
            root: &self.root,
            layout: &self.layout,
        };
        let databases: [&mut dyn Database; 6] = [
            &mut self.species,
            &mut self.items,
            &mut self.difficulty,
            &mut self.event_objects,
            &mut self.trainers,
            &mut self.wild_encounters,
        ];
        for database in databases {
            database.save(&ctx)?;
            info!(
                database = database.name(),
                entities = database.entity_count(),
                "saved database"
            );
        }
        self.ledger.clear();
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Renames waiting to be applied to the source tree on save.
    pub fn pending_renames(&self) -> &RenameLedger {
        &self.ledger
    }

    pub fn species(&self) -> &SpeciesDatabase {
        &self.species
    }

    pub fn items(&self) -> &ItemDatabase {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut ItemDatabase {
        &mut self.items
    }

    pub fn difficulty(&self) -> &DifficultyDatabase {
        &self.difficulty
    }

    pub fn difficulty_mut(&mut self) -> &mut DifficultyDatabase {
        &mut self.difficulty
    }

    pub fn event_objects(&self) -> &EventObjectDatabase {
        &self.event_objects
    }

    pub fn event_objects_mut(&mut self) -> &mut EventObjectDatabase {
        &mut self.event_objects
    }

    pub fn trainers(&self) -> &TrainerDatabase {
        &self.trainers
    }

    pub fn trainers_mut(&mut self) -> &mut TrainerDatabase {
        &mut self.trainers
    }

    pub fn wild_encounters(&self) -> &WildEncounterDatabase {
        &self.wild_encounters
    }

    pub fn wild_encounters_mut(&mut self) -> &mut WildEncounterDatabase {
        &mut self.wild_encounters
    }

    /// Rename an event object; its generated symbol is replaced across the
    /// source tree on the next save.
    pub fn rename_event_object(&mut self, from: &str, to: &str) -> Result<bool> {
        self.event_objects.rename_object(from, to, &mut self.ledger)
    }

    /// Move an event object picture; references to its `.4bpp` artifact are
    /// replaced across the source tree on the next save.
    pub fn set_event_object_pic_path(&mut self, identifier: &str, path: &str) -> Result<bool> {
        self.event_objects
            .set_pic_path(identifier, path, &mut self.ledger)
    }

    /// Regenerate a trainer's party levels within `section` of `segment`.
    pub fn generate_trainer_levels(
        &mut self,
        trainer: &str,
        segment: SegmentRef,
        section: Section,
        rng: &mut impl Rng,
    ) -> Result<()> {
        let target = self
            .trainers
            .trainer_mut(trainer)
            .ok_or_else(|| trainers::unknown_trainer(trainer))?;
        self.difficulty
            .generate_levels(segment, target, section, rng)
    }

    pub fn summary(&self) -> Vec<DatabaseSummary> {
        let databases: [&dyn Database; 6] = [
            &self.species,
            &self.items,
            &self.difficulty,
            &self.event_objects,
            &self.trainers,
            &self.wild_encounters,
        ];
        databases
            .into_iter()
            .map(|database| DatabaseSummary {
                name: database.name(),
                entities: database.entity_count(),
            })
            .collect()
    }
}

impl Observable for Project {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}
