//! Synchronization between the in-memory model and a decompilation project
//! tree.
//!
//! A [`Project`] loads every database in dependency order (species, items,
//! difficulty, event objects, trainers, wild encounters), resolving the
//! identifier strings stored on disk against the databases loaded before
//! it. Saving writes each database back in its compact JSON shape, patches
//! the sprite sheet rules in place, and applies pending token renames to the
//! source tree.

pub mod database;
pub mod difficulty;
pub mod error;
pub mod event_objects;
pub mod io;
pub mod items;
pub mod layout;
pub mod project;
pub mod resolve;
pub mod scanner;
pub mod species;
pub mod substitute;
pub mod trainers;
pub mod wild_encounters;

pub use database::{Database, LoadContext, SaveContext};
pub use difficulty::DifficultyDatabase;
pub use error::{ProjectError, Result};
pub use event_objects::EventObjectDatabase;
pub use items::ItemDatabase;
pub use layout::{PROJECT_ENV_VAR, ProjectLayout, resolve_root};
pub use project::{DatabaseSummary, Project};
pub use resolve::RefTable;
pub use species::SpeciesDatabase;
pub use trainers::TrainerDatabase;
pub use wild_encounters::WildEncounterDatabase;
