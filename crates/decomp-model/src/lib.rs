//! In-memory model of decompilation project data.
//!
//! Entities raise property-level change notifications through a
//! [`Notifier`]; owned collections are [`Seq`] or [`SortedSeq`] and report
//! structural changes. A [`Session`] suppresses notifications during a bulk
//! load and replaces them with one "everything changed" notification per
//! notifier and collection when the load ends.

pub mod difficulty;
pub mod error;
pub mod event_object;
pub mod item;
pub mod observable;
pub mod rename;
pub mod seq;
pub mod session;
pub mod sorted;
pub mod species;
pub mod trainer;
pub mod wild_encounter;

pub use difficulty::{DifficultyGameSegment, Section, SegmentRef};
pub use error::{ModelError, Result};
pub use event_object::{
    EventObject, EventObjectAnimTable, EventObjectPic, Frame, PicId, PicTable, gfx_constant,
};
pub use item::{Item, ItemValue, item_key};
pub use observable::{
    ALL_PROPERTIES, Notifier, Observable, ObservableCollection, PropertyChanged, Subscription,
    Tracked, TrackedItems, set, set_and_track, set_and_track_items,
};
pub use rename::{RenameLedger, TokenReplacement, pascal_to_sentence, pascal_to_snake};
pub use seq::{ChangeAction, CollectionChanged, Identified, Seq};
pub use session::{LoadGuard, Session};
pub use sorted::{Order, SortedSeq, nulls_last};
pub use species::PokemonSpecies;
pub use trainer::{MAX_PARTY_SIZE, Party, PartyPokemon, Trainer, TrainerClass, TrainerPic};
pub use wild_encounter::{
    RateTotals, WildEncounterHabitat, WildEncounterMap, WildEncounterOccurrence,
    WildEncounterPokemon, compare_occurrences, compare_pokemon,
};
