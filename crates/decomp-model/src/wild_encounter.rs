//! Wild encounter tables.
//!
//! A map owns one habitat per known habitat type; a habitat owns the
//! pokemon that can appear there, each with the occurrences (time of day,
//! level band, rate) it appears with. Pokemon are kept ordered by species
//! and occurrences by [`compare_occurrences`].

use std::cmp::Ordering;
use std::rc::Rc;

use crate::observable::{
    Notifier, Observable, TrackedItems, copy_props, set, set_and_track_items, str_props,
};
use crate::seq::Seq;
use crate::session::Session;
use crate::sorted::{SortedSeq, nulls_last};
use crate::species::PokemonSpecies;

pub const TIME_MORNING: &str = "MORNING";
pub const TIME_DAY: &str = "DAY";
pub const TIME_NIGHT: &str = "NIGHT";

fn time_rank(time: &str) -> u8 {
    match time {
        TIME_MORNING => 0,
        TIME_DAY => 1,
        TIME_NIGHT => 2,
        _ => 3,
    }
}

/// One time-of-day / level band / rate tuple for a pokemon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WildEncounterOccurrence {
    time: String,
    mid_level: u32,
    level_range: u32,
    encounter_rate: u32,
    notifier: Notifier,
}

impl WildEncounterOccurrence {
    pub fn new(time: impl Into<String>, mid_level: u32, level_range: u32, encounter_rate: u32) -> Self {
        Self {
            time: time.into(),
            mid_level,
            level_range,
            encounter_rate,
            notifier: Notifier::new(),
        }
    }

    str_props! {
        time => set_time;
    }

    copy_props! {
        mid_level: u32 => set_mid_level;
        level_range: u32 => set_level_range;
        encounter_rate: u32 => set_encounter_rate;
    }

    /// An independent copy with no observers.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }
}

impl Observable for WildEncounterOccurrence {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

/// MORNING, DAY, NIGHT, then any other time; then descending rate,
/// ascending mid level and ascending level range.
pub fn compare_occurrences(a: &WildEncounterOccurrence, b: &WildEncounterOccurrence) -> Ordering {
    time_rank(&a.time)
        .cmp(&time_rank(&b.time))
        .then_with(|| a.time.cmp(&b.time))
        .then_with(|| b.encounter_rate.cmp(&a.encounter_rate))
        .then_with(|| a.mid_level.cmp(&b.mid_level))
        .then_with(|| a.level_range.cmp(&b.level_range))
}

/// A pokemon within a habitat and the occurrences it appears with.
#[derive(Debug, PartialEq)]
pub struct WildEncounterPokemon {
    species: Option<Rc<PokemonSpecies>>,
    occurrences: TrackedItems<SortedSeq<WildEncounterOccurrence>>,
    notifier: Notifier,
}

impl WildEncounterPokemon {
    pub fn new(species: Option<Rc<PokemonSpecies>>) -> Self {
        let notifier = Notifier::new();
        let occurrences = TrackedItems::bind(
            &notifier,
            SortedSeq::new(compare_occurrences),
            "occurrences",
        );
        Self {
            species,
            occurrences,
            notifier,
        }
    }

    pub fn species(&self) -> Option<&Rc<PokemonSpecies>> {
        self.species.as_ref()
    }

    pub fn set_species(&mut self, value: Option<Rc<PokemonSpecies>>) -> bool {
        set(&self.notifier, &mut self.species, value, "species")
    }

    pub fn occurrences(&self) -> &SortedSeq<WildEncounterOccurrence> {
        &self.occurrences
    }

    pub fn occurrences_mut(&mut self) -> &mut SortedSeq<WildEncounterOccurrence> {
        self.occurrences.get_mut()
    }

    pub fn set_occurrences(&mut self, value: SortedSeq<WildEncounterOccurrence>) -> bool {
        set_and_track_items(&self.notifier, &mut self.occurrences, value, "occurrences")
    }

    pub fn has_occurrences(&self) -> bool {
        !self.occurrences.is_empty()
    }

    /// An independent deep copy sharing only the species reference.
    pub fn duplicate(&self) -> Self {
        let mut copy = Self::new(self.species.clone());
        for occurrence in self.occurrences.iter() {
            copy.occurrences.get_mut().add(occurrence.duplicate());
        }
        copy
    }
}

impl Observable for WildEncounterPokemon {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
        self.occurrences.attach(session);
    }
}

/// Species identifier order; entries without a species sort last.
pub fn compare_pokemon(a: &WildEncounterPokemon, b: &WildEncounterPokemon) -> Ordering {
    nulls_last(
        a.species.as_deref().map(PokemonSpecies::identifier),
        b.species.as_deref().map(PokemonSpecies::identifier),
    )
}

/// Summed encounter rates of a habitat's occurrences per time of day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateTotals {
    pub morning: u32,
    pub day: u32,
    pub night: u32,
}

/// One habitat (grass, water, fishing, ...) of a map.
#[derive(Debug, PartialEq)]
pub struct WildEncounterHabitat {
    habitat_type: String,
    encounter_rate: u32,
    pokemon: TrackedItems<SortedSeq<WildEncounterPokemon>>,
    notifier: Notifier,
}

impl WildEncounterHabitat {
    pub fn new(habitat_type: impl Into<String>) -> Self {
        let notifier = Notifier::new();
        let pokemon = TrackedItems::bind(&notifier, SortedSeq::new(compare_pokemon), "pokemon");
        Self {
            habitat_type: habitat_type.into(),
            encounter_rate: 0,
            pokemon,
            notifier,
        }
    }

    str_props! {
        habitat_type => set_habitat_type;
    }

    copy_props! {
        encounter_rate: u32 => set_encounter_rate;
    }

    pub fn pokemon(&self) -> &SortedSeq<WildEncounterPokemon> {
        &self.pokemon
    }

    pub fn pokemon_mut(&mut self) -> &mut SortedSeq<WildEncounterPokemon> {
        self.pokemon.get_mut()
    }

    pub fn set_pokemon(&mut self, value: SortedSeq<WildEncounterPokemon>) -> bool {
        set_and_track_items(&self.notifier, &mut self.pokemon, value, "pokemon")
    }

    /// Whether any pokemon in the habitat has an occurrence.
    pub fn has_encounters(&self) -> bool {
        self.pokemon.iter().any(WildEncounterPokemon::has_occurrences)
    }

    pub fn rate_totals(&self) -> RateTotals {
        let mut totals = RateTotals::default();
        for occurrence in self.pokemon.iter().flat_map(|pokemon| pokemon.occurrences().iter()) {
            let rate = occurrence.encounter_rate();
            match occurrence.time() {
                TIME_MORNING => totals.morning += rate,
                TIME_DAY => totals.day += rate,
                TIME_NIGHT => totals.night += rate,
                _ => {}
            }
        }
        totals
    }
}

impl Observable for WildEncounterHabitat {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
        self.pokemon.attach(session);
    }
}

/// The encounter table of one map.
#[derive(Debug, PartialEq)]
pub struct WildEncounterMap {
    map_name: String,
    map_group: String,
    habitats: TrackedItems<Seq<WildEncounterHabitat>>,
    notifier: Notifier,
}

impl WildEncounterMap {
    pub fn new(map_name: impl Into<String>, map_group: impl Into<String>) -> Self {
        let notifier = Notifier::new();
        let habitats = TrackedItems::bind(&notifier, Seq::new(), "habitats");
        Self {
            map_name: map_name.into(),
            map_group: map_group.into(),
            habitats,
            notifier,
        }
    }

    str_props! {
        map_name => set_map_name;
        map_group => set_map_group;
    }

    pub fn habitats(&self) -> &Seq<WildEncounterHabitat> {
        &self.habitats
    }

    pub fn habitats_mut(&mut self) -> &mut Seq<WildEncounterHabitat> {
        self.habitats.get_mut()
    }

    pub fn set_habitats(&mut self, value: Seq<WildEncounterHabitat>) -> bool {
        set_and_track_items(&self.notifier, &mut self.habitats, value, "habitats")
    }

    pub fn habitat_index(&self, habitat_type: &str) -> Option<usize> {
        self.habitats
            .position(|habitat| habitat.habitat_type() == habitat_type)
    }

    pub fn habitat(&self, habitat_type: &str) -> Option<&WildEncounterHabitat> {
        self.habitat_index(habitat_type)
            .map(|index| &self.habitats[index])
    }

    pub fn has_encounters(&self) -> bool {
        self.habitats.iter().any(WildEncounterHabitat::has_encounters)
    }
}

impl Observable for WildEncounterMap {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
        self.habitats.attach(session);
    }
}
