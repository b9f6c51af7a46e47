//! Trainers, their classes, pictures and parties.

use std::rc::Rc;

use crate::error::{ModelError, Result};
use crate::observable::{
    Notifier, Observable, Tracked, TrackedItems, copy_props, set, set_and_track, str_props,
};
use crate::seq::Seq;
use crate::session::Session;
use crate::species::PokemonSpecies;

/// Largest party a trainer may field.
pub const MAX_PARTY_SIZE: usize = 6;

/// Level given to members added with [`Party::add_default`].
pub const DEFAULT_MEMBER_LEVEL: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainerClass {
    identifier: String,
    name: String,
    money_factor: u32,
    ivs: u32,
    pokeball: Option<String>,
    notifier: Notifier,
}

impl TrainerClass {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    str_props! {
        name => set_name;
    }

    copy_props! {
        money_factor: u32 => set_money_factor;
        ivs: u32 => set_ivs;
    }

    /// Item key of the ball the class throws, if it overrides the default.
    pub fn pokeball(&self) -> Option<&str> {
        self.pokeball.as_deref()
    }

    pub fn set_pokeball(&mut self, value: Option<String>) -> bool {
        set(&self.notifier, &mut self.pokeball, value, "pokeball")
    }
}

impl Observable for TrainerClass {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

/// A trainer front picture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainerPic {
    identifier: String,
    path: String,
    notifier: Notifier,
}

impl TrainerPic {
    pub fn new(identifier: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            path: path.into(),
            notifier: Notifier::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    str_props! {
        path => set_path;
    }
}

impl Observable for TrainerPic {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

/// One member of a trainer's party.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyPokemon {
    species: Rc<PokemonSpecies>,
    level: u32,
    iv: u32,
    held_item: Option<String>,
    moves: Vec<String>,
    notifier: Notifier,
}

impl PartyPokemon {
    pub fn new(species: Rc<PokemonSpecies>, level: u32) -> Self {
        Self {
            species,
            level,
            iv: 0,
            held_item: None,
            moves: Vec::new(),
            notifier: Notifier::new(),
        }
    }

    copy_props! {
        level: u32 => set_level;
        iv: u32 => set_iv;
    }

    pub fn species(&self) -> &Rc<PokemonSpecies> {
        &self.species
    }

    pub fn set_species(&mut self, value: Rc<PokemonSpecies>) -> bool {
        set(&self.notifier, &mut self.species, value, "species")
    }

    /// Item key of the held item.
    pub fn held_item(&self) -> Option<&str> {
        self.held_item.as_deref()
    }

    pub fn set_held_item(&mut self, value: Option<String>) -> bool {
        set(&self.notifier, &mut self.held_item, value, "held_item")
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn set_moves(&mut self, value: Vec<String>) -> bool {
        set(&self.notifier, &mut self.moves, value, "moves")
    }
}

impl Observable for PartyPokemon {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

/// A trainer's party. Holds at most [`MAX_PARTY_SIZE`] members.
#[derive(Debug, PartialEq)]
pub struct Party {
    pokemon: TrackedItems<Seq<PartyPokemon>>,
    notifier: Notifier,
}

impl Party {
    pub fn new() -> Self {
        let notifier = Notifier::new();
        let pokemon = TrackedItems::bind(&notifier, Seq::new(), "pokemon");
        Self { pokemon, notifier }
    }

    pub fn pokemon(&self) -> &Seq<PartyPokemon> {
        &self.pokemon
    }

    pub fn len(&self) -> usize {
        self.pokemon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pokemon.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pokemon.len() >= MAX_PARTY_SIZE
    }

    pub fn add(&mut self, member: PartyPokemon) -> Result<usize> {
        if self.is_full() {
            return Err(ModelError::PartyFull {
                capacity: MAX_PARTY_SIZE,
            });
        }
        self.pokemon.get_mut().push(member);
        Ok(self.pokemon.len() - 1)
    }

    /// Append a member of `species` at the default level.
    pub fn add_default(&mut self, species: Rc<PokemonSpecies>) -> Result<usize> {
        self.add(PartyPokemon::new(species, DEFAULT_MEMBER_LEVEL))
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> PartyPokemon {
        self.pokemon.get_mut().remove_at(index)
    }

    pub fn member_mut(&mut self, index: usize) -> Option<&mut PartyPokemon> {
        self.pokemon.get_mut().get_mut(index)
    }

    pub fn set_level(&mut self, index: usize, level: u32) -> bool {
        self.member_mut(index)
            .is_some_and(|member| member.set_level(level))
    }

    /// Duplicate into an independent party with fresh notifiers.
    pub fn duplicate(&self) -> Self {
        let mut copy = Self::new();
        for member in self.pokemon.iter() {
            copy.pokemon.get_mut().push(member.clone());
        }
        copy
    }
}

impl Default for Party {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for Party {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
        self.pokemon.attach(session);
    }
}

#[derive(Debug, PartialEq)]
pub struct Trainer {
    identifier: String,
    name: String,
    class: String,
    pic: String,
    is_female: bool,
    encounter_music: String,
    ai_scripts: Vec<String>,
    items: Vec<String>,
    double_battle: bool,
    party: Tracked<Party>,
    notifier: Notifier,
}

impl Trainer {
    /// A trainer referring to `class` and `pic` by identifier.
    pub fn new(
        identifier: impl Into<String>,
        class: impl Into<String>,
        pic: impl Into<String>,
    ) -> Self {
        let notifier = Notifier::new();
        let party = Tracked::bind(&notifier, Party::new(), "party");
        Self {
            identifier: identifier.into(),
            name: String::new(),
            class: class.into(),
            pic: pic.into(),
            is_female: false,
            encounter_music: String::new(),
            ai_scripts: Vec::new(),
            items: Vec::new(),
            double_battle: false,
            party,
            notifier,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    str_props! {
        name => set_name;
        class => set_class;
        pic => set_pic;
        encounter_music => set_encounter_music;
    }

    copy_props! {
        is_female: bool => set_is_female;
        double_battle: bool => set_double_battle;
    }

    pub fn ai_scripts(&self) -> &[String] {
        &self.ai_scripts
    }

    pub fn set_ai_scripts(&mut self, value: Vec<String>) -> bool {
        set(&self.notifier, &mut self.ai_scripts, value, "ai_scripts")
    }

    /// Item keys the trainer may use in battle.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn set_items(&mut self, value: Vec<String>) -> bool {
        set(&self.notifier, &mut self.items, value, "items")
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn party_mut(&mut self) -> &mut Party {
        self.party.get_mut()
    }

    pub fn set_party(&mut self, value: Party) -> bool {
        set_and_track(&self.notifier, &mut self.party, value, "party")
    }
}

impl Observable for Trainer {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
        self.party.attach(session);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::observable::ObservableCollection;

    fn species(id: &str) -> Rc<PokemonSpecies> {
        Rc::new(PokemonSpecies::new(id, id))
    }

    #[test]
    fn party_is_capped() {
        let mut party = Party::new();
        for _ in 0..MAX_PARTY_SIZE {
            party.add_default(species("SPECIES_ZIGZAGOON")).expect("room in party");
        }
        assert_eq!(
            party.add_default(species("SPECIES_ZIGZAGOON")),
            Err(ModelError::PartyFull { capacity: 6 })
        );
        assert_eq!(party.pokemon()[0].level(), DEFAULT_MEMBER_LEVEL);
    }

    #[test]
    fn member_changes_surface_as_party_change_on_trainer() {
        let mut trainer = Trainer::new("TRAINER_ROXANNE_1", "TRAINER_CLASS_LEADER", "TRAINER_PIC_LEADER_ROXANNE");
        trainer.party_mut().add_default(species("SPECIES_GEODUDE")).expect("room in party");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = trainer.notifier().subscribe(move |change| sink.borrow_mut().push(change.name));

        trainer.party_mut().set_level(0, 12);
        trainer.set_is_female(true);

        assert_eq!(*seen.borrow(), vec!["party", "is_female"]);
    }

    #[test]
    fn duplicate_party_has_independent_members() {
        let mut party = Party::new();
        party.add_default(species("SPECIES_NOSEPASS")).expect("room in party");
        let copy = party.duplicate();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let _sub = copy.pokemon().watch_items(move |_| *counter.borrow_mut() += 1);

        party.set_level(0, 40);
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(copy.pokemon()[0].level(), DEFAULT_MEMBER_LEVEL);
    }
}
