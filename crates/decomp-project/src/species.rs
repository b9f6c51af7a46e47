//! Species harvested from the species-name table.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use decomp_model::{Notifier, Observable, PokemonSpecies, Session};

use crate::database::{Database, LoadContext};
use crate::error::Result;
use crate::layout::ProjectLayout;
use crate::scanner;

pub const NAME: &str = "Pokemon Species Database";

/// Species keyed by enum name, in table order.
#[derive(Debug, Default)]
pub struct SpeciesDatabase {
    species: Vec<Rc<PokemonSpecies>>,
    notifier: Notifier,
}

impl SpeciesDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn species(&self) -> &[Rc<PokemonSpecies>] {
        &self.species
    }

    pub fn get(&self, identifier: &str) -> Option<&Rc<PokemonSpecies>> {
        self.species
            .iter()
            .find(|species| species.identifier() == identifier)
    }

    /// First species in table order; new party members default to it.
    pub fn first(&self) -> Option<&Rc<PokemonSpecies>> {
        self.species.first()
    }
}

impl Observable for SpeciesDatabase {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Database for SpeciesDatabase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn reset(&mut self) {
        self.species.clear();
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<()> {
        let path = ctx.path(&ctx.layout.species_names);
        let mut entries = Vec::new();
        scanner::scan_file(&path, |line| {
            if let Some((identifier, name)) = scanner::try_bracket_string(line) {
                entries.push(PokemonSpecies::new(identifier, name));
            }
        })?;

        for entry in entries {
            let species = Rc::new(entry);
            ctx.species
                .insert(species.identifier(), Rc::clone(&species))?;
            self.species.push(species);
        }
        self.notifier.raise("species");
        Ok(())
    }

    fn entity_count(&self) -> usize {
        self.species.len()
    }
}

/// Front picture of `species`, or the question-mark picture when the
/// species has none.
pub fn front_pic_path(root: &Path, layout: &ProjectLayout, species: &PokemonSpecies) -> PathBuf {
    let path = root
        .join(&layout.species_graphics_dir)
        .join(species.name().to_lowercase())
        .join("front.png");
    if path.is_file() {
        path
    } else {
        root.join(&layout.species_fallback_pic)
    }
}
