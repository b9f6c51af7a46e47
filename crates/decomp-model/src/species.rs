/// A pokemon species harvested from the species-name table.
///
/// Species are immutable once loaded and shared by reference between the
/// databases that point at them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PokemonSpecies {
    identifier: String,
    name: String,
}

impl PokemonSpecies {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
        }
    }

    /// The C enum name, e.g. `SPECIES_PIKACHU`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
