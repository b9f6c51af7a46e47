//! Wild encounter tables for every map.
//!
//! Maps come from the map constants; every map gets one habitat per known
//! habitat type, and the stored encounters are merged into those. On save
//! only maps, habitats and pokemon with at least one occurrence are written.

use std::rc::Rc;

use decomp_model::{
    Notifier, Observable, Seq, Session, TrackedItems, WildEncounterHabitat, WildEncounterMap,
    WildEncounterOccurrence, WildEncounterPokemon,
};
use serde::{Deserialize, Serialize};

use crate::database::{Database, LoadContext, SaveContext};
use crate::error::{ProjectError, Result};
use crate::resolve::RefTable;
use crate::{io, scanner};

pub const NAME: &str = "Wild Encounter Database";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WildEncounterFile {
    pub habitat_types: Vec<String>,
    pub wild_encounters: Vec<MapRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct MapRecord {
    pub map_name: String,
    pub habitats: Vec<HabitatRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct HabitatRecord {
    #[serde(rename = "Type")]
    pub habitat_type: String,
    pub encounter_rate: u32,
    pub pokemon: Vec<PokemonRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PokemonRecord {
    pub species: String,
    pub occurrences: Vec<OccurrenceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct OccurrenceRecord {
    pub time: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub mid_level: u32,
    pub level_range: u32,
    pub encounter_rate: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[derive(Debug)]
pub struct WildEncounterDatabase {
    habitat_types: Vec<String>,
    maps: TrackedItems<Seq<WildEncounterMap>>,
    notifier: Notifier,
}

impl WildEncounterDatabase {
    pub fn new() -> Self {
        let notifier = Notifier::new();
        let maps = TrackedItems::bind(&notifier, Seq::new(), "wild_encounters");
        Self {
            habitat_types: Vec::new(),
            maps,
            notifier,
        }
    }

    /// Known habitat types, sorted.
    pub fn habitat_types(&self) -> &[String] {
        &self.habitat_types
    }

    pub fn maps(&self) -> &Seq<WildEncounterMap> {
        &self.maps
    }

    pub fn maps_mut(&mut self) -> &mut Seq<WildEncounterMap> {
        self.maps.get_mut()
    }

    pub fn map(&self, map_name: &str) -> Option<&WildEncounterMap> {
        self.maps.iter().find(|map| map.map_name() == map_name)
    }

    pub fn map_mut(&mut self, map_name: &str) -> Option<&mut WildEncounterMap> {
        self.maps
            .get_mut()
            .iter_mut()
            .find(|map| map.map_name() == map_name)
    }

    /// Read map names and groups from the map constants, threading the
    /// current group across the lines that follow its marker.
    fn load_maps(&mut self, ctx: &LoadContext<'_>) -> Result<RefTable<usize>> {
        let mut scanned = Vec::new();
        let mut group = String::new();
        scanner::scan_file(&ctx.path(&ctx.layout.map_groups), |line| {
            if let Some(name) = scanner::try_extract_prefix(line, "// Map Group ", " ") {
                group = name.to_string();
            } else if let Some(name) = scanner::try_extract_prefix(line, "#define MAP_", " ") {
                scanned.push((name.to_string(), group.clone()));
            }
        })?;

        let mut index = RefTable::new(NAME, "map");
        let maps = self.maps.get_mut();
        for (name, group) in scanned {
            index.insert(name.clone(), maps.len())?;
            maps.push(WildEncounterMap::new(name, group));
        }
        Ok(index)
    }

    pub(crate) fn to_file(&self) -> Result<WildEncounterFile> {
        let mut habitat_types = self.habitat_types.clone();
        habitat_types.sort();

        let mut wild_encounters = Vec::new();
        for map in self.maps.iter().filter(|map| map.has_encounters()) {
            let mut habitats = Vec::new();
            for habitat in map.habitats().iter().filter(|habitat| habitat.has_encounters()) {
                habitats.push(habitat_record(map, habitat)?);
            }
            wild_encounters.push(MapRecord {
                map_name: map.map_name().to_string(),
                habitats,
            });
        }
        Ok(WildEncounterFile {
            habitat_types,
            wild_encounters,
        })
    }
}

impl Default for WildEncounterDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for WildEncounterDatabase {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Database for WildEncounterDatabase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn reset(&mut self) {
        self.habitat_types.clear();
        self.maps.get_mut().clear();
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
        self.maps.attach(session);
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<()> {
        let map_index = self.load_maps(ctx)?;
        let file: WildEncounterFile = io::read_json(&ctx.path(&ctx.layout.wild_encounters))?;

        let mut habitat_types = file.habitat_types;
        habitat_types.sort();
        for map in self.maps.get_mut().iter_mut() {
            let habitats = map.habitats_mut();
            for habitat_type in &habitat_types {
                habitats.push(WildEncounterHabitat::new(habitat_type.as_str()));
            }
        }
        self.habitat_types = habitat_types;

        for record in file.wild_encounters {
            let Some(&index) = map_index.get(&record.map_name) else {
                return Err(ProjectError::UnknownMap {
                    map: record.map_name,
                });
            };
            let Some(map) = self.maps.get_mut().get_mut(index) else {
                continue;
            };
            merge_map(ctx, map, record)?;
        }
        Ok(())
    }

    fn save(&mut self, ctx: &SaveContext<'_>) -> Result<()> {
        io::write_json(&ctx.path(&ctx.layout.wild_encounters), &self.to_file()?)
    }

    fn entity_count(&self) -> usize {
        self.maps.iter().filter(|map| map.has_encounters()).count()
    }
}

fn merge_map(ctx: &LoadContext<'_>, map: &mut WildEncounterMap, record: MapRecord) -> Result<()> {
    for habitat in record.habitats {
        let Some(slot) = map.habitat_index(&habitat.habitat_type) else {
            return Err(ProjectError::UnknownHabitat {
                map: record.map_name,
                habitat: habitat.habitat_type,
            });
        };

        let mut merged = WildEncounterHabitat::new(habitat.habitat_type);
        merged.set_encounter_rate(habitat.encounter_rate);
        for pokemon in habitat.pokemon {
            let species = ctx.species.resolve(&pokemon.species, NAME)?;
            let mut entry = WildEncounterPokemon::new(Some(Rc::clone(species)));
            for occurrence in pokemon.occurrences {
                entry.occurrences_mut().add(WildEncounterOccurrence::new(
                    occurrence.time,
                    occurrence.mid_level,
                    occurrence.level_range,
                    occurrence.encounter_rate,
                ));
            }
            merged.pokemon_mut().add(entry);
        }
        map.habitats_mut().replace(slot, merged);
    }
    Ok(())
}

fn habitat_record(map: &WildEncounterMap, habitat: &WildEncounterHabitat) -> Result<HabitatRecord> {
    let mut pokemon = Vec::new();
    for entry in habitat.pokemon().iter().filter(|entry| entry.has_occurrences()) {
        let species = entry.species().ok_or_else(|| ProjectError::MissingSpecies {
            map: map.map_name().to_string(),
            habitat: habitat.habitat_type().to_string(),
        })?;
        pokemon.push(PokemonRecord {
            species: species.identifier().to_string(),
            occurrences: entry
                .occurrences()
                .iter()
                .map(|occurrence| OccurrenceRecord {
                    time: occurrence.time().to_string(),
                    mid_level: occurrence.mid_level(),
                    level_range: occurrence.level_range(),
                    encounter_rate: occurrence.encounter_rate(),
                })
                .collect(),
        });
    }
    Ok(HabitatRecord {
        habitat_type: habitat.habitat_type().to_string(),
        encounter_rate: habitat.encounter_rate(),
        pokemon,
    })
}
