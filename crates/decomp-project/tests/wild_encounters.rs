//! Wild encounter tables: default habitats and sparse saving.

mod common;

use std::rc::Rc;

use common::{Fixture, json};
use decomp_model::{WildEncounterOccurrence, WildEncounterPokemon};
use decomp_project::{Project, ProjectError};

#[test]
fn test_every_map_gets_every_habitat() {
    let fixture = Fixture::new();
    let project = Project::open(fixture.root()).unwrap();
    let wild = project.wild_encounters();

    assert_eq!(wild.habitat_types(), ["FISHING", "LAND", "WATER"]);
    assert_eq!(wild.maps().len(), 4);
    for map in wild.maps().iter() {
        let types: Vec<&str> = map
            .habitats()
            .iter()
            .map(|habitat| habitat.habitat_type())
            .collect();
        assert_eq!(types, ["FISHING", "LAND", "WATER"], "{}", map.map_name());
    }

    let house = wild.map("LITTLEROOT_TOWN_BRENDANS_HOUSE_1F").unwrap();
    assert_eq!(house.map_group(), "gMapGroup_IndoorLittleroot");
    assert!(!house.has_encounters());
    let route = wild.map("ROUTE101").unwrap();
    assert_eq!(route.map_group(), "gMapGroup_TownsAndRoutes");
    assert_eq!(route.habitat("LAND").unwrap().encounter_rate(), 20);
}

#[test]
fn test_new_encounter_is_saved_sparsely() {
    let fixture = Fixture::new();
    let mut project = Project::open(fixture.root()).unwrap();
    let wurmple = Rc::clone(project.species().get("SPECIES_WURMPLE").unwrap());

    let map = project.wild_encounters_mut().map_mut("PETALBURG_CITY").unwrap();
    let slot = map.habitat_index("WATER").unwrap();
    let water = map.habitats_mut().get_mut(slot).unwrap();
    water.set_encounter_rate(4);
    let mut pokemon = WildEncounterPokemon::new(Some(wurmple));
    pokemon
        .occurrences_mut()
        .add(WildEncounterOccurrence::new("DAY", 20, 5, 60));
    water.pokemon_mut().add(pokemon);
    project.save().unwrap();

    let saved = json(&fixture.read("src/data/wild_encounters.json"));
    let maps = saved["WildEncounters"].as_array().unwrap();
    assert_eq!(maps.len(), 3);
    let petalburg = maps
        .iter()
        .find(|map| map["MapName"] == "PETALBURG_CITY")
        .unwrap();
    assert_eq!(
        petalburg["Habitats"],
        serde_json::json!([{
            "Type": "WATER",
            "EncounterRate": 4,
            "Pokemon": [{
                "Species": "SPECIES_WURMPLE",
                "Occurrences": [{
                    "Time": "DAY",
                    "MidLevel": 20,
                    "LevelRange": 5,
                    "EncounterRate": 60
                }]
            }]
        }])
    );
}

#[test]
fn test_pokemon_without_occurrences_is_dropped() {
    let fixture = Fixture::new();
    let mut project = Project::open(fixture.root()).unwrap();
    let map = project.wild_encounters_mut().map_mut("ROUTE102").unwrap();
    let slot = map.habitat_index("FISHING").unwrap();
    let fishing = map.habitats_mut().get_mut(slot).unwrap();
    fishing.pokemon_mut().modify(0, |pokemon| pokemon.occurrences_mut().clear());
    project.save().unwrap();

    let saved = json(&fixture.read("src/data/wild_encounters.json"));
    let names: Vec<&str> = saved["WildEncounters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|map| map["MapName"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["ROUTE101"]);

    project.load().unwrap();
    let route = project.wild_encounters().map("ROUTE102").unwrap();
    assert_eq!(route.habitats().len(), 3);
    assert!(!route.has_encounters());
}

#[test]
fn test_unknown_map_is_fatal() {
    let fixture = Fixture::new();
    fixture.write(
        "src/data/wild_encounters.json",
        &common::WILD_ENCOUNTERS.replace("ROUTE102", "ROUTE199"),
    );

    let error = Project::open(fixture.root()).unwrap_err();
    assert!(matches!(error, ProjectError::UnknownMap { ref map } if map == "ROUTE199"));
}

#[test]
fn test_unknown_habitat_is_fatal() {
    let fixture = Fixture::new();
    fixture.write(
        "src/data/wild_encounters.json",
        &common::WILD_ENCOUNTERS.replace("\"Type\": \"FISHING\"", "\"Type\": \"ROCK_SMASH\""),
    );

    let error = Project::open(fixture.root()).unwrap_err();
    assert!(matches!(error, ProjectError::UnknownHabitat { .. }));
}
