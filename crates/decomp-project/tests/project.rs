//! Project-level load behaviour: notifications, reference checks and edits
//! that span databases.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{Fixture, json};
use decomp_model::{Item, Observable, Section, SegmentRef};
use decomp_project::{Project, ProjectError};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn record(source: &impl Observable) -> (Rc<RefCell<Vec<&'static str>>>, decomp_model::Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = source
        .notifier()
        .subscribe(move |change| sink.borrow_mut().push(change.name));
    (seen, subscription)
}

#[test]
fn test_load_notifies_once_per_source() {
    let fixture = Fixture::new();
    let mut project = Project::new(fixture.root());
    let (project_seen, _project_sub) = record(&project);
    let (items_seen, _items_sub) = record(project.items());
    let (trainers_seen, _trainers_sub) = record(project.trainers());

    project.load().unwrap();

    assert!(project.is_loaded());
    assert_eq!(*project_seen.borrow(), vec![""]);
    assert_eq!(*items_seen.borrow(), vec![""]);
    assert_eq!(*trainers_seen.borrow(), vec![""]);
}

#[test]
fn test_edits_after_load_notify_immediately() {
    let fixture = Fixture::new();
    let mut project = Project::open(fixture.root()).unwrap();
    let (seen, _sub) = record(project.items());

    project.items_mut().get_mut("POTION").unwrap().set_price(10);

    assert_eq!(*seen.borrow(), vec!["items"]);
}

#[test]
fn test_unresolved_species_is_fatal() {
    let fixture = Fixture::new();
    fixture.write(
        "src/data/trainers.json",
        &common::TRAINERS.replace("SPECIES_WURMPLE", "SPECIES_MISSINGNO"),
    );

    let mut project = Project::new(fixture.root());
    let error = project.load().unwrap_err();
    match &error {
        ProjectError::UnresolvedReference { identifier, .. } => {
            assert_eq!(identifier, "SPECIES_MISSINGNO");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!project.is_loaded());
    assert!(error.user_message().contains("SPECIES_MISSINGNO"));
}

#[test]
fn test_unresolved_item_keeps_written_reference() {
    let fixture = Fixture::new();
    fixture.write(
        "src/data/trainers.json",
        &common::TRAINERS.replace("\"HeldItem\": \"ORAN_BERRY\"", "\"HeldItem\": \"ITEM_SITRUS_BERRY\""),
    );

    let error = Project::open(fixture.root()).unwrap_err();
    assert!(matches!(
        error,
        ProjectError::UnresolvedReference { ref identifier, .. } if identifier == "ITEM_SITRUS_BERRY"
    ));
}

#[test]
fn test_duplicate_item_is_fatal() {
    let fixture = Fixture::new();
    fixture.write(
        "src/data/items.json",
        &common::ITEMS.replace("\"Identifier\": \"ORAN_BERRY\"", "\"Identifier\": \"ITEM_POTION\""),
    );

    let error = Project::open(fixture.root()).unwrap_err();
    assert!(matches!(error, ProjectError::DuplicateIdentifier { .. }));
}

#[test]
fn test_item_identifiers_stay_unique_through_edits() {
    let fixture = Fixture::new();
    let mut project = Project::open(fixture.root()).unwrap();

    let error = project.items_mut().rename("POTION", "ITEM_POKE_BALL").unwrap_err();
    assert!(matches!(
        error,
        ProjectError::DuplicateIdentifier { ref identifier, .. } if identifier == "POKE_BALL"
    ));
    let error = project.items_mut().add(Item::new("ORAN_BERRY", "Oran Berry")).unwrap_err();
    assert!(matches!(error, ProjectError::DuplicateIdentifier { .. }));
    let error = project.items_mut().rename("ETHER", "ELIXIR").unwrap_err();
    assert!(matches!(error, ProjectError::NotFound { .. }));

    project.save().unwrap();
    project.load().unwrap();
    assert_eq!(project.items().items().len(), 3);
    assert!(project.items().get("POTION").is_some());
}

#[test]
fn test_item_rename_accepts_prefixed_names() {
    let fixture = Fixture::new();
    let mut project = Project::open(fixture.root()).unwrap();

    assert!(project.items_mut().rename("ITEM_POTION", "ITEM_SUPER_POTION").unwrap());
    assert!(project.items().get("SUPER_POTION").is_some());
    assert!(project.items().get("POTION").is_none());
}

#[test]
fn test_missing_file_reports_path() {
    let fixture = Fixture::new();
    std::fs::remove_file(fixture.path("src/data/difficulty.json")).unwrap();

    let error = Project::open(fixture.root()).unwrap_err();
    match error {
        ProjectError::Io { path, .. } => assert!(path.ends_with("src/data/difficulty.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_trainer_levels_follow_segment_section() {
    let fixture = Fixture::new();
    let mut project = Project::open(fixture.root()).unwrap();
    let segment = project.difficulty().segment_ref(Some(1));
    assert_eq!(project.difficulty().describe(segment), "[12, 20]");

    let mut rng = StdRng::seed_from_u64(7);
    project
        .generate_trainer_levels("TRAINER_CALVIN_1", segment, Section::Middle, &mut rng)
        .unwrap();

    let trainer = project.trainers().trainer("TRAINER_CALVIN_1").unwrap();
    for member in trainer.party().pokemon().iter() {
        assert!((15..18).contains(&member.level()), "level {}", member.level());
    }

    project.save().unwrap();
    let saved = json(&fixture.read("src/data/trainers.json"));
    let level = saved["Trainers"][0]["Party"][0]["Level"].as_u64().unwrap();
    assert!((15..18).contains(&level));
}

#[test]
fn test_unknown_segment_leaves_levels_alone() {
    let fixture = Fixture::new();
    let mut project = Project::open(fixture.root()).unwrap();
    assert_eq!(project.difficulty().segment_ref(Some(9)), SegmentRef::Unknown);

    let mut rng = StdRng::seed_from_u64(7);
    project
        .generate_trainer_levels("TRAINER_CALVIN_1", SegmentRef::Unknown, Section::Late, &mut rng)
        .unwrap();
    let levels: Vec<u32> = project
        .trainers()
        .trainer("TRAINER_CALVIN_1")
        .unwrap()
        .party()
        .pokemon()
        .iter()
        .map(|member| member.level())
        .collect();
    assert_eq!(levels, [5, 6]);

    let error = project
        .generate_trainer_levels("TRAINER_NOBODY", SegmentRef::Known(0), Section::Early, &mut rng)
        .unwrap_err();
    assert!(matches!(error, ProjectError::NotFound { .. }));
}

#[test]
fn test_trainer_references_are_resolved() {
    let fixture = Fixture::new();
    let project = Project::open(fixture.root()).unwrap();
    let trainers = project.trainers();

    assert_eq!(trainers.encounter_music(), ["MALE", "FEMALE", "INTENSE"]);
    assert_eq!(trainers.ai_scripts(), ["CHECK_BAD_MOVE", "TRY_TO_FAINT", "CHECK_VIABILITY"]);

    let roxanne = trainers.trainer("TRAINER_ROXANNE_1").unwrap();
    assert!(roxanne.is_female());
    assert_eq!(trainers.class(roxanne.class()).unwrap().name(), "LEADER");
    assert!(trainers.pic(roxanne.pic()).is_some());
    let lead = roxanne.party().pokemon().first().unwrap();
    assert_eq!(lead.held_item(), Some("ORAN_BERRY"));
    assert_eq!(
        project.items().get(lead.held_item().unwrap()).unwrap().name(),
        "Oran Berry"
    );
}
