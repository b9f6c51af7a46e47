//! Trainer classes, trainer pictures and trainers.

use std::rc::Rc;

use decomp_model::{
    Notifier, Observable, Party, PartyPokemon, Seq, Session, TrackedItems, Trainer, TrainerClass,
    TrainerPic,
};
use serde::{Deserialize, Serialize};

use crate::database::{Database, LoadContext, SaveContext};
use crate::error::{ProjectError, Result};
use crate::items::resolve_key;
use crate::resolve::RefTable;
use crate::{io, scanner};

pub const NAME: &str = "Trainer Database";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrainerFile {
    classes: Vec<ClassRecord>,
    pics: Vec<PicRecord>,
    trainers: Vec<TrainerRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ClassRecord {
    identifier: String,
    name: String,
    money_factor: u32,
    ivs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pokeball: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PicRecord {
    identifier: String,
    path: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrainerRecord {
    identifier: String,
    name: String,
    class: String,
    pic: String,
    #[serde(default, skip_serializing_if = "is_false")]
    is_female: bool,
    encounter_music: String,
    #[serde(rename = "AIScripts", default, skip_serializing_if = "Vec::is_empty")]
    ai_scripts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    items: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    double_battle: bool,
    party: Vec<PartyRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PartyRecord {
    species: String,
    level: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    iv: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    held_item: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    moves: Vec<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[derive(Debug)]
pub struct TrainerDatabase {
    classes: TrackedItems<Seq<TrainerClass>>,
    pics: TrackedItems<Seq<TrainerPic>>,
    trainers: TrackedItems<Seq<Trainer>>,
    encounter_music: Vec<String>,
    ai_scripts: Vec<String>,
    notifier: Notifier,
}

impl TrainerDatabase {
    pub fn new() -> Self {
        let notifier = Notifier::new();
        Self {
            classes: TrackedItems::bind(&notifier, Seq::new(), "classes"),
            pics: TrackedItems::bind(&notifier, Seq::new(), "pics"),
            trainers: TrackedItems::bind(&notifier, Seq::new(), "trainers"),
            encounter_music: Vec::new(),
            ai_scripts: Vec::new(),
            notifier,
        }
    }

    pub fn classes(&self) -> &Seq<TrainerClass> {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut Seq<TrainerClass> {
        self.classes.get_mut()
    }

    pub fn class(&self, identifier: &str) -> Option<&TrainerClass> {
        self.classes
            .iter()
            .find(|class| class.identifier() == identifier)
    }

    pub fn pics(&self) -> &Seq<TrainerPic> {
        &self.pics
    }

    pub fn pic(&self, identifier: &str) -> Option<&TrainerPic> {
        self.pics.iter().find(|pic| pic.identifier() == identifier)
    }

    pub fn trainers(&self) -> &Seq<Trainer> {
        &self.trainers
    }

    pub fn trainers_mut(&mut self) -> &mut Seq<Trainer> {
        self.trainers.get_mut()
    }

    pub fn trainer(&self, identifier: &str) -> Option<&Trainer> {
        self.trainers
            .iter()
            .find(|trainer| trainer.identifier() == identifier)
    }

    pub fn trainer_mut(&mut self, identifier: &str) -> Option<&mut Trainer> {
        self.trainers
            .get_mut()
            .iter_mut()
            .find(|trainer| trainer.identifier() == identifier)
    }

    /// Encounter music names harvested from the trainer constants.
    pub fn encounter_music(&self) -> &[String] {
        &self.encounter_music
    }

    /// AI script names harvested from the battle AI constants.
    pub fn ai_scripts(&self) -> &[String] {
        &self.ai_scripts
    }

    fn load_constants(&mut self, ctx: &LoadContext<'_>) -> Result<()> {
        self.encounter_music = scanner::scan_defines(
            &ctx.path(&ctx.layout.trainer_constants),
            "TRAINER_ENCOUNTER_MUSIC_",
        )?;
        self.ai_scripts =
            scanner::scan_defines(&ctx.path(&ctx.layout.battle_ai_constants), "AI_SCRIPT_")?;
        Ok(())
    }

    fn to_file(&self) -> TrainerFile {
        TrainerFile {
            classes: self
                .classes
                .iter()
                .map(|class| ClassRecord {
                    identifier: class.identifier().to_string(),
                    name: class.name().to_string(),
                    money_factor: class.money_factor(),
                    ivs: class.ivs(),
                    pokeball: class.pokeball().map(str::to_string),
                })
                .collect(),
            pics: self
                .pics
                .iter()
                .map(|pic| PicRecord {
                    identifier: pic.identifier().to_string(),
                    path: pic.path().to_string(),
                })
                .collect(),
            trainers: self.trainers.iter().map(trainer_record).collect(),
        }
    }
}

impl Default for TrainerDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for TrainerDatabase {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Database for TrainerDatabase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn reset(&mut self) {
        self.trainers.get_mut().clear();
        self.pics.get_mut().clear();
        self.classes.get_mut().clear();
        self.encounter_music.clear();
        self.ai_scripts.clear();
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
        self.classes.attach(session);
        self.pics.attach(session);
        self.trainers.attach(session);
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<()> {
        self.load_constants(ctx)?;
        let music = lookup(NAME, "encounter music", &self.encounter_music)?;
        let scripts = lookup(NAME, "AI script", &self.ai_scripts)?;

        let file: TrainerFile = io::read_json(&ctx.path(&ctx.layout.trainers))?;

        let mut classes = RefTable::new(NAME, "trainer class");
        for record in file.classes {
            if let Some(ball) = &record.pokeball {
                resolve_key(ctx, ball, NAME)?;
            }
            classes.insert(record.identifier.clone(), ())?;
            let mut class = TrainerClass::new(record.identifier, record.name);
            class.set_money_factor(record.money_factor);
            class.set_ivs(record.ivs);
            class.set_pokeball(record.pokeball);
            self.classes.get_mut().push(class);
        }

        let mut pics = RefTable::new(NAME, "trainer picture");
        for record in file.pics {
            pics.insert(record.identifier.clone(), ())?;
            self.pics
                .get_mut()
                .push(TrainerPic::new(record.identifier, record.path));
        }

        let mut trainers = RefTable::new(NAME, "trainer");
        for record in file.trainers {
            trainers.insert(record.identifier.clone(), ())?;
            classes.resolve(&record.class, NAME)?;
            pics.resolve(&record.pic, NAME)?;
            music.resolve(&record.encounter_music, NAME)?;
            for script in &record.ai_scripts {
                scripts.resolve(script, NAME)?;
            }
            let trainer = trainer_from_record(ctx, record)?;
            self.trainers.get_mut().push(trainer);
        }
        Ok(())
    }

    fn save(&mut self, ctx: &SaveContext<'_>) -> Result<()> {
        io::write_json(&ctx.path(&ctx.layout.trainers), &self.to_file())
    }

    fn entity_count(&self) -> usize {
        self.trainers.len()
    }
}

fn lookup(database: &'static str, kind: &'static str, names: &[String]) -> Result<RefTable<()>> {
    let mut table = RefTable::new(database, kind);
    for name in names {
        table.insert(name.clone(), ())?;
    }
    Ok(table)
}

fn trainer_from_record(ctx: &LoadContext<'_>, record: TrainerRecord) -> Result<Trainer> {
    let mut trainer = Trainer::new(record.identifier, record.class, record.pic);
    trainer.set_name(record.name);
    trainer.set_is_female(record.is_female);
    trainer.set_encounter_music(record.encounter_music);
    trainer.set_ai_scripts(record.ai_scripts);
    trainer.set_double_battle(record.double_battle);

    let items = record
        .items
        .iter()
        .map(|item| resolve_key(ctx, item, NAME))
        .collect::<Result<Vec<_>>>()?;
    trainer.set_items(items);

    let mut party = Party::new();
    for member in record.party {
        let species = ctx.species.resolve(&member.species, NAME)?;
        let mut pokemon = PartyPokemon::new(Rc::clone(species), member.level);
        pokemon.set_iv(member.iv);
        if let Some(item) = &member.held_item {
            pokemon.set_held_item(Some(resolve_key(ctx, item, NAME)?));
        }
        pokemon.set_moves(member.moves);
        party.add(pokemon)?;
    }
    trainer.set_party(party);
    Ok(trainer)
}

fn trainer_record(trainer: &Trainer) -> TrainerRecord {
    TrainerRecord {
        identifier: trainer.identifier().to_string(),
        name: trainer.name().to_string(),
        class: trainer.class().to_string(),
        pic: trainer.pic().to_string(),
        is_female: trainer.is_female(),
        encounter_music: trainer.encounter_music().to_string(),
        ai_scripts: trainer.ai_scripts().to_vec(),
        items: trainer.items().to_vec(),
        double_battle: trainer.double_battle(),
        party: trainer
            .party()
            .pokemon()
            .iter()
            .map(|member| PartyRecord {
                species: member.species().identifier().to_string(),
                level: member.level(),
                iv: member.iv(),
                held_item: member.held_item().map(str::to_string),
                moves: member.moves().to_vec(),
            })
            .collect(),
    }
}

/// Not found error for a trainer identifier.
pub(crate) fn unknown_trainer(identifier: &str) -> ProjectError {
    ProjectError::NotFound {
        kind: "trainer",
        identifier: identifier.to_string(),
    }
}
