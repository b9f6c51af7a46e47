use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, info_span};

use decomp_model::Section;
use decomp_project::{DatabaseSummary, Project, resolve_root};

use crate::cli::{LevelTrainerArgs, ProjectArgs, RenameObjectArgs};

/// Outcome of a command that loads (and possibly saves) a project.
#[derive(Debug)]
pub struct ProjectReport {
    pub root: PathBuf,
    pub databases: Vec<DatabaseSummary>,
    pub saved: bool,
}

/// Party levels assigned to one trainer.
#[derive(Debug)]
pub struct LevelReport {
    pub trainer: String,
    pub segment: String,
    pub section: Section,
    pub levels: Vec<(String, u32)>,
}

fn open(args: &ProjectArgs) -> Result<Project> {
    let root = resolve_root(args.root.as_deref());
    Project::open(&root).with_context(|| format!("load project at {}", root.display()))
}

fn report(project: &Project, saved: bool) -> ProjectReport {
    ProjectReport {
        root: project.root().to_path_buf(),
        databases: project.summary(),
        saved,
    }
}

pub fn run_summary(args: &ProjectArgs) -> Result<ProjectReport> {
    let project = open(args)?;
    Ok(report(&project, false))
}

pub fn run_resave(args: &ProjectArgs) -> Result<ProjectReport> {
    let mut project = open(args)?;
    let span = info_span!("resave", root = %project.root().display());
    let _enter = span.enter();
    project.save().context("save project")?;
    Ok(report(&project, true))
}

pub fn run_rename_object(args: &RenameObjectArgs) -> Result<ProjectReport> {
    let mut project = open(&args.project)?;
    let span = info_span!("rename_object", from = %args.from, to = %args.to);
    let _enter = span.enter();

    let changed = project
        .rename_event_object(&args.from, &args.to)
        .with_context(|| format!("rename event object {}", args.from))?;
    if !changed {
        info!("identifier unchanged, nothing to save");
        return Ok(report(&project, false));
    }
    project.save().context("save project")?;
    Ok(report(&project, true))
}

pub fn run_level_trainer(args: &LevelTrainerArgs) -> Result<LevelReport> {
    let mut project = open(&args.project)?;
    let span = info_span!("level_trainer", trainer = %args.trainer, segment = args.segment);
    let _enter = span.enter();

    let segment = project.difficulty().segment_ref(Some(args.segment));
    if !segment.is_known() {
        bail!(
            "difficulty segment {} does not exist ({} defined)",
            args.segment,
            project.difficulty().game_segments().len()
        );
    }
    let section = Section::from(args.section);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    project
        .generate_trainer_levels(&args.trainer, segment, section, &mut rng)
        .with_context(|| format!("generate levels for {}", args.trainer))?;
    project.save().context("save project")?;

    let trainer = project
        .trainers()
        .trainer(&args.trainer)
        .with_context(|| format!("trainer {} vanished after save", args.trainer))?;
    Ok(LevelReport {
        trainer: args.trainer.clone(),
        segment: project.difficulty().describe(segment),
        section,
        levels: trainer
            .party()
            .pokemon()
            .iter()
            .map(|member| (member.species().identifier().to_string(), member.level()))
            .collect(),
    })
}
