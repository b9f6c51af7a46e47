//! Project-relative paths and project root resolution.

use std::path::{Path, PathBuf};

/// Environment variable naming the project root when none is given.
pub const PROJECT_ENV_VAR: &str = "DECOMP_PROJECT_DIR";

/// Every file and directory the engine reads or writes, relative to the
/// project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub species_names: PathBuf,
    pub species_graphics_dir: PathBuf,
    pub species_fallback_pic: PathBuf,
    pub items: PathBuf,
    pub difficulty: PathBuf,
    pub anim_tables: PathBuf,
    pub event_object_constants: PathBuf,
    pub event_objects: PathBuf,
    pub event_object_pics_dir: PathBuf,
    pub spritesheet_rules: PathBuf,
    pub map_groups: PathBuf,
    pub wild_encounters: PathBuf,
    pub trainer_constants: PathBuf,
    pub battle_ai_constants: PathBuf,
    pub trainers: PathBuf,
    /// Directories searched recursively for token substitution.
    pub source_dirs: Vec<PathBuf>,
    /// File extensions eligible for token substitution.
    pub source_extensions: Vec<String>,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            species_names: "src/data/text/species_names.h".into(),
            species_graphics_dir: "graphics/pokemon".into(),
            species_fallback_pic: "graphics/pokemon/question_mark/circled/front.png".into(),
            items: "src/data/items.json".into(),
            difficulty: "src/data/difficulty.json".into(),
            anim_tables: "src/data/object_events/object_event_anims.h".into(),
            event_object_constants: "include/constants/event_objects.h".into(),
            event_objects: "src/data/object_events/event_objects.json".into(),
            event_object_pics_dir: "graphics/object_events/pics".into(),
            spritesheet_rules: "spritesheet_rules.mk".into(),
            map_groups: "include/constants/map_groups.h".into(),
            wild_encounters: "src/data/wild_encounters.json".into(),
            trainer_constants: "include/constants/trainers.h".into(),
            battle_ai_constants: "include/constants/battle_ai.h".into(),
            trainers: "src/data/trainers.json".into(),
            source_dirs: vec!["src".into(), "include".into(), "data".into()],
            source_extensions: ["c", "h", "inc", "s", "json", "mk"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ProjectLayout {
    /// Canonical image location of an event object picture path.
    pub fn event_object_pic(&self, root: &Path, pic_path: &str) -> PathBuf {
        root.join(&self.event_object_pics_dir)
            .join(format!("{pic_path}.png"))
    }
}

/// Get the project root directory.
///
/// Resolution order:
/// 1. the explicit argument
/// 2. `DECOMP_PROJECT_DIR` environment variable
/// 3. the current directory
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(root) = explicit {
        return root.to_path_buf();
    }
    if let Ok(root) = std::env::var(PROJECT_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins() {
        assert_eq!(resolve_root(Some(Path::new("/tmp/emerald"))), PathBuf::from("/tmp/emerald"));
    }

    #[test]
    fn canonical_pic_path() {
        let layout = ProjectLayout::default();
        assert_eq!(
            layout.event_object_pic(Path::new("/p"), "people/man_1"),
            PathBuf::from("/p/graphics/object_events/pics/people/man_1.png")
        );
    }
}
