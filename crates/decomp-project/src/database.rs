//! The unit of persistence shared by every domain database.

use std::path::Path;
use std::rc::Rc;

use decomp_model::{PokemonSpecies, Session};

use crate::error::Result;
use crate::layout::ProjectLayout;
use crate::resolve::RefTable;

/// State threaded through one project load.
///
/// Independent databases register their identifiers here; databases loaded
/// after them resolve the identifier strings they read against these tables.
#[derive(Debug)]
pub struct LoadContext<'a> {
    pub root: &'a Path,
    pub layout: &'a ProjectLayout,
    pub species: RefTable<Rc<PokemonSpecies>>,
    /// Item keys (identifiers without the `ITEM_` prefix) to their position.
    pub items: RefTable<usize>,
}

impl<'a> LoadContext<'a> {
    pub fn new(root: &'a Path, layout: &'a ProjectLayout) -> Self {
        Self {
            root,
            layout,
            species: RefTable::new("Pokemon Species Database", "species"),
            items: RefTable::new("Item Database", "item"),
        }
    }

    /// Project-relative `path` under the root.
    pub fn path(&self, relative: &Path) -> std::path::PathBuf {
        self.root.join(relative)
    }
}

/// State threaded through one project save.
#[derive(Debug, Clone, Copy)]
pub struct SaveContext<'a> {
    pub root: &'a Path,
    pub layout: &'a ProjectLayout,
}

impl SaveContext<'_> {
    pub fn path(&self, relative: &Path) -> std::path::PathBuf {
        self.root.join(relative)
    }
}

/// A domain database: reset, load from and save to the project tree.
pub trait Database {
    fn name(&self) -> &'static str;

    /// Clear every owned collection.
    fn reset(&mut self);

    /// Bind the database and everything it owns to a load session.
    fn attach(&self, session: &Session);

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<()>;

    /// Databases harvested from read-only sources have nothing to write.
    fn save(&mut self, _ctx: &SaveContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Number of top-level entities, for summaries and logging.
    fn entity_count(&self) -> usize;
}
