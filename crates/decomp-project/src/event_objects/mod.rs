//! The event object database: animation tables, pictures and objects.

pub mod artifacts;
pub mod compact;
pub mod rules;

use std::rc::Rc;

use decomp_model::{
    EventObject, EventObjectAnimTable, Frame, Notifier, Observable, ObservableCollection, PicId,
    PicTable, RenameLedger, Seq, Session, TrackedItems,
};

use crate::database::{Database, LoadContext, SaveContext};
use crate::error::{ProjectError, Result};
use crate::io;
use crate::resolve::RefTable;
use crate::scanner;
use compact::{EventObjectFile, EventObjectRecord, FrameRecord, FrameRun, PicRecord};

pub const NAME: &str = "Event Object Database";

const ANIM_TABLE_DECLARATION: &str = "const union AnimCmd *const gObjectEventImageAnimTable_";

#[derive(Debug)]
pub struct EventObjectDatabase {
    anim_tables: Vec<Rc<EventObjectAnimTable>>,
    shadow_sizes: Vec<String>,
    track_types: Vec<String>,
    pics: TrackedItems<PicTable>,
    objects: TrackedItems<Seq<EventObject>>,
    notifier: Notifier,
}

impl EventObjectDatabase {
    pub fn new() -> Self {
        let notifier = Notifier::new();
        let pics = TrackedItems::bind(&notifier, PicTable::new(), "pics");
        let objects = TrackedItems::bind(&notifier, Seq::new(), "objects");
        Self {
            anim_tables: Vec::new(),
            shadow_sizes: Vec::new(),
            track_types: Vec::new(),
            pics,
            objects,
            notifier,
        }
    }

    pub fn anim_tables(&self) -> &[Rc<EventObjectAnimTable>] {
        &self.anim_tables
    }

    pub fn anim_table(&self, identifier: &str) -> Option<&Rc<EventObjectAnimTable>> {
        self.anim_tables
            .iter()
            .find(|table| table.identifier() == identifier)
    }

    pub fn shadow_sizes(&self) -> &[String] {
        &self.shadow_sizes
    }

    pub fn track_types(&self) -> &[String] {
        &self.track_types
    }

    pub fn pics(&self) -> &PicTable {
        &self.pics
    }

    pub fn pics_mut(&mut self) -> &mut PicTable {
        self.pics.get_mut()
    }

    pub fn objects(&self) -> &Seq<EventObject> {
        &self.objects
    }

    /// Append a new object; its identifier must not be in use.
    pub fn add_object(&mut self, object: EventObject) -> Result<()> {
        self.objects
            .get_mut()
            .push_unique(object)
            .map_err(ProjectError::identity(NAME, "event object"))
    }

    pub fn object(&self, identifier: &str) -> Option<&EventObject> {
        self.objects.find(identifier)
    }

    pub fn object_mut(&mut self, identifier: &str) -> Option<&mut EventObject> {
        self.objects.get_mut().find_mut(identifier)
    }

    /// Rename an object, recording the generated-symbol substitution.
    pub fn rename_object(
        &mut self,
        from: &str,
        to: &str,
        ledger: &mut RenameLedger,
    ) -> Result<bool> {
        self.objects
            .get_mut()
            .rename_object(from, to, ledger)
            .map_err(ProjectError::identity(NAME, "event object"))
    }

    /// Change where a picture lives, recording the `.4bpp` substitution.
    pub fn set_pic_path(
        &mut self,
        identifier: &str,
        path: &str,
        ledger: &mut RenameLedger,
    ) -> Result<bool> {
        let id = self
            .pics
            .by_identifier(identifier)
            .map(|pic| pic.id())
            .ok_or_else(|| ProjectError::NotFound {
                kind: "event object picture",
                identifier: identifier.to_string(),
            })?;
        let changed = self
            .pics
            .get_mut()
            .get_mut(id)
            .is_some_and(|pic| pic.set_path(path, ledger));
        Ok(changed)
    }

    fn load_anim_tables(&mut self, ctx: &LoadContext<'_>) -> Result<RefTable<Rc<EventObjectAnimTable>>> {
        let mut names = Vec::new();
        scanner::scan_file(&ctx.path(&ctx.layout.anim_tables), |line| {
            if let Some(name) = scanner::try_extract_prefix(line, ANIM_TABLE_DECLARATION, "[") {
                names.push(name.to_string());
            }
        })?;

        let mut table = RefTable::new(NAME, "animation table");
        for name in names {
            let anim_table = Rc::new(EventObjectAnimTable::from_table_name(&name));
            table.insert(anim_table.identifier(), Rc::clone(&anim_table))?;
            self.anim_tables.push(anim_table);
        }
        Ok(table)
    }

    fn load_constants(&mut self, ctx: &LoadContext<'_>) -> Result<()> {
        let shadow_sizes = &mut self.shadow_sizes;
        let track_types = &mut self.track_types;
        scanner::scan_file(&ctx.path(&ctx.layout.event_object_constants), |line| {
            if let Some(name) = scanner::try_extract_prefix(line, "#define SHADOW_SIZE_", " ") {
                shadow_sizes.push(name.to_string());
            } else if let Some(name) = scanner::try_extract_prefix(line, "#define TRACKS_", " ") {
                track_types.push(name.to_string());
            }
        })
    }

    fn to_file(&self) -> Result<EventObjectFile> {
        let mut event_objects = Vec::with_capacity(self.objects.len());
        for object in self.objects.iter() {
            let mut frames = Vec::with_capacity(object.frames().len());
            for frame in object.frames() {
                let pic = self.pics.get().get(frame.pic()).ok_or_else(|| {
                    ProjectError::DanglingPicture {
                        object: object.identifier().to_string(),
                    }
                })?;
                frames.push((pic.identifier().to_string(), frame.index()));
            }
            event_objects.push(EventObjectRecord {
                identifier: object.identifier().to_string(),
                width: object.width(),
                height: object.height(),
                shadow_size: object.shadow_size().to_string(),
                inanimate: object.inanimate(),
                tracks: object.tracks().to_string(),
                animations: object.animations().identifier().to_string(),
                affine_animations: object.affine_animations().to_string(),
                frames: compact::compact_runs(frames)
                    .into_iter()
                    .map(FrameRecord::from)
                    .collect(),
            });
        }

        let pics = self
            .pics
            .pics()
            .iter()
            .map(|pic| PicRecord {
                identifier: pic.identifier().to_string(),
                path: pic.path().to_string(),
            })
            .collect();
        Ok(EventObjectFile {
            event_objects,
            pics,
        })
    }
}

impl Default for EventObjectDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for EventObjectDatabase {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Database for EventObjectDatabase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn reset(&mut self) {
        self.anim_tables.clear();
        self.shadow_sizes.clear();
        self.track_types.clear();
        self.objects.get_mut().clear();
        self.pics.get_mut().clear();
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
        self.pics.attach_session(session);
        self.objects.attach(session);
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<()> {
        let anim_tables = self.load_anim_tables(ctx)?;
        self.load_constants(ctx)?;

        let file: EventObjectFile = io::read_json(&ctx.path(&ctx.layout.event_objects))?;

        let mut pic_ids: RefTable<PicId> = RefTable::new(NAME, "picture");
        for record in file.pics {
            let full_path = ctx.layout.event_object_pic(ctx.root, &record.path);
            let id = self
                .pics
                .get_mut()
                .add(record.identifier.clone(), record.path, full_path);
            pic_ids.insert(record.identifier, id)?;
        }

        let mut identifiers: RefTable<()> = RefTable::new(NAME, "event object");
        for record in file.event_objects {
            identifiers.insert(record.identifier.clone(), ())?;
            let object = object_from_record(record, &anim_tables, &pic_ids)?;
            self.objects.get_mut().push(object);
        }
        Ok(())
    }

    fn save(&mut self, ctx: &SaveContext<'_>) -> Result<()> {
        let demand = rules::rule_demand(self.objects.as_slice(), &self.pics)?;
        let rules_path = ctx.path(&ctx.layout.spritesheet_rules);
        if rules::update_rules_file(&rules_path, &demand)? {
            tracing::info!(path = %rules_path.display(), "patched sprite sheet rules");
        }

        let moved = artifacts::relocate_pics(ctx.root, ctx.layout, self.pics.get_mut())?;
        if moved > 0 {
            tracing::info!(moved, "relocated event object pictures");
        }

        let file = self.to_file()?;
        io::write_json(&ctx.path(&ctx.layout.event_objects), &file)
    }

    fn entity_count(&self) -> usize {
        self.objects.len()
    }
}

fn object_from_record(
    record: EventObjectRecord,
    anim_tables: &RefTable<Rc<EventObjectAnimTable>>,
    pic_ids: &RefTable<PicId>,
) -> Result<EventObject> {
    let animations = anim_tables.resolve(&record.animations, NAME)?;
    let mut object = EventObject::new(record.identifier, Rc::clone(animations));
    object.set_width(record.width);
    object.set_height(record.height);
    object.set_shadow_size(record.shadow_size);
    object.set_inanimate(record.inanimate);
    object.set_tracks(record.tracks);
    object.set_affine_animations(record.affine_animations);

    let runs: Vec<FrameRun<PicId>> = record
        .frames
        .iter()
        .map(|frame| {
            Ok(FrameRun {
                pic: *pic_ids.resolve(&frame.identifier, NAME)?,
                start: frame.start_index,
                count: frame.count,
            })
        })
        .collect::<Result<_>>()?;
    let frames = object.frames_mut();
    for (pic, index) in compact::expand_runs(&runs) {
        frames.push(Frame::new(pic, index));
    }
    Ok(object)
}
