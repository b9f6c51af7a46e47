//! Overworld event objects, their pictures and animation tables.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{ModelError, Result};
use crate::observable::{
    Notifier, Observable, ObservableCollection, PropertyChanged, Subscription, TrackedItems,
    copy_props, set, set_and_track_items, str_props,
};
use crate::rename::{RenameLedger, pascal_to_sentence, pascal_to_snake};
use crate::seq::{ChangeAction, Identified, Seq};
use crate::session::Session;

pub const DEFAULT_SHADOW_SIZE: &str = "M";
pub const DEFAULT_TRACKS: &str = "FOOT";
pub const DEFAULT_AFFINE_ANIMATIONS: &str = "gDummySpriteAffineAnimTable";

/// Prefix of the C symbol naming an object's graphics id.
pub const GFX_CONSTANT_PREFIX: &str = "OBJ_EVENT_GFX_";

/// Prefix of every image animation table symbol.
pub const ANIM_TABLE_PREFIX: &str = "gObjectEventImageAnimTable_";

/// `OBJ_EVENT_GFX_<SNAKE>` for an object identifier.
pub fn gfx_constant(identifier: &str) -> String {
    format!("{GFX_CONSTANT_PREFIX}{}", pascal_to_snake(identifier))
}

/// An image animation table declared in the object animation sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventObjectAnimTable {
    identifier: String,
    pretty_name: String,
}

impl EventObjectAnimTable {
    /// Build from the name following [`ANIM_TABLE_PREFIX`].
    pub fn from_table_name(name: &str) -> Self {
        Self {
            identifier: format!("{ANIM_TABLE_PREFIX}{name}"),
            pretty_name: pascal_to_sentence(name),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn pretty_name(&self) -> &str {
        &self.pretty_name
    }
}

/// Stable handle of a picture within a [`PicTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PicId(u32);

impl PicId {
    pub fn get(self) -> u32 {
        self.0
    }
}

/// A sprite sheet image used by event object frames.
#[derive(Debug, PartialEq)]
pub struct EventObjectPic {
    id: PicId,
    identifier: String,
    path: String,
    full_path: PathBuf,
    notifier: Notifier,
}

impl EventObjectPic {
    pub fn id(&self) -> PicId {
        self.id
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Project-relative path without extension, e.g. `people/man_1`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Change the picture path, recording the rename of its derived
    /// `.4bpp` artifact for substitution at save time.
    pub fn set_path(&mut self, value: impl Into<String>, ledger: &mut RenameLedger) -> bool {
        let value = value.into();
        if value == self.path {
            return false;
        }
        ledger.record(format!("{}.4bpp", self.path), format!("{value}.4bpp"));
        set(&self.notifier, &mut self.path, value, "path")
    }

    /// Location of the backing image on disk.
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub fn set_full_path(&mut self, value: impl Into<PathBuf>) -> bool {
        set(&self.notifier, &mut self.full_path, value.into(), "full_path")
    }
}

impl Observable for EventObjectPic {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

/// Arena of pictures. Frames refer to pictures by [`PicId`], which stays
/// valid as long as the picture is in the table.
#[derive(Debug, PartialEq)]
pub struct PicTable {
    pics: Seq<EventObjectPic>,
    next_id: u32,
}

impl PicTable {
    pub fn new() -> Self {
        Self {
            pics: Seq::new(),
            next_id: 0,
        }
    }

    pub fn add(
        &mut self,
        identifier: impl Into<String>,
        path: impl Into<String>,
        full_path: impl Into<PathBuf>,
    ) -> PicId {
        let id = PicId(self.next_id);
        self.next_id += 1;
        self.pics.push(EventObjectPic {
            id,
            identifier: identifier.into(),
            path: path.into(),
            full_path: full_path.into(),
            notifier: Notifier::new(),
        });
        id
    }

    pub fn get(&self, id: PicId) -> Option<&EventObjectPic> {
        self.pics.iter().find(|pic| pic.id == id)
    }

    pub fn get_mut(&mut self, id: PicId) -> Option<&mut EventObjectPic> {
        self.pics.iter_mut().find(|pic| pic.id == id)
    }

    pub fn by_identifier(&self, identifier: &str) -> Option<&EventObjectPic> {
        self.pics.iter().find(|pic| pic.identifier == identifier)
    }

    pub fn remove(&mut self, id: PicId) -> Option<EventObjectPic> {
        let index = self.pics.position(|pic| pic.id == id)?;
        Some(self.pics.remove_at(index))
    }

    /// Remove every picture. Ids are never reused.
    pub fn clear(&mut self) {
        self.pics.clear();
    }

    pub fn pics(&self) -> &Seq<EventObjectPic> {
        &self.pics
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, EventObjectPic> {
        self.pics.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.pics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pics.is_empty()
    }
}

impl Default for PicTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservableCollection for PicTable {
    fn watch_structure(&self, handler: impl Fn(ChangeAction) + 'static) -> Subscription {
        self.pics.watch_structure(handler)
    }

    fn watch_items(&self, handler: impl Fn(&PropertyChanged) + 'static) -> Subscription {
        self.pics.watch_items(handler)
    }

    fn attach_session(&self, session: &Session) {
        self.pics.attach(session);
    }
}

/// One animation frame: a tile index into a picture.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pic: PicId,
    index: u32,
    notifier: Notifier,
}

impl Frame {
    pub fn new(pic: PicId, index: u32) -> Self {
        Self {
            pic,
            index,
            notifier: Notifier::new(),
        }
    }

    copy_props! {
        pic: PicId => set_pic;
        index: u32 => set_index;
    }
}

impl Observable for Frame {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

#[derive(Debug, PartialEq)]
pub struct EventObject {
    identifier: String,
    width: u32,
    height: u32,
    shadow_size: String,
    inanimate: bool,
    tracks: String,
    animations: Rc<EventObjectAnimTable>,
    affine_animations: String,
    frames: TrackedItems<Seq<Frame>>,
    notifier: Notifier,
}

impl EventObject {
    /// An object with the default shadow, tracks and affine table and no
    /// frames.
    pub fn new(identifier: impl Into<String>, animations: Rc<EventObjectAnimTable>) -> Self {
        let notifier = Notifier::new();
        let frames = TrackedItems::bind(&notifier, Seq::new(), "frames");
        Self {
            identifier: identifier.into(),
            width: 16,
            height: 32,
            shadow_size: DEFAULT_SHADOW_SIZE.to_string(),
            inanimate: false,
            tracks: DEFAULT_TRACKS.to_string(),
            animations,
            affine_animations: DEFAULT_AFFINE_ANIMATIONS.to_string(),
            frames,
            notifier,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Rename the object, recording the rename of its graphics constant.
    /// Callers go through [`Seq::rename_object`] so names stay unique.
    pub(crate) fn set_identifier(&mut self, value: impl Into<String>, ledger: &mut RenameLedger) -> Result<bool> {
        let value = value.into();
        if value.is_empty() {
            return Err(ModelError::EmptyIdentifier);
        }
        if value == self.identifier {
            return Ok(false);
        }
        ledger.record(gfx_constant(&self.identifier), gfx_constant(&value));
        Ok(set(&self.notifier, &mut self.identifier, value, "identifier"))
    }

    /// The object's graphics id constant.
    pub fn gfx_constant(&self) -> String {
        gfx_constant(&self.identifier)
    }

    copy_props! {
        width: u32 => set_width;
        height: u32 => set_height;
        inanimate: bool => set_inanimate;
    }

    str_props! {
        shadow_size => set_shadow_size;
        tracks => set_tracks;
        affine_animations => set_affine_animations;
    }

    pub fn animations(&self) -> &Rc<EventObjectAnimTable> {
        &self.animations
    }

    pub fn set_animations(&mut self, value: Rc<EventObjectAnimTable>) -> bool {
        set(&self.notifier, &mut self.animations, value, "animations")
    }

    pub fn frames(&self) -> &Seq<Frame> {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut Seq<Frame> {
        self.frames.get_mut()
    }

    pub fn set_frames(&mut self, value: Seq<Frame>) -> bool {
        set_and_track_items(&self.notifier, &mut self.frames, value, "frames")
    }

    /// Grow the frame list so `to_index` is valid, continuing from the last
    /// frame with increasing tile indices clamped to `max_frame - 1`.
    /// Returns the number of frames added; an empty list is left alone.
    pub fn extend_frames(&mut self, to_index: usize, max_frame: u32) -> usize {
        let frames = self.frames.get_mut();
        let Some(last) = frames.last() else {
            return 0;
        };
        if to_index < frames.len() {
            return 0;
        }
        let (pic, start) = (last.pic(), last.index());
        let needed = to_index + 1 - frames.len();
        let ceiling = max_frame.saturating_sub(1);
        for step in 1..=needed {
            let index = start.saturating_add(step as u32).min(ceiling);
            frames.push(Frame::new(pic, index));
        }
        needed
    }

    /// Drop every frame from `from_index` on.
    pub fn truncate_frames(&mut self, from_index: usize) {
        self.frames.get_mut().truncate(from_index);
    }

    /// Whether any frame shows `pic`.
    pub fn uses_pic(&self, pic: PicId) -> bool {
        self.frames.iter().any(|frame| frame.pic() == pic)
    }
}

impl Observable for EventObject {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
        self.frames.attach(session);
    }
}

impl Identified for EventObject {
    fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl Seq<EventObject> {
    /// Rename the object called `from`, recording the rename of its
    /// graphics constant.
    pub fn rename_object(&mut self, from: &str, to: &str, ledger: &mut RenameLedger) -> Result<bool> {
        self.rename_with(from, to, |object| object.set_identifier(to, ledger))
    }
}
