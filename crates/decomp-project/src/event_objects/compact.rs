//! Compact on-disk shape of the event object database.
//!
//! Frames are stored as runs: consecutive frames that show the same picture
//! with tile indices increasing by one collapse into a single entry.

use serde::{Deserialize, Serialize};

use decomp_model::event_object::{DEFAULT_AFFINE_ANIMATIONS, DEFAULT_SHADOW_SIZE, DEFAULT_TRACKS};

/// One run of frames over a single picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRun<K> {
    pub pic: K,
    pub start: u32,
    pub count: u32,
}

/// Collapse `frames` into maximal runs.
///
/// A frame extends the current run when it shows the same picture and its
/// index is exactly one past the run's last index.
pub fn compact_runs<K: PartialEq>(frames: impl IntoIterator<Item = (K, u32)>) -> Vec<FrameRun<K>> {
    let mut runs: Vec<FrameRun<K>> = Vec::new();
    for (pic, index) in frames {
        if let Some(run) = runs.last_mut() {
            let next = run.start.checked_add(run.count);
            if run.pic == pic && next == Some(index) {
                run.count += 1;
                continue;
            }
        }
        runs.push(FrameRun {
            pic,
            start: index,
            count: 1,
        });
    }
    runs
}

/// Expand runs back into one `(picture, index)` pair per frame.
pub fn expand_runs<K: Clone>(runs: &[FrameRun<K>]) -> Vec<(K, u32)> {
    runs.iter()
        .flat_map(|run| (0..run.count).map(move |offset| (run.pic.clone(), run.start + offset)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventObjectFile {
    pub event_objects: Vec<EventObjectRecord>,
    pub pics: Vec<PicRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PicRecord {
    pub identifier: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventObjectRecord {
    pub identifier: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_shadow_size", skip_serializing_if = "is_default_shadow_size")]
    pub shadow_size: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inanimate: bool,
    #[serde(default = "default_tracks", skip_serializing_if = "is_default_tracks")]
    pub tracks: String,
    pub animations: String,
    #[serde(
        default = "default_affine_animations",
        skip_serializing_if = "is_default_affine_animations"
    )]
    pub affine_animations: String,
    #[serde(default)]
    pub frames: Vec<FrameRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FrameRecord {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub start_index: u32,
    #[serde(default = "one", skip_serializing_if = "is_one")]
    pub count: u32,
}

impl From<FrameRun<String>> for FrameRecord {
    fn from(run: FrameRun<String>) -> Self {
        Self {
            identifier: run.pic,
            start_index: run.start,
            count: run.count,
        }
    }
}

impl From<&FrameRecord> for FrameRun<String> {
    fn from(record: &FrameRecord) -> Self {
        Self {
            pic: record.identifier.clone(),
            start: record.start_index,
            count: record.count,
        }
    }
}

fn default_shadow_size() -> String {
    DEFAULT_SHADOW_SIZE.to_string()
}

fn is_default_shadow_size(value: &str) -> bool {
    value == DEFAULT_SHADOW_SIZE
}

fn default_tracks() -> String {
    DEFAULT_TRACKS.to_string()
}

fn is_default_tracks(value: &str) -> bool {
    value == DEFAULT_TRACKS
}

fn default_affine_animations() -> String {
    DEFAULT_AFFINE_ANIMATIONS.to_string()
}

fn is_default_affine_animations(value: &str) -> bool {
    value == DEFAULT_AFFINE_ANIMATIONS
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn one() -> u32 {
    1
}

fn is_one(value: &u32) -> bool {
    *value == 1
}
