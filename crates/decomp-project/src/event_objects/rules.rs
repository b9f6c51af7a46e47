//! In-place maintenance of the sprite sheet build rules.
//!
//! Each picture whose image size differs from its object's rendered size
//! needs a two-line stanza:
//!
//! ```text
//! $(OBJEVENTGFXDIR)/people/man_1.4bpp: %.4bpp: %.png
//! 	$(GFX) $< $@ -mwidth 2 -mheight 4
//! ```
//!
//! The patcher only touches stanzas of pictures the event objects manage.
//! Stale stanzas are blanked, changed ones get a new parameter line, and
//! missing ones are appended. Every other line is kept as is.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use decomp_model::{EventObject, PicTable};

use crate::error::{ProjectError, Result};
use crate::io;
use crate::scanner::try_extract_prefix;

const STANZA_PREFIX: &str = "$(OBJEVENTGFXDIR)/";

/// Sprite sheet dimensions in 8x8 tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetTiles {
    pub width: u32,
    pub height: u32,
}

impl SheetTiles {
    fn param_line(self) -> String {
        format!("\t$(GFX) $< $@ -mwidth {} -mheight {}", self.width, self.height)
    }

    /// Read the tile dimensions back from a parameter line.
    fn parse(line: &str) -> Option<Self> {
        let width = number_after(line, "-mwidth ")?;
        let height = number_after(line, "-mheight ")?;
        Some(Self { width, height })
    }
}

fn number_after(line: &str, flag: &str) -> Option<u32> {
    let start = line.find(flag)? + flag.len();
    let digits: &str = line[start..]
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();
    digits.parse().ok()
}

/// Pictures the event objects manage and the stanzas they need.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuleDemand {
    /// Paths of every picture shown by some frame.
    pub managed: BTreeSet<String>,
    /// Paths needing a stanza, with the tiles each needs.
    pub needed: BTreeMap<String, SheetTiles>,
}

/// Work out which pictures need a stanza by comparing each picture's image
/// size against the object that first shows it.
pub fn rule_demand(objects: &[EventObject], pics: &PicTable) -> Result<RuleDemand> {
    let mut demand = RuleDemand::default();
    let mut checked = HashSet::new();
    for object in objects {
        for frame in object.frames() {
            if !checked.insert(frame.pic()) {
                continue;
            }
            let pic = pics
                .get(frame.pic())
                .ok_or_else(|| ProjectError::DanglingPicture {
                    object: object.identifier().to_string(),
                })?;
            demand.managed.insert(pic.path().to_string());

            let (width, height) = image_size(pic.full_path())?;
            if width != object.width() || height != object.height() {
                demand.needed.insert(
                    pic.path().to_string(),
                    SheetTiles {
                        width: object.width() / 8,
                        height: object.height() / 8,
                    },
                );
            }
        }
    }
    Ok(demand)
}

fn image_size(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).map_err(|source| ProjectError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// A line of the rules file and the line ending that followed it.
struct Line<'a> {
    text: std::borrow::Cow<'a, str>,
    ending: &'a str,
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.split_inclusive('\n')
        .map(|raw| {
            let (body, ending) = if let Some(body) = raw.strip_suffix("\r\n") {
                (body, "\r\n")
            } else if let Some(body) = raw.strip_suffix('\n') {
                (body, "\n")
            } else {
                (raw, "")
            };
            Line {
                text: body.into(),
                ending,
            }
        })
        .collect()
}

/// Patch `text` so its stanzas match `demand`.
///
/// Returns `None` when nothing changed.
pub fn patch_rules(text: &str, demand: &RuleDemand) -> Option<String> {
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let mut lines = split_lines(text);
    let mut pending = demand.needed.clone();
    let mut changed = false;

    let mut index = 0;
    while index < lines.len() {
        let Some(path) = try_extract_prefix(&lines[index].text, STANZA_PREFIX, ".")
            .map(str::to_string)
            .filter(|path| demand.managed.contains(path))
        else {
            index += 1;
            continue;
        };

        let param_index = index + 1;
        let params = lines
            .get(param_index)
            .filter(|line| line.text.trim_start().starts_with("$(GFX)"));
        let Some(params) = params else {
            tracing::warn!(path = %path, line = index + 1, "malformed sprite sheet stanza, skipping");
            index += 1;
            continue;
        };

        match pending.remove(&path) {
            None => {
                tracing::debug!(path = %path, "removing stale sprite sheet stanza");
                lines[index].text = "".into();
                lines[param_index].text = "".into();
                changed = true;
            }
            Some(tiles) => {
                if SheetTiles::parse(&params.text) != Some(tiles) {
                    tracing::debug!(path = %path, width = tiles.width, height = tiles.height, "updating sprite sheet stanza");
                    lines[param_index].text = tiles.param_line().into();
                    changed = true;
                }
            }
        }
        index = param_index + 1;
    }

    if !changed && pending.is_empty() {
        return None;
    }

    let mut output = String::with_capacity(text.len());
    for line in &lines {
        output.push_str(&line.text);
        output.push_str(line.ending);
    }
    if !pending.is_empty() && !output.is_empty() && !output.ends_with('\n') {
        output.push_str(newline);
    }
    for (path, tiles) in &pending {
        tracing::debug!(path = %path, "adding sprite sheet stanza");
        output.push_str(newline);
        output.push_str(&format!("{STANZA_PREFIX}{path}.4bpp: %.4bpp: %.png{newline}"));
        output.push_str(&tiles.param_line());
        output.push_str(newline);
    }
    Some(output)
}

/// Patch the rules file at `path`, writing it only when a line changed.
pub fn update_rules_file(path: &Path, demand: &RuleDemand) -> Result<bool> {
    let text = io::read_text(path)?;
    match patch_rules(&text, demand) {
        Some(patched) => {
            io::write_atomic(path, patched.as_bytes())?;
            Ok(true)
        }
        None => Ok(false),
    }
}
