//! Read-only line scanner for generated C headers.

use std::path::Path;

use crate::error::{ProjectError, Result};

/// Extract the text following `prefix` up to the first `terminator`.
///
/// The line must start with `prefix`. Without a terminator the value runs to
/// the end of the right-trimmed line.
pub fn try_extract_prefix<'a>(line: &'a str, prefix: &str, terminator: &str) -> Option<&'a str> {
    let rest = line.trim_end().strip_prefix(prefix)?;
    let value = match rest.find(terminator) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(value)
}

/// Parse a designated-initializer string entry: `[KEY] = _("Value"),`.
pub fn try_bracket_string(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix('[')?;
    let close = rest.find(']')?;
    let key = &rest[..close];
    let after = &rest[close + 1..];
    let start = after.find("_(\"")? + 3;
    let value = &after[start..];
    let end = value.find("\")")?;
    Some((key, &value[..end]))
}

/// Present every line of `path` to `visit`, in file order.
pub fn scan_file(path: &Path, mut visit: impl FnMut(&str)) -> Result<()> {
    let text = std::fs::read_to_string(path).map_err(ProjectError::io("read", path))?;
    let mut lines = 0usize;
    for line in text.lines() {
        visit(line);
        lines += 1;
    }
    tracing::debug!(path = %path.display(), lines, "scanned header");
    Ok(())
}

/// Collect the names of `#define <prefix><NAME> ...` constants.
pub fn scan_defines(path: &Path, prefix: &str) -> Result<Vec<String>> {
    let directive = format!("#define {prefix}");
    let mut names = Vec::new();
    scan_file(path, |line| {
        if let Some(name) = try_extract_prefix(line, &directive, " ") {
            names.push(name.to_string());
        }
    })?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_value_stops_at_terminator() {
        assert_eq!(
            try_extract_prefix("#define SHADOW_SIZE_S 0", "#define SHADOW_SIZE_", " "),
            Some("S")
        );
        assert_eq!(try_extract_prefix("#define TRACKS_NONE 0", "#define SHADOW_SIZE_", " "), None);
    }

    #[test]
    fn prefix_value_runs_to_line_end_without_terminator() {
        assert_eq!(
            try_extract_prefix("// Map Group gMapGroup_TownsAndRoutes  ", "// Map Group ", " "),
            Some("gMapGroup_TownsAndRoutes")
        );
    }

    #[test]
    fn bracket_string_entry() {
        assert_eq!(
            try_bracket_string("    [SPECIES_TREECKO] = _(\"TREECKO\"),"),
            Some(("SPECIES_TREECKO", "TREECKO"))
        );
        assert_eq!(try_bracket_string("const u8 gSpeciesNames[][11] = {"), None);
    }
}
