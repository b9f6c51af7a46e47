//! Pending token substitutions recorded by identifier renames.
//!
//! Identifiers double as fragments of C symbols used throughout the source
//! tree. Renaming an entity does not touch those files right away; the
//! rename is recorded here and applied to the tree when the project is
//! saved.

/// One pending literal replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReplacement {
    pub from: String,
    pub to: String,
}

/// Ordered set of pending replacements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameLedger {
    entries: Vec<TokenReplacement>,
}

impl RenameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `from` became `to`.
    ///
    /// Successive renames of the same token collapse into one entry mapping
    /// the name found on disk to the latest name. Renaming a token back to
    /// its on-disk name drops the entry.
    pub fn record(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();
        if from == to {
            return;
        }
        if let Some(position) = self.entries.iter().position(|entry| entry.to == from) {
            if self.entries[position].from == to {
                self.entries.remove(position);
            } else {
                self.entries[position].to = to;
            }
            return;
        }
        self.entries.push(TokenReplacement { from, to });
    }

    pub fn entries(&self) -> &[TokenReplacement] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Apply every pending replacement to `text` in a single pass.
    ///
    /// A match must not be glued to an adjacent identifier character, so
    /// `OBJ_EVENT_GFX_MAN_1` never rewrites part of `OBJ_EVENT_GFX_MAN_10`.
    /// Returns `None` when nothing was replaced.
    pub fn substitute(&self, text: &str) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let mut by_length: Vec<&TokenReplacement> = self.entries.iter().collect();
        by_length.sort_by_key(|entry| std::cmp::Reverse(entry.from.len()));

        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut at = 0;
        while at < text.len() {
            if let Some(entry) = by_length
                .iter()
                .find(|entry| token_matches(text, at, &entry.from))
            {
                out.push_str(&text[copied..at]);
                out.push_str(&entry.to);
                at += entry.from.len();
                copied = at;
                continue;
            }
            at += text[at..].chars().next().map_or(1, char::len_utf8);
        }
        if copied == 0 {
            return None;
        }
        out.push_str(&text[copied..]);
        Some(out)
    }
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn token_matches(text: &str, at: usize, token: &str) -> bool {
    if token.is_empty() || !text[at..].starts_with(token) {
        return false;
    }
    let bytes = text.as_bytes();
    let token_bytes = token.as_bytes();
    let end = at + token.len();
    let clear_before = at == 0 || !is_word_byte(token_bytes[0]) || !is_word_byte(bytes[at - 1]);
    let clear_after = end == bytes.len()
        || !is_word_byte(token_bytes[token_bytes.len() - 1])
        || !is_word_byte(bytes[end]);
    clear_before && clear_after
}

fn split_words(pascal: &str) -> Vec<String> {
    let chars: Vec<char> = pascal.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        let boundary = i > 0 && {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            (c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
                || (c.is_uppercase() && prev.is_uppercase() && next.is_some_and(char::is_lowercase))
                || (c.is_ascii_digit() && prev.is_alphabetic())
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `RSBrendan` -> `RS_BRENDAN`, `Man1` -> `MAN_1`.
pub fn pascal_to_snake(pascal: &str) -> String {
    split_words(pascal).join("_").to_uppercase()
}

/// `BrendanNormal` -> `Brendan Normal`.
pub fn pascal_to_sentence(pascal: &str) -> String {
    split_words(pascal).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_splits_acronyms_and_digits() {
        assert_eq!(pascal_to_snake("RSBrendan"), "RS_BRENDAN");
        assert_eq!(pascal_to_snake("Man1"), "MAN_1");
        assert_eq!(pascal_to_snake("BrendanNormal"), "BRENDAN_NORMAL");
        assert_eq!(pascal_to_snake("Cutscene"), "CUTSCENE");
        assert_eq!(pascal_to_sentence("BerryTree"), "Berry Tree");
    }

    #[test]
    fn rename_chain_collapses_to_on_disk_name() {
        let mut ledger = RenameLedger::new();
        ledger.record("A", "B");
        ledger.record("B", "C");
        assert_eq!(
            ledger.entries(),
            &[TokenReplacement {
                from: "A".into(),
                to: "C".into()
            }]
        );

        ledger.record("C", "A");
        assert!(ledger.is_empty());
    }

    #[test]
    fn same_name_is_not_recorded() {
        let mut ledger = RenameLedger::new();
        ledger.record("X", "X");
        assert!(ledger.is_empty());
    }

    #[test]
    fn substitution_respects_token_boundaries() {
        let mut ledger = RenameLedger::new();
        ledger.record("OBJ_EVENT_GFX_MAN_1", "OBJ_EVENT_GFX_WORKER");
        let text = "OBJ_EVENT_GFX_MAN_1, OBJ_EVENT_GFX_MAN_10 (OBJ_EVENT_GFX_MAN_1)";
        assert_eq!(
            ledger.substitute(text).as_deref(),
            Some("OBJ_EVENT_GFX_WORKER, OBJ_EVENT_GFX_MAN_10 (OBJ_EVENT_GFX_WORKER)")
        );
        assert_eq!(ledger.substitute("OBJ_EVENT_GFX_MAN_10"), None);
    }

    #[test]
    fn swapped_names_substitute_simultaneously() {
        let mut ledger = RenameLedger::new();
        ledger.record("LEFT", "RIGHT");
        ledger.record("RIGHT", "LEFT_TMP");
        // Second record chains onto the first entry.
        assert_eq!(ledger.len(), 1);

        let mut swap = RenameLedger::new();
        swap.entries.push(TokenReplacement {
            from: "LEFT".into(),
            to: "RIGHT".into(),
        });
        swap.entries.push(TokenReplacement {
            from: "RIGHT".into(),
            to: "LEFT".into(),
        });
        assert_eq!(swap.substitute("LEFT RIGHT").as_deref(), Some("RIGHT LEFT"));
    }

    #[test]
    fn path_tokens_match_after_slash() {
        let mut ledger = RenameLedger::new();
        ledger.record("people/man_1.4bpp", "people/worker.4bpp");
        assert_eq!(
            ledger
                .substitute("INCBIN_U32(\"graphics/object_events/pics/people/man_1.4bpp\");")
                .as_deref(),
            Some("INCBIN_U32(\"graphics/object_events/pics/people/worker.4bpp\");")
        );
    }
}
