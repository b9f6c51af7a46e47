//! Items.

use std::fmt;

use crate::error::Result;
use crate::observable::{Notifier, Observable, copy_props, set, str_props};
use crate::seq::{Identified, Seq};

/// Prefix of item constants in C sources.
pub const ITEM_PREFIX: &str = "ITEM_";

/// A loosely typed item attribute: either absent, a number, or a C
/// identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ItemValue {
    #[default]
    Absent,
    Int(i64),
    Ident(String),
}

impl ItemValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// An identifier value, treating the empty string as absent.
    pub fn ident(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Absent
        } else {
            Self::Ident(value)
        }
    }
}

impl fmt::Display for ItemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => Ok(()),
            Self::Int(value) => write!(f, "{value}"),
            Self::Ident(value) => f.write_str(value),
        }
    }
}

/// A specific item within the project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    name: String,
    identifier: String,
    price: i64,
    hold_effect: ItemValue,
    hold_effect_param: ItemValue,
    description: String,
    importance: i64,
    unk19: i64,
    pocket: String,
    item_type: String,
    field_use_function: Option<String>,
    battle_usage: i64,
    battle_use_function: String,
    secondary_id: ItemValue,
    pic: String,
    notifier: Notifier,
}

impl Item {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// The identifier without the `ITEM_` prefix, e.g. `POTION`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Identifiers only change through [`Seq::rename_item`], which keeps
    /// them unique.
    pub(crate) fn set_identifier(&mut self, value: impl Into<String>) -> bool {
        set(&self.notifier, &mut self.identifier, value.into(), "identifier")
    }

    str_props! {
        name => set_name;
        description => set_description;
        pocket => set_pocket;
        item_type => set_item_type;
        battle_use_function => set_battle_use_function;
        pic => set_pic;
    }

    copy_props! {
        price: i64 => set_price;
        importance: i64 => set_importance;
        unk19: i64 => set_unk19;
        battle_usage: i64 => set_battle_usage;
    }

    pub fn hold_effect(&self) -> &ItemValue {
        &self.hold_effect
    }

    pub fn set_hold_effect(&mut self, value: ItemValue) -> bool {
        set(&self.notifier, &mut self.hold_effect, value, "hold_effect")
    }

    pub fn hold_effect_param(&self) -> &ItemValue {
        &self.hold_effect_param
    }

    pub fn set_hold_effect_param(&mut self, value: ItemValue) -> bool {
        set(&self.notifier, &mut self.hold_effect_param, value, "hold_effect_param")
    }

    pub fn secondary_id(&self) -> &ItemValue {
        &self.secondary_id
    }

    pub fn set_secondary_id(&mut self, value: ItemValue) -> bool {
        set(&self.notifier, &mut self.secondary_id, value, "secondary_id")
    }

    pub fn field_use_function(&self) -> Option<&str> {
        self.field_use_function.as_deref()
    }

    pub fn set_field_use_function(&mut self, value: Option<String>) -> bool {
        set(&self.notifier, &mut self.field_use_function, value, "field_use_function")
    }

    /// The item's C constant, e.g. `ITEM_POTION`.
    pub fn constant(&self) -> String {
        format!("{ITEM_PREFIX}{}", self.identifier)
    }
}

impl Observable for Item {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Identified for Item {
    fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl Seq<Item> {
    /// Rename an item. Both names may carry the `ITEM_` prefix.
    pub fn rename_item(&mut self, from: &str, to: &str) -> Result<bool> {
        let to = item_key(to);
        self.rename_with(item_key(from), to, |item| Ok(item.set_identifier(to)))
    }
}

/// Strip the `ITEM_` prefix from an item reference if present.
pub fn item_key(reference: &str) -> &str {
    reference.strip_prefix(ITEM_PREFIX).unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[test]
    fn empty_identifier_value_is_absent() {
        assert_eq!(ItemValue::ident(""), ItemValue::Absent);
        assert_eq!(ItemValue::ident("HOLD_EFFECT_CURE_PAR"), ItemValue::Ident("HOLD_EFFECT_CURE_PAR".into()));
    }

    #[test]
    fn item_key_accepts_both_spellings() {
        assert_eq!(item_key("ITEM_POTION"), "POTION");
        assert_eq!(item_key("POTION"), "POTION");
    }

    #[test]
    fn rename_keeps_identifiers_unique() {
        let mut items: Seq<Item> = [Item::new("POTION", "Potion"), Item::new("POKE_BALL", "Poke Ball")]
            .into_iter()
            .collect();

        assert_eq!(
            items.rename_item("POTION", "ITEM_POKE_BALL"),
            Err(ModelError::DuplicateIdentifier("POKE_BALL".into()))
        );
        assert_eq!(items.rename_item("ITEM_POTION", "SUPER_POTION"), Ok(true));
        assert_eq!(items.rename_item("SUPER_POTION", "SUPER_POTION"), Ok(false));
        assert_eq!(
            items.rename_item("ETHER", "ELIXIR"),
            Err(ModelError::UnknownIdentifier("ETHER".into()))
        );
        assert_eq!(items.rename_item("POKE_BALL", "ITEM_"), Err(ModelError::EmptyIdentifier));
        assert_eq!(items[0].identifier(), "SUPER_POTION");
        assert_eq!(
            items.push_unique(Item::new("POKE_BALL", "Ball")),
            Err(ModelError::DuplicateIdentifier("POKE_BALL".into()))
        );
    }

    #[test]
    fn setters_skip_unchanged_values() {
        let mut item = Item::new("POTION", "Potion");
        assert!(!item.set_name("Potion"));
        assert!(item.set_price(300));
        assert!(item.set_hold_effect(ItemValue::Int(20)));
        assert!(!item.set_hold_effect(ItemValue::Int(20)));
        assert_eq!(item.constant(), "ITEM_POTION");
    }
}
