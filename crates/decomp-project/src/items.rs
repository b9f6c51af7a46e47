//! The item database and its on-disk shape.

use decomp_model::{Item, ItemValue, Notifier, Observable, Seq, Session, TrackedItems, item_key};
use serde::{Deserialize, Serialize};

use crate::database::{Database, LoadContext, SaveContext};
use crate::error::{ProjectError, Result};
use crate::io;

pub const NAME: &str = "Item Database";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ItemFile {
    pub items: Vec<ItemRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ItemRecord {
    pub name: String,
    pub identifier: String,
    pub price: i64,
    #[serde(default, skip_serializing_if = "ItemValue::is_absent", with = "item_value")]
    pub hold_effect: ItemValue,
    #[serde(default, skip_serializing_if = "ItemValue::is_absent", with = "item_value")]
    pub hold_effect_param: ItemValue,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub importance: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unk19: i64,
    #[serde(default)]
    pub pocket: String,
    #[serde(rename = "Type", default, skip_serializing_if = "String::is_empty")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_use_function: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub battle_usage: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub battle_use_function: String,
    #[serde(default, skip_serializing_if = "ItemValue::is_absent", with = "item_value")]
    pub secondary_id: ItemValue,
    #[serde(default)]
    pub pic: String,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// `ItemValue` on disk: a number, an identifier string, or absent.
/// The empty string and `null` both read back as absent.
mod item_value {
    use decomp_model::ItemValue;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &ItemValue, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            ItemValue::Absent => serializer.serialize_none(),
            ItemValue::Int(number) => serializer.serialize_i64(*number),
            ItemValue::Ident(identifier) => serializer.serialize_str(identifier),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ItemValue, D::Error> {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => ItemValue::Absent,
            Some(Raw::Int(number)) => ItemValue::Int(number),
            Some(Raw::Text(text)) => ItemValue::ident(text),
        })
    }
}

impl ItemRecord {
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name().to_string(),
            identifier: item.identifier().to_string(),
            price: item.price(),
            hold_effect: item.hold_effect().clone(),
            hold_effect_param: item.hold_effect_param().clone(),
            description: item.description().to_string(),
            importance: item.importance(),
            unk19: item.unk19(),
            pocket: item.pocket().to_string(),
            item_type: item.item_type().to_string(),
            field_use_function: item.field_use_function().map(str::to_string),
            battle_usage: item.battle_usage(),
            battle_use_function: item.battle_use_function().to_string(),
            secondary_id: item.secondary_id().clone(),
            pic: item.pic().to_string(),
        }
    }

    pub fn into_item(self) -> Item {
        let mut item = Item::new(self.identifier, self.name);
        item.set_price(self.price);
        item.set_hold_effect(self.hold_effect);
        item.set_hold_effect_param(self.hold_effect_param);
        item.set_description(self.description);
        item.set_importance(self.importance);
        item.set_unk19(self.unk19);
        item.set_pocket(self.pocket);
        item.set_item_type(self.item_type);
        item.set_field_use_function(self.field_use_function);
        item.set_battle_usage(self.battle_usage);
        item.set_battle_use_function(self.battle_use_function);
        item.set_secondary_id(self.secondary_id);
        item.set_pic(self.pic);
        item
    }
}

#[derive(Debug)]
pub struct ItemDatabase {
    items: TrackedItems<Seq<Item>>,
    notifier: Notifier,
}

impl ItemDatabase {
    pub fn new() -> Self {
        let notifier = Notifier::new();
        let items = TrackedItems::bind(&notifier, Seq::new(), "items");
        Self { items, notifier }
    }

    pub fn items(&self) -> &Seq<Item> {
        &self.items
    }

    /// Append a new item; its identifier must not be in use.
    pub fn add(&mut self, item: Item) -> Result<()> {
        self.items
            .get_mut()
            .push_unique(item)
            .map_err(ProjectError::identity(NAME, "item"))
    }

    /// Rename an item. Names may carry the `ITEM_` prefix.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<bool> {
        self.items
            .get_mut()
            .rename_item(from, to)
            .map_err(ProjectError::identity(NAME, "item"))
    }

    /// Look up an item by identifier, with or without the `ITEM_` prefix.
    pub fn get(&self, reference: &str) -> Option<&Item> {
        self.items.find(item_key(reference))
    }

    pub fn get_mut(&mut self, reference: &str) -> Option<&mut Item> {
        self.items.get_mut().find_mut(item_key(reference))
    }
}

impl Default for ItemDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for ItemDatabase {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Database for ItemDatabase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn reset(&mut self) {
        self.items.get_mut().clear();
    }

    fn attach(&self, session: &Session) {
        self.notifier.attach(session);
        self.items.attach(session);
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<()> {
        let file: ItemFile = io::read_json(&ctx.path(&ctx.layout.items))?;
        for record in file.items {
            let key = item_key(&record.identifier).to_string();
            ctx.items.insert(key, self.items.len())?;
            self.items.get_mut().push(record.into_item());
        }
        Ok(())
    }

    fn save(&mut self, ctx: &SaveContext<'_>) -> Result<()> {
        let file = ItemFile {
            items: self.items.iter().map(ItemRecord::from_item).collect(),
        };
        io::write_json(&ctx.path(&ctx.layout.items), &file)
    }

    fn entity_count(&self) -> usize {
        self.items.len()
    }
}

/// Check that `reference` names a loaded item and return its key.
pub(crate) fn resolve_key(
    ctx: &LoadContext<'_>,
    reference: &str,
    referrer: &'static str,
) -> Result<String> {
    let key = item_key(reference);
    ctx.items.resolve(key, referrer).map_err(|error| match error {
        ProjectError::UnresolvedReference { database, kind, .. } => {
            ProjectError::UnresolvedReference {
                database,
                kind,
                identifier: reference.to_string(),
            }
        }
        other => other,
    })?;
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_omitted_and_restored() {
        let json = r#"{
            "Name": "Potion",
            "Identifier": "POTION",
            "Price": 300,
            "HoldEffect": "",
            "SecondaryId": 7,
            "Pocket": "POCKET_ITEMS"
        }"#;
        let record: ItemRecord = serde_json::from_str(json).expect("parse item");
        assert_eq!(record.hold_effect, ItemValue::Absent);
        assert_eq!(record.secondary_id, ItemValue::Int(7));
        assert_eq!(record.field_use_function, None);

        let value = serde_json::to_value(&record).expect("serialize");
        let object = value.as_object().expect("object");
        assert!(!object.contains_key("HoldEffect"));
        assert!(!object.contains_key("Importance"));
        assert!(!object.contains_key("Type"));
        assert_eq!(object["SecondaryId"], 7);
    }

    #[test]
    fn identifier_values_keep_their_text() {
        let record: ItemRecord = serde_json::from_str(
            r#"{"Name": "Cheri Berry", "Identifier": "CHERI_BERRY", "Price": 20,
                "HoldEffect": "HOLD_EFFECT_CURE_PAR", "Type": "ITEM_USE_PARTY_MENU"}"#,
        )
        .expect("parse item");
        let item = record.clone().into_item();
        assert_eq!(item.hold_effect(), &ItemValue::Ident("HOLD_EFFECT_CURE_PAR".into()));
        assert_eq!(ItemRecord::from_item(&item), record);
    }
}
