//! A small but complete project tree written into a temp directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

pub const SPECIES_NAMES: &str = r#"const u8 gSpeciesNames[][POKEMON_NAME_LENGTH + 1] = {
    [SPECIES_NONE] = _("??????????"),
    [SPECIES_POOCHYENA] = _("POOCHYENA"),
    [SPECIES_ZIGZAGOON] = _("ZIGZAGOON"),
    [SPECIES_WURMPLE] = _("WURMPLE"),
};
"#;

pub const ITEMS: &str = r#"{
  "Items": [
    {
      "Name": "Poke Ball",
      "Identifier": "POKE_BALL",
      "Price": 200,
      "Description": "A tool for catching wild POKEMON.",
      "Pocket": "POCKET_POKE_BALLS",
      "Type": "ITEM_USE_BAG_MENU",
      "BattleUsage": 2,
      "BattleUseFunction": "ItemUseInBattle_PokeBall",
      "Pic": "gItemIcon_PokeBall"
    },
    {
      "Name": "Potion",
      "Identifier": "POTION",
      "Price": 300,
      "HoldEffectParam": 20,
      "Description": "Restores the HP of a POKEMON by 20 points.",
      "Pocket": "POCKET_ITEMS",
      "Type": "ITEM_USE_PARTY_MENU",
      "FieldUseFunction": "ItemUseOutOfBattle_Medicine",
      "Pic": "gItemIcon_Potion"
    },
    {
      "Name": "Oran Berry",
      "Identifier": "ORAN_BERRY",
      "Price": 20,
      "HoldEffect": "HOLD_EFFECT_RESTORE_HP",
      "HoldEffectParam": 10,
      "Description": "",
      "Pocket": "POCKET_BERRIES",
      "Pic": ""
    }
  ]
}
"#;

pub const DIFFICULTY: &str = r#"{
  "GameSegments": [
    {
      "CompletionFlag": "FLAG_BADGE01_GET",
      "MinimumLevel": 5,
      "MaximumLevel": 14
    },
    {
      "CompletionFlag": "FLAG_BADGE02_GET",
      "MinimumLevel": 12,
      "MaximumLevel": 20
    }
  ]
}
"#;

pub const ANIM_TABLES: &str = "\
const union AnimCmd *const gObjectEventImageAnimTable_Inanimate[] = {
    sAnim_StayStill,
};

const union AnimCmd *const gObjectEventImageAnimTable_Standard[] = {
    sAnim_FaceSouth,
    sAnim_FaceNorth,
};
";

pub const EVENT_OBJECT_CONSTANTS: &str = "\
#define OBJ_EVENT_GFX_BRENDAN_NORMAL 0
#define OBJ_EVENT_GFX_BOY_1 1
#define OBJ_EVENT_GFX_ITEM_BALL 2

#define SHADOW_SIZE_S 0
#define SHADOW_SIZE_M 1
#define SHADOW_SIZE_L 2

#define TRACKS_NONE 0
#define TRACKS_FOOT 1
";

pub const EVENT_OBJECTS: &str = r#"{
  "EventObjects": [
    {
      "Identifier": "BrendanNormal",
      "Width": 16,
      "Height": 32,
      "Animations": "gObjectEventImageAnimTable_Standard",
      "Frames": [
        {
          "Identifier": "BrendanWalking",
          "Count": 9
        }
      ]
    },
    {
      "Identifier": "Boy1",
      "Width": 16,
      "Height": 32,
      "Animations": "gObjectEventImageAnimTable_Standard",
      "Frames": [
        {
          "Identifier": "Boy1",
          "Count": 3
        },
        {
          "Identifier": "BrendanWalking",
          "StartIndex": 4
        }
      ]
    },
    {
      "Identifier": "ItemBall",
      "Width": 16,
      "Height": 16,
      "ShadowSize": "S",
      "Inanimate": true,
      "Tracks": "NONE",
      "Animations": "gObjectEventImageAnimTable_Inanimate",
      "Frames": [
        {
          "Identifier": "ItemBall"
        }
      ]
    }
  ],
  "Pics": [
    {
      "Identifier": "BrendanWalking",
      "Path": "people/brendan/walking"
    },
    {
      "Identifier": "Boy1",
      "Path": "people/boy_1"
    },
    {
      "Identifier": "ItemBall",
      "Path": "misc/item_ball"
    }
  ]
}
"#;

pub const SPRITESHEET_RULES: &str = "\
$(OBJEVENTGFXDIR)/people/brendan/walking.4bpp: %.4bpp: %.png
\t$(GFX) $< $@ -mwidth 2 -mheight 4

$(OBJEVENTGFXDIR)/people/boy_1.4bpp: %.4bpp: %.png
\t$(GFX) $< $@ -mwidth 2 -mheight 4

$(OBJEVENTGFXDIR)/misc/unrelated.4bpp: %.4bpp: %.png
\t$(GFX) $< $@ -mwidth 4 -mheight 4
";

pub const MAP_GROUPS: &str = "\
#ifndef GUARD_CONSTANTS_MAP_GROUPS_H
#define GUARD_CONSTANTS_MAP_GROUPS_H

// Map Group gMapGroup_TownsAndRoutes
#define MAP_PETALBURG_CITY (0 | (0 << 8))
#define MAP_ROUTE101 (16 | (0 << 8))
#define MAP_ROUTE102 (17 | (0 << 8))

// Map Group gMapGroup_IndoorLittleroot
#define MAP_LITTLEROOT_TOWN_BRENDANS_HOUSE_1F (0 | (1 << 8))

#endif // GUARD_CONSTANTS_MAP_GROUPS_H
";

pub const WILD_ENCOUNTERS: &str = r#"{
  "HabitatTypes": [
    "FISHING",
    "LAND",
    "WATER"
  ],
  "WildEncounters": [
    {
      "MapName": "ROUTE101",
      "Habitats": [
        {
          "Type": "LAND",
          "EncounterRate": 20,
          "Pokemon": [
            {
              "Species": "SPECIES_POOCHYENA",
              "Occurrences": [
                {
                  "Time": "MORNING",
                  "MidLevel": 3,
                  "LevelRange": 1,
                  "EncounterRate": 30
                },
                {
                  "Time": "NIGHT",
                  "LevelRange": 2,
                  "EncounterRate": 20
                }
              ]
            },
            {
              "Species": "SPECIES_ZIGZAGOON",
              "Occurrences": [
                {
                  "Time": "DAY",
                  "MidLevel": 3,
                  "LevelRange": 1,
                  "EncounterRate": 50
                }
              ]
            }
          ]
        }
      ]
    },
    {
      "MapName": "ROUTE102",
      "Habitats": [
        {
          "Type": "FISHING",
          "EncounterRate": 30,
          "Pokemon": [
            {
              "Species": "SPECIES_WURMPLE",
              "Occurrences": [
                {
                  "Time": "DAY",
                  "MidLevel": 4,
                  "LevelRange": 2,
                  "EncounterRate": 100
                }
              ]
            }
          ]
        }
      ]
    }
  ]
}
"#;

pub const TRAINER_CONSTANTS: &str = "\
#define TRAINER_ENCOUNTER_MUSIC_MALE 0
#define TRAINER_ENCOUNTER_MUSIC_FEMALE 1
#define TRAINER_ENCOUNTER_MUSIC_INTENSE 7
";

pub const BATTLE_AI_CONSTANTS: &str = "\
#define AI_SCRIPT_CHECK_BAD_MOVE (1 << 0)
#define AI_SCRIPT_TRY_TO_FAINT (1 << 1)
#define AI_SCRIPT_CHECK_VIABILITY (1 << 2)
";

pub const TRAINERS: &str = r#"{
  "Classes": [
    {
      "Identifier": "TRAINER_CLASS_YOUNGSTER",
      "Name": "YOUNGSTER",
      "MoneyFactor": 4,
      "Ivs": 0
    },
    {
      "Identifier": "TRAINER_CLASS_LEADER",
      "Name": "LEADER",
      "MoneyFactor": 25,
      "Ivs": 31,
      "Pokeball": "ITEM_POKE_BALL"
    }
  ],
  "Pics": [
    {
      "Identifier": "TRAINER_PIC_YOUNGSTER",
      "Path": "graphics/trainers/front_pics/youngster_front_pic"
    },
    {
      "Identifier": "TRAINER_PIC_LEADER_ROXANNE",
      "Path": "graphics/trainers/front_pics/leader_roxanne_front_pic"
    }
  ],
  "Trainers": [
    {
      "Identifier": "TRAINER_CALVIN_1",
      "Name": "CALVIN",
      "Class": "TRAINER_CLASS_YOUNGSTER",
      "Pic": "TRAINER_PIC_YOUNGSTER",
      "EncounterMusic": "MALE",
      "AIScripts": [
        "CHECK_BAD_MOVE"
      ],
      "Party": [
        {
          "Species": "SPECIES_POOCHYENA",
          "Level": 5
        },
        {
          "Species": "SPECIES_ZIGZAGOON",
          "Level": 6,
          "Iv": 10
        }
      ]
    },
    {
      "Identifier": "TRAINER_ROXANNE_1",
      "Name": "ROXANNE",
      "Class": "TRAINER_CLASS_LEADER",
      "Pic": "TRAINER_PIC_LEADER_ROXANNE",
      "IsFemale": true,
      "EncounterMusic": "FEMALE",
      "AIScripts": [
        "CHECK_BAD_MOVE",
        "TRY_TO_FAINT"
      ],
      "Items": [
        "POTION",
        "POTION"
      ],
      "Party": [
        {
          "Species": "SPECIES_WURMPLE",
          "Level": 12,
          "Iv": 100,
          "HeldItem": "ORAN_BERRY",
          "Moves": [
            "MOVE_TACKLE",
            "MOVE_STRING_SHOT"
          ]
        },
        {
          "Species": "SPECIES_ZIGZAGOON",
          "Level": 14
        }
      ]
    }
  ]
}
"#;

pub const GRAPHICS_INFO: &str = "\
const struct ObjectEventGraphicsInfo *const gObjectEventGraphicsInfoPointers[] = {
    [OBJ_EVENT_GFX_BRENDAN_NORMAL] = &gObjectEventGraphicsInfo_BrendanNormal,
    [OBJ_EVENT_GFX_BOY_1] = &gObjectEventGraphicsInfo_Boy1,
    [OBJ_EVENT_GFX_BOY_10] = &gObjectEventGraphicsInfo_Boy10,
};
";

pub const GRAPHICS_PATHS: &str = "\
const u32 gObjectEventPic_Boy1[] = INCBIN_U32(\"graphics/object_events/pics/people/boy_1.4bpp\");
";

/// A project tree on disk, removed when dropped.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fixture.write("src/data/text/species_names.h", SPECIES_NAMES);
        fixture.write("src/data/items.json", ITEMS);
        fixture.write("src/data/difficulty.json", DIFFICULTY);
        fixture.write("src/data/object_events/object_event_anims.h", ANIM_TABLES);
        fixture.write("include/constants/event_objects.h", EVENT_OBJECT_CONSTANTS);
        fixture.write("src/data/object_events/event_objects.json", EVENT_OBJECTS);
        fixture.write("spritesheet_rules.mk", SPRITESHEET_RULES);
        fixture.write("include/constants/map_groups.h", MAP_GROUPS);
        fixture.write("src/data/wild_encounters.json", WILD_ENCOUNTERS);
        fixture.write("include/constants/trainers.h", TRAINER_CONSTANTS);
        fixture.write("include/constants/battle_ai.h", BATTLE_AI_CONSTANTS);
        fixture.write("src/data/trainers.json", TRAINERS);
        fixture.write(
            "src/data/object_events/object_event_graphics_info_pointers.h",
            GRAPHICS_INFO,
        );
        fixture.write("src/data/object_events/object_event_graphics.h", GRAPHICS_PATHS);

        fixture.png("graphics/object_events/pics/people/brendan/walking.png", 144, 32);
        fixture.png("graphics/object_events/pics/people/boy_1.png", 48, 32);
        fixture.png("graphics/object_events/pics/misc/item_ball.png", 16, 16);
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn png(&self, relative: &str, width: u32, height: u32) {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]))
            .save(path)
            .unwrap();
    }
}

/// Parse `text` as JSON for structural comparison.
pub fn json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}
