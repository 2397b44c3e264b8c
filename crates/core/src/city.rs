//! The virtual city: positions, NPC dialogues, and the layout every user
//! starts with.

use serde::{Deserialize, Serialize};

/// Grid position on the city map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// One line an NPC can say, with the replies offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    pub text: String,
    #[serde(default)]
    pub responses: Vec<String>,
    #[serde(default)]
    pub conditions: serde_json::Value,
}

pub struct BuildingBlueprint {
    pub building_type: &'static str,
    pub name: &'static str,
    pub position: Position,
    pub description: &'static str,
}

pub struct NpcBlueprint {
    pub name: &'static str,
    pub role: &'static str,
    pub position: Position,
    pub dialogues: &'static [(&'static str, &'static [&'static str])],
}

/// Level a new city starts at.
pub const STARTING_CITY_LEVEL: i32 = 1;

/// Buildings placed in every new city, unlocked from the start.
pub const DEFAULT_BUILDINGS: &[BuildingBlueprint] = &[
    BuildingBlueprint {
        building_type: "headquarters",
        name: "NOVA HQ",
        position: Position { x: 50, y: 50 },
        description: "The centre of your NOVA city. All strategies and plans are managed here.",
    },
    BuildingBlueprint {
        building_type: "temple",
        name: "Temple of Reflection",
        position: Position { x: 30, y: 70 },
        description: "A place for meditation and self-reflection.",
    },
    BuildingBlueprint {
        building_type: "academy",
        name: "Academy of Knowledge",
        position: Position { x: 70, y: 30 },
        description: "New skills are learned and improved here.",
    },
];

/// NPCs living in every new city.
pub const DEFAULT_NPCS: &[NpcBlueprint] = &[NpcBlueprint {
    name: "Master Kaelos",
    role: "Mentor",
    position: Position { x: 55, y: 55 },
    dialogues: &[
        (
            "Welcome to your NOVA city! I am Master Kaelos, your mentor on this journey of self-development.",
            &["Thanks for the welcome!", "How does this system work?"],
        ),
        (
            "NOVA is a system for personal growth. Through quests, reflections and deliberate action you earn XP and develop your skills.",
            &["Got it!", "Where should I start?"],
        ),
    ],
}];

impl NpcBlueprint {
    /// Materialise the blueprint's dialogue lines.
    pub fn dialogues(&self) -> Vec<Dialogue> {
        self.dialogues
            .iter()
            .map(|(text, responses)| Dialogue {
                text: text.to_string(),
                responses: responses.iter().map(|r| r.to_string()).collect(),
                conditions: serde_json::json!({}),
            })
            .collect()
    }
}
