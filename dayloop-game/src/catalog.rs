//! Static room and object catalog.
//!
//! The catalog is built once per process and never mutated. Object ids are
//! globally unique because completion tracking is keyed by id alone.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Closed set of rooms the character can stand in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Room {
    #[default]
    Bedroom,
    Living,
    Kitchen,
    Gym,
    Bathroom,
}

impl Room {
    pub const ALL: [Self; 5] = [
        Self::Bedroom,
        Self::Living,
        Self::Kitchen,
        Self::Gym,
        Self::Bathroom,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bedroom => "bedroom",
            Self::Living => "living",
            Self::Kitchen => "kitchen",
            Self::Gym => "gym",
            Self::Bathroom => "bathroom",
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown room `{0}`")]
pub struct ParseRoomError(pub String);

impl FromStr for Room {
    type Err = ParseRoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|room| room.as_str() == s)
            .ok_or_else(|| ParseRoomError(s.to_string()))
    }
}

/// Fixed vocabulary of actions an object can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Sleep,
    Relax,
    Dress,
    Watch,
    Read,
    Eat,
    Snack,
    Cook,
    Workout,
    Cardio,
    Stretch,
    Shower,
    Brush,
    Skincare,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Relax => "relax",
            Self::Dress => "dress",
            Self::Watch => "watch",
            Self::Read => "read",
            Self::Eat => "eat",
            Self::Snack => "snack",
            Self::Cook => "cook",
            Self::Workout => "workout",
            Self::Cardio => "cardio",
            Self::Stretch => "stretch",
            Self::Shower => "shower",
            Self::Brush => "brush",
            Self::Skincare => "skincare",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An interactive object placed in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomObject {
    pub id: &'static str,
    pub name: &'static str,
    pub action: Action,
    /// Presentation hint (icon/glyph) for the rendering layer.
    pub marker: &'static str,
}

impl RoomObject {
    const fn new(
        id: &'static str,
        name: &'static str,
        action: Action,
        marker: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            action,
            marker,
        }
    }
}

const BEDROOM: &[RoomObject] = &[
    RoomObject::new("bed", "Bed", Action::Sleep, "🛏️"),
    RoomObject::new("wardrobe", "Wardrobe", Action::Dress, "👔"),
    RoomObject::new("nightstand", "Nightstand", Action::Read, "📖"),
];

const LIVING: &[RoomObject] = &[
    RoomObject::new("sofa", "Sofa", Action::Relax, "🛋️"),
    RoomObject::new("tv", "Television", Action::Watch, "📺"),
    RoomObject::new("bookshelf", "Bookshelf", Action::Read, "📚"),
];

const KITCHEN: &[RoomObject] = &[
    RoomObject::new("table", "Dining Table", Action::Eat, "🍽️"),
    RoomObject::new("stove", "Stove", Action::Cook, "🍳"),
    RoomObject::new("fridge", "Fridge", Action::Snack, "🧊"),
];

const GYM: &[RoomObject] = &[
    RoomObject::new("treadmill", "Treadmill", Action::Cardio, "🏃"),
    RoomObject::new("weights", "Weights", Action::Workout, "🏋️"),
    RoomObject::new("yoga_mat", "Yoga Mat", Action::Stretch, "🧘"),
];

const BATHROOM: &[RoomObject] = &[
    RoomObject::new("shower", "Shower", Action::Shower, "🚿"),
    RoomObject::new("sink", "Sink", Action::Brush, "🪥"),
    RoomObject::new("mirror", "Mirror", Action::Skincare, "🪞"),
];

/// Read-only lookup over every room's objects.
#[derive(Debug)]
pub struct Catalog {
    index: HashMap<&'static str, (Room, &'static RoomObject)>,
}

impl Catalog {
    /// Process-wide catalog instance.
    #[must_use]
    pub fn global() -> &'static Self {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Self::build)
    }

    fn build() -> Self {
        let index = Room::ALL
            .into_iter()
            .flat_map(|room| {
                Self::room_objects(room)
                    .iter()
                    .map(move |object| (object.id, (room, object)))
            })
            .collect();
        Self { index }
    }

    const fn room_objects(room: Room) -> &'static [RoomObject] {
        match room {
            Room::Bedroom => BEDROOM,
            Room::Living => LIVING,
            Room::Kitchen => KITCHEN,
            Room::Gym => GYM,
            Room::Bathroom => BATHROOM,
        }
    }

    /// Objects in `room`, in display order.
    #[must_use]
    pub const fn objects_in(&self, room: Room) -> &'static [RoomObject] {
        Self::room_objects(room)
    }

    /// Resolve an object id to the room it lives in and its definition.
    #[must_use]
    pub fn find_object(&self, id: &str) -> Option<(Room, &'static RoomObject)> {
        self.index.get(id).copied()
    }

    /// Total number of objects across all rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Every object paired with its room, rooms in [`Room::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Room, &'static RoomObject)> + '_ {
        Room::ALL.into_iter().flat_map(|room| {
            Self::room_objects(room)
                .iter()
                .map(move |object| (room, object))
        })
    }
}
