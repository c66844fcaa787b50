//! Tile groups, neighbour constraints and transitions.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::tile::SheetId;

/// Inclusive range of tile numbers within one sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileRange {
    /// Sheet the range belongs to.
    pub sheet: u32,
    /// First tile number of the range.
    pub start: u32,
    /// Last tile number of the range.
    pub end: u32,
}

impl TileRange {
    /// Reports whether the range covers the tile.
    #[must_use]
    pub fn contains(&self, sheet: SheetId, number: u32) -> bool {
        self.sheet == sheet.get() && (self.start..=self.end).contains(&number)
    }
}

/// Named set of tiles sharing a purpose, such as "ground" or "water".
#[derive(Clone, Debug, PartialEq)]
pub struct TileGroup {
    name: Arc<str>,
    ranges: Vec<TileRange>,
}

impl TileGroup {
    /// Creates a group covering the provided ranges.
    #[must_use]
    pub fn new(name: &str, ranges: Vec<TileRange>) -> Self {
        Self {
            name: Arc::from(name),
            ranges,
        }
    }

    /// Name of the group.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle onto the group name, as stored by tiles.
    #[must_use]
    pub fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Reports whether the group contains the tile.
    #[must_use]
    pub fn contains(&self, sheet: SheetId, number: u32) -> bool {
        self.ranges.iter().any(|range| range.contains(sheet, number))
    }
}

/// Every tile group of a map, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileGroups {
    groups: Vec<TileGroup>,
}

impl TileGroups {
    /// Creates a collection from the provided groups.
    #[must_use]
    pub fn new(groups: Vec<TileGroup>) -> Self {
        Self { groups }
    }

    /// First group containing the tile.
    #[must_use]
    pub fn group_of(&self, sheet: SheetId, number: u32) -> Option<&TileGroup> {
        self.groups.iter().find(|group| group.contains(sheet, number))
    }

    /// Looks a group up by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&TileGroup> {
        self.groups.iter().find(|group| group.name() == name)
    }

    /// Iterates over the groups.
    pub fn iter(&self) -> impl Iterator<Item = &TileGroup> {
        self.groups.iter()
    }
}

/// Side of a tile a neighbour sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Neighbour above.
    North,
    /// Neighbour to the right.
    East,
    /// Neighbour below.
    South,
    /// Neighbour to the left.
    West,
}

impl Orientation {
    /// Every orientation in clockwise order starting north.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Tile-unit offset toward the neighbour.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Allowed neighbour groups per group and orientation.
///
/// A pair without a declared constraint accepts any neighbour.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileConstraints {
    allowed: HashMap<(String, Orientation), HashSet<String>>,
}

impl TileConstraints {
    /// Creates an empty constraint set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the neighbours allowed on one side of a group.
    pub fn allow(&mut self, group: &str, orientation: Orientation, neighbours: &[&str]) {
        self.allowed
            .entry((group.to_owned(), orientation))
            .or_default()
            .extend(neighbours.iter().map(|name| (*name).to_owned()));
    }

    /// Reports whether `neighbour` may sit on the `orientation` side of `group`.
    #[must_use]
    pub fn is_allowed(&self, group: &str, orientation: Orientation, neighbour: &str) -> bool {
        self.allowed
            .get(&(group.to_owned(), orientation))
            .map_or(true, |allowed| allowed.contains(neighbour))
    }

    /// Reports whether no constraint was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// Shape of a transition tile between two groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Fully inside the inner group.
    Center,
    /// Outer group above.
    Up,
    /// Outer group below.
    Down,
    /// Outer group to the left.
    Left,
    /// Outer group to the right.
    Right,
    /// Outer group above and to the left.
    UpLeft,
    /// Outer group above and to the right.
    UpRight,
    /// Outer group below and to the left.
    DownLeft,
    /// Outer group below and to the right.
    DownRight,
    /// Outer group only in the upper-left corner.
    CornerUpLeft,
    /// Outer group only in the upper-right corner.
    CornerUpRight,
    /// Outer group only in the lower-left corner.
    CornerDownLeft,
    /// Outer group only in the lower-right corner.
    CornerDownRight,
}

/// Transition carried by a single tile graphic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Shape of the transition.
    pub kind: TransitionKind,
    /// Group the tile belongs to.
    pub in_group: String,
    /// Group the tile blends into.
    pub out_group: String,
}

/// Transition lookup keyed by tile graphic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileTransitions {
    transitions: HashMap<(SheetId, u32), Transition>,
}

impl TileTransitions {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the transition of a tile graphic, returning the replaced one.
    pub fn insert(&mut self, sheet: SheetId, number: u32, transition: Transition) -> Option<Transition> {
        self.transitions.insert((sheet, number), transition)
    }

    /// Transition of a tile graphic, if declared.
    #[must_use]
    pub fn transition(&self, sheet: SheetId, number: u32) -> Option<&Transition> {
        self.transitions.get(&(sheet, number))
    }

    /// Tile graphics implementing the transition between two groups.
    pub fn tiles_for<'a>(
        &'a self,
        kind: TransitionKind,
        in_group: &'a str,
        out_group: &'a str,
    ) -> impl Iterator<Item = (SheetId, u32)> + 'a {
        self.transitions
            .iter()
            .filter(move |(_, transition)| {
                transition.kind == kind
                    && transition.in_group == in_group
                    && transition.out_group == out_group
            })
            .map(|(key, _)| *key)
    }
}
