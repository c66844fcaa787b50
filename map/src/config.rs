//! On-disk resource schemas consumed by the map loader.
//!
//! Every document carries a `version` field checked against
//! [`tessera_core::RESOURCE_VERSION`].

use serde::{Deserialize, Serialize};

use crate::{
    collision::CollisionFunctionConfig,
    group::{Orientation, TileRange, TransitionKind},
};

/// Tile sheet list and the shared tile size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetsConfig {
    /// Schema version.
    pub version: u32,
    /// Width of a tile in pixels.
    pub tile_width: u32,
    /// Height of a tile in pixels.
    pub tile_height: u32,
    /// Sheet image names relative to the resource root, indexed by sheet id.
    pub sheets: Vec<String>,
}

/// Tile group declarations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupsConfig {
    /// Schema version.
    pub version: u32,
    /// Declared groups.
    #[serde(rename = "group", default)]
    pub groups: Vec<GroupConfig>,
}

/// One `[[group]]` entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Unique group name.
    pub name: String,
    /// Tile ranges covered by the group.
    #[serde(default)]
    pub tiles: Vec<TileRange>,
}

/// Neighbour constraint declarations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintsConfig {
    /// Schema version.
    pub version: u32,
    /// Declared constraints.
    #[serde(rename = "constraint", default)]
    pub constraints: Vec<ConstraintConfig>,
}

/// One `[[constraint]]` entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintConfig {
    /// Group the constraint applies to.
    pub group: String,
    /// Side of the group's tiles the constraint governs.
    pub orientation: Orientation,
    /// Groups allowed on that side.
    pub allowed: Vec<String>,
}

/// Transition tile declarations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionsConfig {
    /// Schema version.
    pub version: u32,
    /// Declared transitions.
    #[serde(rename = "transition", default)]
    pub transitions: Vec<TransitionConfig>,
}

/// One `[[transition]]` entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionConfig {
    /// Sheet of the tile graphic.
    pub sheet: u32,
    /// Number of the tile graphic.
    pub number: u32,
    /// Shape of the transition.
    pub kind: TransitionKind,
    /// Group the tile belongs to.
    pub in_group: String,
    /// Group the tile blends into.
    pub out_group: String,
}

/// Collision class declarations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollisionsConfig {
    /// Schema version.
    pub version: u32,
    /// Declared collision classes.
    #[serde(rename = "collision", default)]
    pub collisions: Vec<CollisionClassConfig>,
}

/// One `[[collision]]` entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollisionClassConfig {
    /// Unique class name.
    pub name: String,
    /// Tile groups whose tiles carry the class.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Collision functions in evaluation order.
    #[serde(rename = "function", default)]
    pub functions: Vec<CollisionFunctionConfig>,
}

/// Level layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    /// Schema version.
    pub version: u32,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Placed tiles; unlisted cells stay empty.
    #[serde(rename = "tile", default)]
    pub tiles: Vec<LevelTileConfig>,
}

/// One `[[tile]]` entry of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelTileConfig {
    /// Column in tiles.
    pub x: u32,
    /// Row in tiles.
    pub y: u32,
    /// Sheet of the tile graphic.
    pub sheet: u32,
    /// Number of the tile graphic.
    pub number: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Axis, Operation};

    #[test]
    fn collision_document_uses_stable_field_names() {
        let document = r#"
            version = 1

            [[collision]]
            name = "ground"
            groups = ["grass"]

            [[collision.function]]
            name = "top"
            axis = "y"
            input = "x"
            operation = "mul"
            value = 0.0
            operationOffset = "add"
            offset = 0.0
            min = 0
            max = 15
        "#;
        let config: CollisionsConfig = toml::from_str(document).expect("valid document");
        let class = &config.collisions[0];
        assert_eq!(class.groups, vec!["grass".to_owned()]);
        assert_eq!(class.functions[0].axis, Axis::Y);
        assert_eq!(class.functions[0].operation_offset, Operation::Add);
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let document = r#"
            version = 1

            [[constraint]]
            group = "water"
            orientation = "up"
            allowed = []
        "#;
        assert!(toml::from_str::<ConstraintsConfig>(document).is_err());
    }

    #[test]
    fn level_tiles_default_to_empty() {
        let level: LevelConfig =
            toml::from_str("version = 1\nwidth = 3\nheight = 2\n").expect("valid level");
        assert!(level.tiles.is_empty());
    }
}
