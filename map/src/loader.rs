//! Builds maps from sheet, group, collision and level resources.

use std::{collections::HashMap, sync::Arc};

use tessera_core::{check_version, EngineError, Media, ResourceRoot, Result};
use tracing::{debug, warn};

use crate::{
    collision::{CollisionClass, CollisionFunction, CollisionTable},
    config::{
        CollisionsConfig, ConstraintsConfig, GroupsConfig, LevelConfig, SheetsConfig,
        TransitionsConfig,
    },
    group::{Orientation, TileConstraints, TileGroup, TileGroups, TileTransitions, Transition},
    map::MapTile,
    tile::{SheetId, Tile},
};

/// Resource handles describing a tile set.
///
/// Constraints and transitions are optional; missing files load as empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapResources {
    /// Tile sheets and tile size.
    pub sheets: Media,
    /// Tile groups.
    pub groups: Media,
    /// Collision classes.
    pub collisions: Media,
    /// Neighbour constraints.
    pub constraints: Media,
    /// Transition tiles.
    pub transitions: Media,
}

impl MapResources {
    /// Conventional resource names under `root`.
    #[must_use]
    pub fn standard(root: &ResourceRoot) -> Self {
        Self {
            sheets: root.media("sheets.toml"),
            groups: root.media("groups.toml"),
            collisions: root.media("collisions.toml"),
            constraints: root.media("constraints.toml"),
            transitions: root.media("transitions.toml"),
        }
    }
}

/// Tile placed next to a neighbour its group does not allow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Column of the constrained tile.
    pub tx: u32,
    /// Row of the constrained tile.
    pub ty: u32,
    /// Side on which the offending neighbour sits.
    pub orientation: Orientation,
    /// Group of the constrained tile.
    pub group: String,
    /// Group of the offending neighbour.
    pub neighbour: String,
}

/// Validated tile set description, ready to build any number of levels.
#[derive(Clone, Debug)]
pub struct MapLoader {
    tile_width: u32,
    tile_height: u32,
    sheets: Vec<Media>,
    groups: TileGroups,
    constraints: TileConstraints,
    transitions: TileTransitions,
    collisions: CollisionTable,
    classes_by_group: HashMap<String, Arc<CollisionClass>>,
}

impl MapLoader {
    /// Reads and validates every tile set resource.
    pub fn from_resources(root: &ResourceRoot, resources: &MapResources) -> Result<Self> {
        let sheets: SheetsConfig = read_versioned(&resources.sheets, |c: &SheetsConfig| c.version)?;
        let groups: GroupsConfig = read_versioned(&resources.groups, |c: &GroupsConfig| c.version)?;
        let collisions: CollisionsConfig =
            read_versioned(&resources.collisions, |c: &CollisionsConfig| c.version)?;
        let constraints = if resources.constraints.exists() {
            read_versioned(&resources.constraints, |c: &ConstraintsConfig| c.version)?
        } else {
            ConstraintsConfig {
                version: tessera_core::RESOURCE_VERSION,
                constraints: Vec::new(),
            }
        };
        let transitions = if resources.transitions.exists() {
            read_versioned(&resources.transitions, |c: &TransitionsConfig| c.version)?
        } else {
            TransitionsConfig {
                version: tessera_core::RESOURCE_VERSION,
                transitions: Vec::new(),
            }
        };

        let loader = Self::from_configs(
            root,
            resources,
            sheets,
            groups,
            collisions,
            constraints,
            transitions,
        )?;
        debug!(
            sheets = loader.sheets.len(),
            classes = loader.collisions.iter().count(),
            "loaded tile set"
        );
        Ok(loader)
    }

    /// Validates already decoded tile set documents.
    pub fn from_configs(
        root: &ResourceRoot,
        resources: &MapResources,
        sheets: SheetsConfig,
        groups: GroupsConfig,
        collisions: CollisionsConfig,
        constraints: ConstraintsConfig,
        transitions: TransitionsConfig,
    ) -> Result<Self> {
        let sheets_name = resources.sheets.name();
        if sheets.tile_width == 0 || sheets.tile_height == 0 {
            return Err(EngineError::invalid(
                sheets_name,
                format!(
                    "tile size {}x{} must be positive",
                    sheets.tile_width, sheets.tile_height
                ),
            ));
        }

        let groups = build_groups(resources.groups.name(), groups, sheets.sheets.len())?;
        let (collisions, classes_by_group) =
            build_collisions(resources.collisions.name(), collisions, &groups)?;
        let constraints = build_constraints(resources.constraints.name(), constraints, &groups)?;
        let transitions = build_transitions(resources.transitions.name(), transitions, &groups)?;

        Ok(Self {
            tile_width: sheets.tile_width,
            tile_height: sheets.tile_height,
            sheets: sheets.sheets.iter().map(|name| root.media(name)).collect(),
            groups,
            constraints,
            transitions,
            collisions,
            classes_by_group,
        })
    }

    /// Tile width in pixels.
    #[must_use]
    pub const fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Tile height in pixels.
    #[must_use]
    pub const fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Sheet images indexed by sheet id.
    #[must_use]
    pub fn sheets(&self) -> &[Media] {
        &self.sheets
    }

    /// Collision classes of the tile set.
    #[must_use]
    pub fn collisions(&self) -> &CollisionTable {
        &self.collisions
    }

    /// Reads a level resource and builds its map.
    pub fn load_level(&self, level: &Media) -> Result<MapTile> {
        let config: LevelConfig = read_versioned(level, |c: &LevelConfig| c.version)?;
        self.build(level.name(), &config)
    }

    /// Builds the map described by a decoded level.
    pub fn build(&self, resource: &str, level: &LevelConfig) -> Result<MapTile> {
        let mut map = MapTile::new(level.width, level.height, self.tile_width, self.tile_height)
            .map_err(|error| EngineError::invalid(resource, error.to_string()))?;
        map.set_collisions(self.collisions.clone());
        map.set_layout(
            self.groups.clone(),
            self.constraints.clone(),
            self.transitions.clone(),
        );

        let mut ungrouped = 0_usize;
        for placed in &level.tiles {
            if usize::try_from(placed.sheet).map_or(true, |sheet| sheet >= self.sheets.len()) {
                return Err(EngineError::invalid(
                    resource,
                    format!(
                        "tile at {},{} references unknown sheet {}",
                        placed.x, placed.y, placed.sheet
                    ),
                ));
            }

            let sheet = SheetId::new(placed.sheet);
            let group = self.groups.group_of(sheet, placed.number);
            let collision = match group {
                Some(group) => self
                    .classes_by_group
                    .get(group.name())
                    .map_or_else(|| Arc::clone(self.collisions.none()), Arc::clone),
                None => {
                    ungrouped += 1;
                    Arc::clone(self.collisions.none())
                }
            };

            let mut tile = Tile::new(
                placed.x,
                placed.y,
                (self.tile_width, self.tile_height),
                sheet,
                placed.number,
                collision,
            );
            tile.set_group(group.map(TileGroup::shared_name));

            let replaced = map
                .set_tile(tile)
                .map_err(|error| EngineError::invalid(resource, error.to_string()))?;
            if replaced.is_some() {
                warn!(level = resource, x = placed.x, y = placed.y, "tile placed twice");
            }
        }

        if ungrouped > 0 {
            warn!(
                level = resource,
                tiles = ungrouped,
                "tiles outside any known group carry no collision"
            );
        }
        debug!(
            level = resource,
            columns = level.width,
            rows = level.height,
            tiles = level.tiles.len(),
            "built map"
        );
        Ok(map)
    }

    /// Neighbour pairs of a map that break the declared constraints.
    #[must_use]
    pub fn violations(&self, map: &MapTile) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        for tile in map.tiles() {
            let Some(group) = tile.group() else {
                continue;
            };
            for orientation in Orientation::ALL {
                let (dx, dy) = orientation.offset();
                let neighbour = neighbour_of(tile, dx, dy).and_then(|(nx, ny)| map.tile(nx, ny));
                let Some(other) = neighbour.and_then(Tile::group) else {
                    continue;
                };
                if !self.constraints.is_allowed(group, orientation, other) {
                    violations.push(ConstraintViolation {
                        tx: tile.tx(),
                        ty: tile.ty(),
                        orientation,
                        group: group.to_owned(),
                        neighbour: other.to_owned(),
                    });
                }
            }
        }
        violations
    }
}

fn neighbour_of(tile: &Tile, dx: i64, dy: i64) -> Option<(u32, u32)> {
    let x = u32::try_from(i64::from(tile.tx()) + dx).ok()?;
    let y = u32::try_from(i64::from(tile.ty()) + dy).ok()?;
    Some((x, y))
}

fn read_versioned<T>(media: &Media, version: impl Fn(&T) -> u32) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let config: T = media.read_config()?;
    check_version(media.name(), version(&config))?;
    Ok(config)
}

fn build_groups(resource: &str, config: GroupsConfig, sheet_count: usize) -> Result<TileGroups> {
    let mut groups = Vec::with_capacity(config.groups.len());
    for group in config.groups {
        if group.name.trim().is_empty() {
            return Err(EngineError::parse(resource, "tile group without a name"));
        }
        if groups.iter().any(|known: &TileGroup| known.name() == group.name) {
            return Err(EngineError::invalid(
                resource,
                format!("tile group {} is declared twice", group.name),
            ));
        }
        for range in &group.tiles {
            if range.start > range.end {
                return Err(EngineError::invalid(
                    resource,
                    format!(
                        "tile group {} has range {}..{} running backwards",
                        group.name, range.start, range.end
                    ),
                ));
            }
            if usize::try_from(range.sheet).map_or(true, |sheet| sheet >= sheet_count) {
                return Err(EngineError::invalid(
                    resource,
                    format!(
                        "tile group {} references unknown sheet {}",
                        group.name, range.sheet
                    ),
                ));
            }
        }
        groups.push(TileGroup::new(&group.name, group.tiles));
    }
    Ok(TileGroups::new(groups))
}

fn build_collisions(
    resource: &str,
    config: CollisionsConfig,
    groups: &TileGroups,
) -> Result<(CollisionTable, HashMap<String, Arc<CollisionClass>>)> {
    let mut table = CollisionTable::new();
    let mut by_group = HashMap::new();

    for class in config.collisions {
        let functions = class
            .functions
            .into_iter()
            .map(|function| function.validate(resource))
            .collect::<Result<Vec<CollisionFunction>>>()?;
        let id = table.insert(resource, &class.name, functions)?;
        let shared = table
            .get(id)
            .map(Arc::clone)
            .ok_or_else(|| EngineError::invalid(resource, "collision class vanished"))?;

        for group in class.groups {
            if groups.by_name(&group).is_none() {
                return Err(EngineError::invalid(
                    resource,
                    format!(
                        "collision class {} references unknown group {group}",
                        class.name
                    ),
                ));
            }
            if let Some(previous) = by_group.insert(group.clone(), Arc::clone(&shared)) {
                return Err(EngineError::invalid(
                    resource,
                    format!(
                        "group {group} belongs to both {} and {}",
                        previous.name(),
                        class.name
                    ),
                ));
            }
        }
    }
    Ok((table, by_group))
}

fn build_constraints(
    resource: &str,
    config: ConstraintsConfig,
    groups: &TileGroups,
) -> Result<TileConstraints> {
    let mut constraints = TileConstraints::new();
    for constraint in config.constraints {
        for name in std::iter::once(&constraint.group).chain(&constraint.allowed) {
            if groups.by_name(name).is_none() {
                return Err(EngineError::invalid(
                    resource,
                    format!("constraint references unknown group {name}"),
                ));
            }
        }
        let allowed: Vec<&str> = constraint.allowed.iter().map(String::as_str).collect();
        constraints.allow(&constraint.group, constraint.orientation, &allowed);
    }
    Ok(constraints)
}

fn build_transitions(
    resource: &str,
    config: TransitionsConfig,
    groups: &TileGroups,
) -> Result<TileTransitions> {
    let mut transitions = TileTransitions::new();
    for transition in config.transitions {
        for name in [&transition.in_group, &transition.out_group] {
            if groups.by_name(name).is_none() {
                return Err(EngineError::invalid(
                    resource,
                    format!("transition references unknown group {name}"),
                ));
            }
        }
        let sheet = SheetId::new(transition.sheet);
        let replaced = transitions.insert(
            sheet,
            transition.number,
            Transition {
                kind: transition.kind,
                in_group: transition.in_group,
                out_group: transition.out_group,
            },
        );
        if replaced.is_some() {
            warn!(
                resource,
                sheet = transition.sheet,
                number = transition.number,
                "transition declared twice"
            );
        }
    }
    Ok(transitions)
}
