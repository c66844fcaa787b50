//! Per-tile collision geometry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessera_core::{EngineError, Result};

/// Axis along which a collision line is measured or an input is sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal axis; a collision line on X is vertical.
    X,
    /// Vertical axis; a collision line on Y is horizontal.
    Y,
}

/// Arithmetic step of a collision function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// `lhs + rhs`.
    Add,
    /// `lhs - rhs`.
    Sub,
    /// `lhs * rhs`.
    Mul,
    /// `lhs / rhs`.
    Div,
}

impl Operation {
    /// Applies the operation.
    #[must_use]
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
        }
    }
}

/// On-disk description of a [`CollisionFunction`].
///
/// The field names form the stable resource schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollisionFunctionConfig {
    /// Name of the function, unique within its collision class.
    pub name: String,
    /// Axis of the produced collision line.
    pub axis: Axis,
    /// Tile-relative probe coordinate fed into the function.
    pub input: Axis,
    /// Primary operation combining the input with `value`.
    pub operation: Operation,
    /// Right-hand operand of the primary operation.
    pub value: f64,
    /// Secondary operation combining the primary result with `offset`.
    #[serde(rename = "operationOffset")]
    pub operation_offset: Operation,
    /// Right-hand operand of the secondary operation.
    pub offset: f64,
    /// Smallest input the function applies to.
    pub min: u32,
    /// Largest input the function applies to.
    pub max: u32,
}

impl CollisionFunctionConfig {
    /// Validates the description, naming `resource` in any error.
    pub fn validate(self, resource: &str) -> Result<CollisionFunction> {
        if self.name.trim().is_empty() {
            return Err(EngineError::parse(resource, "collision function without a name"));
        }
        if self.min > self.max {
            return Err(EngineError::invalid(
                resource,
                format!(
                    "collision function {} has min {} above max {}",
                    self.name, self.min, self.max
                ),
            ));
        }
        for (operation, operand, label) in [
            (self.operation, self.value, "value"),
            (self.operation_offset, self.offset, "offset"),
        ] {
            if !operand.is_finite() {
                return Err(EngineError::invalid(
                    resource,
                    format!("collision function {} has a non-finite {label}", self.name),
                ));
            }
            if operation == Operation::Div && operand == 0.0 {
                return Err(EngineError::invalid(
                    resource,
                    format!("collision function {} divides by a zero {label}", self.name),
                ));
            }
        }

        Ok(CollisionFunction {
            name: self.name,
            axis: self.axis,
            input: self.input,
            operation: self.operation,
            value: self.value,
            operation_offset: self.operation_offset,
            offset: self.offset,
            min: self.min,
            max: self.max,
        })
    }
}

/// Piecewise rule mapping a probe's in-tile coordinate to a collision line.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionFunction {
    name: String,
    axis: Axis,
    input: Axis,
    operation: Operation,
    value: f64,
    operation_offset: Operation,
    offset: f64,
    min: u32,
    max: u32,
}

impl CollisionFunction {
    /// Name of the function.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axis of the produced line.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Axis the input is sampled on.
    #[must_use]
    pub const fn input(&self) -> Axis {
        self.input
    }

    /// Reports whether the tile-relative input lies in `[min, max]`.
    #[must_use]
    pub fn accepts(&self, input: u32) -> bool {
        (self.min..=self.max).contains(&input)
    }

    /// Evaluates the line offset relative to the tile origin.
    #[must_use]
    pub fn compute(&self, input: f64) -> f64 {
        let primary = self.operation.apply(input, self.value);
        self.operation_offset.apply(primary, self.offset)
    }

    /// Rate at which the line moves per unit of input.
    ///
    /// Used to widen the crossing test on Y for diagonal movement.
    #[must_use]
    pub fn slope(&self) -> f64 {
        match self.operation {
            Operation::Mul => self.value.abs(),
            Operation::Div => (1.0 / self.value).abs(),
            Operation::Add | Operation::Sub => 0.0,
        }
    }
}

/// Index of a [`CollisionClass`] inside its [`CollisionTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionId(u16);

impl CollisionId {
    /// Identifier of the class without collision functions.
    pub const NONE: Self = Self(0);

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Named collision classification shared by every tile that carries it.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionClass {
    id: CollisionId,
    name: String,
    functions: Vec<CollisionFunction>,
}

impl CollisionClass {
    /// Identifier within the owning table.
    #[must_use]
    pub const fn id(&self) -> CollisionId {
        self.id
    }

    /// Name of the class.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Functions in declaration order.
    #[must_use]
    pub fn functions(&self) -> &[CollisionFunction] {
        &self.functions
    }

    /// Reports whether the class can never produce a hit.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Name of the class every table reserves at [`CollisionId::NONE`].
pub const NONE_CLASS: &str = "none";

/// Registry of the collision classes used by a map.
#[derive(Clone, Debug)]
pub struct CollisionTable {
    classes: Vec<Arc<CollisionClass>>,
}

impl Default for CollisionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionTable {
    /// Creates a table holding only the `none` class.
    #[must_use]
    pub fn new() -> Self {
        Self {
            classes: vec![Arc::new(CollisionClass {
                id: CollisionId::NONE,
                name: NONE_CLASS.to_owned(),
                functions: Vec::new(),
            })],
        }
    }

    /// Registers a class, rejecting duplicate names.
    pub fn insert(
        &mut self,
        resource: &str,
        name: &str,
        functions: Vec<CollisionFunction>,
    ) -> Result<CollisionId> {
        if self.by_name(name).is_some() {
            return Err(EngineError::invalid(
                resource,
                format!("collision class {name} is declared twice"),
            ));
        }
        let raw = u16::try_from(self.classes.len())
            .map_err(|_| EngineError::invalid(resource, "too many collision classes"))?;
        let id = CollisionId(raw);
        self.classes.push(Arc::new(CollisionClass {
            id,
            name: name.to_owned(),
            functions,
        }));
        Ok(id)
    }

    /// Class without collision functions.
    #[must_use]
    pub fn none(&self) -> &Arc<CollisionClass> {
        &self.classes[0]
    }

    /// Looks a class up by identifier.
    #[must_use]
    pub fn get(&self, id: CollisionId) -> Option<&Arc<CollisionClass>> {
        self.classes.get(usize::from(id.0))
    }

    /// Looks a class up by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Arc<CollisionClass>> {
        self.classes.iter().find(|class| class.name == name)
    }

    /// Resolves several names at once; unknown names are reported.
    pub fn ids(&self, names: &[&str]) -> Result<Vec<CollisionId>> {
        names
            .iter()
            .map(|name| {
                self.by_name(name).map(|class| class.id).ok_or_else(|| {
                    EngineError::invalid(
                        "collision query",
                        format!("unknown collision class {name}"),
                    )
                })
            })
            .collect()
    }

    /// Iterates over every class, `none` first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CollisionClass>> {
        self.classes.iter()
    }
}
