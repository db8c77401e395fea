//! Per-variable listings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Centering, NumericKind};

fn one() -> usize {
    1
}

fn cell() -> Centering {
    Centering::Cell
}

/// A variable listed for one timestep.
///
/// Material ids are carried through for the mesh-assembly layer; the
/// decomposition and retrieval core does not consume them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableInfo {
    /// The variable name.
    pub name: String,
    /// The numeric kind of the samples.
    pub kind: NumericKind,
    /// The sample placement convention.
    #[serde(default = "cell")]
    pub centering: Centering,
    /// Whether the variable is vector-valued.
    #[serde(default)]
    pub vector: bool,
    /// The number of interleaved components per sample.
    #[serde(default = "one")]
    pub num_components: usize,
    /// The material ids present in the variable.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub materials: BTreeSet<i32>,
}

/// What a backend reports for one field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptor {
    /// The field name.
    pub name: String,
    /// The numeric kind of the samples.
    pub kind: NumericKind,
    /// The sample placement convention.
    #[serde(default = "cell")]
    pub centering: Centering,
    /// Whether the field is vector-valued.
    #[serde(default)]
    pub vector: bool,
    /// The number of interleaved components per sample.
    #[serde(default = "one")]
    pub num_components: usize,
}

impl VariableInfo {
    /// The backend field descriptor of the variable.
    #[must_use]
    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name.clone(),
            kind: self.kind,
            centering: self.centering,
            vector: self.vector,
            num_components: self.num_components,
        }
    }
}

impl From<FieldDescriptor> for VariableInfo {
    fn from(field: FieldDescriptor) -> Self {
        Self {
            name: field.name,
            kind: field.kind,
            centering: field.centering,
            vector: field.vector,
            num_components: field.num_components,
            materials: BTreeSet::new(),
        }
    }
}
