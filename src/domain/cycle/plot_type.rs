//! Per-cycle chart selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a cycle's progress chart is drawn.
///
/// `Points` only makes sense when the project estimates issues; without
/// estimates every lookup resolves to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePlotType {
    #[default]
    Burndown,
    Points,
}

impl fmt::Display for CyclePlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CyclePlotType::Burndown => f.write_str("burndown"),
            CyclePlotType::Points => f.write_str("points"),
        }
    }
}
