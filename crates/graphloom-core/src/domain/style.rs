//! Workspace style and the background action it implies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a workspace organizes its documents.
///
/// - `Zettel`: auto-linking active
/// - `Generic`, `Para`: auto-linking suppressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceStyle {
    Generic,
    Para,
    Zettel,
}

/// Background work a restyle dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestyleAction {
    /// Re-run similarity linking over the whole workspace.
    AutoConnect,

    /// Drop every pending suggestion.
    ClearPending,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported workspace style {0:?}, choose one of 'zettel', 'generic', 'para'")]
pub struct UnknownStyle(pub String);

impl WorkspaceStyle {
    pub const ALL: [WorkspaceStyle; 3] = [
        WorkspaceStyle::Generic,
        WorkspaceStyle::Para,
        WorkspaceStyle::Zettel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkspaceStyle::Generic => "generic",
            WorkspaceStyle::Para => "para",
            WorkspaceStyle::Zettel => "zettel",
        }
    }

    pub fn restyle_action(self) -> RestyleAction {
        match self {
            WorkspaceStyle::Zettel => RestyleAction::AutoConnect,
            WorkspaceStyle::Generic | WorkspaceStyle::Para => RestyleAction::ClearPending,
        }
    }
}

impl fmt::Display for WorkspaceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, surrounding whitespace ignored.
impl FromStr for WorkspaceStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        WorkspaceStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .ok_or(UnknownStyle(normalized))
    }
}
