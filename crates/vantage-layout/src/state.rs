//! Per-view placement phases
//!
//! Tabbed location:
//! ```text
//! Detached
//!   ↓ append / construction
//! Attached (tab may still be deferred)
//!   ↓ select
//! Selected
//! ```
//!
//! Stack location:
//! ```text
//! Absent
//!   ↓ append
//! Collapsed ⇄ Expanded
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabPhase {
    /// Not a member of the location
    Detached,
    /// Member, with or without an open tab, not selected
    Attached,
    /// Its tab is the selected one
    Selected,
}

impl TabPhase {
    pub fn is_attached(&self) -> bool {
        !matches!(self, TabPhase::Detached)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabPhase::Detached => "detached",
            TabPhase::Attached => "attached",
            TabPhase::Selected => "selected",
        }
    }
}

impl std::fmt::Display for TabPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackPhase {
    Absent,
    Collapsed,
    Expanded,
}

impl StackPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            StackPhase::Absent => "absent",
            StackPhase::Collapsed => "collapsed",
            StackPhase::Expanded => "expanded",
        }
    }
}

impl std::fmt::Display for StackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What triggered a tab selection. Only user gestures update the persisted
/// last-selected tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCause {
    User,
    Program,
}
