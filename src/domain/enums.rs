use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a task, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Paused,
    Completed,
}

/// Error returned when a status or priority tag can't be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
}

impl TaskStatus {
    /// Parse status from a tag like "in-progress" or "PAUSED"
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_uppercase().replace(['-', '_', ' '], "").as_str() {
            "NOTSTARTED" | "TODO" => Some(Self::NotStarted),
            "INPROGRESS" | "RUNNING" => Some(Self::InProgress),
            "PAUSED" => Some(Self::Paused),
            "COMPLETED" | "DONE" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Paused => "Paused",
            Self::Completed => "Completed",
        }
    }

    /// Next status when cycling a filter; None means "all"
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::NotStarted),
            Some(Self::NotStarted) => Some(Self::InProgress),
            Some(Self::InProgress) => Some(Self::Paused),
            Some(Self::Paused) => Some(Self::Completed),
            Some(Self::Completed) => None,
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ParseTagError {
            kind: "status",
            value: s.to_string(),
        })
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_uppercase().as_str() {
            "LOW" | "L" => Some(Self::Low),
            "MEDIUM" | "M" => Some(Self::Medium),
            "HIGH" | "H" => Some(Self::High),
            "URGENT" | "U" => Some(Self::Urgent),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    /// Single-character badge for the list pane
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Low => "·",
            Self::Medium => "!",
            Self::High => "!!",
            Self::Urgent => "!!!",
        }
    }

    /// Next priority in the add-task form (wraps around)
    pub fn next(&self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Urgent,
            Self::Urgent => Self::Low,
        }
    }

    /// Next priority when cycling a filter; None means "all"
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Low),
            Some(Self::Urgent) => None,
            Some(p) => Some(p.next()),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ParseTagError {
            kind: "priority",
            value: s.to_string(),
        })
    }
}

/// UI mode for the terminal application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    Searching,
    AddingNote,
    EditingNote,
}
