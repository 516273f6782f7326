use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Background swatch for a scratch-pad note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteColor {
    Yellow,
    Pink,
    Blue,
    Green,
    Purple,
}

impl NoteColor {
    pub const ALL: [NoteColor; 5] = [
        NoteColor::Yellow,
        NoteColor::Pink,
        NoteColor::Blue,
        NoteColor::Green,
        NoteColor::Purple,
    ];

    /// Pick a swatch from a seed (creation time nanos in practice)
    pub fn from_seed(seed: u32) -> Self {
        Self::ALL[seed as usize % Self::ALL.len()]
    }
}

/// A free-form note, unrelated to any task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub color: NoteColor,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Create a note; returns None if the content is blank
    pub fn new(content: &str, now: DateTime<Utc>) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            content: content.to_string(),
            color: NoteColor::from_seed(now.timestamp_subsec_nanos()),
            created_at: now,
        })
    }
}

/// Scratch-pad collection; newest notes first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePad {
    pub notes: Vec<Note>,
}

impl NotePad {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// Prepend a new note; blank content is ignored
    pub fn add(&mut self, content: &str, now: DateTime<Utc>) -> Option<Uuid> {
        let note = Note::new(content, now)?;
        let id = note.id;
        self.notes.insert(0, note);
        Some(id)
    }

    /// Replace a note's content; blank content leaves the note unchanged
    pub fn edit(&mut self, id: Uuid, content: &str) -> bool {
        let content = content.trim();
        if content.is_empty() {
            return false;
        }
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.content = content.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }

    /// Find a note by a unique prefix of its id
    pub fn resolve(&self, prefix: &str) -> Option<Uuid> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return None;
        }
        let mut matches = self
            .notes
            .iter()
            .filter(|n| n.id.simple().to_string().starts_with(&prefix) || n.id.to_string().starts_with(&prefix));
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_blank_note_rejected() {
        let mut pad = NotePad::default();
        assert!(pad.add("   \n", now()).is_none());
        assert!(pad.notes.is_empty());
    }

    #[test]
    fn test_notes_are_prepended() {
        let mut pad = NotePad::default();
        pad.add("first", now()).unwrap();
        pad.add("  second  ", now()).unwrap();
        assert_eq!(pad.notes[0].content, "second");
        assert_eq!(pad.notes[1].content, "first");
    }

    #[test]
    fn test_edit_and_remove() {
        let mut pad = NotePad::default();
        let id = pad.add("draft", now()).unwrap();

        assert!(!pad.edit(id, "  "));
        assert_eq!(pad.notes[0].content, "draft");

        assert!(pad.edit(id, "final"));
        assert_eq!(pad.notes[0].content, "final");

        assert!(pad.remove(id));
        assert!(!pad.remove(id));
    }

    #[test]
    fn test_resolve_by_prefix() {
        let mut pad = NotePad::default();
        let id = pad.add("hello", now()).unwrap();
        let prefix = &id.simple().to_string()[..6];
        assert_eq!(pad.resolve(prefix), Some(id));
        assert_eq!(pad.resolve(""), None);
    }
}
