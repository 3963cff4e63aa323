//! Transcript-related types.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// The greeting shown at the start of every conversation, and after the
/// transcript is cleared.
pub const GREETING: &str = "Hi, I'm here for you. How are you feeling today?";

static NEXT_ENTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Who produced a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// The entry was typed by the user.
    User,
    /// The entry was produced on behalf of the assistant.
    Assistant,
}

/// One item in the transcript.
///
/// Entries are immutable once created: the fields are private and only
/// exposed through accessors. The id is unique for the lifetime of the
/// process and strictly increases with creation order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entry {
    id: u64,
    text: String,
    origin: Origin,
    created_at: SystemTime,
}

impl Entry {
    /// Creates an entry attributed to the user.
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self::new(text.into(), Origin::User)
    }

    /// Creates an entry attributed to the assistant.
    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self::new(text.into(), Origin::Assistant)
    }

    fn new(text: String, origin: Origin) -> Self {
        Self {
            id: NEXT_ENTRY_ID.fetch_add(1, Ordering::Relaxed),
            text,
            origin,
            created_at: SystemTime::now(),
        }
    }

    /// Returns the unique identifier of this entry.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the text content of this entry.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns who produced this entry.
    #[inline]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Returns when this entry was created.
    #[inline]
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }
}

/// An ordered, append-only sequence of entries for one conversation.
///
/// A transcript is never empty: it is seeded with a single assistant
/// greeting, and clearing it reseeds a fresh one.
#[derive(Clone, Debug)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// Creates a transcript containing a single fresh greeting entry.
    pub fn seeded() -> Self {
        Self {
            entries: vec![Entry::assistant(GREETING)],
        }
    }

    /// Creates a transcript from caller-supplied entries.
    ///
    /// An empty seed falls back to [`Transcript::seeded`], so the
    /// transcript is never empty after initialization.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        if entries.is_empty() {
            return Self::seeded();
        }
        Self { entries }
    }

    pub(crate) fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Returns the entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::seeded()
    }
}
