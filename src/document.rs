use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NgramError, Result};

/// Stable reference to one stored document.
///
/// Handles compare by identity: two documents with identical content get
/// distinct handles. A handle stays valid until its document is removed and
/// is never issued again by the same store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocHandle {
    slot: u32,
    generation: u32,
}

impl DocHandle {
    /// Slot index inside the owning store
    pub fn slot(self) -> u32 {
        self.slot
    }

    /// Number of times the slot had been vacated before this handle was minted
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for DocHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}v{}", self.slot, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    content: Option<Box<str>>,
}

/// Multiset of document contents addressed by [`DocHandle`].
///
/// Vacated slots are recycled with a bumped generation, so stale handles
/// never alias a newer document. Content is owned by the store and exposed
/// read-only.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl DocumentStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `content` into the store and return its handle
    pub fn insert(&mut self, content: &str) -> DocHandle {
        let content: Box<str> = content.into();
        self.len += 1;

        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.content = Some(content);
            return DocHandle {
                slot,
                generation: entry.generation,
            };
        }

        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            content: Some(content),
        });
        DocHandle {
            slot,
            generation: 0,
        }
    }

    /// Remove the document behind `handle`, handing its content back
    pub fn remove(&mut self, handle: DocHandle) -> Result<Box<str>> {
        let entry = self
            .slots
            .get_mut(handle.slot as usize)
            .filter(|entry| entry.generation == handle.generation)
            .ok_or(NgramError::InvalidHandle(handle))?;
        let content = entry
            .content
            .take()
            .ok_or(NgramError::InvalidHandle(handle))?;

        Self::retire(entry, handle.slot, &mut self.free);
        self.len -= 1;
        Ok(content)
    }

    /// Read-only access to a live document's content
    pub fn content_of(&self, handle: DocHandle) -> Result<&str> {
        self.slots
            .get(handle.slot as usize)
            .filter(|entry| entry.generation == handle.generation)
            .and_then(|entry| entry.content.as_deref())
            .ok_or(NgramError::InvalidHandle(handle))
    }

    /// Whether `handle` refers to a live document
    pub fn contains(&self, handle: DocHandle) -> bool {
        self.content_of(handle).is_ok()
    }

    /// Number of live documents
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over live documents in slot order
    pub fn iter(&self) -> impl Iterator<Item = (DocHandle, &str)> + '_ {
        self.slots.iter().enumerate().filter_map(|(slot, entry)| {
            entry.content.as_deref().map(|content| {
                (
                    DocHandle {
                        slot: slot as u32,
                        generation: entry.generation,
                    },
                    content,
                )
            })
        })
    }

    /// Remove every document. Outstanding handles all become invalid.
    pub fn clear(&mut self) {
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if entry.content.take().is_some() {
                Self::retire(entry, slot as u32, &mut self.free);
            }
        }
        self.len = 0;
    }

    // A slot whose generation counter is exhausted is never reused, so every
    // (slot, generation) pair is minted at most once.
    fn retire(entry: &mut Slot, slot: u32, free: &mut Vec<u32>) {
        if let Some(next) = entry.generation.checked_add(1) {
            entry.generation = next;
            free.push(slot);
        }
    }
}
