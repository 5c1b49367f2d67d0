use log::warn;

use crate::ecs::{component::Signature, entity::Id};

/// The lifecycle state of an entity ID.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Not allocated, or destroyed and flushed.
    #[default]
    Free,
    /// Created, waiting for the next flush to become visible to systems.
    Pending,
    /// Visible to systems.
    Alive,
    /// Destroyed, waiting for the next flush to be removed from systems.
    Doomed,
}

impl State {
    /// Whether the ID currently names an entity (anything but [`State::Free`]).
    #[inline]
    pub fn is_live(&self) -> bool {
        !matches!(self, State::Free)
    }

    /// Whether systems see the entity: alive, or destroyed but not yet flushed.
    #[inline]
    pub fn is_visible(&self) -> bool {
        matches!(self, State::Alive | State::Doomed)
    }
}

/// The entry of one entity ID: its lifecycle state and component signature.
#[derive(Debug, Clone)]
struct Entry {
    state: State,
    signature: Signature,
}

/// The table of all known entity IDs. This is the world's signature table: it tracks the
/// lifecycle state and the component signature of every ID, indexed by entity ID.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<Entry>,

    /// Width of every signature in the table.
    width: usize,
}

impl Registry {
    /// Construct an empty table whose signatures are `width` bits wide.
    pub const fn new(width: usize) -> Self {
        Self {
            entries: Vec::new(),
            width,
        }
    }

    /// Mark `id` as pending with an empty signature, growing the table if needed.
    pub fn spawn(&mut self, id: Id) {
        self.ensure_capacity(id.index());
        let entry = &mut self.entries[id.index()];
        if entry.state.is_live() {
            warn!("spawning entity {} over a live entry ({:?})", id, entry.state);
        }
        entry.state = State::Pending;
        entry.signature.reset();
    }

    /// Transition a pending entity to alive. Returns `false` if it was not pending.
    pub fn activate(&mut self, id: Id) -> bool {
        self.transition(id, State::Pending, State::Alive)
    }

    /// Mark a pending or alive entity as doomed. Returns `false` if it was neither.
    pub fn doom(&mut self, id: Id) -> bool {
        match self.entries.get_mut(id.index()) {
            Some(entry) if matches!(entry.state, State::Pending | State::Alive) => {
                entry.state = State::Doomed;
                true
            }
            _ => false,
        }
    }

    /// Free the entry: state becomes [`State::Free`] and the signature is cleared.
    pub fn release(&mut self, id: Id) {
        if let Some(entry) = self.entries.get_mut(id.index()) {
            entry.state = State::Free;
            entry.signature.reset();
        }
    }

    /// Get the state of `id`. IDs beyond the table are [`State::Free`].
    #[inline]
    pub fn state(&self, id: Id) -> State {
        self.entries
            .get(id.index())
            .map_or(State::Free, |entry| entry.state)
    }

    /// Get the signature of `id`, if it is in the table.
    #[inline]
    pub fn signature(&self, id: Id) -> Option<&Signature> {
        self.entries.get(id.index()).map(|entry| &entry.signature)
    }

    /// Get the signature of `id` mutably, if it is in the table.
    #[inline]
    pub(crate) fn signature_mut(&mut self, id: Id) -> Option<&mut Signature> {
        self.entries
            .get_mut(id.index())
            .map(|entry| &mut entry.signature)
    }

    /// IDs of every alive entity, ascending.
    pub fn alive(&self) -> impl Iterator<Item = Id> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.state == State::Alive)
            .map(|(index, _)| Id::from(index as u32))
    }

    /// IDs of every entity visible to systems (see [`State::is_visible`]), ascending.
    pub fn visible(&self) -> impl Iterator<Item = Id> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.state.is_visible())
            .map(|(index, _)| Id::from(index as u32))
    }

    /// Number of IDs that currently name an entity (pending, alive or doomed).
    pub fn live_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.state.is_live())
            .count()
    }

    /// Length of the table (one past the highest ID ever spawned).
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no ID was ever spawned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn transition(&mut self, id: Id, from: State, to: State) -> bool {
        match self.entries.get_mut(id.index()) {
            Some(entry) if entry.state == from => {
                entry.state = to;
                true
            }
            _ => false,
        }
    }

    /// Ensure the entries have capacity for the given index.
    #[inline]
    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.entries.len() {
            let width = self.width;
            self.entries.resize_with(index + 1, || Entry {
                state: State::Free,
                signature: Signature::new(width),
            });
        }
    }
}
