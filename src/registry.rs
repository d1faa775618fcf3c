//! Selectable registry: the candidate set for controller ray picking.
//!
//! Entries live in a copy-on-write `Rc<Vec<Entry>>`. Taking a [`Snapshot`]
//! clones the `Rc` only, so the per-frame pass never allocates; a mutation
//! made while a snapshot is held copies the vector and leaves the snapshot
//! untouched.
//!
//! Every [`Registry::register`] call hands back a [`Registration`] guard.
//! Dropping the guard unregisters the object, so a panel that unmounts can
//! not leave a stale callback behind.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use glam::Vec3;
use log::debug;

use crate::catalog::Artwork;
use crate::error::RegistryError;
use crate::math::Hitbox;

/// Identity of a selectable scene object
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub type SelectCallback = Rc<dyn Fn()>;

/// Payload of a wall-mounted artwork's pick box
#[derive(Clone)]
pub struct ArtworkPanel {
    pub artwork: Option<Rc<Artwork>>,
    pub position: Option<Vec3>,
    pub on_select: SelectCallback,
}

/// Typed data attached to a selectable object
#[derive(Clone)]
pub enum Payload {
    ArtworkPanel(ArtworkPanel),
    /// Close button of the floating info panel
    ClosePanel { on_select: SelectCallback },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    ArtworkPanel,
    ClosePanel,
}

impl Payload {
    pub fn artwork_panel(
        artwork: Option<Rc<Artwork>>,
        position: Option<Vec3>,
        on_select: impl Fn() + 'static,
    ) -> Self {
        Payload::ArtworkPanel(ArtworkPanel {
            artwork,
            position,
            on_select: Rc::new(on_select),
        })
    }

    pub fn close_panel(on_select: impl Fn() + 'static) -> Self {
        Payload::ClosePanel {
            on_select: Rc::new(on_select),
        }
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::ArtworkPanel(_) => PayloadKind::ArtworkPanel,
            Payload::ClosePanel { .. } => PayloadKind::ClosePanel,
        }
    }

    pub fn on_select(&self) -> &SelectCallback {
        match self {
            Payload::ArtworkPanel(panel) => &panel.on_select,
            Payload::ClosePanel { on_select } => on_select,
        }
    }

    pub fn artwork(&self) -> Option<&Rc<Artwork>> {
        match self {
            Payload::ArtworkPanel(panel) => panel.artwork.as_ref(),
            Payload::ClosePanel { .. } => None,
        }
    }

    /// Additive merge. Fields present in `incoming` win, absent ones are kept,
    /// and the callback registered first is never replaced.
    fn merge(&mut self, id: ObjectId, incoming: Payload) -> Result<(), RegistryError> {
        let existing = self.kind();
        match (self, incoming) {
            (Payload::ArtworkPanel(current), Payload::ArtworkPanel(incoming)) => {
                if incoming.artwork.is_some() {
                    current.artwork = incoming.artwork;
                }
                if incoming.position.is_some() {
                    current.position = incoming.position;
                }
                Ok(())
            }
            (Payload::ClosePanel { .. }, Payload::ClosePanel { .. }) => Ok(()),
            (_, incoming) => Err(RegistryError::KindMismatch {
                id,
                existing,
                incoming: incoming.kind(),
            }),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::ArtworkPanel(panel) => f
                .debug_struct("ArtworkPanel")
                .field("artwork", &panel.artwork.as_ref().map(|a| a.title.as_str()))
                .field("position", &panel.position)
                .finish_non_exhaustive(),
            Payload::ClosePanel { .. } => f.debug_struct("ClosePanel").finish_non_exhaustive(),
        }
    }
}

/// A registered object as seen by the picking pass
#[derive(Clone, Debug)]
pub struct Entry {
    id: ObjectId,
    hitbox: Hitbox,
    payload: Payload,
    alive: Rc<Cell<bool>>,
    /// Outstanding guards for this entry
    holds: u32,
}

impl Entry {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// False once the entry has been unregistered, even if a snapshot still holds it
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }
}

/// Immutable view of the candidate set, in insertion order
#[derive(Clone, Debug)]
pub struct Snapshot(Rc<Vec<Entry>>);

impl Snapshot {
    pub fn find(&self, id: ObjectId) -> Option<&Entry> {
        self.0.iter().find(|entry| entry.id == id)
    }
}

impl Deref for Snapshot {
    type Target = [Entry];

    fn deref(&self) -> &[Entry] {
        &self.0
    }
}

#[derive(Debug)]
struct Shared {
    entries: RefCell<Rc<Vec<Entry>>>,
    next_id: Cell<u64>,
}

impl Shared {
    fn remove_where(&self, pred: impl Fn(&Entry) -> bool) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(pos) = entries.iter().position(|entry| pred(entry)) else {
            return false;
        };
        let removed = Rc::make_mut(&mut *entries).remove(pos);
        removed.alive.set(false);
        debug!("Unregistered {} ({:?})", removed.id, removed.payload.kind());
        true
    }

    fn release(&self, id: ObjectId, alive: &Rc<Cell<bool>>) {
        let mut entries = self.entries.borrow_mut();
        let Some(pos) = entries
            .iter()
            .position(|entry| entry.id == id && Rc::ptr_eq(&entry.alive, alive))
        else {
            // Already unregistered explicitly
            return;
        };

        let entries = Rc::make_mut(&mut *entries);
        entries[pos].holds -= 1;
        if entries[pos].holds == 0 {
            let removed = entries.remove(pos);
            removed.alive.set(false);
            debug!("Released {} ({:?})", removed.id, removed.payload.kind());
        }
    }
}

/// Shared handle to the candidate set. Clones refer to the same registry.
#[derive(Clone, Debug)]
pub struct Registry {
    shared: Rc<Shared>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(Shared {
                entries: RefCell::new(Rc::new(Vec::new())),
                next_id: Cell::new(1),
            }),
        }
    }

    /// Mints an id that no other call on this registry returns
    pub fn allocate_id(&self) -> ObjectId {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        ObjectId(id)
    }

    /// Adds `id` to the candidate set, or merges `payload` into an existing
    /// entry with the same id (updating its hitbox). The entry stays
    /// registered until every returned guard is dropped or
    /// [`unregister`](Self::unregister) is called.
    pub fn register(
        &self,
        id: ObjectId,
        hitbox: Hitbox,
        payload: Payload,
    ) -> Result<Registration, RegistryError> {
        let mut entries = self.shared.entries.borrow_mut();

        let alive = match entries.iter().position(|entry| entry.id == id) {
            Some(pos) => {
                let entries = Rc::make_mut(&mut *entries);
                let entry = &mut entries[pos];
                entry.payload.merge(id, payload)?;
                entry.hitbox = hitbox;
                entry.holds += 1;
                debug!("Merged payload into {} ({} holds)", id, entry.holds);
                entry.alive.clone()
            }
            None => {
                let alive = Rc::new(Cell::new(true));
                debug!("Registered {} ({:?})", id, payload.kind());
                Rc::make_mut(&mut *entries).push(Entry {
                    id,
                    hitbox,
                    payload,
                    alive: alive.clone(),
                    holds: 1,
                });
                alive
            }
        };

        Ok(Registration {
            id,
            alive,
            registry: Rc::downgrade(&self.shared),
        })
    }

    /// Removes `id` regardless of outstanding guards. Returns whether it was present.
    pub fn unregister(&self, id: ObjectId) -> bool {
        self.shared.remove_where(|entry| entry.id == id)
    }

    /// Current candidate set
    pub fn list(&self) -> Snapshot {
        Snapshot(Rc::clone(&self.shared.entries.borrow()))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.shared.entries.borrow().iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.shared.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped registration. Dropping it releases the entry.
#[must_use = "dropping a Registration unregisters the object immediately"]
#[derive(Debug)]
pub struct Registration {
    id: ObjectId,
    alive: Rc<Cell<bool>>,
    registry: Weak<Shared>,
}

impl Registration {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// False after the entry was unregistered through another path
    pub fn is_live(&self) -> bool {
        self.alive.get()
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Some(shared) = self.registry.upgrade() {
            shared.release(self.id, &self.alive);
        }
    }
}
