use log::debug;

use crate::raycast::Hit;
use crate::registry::{ObjectId, Payload, Snapshot};

/// Emitted once per trigger press that landed on a selectable object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionEvent {
    pub controller_index: usize,
    pub object: ObjectId,
    pub distance: f32,
}

/// External "artwork selected" hook, called after the object's own callback
pub type SelectionObserver = Box<dyn FnMut(&SelectionEvent, &Payload)>;

/// Reacts to a press edge on `controller_index`.
///
/// Invokes the hit object's callback at most once, then the observer. Nothing
/// happens when there is no hit or the object was unregistered after the
/// pick pass.
pub fn dispatch(
    controller_index: usize,
    hit: Option<&Hit>,
    candidates: &Snapshot,
    observer: Option<&mut SelectionObserver>,
) -> Option<SelectionEvent> {
    let hit = hit?;
    let Some(entry) = candidates.find(hit.object) else {
        debug!("Controller {} hit {} which is no longer listed", controller_index, hit.object);
        return None;
    };
    if !entry.is_alive() {
        debug!("Controller {} hit {} after it was unregistered", controller_index, hit.object);
        return None;
    }

    let event = SelectionEvent {
        controller_index,
        object: hit.object,
        distance: hit.distance,
    };

    match entry.payload() {
        Payload::ArtworkPanel(panel) => debug!(
            "Controller {} selected artwork {:?} at {:.2}",
            controller_index,
            panel.artwork.as_ref().map(|a| a.title.as_str()),
            hit.distance
        ),
        Payload::ClosePanel { .. } => debug!("Controller {} pressed close", controller_index),
    }

    (entry.payload().on_select())();

    if let Some(observer) = observer {
        observer(&event, entry.payload());
    }

    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Hitbox, AABB};
    use crate::registry::Registry;
    use glam::Vec3;
    use std::cell::Cell;
    use std::rc::Rc;

    fn hit(object: ObjectId) -> Hit {
        Hit {
            object,
            distance: 4.0,
            point: Vec3::ZERO,
        }
    }

    fn counting_registry(counter: &Rc<Cell<u32>>) -> (Registry, crate::registry::Registration) {
        let registry = Registry::new();
        let id = registry.allocate_id();
        let counter = counter.clone();
        let guard = registry
            .register(
                id,
                Hitbox::from_aabb(AABB::new(Vec3::ZERO, Vec3::ONE)),
                Payload::artwork_panel(None, None, move || counter.set(counter.get() + 1)),
            )
            .unwrap();
        (registry, guard)
    }

    #[test]
    fn no_hit_dispatches_nothing() {
        let calls = Rc::new(Cell::new(0));
        let (registry, _guard) = counting_registry(&calls);
        assert_eq!(dispatch(0, None, &registry.list(), None), None);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn hit_invokes_callback_then_observer() {
        let calls = Rc::new(Cell::new(0));
        let (registry, guard) = counting_registry(&calls);
        let seen = Rc::new(Cell::new(None));
        let mut observer: SelectionObserver = {
            let seen = seen.clone();
            let calls = calls.clone();
            Box::new(move |event: &SelectionEvent, _payload: &Payload| {
                assert_eq!(calls.get(), 1, "object callback runs first");
                seen.set(Some(event.object));
            })
        };

        let event = dispatch(1, Some(&hit(guard.id())), &registry.list(), Some(&mut observer)).unwrap();
        assert_eq!(event.controller_index, 1);
        assert_eq!(calls.get(), 1);
        assert_eq!(seen.get(), Some(guard.id()));
    }

    #[test]
    fn unregistered_object_is_not_invoked() {
        let calls = Rc::new(Cell::new(0));
        let (registry, guard) = counting_registry(&calls);
        let snapshot = registry.list();
        let id = guard.id();
        drop(guard);

        assert_eq!(dispatch(0, Some(&hit(id)), &snapshot, None), None);
        assert_eq!(dispatch(0, Some(&hit(id)), &registry.list(), None), None);
        assert_eq!(calls.get(), 0);
    }
}
