/// Object manager - owns the render objects and draws them each frame.
///
/// Objects live in a SlotMap for stable keys; a side list keeps insertion
/// order so draws are submitted in the order objects were added.
/// Destruction is deferred: a destroyed object is no longer drawn and is
/// removed at the end of the next `update`.

use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::render::RenderSystem;
use crate::resource::MeshLibrary;
use super::render_object::RenderObject;

new_key_type! {
    /// Stable key for a RenderObject owned by [`ObjectManager`]
    pub struct ObjectKey;
}

#[derive(Default)]
pub struct ObjectManager {
    objects: SlotMap<ObjectKey, RenderObject>,
    order: Vec<ObjectKey>,
}

impl ObjectManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: RenderObject) -> ObjectKey {
        let key = self.objects.insert(object);
        self.order.push(key);
        key
    }

    pub fn get(&self, key: ObjectKey) -> Option<&RenderObject> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut RenderObject> {
        self.objects.get_mut(key)
    }

    /// First live object named `name`, in insertion order
    pub fn find(&self, name: &str) -> Option<ObjectKey> {
        self.order.iter().copied().find(|&key| {
            self.objects.get(key).is_some_and(|o| !o.is_destroyed() && o.name() == name)
        })
    }

    /// Mark an object for removal. Returns false if the key is invalid.
    pub fn destroy(&mut self, key: ObjectKey) -> bool {
        match self.objects.get_mut(key) {
            Some(object) => {
                object.mark_destroyed();
                true
            }
            None => false,
        }
    }

    /// Keys of every object, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.order.iter().copied()
    }

    /// Queue every live object, then drop destroyed ones.
    ///
    /// A failing object does not stop the ones after it. Destroyed objects
    /// are removed even when a draw fails; the first draw error is returned.
    pub fn update(&mut self, render: &mut RenderSystem, meshes: &MeshLibrary) -> Result<()> {
        let mut first_error = None;
        for object in self.order.iter().filter_map(|&key| self.objects.get(key)) {
            if object.is_destroyed() {
                continue;
            }
            if let Err(err) = object.draw(render, meshes) {
                first_error.get_or_insert(err);
            }
        }
        self.remove_destroyed();
        first_error.map_or(Ok(()), Err)
    }

    fn remove_destroyed(&mut self) {
        let objects = &mut self.objects;
        self.order.retain(|&key| {
            if objects.get(key).is_some_and(|o| o.is_destroyed()) {
                objects.remove(key);
                false
            } else {
                true
            }
        });
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.order.clear();
    }

    /// Number of objects, including destroyed ones not yet removed
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
#[path = "object_manager_tests.rs"]
mod tests;
