//! Owned animation storage shared by the mixer and the extractor.

use crate::data::Animation;
use crate::ids::{AnimId, IdAllocator};

/// Animation storage with lookup by id and by name.
#[derive(Default, Debug)]
pub struct AnimationLibrary {
    ids: IdAllocator,
    items: Vec<(AnimId, Animation)>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load animation data into the library, returning an AnimId.
    pub fn load(&mut self, mut data: Animation) -> AnimId {
        let id = self.ids.alloc_anim();
        data.id = Some(id);
        self.items.push((id, data));
        id
    }

    pub fn get(&self, id: AnimId) -> Option<&Animation> {
        self.items
            .iter()
            .find_map(|(a, d)| if *a == id { Some(d) } else { None })
    }

    /// Id of the first animation with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<AnimId> {
        self.items
            .iter()
            .find_map(|(a, d)| if d.name == name { Some(*a) } else { None })
    }

    pub fn name_of(&self, id: AnimId) -> Option<&str> {
        self.get(id).map(|a| a.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(AnimId, Animation)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
