//! Bone table with name lookup, flip flags, and setup pose.

use hashbrown::HashMap;

use crate::data::Vec2;

/// A bone's local 2D translation state. `x`/`y` are the live local offsets
/// the animation state writes into; `setup` is the authored rest position.
#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    setup: Vec2,
    pub x: f32,
    pub y: f32,
}

impl Bone {
    pub fn new(name: &str, setup: Vec2) -> Self {
        Self {
            name: name.to_string(),
            setup,
            x: setup.x,
            y: setup.y,
        }
    }

    #[inline]
    pub fn setup(&self) -> Vec2 {
        self.setup
    }

    #[inline]
    pub fn local(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn set_to_setup(&mut self) {
        self.x = self.setup.x;
        self.y = self.setup.y;
    }
}

/// Bone table owned by the host for its entire lifetime. The mixer and the
/// extractor only read/write bone local offsets, never add or remove bones.
#[derive(Debug, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    by_name: HashMap<String, usize>,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Skeleton {
    /// Index of the implicit root bone (the first bone added).
    pub const ROOT: usize = 0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bone, returning its stable index. The first bone is the root.
    pub fn add_bone(&mut self, name: &str, setup: Vec2) -> usize {
        let index = self.bones.len();
        self.by_name.insert(name.to_string(), index);
        self.bones.push(Bone::new(name, setup));
        index
    }

    pub fn find_bone_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn bone_mut(&mut self, index: usize) -> Option<&mut Bone> {
        self.bones.get_mut(index)
    }

    pub fn root_bone(&self) -> Option<&Bone> {
        self.bones.first()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Reset every bone to its setup position.
    pub fn set_to_setup_pose(&mut self) {
        for bone in &mut self.bones {
            bone.set_to_setup();
        }
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}
