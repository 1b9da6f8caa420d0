use std::sync::{Arc, Mutex, PoisonError};

use super::Node;

/// Immutable view of the scene tree taken at the start of a frame.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    pub root: Arc<Node>,
    /// Publication counter; increases by one on every [`SharedScene::publish`].
    pub generation: u64,
}

/// Hand-off point between the layout thread and the render thread.
///
/// The layout side publishes whole trees; the renderer takes snapshots. Trees
/// are never mutated after publication, so a frame walk can never observe a
/// half-updated node.
#[derive(Debug)]
pub struct SharedScene {
    inner: Mutex<SceneSnapshot>,
}

impl SharedScene {
    pub fn new(root: Node) -> Self {
        Self { inner: Mutex::new(SceneSnapshot { root: Arc::new(root), generation: 0 }) }
    }

    /// Replaces the current tree. Returns the new generation.
    pub fn publish(&self, root: Node) -> u64 {
        let root = Arc::new(root);
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.generation = guard.generation.wrapping_add(1);
        guard.root = root;
        guard.generation
    }

    /// Cheap: clones the `Arc`, not the tree.
    pub fn snapshot(&self) -> SceneSnapshot {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for SharedScene {
    fn default() -> Self {
        Self::new(Node::group())
    }
}
