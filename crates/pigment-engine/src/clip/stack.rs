use std::ops::{Deref, DerefMut};

use log::error;

use crate::coords::{Rect, Transform};

#[derive(Debug, Copy, Clone, PartialEq)]
struct Level {
    /// Device pixels, already intersected with every ancestor.
    clip: Option<Rect>,
    /// Local → device, composed outer to inner.
    transform: Transform,
}

/// Nested clip regions and transforms for the tree walk.
///
/// The top of the stack is always the effective state: the clip is the
/// intersection of every pushed clip (in device pixels) and the transform is
/// the composition of every pushed transform applied to the root transform.
///
/// Calls must be balanced; prefer [`scope`](Self::scope), which pops on drop.
#[derive(Debug)]
pub struct ClipTransformStack {
    root: Level,
    levels: Vec<Level>,
}

impl Default for ClipTransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipTransformStack {
    pub fn new() -> Self {
        Self {
            root: Level { clip: None, transform: Transform::IDENTITY },
            levels: Vec::new(),
        }
    }

    /// Transform under every pushed level (the logical → device scale).
    pub fn set_root_transform(&mut self, transform: Transform) {
        self.root.transform = transform;
    }

    /// Pushes a level. `clip` is in the local space of `transform`.
    pub fn push(&mut self, clip: Option<Rect>, transform: Transform) {
        let parent = self.top();
        let transform = parent.transform.then(transform);
        let clip = match clip {
            None => parent.clip,
            Some(local) => {
                let device = transform.map_rect(local.normalized()).clamped();
                Some(match parent.clip {
                    None => device,
                    // Disjoint → zero-area; draws under it are skipped.
                    Some(p) => p.intersect_or_empty(device),
                })
            }
        };
        self.levels.push(Level { clip, transform });
    }

    /// Pops the innermost level.
    ///
    /// # Panics
    /// Panics (debug only) on an empty stack; release builds log and ignore.
    pub fn pop(&mut self) {
        if self.levels.pop().is_none() {
            error!("clip stack: pop on empty stack");
            debug_assert!(false, "pop on empty clip stack");
        }
    }

    /// Pushes a level and returns a guard that pops it when dropped.
    pub fn scope(&mut self, clip: Option<Rect>, transform: Transform) -> StackScope<'_> {
        self.push(clip, transform);
        StackScope { stack: self }
    }

    /// Clears all pushed levels. Returns how many were left over.
    pub fn reset(&mut self) -> usize {
        let stale = self.levels.len();
        self.levels.clear();
        stale
    }

    /// Effective clip in device pixels. `None` = unclipped.
    #[inline]
    pub fn clip(&self) -> Option<Rect> {
        self.top().clip
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.top().transform
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    fn top(&self) -> Level {
        self.levels.last().copied().unwrap_or(self.root)
    }
}

/// Guard returned by [`ClipTransformStack::scope`].
///
/// Dereferences to the stack so nested scopes can be opened through it.
pub struct StackScope<'a> {
    stack: &'a mut ClipTransformStack,
}

impl Deref for StackScope<'_> {
    type Target = ClipTransformStack;

    fn deref(&self) -> &ClipTransformStack {
        self.stack
    }
}

impl DerefMut for StackScope<'_> {
    fn deref_mut(&mut self) -> &mut ClipTransformStack {
        self.stack
    }
}

impl Drop for StackScope<'_> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn nested_clips_intersect_and_pop_restores() {
        let mut s = ClipTransformStack::new();
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(25.0, 25.0, 50.0, 50.0);

        s.push(Some(a), Transform::IDENTITY);
        assert_eq!(s.clip(), Some(a));
        s.push(Some(b), Transform::IDENTITY);
        assert_eq!(s.clip(), Some(Rect::new(25.0, 25.0, 25.0, 25.0)));
        s.pop();
        assert_eq!(s.clip(), Some(a));
        s.pop();
        assert_eq!(s.clip(), None);
    }

    #[test]
    fn n_levels_intersect_all() {
        let mut s = ClipTransformStack::new();
        for i in 0..10 {
            let o = i as f32;
            s.push(Some(Rect::new(o, o, 100.0, 100.0)), Transform::IDENTITY);
        }
        assert_eq!(s.clip(), Some(Rect::new(9.0, 9.0, 91.0, 91.0)));
        assert_eq!(s.depth(), 10);
    }

    #[test]
    fn disjoint_clip_is_zero_area() {
        let mut s = ClipTransformStack::new();
        s.push(Some(Rect::new(0.0, 0.0, 10.0, 10.0)), Transform::IDENTITY);
        s.push(Some(Rect::new(20.0, 20.0, 10.0, 10.0)), Transform::IDENTITY);
        let c = s.clip().unwrap();
        assert!(c.is_empty());
        assert!(c.width() >= 0.0 && c.height() >= 0.0);
    }

    #[test]
    fn unclipped_level_inherits_parent_clip() {
        let mut s = ClipTransformStack::new();
        let a = Rect::new(5.0, 5.0, 10.0, 10.0);
        s.push(Some(a), Transform::IDENTITY);
        s.push(None, Transform::translation(100.0, 0.0));
        assert_eq!(s.clip(), Some(a));
    }

    #[test]
    fn clip_is_mapped_through_the_transform() {
        let mut s = ClipTransformStack::new();
        s.set_root_transform(Transform::uniform_scale(2.0));
        s.push(Some(Rect::new(0.0, 0.0, 10.0, 10.0)), Transform::translation(5.0, 0.0));
        assert_eq!(s.clip(), Some(Rect::new(10.0, 0.0, 20.0, 20.0)));
        assert_eq!(s.transform().apply(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 2.0));
    }

    #[test]
    fn scope_pops_on_every_exit() {
        fn fails(s: &mut ClipTransformStack) -> Result<(), ()> {
            let mut outer = s.scope(Some(Rect::new(0.0, 0.0, 1.0, 1.0)), Transform::IDENTITY);
            let _inner = outer.scope(None, Transform::IDENTITY);
            let step: Result<(), ()> = Err(());
            step?;
            Ok(())
        }

        let mut s = ClipTransformStack::new();
        assert!(fails(&mut s).is_err());
        assert_eq!(s.depth(), 0);
        assert_eq!(s.clip(), None);
    }

    #[test]
    fn reset_reports_stale_depth() {
        let mut s = ClipTransformStack::new();
        s.push(None, Transform::IDENTITY);
        s.push(None, Transform::IDENTITY);
        assert_eq!(s.reset(), 2);
        assert_eq!(s.depth(), 0);
        assert_eq!(s.reset(), 0);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "pop on empty clip stack"))]
    fn pop_on_empty_stack() {
        let mut s = ClipTransformStack::new();
        s.pop();
        assert_eq!(s.depth(), 0);
    }
}
