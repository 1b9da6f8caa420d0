mod stack;

pub use stack::{ClipTransformStack, StackScope};
