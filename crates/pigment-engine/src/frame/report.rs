/// Summary of one rendered frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,
    /// Seconds since the previous frame.
    pub dt: f32,
    pub nodes_visited: usize,
    pub draw_calls: usize,
    /// Nodes that drew nothing: degenerate, clipped away, or failed texture.
    pub nodes_skipped: usize,
    /// Subset of `nodes_skipped` caused by a texture upload failure.
    pub texture_failures: usize,
    pub resident_texture_bytes: usize,
    /// Stack levels left over from the previous frame (a traversal bug).
    pub stack_imbalance: usize,
}
