use crate::error::ChartResult;
use crate::render::{NodeKind, Renderer, Scene};

/// No-op renderer used by tests and headless chart usage.
///
/// It still validates the scene so tests can catch invalid geometry before
/// a real backend is involved.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_node_count: usize,
    pub last_path_count: usize,
    pub last_text_count: usize,
    pub render_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, scene: &Scene) -> ChartResult<()> {
        scene.validate()?;
        let walked = scene.walk();
        self.last_node_count = walked.len();
        self.last_path_count = walked
            .iter()
            .filter(|(node, _)| matches!(node.kind, NodeKind::Path { .. }))
            .count();
        self.last_text_count = walked
            .iter()
            .filter(|(node, _)| matches!(node.kind, NodeKind::Text { .. }))
            .count();
        self.render_count += 1;
        Ok(())
    }
}
