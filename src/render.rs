use jointfx_core::{Gradient, TrailInstance};

/// Polyline renderer for one trail.
pub trait PolylineSink {
    fn set_position_count(&mut self, count: usize);
    fn set_position(&mut self, index: usize, point: glam::Vec3);
    fn set_width(&mut self, start: f32, end: f32);
    fn set_color_gradient(&mut self, gradient: &Gradient);
    fn set_texture(&mut self, _name: &str) {}
}

// Upload the full point history, oldest first
pub fn push_trail(sink: &mut dyn PolylineSink, trail: &TrailInstance, width: f32, tail_ratio: f32) {
    sink.set_position_count(trail.len());
    for (i, p) in trail.points().enumerate() {
        sink.set_position(i, *p);
    }
    sink.set_width(width, width * tail_ratio);
}
