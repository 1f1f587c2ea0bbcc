use glam::Vec3;
use std::collections::VecDeque;

use crate::constants::FIXED_TICK_RATE;

/// Recent position history of one tracked joint, oldest point first.
#[derive(Clone, Debug)]
pub struct TrailInstance {
    pub joint_path: String,
    points: VecDeque<Vec3>,
    capacity: usize,
}

impl TrailInstance {
    pub fn new(joint_path: impl Into<String>) -> Self {
        Self {
            joint_path: joint_path.into(),
            points: VecDeque::new(),
            capacity: 1,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = &Vec3> + '_ {
        self.points.iter()
    }

    #[inline]
    pub fn newest(&self) -> Option<Vec3> {
        self.points.back().copied()
    }

    /// Appends `point` and evicts from the head until the buffer fits the
    /// new capacity. Capacities below one are clamped to one.
    pub fn update(&mut self, point: Vec3, new_capacity: i64) {
        self.capacity = new_capacity.max(1) as usize;
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Point count for a trail lasting `duration_sec`, assuming [`FIXED_TICK_RATE`]
/// updates per second. Truncates; may be zero or negative, which
/// [`TrailInstance::update`] clamps.
#[inline]
pub fn capacity_for_duration(duration_sec: f32) -> i64 {
    if !duration_sec.is_finite() {
        return 1;
    }
    (duration_sec * FIXED_TICK_RATE) as i64
}
