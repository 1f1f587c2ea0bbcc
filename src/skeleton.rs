use glam::Vec3;

/// World-space joint positions of the animated figure.
pub trait JointSampler {
    /// Current position of `joint_path`, or `None` when the path does not resolve.
    fn position(&self, joint_path: &str) -> Option<Vec3>;
}

impl<F> JointSampler for F
where
    F: Fn(&str) -> Option<Vec3>,
{
    fn position(&self, joint_path: &str) -> Option<Vec3> {
        self(joint_path)
    }
}
