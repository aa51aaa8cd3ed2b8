/// Stick and trigger state of the human player for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

impl Controls {
    /// Turn command in `[-1, 1]`; right is positive.
    #[must_use]
    pub fn turn(&self) -> f64 {
        f64::from(u8::from(self.right)) - f64::from(u8::from(self.left))
    }

    /// Throttle command in `[-1, 1]`; up accelerates.
    #[must_use]
    pub fn throttle(&self) -> f64 {
        f64::from(u8::from(self.up)) - f64::from(u8::from(self.down))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_keys_cancel() {
        let controls = Controls {
            left: true,
            right: true,
            up: true,
            ..Controls::default()
        };
        assert!(controls.turn().abs() < f64::EPSILON);
        assert!((controls.throttle() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_directions() {
        let controls = Controls {
            left: true,
            down: true,
            ..Controls::default()
        };
        assert!((controls.turn() + 1.0).abs() < f64::EPSILON);
        assert!((controls.throttle() + 1.0).abs() < f64::EPSILON);
    }
}
