//! Ease-out scroll animation in document units.
//!
//! Each frame closes a fixed fraction of the remaining distance, so motion
//! decelerates into the target. Retargeting mid-flight continues from the
//! current position.

#[derive(Debug, Clone)]
pub struct SmoothScroll {
    position: f64,
    target: f64,
    /// Fraction of the remaining distance covered per frame.
    speed: f64,
    /// Distance below which the animation snaps onto the target.
    settle: f64,
}

impl SmoothScroll {
    pub fn new(speed: f64, settle: f64) -> Self {
        Self {
            position: 0.0,
            target: 0.0,
            speed: speed.clamp(0.05, 0.95),
            settle: settle.max(0.0),
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.position != self.target
    }

    /// Animate toward `target`.
    pub fn retarget(&mut self, target: f64) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Move to `target` without animating.
    pub fn jump(&mut self, target: f64) {
        if target.is_finite() {
            self.target = target;
            self.position = target;
        }
    }

    /// Keep both position and target inside `0..=max`.
    pub fn clamp(&mut self, max: f64) {
        let max = max.max(0.0);
        self.target = self.target.clamp(0.0, max);
        self.position = self.position.clamp(0.0, max);
    }

    /// Advance one frame. Returns whether the position moved.
    pub fn tick(&mut self) -> bool {
        if !self.is_animating() {
            return false;
        }
        let remaining = self.target - self.position;
        if remaining.abs() <= self.settle {
            self.position = self.target;
        } else {
            self.position += remaining * self.speed;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(scroll: &mut SmoothScroll) -> usize {
        let mut frames = 0;
        while scroll.tick() {
            frames += 1;
            assert!(frames < 1_000, "never settled");
        }
        frames
    }

    #[test]
    fn eases_out_and_lands_exactly() {
        let mut scroll = SmoothScroll::new(0.3, 1.0);
        scroll.retarget(880.0);
        scroll.tick();
        let first_step = scroll.position();
        scroll.tick();
        let second_step = scroll.position() - first_step;
        assert!(second_step < first_step, "decelerates");

        settle(&mut scroll);
        assert_eq!(scroll.position(), 880.0);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn retarget_mid_flight_continues_from_current_position() {
        let mut scroll = SmoothScroll::new(0.5, 1.0);
        scroll.retarget(1_000.0);
        scroll.tick();
        assert_eq!(scroll.position(), 500.0);

        scroll.retarget(200.0);
        scroll.tick();
        assert_eq!(scroll.position(), 350.0);
        settle(&mut scroll);
        assert_eq!(scroll.position(), 200.0);
    }

    #[test]
    fn jump_and_clamp() {
        let mut scroll = SmoothScroll::new(0.3, 1.0);
        scroll.jump(2_000.0);
        assert!(!scroll.tick());
        scroll.clamp(1_200.0);
        assert_eq!((scroll.position(), scroll.target()), (1_200.0, 1_200.0));
        scroll.retarget(f64::NAN);
        assert_eq!(scroll.target(), 1_200.0);
    }
}
