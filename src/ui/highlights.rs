//! Highlight carousel: one card at a time, keyboard or timed advance

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
    /// `None` disables auto-advance
    interval: Option<Duration>,
    elapsed: Duration,
}

impl Carousel {
    pub fn new(len: usize, interval: Option<Duration>) -> Self {
        Self {
            index: 0,
            len,
            interval: interval.filter(|interval| !interval.is_zero()),
            elapsed: Duration::ZERO,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn auto_advance(&self) -> bool {
        self.interval.is_some()
    }

    /// Manual navigation restarts the auto-advance timer
    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.elapsed = Duration::ZERO;
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.elapsed = Duration::ZERO;
    }

    /// Advance the timer; returns true when the card changed
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(interval) = self.interval else {
            return false;
        };
        if self.len < 2 {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= interval {
            self.index = (self.index + 1) % self.len;
            self.elapsed = Duration::ZERO;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_navigation_wraps() {
        let mut carousel = Carousel::new(3, None);
        carousel.prev();
        assert_eq!(carousel.index(), 2);
        carousel.next();
        carousel.next();
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_auto_advance_after_interval() {
        let mut carousel = Carousel::new(2, Some(Duration::from_millis(100)));
        assert!(!carousel.tick(Duration::from_millis(60)));
        assert!(carousel.tick(Duration::from_millis(60)));
        assert_eq!(carousel.index(), 1);
        assert!(!carousel.tick(Duration::from_millis(60)));
    }

    #[test]
    fn test_manual_navigation_restarts_timer() {
        let mut carousel = Carousel::new(3, Some(Duration::from_millis(100)));
        carousel.tick(Duration::from_millis(90));
        carousel.next();
        assert!(!carousel.tick(Duration::from_millis(90)));
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_disabled_and_empty() {
        let mut carousel = Carousel::new(3, Some(Duration::ZERO));
        assert!(!carousel.auto_advance());
        assert!(!carousel.tick(Duration::from_secs(60)));

        let mut empty = Carousel::new(0, Some(Duration::from_millis(10)));
        empty.next();
        assert!(empty.is_empty());
        assert!(!empty.tick(Duration::from_secs(1)));
    }
}
