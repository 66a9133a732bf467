//! Render-time derivations from controller state.
//!
//! Nothing here is stored: every value is recomputed from the current
//! pointer, scroll offset and active section when a host renders.

use std::time::Duration;

use folio_protocol::{CursorStyle, Parallax, Point, Section};

/// Half the size of the cursor follower, so it centers on the pointer.
const CURSOR_HALF_SIZE: f64 = 12.0;
const CURSOR_SCALE_AWAY_FROM_HOME: f64 = 1.5;

const PARALLAX_DIAMOND: f64 = 0.3;
const PARALLAX_RING: f64 = -0.2;
const PARALLAX_GLOW: f64 = 0.15;

const NAV_STAGGER_MS: u64 = 100;
const PROJECT_STAGGER_MS: u64 = 150;
const SKILL_STAGGER_MS: u64 = 100;

pub fn cursor(pointer: Point, active: Section) -> CursorStyle {
    CursorStyle {
        left: pointer.x - CURSOR_HALF_SIZE,
        top: pointer.y - CURSOR_HALF_SIZE,
        scale: if active == Section::Home {
            1.0
        } else {
            CURSOR_SCALE_AWAY_FROM_HOME
        },
    }
}

pub fn parallax(scroll_offset: f64) -> Parallax {
    Parallax {
        diamond: scroll_offset * PARALLAX_DIAMOND,
        ring: scroll_offset * PARALLAX_RING,
        glow: scroll_offset * PARALLAX_GLOW,
    }
}

pub fn nav_delay(section: Section) -> Duration {
    Duration::from_millis(section.index() as u64 * NAV_STAGGER_MS)
}

pub fn project_delay(index: usize) -> Duration {
    Duration::from_millis(index as u64 * PROJECT_STAGGER_MS)
}

pub fn skill_delay(index: usize) -> Duration {
    Duration::from_millis(index as u64 * SKILL_STAGGER_MS)
}

/// Entrance delay of a region: project and skill cards stagger by their
/// index, headings and the contact block start at once.
pub fn entrance_delay(id: &str) -> Duration {
    let index = |prefix: &str| id.strip_prefix(prefix).and_then(|i| i.parse::<usize>().ok());
    if let Some(i) = index("project-") {
        project_delay(i)
    } else if let Some(i) = index("skill-") {
        skill_delay(i)
    } else {
        Duration::ZERO
    }
}

/// Side a skill card slides in from before it is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntranceSide {
    Left,
    Right,
}

pub fn skill_entrance(index: usize) -> EntranceSide {
    if index % 2 == 0 {
        EntranceSide::Left
    } else {
        EntranceSide::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrance_delay_follows_card_index() {
        assert_eq!(entrance_delay("project-2"), Duration::from_millis(300));
        assert_eq!(entrance_delay("skill-3"), Duration::from_millis(300));
        assert_eq!(entrance_delay("skill-0"), Duration::ZERO);
        assert_eq!(entrance_delay("contact-buttons"), Duration::ZERO);
        assert_eq!(entrance_delay("project-x"), Duration::ZERO);
    }

    #[test]
    fn cursor_centers_and_grows_away_from_home() {
        let style = cursor(Point::new(100.0, 50.0), Section::Home);
        assert_eq!((style.left, style.top, style.scale), (88.0, 38.0, 1.0));
        assert_eq!(cursor(Point::new(0.0, 0.0), Section::Skills).scale, 1.5);
    }

    #[test]
    fn parallax_factors() {
        let p = parallax(100.0);
        assert!((p.diamond - 30.0).abs() < 1e-9);
        assert!((p.ring + 20.0).abs() < 1e-9);
        assert!((p.glow - 15.0).abs() < 1e-9);
    }

    #[test]
    fn staggering() {
        assert_eq!(nav_delay(Section::Contact), Duration::from_millis(300));
        assert_eq!(project_delay(2), Duration::from_millis(300));
        assert_eq!(skill_delay(3), Duration::from_millis(300));
        assert_eq!(skill_entrance(0), EntranceSide::Left);
        assert_eq!(skill_entrance(1), EntranceSide::Right);
    }
}
