//! Headings and grid step vectors
//!
//! The player always faces one of four cardinal headings. Every vector is
//! read from a fixed per-heading table so results are exact integers; there
//! is no trigonometry anywhere in the logical model.

use serde::{Deserialize, Serialize};

/// Cardinal heading, stored in clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Heading {
    #[default]
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

/// A movement relative to the current heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Forward,
    Backward,
    SlideLeft,
    SlideRight,
}

// Indexed by Heading as usize.
const FORWARD: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const BACKWARD: [(i32, i32); 4] = [(0, 1), (-1, 0), (0, -1), (1, 0)];
const SLIDE_LEFT: [(i32, i32); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
const SLIDE_RIGHT: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Numeric index (0 = North, clockwise).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Build a heading from any integer, wrapping modulo 4.
    pub fn from_index(index: i64) -> Heading {
        Heading::ALL[index.rem_euclid(4) as usize]
    }

    /// Rotate 90 degrees counter-clockwise.
    pub fn turn_left(self) -> Heading {
        Heading::from_index(self.index() as i64 - 1)
    }

    /// Rotate 90 degrees clockwise.
    pub fn turn_right(self) -> Heading {
        Heading::from_index(self.index() as i64 + 1)
    }

    /// Unit vector the heading points along. North is -y.
    pub fn forward(self) -> (i32, i32) {
        FORWARD[self as usize]
    }

    pub fn backward(self) -> (i32, i32) {
        BACKWARD[self as usize]
    }

    pub fn slide_left(self) -> (i32, i32) {
        SLIDE_LEFT[self as usize]
    }

    pub fn slide_right(self) -> (i32, i32) {
        SLIDE_RIGHT[self as usize]
    }

    /// Grid delta for a relative step.
    pub fn delta(self, step: Step) -> (i32, i32) {
        match step {
            Step::Forward => self.forward(),
            Step::Backward => self.backward(),
            Step::SlideLeft => self.slide_left(),
            Step::SlideRight => self.slide_right(),
        }
    }

    /// Lowercase name used in log and description text.
    pub fn name(self) -> &'static str {
        match self {
            Heading::North => "north",
            Heading::East => "east",
            Heading::South => "south",
            Heading::West => "west",
        }
    }

    /// Capitalized name for HUD panels.
    pub fn label(self) -> &'static str {
        match self {
            Heading::North => "North",
            Heading::East => "East",
            Heading::South => "South",
            Heading::West => "West",
        }
    }

    /// Arrow glyph for the minimap.
    pub fn arrow(self) -> char {
        match self {
            Heading::North => '↑',
            Heading::East => '→',
            Heading::South => '↓',
            Heading::West => '←',
        }
    }

    /// View yaw in radians for the renderer (0 = north, clockwise positive).
    pub fn yaw(self) -> f32 {
        self.index() as f32 * std::f32::consts::FRAC_PI_2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_are_inverse() {
        for heading in Heading::ALL {
            assert_eq!(heading.turn_left().turn_right(), heading);
            assert_eq!(heading.turn_right().turn_left(), heading);
        }
    }

    #[test]
    fn test_four_right_turns_wrap() {
        let mut heading = Heading::West;
        for _ in 0..4 {
            heading = heading.turn_right();
        }
        assert_eq!(heading, Heading::West);
        assert_eq!(Heading::North.turn_left(), Heading::West);
    }

    #[test]
    fn test_from_index_wraps_negative() {
        assert_eq!(Heading::from_index(-1), Heading::West);
        assert_eq!(Heading::from_index(5), Heading::East);
        assert_eq!(Heading::from_index(2), Heading::South);
    }

    #[test]
    fn test_relative_vectors_match_rotations() {
        for heading in Heading::ALL {
            // Backward is forward rotated 180 degrees
            let (fx, fy) = heading.forward();
            assert_eq!(heading.backward(), (-fx, -fy));
            // Sliding is moving forward along the rotated heading
            assert_eq!(heading.slide_left(), heading.turn_left().forward());
            assert_eq!(heading.slide_right(), heading.turn_right().forward());
        }
    }

    #[test]
    fn test_delta_for_steps() {
        assert_eq!(Heading::East.delta(Step::Forward), (1, 0));
        assert_eq!(Heading::East.delta(Step::SlideLeft), (0, -1));
        assert_eq!(Heading::South.delta(Step::SlideRight), (-1, 0));
        assert_eq!(Heading::West.delta(Step::Backward), (1, 0));
    }
}
