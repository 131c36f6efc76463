//! Navigation-related state types.

/// Specifying the direction of a selection move.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    /// Return the offset reached from `current` within `len` entries,
    /// wrapping around at both ends.
    ///
    pub fn step(self, current: usize, len: usize) -> usize {
        match self {
            Direction::Prev if current == 0 => len - 1,
            Direction::Prev => current - 1,
            Direction::Next if current + 1 >= len => 0,
            Direction::Next => current + 1,
        }
    }

    /// Offset selected when nothing was selected before.
    ///
    pub fn entry(self, len: usize) -> usize {
        match self {
            Direction::Prev => len - 1,
            Direction::Next => 0,
        }
    }
}
