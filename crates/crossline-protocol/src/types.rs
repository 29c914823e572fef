//! Identity types shared by every layer: seats and the marks they play.

use std::fmt;

// ---------------------------------------------------------------------------
// Mark
// ---------------------------------------------------------------------------

/// The symbol a seat places on the board.
///
/// Seat 0 always plays `X` and seat 1 always plays `O`; the pairing is
/// fixed for the life of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Returns the seat that plays this mark.
    pub fn seat(self) -> Seat {
        match self {
            Self::X => Seat::FIRST,
            Self::O => Seat::SECOND,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

// ---------------------------------------------------------------------------
// Seat
// ---------------------------------------------------------------------------

/// One of the two fixed player slots.
///
/// Internally a zero-based index (0 or 1). Players see the one-based
/// number, so `Display` renders `Player 1` / `Player 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seat(usize);

impl Seat {
    /// The seat filled by the first accepted connection. Plays `X` and
    /// moves first.
    pub const FIRST: Seat = Seat(0);

    /// The seat filled by the second accepted connection. Plays `O`.
    pub const SECOND: Seat = Seat(1);

    /// Both seats in admission order.
    pub const ALL: [Seat; 2] = [Self::FIRST, Self::SECOND];

    /// Zero-based index, usable for `[T; 2]` lookups.
    pub fn index(self) -> usize {
        self.0
    }

    /// One-based number shown to players.
    pub fn number(self) -> usize {
        self.0 + 1
    }

    /// The opposing seat.
    pub fn other(self) -> Self {
        Seat((self.0 + 1) % 2)
    }

    /// The mark this seat plays.
    pub fn mark(self) -> Mark {
        if self.0 == 0 { Mark::X } else { Mark::O }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_marks_are_fixed() {
        assert_eq!(Seat::FIRST.mark(), Mark::X);
        assert_eq!(Seat::SECOND.mark(), Mark::O);
        assert_eq!(Mark::X.seat(), Seat::FIRST);
        assert_eq!(Mark::O.seat(), Seat::SECOND);
    }

    #[test]
    fn test_seat_other_alternates() {
        assert_eq!(Seat::FIRST.other(), Seat::SECOND);
        assert_eq!(Seat::SECOND.other(), Seat::FIRST);
        assert_eq!(Seat::FIRST.other().other(), Seat::FIRST);
    }

    #[test]
    fn test_seat_display_is_one_based() {
        assert_eq!(Seat::FIRST.to_string(), "Player 1");
        assert_eq!(Seat::SECOND.to_string(), "Player 2");
        assert_eq!(Seat::SECOND.index(), 1);
    }
}
