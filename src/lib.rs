//! Crossword filling as a constraint satisfaction problem.
//!
//! A [`Crossword`] describes the grid: its slots (variables), the candidate words, and which
//! slots cross each other. Filling it runs node consistency, then AC-3, then a backtracking
//! search that maintains arc consistency after every choice.

use std::fmt;

pub mod arc_consistency;
pub mod assignment;
pub mod crossword;
pub mod domains;
pub mod error;
pub mod render;
pub mod search;

pub use crate::arc_consistency::{ac3, revise, Arc};
pub use crate::assignment::{assignment_complete, consistent, Assignment};
pub use crate::crossword::{Crossword, Overlap, Word};
pub use crate::domains::Domains;
pub use crate::error::{Error, Result};
pub use crate::render::{letter_grid, render_grid};
pub use crate::search::{find_fill, FillFailure, FillOptions, FillSuccess, Solver, Statistics};

/// The expected maximum number of distinct characters appearing in the word list.
pub const MAX_GLYPH_COUNT: usize = 256;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// The expected maximum number of slots crossing any one slot.
pub const MAX_NEIGHBOR_COUNT: usize = 16;

/// An identifier for a given character, based on its index in the crossword's `glyphs` field.
pub type GlyphId = usize;

/// An identifier for a given variable, based on its index in the crossword's `variables` field.
pub type VarId = usize;

/// An identifier for a given word, based on its index in the crossword's `words` field.
pub type WordId = usize;

/// Zero-indexed row and column for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Across,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A fillable slot: a maximal run of open cells starting at row `i`, column `j`.
///
/// The derived ordering (row, column, direction, length) is the fixed order used to break
/// ties anywhere the search has to choose between otherwise equal variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable {
    pub i: usize,
    pub j: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    pub fn new(i: usize, j: usize, direction: Direction, length: usize) -> Variable {
        Variable { i, j, direction, length }
    }

    /// Generate the coords for each cell of this variable.
    pub fn cells(&self) -> Vec<GridCoord> {
        (0..self.length)
            .map(|k| match self.direction {
                Direction::Across => (self.i, self.j + k),
                Direction::Down => (self.i + k, self.j),
            })
            .collect()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {} : {}", self.i, self.j, self.direction, self.length)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Direction, Variable};

    #[test]
    fn test_variable_cells() {
        let across = Variable::new(1, 2, Direction::Across, 3);
        assert_eq!(across.cells(), vec![(1, 2), (1, 3), (1, 4)]);

        let down = Variable::new(1, 2, Direction::Down, 3);
        assert_eq!(down.cells(), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_variable_order_is_row_then_column_then_direction() {
        let mut variables = vec![
            Variable::new(1, 0, Direction::Across, 3),
            Variable::new(0, 1, Direction::Down, 3),
            Variable::new(0, 1, Direction::Across, 2),
            Variable::new(0, 0, Direction::Down, 5),
        ];
        variables.sort();

        assert_eq!(
            variables,
            vec![
                Variable::new(0, 0, Direction::Down, 5),
                Variable::new(0, 1, Direction::Across, 2),
                Variable::new(0, 1, Direction::Down, 3),
                Variable::new(1, 0, Direction::Across, 3),
            ]
        );
    }

    #[test]
    fn test_variable_display() {
        let variable = Variable::new(4, 1, Direction::Across, 4);
        assert_eq!(variable.to_string(), "(4, 1) across : 4");
    }
}
