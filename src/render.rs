use crate::{Assignment, Crossword};

/// Drawn in place of blocked cells.
pub const BLOCK: char = '█';

/// Lay the assignment out on the grid. Cells without a letter, blocked or not, are `None`.
pub fn letter_grid(crossword: &Crossword, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; crossword.width]; crossword.height];

    for (var, word_id) in assignment.iter() {
        let cells = crossword.variables[var].cells();

        for ((row, col), &glyph) in cells.into_iter().zip(&crossword.words[word_id].glyphs) {
            letters[row][col] = Some(crossword.glyphs[glyph]);
        }
    }

    letters
}

/// Turn the given crossword and assignment into a rendered string.
pub fn render_grid(crossword: &Crossword, assignment: &Assignment) -> String {
    let letters = letter_grid(crossword, assignment);

    letters
        .iter()
        .zip(&crossword.structure)
        .map(|(row, open_cells)| {
            row.iter()
                .zip(open_cells)
                .map(|(letter, &open)| if open { letter.unwrap_or(' ') } else { BLOCK })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
