use std::collections::{BTreeSet, HashMap};
use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::Path;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::{
    Direction, GlyphId, GridCoord, VarId, Variable, WordId, MAX_NEIGHBOR_COUNT, MAX_SLOT_LENGTH,
};

/// The character in a structure file marking a fillable cell.
pub const OPEN_CELL: char = '_';

/// A pair of character indices `(k, m)`: character `k` of one variable must equal character `m`
/// of the other.
pub type Overlap = (usize, usize);

/// A struct representing a word that can be chosen for a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]>,
}

impl Word {
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// The static description of a puzzle: the grid, the dictionary, and the constraint graph
/// derived from the grid geometry. Nothing here changes while filling.
pub struct Crossword {
    pub height: usize,
    pub width: usize,
    pub structure: Vec<Vec<bool>>,

    /// Every slot in the grid, sorted by `Variable`'s ordering. A `VarId` indexes this list.
    pub variables: Vec<Variable>,

    /// Every distinct character in the dictionary, sorted.
    pub glyphs: Vec<char>,

    /// The dictionary, upper-cased, deduplicated and sorted. A `WordId` indexes this list.
    pub words: Vec<Word>,

    overlaps: Vec<Vec<Option<Overlap>>>,
    neighbors: Vec<SmallVec<[VarId; MAX_NEIGHBOR_COUNT]>>,
}

impl Debug for Crossword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crossword")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("variables", &self.variables)
            .field("glyphs", &self.glyphs)
            .field("words", &(["(", &self.words.len().to_string(), " entries)"].join("")))
            .finish()
    }
}

impl Crossword {
    /// Build a crossword from a grid of open (`true`) and blocked (`false`) cells and a word
    /// list. Short rows are padded with blocked cells.
    pub fn new<I, S>(structure: Vec<Vec<bool>>, words: I) -> Result<Crossword>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if structure.is_empty() {
            return Err(Error::EmptyStructure);
        }

        let height = structure.len();
        let width = structure.iter().map(|row| row.len()).max().unwrap_or(0);
        let structure: Vec<Vec<bool>> = structure
            .into_iter()
            .map(|mut row| {
                row.resize(width, false);
                row
            })
            .collect();

        let word_strings: BTreeSet<String> = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_uppercase())
            .filter(|word| !word.is_empty())
            .collect();
        if word_strings.is_empty() {
            return Err(Error::EmptyWordList);
        }

        let glyphs: Vec<char> = word_strings
            .iter()
            .flat_map(|word| word.chars())
            .collect::<BTreeSet<char>>()
            .into_iter()
            .collect();
        let glyph_ids_by_char: HashMap<char, GlyphId> =
            glyphs.iter().enumerate().map(|(id, &glyph)| (glyph, id)).collect();

        let words: Vec<Word> = word_strings
            .into_iter()
            .map(|string| Word {
                glyphs: string.chars().map(|c| glyph_ids_by_char[&c]).collect(),
                string,
            })
            .collect();

        let variables = find_variables(&structure, height, width);
        let overlaps = find_overlaps(&variables);
        let neighbors = overlaps
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, overlap)| overlap.is_some())
                    .map(|(other, _)| other)
                    .collect()
            })
            .collect();

        Ok(Crossword {
            height,
            width,
            structure,
            variables,
            glyphs,
            words,
            overlaps,
            neighbors,
        })
    }

    /// Build a crossword from the text of a structure file (`_` for open cells, anything else
    /// blocked) and a word file (one word per line).
    pub fn parse(structure: &str, words: &str) -> Result<Crossword> {
        let structure: Vec<Vec<bool>> = structure
            .lines()
            .map(|line| line.chars().map(|c| c == OPEN_CELL).collect())
            .collect();

        Crossword::new(structure, words.lines())
    }

    /// Read and parse a structure file and a word file.
    pub fn load<P, Q>(structure_path: P, words_path: Q) -> Result<Crossword>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let read = |path: &Path| {
            fs::read_to_string(path).map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        Crossword::parse(&read(structure_path.as_ref())?, &read(words_path.as_ref())?)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Look up the id of a variable, if it's part of this grid.
    pub fn variable_id(&self, variable: &Variable) -> Option<VarId> {
        self.variables.binary_search(variable).ok()
    }

    /// Look up the id of a word, if it's in the dictionary. Case-insensitive.
    pub fn word_id(&self, word: &str) -> Option<WordId> {
        let word = word.trim().to_uppercase();
        self.words.binary_search_by(|candidate| candidate.string.cmp(&word)).ok()
    }

    /// The character indices at which `x` and `y` cross, oriented as `(index in x, index in y)`.
    pub fn overlap(&self, x: VarId, y: VarId) -> Option<Overlap> {
        self.overlaps[x][y]
    }

    /// The variables crossing `var`, in id order.
    pub fn neighbors(&self, var: VarId) -> &[VarId] {
        &self.neighbors[var]
    }

    /// The variables crossing `var`, each paired with the overlap oriented from `var`'s side.
    pub fn crossings(&self, var: VarId) -> impl Iterator<Item = (VarId, Overlap)> + '_ {
        self.neighbors[var]
            .iter()
            .filter_map(move |&other| self.overlaps[var][other].map(|overlap| (other, overlap)))
    }
}

/// Find every maximal horizontal or vertical run of open cells longer than one cell.
fn find_variables(structure: &[Vec<bool>], height: usize, width: usize) -> Vec<Variable> {
    let mut variables = vec![];

    for i in 0..height {
        for j in 0..width {
            if !structure[i][j] {
                continue;
            }

            if i == 0 || !structure[i - 1][j] {
                let length = (i..height).take_while(|&row| structure[row][j]).count();
                if length > 1 {
                    variables.push(Variable::new(i, j, Direction::Down, length));
                }
            }

            if j == 0 || !structure[i][j - 1] {
                let length = (j..width).take_while(|&col| structure[i][col]).count();
                if length > 1 {
                    variables.push(Variable::new(i, j, Direction::Across, length));
                }
            }
        }
    }

    variables.sort();
    variables
}

/// Build the dense overlap table by recording which variables pass through each cell.
fn find_overlaps(variables: &[Variable]) -> Vec<Vec<Option<Overlap>>> {
    // (variable id, cell index within variable)
    let mut entries_by_loc: HashMap<GridCoord, SmallVec<[(VarId, usize); 2]>> = HashMap::new();

    for (var, variable) in variables.iter().enumerate() {
        for (cell_idx, loc) in variable.cells().into_iter().enumerate() {
            entries_by_loc.entry(loc).or_default().push((var, cell_idx));
        }
    }

    let mut overlaps = vec![vec![None; variables.len()]; variables.len()];

    for entries in entries_by_loc.values() {
        for &(x, k) in entries {
            for &(y, m) in entries {
                if x != y {
                    overlaps[x][y] = Some((k, m));
                }
            }
        }
    }

    overlaps
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::{Crossword, Direction, Variable};

    fn fixture_path(name: &str) -> String {
        format!("{}/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn test_parse_finds_crossing_variables() {
        let crossword = Crossword::parse("#_#\n___\n#_#\n", "cat\ndog\ncar\n").unwrap();

        assert_eq!(crossword.height, 3);
        assert_eq!(crossword.width, 3);
        assert_eq!(
            crossword.variables,
            vec![
                Variable::new(0, 1, Direction::Down, 3),
                Variable::new(1, 0, Direction::Across, 3),
            ]
        );
        assert_eq!(crossword.overlap(0, 1), Some((1, 1)));
        assert_eq!(crossword.overlap(1, 0), Some((1, 1)));
        assert_eq!(crossword.neighbors(0), &[1]);
        assert_eq!(crossword.neighbors(1), &[0]);
    }

    #[test]
    fn test_overlap_is_oriented_from_first_variable() {
        // ___
        // #_#
        // #_#
        let crossword = Crossword::parse("___\n#_#\n#_#", "abc").unwrap();
        let across = crossword.variable_id(&Variable::new(0, 0, Direction::Across, 3)).unwrap();
        let down = crossword.variable_id(&Variable::new(0, 1, Direction::Down, 3)).unwrap();

        assert_eq!(crossword.overlap(across, down), Some((1, 0)));
        assert_eq!(crossword.overlap(down, across), Some((0, 1)));
        assert_eq!(crossword.crossings(across).collect::<Vec<_>>(), vec![(down, (1, 0))]);
    }

    #[test]
    fn test_single_cells_are_not_variables() {
        let crossword = Crossword::parse("_#_\n###\n_#_", "a").unwrap();
        assert!(crossword.variables.is_empty());
    }

    #[test]
    fn test_parallel_variables_do_not_overlap() {
        let crossword = Crossword::parse("___\n###\n___", "abc").unwrap();

        assert_eq!(crossword.variable_count(), 2);
        assert_eq!(crossword.overlap(0, 1), None);
        assert!(crossword.neighbors(0).is_empty());
    }

    #[test]
    fn test_ragged_rows_are_padded_with_blocks() {
        let crossword = Crossword::parse("__\n____\n_", "ab").unwrap();

        assert_eq!(crossword.width, 4);
        assert_eq!(crossword.structure[0], vec![true, true, false, false]);
        assert_eq!(crossword.structure[2], vec![true, false, false, false]);
    }

    #[test]
    fn test_words_are_normalized() {
        let crossword = Crossword::parse("__", "cat\n\n  dog \nCAT\nCat\n").unwrap();

        let strings: Vec<&str> = crossword.words.iter().map(|w| w.string.as_str()).collect();
        assert_eq!(strings, vec!["CAT", "DOG"]);
        assert_eq!(crossword.glyphs, vec!['A', 'C', 'D', 'G', 'O', 'T']);
        assert_eq!(crossword.word_id("dog"), Some(1));
        assert_eq!(crossword.word_id("cow"), None);
        assert_eq!(crossword.words[0].glyphs.as_slice(), &[1, 0, 5]);
    }

    #[test]
    fn test_empty_word_list_is_an_error() {
        assert!(matches!(Crossword::parse("__", "\n\n"), Err(Error::EmptyWordList)));
    }

    #[test]
    fn test_empty_structure_is_an_error() {
        assert!(matches!(Crossword::parse("", "cat"), Err(Error::EmptyStructure)));
    }

    #[test]
    fn test_load_fixture() {
        let crossword =
            Crossword::load(fixture_path("structure0.txt"), fixture_path("words0.txt")).unwrap();

        assert_eq!(crossword.height, 5);
        assert_eq!(crossword.width, 5);
        assert_eq!(crossword.words.len(), 10);
        assert_eq!(
            crossword.variables,
            vec![
                Variable::new(0, 1, Direction::Across, 3),
                Variable::new(0, 1, Direction::Down, 5),
                Variable::new(1, 4, Direction::Down, 4),
                Variable::new(4, 1, Direction::Across, 4),
            ]
        );
        assert_eq!(crossword.overlap(0, 1), Some((0, 0)));
        assert_eq!(crossword.overlap(1, 3), Some((4, 0)));
        assert_eq!(crossword.overlap(2, 3), Some((3, 3)));
        assert_eq!(crossword.overlap(0, 2), None);
        assert_eq!(crossword.neighbors(3), &[1, 2]);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let result = Crossword::load(fixture_path("missing.txt"), fixture_path("words0.txt"));

        match result {
            Err(Error::Io { path, .. }) => assert!(path.ends_with("missing.txt")),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }
}
