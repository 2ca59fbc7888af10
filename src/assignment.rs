use std::collections::BTreeMap;

use bit_set::BitSet;

use crate::{Crossword, VarId, Variable, WordId};

/// A partial or complete mapping from variables to words, indexed by `VarId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    choices: Vec<Option<WordId>>,
}

impl Assignment {
    /// An empty assignment for a grid with `variable_count` variables.
    pub fn new(variable_count: usize) -> Assignment {
        Assignment { choices: vec![None; variable_count] }
    }

    pub fn for_crossword(crossword: &Crossword) -> Assignment {
        Assignment::new(crossword.variable_count())
    }

    pub fn get(&self, var: VarId) -> Option<WordId> {
        self.choices[var]
    }

    pub fn is_bound(&self, var: VarId) -> bool {
        self.choices[var].is_some()
    }

    pub fn bind(&mut self, var: VarId, word_id: WordId) {
        self.choices[var] = Some(word_id);
    }

    pub fn unbind(&mut self, var: VarId) -> Option<WordId> {
        self.choices[var].take()
    }

    /// How many variables have a word.
    pub fn bound_count(&self) -> usize {
        self.choices.iter().filter(|choice| choice.is_some()).count()
    }

    /// The bound variables and their words, in `VarId` order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, WordId)> + '_ {
        self.choices
            .iter()
            .enumerate()
            .filter_map(|(var, choice)| choice.map(|word_id| (var, word_id)))
    }

    /// Translate ids back into the variables and words they stand for.
    pub fn to_words(&self, crossword: &Crossword) -> BTreeMap<Variable, String> {
        self.iter()
            .map(|(var, word_id)| {
                (crossword.variables[var], crossword.words[word_id].string.clone())
            })
            .collect()
    }
}

/// True if every variable in the grid has a word.
pub fn assignment_complete(crossword: &Crossword, assignment: &Assignment) -> bool {
    (0..crossword.variable_count()).all(|var| assignment.is_bound(var))
}

/// Check that the bound words fit: no word is used twice, every word has its variable's length,
/// and crossing words agree on their shared cell. Unbound variables are ignored.
pub fn consistent(crossword: &Crossword, assignment: &Assignment) -> bool {
    let mut used = BitSet::with_capacity(crossword.words.len());

    for (var, word_id) in assignment.iter() {
        if !used.insert(word_id) {
            return false;
        }

        let word = &crossword.words[word_id];
        if word.len() != crossword.variables[var].length {
            return false;
        }

        for (neighbor, (k, m)) in crossword.crossings(var) {
            if let Some(other_id) = assignment.get(neighbor) {
                if word.glyphs.get(k) != crossword.words[other_id].glyphs.get(m) {
                    return false;
                }
            }
        }
    }

    true
}
