use bit_set::BitSet;
use smallvec::{smallvec, SmallVec};

use crate::{Crossword, VarId, WordId, MAX_GLYPH_COUNT};

/// Counts of how many words in a domain place each glyph in a given cell, indexed by `GlyphId`.
pub type GlyphCounts = SmallVec<[u32; MAX_GLYPH_COUNT]>;

/// The current candidate words for every variable.
///
/// Domains only ever shrink. Search takes a snapshot by cloning the store before speculative
/// propagation and moves the snapshot back to undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    options: Vec<BitSet>,
}

impl Domains {
    /// Start every variable off with the whole dictionary.
    pub fn new(crossword: &Crossword) -> Domains {
        let all_words: BitSet = (0..crossword.words.len()).collect();

        Domains {
            options: crossword.variables.iter().map(|_| all_words.clone()).collect(),
        }
    }

    pub fn get(&self, var: VarId) -> &BitSet {
        &self.options[var]
    }

    pub fn len(&self, var: VarId) -> usize {
        self.options[var].len()
    }

    pub fn is_empty(&self, var: VarId) -> bool {
        self.options[var].is_empty()
    }

    /// The candidate words for `var`, in ascending id order.
    pub fn words(&self, var: VarId) -> impl Iterator<Item = WordId> + '_ {
        self.options[var].iter()
    }

    /// The size of every domain, indexed by `VarId`.
    pub fn sizes(&self) -> Vec<usize> {
        self.options.iter().map(|domain| domain.len()).collect()
    }

    /// Remove every word from `var`'s domain that fails `keep`. Returns how many were removed.
    pub fn retain<F>(&mut self, var: VarId, mut keep: F) -> usize
    where
        F: FnMut(WordId) -> bool,
    {
        let removed: Vec<WordId> =
            self.options[var].iter().filter(|&word_id| !keep(word_id)).collect();

        for &word_id in &removed {
            self.options[var].remove(word_id);
        }

        removed.len()
    }

    /// Narrow `var`'s domain down to the single word `word_id`.
    pub fn restrict_to(&mut self, var: VarId, word_id: WordId) {
        let domain = &mut self.options[var];
        domain.clear();
        domain.insert(word_id);
    }

    /// Drop every word whose length differs from its variable's length. Running this a second
    /// time changes nothing.
    pub fn enforce_node_consistency(&mut self, crossword: &Crossword) {
        for (var, variable) in crossword.variables.iter().enumerate() {
            self.retain(var, |word_id| crossword.words[word_id].len() == variable.length);
        }
    }

    /// Count, for each glyph, how many words in `var`'s domain have that glyph at index `cell`.
    /// Words too short to reach `cell` aren't counted.
    pub fn glyph_counts_at(&self, crossword: &Crossword, var: VarId, cell: usize) -> GlyphCounts {
        let mut counts: GlyphCounts = smallvec![0; crossword.glyphs.len()];

        for word_id in self.words(var) {
            if let Some(&glyph) = crossword.words[word_id].glyphs.get(cell) {
                counts[glyph] += 1;
            }
        }

        counts
    }
}

#[cfg(test)]
mod tests {
    use crate::{Crossword, Domains};

    fn crossword() -> Crossword {
        Crossword::parse(
            "#___#\n#_##_\n#_##_\n#_##_\n#____",
            "a\nox\ncat\ndog\nbird\nfish\nhorse\nmoose\ntiger",
        )
        .unwrap()
    }

    #[test]
    fn test_domains_start_with_every_word() {
        let crossword = crossword();
        let domains = Domains::new(&crossword);

        for var in 0..crossword.variable_count() {
            assert_eq!(domains.len(var), crossword.words.len());
        }
    }

    #[test]
    fn test_node_consistency_keeps_only_matching_lengths() {
        let crossword = crossword();
        let mut domains = Domains::new(&crossword);
        domains.enforce_node_consistency(&crossword);

        for (var, variable) in crossword.variables.iter().enumerate() {
            assert!(!domains.is_empty(var));
            for word_id in domains.words(var) {
                assert_eq!(crossword.words[word_id].len(), variable.length);
            }
        }
        assert_eq!(domains.sizes(), vec![2, 3, 2, 2]);
    }

    #[test]
    fn test_node_consistency_is_idempotent() {
        let crossword = crossword();
        let mut once = Domains::new(&crossword);
        once.enforce_node_consistency(&crossword);

        let mut twice = once.clone();
        twice.enforce_node_consistency(&crossword);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_node_consistency_may_leave_a_domain_empty() {
        let crossword = Crossword::parse("______", "cat\ndog").unwrap();
        let mut domains = Domains::new(&crossword);
        domains.enforce_node_consistency(&crossword);

        assert!(domains.is_empty(0));
    }

    #[test]
    fn test_restrict_to_and_snapshot_restore() {
        let crossword = crossword();
        let mut domains = Domains::new(&crossword);
        domains.enforce_node_consistency(&crossword);

        let snapshot = domains.clone();
        let cat = crossword.word_id("cat").unwrap();
        domains.restrict_to(0, cat);

        assert_eq!(domains.words(0).collect::<Vec<_>>(), vec![cat]);
        assert_ne!(domains, snapshot);

        domains = snapshot.clone();
        assert_eq!(domains, snapshot);
    }

    #[test]
    fn test_glyph_counts_at() {
        let crossword = Crossword::parse("#_#\n___\n#_#", "cat\ncar\ndog").unwrap();
        let mut domains = Domains::new(&crossword);
        domains.enforce_node_consistency(&crossword);

        let counts = domains.glyph_counts_at(&crossword, 0, 1);
        let a = crossword.glyphs.iter().position(|&c| c == 'A').unwrap();
        let o = crossword.glyphs.iter().position(|&c| c == 'O').unwrap();
        assert_eq!(counts[a], 2);
        assert_eq!(counts[o], 1);
        assert_eq!(counts.iter().sum::<u32>(), 3);
    }
}
