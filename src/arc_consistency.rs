//! AC-3 over the crossing constraints between variables.

use std::collections::VecDeque;

use log::debug;

use crate::{Crossword, Domains, VarId};

/// A directed arc `(x, y)`: make `x`'s domain consistent with `y`'s.
pub type Arc = (VarId, VarId);

/// Results from a call to `check_arc_consistency`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many `revise` calls actually removed words.
    pub revisions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    /// The variable whose domain was emptied.
    pub emptied_var: VarId,
    pub revisions: u64,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Make `x` arc consistent with `y`: remove every word from `x`'s domain that has no word in
/// `y`'s domain agreeing with it at their crossing. Returns true if anything was removed.
pub fn revise(crossword: &Crossword, domains: &mut Domains, x: VarId, y: VarId) -> bool {
    let (k, m) = match crossword.overlap(x, y) {
        Some(overlap) => overlap,
        None => return false,
    };

    // A word in `x` survives iff some word in `y` has the same glyph in the crossing cell.
    let crossing_counts = domains.glyph_counts_at(crossword, y, m);

    let removed = domains.retain(x, |word_id| {
        crossword.words[word_id]
            .glyphs
            .get(k)
            .map(|&glyph| crossing_counts[glyph] > 0)
            .unwrap_or(false)
    });

    removed > 0
}

/// Run AC-3 starting from `arcs`, or from every directed arc in the graph if `arcs` is `None`.
/// Stops as soon as any domain is emptied.
pub fn check_arc_consistency(
    crossword: &Crossword,
    domains: &mut Domains,
    arcs: Option<Vec<Arc>>,
) -> ArcConsistencyResult {
    let mut queue: VecDeque<Arc> = match arcs {
        Some(arcs) => arcs.into(),
        None => (0..crossword.variable_count())
            .flat_map(|x| crossword.neighbors(x).iter().map(move |&y| (x, y)))
            .collect(),
    };

    let mut revisions = 0;

    while let Some((x, y)) = queue.pop_front() {
        if !revise(crossword, domains, x, y) {
            continue;
        }
        revisions += 1;

        if domains.is_empty(x) {
            debug!("arc consistency emptied the domain of {}", crossword.variables[x]);
            return Err(ArcConsistencyFailure { emptied_var: x, revisions });
        }

        // Shrinking `x` may leave words in its other neighbors without support. Duplicates in
        // the queue only cost a redundant check.
        for &z in crossword.neighbors(x) {
            if z != y {
                queue.push_back((z, x));
            }
        }
    }

    Ok(ArcConsistencySuccess { revisions })
}

/// Enforce arc consistency, returning false if any domain ends up empty.
pub fn ac3(crossword: &Crossword, domains: &mut Domains, arcs: Option<Vec<Arc>>) -> bool {
    check_arc_consistency(crossword, domains, arcs).is_ok()
}
