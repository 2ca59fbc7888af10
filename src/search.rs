//! Backtracking search that maintains arc consistency after every choice.

use std::cmp::Reverse;

use instant::{Duration, Instant};
use log::{debug, info, trace};
use thiserror::Error;

use crate::arc_consistency::check_arc_consistency;
use crate::domains::GlyphCounts;
use crate::{assignment_complete, consistent, Arc, Assignment, Crossword, Domains, VarId, WordId};

/// Settings for a fill attempt.
#[derive(Debug, Clone, Default)]
pub struct FillOptions {
    /// Give up after visiting this many search states. `None` searches exhaustively.
    pub state_limit: Option<u64>,
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: u64,
    pub backtracks: u64,
    pub revisions: u64,
    pub duration: Duration,
}

/// A struct representing the results of a fill operation.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FillFailure {
    #[error("no assignment satisfies the puzzle")]
    Unsatisfiable,

    #[error("gave up after reaching the search state limit")]
    ExhaustedStateLimit,
}

/// Where a branch of the search ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchState {
    Solved,
    Failed,
    LimitReached,
}

/// Fills one crossword. Owns the domain store; the crossword itself is only read.
pub struct Solver<'a> {
    crossword: &'a Crossword,
    domains: Domains,
    options: FillOptions,
    statistics: Statistics,
}

impl<'a> Solver<'a> {
    pub fn new(crossword: &'a Crossword) -> Solver<'a> {
        Solver::with_options(crossword, FillOptions::default())
    }

    pub fn with_options(crossword: &'a Crossword, options: FillOptions) -> Solver<'a> {
        Solver {
            crossword,
            domains: Domains::new(crossword),
            options,
            statistics: Statistics::default(),
        }
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn enforce_node_consistency(&mut self) {
        self.domains.enforce_node_consistency(self.crossword);
    }

    /// Run AC-3 on the solver's domains, counting revisions. Returns false if a domain emptied.
    pub fn ac3(&mut self, arcs: Option<Vec<Arc>>) -> bool {
        match check_arc_consistency(self.crossword, &mut self.domains, arcs) {
            Ok(success) => {
                self.statistics.revisions += success.revisions;
                true
            }
            Err(failure) => {
                self.statistics.revisions += failure.revisions;
                false
            }
        }
    }

    /// Pick the unassigned variable with the fewest remaining words. Ties go to the variable
    /// crossing the most others, then to the lowest `VarId`.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<VarId> {
        (0..self.crossword.variable_count())
            .filter(|&var| !assignment.is_bound(var))
            .min_by_key(|&var| {
                (
                    self.domains.len(var),
                    Reverse(self.crossword.neighbors(var).len()),
                    var,
                )
            })
    }

    /// Order `var`'s candidate words by how many words they would rule out across the unassigned
    /// crossing variables, least first. Ties are broken by `WordId`.
    pub fn order_domain_values(&self, var: VarId, assignment: &Assignment) -> Vec<WordId> {
        // For each unassigned crossing: our cell index, glyph counts at their cell, and the
        // size of their domain.
        let crossings: Vec<(usize, GlyphCounts, usize)> = self
            .crossword
            .crossings(var)
            .filter(|&(neighbor, _)| !assignment.is_bound(neighbor))
            .map(|(neighbor, (k, m))| {
                (
                    k,
                    self.domains.glyph_counts_at(self.crossword, neighbor, m),
                    self.domains.len(neighbor),
                )
            })
            .collect();

        let mut costed: Vec<(usize, WordId)> = self
            .domains
            .words(var)
            .map(|word_id| {
                let word = &self.crossword.words[word_id];
                let eliminated: usize = crossings
                    .iter()
                    .map(|(k, counts, total)| {
                        let agreeing = word
                            .glyphs
                            .get(*k)
                            .map(|&glyph| counts[glyph] as usize)
                            .unwrap_or(0);
                        total - agreeing
                    })
                    .sum();
                (eliminated, word_id)
            })
            .collect();

        costed.sort_unstable();
        costed.into_iter().map(|(_, word_id)| word_id).collect()
    }

    /// Extend `assignment` to a complete, consistent assignment if one exists under the current
    /// domains.
    pub fn backtrack(&mut self, assignment: Assignment) -> Option<Assignment> {
        let mut assignment = assignment;

        match self.search(&mut assignment) {
            SearchState::Solved => Some(assignment),
            SearchState::Failed | SearchState::LimitReached => None,
        }
    }

    /// Enforce node and arc consistency, then search. `None` means no fill exists (or the state
    /// limit ran out first).
    pub fn solve(&mut self) -> Option<Assignment> {
        self.fill().ok().map(|success| success.assignment)
    }

    /// Like `solve`, but reports statistics and distinguishes why no fill was found. Every call
    /// starts over from the full dictionary with fresh statistics.
    pub fn fill(&mut self) -> Result<FillSuccess, FillFailure> {
        let start = Instant::now();
        self.domains = Domains::new(self.crossword);
        self.statistics = Statistics::default();

        info!(
            "filling {} slots from {} words",
            self.crossword.variable_count(),
            self.crossword.words.len()
        );

        self.enforce_node_consistency();
        let consistent_initially = self.ac3(None);
        debug!("domain sizes after initial pruning: {:?}", self.domains.sizes());

        let mut assignment = Assignment::for_crossword(self.crossword);
        let state = if consistent_initially {
            self.search(&mut assignment)
        } else {
            SearchState::Failed
        };

        self.statistics.duration = start.elapsed();
        info!("search finished ({:?}): {:?}", state, self.statistics);

        match state {
            SearchState::Solved => Ok(FillSuccess {
                statistics: self.statistics.clone(),
                assignment,
            }),
            SearchState::Failed => Err(FillFailure::Unsatisfiable),
            SearchState::LimitReached => Err(FillFailure::ExhaustedStateLimit),
        }
    }

    fn search(&mut self, assignment: &mut Assignment) -> SearchState {
        if assignment_complete(self.crossword, assignment) {
            return SearchState::Solved;
        }

        if let Some(limit) = self.options.state_limit {
            if self.statistics.states >= limit {
                return SearchState::LimitReached;
            }
        }
        self.statistics.states += 1;

        let var = match self.select_unassigned_variable(assignment) {
            Some(var) => var,
            None => return SearchState::Solved,
        };

        trace!(
            "state {}: filling {} ({} options)",
            self.statistics.states,
            self.crossword.variables[var],
            self.domains.len(var)
        );

        for word_id in self.order_domain_values(var, assignment) {
            assignment.bind(var, word_id);

            if !consistent(self.crossword, assignment) {
                assignment.unbind(var);
                continue;
            }

            // Everything pruned below this point belongs to this candidate alone, so the
            // snapshot goes back in before the next candidate is tried.
            let snapshot = self.domains.clone();
            self.domains.restrict_to(var, word_id);
            let arcs =
                self.crossword.neighbors(var).iter().map(|&neighbor| (neighbor, var)).collect();

            if self.ac3(Some(arcs)) {
                match self.search(assignment) {
                    SearchState::Solved => return SearchState::Solved,
                    SearchState::LimitReached => {
                        self.domains = snapshot;
                        assignment.unbind(var);
                        return SearchState::LimitReached;
                    }
                    SearchState::Failed => {}
                }
            }

            self.statistics.backtracks += 1;
            self.domains = snapshot;
            assignment.unbind(var);
        }

        SearchState::Failed
    }
}

/// Search for a valid fill for the given crossword.
pub fn find_fill(crossword: &Crossword, options: &FillOptions) -> Result<FillSuccess, FillFailure> {
    Solver::with_options(crossword, options.clone()).fill()
}
