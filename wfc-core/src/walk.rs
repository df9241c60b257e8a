use crate::solver::Solver;
use log::warn;
use rand::Rng;

impl Solver {
    /// Length of a walk from `from` to `to` over collapsed cells, or -1 if
    /// `to` cannot be reached.
    ///
    /// A step leaves a cell only through the walk directions of its own
    /// tile. The entered cell just has to be collapsed, so a walk may end on
    /// a non-walkable tile but never continue from one.
    ///
    /// This is a single randomized depth-first walk with backtracking, not a
    /// shortest path search: the result depends on the random choices made
    /// at each branch and is only minimal when the walkable cells form a
    /// simple corridor. Randomness is drawn from a copy of the solver's
    /// generator, so calling this does not disturb later collapses.
    #[must_use]
    pub fn cell_walking_distance(&self, from: usize, to: usize) -> i64 {
        let mut rng = self.rng.clone();
        self.cell_walking_distance_with(from, to, &mut rng)
    }

    /// [`Solver::cell_walking_distance`] with an explicit random source.
    pub fn cell_walking_distance_with<R: Rng + ?Sized>(
        &self,
        from: usize,
        to: usize,
        rng: &mut R,
    ) -> i64 {
        let size = self.size();
        if !size.contains(from) || !size.contains(to) {
            warn!(
                "cell_walking_distance called with out-of-range index ({}, {})",
                from, to
            );
            return -1;
        }
        if from == to {
            return 0;
        }

        let mut visited = vec![false; size.cell_count()];
        let mut path = vec![from];
        visited[from] = true;

        while let Some(&current) = path.last() {
            let open: Vec<usize> = self
                .walkable_neighbors(current)
                .into_iter()
                .filter(|&neighbor| !visited[neighbor])
                .collect();
            if open.is_empty() {
                path.pop();
                continue;
            }
            let next = open[rng.gen_range(0..open.len())];
            if next == to {
                return i64::try_from(path.len()).unwrap_or(i64::MAX);
            }
            visited[next] = true;
            path.push(next);
        }
        -1
    }
}
