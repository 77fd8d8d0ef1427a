use crate::Fitness;

/// Counts generations since the best fitness last improved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Stagnation {
    limit: usize,
    best: Option<Fitness>,
    count: usize,
}

impl Stagnation {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            limit,
            best: None,
            count: 0,
        }
    }

    /// Records this generation's best and reports whether the limit is reached.
    pub(crate) fn update(&mut self, best: Fitness) -> bool {
        match self.best {
            Some(previous) if best <= previous => self.count += 1,
            _ => {
                self.best = Some(best);
                self.count = 0;
            }
        }
        self.count >= self.limit
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }
}
