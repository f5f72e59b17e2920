use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    pub hits: usize,
    pub misses: usize,

    pub inserted: usize,
    pub updated: usize,
    pub rejected: usize,

    // Slots examined by every insert and lookup so far
    pub probes: usize,
}

impl TableStats {
    pub fn lookups(&self) -> usize {
        self.hits + self.misses
    }

    pub fn writes(&self) -> usize {
        self.inserted + self.updated + self.rejected
    }

    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.lookups())
    }

    pub fn acceptance_rate(&self) -> f64 {
        ratio(self.inserted + self.updated, self.writes())
    }

    pub fn mean_probes(&self) -> f64 {
        ratio(self.probes, self.lookups() + self.writes())
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        return 0.0;
    }
    num as f64 / denom as f64
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table Stats:")?;
        writeln!(f, "Hits: {}", self.hits)?;
        writeln!(f, "Misses: {}", self.misses)?;
        writeln!(f, "Hit Rate: {:.3}", self.hit_rate())?;
        writeln!(f)?;
        writeln!(f, "Inserted: {}", self.inserted)?;
        writeln!(f, "Updated: {}", self.updated)?;
        writeln!(f, "Rejected: {}", self.rejected)?;
        writeln!(f, "Acceptance Rate: {:.3}", self.acceptance_rate())?;
        writeln!(f)?;
        writeln!(f, "Probes: {}", self.probes)?;
        write!(f, "Mean Probes: {:.3}", self.mean_probes())
    }
}
