pub const WEEK_LENGTH: usize = 7;

/// Week-major calendar grid. `weeks[w][d]` is weekday `d` (0 = Sunday) of week `w`.
/// `None` marks a slot past the last day of data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    weeks: Vec<[Option<u8>; WEEK_LENGTH]>,
    days: usize,
}

impl Grid {
    /// Place newest-first `levels` so that week 0, row 0 holds the oldest day.
    pub fn layout(levels: &[u8]) -> Self {
        let len = levels.len();
        let mut weeks = vec![[None; WEEK_LENGTH]; len.div_ceil(WEEK_LENGTH)];
        for (k, &value) in levels.iter().enumerate() {
            let inv = len - 1 - k;
            weeks[inv / WEEK_LENGTH][inv % WEEK_LENGTH] = Some(value);
        }
        Self { weeks, days: len }
    }

    pub fn width(&self) -> usize {
        self.weeks.len()
    }

    pub fn get(&self, week: usize, weekday: usize) -> Option<u8> {
        self.weeks.get(week).and_then(|w| w.get(weekday).copied().flatten())
    }

    /// One weekday across all weeks, oldest week first.
    pub fn row(&self, weekday: usize) -> impl Iterator<Item = Option<u8>> + '_ {
        self.weeks.iter().map(move |w| w[weekday])
    }

    /// Read the grid back into the newest-first order it was built from.
    pub fn newest_first(&self) -> Vec<u8> {
        (0..self.days)
            .rev()
            .filter_map(|inv| self.get(inv / WEEK_LENGTH, inv % WEEK_LENGTH))
            .collect()
    }
}
