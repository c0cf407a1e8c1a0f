//! Fixed-capacity overwrite ring for `f64` samples.
//!
//! New items overwrite the oldest once the ring is full. The write slot is a
//! modulo counter so `push` is O(1) with no shifting.

#[derive(Debug, Clone)]
pub struct RollingWindow {
    data: Vec<f64>,
    /// Slot the next push writes to.
    head: usize,
    /// Number of filled slots (<= capacity).
    len: usize,
}

impl RollingWindow {
    /// Empty ring; capacity is clamped to at least 1.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    /// Full ring with every slot set to `value`.
    pub fn filled(capacity: usize, value: f64) -> Self {
        let cap = capacity.max(1);
        Self {
            data: vec![value; cap],
            head: 0,
            len: cap,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, v: f64) {
        let cap = self.data.len();
        self.data[self.head] = v;
        self.head = (self.head + 1) % cap;
        if self.len < cap {
            self.len += 1;
        }
    }

    /// Item `age` pushes ago; 0 is the newest.
    pub fn get(&self, age: usize) -> Option<f64> {
        if age >= self.len {
            return None;
        }
        let cap = self.data.len();
        Some(self.data[(self.head + cap - 1 - age) % cap])
    }

    /// Newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).filter_map(move |age| self.get(age))
    }

    /// Mean of the filled slots, 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.iter().sum::<f64>() / self.len as f64
    }
}
