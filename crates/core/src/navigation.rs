/// Position within a fixed-length ordered sequence.
///
/// Moves clamp at both ends and never wrap. An empty sequence pins the index at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    index: usize,
    len: usize,
}

impl Cursor {
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    #[must_use]
    pub const fn current(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.index + 1 >= self.len
    }

    /// Advance by one. Returns false at the last item.
    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.len {
            self.index += 1;
            return true;
        }
        false
    }

    /// Step back by one. Returns false at the first item.
    pub fn previous(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            return true;
        }
        false
    }

    /// Jump to `index` if it is in range; otherwise leave the cursor where it is.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.len {
            self.index = index;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// `(index + 1) / len` as a percentage; zero for an empty sequence.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        (self.index + 1) as f64 / self.len as f64 * 100.0
    }
}
