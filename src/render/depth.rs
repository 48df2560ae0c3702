/// Per-column wall distances for the current frame.
///
/// Written by the wall pass, then read by the sprite pass. Columns where no
/// wall was hit hold `f64::INFINITY`, so nothing is occluded there.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthBuffer {
    depths: Vec<f64>,
}

impl DepthBuffer {
    pub fn new(columns: usize) -> Self {
        Self { depths: vec![f64::INFINITY; columns] }
    }

    /// Clears every column and resizes to `columns`.
    pub fn reset(&mut self, columns: usize) {
        self.depths.clear();
        self.depths.resize(columns, f64::INFINITY);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    #[inline]
    pub fn set(&mut self, column: usize, depth: f64) {
        if let Some(slot) = self.depths.get_mut(column) {
            *slot = depth;
        }
    }

    /// Depth of `column`; columns past the end read as open.
    #[inline]
    pub fn get(&self, column: usize) -> f64 {
        self.depths.get(column).copied().unwrap_or(f64::INFINITY)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.depths
    }
}
