//! Elevation grid

/// Row-major grid of elevation samples
///
/// Source rows are stored flipped: the last source row (the southern
/// edge of a north-up raster) is row 0, so row index grows with map Y.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl ElevationGrid {
    /// Creates a zero-filled grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Wraps existing samples; returns None if the length does not match
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == width * height).then_some(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Mutable view of one output row
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
