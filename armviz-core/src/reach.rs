// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use nalgebra::Point2;

/// Grid resolution of the reference workspace, in cells per axis.
pub const DEFAULT_RESOLUTION: usize = 80;
/// Grid cells per world unit.
pub const DEFAULT_SCALE: f32 = 10.0;
/// World offset mapped onto grid index zero.
pub const DEFAULT_OFFSET: f32 = 4.0;
/// Score of a cell that was never reached.
///
/// Must exceed any achievable score, for a 3 link chain that is 3π.
pub const DEFAULT_SENTINEL: f32 = 5.0;

/// Reachability grid configuration.
///
/// A world position maps onto cell `floor((p + offset) * scale)` on
/// both axes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of cells per axis.
    pub resolution: usize,
    /// Cells per world unit.
    pub scale: f32,
    /// World offset mapped onto index zero.
    pub offset: f32,
    /// Initial score of every cell.
    pub sentinel: f32,
}

impl GridConfig {
    /// World coordinate range covered by the grid on each axis.
    pub fn extent(&self) -> (f32, f32) {
        let lower = -self.offset;
        (lower, lower + self.resolution as f32 / self.scale)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            scale: DEFAULT_SCALE,
            offset: DEFAULT_OFFSET,
            sentinel: DEFAULT_SENTINEL,
        }
    }
}

/// Square grid of best observed scores over the planar workspace.
///
/// Each cell holds the minimum score ever recorded for a position inside
/// that cell. Cells start at the sentinel and never increase.
#[derive(Clone, Debug, PartialEq)]
pub struct ReachabilityGrid {
    config: GridConfig,
    cells: Vec<f32>,
}

impl ReachabilityGrid {
    /// Construct a new grid with every cell unreached.
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            cells: vec![config.sentinel; config.resolution * config.resolution],
        }
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of cells per axis.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.config.resolution
    }

    /// Map a world position onto its grid cell.
    ///
    /// Returns `None` if the position falls outside the grid.
    pub fn cell_index(&self, position: &Point2<f32>) -> Option<(usize, usize)> {
        let grid_x = self.axis_index(position.x)?;
        let grid_y = self.axis_index(position.y)?;

        Some((grid_x, grid_y))
    }

    fn axis_index(&self, value: f32) -> Option<usize> {
        let index = ((value + self.config.offset) * self.config.scale).floor();

        // NaN fails both comparisons.
        if index >= 0.0 && index < self.config.resolution as f32 {
            Some(index as usize)
        } else {
            None
        }
    }

    /// Record a score observed at a world position.
    ///
    /// The cell keeps the lower of its current score and the new score.
    /// Positions outside the grid are discarded, in which case `false` is
    /// returned.
    pub fn record(&mut self, position: &Point2<f32>, score: f32) -> bool {
        match self.cell_index(position) {
            Some((x, y)) => {
                let cell = &mut self.cells[y * self.config.resolution + x];
                if score < *cell {
                    *cell = score;
                }
                true
            }
            None => false,
        }
    }

    /// Score of the cell at column `x` and row `y`.
    pub fn cell(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.config.resolution && y < self.config.resolution {
            Some(self.cells[y * self.config.resolution + x])
        } else {
            None
        }
    }

    /// All cells in row major order.
    #[inline]
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    /// Iterate over the grid rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // Zero sized chunks are not allowed.
        self.cells.chunks(self.config.resolution.max(1))
    }

    /// Whether the cell was reached at least once.
    pub fn is_reached(&self, x: usize, y: usize) -> bool {
        self.cell(x, y)
            .map_or(false, |score| score < self.config.sentinel)
    }

    /// Number of reached cells.
    pub fn coverage(&self) -> usize {
        self.cells
            .iter()
            .filter(|score| **score < self.config.sentinel)
            .count()
    }

    /// Grayscale intensity of a cell.
    ///
    /// The score maps linearly onto the range between the sentinel (black)
    /// and zero (white).
    pub fn brightness(&self, x: usize, y: usize) -> Option<u8> {
        let score = self.cell(x, y)?;
        let sentinel = self.config.sentinel;

        let normal = ((sentinel - score) / sentinel).clamp(0.0, 1.0);

        Some((normal * 255.0).round() as u8)
    }
}

impl std::fmt::Display for ReachabilityGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.cells.len();
        let coverage = self.coverage();

        write!(
            f,
            "{}x{} grid; Reached: {}/{} ({:.1}%)",
            self.config.resolution,
            self.config.resolution,
            coverage,
            total,
            if total > 0 {
                coverage as f32 / total as f32 * 100.0
            } else {
                0.0
            }
        )
    }
}
