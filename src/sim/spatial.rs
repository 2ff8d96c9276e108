//! Uniform-grid spatial hash for broad-phase collision queries
//!
//! Maps entities to every grid cell their bounding square overlaps and
//! answers "who is near X" by scanning the 3x3 neighborhood of each
//! overlapped cell. The index holds no memory across steps: the owner
//! clears and repopulates it from the current live set before querying.
//!
//! Precondition (not runtime-checked): `cell_size >= 2 * max entity
//! radius`, otherwise an entity can overlap cells outside its neighbors'
//! 3x3 blocks and the no-false-negative guarantee degrades.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use glam::Vec2;

use crate::error::{ConfigError, ConfigResult};

/// Grid-based broad-phase index over circular entities.
///
/// Entities are referenced by a caller-chosen copyable key; the index never
/// stores positions beyond the current clear/insert cycle. Cells are created
/// lazily on first insert, so an empty cell simply does not exist.
#[derive(Debug)]
pub struct SpatialHash<K> {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<K>>,
    /// Primary (minimum) cell per entity. Diagnostics only.
    primary: HashMap<K, (i32, i32)>,
}

impl<K: Copy + Eq + Hash> SpatialHash<K> {
    /// Create an index with the given cell size. Rejects non-positive or
    /// non-finite sizes.
    pub fn new(cell_size: f32) -> ConfigResult<Self> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(ConfigError::InvalidCellSize { value: cell_size });
        }
        Ok(Self {
            cell_size,
            cells: HashMap::new(),
            primary: HashMap::new(),
        })
    }

    /// Configured cell size.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell coordinates containing a point. Cells may be negative and are
    /// unbounded in range.
    pub fn cell_of(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    /// Inclusive cell range covered by an axis-aligned box.
    fn cell_range(&self, min: Vec2, max: Vec2) -> ((i32, i32), (i32, i32)) {
        (self.cell_of(min), self.cell_of(max))
    }

    /// Empty all cells and the per-entity bookkeeping. Called once per step
    /// before repopulating.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.primary.clear();
    }

    /// Insert an entity into every cell its bounding square overlaps.
    ///
    /// An entity spanning k x m cells appears in all of them; this is what
    /// makes multi-cell overlap queries exact, not an optimization.
    pub fn insert(&mut self, key: K, position: Vec2, radius: f32) {
        let half = Vec2::splat(radius);
        let ((min_cx, min_cy), (max_cx, max_cy)) =
            self.cell_range(position - half, position + half);

        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                self.cells.entry((cx, cy)).or_default().push(key);
            }
        }
        self.primary.insert(key, (min_cx, min_cy));
    }

    /// Candidate neighbors of an entity: every distinct entity found in the
    /// 3x3 neighborhood of each cell the query entity overlaps, excluding
    /// the entity itself. Order is unspecified.
    pub fn query(&self, key: K, position: Vec2, radius: f32) -> Vec<K> {
        let half = Vec2::splat(radius);
        let ((min_cx, min_cy), (max_cx, max_cy)) =
            self.cell_range(position - half, position + half);

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for cx in (min_cx - 1)..=(max_cx + 1) {
            for cy in (min_cy - 1)..=(max_cy + 1) {
                self.collect_cell((cx, cy), Some(key), &mut seen, &mut out);
            }
        }
        out
    }

    /// Candidates around a raw point: the 3x3 block of cells centered on
    /// the point's cell. No self-exclusion, there is no self.
    pub fn query_point(&self, point: Vec2) -> Vec<K> {
        let (cx, cy) = self.cell_of(point);

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for nx in (cx - 1)..=(cx + 1) {
            for ny in (cy - 1)..=(cy + 1) {
                self.collect_cell((nx, ny), None, &mut seen, &mut out);
            }
        }
        out
    }

    /// Candidates inside an axis-aligned box: only the cells the box
    /// covers, with no neighbor expansion.
    pub fn query_rect(&self, min: Vec2, max: Vec2) -> Vec<K> {
        let ((min_cx, min_cy), (max_cx, max_cy)) = self.cell_range(min, max);

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                self.collect_cell((cx, cy), None, &mut seen, &mut out);
            }
        }
        out
    }

    fn collect_cell(
        &self,
        cell: (i32, i32),
        exclude: Option<K>,
        seen: &mut HashSet<K>,
        out: &mut Vec<K>,
    ) {
        let Some(entries) = self.cells.get(&cell) else {
            return;
        };
        for &entry in entries {
            if Some(entry) == exclude {
                continue;
            }
            if seen.insert(entry) {
                out.push(entry);
            }
        }
    }

    /// Number of distinct entities inserted since the last clear.
    pub fn entity_count(&self) -> usize {
        self.primary.len()
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Primary (minimum) cell recorded for an entity. Diagnostics only; no
    /// query logic depends on it.
    pub fn primary_cell(&self, key: K) -> Option<(i32, i32)> {
        self.primary.get(&key).copied()
    }
}
