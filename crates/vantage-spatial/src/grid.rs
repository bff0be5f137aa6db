//! Fixed-extent uniform grid storing object indices per cell.

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};
use vantage_config::SpatialConfig;

/// Integer cell coordinate, each component in `[0, dimension)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl CellKey {
    /// Create a new cell key.
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// A uniform grid of `dimension³` cells, each holding the indices of objects
/// whose bounding-sphere AABB overlaps it.
///
/// Only occupied cells are materialized; the logical extent is fixed at
/// `dimension × cell_size` per axis, centred on the origin. Positions outside
/// that extent are clamped into the border cells rather than rejected.
pub struct SpatialGrid {
    /// Occupied cells -> indices of objects overlapping them.
    cells: FxHashMap<CellKey, Vec<usize>>,

    /// Positions captured by the last rebuild, used to rank query results.
    positions: Vec<Vec3>,

    cell_size: f32,
    dimension: u32,
    search_radius_cells: u32,
    max_results: usize,
}

impl SpatialGrid {
    /// Create an empty grid sized from configuration.
    pub fn new(config: &SpatialConfig) -> Self {
        let mut grid = Self {
            cells: FxHashMap::default(),
            positions: Vec::new(),
            cell_size: 1.0,
            dimension: 1,
            search_radius_cells: 0,
            max_results: 0,
        };
        grid.reconfigure(config);
        grid
    }

    /// Apply new sizing. Takes effect on the next [`rebuild`](Self::rebuild);
    /// current contents are dropped since their cell keys would be stale.
    pub fn reconfigure(&mut self, config: &SpatialConfig) {
        self.cell_size = if config.cell_size > f32::EPSILON {
            config.cell_size
        } else {
            1.0
        };
        self.dimension = config.grid_dimension.max(1);
        self.search_radius_cells = config.search_radius_cells;
        self.max_results = config.max_nearby_objects;
        self.cells.clear();
        self.positions.clear();
    }

    /// Number of objects indexed by the last rebuild.
    pub fn object_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of cells holding at least one object.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the last rebuild indexed no objects.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Half of the grid's edge length in world units.
    pub fn half_extent(&self) -> f32 {
        self.dimension as f32 * self.cell_size * 0.5
    }

    /// Map a world position to its cell, clamping to the grid bounds.
    pub fn cell_of(&self, point: Vec3) -> CellKey {
        let half = self.half_extent();
        let max_index = (self.dimension - 1) as f32;
        // NaN survives clamp and then casts to 0, which is still in range.
        let axis = |v: f32| ((v + half) / self.cell_size).floor().clamp(0.0, max_index) as u32;
        CellKey::new(axis(point.x), axis(point.y), axis(point.z))
    }

    /// Indices stored in a single cell.
    pub fn objects_in_cell(&self, key: CellKey) -> &[usize] {
        self.cells.get(&key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Clear every cell and re-insert all objects.
    ///
    /// The shorter of the two slices decides how many objects are indexed.
    /// Negative or NaN radii are treated as zero.
    pub fn rebuild(&mut self, positions: &[Vec3], radii: &[f32]) {
        let count = positions.len().min(radii.len());
        if positions.len() != radii.len() {
            tracing::warn!(
                positions = positions.len(),
                radii = radii.len(),
                "spatial grid: mismatched input lengths, indexing {count} objects"
            );
        }

        self.cells.clear();
        self.positions.clear();
        self.positions.extend_from_slice(&positions[..count]);

        for (index, (&center, &radius)) in positions.iter().zip(radii).enumerate() {
            let radius = radius.max(0.0);
            let min = self.cell_of(center - Vec3::splat(radius));
            let max = self.cell_of(center + Vec3::splat(radius));

            for x in min.x..=max.x {
                for y in min.y..=max.y {
                    for z in min.z..=max.z {
                        self.cells
                            .entry(CellKey::new(x, y, z))
                            .or_default()
                            .push(index);
                    }
                }
            }
        }

        tracing::trace!(
            objects = count,
            occupied_cells = self.cells.len(),
            "spatial grid rebuilt"
        );
    }

    /// Indices of objects registered in the cells around `point`.
    ///
    /// Scans a cube of `search_radius_cells` around the point's cell, removes
    /// duplicates, sorts by distance to `point` (nearest first), and keeps at
    /// most `max_nearby_objects`.
    pub fn query(&self, point: Vec3) -> Vec<usize> {
        if self.positions.is_empty() {
            return Vec::new();
        }

        let center = self.cell_of(point);
        let reach = self.search_radius_cells;
        let last = self.dimension - 1;
        let span = |c: u32| c.saturating_sub(reach)..=c.saturating_add(reach).min(last);

        let mut seen = FxHashSet::default();
        let mut ranked: Vec<(f32, usize)> = Vec::new();

        for x in span(center.x) {
            for y in span(center.y) {
                for z in span(center.z) {
                    for &index in self.objects_in_cell(CellKey::new(x, y, z)) {
                        if seen.insert(index) {
                            let dist_sq = point.distance_squared(self.positions[index]);
                            ranked.push((dist_sq, index));
                        }
                    }
                }
            }
        }

        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.truncate(self.max_results);
        ranked.into_iter().map(|(_, index)| index).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SpatialGrid {
        SpatialGrid::new(&SpatialConfig::default())
    }

    #[test]
    fn test_empty_grid_returns_nothing() {
        let grid = grid();
        assert!(grid.is_empty());
        assert!(grid.query(Vec3::ZERO).is_empty());

        let mut grid = grid;
        grid.rebuild(&[], &[]);
        assert!(grid.query(Vec3::new(3.0, 4.0, 5.0)).is_empty());
    }

    #[test]
    fn test_insert_and_query_single_object() {
        let mut grid = grid();
        grid.rebuild(&[Vec3::new(1.0, 2.0, 3.0)], &[0.5]);
        assert_eq!(grid.object_count(), 1);
        assert_eq!(grid.query(Vec3::new(1.0, 2.0, 3.0)), vec![0]);
        assert_eq!(grid.query(Vec3::ZERO), vec![0]);
    }

    #[test]
    fn test_cell_of_maps_origin_to_middle() {
        let grid = grid();
        // 100 cells of 5 units: origin sits at the start of cell 50.
        assert_eq!(grid.cell_of(Vec3::ZERO), CellKey::new(50, 50, 50));
        assert_eq!(grid.cell_of(Vec3::splat(-0.1)), CellKey::new(49, 49, 49));
        assert_eq!(grid.cell_of(Vec3::new(7.5, 0.0, -7.5)), CellKey::new(51, 50, 48));
    }

    #[test]
    fn test_out_of_range_positions_are_clamped() {
        let mut grid = grid();
        let far = Vec3::new(1.0e6, -1.0e6, 0.0);
        assert_eq!(grid.cell_of(far), CellKey::new(99, 0, 50));

        grid.rebuild(&[far], &[1.0]);
        assert_eq!(grid.objects_in_cell(CellKey::new(99, 0, 50)), &[0]);
        // Querying near the clamped border cell finds the object.
        assert_eq!(grid.query(Vec3::new(249.0, -249.0, 0.0)), vec![0]);
    }

    #[test]
    fn test_nan_position_does_not_panic() {
        let mut grid = grid();
        grid.rebuild(&[Vec3::new(f32::NAN, 0.0, 0.0)], &[1.0]);
        assert_eq!(grid.object_count(), 1);
        let _ = grid.query(Vec3::ZERO);
    }

    #[test]
    fn test_large_sphere_spans_multiple_cells() {
        let mut grid = grid();
        grid.rebuild(&[Vec3::new(2.5, 2.5, 2.5)], &[5.0]);
        // AABB [-2.5, 7.5] covers cells 49..=51 on each axis.
        assert_eq!(grid.occupied_cells(), 27);
        assert_eq!(grid.objects_in_cell(CellKey::new(49, 51, 50)), &[0]);
    }

    #[test]
    fn test_query_deduplicates_multi_cell_objects() {
        let mut grid = grid();
        grid.rebuild(&[Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)], &[6.0, 0.1]);
        let result = grid.query(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_query_sorted_by_distance() {
        let mut grid = grid();
        let positions = [
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(-6.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        grid.rebuild(&positions, &[0.5; 4]);
        assert_eq!(grid.query(Vec3::ZERO), vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_query_respects_search_radius() {
        let mut grid = grid();
        // Three cells of reach at 5 units each: 40 units away is out of range.
        grid.rebuild(&[Vec3::new(1.0, 0.0, 0.0), Vec3::new(40.0, 0.0, 0.0)], &[0.5, 0.5]);
        assert_eq!(grid.query(Vec3::ZERO), vec![0]);
    }

    #[test]
    fn test_query_truncates_to_max_results() {
        let config = SpatialConfig {
            max_nearby_objects: 3,
            ..Default::default()
        };
        let mut grid = SpatialGrid::new(&config);
        let positions: Vec<Vec3> = (0..10).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        grid.rebuild(&positions, &[0.2; 10]);
        assert_eq!(grid.query(Vec3::ZERO), vec![0, 1, 2]);
    }

    #[test]
    fn test_rebuild_clears_previous_frame() {
        let mut grid = grid();
        grid.rebuild(&[Vec3::ZERO], &[1.0]);
        grid.rebuild(&[Vec3::new(200.0, 200.0, 200.0)], &[1.0]);
        assert_eq!(grid.object_count(), 1);
        assert!(grid.query(Vec3::ZERO).is_empty());
        assert_eq!(grid.query(Vec3::new(200.0, 200.0, 200.0)), vec![0]);
    }

    #[test]
    fn test_mismatched_lengths_use_shorter() {
        let mut grid = grid();
        grid.rebuild(&[Vec3::ZERO, Vec3::X, Vec3::Y], &[1.0]);
        assert_eq!(grid.object_count(), 1);
        assert_eq!(grid.query(Vec3::ZERO), vec![0]);

        grid.rebuild(&[Vec3::ZERO], &[1.0, 2.0, 3.0]);
        assert_eq!(grid.object_count(), 1);
    }

    #[test]
    fn test_negative_radius_treated_as_point() {
        let mut grid = grid();
        grid.rebuild(&[Vec3::new(1.0, 1.0, 1.0)], &[-3.0]);
        assert_eq!(grid.occupied_cells(), 1);
    }

    #[test]
    fn test_reconfigure_changes_cell_size() {
        let mut grid = grid();
        grid.reconfigure(&SpatialConfig {
            cell_size: 1.0,
            grid_dimension: 10,
            ..Default::default()
        });
        assert_eq!(grid.half_extent(), 5.0);
        assert_eq!(grid.cell_of(Vec3::ZERO), CellKey::new(5, 5, 5));
        assert_eq!(grid.cell_of(Vec3::splat(100.0)), CellKey::new(9, 9, 9));
    }
}
