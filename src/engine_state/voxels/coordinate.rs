//! # Coordinate Module
//!
//! Maps continuous world positions onto the integer chunk grid.
//!
//! The world is only chunked laterally: a chunk covers the whole vertical column
//! `[origin.y, origin.y + extents.y)`, so a chunk address is an `(x, z)` pair.
//! All conversions go through [`WorldLayout`], which holds the grid anchor and the
//! chunk extents fixed at startup.
//!
//! ## Boundary Rule
//!
//! Every conversion uses half-open intervals: a position lying exactly on a chunk
//! boundary belongs to the chunk on the positive side. Flooring and
//! [`lying_between`] agree on this, so a player standing on a boundary never
//! flickers between two chunks.

use cgmath::Point3;
use serde::Deserialize;

/// Size of a chunk in blocks along each axis.
///
/// `y` is the full height of the column; chunks are never stacked vertically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChunkExtents {
    /// Width of a chunk along X
    pub x: i32,
    /// Height of the chunk column along Y
    pub y: i32,
    /// Depth of a chunk along Z
    pub z: i32,
}

impl ChunkExtents {
    /// Creates a new set of chunk extents.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        ChunkExtents { x, y, z }
    }

    /// The total number of blocks in a chunk with these extents.
    pub fn volume(&self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Whether `(x, y, z)` addresses a block inside a chunk of these extents.
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        (0..self.x).contains(&x) && (0..self.y).contains(&y) && (0..self.z).contains(&z)
    }
}

impl Default for ChunkExtents {
    fn default() -> Self {
        ChunkExtents::new(16, 32, 16)
    }
}

/// The four lateral directions a chunk can have a neighbor in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards negative Z
    North,
    /// Towards positive Z
    South,
    /// Towards positive X
    East,
    /// Towards negative X
    West,
}

impl Direction {
    /// All lateral directions, in neighbor slot order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// The slot this direction occupies in a chunk's neighbor array.
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    /// The direction pointing back the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// The grid step `(dx, dz)` taken when moving one chunk in this direction.
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

/// Integer grid address of a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoordinate {
    /// Grid column along X
    pub x: i32,
    /// Grid row along Z
    pub z: i32,
}

impl ChunkCoordinate {
    /// Creates a coordinate from its grid components.
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoordinate { x, z }
    }

    /// The coordinate of the adjacent chunk in `direction`.
    pub fn offset(self, direction: Direction) -> ChunkCoordinate {
        let (dx, dz) = direction.step();
        ChunkCoordinate::new(self.x + dx, self.z + dz)
    }

    /// Grid distance used for the draw radius (the larger of the two axis distances).
    pub fn chebyshev_distance(self, other: ChunkCoordinate) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// Every coordinate within `radius` of this one, inclusive.
    ///
    /// The result is ordered row by row (z outer, x inner) and holds
    /// `(2 * radius + 1)²` entries; a negative radius yields nothing. The radius is capped
    /// at [`MAX_DRAW_DISTANCE`], and rows or columns past the `i32` range are left out.
    pub fn square_around(self, radius: i32) -> Vec<ChunkCoordinate> {
        if radius < 0 {
            return Vec::new();
        }
        let radius = radius.min(MAX_DRAW_DISTANCE);
        let side = (2 * radius + 1) as usize;
        let mut coordinates = Vec::with_capacity(side * side);
        for z in self.z.saturating_sub(radius)..=self.z.saturating_add(radius) {
            for x in self.x.saturating_sub(radius)..=self.x.saturating_add(radius) {
                coordinates.push(ChunkCoordinate::new(x, z));
            }
        }
        coordinates
    }
}

/// Determines whether `coordinate + delta` falls inside the half-open span between two bounds.
///
/// The bounds may be given in either order. The lower bound is inclusive and the
/// upper one exclusive, matching the flooring used by [`WorldLayout::coordinate_of`].
pub fn lying_between(coordinate: f32, delta: f32, first_bound: f32, second_bound: f32) -> bool {
    let moved = coordinate + delta;
    let (low, high) = if first_bound <= second_bound {
        (first_bound, second_bound)
    } else {
        (second_bound, first_bound)
    };
    moved >= low && moved < high
}

/// Largest chunk coordinate magnitude a position maps to.
///
/// Far past the point where `f32` positions can still address single blocks.
pub const COORDINATE_LIMIT: i32 = 1 << 20;

/// Largest supported draw radius, in chunks.
pub const MAX_DRAW_DISTANCE: i32 = 64;

/// Largest supported chunk size along any axis, in blocks.
pub const MAX_CHUNK_EXTENT: i32 = 256;

/// Fixed startup description of the chunk grid: where it is anchored and how big a chunk is.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldLayout {
    /// World-space corner of chunk (0, 0)
    pub origin: Point3<f32>,
    /// Size of every chunk in blocks
    pub extents: ChunkExtents,
}

impl WorldLayout {
    /// Creates a layout anchored at `origin`.
    pub fn new(origin: Point3<f32>, extents: ChunkExtents) -> Self {
        WorldLayout { origin, extents }
    }

    /// The chunk covering `position`.
    ///
    /// The Y component is ignored. Components are clamped to [`COORDINATE_LIMIT`], so
    /// non-finite or enormous inputs still produce a usable coordinate.
    pub fn coordinate_of(&self, position: Point3<f32>) -> ChunkCoordinate {
        let x = ((position.x - self.origin.x) / self.extents.x as f32).floor() as i32;
        let z = ((position.z - self.origin.z) / self.extents.z as f32).floor() as i32;
        ChunkCoordinate::new(
            x.clamp(-COORDINATE_LIMIT, COORDINATE_LIMIT),
            z.clamp(-COORDINATE_LIMIT, COORDINATE_LIMIT),
        )
    }

    /// World-space minimum corner of the chunk at `coordinate`.
    pub fn chunk_origin(&self, coordinate: ChunkCoordinate) -> Point3<f32> {
        Point3::new(
            self.origin.x + coordinate.x as f32 * self.extents.x as f32,
            self.origin.y,
            self.origin.z + coordinate.z as f32 * self.extents.z as f32,
        )
    }

    /// Half-open `[low, high)` X span of the chunk at `coordinate`.
    pub fn chunk_bounds_x(&self, coordinate: ChunkCoordinate) -> (f32, f32) {
        let low = self.chunk_origin(coordinate).x;
        (low, low + self.extents.x as f32)
    }

    /// Half-open `[low, high)` Z span of the chunk at `coordinate`.
    pub fn chunk_bounds_z(&self, coordinate: ChunkCoordinate) -> (f32, f32) {
        let low = self.chunk_origin(coordinate).z;
        (low, low + self.extents.z as f32)
    }

    /// The chunk and the chunk-local block cell containing `position`.
    ///
    /// Returns `None` when `position` is above or below the chunk column.
    pub fn local_block(&self, position: Point3<f32>) -> Option<(ChunkCoordinate, Point3<usize>)> {
        let coordinate = self.coordinate_of(position);
        let chunk_origin = self.chunk_origin(coordinate);
        let local_x = (position.x - chunk_origin.x).floor() as i32;
        let local_y = (position.y - chunk_origin.y).floor() as i32;
        let local_z = (position.z - chunk_origin.z).floor() as i32;

        // Rounding right below a boundary can land one past the last cell
        let local_x = local_x.clamp(0, self.extents.x - 1);
        let local_z = local_z.clamp(0, self.extents.z - 1);

        if !(0..self.extents.y).contains(&local_y) {
            return None;
        }

        Some((
            coordinate,
            Point3::new(local_x as usize, local_y as usize, local_z as usize),
        ))
    }
}

impl Default for WorldLayout {
    fn default() -> Self {
        WorldLayout::new(Point3::new(0.0, 0.0, 0.0), ChunkExtents::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_16() -> WorldLayout {
        WorldLayout::new(Point3::new(0.0, 0.0, 0.0), ChunkExtents::new(16, 16, 16))
    }

    #[test]
    fn positions_in_the_same_cell_share_a_coordinate() {
        let layout = layout_16();
        assert_eq!(
            layout.coordinate_of(Point3::new(0.0, 0.0, 0.0)),
            layout.coordinate_of(Point3::new(15.99, 100.0, 15.99))
        );
        assert_eq!(
            layout.coordinate_of(Point3::new(-0.01, 0.0, 3.0)),
            ChunkCoordinate::new(-1, 0)
        );
    }

    #[test]
    fn boundary_position_belongs_to_positive_chunk() {
        let layout = layout_16();
        assert_eq!(
            layout.coordinate_of(Point3::new(16.0, 0.0, -16.0)),
            ChunkCoordinate::new(1, -1)
        );
        let (low, high) = layout.chunk_bounds_x(ChunkCoordinate::new(1, 0));
        assert!(lying_between(16.0, 0.0, low, high));
        assert!(!lying_between(15.5, 0.25, low, high));
    }

    #[test]
    fn offset_origin_shifts_the_grid() {
        let layout = WorldLayout::new(Point3::new(-6.0, 0.0, -6.0), ChunkExtents::new(16, 16, 16));
        assert_eq!(layout.coordinate_of(Point3::new(0.0, 0.0, 0.0)), ChunkCoordinate::new(0, 0));
        assert_eq!(layout.coordinate_of(Point3::new(-6.5, 0.0, 10.0)), ChunkCoordinate::new(-1, 1));
        assert_eq!(
            layout.chunk_origin(ChunkCoordinate::new(1, -1)),
            Point3::new(10.0, 0.0, -22.0)
        );
    }

    #[test]
    fn non_finite_positions_still_map_to_a_coordinate() {
        let layout = layout_16();
        let coordinate = layout.coordinate_of(Point3::new(f32::NAN, 0.0, f32::INFINITY));
        assert_eq!(coordinate, ChunkCoordinate::new(0, COORDINATE_LIMIT));
    }

    #[test]
    fn square_around_is_inclusive() {
        let square = ChunkCoordinate::new(3, -2).square_around(2);
        assert_eq!(square.len(), 25);
        assert!(square
            .iter()
            .all(|c| c.chebyshev_distance(ChunkCoordinate::new(3, -2)) <= 2));
        assert!(square.contains(&ChunkCoordinate::new(5, 0)));
        assert!(ChunkCoordinate::new(0, 0).square_around(-1).is_empty());
    }

    #[test]
    fn directions_round_trip_through_opposite() {
        let origin = ChunkCoordinate::new(0, 0);
        for direction in Direction::ALL {
            assert_eq!(origin.offset(direction).offset(direction.opposite()), origin);
            assert_eq!(Direction::ALL[direction.index()], direction);
        }
    }

    #[test]
    fn lying_between_accepts_bounds_in_either_order() {
        assert!(lying_between(1.0, 0.5, 2.0, 0.0));
        assert!(!lying_between(1.0, 1.0, 2.0, 0.0));
        assert!(lying_between(0.0, -0.0, 0.0, 2.0));
    }

    #[test]
    fn local_block_rejects_cells_outside_the_column() {
        let layout = layout_16();
        assert_eq!(
            layout.local_block(Point3::new(17.5, 3.2, -0.5)),
            Some((ChunkCoordinate::new(1, -1), Point3::new(1, 3, 15)))
        );
        assert_eq!(layout.local_block(Point3::new(1.0, 16.0, 1.0)), None);
        assert_eq!(layout.local_block(Point3::new(1.0, -0.1, 1.0)), None);
    }

    #[test]
    fn square_radius_is_capped() {
        let side = (2 * MAX_DRAW_DISTANCE + 1) as usize;
        let square = ChunkCoordinate::new(0, 0).square_around(i32::MAX);
        assert_eq!(square.len(), side * side);
        assert_eq!(square[0], ChunkCoordinate::new(-MAX_DRAW_DISTANCE, -MAX_DRAW_DISTANCE));

        let corner = ChunkCoordinate::new(i32::MAX, i32::MIN).square_around(1);
        assert_eq!(corner.len(), 4);
        assert!(corner.contains(&ChunkCoordinate::new(i32::MAX, i32::MIN)));
    }
}
