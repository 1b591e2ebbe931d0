// Lasso geometry: the closed selection curve and the pixel membership test.
// A lasso is an ordered list of vertices in image coordinates; the last vertex
// connects back to the first. A pixel centre lying exactly on an edge or vertex is outside.
// Visual: the pixels that turn red when you release the mouse are exactly the ones flagged here.

use crate::types::Point;

/// Closed selection boundary drawn by one lasso gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Lasso {
    vertices: Vec<Point>,
}

impl Lasso {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// A closed curve needs at least three vertices to enclose anything.
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Axis-aligned bounds as (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in &self.vertices {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some((min_x, min_y, max_x, max_y))
    }

    /// Strict point-in-polygon test (ray casting, boundary excluded).
    pub fn contains(&self, point: Point) -> bool {
        if !self.is_valid() {
            return false;
        }

        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];

            if on_segment(point, vj, vi) {
                return false;
            }

            if ((vi.y > point.y) != (vj.y > point.y))
                && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}

/// True when `p` lies exactly on the segment a-b.
fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross != 0.0 {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Every integer pixel coordinate of an image, row-major (y outer, x inner).
/// Built once per image and reused as the query set for every lasso.
pub struct PixelTable {
    width: usize,
    height: usize,
    coords: Vec<(u32, u32)>,
}

impl PixelTable {
    pub fn new(width: usize, height: usize) -> Self {
        let mut coords = Vec::with_capacity(width * height);
        for y in 0..height as u32 {
            for x in 0..width as u32 {
                coords.push((x, y));
            }
        }
        Self { width, height, coords }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Membership flag for every entry of the table, in table order.
    /// The flat result reshapes directly to the image's height × width.
    pub fn membership(&self, lasso: &Lasso) -> Vec<bool> {
        let mut flags = vec![false; self.coords.len()];
        let Some((min_x, min_y, max_x, max_y)) = lasso.bounds() else {
            return flags;
        };
        if !lasso.is_valid() {
            return flags;
        }

        for (flag, &(x, y)) in flags.iter_mut().zip(&self.coords) {
            let (fx, fy) = (x as f64, y as f64);
            // Outside the bounding box (or on it) can never be strictly inside.
            if fx <= min_x || fx >= max_x || fy <= min_y || fy >= max_y {
                continue;
            }
            *flag = lasso.contains(Point::new(fx, fy));
        }

        debug_assert_eq!(flags.len(), self.width * self.height);
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Lasso {
        Lasso::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    fn flagged(table: &PixelTable, flags: &[bool]) -> Vec<(u32, u32)> {
        table
            .coords
            .iter()
            .zip(flags)
            .filter(|(_, f)| **f)
            .map(|(c, _)| *c)
            .collect()
    }

    #[test]
    fn test_table_is_row_major() {
        let table = PixelTable::new(3, 2);
        assert_eq!(table.len(), 6);
        assert_eq!(table.coords[0], (0, 0));
        assert_eq!(table.coords[2], (2, 0));
        assert_eq!(table.coords[3], (0, 1));
    }

    #[test]
    fn test_square_selects_enclosed_centres() {
        let table = PixelTable::new(4, 4);
        let flags = table.membership(&square(-0.5, -0.5, 1.5, 1.5));
        assert_eq!(flagged(&table, &flags), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_boundary_points_are_excluded() {
        // Corners and edges pass exactly through pixel centres.
        let table = PixelTable::new(4, 4);
        let flags = table.membership(&square(0.0, 0.0, 2.0, 2.0));
        assert_eq!(flagged(&table, &flags), vec![(1, 1)]);
    }

    #[test]
    fn test_diagonal_edge_is_excluded() {
        let tri = Lasso::new(vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 4.0)]);
        assert!(tri.contains(Point::new(1.0, 1.0)));
        assert!(!tri.contains(Point::new(2.0, 2.0))); // on the hypotenuse
        assert!(!tri.contains(Point::new(3.0, 3.0)));
        assert!(!tri.contains(Point::new(0.0, 2.0))); // on the left edge
    }

    #[test]
    fn test_concave_lasso() {
        // U shape: the notch between the arms is outside.
        let u = Lasso::new(vec![
            Point::new(-0.5, -0.5),
            Point::new(0.5, -0.5),
            Point::new(0.5, 1.5),
            Point::new(2.5, 1.5),
            Point::new(2.5, -0.5),
            Point::new(3.5, -0.5),
            Point::new(3.5, 2.5),
            Point::new(-0.5, 2.5),
        ]);
        assert!(u.contains(Point::new(0.0, 0.0)));
        assert!(u.contains(Point::new(3.0, 0.0)));
        assert!(!u.contains(Point::new(1.0, 0.0)));
        assert!(!u.contains(Point::new(2.0, 1.0)));
        assert!(u.contains(Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_degenerate_lasso_selects_nothing() {
        let table = PixelTable::new(4, 4);
        let line = Lasso::new(vec![Point::new(0.0, 0.0), Point::new(3.0, 3.0)]);
        assert!(!line.is_valid());
        assert!(table.membership(&line).iter().all(|f| !f));
        assert!(table.membership(&Lasso::new(Vec::new())).iter().all(|f| !f));
    }

    #[test]
    fn test_lasso_outside_image() {
        let table = PixelTable::new(4, 4);
        let flags = table.membership(&square(10.0, 10.0, 20.0, 20.0));
        assert!(flags.iter().all(|f| !f));
    }
}
