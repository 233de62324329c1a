use pathviz_core::Point;

use crate::wire::Heuristic;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> f64 {
    f64::from((a.x - b.x).abs() + (a.y - b.y).abs())
}

/// Euclidean (L2) distance between two points.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    dx.hypot(dy)
}

impl Heuristic {
    /// Estimated distance from `from` to `to`.
    #[inline]
    pub fn estimate(self, from: Point, to: Point) -> f64 {
        match self {
            Self::Manhattan => manhattan(from, to),
            Self::Euclidean => euclidean(from, to),
        }
    }
}

/// Summed Euclidean length of consecutive segments, rounded to two decimals.
pub fn path_length(path: &[Point]) -> f64 {
    let total: f64 = path.windows(2).map(|w| euclidean(w[0], w[1])).sum();
    (total * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Point::new(1, 1);
        let b = Point::new(4, 5);
        assert_eq!(manhattan(a, b), 7.0);
        assert_eq!(euclidean(a, b), 5.0);
        assert_eq!(Heuristic::Euclidean.estimate(a, b), 5.0);
    }

    #[test]
    fn path_length_rounds() {
        assert_eq!(path_length(&[]), 0.0);
        assert_eq!(path_length(&[Point::new(3, 3)]), 0.0);
        let path: Vec<Point> = (0..4).map(|x| Point::new(x, 0)).collect();
        assert_eq!(path_length(&path), 3.0);
        assert_eq!(path_length(&[Point::new(0, 0), Point::new(1, 1)]), 1.41);
    }
}
