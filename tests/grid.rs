//! Grid aggregation over synthetic observations.

use geo::{Coord, Rect};
use unfallkarte::{aggregate, aggregate_within, GridError};

/// Deterministic spread of points over `bounds`.
fn scatter(bounds: Rect<f64>, n: usize) -> Vec<Coord<f64>> {
    let (min, w, h) = (bounds.min(), bounds.width(), bounds.height());
    let mut state = 0x2545_f491_u64;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    let mut points = (0..n).map(|_| Coord { x: min.x + next() * w, y: min.y + next() * h }).collect::<Vec<_>>();
    // pin the extent so the grid is built over exactly `bounds`
    points.push(bounds.min());
    points.push(bounds.max());
    points
}

fn basel() -> Rect<f64> {
    Rect::new(Coord { x: 7.554, y: 47.519 }, Coord { x: 7.694, y: 47.600 })
}

#[test]
fn lattice_covers_bounding_box() {
    let boxes = [
        basel(),
        Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 3.0 }),
        Rect::new(Coord { x: -10.0, y: 5.0 }, Coord { x: 10.0, y: 5.5 }),
        Rect::new(Coord { x: 2_611_000.0, y: 1_263_000.0 }, Coord { x: 2_620_000.0, y: 1_272_000.0 }),
    ];
    for bounds in boxes {
        for n in [1, 2, 7, 75, 200] {
            let grid = aggregate(&[bounds.min(), bounds.max()], n).unwrap();
            let extent = grid.extent();
            assert!(extent.min().x <= bounds.min().x && extent.min().y <= bounds.min().y);
            assert!(extent.max().x >= bounds.max().x && extent.max().y >= bounds.max().y,
                "n = {n}: {extent:?} does not cover {bounds:?}");
            assert_eq!(grid.cells().len(), grid.columns() * grid.rows());
            assert_eq!(grid.columns(), n + 1);
        }
    }
}

#[test]
fn counts_are_conserved() {
    for n in [1, 10, 75] {
        let points = scatter(basel(), 5_000);
        let grid = aggregate(&points, n).unwrap();
        assert_eq!(grid.total(), points.len() as u64, "n = {n}");
        assert_eq!(grid.outside(), 0);
    }
}

#[test]
fn within_bounds_splits_inside_and_outside() {
    let mut points = scatter(basel(), 1_000);
    let inside = points.len();
    points.push(Coord { x: 8.54, y: 47.37 });
    points.push(Coord { x: 6.14, y: 46.20 });

    let grid = aggregate_within(&points, basel(), 75).unwrap();
    assert_eq!(grid.total(), inside as u64);
    assert_eq!(grid.outside(), 2);
}

#[test]
fn cells_are_square() {
    let grid = aggregate(&scatter(basel(), 100), 75).unwrap();
    for cell in grid.cells() {
        assert!((cell.rect().width() - grid.cell_size()).abs() < 1e-12);
        assert!((cell.rect().height() - grid.cell_size()).abs() < 1e-12);
    }
}

#[test]
fn empty_input_fails() {
    assert_eq!(aggregate(&[], 75).unwrap_err(), GridError::NoObservations);
    assert_eq!(aggregate_within(&[], basel(), 75).unwrap_err(), GridError::NoObservations);
}
