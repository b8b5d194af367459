//! SVG writing operations.

use std::io::Write;

use anyhow::{bail, Result};
use geo::{Coord, CoordsIter, LineString, MultiPolygon, Rect};

use crate::geom::Grid;
use crate::io::svg::sequential_color;

/// Projection function: lon/lat -> SVG coords (x,y)
type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// Write SVG header to any writer.
fn write_svg_header<W: Write>(writer: &mut W, width: f64, height: f64, bounds: &Rect<f64>) -> Result<()> {
    writeln!(writer, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
    writeln!(writer, r##"<svg xmlns="http://www.w3.org/2000/svg"
        width="{width:.0}" height="{height:.0}"
        viewBox="0 0 {width:.0} {height:.0}"
        data-lon-min="{lon_min}" data-lon-max="{lon_max}"
        data-lat-min="{lat_min}" data-lat-max="{lat_max}">"##,
        lon_min = bounds.min().x,
        lon_max = bounds.max().x,
        lat_min = bounds.min().y,
        lat_max = bounds.max().y,
    )?;
    writeln!(writer, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    Ok(())
}

/// Write SVG styles to any writer.
fn write_svg_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, r##"<defs>
<style>
    .cell {{ stroke: #9ca3af; stroke-width: 0.3; }}
    .empty {{ fill: none; }}
    .outline {{ fill: none; stroke: #111827; stroke-width: 1.2; }}
</style>
</defs>"##)?;
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        out.push_str(&ring_to_path(polygon.exterior(), project));
        for interior in polygon.interiors() {
            out.push_str(&ring_to_path(interior, project));
        }
    }

    out
}

/// Build a compact SVG path string for a LineString (ring).
fn ring_to_path(ring: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();

    let mut coords = ring.coords_iter()
        .map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }

    out
}

/// Render a grid as a heatmap, cells shaded by count relative to the largest count,
/// with optional outlines drawn on top.
pub fn write_grid_svg<W: Write>(writer: &mut W, grid: &Grid, outlines: &[MultiPolygon<f64>], width: f64, margin: f64) -> Result<()> {
    if !margin.is_finite() || margin < 0.0 || !width.is_finite() || width <= 2.0 * margin {
        bail!("[io::svg] width {width} leaves no drawing area with margin {margin}");
    }

    let bounds = grid.extent();
    let scale = (width - 2.0 * margin) / bounds.width();
    let height = bounds.height() * scale + 2.0 * margin;

    // --- Map lon/lat -> SVG coords (preserve aspect, Y down) ---
    let project = move |coord: &Coord<f64>| -> (f64, f64) {
        let x = margin + (coord.x - bounds.min().x) * scale;
        let y = margin + (bounds.max().y - coord.y) * scale; // invert vertically
        (x, y)
    };

    write_svg_header(writer, width, height, &bounds)?;
    write_svg_styles(writer)?;

    let max = grid.max_count().max(1) as f64;
    for cell in grid.cells() {
        let rect = cell.rect();
        let (x, y) = project(&Coord { x: rect.min().x, y: rect.max().y });
        let (w, h) = (rect.width() * scale, rect.height() * scale);
        if cell.count() == 0 {
            writeln!(writer, r#"<rect class="cell empty" x="{x:.3}" y="{y:.3}" width="{w:.3}" height="{h:.3}"/>"#)?;
        } else {
            let color = sequential_color(cell.count() as f64 / max);
            writeln!(writer, r#"<rect class="cell" x="{x:.3}" y="{y:.3}" width="{w:.3}" height="{h:.3}" style="fill:{color}"><title>{}</title></rect>"#,
                cell.count())?;
        }
    }

    for outline in outlines {
        writeln!(writer, r#"<path class="outline" d="{}"/>"#, multipolygon_to_path(outline, &project))?;
    }

    writeln!(writer, "</svg>")?;
    Ok(())
}
