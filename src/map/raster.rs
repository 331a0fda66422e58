use crate::chart::spec::Region;
use crate::data::model::{BBox, Shape};

/// What a raster pixel shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Outside every region (ocean, or land with no geometry).
    Empty,
    /// Inside a region that has no value.
    NoData,
    Value(f64),
}

/// An equirectangular lon/lat grid covering the whole globe.
///
/// Row 0 is the northernmost row, column 0 the westernmost column.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethRaster {
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` cells.
    pub cells: Vec<Cell>,
}

fn cell_center(col: usize, row: usize, width: usize, height: usize) -> (f64, f64) {
    let lon = -180.0 + (col as f64 + 0.5) * 360.0 / width as f64;
    let lat = 90.0 - (row as f64 + 0.5) * 180.0 / height as f64;
    (lon, lat)
}

/// Which shape covers each pixel of the globe.
///
/// The geometry never changes after load, so the point-in-polygon work is
/// done once here. Each year change only repaints values through
/// [`RegionIndex::paint`].
#[derive(Debug, Clone, PartialEq)]
pub struct RegionIndex {
    pub width: usize,
    pub height: usize,
    /// Row-major index into the shape list, `None` outside every shape.
    cells: Vec<Option<u32>>,
}

impl RegionIndex {
    /// Index `shapes` onto a `width` x `width / 2` grid.
    ///
    /// Each pixel takes the first shape (in iteration order) that contains
    /// the pixel center.
    pub fn build<'a>(shapes: impl IntoIterator<Item = &'a Shape>, width: usize) -> Self {
        let width = width.max(2);
        let height = width / 2;

        let boxed: Vec<(u32, BBox, &Shape)> = shapes
            .into_iter()
            .zip(0u32..)
            .filter_map(|(shape, i)| Some((i, shape.bbox()?, shape)))
            .collect();

        let mut cells = vec![None; width * height];
        for row in 0..height {
            for col in 0..width {
                let (lon, lat) = cell_center(col, row, width, height);
                cells[row * width + col] = boxed
                    .iter()
                    .find(|(_, bbox, shape)| bbox.contains(lon, lat) && shape.contains(lon, lat))
                    .map(|(i, _, _)| *i);
            }
        }

        log::debug!(
            "indexed {} shapes onto {width}x{height} grid",
            boxed.len()
        );

        RegionIndex {
            width,
            height,
            cells,
        }
    }

    /// Shade the indexed pixels with the values of `regions`.
    ///
    /// `regions` must be in the same order as the shapes the index was built
    /// from, which holds for choropleths joined against the same world.
    pub fn paint(&self, regions: &[Region]) -> ChoroplethRaster {
        let cells = self
            .cells
            .iter()
            .map(|idx| match idx.and_then(|i| regions.get(i as usize)) {
                Some(Region { value: Some(v), .. }) => Cell::Value(*v),
                Some(Region { value: None, .. }) => Cell::NoData,
                None => Cell::Empty,
            })
            .collect();

        ChoroplethRaster {
            width: self.width,
            height: self.height,
            cells,
        }
    }
}

/// The first region containing `[lon, lat]`, used for hover lookups.
pub fn region_at(regions: &[Region], lon: f64, lat: f64) -> Option<&Region> {
    regions.iter().find(|r| r.shape.contains(lon, lat))
}

/// Exterior and hole rings of every region, for drawing borders.
pub fn outlines(regions: &[Region]) -> Vec<&[[f64; 2]]> {
    regions
        .iter()
        .flat_map(|r| r.shape.polygons().iter())
        .flat_map(|polygon| polygon.iter())
        .filter(|ring| ring.len() >= 2)
        .map(|ring| ring.as_slice())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::model::Ring;

    fn cell(raster: &ChoroplethRaster, col: usize, row: usize) -> Cell {
        raster.cells[row * raster.width + col]
    }

    fn rasterize(regions: &[Region], width: usize) -> ChoroplethRaster {
        RegionIndex::build(regions.iter().map(|r| r.shape.as_ref()), width).paint(regions)
    }

    fn rect(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Ring {
        vec![
            [min_lon, min_lat],
            [max_lon, min_lat],
            [max_lon, max_lat],
            [min_lon, max_lat],
            [min_lon, min_lat],
        ]
    }

    fn region(name: &str, rings: Vec<Ring>, value: Option<f64>) -> Region {
        Region {
            name: name.to_string(),
            shape: Arc::new(Shape::new(vec![rings])),
            value,
        }
    }

    #[test]
    fn pixels_take_region_values() {
        // Western hemisphere, northern half has a value; southern half has none.
        let regions = vec![
            region("North", vec![rect(-180.0, 0.0, 0.0, 90.0)], Some(5.0)),
            region("South", vec![rect(-180.0, -90.0, 0.0, 0.0)], None),
        ];
        let raster = rasterize(&regions, 4);
        assert_eq!((raster.width, raster.height), (4, 2));
        assert_eq!(cell(&raster, 0, 0), Cell::Value(5.0));
        assert_eq!(cell(&raster, 1, 0), Cell::Value(5.0));
        assert_eq!(cell(&raster, 0, 1), Cell::NoData);
        assert_eq!(cell(&raster, 2, 0), Cell::Empty);
        assert_eq!(cell(&raster, 3, 1), Cell::Empty);
    }

    #[test]
    fn holes_stay_empty() {
        let regions = vec![region(
            "Ring",
            vec![rect(-90.0, -45.0, 90.0, 45.0), rect(-30.0, -30.0, 30.0, 30.0)],
            Some(1.0),
        )];
        let raster = rasterize(&regions, 36);
        // Pixel center nearest (0, 0) sits inside the hole.
        let (col, row) = (18, 9);
        let (lon, lat) = cell_center(col, row, raster.width, raster.height);
        assert!(lon.abs() < 10.0 && lat.abs() < 10.0);
        assert_eq!(cell(&raster, col, row), Cell::Empty);
        // Inside the outer ring but outside the hole.
        assert_eq!(cell(&raster, 11, 9), Cell::Value(1.0));
    }

    #[test]
    fn index_is_reused_across_values() {
        let shapes = [
            Shape::new(vec![vec![rect(-180.0, 0.0, 0.0, 90.0)]]),
            Shape::new(vec![vec![rect(0.0, 0.0, 180.0, 90.0)]]),
        ];
        let index = RegionIndex::build(&shapes, 4);

        let year = |west: Option<f64>, east: Option<f64>| {
            vec![
                Region {
                    name: "West".into(),
                    shape: Arc::new(shapes[0].clone()),
                    value: west,
                },
                Region {
                    name: "East".into(),
                    shape: Arc::new(shapes[1].clone()),
                    value: east,
                },
            ]
        };

        let first = index.paint(&year(Some(1.0), None));
        assert_eq!(&first.cells[..4], [Cell::Value(1.0), Cell::Value(1.0), Cell::NoData, Cell::NoData]);
        assert!(first.cells[4..].iter().all(|c| *c == Cell::Empty));

        let second = index.paint(&year(None, Some(7.0)));
        assert_eq!(cell(&second, 0, 0), Cell::NoData);
        assert_eq!(cell(&second, 3, 0), Cell::Value(7.0));
        assert_eq!(cell(&second, 3, 1), Cell::Empty);

        // Fewer regions than shapes leaves the rest empty.
        assert_eq!(cell(&index.paint(&[]), 0, 0), Cell::Empty);
    }

    #[test]
    fn outlines_include_every_ring() {
        let regions = vec![region(
            "Ring",
            vec![rect(-90.0, -45.0, 90.0, 45.0), rect(-30.0, -30.0, 30.0, 30.0)],
            None,
        )];
        assert_eq!(outlines(&regions).len(), 2);
        assert!(outlines(&[]).is_empty());
    }

    #[test]
    fn region_lookup_skips_holes() {
        let regions = vec![
            region(
                "Ring",
                vec![rect(-90.0, -45.0, 90.0, 45.0), rect(-30.0, -30.0, 30.0, 30.0)],
                Some(1.0),
            ),
            region("Inner", vec![rect(-10.0, -10.0, 10.0, 10.0)], Some(2.0)),
        ];
        assert_eq!(region_at(&regions, 60.0, 0.0).map(|r| r.name.as_str()), Some("Ring"));
        assert_eq!(region_at(&regions, 0.0, 0.0).map(|r| r.name.as_str()), Some("Inner"));
        assert!(region_at(&regions, 150.0, 0.0).is_none());
    }
}
