//! Single-row gallery packing.
//!
//! All images in a row share one height; each width follows from its aspect
//! ratio so the row sits flush in the container. Layout stays unknown until
//! every image has reported its natural size.

use folio_common::GalleryConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, or `None` for degenerate sizes.
    pub fn aspect_ratio(self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(f64::from(self.width) / f64::from(self.height))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GalleryLayoutParams {
    pub gap: f64,
    pub max_row_height: f64,
    pub add_button_width: Option<f64>,
}

impl Default for GalleryLayoutParams {
    fn default() -> Self {
        GalleryConfig::default().into()
    }
}

impl From<GalleryConfig> for GalleryLayoutParams {
    fn from(config: GalleryConfig) -> Self {
        Self {
            gap: config.gap,
            max_row_height: config.max_row_height,
            add_button_width: config.add_button_width,
        }
    }
}

impl GalleryLayoutParams {
    /// Horizontal space left for images in a row of `count`.
    pub fn available_width(&self, container_width: f64, count: usize) -> f64 {
        let gaps = count.saturating_sub(1) as f64 * self.gap;
        let reserve = self.add_button_width.map_or(0.0, |w| w + self.gap);
        container_width - gaps - reserve
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryLayout {
    pub common_height: f64,
    pub widths: Vec<u32>,
}

/// Compute the row layout, or `None` while any image size is still unknown.
/// Also `None` when the gaps and the add button leave no width for images,
/// since no row of that count fits the container.
pub fn compute_layout(
    dims: &[Option<ImageDimensions>],
    container_width: f64,
    params: &GalleryLayoutParams,
) -> Option<GalleryLayout> {
    if dims.is_empty() {
        return None;
    }
    let ratios = dims
        .iter()
        .map(|d| d.and_then(ImageDimensions::aspect_ratio))
        .collect::<Option<Vec<f64>>>()?;

    let total: f64 = ratios.iter().sum();
    let available = params.available_width(container_width, ratios.len());
    if available <= 0.0 {
        tracing::debug!(container_width, available, "gallery row does not fit its container");
        return None;
    }
    let height = (available / total).min(params.max_row_height);

    let widths = ratios
        .iter()
        .map(|ratio| (height * ratio).floor() as u32)
        .collect();

    Some(GalleryLayout {
        common_height: height,
        widths,
    })
}

/// Collects natural sizes as images finish loading, in any order.
#[derive(Debug, Clone, Default)]
pub struct GalleryMeasurements {
    dims: Vec<Option<ImageDimensions>>,
}

impl GalleryMeasurements {
    pub fn new(count: usize) -> Self {
        Self {
            dims: vec![None; count],
        }
    }

    /// Record a load event. Indexes past the current count grow the row.
    pub fn record(&mut self, index: usize, dims: ImageDimensions) {
        if index >= self.dims.len() {
            self.dims.resize(index + 1, None);
        }
        self.dims[index] = Some(dims);
    }

    pub fn is_complete(&self) -> bool {
        !self.dims.is_empty() && self.dims.iter().all(Option::is_some)
    }

    pub fn layout(&self, container_width: f64, params: &GalleryLayoutParams) -> Option<GalleryLayout> {
        compute_layout(&self.dims, container_width, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(w: u32, h: u32) -> Option<ImageDimensions> {
        Some(ImageDimensions::new(w, h))
    }

    #[test]
    fn two_landscape_images_share_height() {
        let params = GalleryLayoutParams::default();
        // ratios 1.5 + 1.0, available 800 - 8 = 792, height 316.8 capped to 250
        let layout = compute_layout(&[dims(1500, 1000), dims(800, 800)], 800.0, &params).unwrap();
        assert_eq!(layout.common_height, 250.0);
        assert_eq!(layout.widths, vec![375, 250]);
    }

    #[test]
    fn narrow_container_fills_width() {
        let params = GalleryLayoutParams::default();
        let layout = compute_layout(&[dims(400, 200), dims(200, 200)], 308.0, &params).unwrap();
        // available 300, total ratio 3, height 100
        assert_eq!(layout.common_height, 100.0);
        assert_eq!(layout.widths, vec![200, 100]);
        let used: u32 = layout.widths.iter().sum();
        assert!(f64::from(used) + params.gap <= 308.0);
    }

    #[test]
    fn add_button_reserves_space() {
        let params = GalleryLayoutParams {
            add_button_width: Some(42.0),
            ..Default::default()
        };
        let layout = compute_layout(&[dims(100, 100), dims(100, 100)], 258.0, &params).unwrap();
        // 258 - 8 - (42 + 8) = 200, height 100
        assert_eq!(layout.common_height, 100.0);
        assert_eq!(layout.widths, vec![100, 100]);
    }

    #[test]
    fn unknown_or_zero_dims_are_not_computable() {
        let params = GalleryLayoutParams::default();
        assert!(compute_layout(&[dims(100, 100), None], 500.0, &params).is_none());
        assert!(compute_layout(&[dims(100, 0), dims(10, 10)], 500.0, &params).is_none());
        assert!(compute_layout(&[], 500.0, &params).is_none());
    }

    #[test]
    fn row_wider_than_its_container_has_no_layout() {
        let params = GalleryLayoutParams::default();
        let row = [dims(10, 10), dims(10, 10), dims(10, 10)];
        assert!(compute_layout(&row, 4.0, &params).is_none());

        let exact = params.available_width(0.0, row.len()).abs();
        assert!(compute_layout(&row, exact, &params).is_none());
        assert!(compute_layout(&row, exact + 30.0, &params).is_some());
    }

    #[test]
    fn arrival_order_does_not_matter() {
        let params = GalleryLayoutParams::default();
        let sizes = [
            ImageDimensions::new(1200, 800),
            ImageDimensions::new(600, 900),
            ImageDimensions::new(1000, 1000),
        ];

        let mut forward = GalleryMeasurements::new(3);
        let mut backward = GalleryMeasurements::new(3);
        for (i, d) in sizes.iter().enumerate() {
            forward.record(i, *d);
        }
        for (i, d) in sizes.iter().enumerate().rev() {
            assert!(backward.layout(900.0, &params).is_none());
            backward.record(i, *d);
        }

        assert!(forward.is_complete());
        assert_eq!(forward.layout(900.0, &params), backward.layout(900.0, &params));
    }

    #[test]
    fn params_follow_config() {
        let config = GalleryConfig {
            gap: 4.0,
            max_row_height: 180.0,
            add_button_width: Some(30.0),
        };
        let params = GalleryLayoutParams::from(config);
        assert_eq!(params.available_width(300.0, 3), 300.0 - 8.0 - 34.0);
    }
}
