// chart.rs - Chart adapter: owns the single live comparison chart
//
// The adapter never keeps more than one chart alive. Every `present` call
// destroys the previous instance before the backend creates the next one.

use image::{ImageBuffer, Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::compare::ChartSeries;
use crate::types::Color;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("chart series are misaligned: {labels} labels, {values} values, {colors} colors")]
    Misaligned {
        labels: usize,
        values: usize,
        colors: usize,
    },

    #[error("chart value {value} at index {index} is not a non-negative number")]
    InvalidValue { index: usize, value: f64 },

    #[error("chart backend failed: {0}")]
    Backend(String),
}

/// Everything a backend needs to draw the comparison bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub dataset_label: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub begin_at_zero: bool,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<Color>,
}

impl ChartSpec {
    pub fn bar(labels: Vec<String>, values: Vec<f64>, colors: Vec<Color>) -> Result<Self, ChartError> {
        if labels.len() != values.len() || labels.len() != colors.len() {
            return Err(ChartError::Misaligned {
                labels: labels.len(),
                values: values.len(),
                colors: colors.len(),
            });
        }
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(ChartError::InvalidValue { index, value });
        }

        Ok(Self {
            dataset_label: "Execution Time (seconds)".to_string(),
            x_axis_title: "Heuristic Function".to_string(),
            y_axis_title: "Time (seconds)".to_string(),
            begin_at_zero: true,
            labels,
            values,
            colors,
        })
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// A charting primitive that can build and tear down chart instances.
pub trait ChartBackend {
    type Handle;

    fn create(&mut self, spec: &ChartSpec) -> Result<Self::Handle, ChartError>;

    /// Release everything held by `handle`.
    fn destroy(&mut self, handle: Self::Handle);
}

pub struct ChartAdapter<B: ChartBackend> {
    backend: B,
    current: Option<B::Handle>,
    spec: Option<ChartSpec>,
}

impl<B: ChartBackend> ChartAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
            spec: None,
        }
    }

    /// Replace whatever chart is showing with a bar chart of these series.
    ///
    /// The three sequences must be the same length and index-aligned. On a
    /// validation error the existing chart stays up; on a backend error no
    /// chart is left alive.
    pub fn present(
        &mut self,
        labels: Vec<String>,
        values: Vec<f64>,
        colors: Vec<Color>,
    ) -> Result<(), ChartError> {
        let spec = ChartSpec::bar(labels, values, colors)?;
        self.release();

        let handle = self.backend.create(&spec)?;
        log::debug!("Presented chart with {} bars", spec.labels.len());
        self.current = Some(handle);
        self.spec = Some(spec);
        Ok(())
    }

    pub fn present_series(&mut self, series: ChartSeries) -> Result<(), ChartError> {
        self.present(series.labels, series.values, series.colors)
    }

    pub fn release(&mut self) {
        self.spec = None;
        if let Some(handle) = self.current.take() {
            self.backend.destroy(handle);
            log::debug!("Released previous chart instance");
        }
    }

    pub fn is_showing(&self) -> bool {
        self.current.is_some()
    }

    pub fn spec(&self) -> Option<&ChartSpec> {
        self.spec.as_ref()
    }

    pub fn handle(&self) -> Option<&B::Handle> {
        self.current.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: ChartBackend> Drop for ChartAdapter<B> {
    fn drop(&mut self) {
        self.release();
    }
}

// ============================================================================
// BITMAP BACKEND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitmapChartId(u64);

/// Draws bar charts into in-memory RGBA canvases, optionally saving each new
/// chart as a PNG.
pub struct BitmapChartBackend {
    width: u32,
    height: u32,
    output: Option<PathBuf>,
    next_id: u64,
    live: HashMap<BitmapChartId, RgbaImage>,
}

const MARGIN: u32 = 24;
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const AXIS: Rgba<u8> = Rgba([64, 64, 64, 255]);
const GRIDLINE: Rgba<u8> = Rgba([224, 224, 224, 255]);

impl BitmapChartBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MARGIN * 3),
            height: height.max(MARGIN * 3),
            output: None,
            next_id: 0,
            live: HashMap::new(),
        }
    }

    /// Save every created chart to `path`, overwriting the previous one.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn image(&self, id: BitmapChartId) -> Option<&RgbaImage> {
        self.live.get(&id)
    }

    fn draw(&self, spec: &ChartSpec) -> RgbaImage {
        let mut canvas: RgbaImage = ImageBuffer::from_pixel(self.width, self.height, BACKGROUND);
        let plot_left = MARGIN;
        let plot_right = self.width - MARGIN;
        let plot_top = MARGIN;
        let plot_bottom = self.height - MARGIN;
        let plot_height = plot_bottom - plot_top;

        for quarter in 1..=4 {
            let y = plot_bottom - plot_height * quarter / 4;
            fill_rect(&mut canvas, plot_left, y, plot_right, y + 1, GRIDLINE);
        }

        let bars = spec.values.len() as u32;
        let max = spec.max_value();
        if bars > 0 {
            let slot = ((plot_right - plot_left) / bars).max(1);
            let bar_width = (slot * 3 / 5).max(1);
            for (i, (&value, color)) in spec.values.iter().zip(&spec.colors).enumerate() {
                let fraction = if max > 0.0 { value / max } else { 0.0 };
                let bar_height = (f64::from(plot_height) * fraction).round() as u32;
                let x0 = plot_left + slot * i as u32 + (slot - bar_width) / 2;
                fill_rect(
                    &mut canvas,
                    x0,
                    plot_bottom - bar_height,
                    x0 + bar_width,
                    plot_bottom,
                    color.to_rgba(),
                );
            }
        }

        // axes drawn last so bars never cover them
        fill_rect(&mut canvas, plot_left, plot_top, plot_left + 2, plot_bottom, AXIS);
        fill_rect(&mut canvas, plot_left, plot_bottom, plot_right, plot_bottom + 2, AXIS);
        canvas
    }
}

impl Default for BitmapChartBackend {
    fn default() -> Self {
        Self::new(640, 360)
    }
}

impl ChartBackend for BitmapChartBackend {
    type Handle = BitmapChartId;

    fn create(&mut self, spec: &ChartSpec) -> Result<BitmapChartId, ChartError> {
        let canvas = self.draw(spec);
        if let Some(path) = &self.output {
            canvas
                .save_with_format(path, image::ImageFormat::Png)
                .map_err(|e| ChartError::Backend(format!("{}: {}", path.display(), e)))?;
            log::info!("Wrote comparison chart to {}", path.display());
        }

        let id = BitmapChartId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, canvas);
        Ok(id)
    }

    fn destroy(&mut self, handle: BitmapChartId) {
        self.live.remove(&handle);
    }
}

fn fill_rect(canvas: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    let x1 = x1.min(canvas.width());
    let y1 = y1.min(canvas.height());
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, color);
        }
    }
}
