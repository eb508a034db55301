//! SVG line chart renderer.
//!
//! One renderer covers both chart shapes the CLI produces: the price
//! comparison chart (subject vs competitor medians) and the occupancy
//! trend chart (observed counts plus the dashed forecast line).

use chrono::NaiveDate;
use svg::node::element::{Group, Line, Polyline, Rectangle, Text};
use svg::Document;

use crate::RenderError;

/// A single plotted line.
#[derive(Clone, Debug)]
pub struct Series {
    /// Legend label
    pub name: String,
    /// Date-ordered observations
    pub points: Vec<(NaiveDate, f64)>,
    /// Render with a dashed stroke (used for forecast lines)
    pub dashed: bool,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
            dashed: false,
        }
    }

    /// Mark this series as a dashed (projected) line
    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

/// SVG line chart renderer configuration
#[derive(Clone, Debug)]
pub struct LineChartRenderer {
    /// Chart title
    pub title: String,
    /// Width of the plot area (excluding axis labels) in pixels
    pub chart_width: u32,
    /// Height of the plot area in pixels
    pub chart_height: u32,
    /// Width reserved for the y-axis labels
    pub axis_width: u32,
    /// Height reserved for the x-axis labels
    pub axis_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Stroke colors cycled across series
    pub palette: Vec<String>,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for LineChartRenderer {
    fn default() -> Self {
        Self {
            title: String::new(),
            chart_width: 800,
            chart_height: 320,
            axis_width: 60,
            axis_height: 40,
            padding: 20,
            palette: vec![
                "#e74c3c".into(),
                "#3498db".into(),
                "#2ecc71".into(),
                "#9b59b6".into(),
                "#f39c12".into(),
            ],
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl LineChartRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Configure plot width
    pub fn chart_width(mut self, width: u32) -> Self {
        self.chart_width = width;
        self
    }

    /// Configure plot height
    pub fn chart_height(mut self, height: u32) -> Self {
        self.chart_height = height;
        self
    }

    fn total_width(&self) -> u32 {
        self.padding * 2 + self.axis_width + self.chart_width
    }

    fn total_height(&self) -> u32 {
        // Extra rows for the title and legend
        self.padding * 2 + 30 + self.chart_height + self.axis_height + 25
    }

    fn plot_left(&self) -> f64 {
        (self.padding + self.axis_width) as f64
    }

    fn plot_top(&self) -> f64 {
        (self.padding + 30) as f64
    }

    /// Convert a date to x position
    fn date_to_x(&self, date: NaiveDate, start: NaiveDate, px_per_day: f64) -> f64 {
        let days = (date - start).num_days() as f64;
        self.plot_left() + days * px_per_day
    }

    /// Convert a value to y position
    fn value_to_y(&self, value: f64, min: f64, max: f64) -> f64 {
        let span = (max - min).max(f64::EPSILON);
        let fraction = (value - min) / span;
        self.plot_top() + (1.0 - fraction) * self.chart_height as f64
    }

    /// Render horizontal grid lines with value labels
    fn render_grid(&self, min: f64, max: f64) -> Group {
        let mut group = Group::new().set("class", "grid");
        let steps = 5;

        for i in 0..=steps {
            let value = min + (max - min) * f64::from(i) / f64::from(steps);
            let y = self.value_to_y(value, min, max);

            let line = Line::new()
                .set("x1", self.plot_left())
                .set("y1", y)
                .set("x2", self.plot_left() + self.chart_width as f64)
                .set("y2", y)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);

            let label = Text::new(format!("{value:.0}"))
                .set("x", self.plot_left() - 8.0)
                .set("y", y + 4.0)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size - 1)
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "end");
            group = group.add(label);
        }

        group
    }

    /// Render the x axis with date labels at an interval that fits the span
    fn render_date_axis(&self, start: NaiveDate, end: NaiveDate, px_per_day: f64) -> Group {
        let mut group = Group::new().set("class", "axis");
        let baseline = self.plot_top() + self.chart_height as f64;

        let total_days = (end - start).num_days();
        let interval_days = if total_days <= 14 {
            1
        } else if total_days <= 60 {
            7
        } else if total_days <= 180 {
            14
        } else {
            30
        };

        let mut current = start;
        while current <= end {
            let x = self.date_to_x(current, start, px_per_day);

            let tick = Line::new()
                .set("x1", x)
                .set("y1", baseline)
                .set("x2", x)
                .set("y2", baseline + 6.0)
                .set("stroke", self.text_color.as_str())
                .set("stroke-width", 1);
            group = group.add(tick);

            let label = if interval_days == 1 {
                current.format("%d").to_string()
            } else {
                current.format("%b %d").to_string()
            };
            let text = Text::new(label)
                .set("x", x)
                .set("y", baseline + 20.0)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size - 1)
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "middle");
            group = group.add(text);

            current += chrono::Duration::days(interval_days);
        }

        group
    }

    /// Render one series as a polyline
    fn render_series(
        &self,
        series: &Series,
        color: &str,
        start: NaiveDate,
        px_per_day: f64,
        min: f64,
        max: f64,
    ) -> Group {
        let mut group = Group::new().set("class", "series");

        let points: String = series
            .points
            .iter()
            .map(|(date, value)| {
                let x = self.date_to_x(*date, start, px_per_day);
                let y = self.value_to_y(*value, min, max);
                format!("{x:.1},{y:.1}")
            })
            .collect::<Vec<_>>()
            .join(" ");

        let mut line = Polyline::new()
            .set("points", points)
            .set("fill", "none")
            .set("stroke", color)
            .set("stroke-width", 2);
        if series.dashed {
            line = line.set("stroke-dasharray", "6,4");
        }
        group = group.add(line);

        group
    }

    /// Render the legend below the x axis
    fn render_legend(&self, series: &[Series], y_offset: f64) -> Group {
        let mut group = Group::new().set("class", "legend");
        let box_size = 12.0;
        let mut x = self.plot_left();

        for (idx, s) in series.iter().enumerate() {
            let color = &self.palette[idx % self.palette.len()];

            let swatch = Rectangle::new()
                .set("x", x)
                .set("y", y_offset - box_size + 2.0)
                .set("width", box_size)
                .set("height", box_size)
                .set("rx", 2)
                .set("fill", color.as_str());
            group = group.add(swatch);

            let label = Text::new(s.name.as_str())
                .set("x", x + box_size + 5.0)
                .set("y", y_offset)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size - 1)
                .set("fill", self.text_color.as_str());
            group = group.add(label);

            // ~7px per char at 11px font, plus swatch and gap
            x += box_size + 10.0 + s.name.len() as f64 * 7.0 + 25.0;
        }

        group
    }

    /// Render the chart to an SVG string.
    ///
    /// Fails with `InvalidData` when no series carries any points.
    pub fn render(&self, series: &[Series]) -> Result<String, RenderError> {
        let all_points: Vec<&(NaiveDate, f64)> =
            series.iter().flat_map(|s| s.points.iter()).collect();
        if all_points.is_empty() {
            return Err(RenderError::InvalidData("No data points to render".into()));
        }

        let start = all_points.iter().map(|(d, _)| *d).min().unwrap_or_default();
        let end = all_points.iter().map(|(d, _)| *d).max().unwrap_or_default();
        let mut min = all_points
            .iter()
            .map(|(_, v)| *v)
            .fold(f64::INFINITY, f64::min);
        let mut max = all_points
            .iter()
            .map(|(_, v)| *v)
            .fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            // Flat series still gets a visible band
            min -= 1.0;
            max += 1.0;
        }

        let days = (end - start).num_days().max(1) as f64;
        let px_per_day = self.chart_width as f64 / days;

        let width = self.total_width();
        let height = self.total_height();

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        let background = Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.background_color.as_str());
        document = document.add(background);

        if !self.title.is_empty() {
            let title = Text::new(self.title.as_str())
                .set("x", self.plot_left())
                .set("y", (self.padding + 15) as f64)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size + 4)
                .set("font-weight", "bold")
                .set("fill", self.text_color.as_str());
            document = document.add(title);
        }

        document = document.add(self.render_grid(min, max));
        document = document.add(self.render_date_axis(start, end, px_per_day));

        for (idx, s) in series.iter().enumerate() {
            if s.points.is_empty() {
                continue;
            }
            let color = &self.palette[idx % self.palette.len()];
            document = document.add(self.render_series(s, color, start, px_per_day, min, max));
        }

        let legend_y = self.plot_top() + self.chart_height as f64 + self.axis_height as f64 + 15.0;
        document = document.add(self.render_legend(series, legend_y));

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {e}")))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn sample_series() -> Vec<Series> {
        vec![
            Series::new(
                "Seaside",
                vec![(day(1), 120.0), (day(2), 130.0), (day(3), 110.0)],
            ),
            Series::new(
                "Competitors",
                vec![(day(1), 140.0), (day(2), 125.0), (day(3), 135.0)],
            ),
        ]
    }

    #[test]
    fn renderer_defaults() {
        let renderer = LineChartRenderer::new("Prices");
        assert_eq!(renderer.chart_width, 800);
        assert_eq!(renderer.title, "Prices");
    }

    #[test]
    fn renders_valid_svg_with_title_and_legend() {
        let renderer = LineChartRenderer::new("Median Prices");
        let svg = renderer.render(&sample_series()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains("Median Prices"));
        assert!(svg.contains("Seaside"));
        assert!(svg.contains("Competitors"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn dashed_series_sets_dasharray() {
        let renderer = LineChartRenderer::new("Occupancy");
        let series = vec![
            Series::new("Observed", vec![(day(1), 3.0), (day(2), 4.0)]),
            Series::new("Forecast", vec![(day(2), 4.0), (day(3), 5.0)]).dashed(),
        ];
        let svg = renderer.render(&series).unwrap();
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn empty_input_is_invalid_data() {
        let renderer = LineChartRenderer::new("Empty");
        let err = renderer.render(&[]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidData(_)));
    }

    #[test]
    fn flat_series_still_renders() {
        let renderer = LineChartRenderer::new("Flat");
        let series = vec![Series::new("Same", vec![(day(1), 100.0), (day(5), 100.0)])];
        let svg = renderer.render(&series).unwrap();
        assert!(svg.contains("<polyline"));
    }
}
