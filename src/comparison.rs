//! Side-by-side comparison of the four heuristic approaches.
//!
//! Takes one aggregated result bundle per algorithm, normalizes the shared
//! metrics and renders five comparative SVG charts: execution time (line),
//! cost (bar), proximity (pie), diversity (bar) and a combined radar.

use crate::metrics::InstanceResult;

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fs;
use std::path::Path;

/// The four compared heuristic approaches, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Tabu,
    Annealing,
    LocalSearch,
    Greedy,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Tabu,
        Algorithm::Annealing,
        Algorithm::LocalSearch,
        Algorithm::Greedy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Tabu => "Tabu",
            Algorithm::Annealing => "Annealing",
            Algorithm::LocalSearch => "Local Search",
            Algorithm::Greedy => "Greedy",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One aggregated result bundle per compared algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonDataset {
    pub tabu: InstanceResult,
    pub annealing: InstanceResult,
    pub local_search: InstanceResult,
    pub greedy: InstanceResult,
}

impl ComparisonDataset {
    pub fn new(
        tabu: InstanceResult,
        annealing: InstanceResult,
        local_search: InstanceResult,
        greedy: InstanceResult,
    ) -> Self {
        ComparisonDataset {
            tabu,
            annealing,
            local_search,
            greedy,
        }
    }

    pub fn get(&self, algorithm: Algorithm) -> &InstanceResult {
        match algorithm {
            Algorithm::Tabu => &self.tabu,
            Algorithm::Annealing => &self.annealing,
            Algorithm::LocalSearch => &self.local_search,
            Algorithm::Greedy => &self.greedy,
        }
    }

    fn series<F: Fn(&InstanceResult) -> f64>(&self, extract: F) -> [f64; 4] {
        let mut out = [0.0; 4];
        for (i, algorithm) in Algorithm::ALL.iter().enumerate() {
            out[i] = extract(self.get(*algorithm));
        }
        out
    }

    pub fn execution_times(&self) -> [f64; 4] {
        self.series(|r| r.average_execution_time)
    }

    pub fn costs(&self) -> [f64; 4] {
        self.series(|r| r.average_cost)
    }

    /// Average proximities; an uncomputable proximity charts as zero.
    pub fn proximities(&self) -> [f64; 4] {
        self.series(|r| r.average_proximity.unwrap_or(0.0))
    }

    pub fn diversities(&self) -> [f64; 4] {
        self.series(|r| r.diversity)
    }
}

/// Divide a series by its own maximum, mapping it onto [0, 1] relative to
/// the worst algorithm. A uniformly-zero series stays all zero.
pub fn normalize_by_max(series: &[f64]) -> Vec<f64> {
    let max = series.iter().cloned().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![0.0; series.len()];
    }
    series.iter().map(|v| v / max).collect()
}

const SERIES_COLORS: [&str; 4] = ["#3498db", "#2ecc71", "#e74c3c", "#1abc9c"];
const PIE_COLORS: [&str; 4] = ["#f1c40f", "#e67e22", "#2ecc71", "#e74c3c"];

/// SVG chart generator for comparison datasets.
pub struct ComparisonRenderer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin around the plot area
    pub margin: f64,
}

impl Default for ComparisonRenderer {
    fn default() -> Self {
        ComparisonRenderer {
            width: 800.0,
            height: 600.0,
            margin: 70.0,
        }
    }
}

impl ComparisonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render all five charts into `dir`.
    pub fn render_all<P: AsRef<Path>>(
        &self,
        data: &ComparisonDataset,
        dir: P,
    ) -> std::io::Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        fs::write(dir.join("execution_time.svg"), self.execution_time_chart(data))?;
        fs::write(dir.join("cost.svg"), self.cost_chart(data))?;
        fs::write(dir.join("proximity.svg"), self.proximity_chart(data))?;
        fs::write(dir.join("diversity.svg"), self.diversity_chart(data))?;
        fs::write(dir.join("radar.svg"), self.radar_chart(data))?;

        Ok(())
    }

    /// Line chart of raw execution times per algorithm.
    pub fn execution_time_chart(&self, data: &ComparisonDataset) -> String {
        self.line_chart(
            "Execution Time Comparison",
            "Time (s)",
            &data.execution_times(),
        )
    }

    /// Bar chart of raw average costs per algorithm.
    pub fn cost_chart(&self, data: &ComparisonDataset) -> String {
        self.bar_chart("Solution Cost Comparison", "Cost", &data.costs(), "#2ecc71")
    }

    /// Proportional chart of average proximities per algorithm.
    pub fn proximity_chart(&self, data: &ComparisonDataset) -> String {
        self.pie_chart("Average Solution Proximity", &data.proximities())
    }

    /// Bar chart of cost diversity per algorithm.
    pub fn diversity_chart(&self, data: &ComparisonDataset) -> String {
        self.bar_chart(
            "Solution Diversity Comparison",
            "Diversity (cost variance)",
            &data.diversities(),
            "#9b59b6",
        )
    }

    fn svg_open(&self, title: &str) -> String {
        format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<style>
    .axis {{ stroke: #2c3e50; stroke-width: 1; }}
    .grid {{ stroke: #bdc3c7; stroke-width: 0.5; stroke-dasharray: 4,4; }}
    .label {{ font-family: Arial; font-size: 12px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 16px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
<text x="{tx}" y="30" class="title">{title}</text>
"##,
            w = self.width,
            h = self.height,
            tx = self.margin,
            title = title
        )
    }

    /// Shared cartesian frame: axes, four gridlines with tick labels and
    /// the x-axis algorithm labels. Returns the svg fragment plus a value
    /// scale mapping a metric value to a y position.
    fn frame(&self, ylabel: &str, max_value: f64) -> (String, impl Fn(f64) -> f64) {
        let plot_w = self.width - 2.0 * self.margin;
        let plot_h = self.height - 2.0 * self.margin;
        let x0 = self.margin;
        let y0 = self.height - self.margin;
        let margin = self.margin;

        let scale_max = if max_value > 0.0 { max_value } else { 1.0 };
        let height = self.height;
        let to_y = move |v: f64| height - margin - v / scale_max * plot_h;

        let mut svg = String::new();

        svg.push_str(&format!(
            r#"<line x1="{x0}" y1="{y0}" x2="{x1}" y2="{y0}" class="axis"/>
<line x1="{x0}" y1="{ytop}" x2="{x0}" y2="{y0}" class="axis"/>
<text x="{x0}" y="{ly}" class="label">{ylabel}</text>
"#,
            x0 = x0,
            y0 = y0,
            x1 = x0 + plot_w,
            ytop = margin,
            ly = margin - 12.0,
            ylabel = ylabel
        ));

        for step in 1..=4 {
            let v = scale_max * step as f64 / 4.0;
            let y = to_y(v);
            svg.push_str(&format!(
                r#"<line x1="{x0}" y1="{y:.2}" x2="{x1}" y2="{y:.2}" class="grid"/>
<text x="{lx}" y="{ty:.2}" class="label" text-anchor="end">{v:.2}</text>
"#,
                x0 = x0,
                x1 = x0 + plot_w,
                y = y,
                lx = x0 - 8.0,
                ty = y + 4.0,
                v = v
            ));
        }

        for (i, algorithm) in Algorithm::ALL.iter().enumerate() {
            let x = x0 + (i as f64 + 0.5) * plot_w / 4.0;
            svg.push_str(&format!(
                r#"<text x="{x:.2}" y="{y}" class="label" text-anchor="middle">{label}</text>
"#,
                x = x,
                y = y0 + 20.0,
                label = algorithm.label()
            ));
        }

        (svg, to_y)
    }

    fn line_chart(&self, title: &str, ylabel: &str, values: &[f64; 4]) -> String {
        let plot_w = self.width - 2.0 * self.margin;
        let max_value = values.iter().cloned().fold(0.0, f64::max);

        let mut svg = self.svg_open(title);
        let (frame, to_y) = self.frame(ylabel, max_value);
        svg.push_str(&frame);

        let points: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let x = self.margin + (i as f64 + 0.5) * plot_w / 4.0;
                format!("{:.2},{:.2}", x, to_y(v))
            })
            .collect();

        svg.push_str(&format!(
            r##"<polyline points="{}" fill="none" stroke="#3498db" stroke-width="2"/>
"##,
            points.join(" ")
        ));

        for (i, &v) in values.iter().enumerate() {
            let x = self.margin + (i as f64 + 0.5) * plot_w / 4.0;
            let y = to_y(v);
            svg.push_str(&format!(
                r##"<circle cx="{x:.2}" cy="{y:.2}" r="4" fill="#3498db"/>
<text x="{x:.2}" y="{ty:.2}" class="label" text-anchor="middle">{v:.4}</text>
"##,
                x = x,
                y = y,
                ty = y - 10.0,
                v = v
            ));
        }

        svg.push_str("</svg>");
        svg
    }

    fn bar_chart(&self, title: &str, ylabel: &str, values: &[f64; 4], color: &str) -> String {
        let plot_w = self.width - 2.0 * self.margin;
        let y0 = self.height - self.margin;
        let max_value = values.iter().cloned().fold(0.0, f64::max);

        let mut svg = self.svg_open(title);
        let (frame, to_y) = self.frame(ylabel, max_value);
        svg.push_str(&frame);

        let slot = plot_w / 4.0;
        let bar_w = slot * 0.5;

        for (i, &v) in values.iter().enumerate() {
            let x = self.margin + (i as f64 + 0.5) * slot - bar_w / 2.0;
            let y = to_y(v);
            svg.push_str(&format!(
                r##"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{color}" stroke="#2c3e50" stroke-width="1"/>
<text x="{tx:.2}" y="{ty:.2}" class="label" text-anchor="middle">{v:.2}</text>
"##,
                x = x,
                y = y,
                w = bar_w,
                h = (y0 - y).max(0.0),
                color = color,
                tx = x + bar_w / 2.0,
                ty = y - 6.0,
                v = v
            ));
        }

        svg.push_str("</svg>");
        svg
    }

    /// Pie chart of one value per algorithm, wedge angle proportional to
    /// the value's share of the series total.
    fn pie_chart(&self, title: &str, values: &[f64; 4]) -> String {
        let cx = self.width / 2.0;
        let cy = self.height / 2.0 + 15.0;
        let r = (self.height - 2.0 * self.margin) / 2.0 - 20.0;

        let mut svg = self.svg_open(title);

        let total: f64 = values.iter().sum();
        if total <= 0.0 {
            svg.push_str(&format!(
                r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="none" stroke="#2c3e50" stroke-width="1"/>
<text x="{cx}" y="{cy}" class="label" text-anchor="middle">no proximity data</text>
"##,
                cx = cx,
                cy = cy,
                r = r
            ));
            svg.push_str("</svg>");
            return svg;
        }

        // wedges start at twelve o'clock and advance clockwise
        let point = |angle: f64, radius: f64| -> (f64, f64) {
            (cx + radius * angle.sin(), cy - radius * angle.cos())
        };

        let mut angle = 0.0;
        for (i, (&v, algorithm)) in values.iter().zip(Algorithm::ALL.iter()).enumerate() {
            // a full-circle wedge would collapse to a zero-length arc
            let sweep = (v / total * 2.0 * PI).min(2.0 * PI - 1e-4);
            if sweep <= 0.0 {
                continue;
            }

            let (x0, y0) = point(angle, r);
            let (x1, y1) = point(angle + sweep, r);
            let large = if sweep > PI { 1 } else { 0 };

            svg.push_str(&format!(
                r##"<path d="M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large} 1 {x1:.2} {y1:.2} Z" fill="{color}" stroke="#2c3e50" stroke-width="0.5"/>
"##,
                cx = cx,
                cy = cy,
                x0 = x0,
                y0 = y0,
                r = r,
                large = large,
                x1 = x1,
                y1 = y1,
                color = PIE_COLORS[i]
            ));

            let (lx, ly) = point(angle + sweep / 2.0, r * 0.65);
            svg.push_str(&format!(
                r#"<text x="{lx:.2}" y="{ly:.2}" class="label" text-anchor="middle">{label} {share:.1}%</text>
"#,
                lx = lx,
                ly = ly,
                label = algorithm.label(),
                share = v / total * 100.0
            ));

            angle += sweep;
        }

        svg.push_str("</svg>");
        svg
    }

    /// Radar chart overlaying the four normalized metrics for all four
    /// algorithms. Execution time and cost are scaled by their series
    /// maximum, proximity and diversity by the fixed scale 100. Each
    /// polygon is closed by repeating its first vertex.
    pub fn radar_chart(&self, data: &ComparisonDataset) -> String {
        let cx = self.width / 2.0;
        let cy = self.height / 2.0 + 15.0;
        let r = (self.height - 2.0 * self.margin) / 2.0 - 20.0;

        let exec_norm = normalize_by_max(&data.execution_times());
        let cost_norm = normalize_by_max(&data.costs());
        let prox_norm: Vec<f64> = data.proximities().iter().map(|v| v / 100.0).collect();
        let div_norm: Vec<f64> = data.diversities().iter().map(|v| v / 100.0).collect();

        let axis_labels = ["Execution Time", "Cost", "Proximity", "Diversity"];
        let angle_of = |axis: usize| axis as f64 * 2.0 * PI / 4.0;
        let point = |axis: usize, value: f64| -> (f64, f64) {
            let angle = angle_of(axis);
            (cx + r * value * angle.sin(), cy - r * value * angle.cos())
        };

        let mut svg = self.svg_open("Algorithm Comparison");

        for ring in 1..=4 {
            let rv = ring as f64 / 4.0;
            let ring_points: Vec<String> = (0..=4)
                .map(|axis| {
                    let (x, y) = point(axis % 4, rv);
                    format!("{:.2},{:.2}", x, y)
                })
                .collect();
            svg.push_str(&format!(
                r#"<polyline points="{}" fill="none" class="grid"/>
"#,
                ring_points.join(" ")
            ));
        }

        for (axis, label) in axis_labels.iter().enumerate() {
            let (x, y) = point(axis, 1.0);
            let (lx, ly) = point(axis, 1.12);
            svg.push_str(&format!(
                r#"<line x1="{cx}" y1="{cy}" x2="{x:.2}" y2="{y:.2}" class="axis"/>
<text x="{lx:.2}" y="{ly:.2}" class="label" text-anchor="middle">{label}</text>
"#,
                cx = cx,
                cy = cy,
                x = x,
                y = y,
                lx = lx,
                ly = ly,
                label = label
            ));
        }

        for (k, algorithm) in Algorithm::ALL.iter().enumerate() {
            let values = [exec_norm[k], cost_norm[k], prox_norm[k], div_norm[k]];
            // five points: the polygon closes on its first vertex
            let points: Vec<String> = (0..=4)
                .map(|axis| {
                    let (x, y) = point(axis % 4, values[axis % 4]);
                    format!("{:.2},{:.2}", x, y)
                })
                .collect();

            svg.push_str(&format!(
                r#"<polyline points="{points}" fill="{color}" fill-opacity="0.25" stroke="{color}" stroke-width="2"/>
"#,
                points = points.join(" "),
                color = SERIES_COLORS[k]
            ));

            let legend_y = self.height - 30.0 - (3 - k) as f64 * 18.0;
            svg.push_str(&format!(
                r##"<rect x="{x}" y="{y:.2}" width="12" height="12" fill="{color}"/>
<text x="{tx}" y="{ty:.2}" class="label">{label}</text>
"##,
                x = self.margin,
                y = legend_y,
                color = SERIES_COLORS[k],
                tx = self.margin + 18.0,
                ty = legend_y + 10.0,
                label = algorithm.label()
            ));
        }

        svg.push_str("</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(cost: f64, time: f64, proximity: Option<f64>, diversity: f64) -> InstanceResult {
        InstanceResult {
            average_cost: cost,
            min_cost: cost,
            max_cost: cost,
            valid_percentage: 100.0,
            average_execution_time: time,
            average_proximity: proximity,
            diversity,
            convergence_rate: 0.0,
            trials_requested: 5,
            trials_completed: 5,
        }
    }

    fn dataset() -> ComparisonDataset {
        ComparisonDataset::new(
            result(500.0, 2.0, Some(12.0), 40.0),
            result(480.0, 1.0, Some(8.0), 65.0),
            result(520.0, 4.0, Some(15.0), 10.0),
            result(610.0, 1.0, Some(30.0), 0.0),
        )
    }

    #[test]
    fn test_normalize_by_max() {
        let normalized = normalize_by_max(&[2.0, 1.0, 4.0, 1.0]);
        assert_eq!(normalized, vec![0.5, 0.25, 1.0, 0.25]);
    }

    #[test]
    fn test_normalize_uniformly_zero() {
        let normalized = normalize_by_max(&[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(normalized, vec![0.0; 4]);
    }

    #[test]
    fn test_series_extraction() {
        let data = dataset();
        assert_eq!(data.execution_times(), [2.0, 1.0, 4.0, 1.0]);
        assert_eq!(data.costs(), [500.0, 480.0, 520.0, 610.0]);
        assert_eq!(data.proximities(), [12.0, 8.0, 15.0, 30.0]);
        assert_eq!(data.diversities(), [40.0, 65.0, 10.0, 0.0]);
    }

    #[test]
    fn test_charts_are_well_formed() {
        let renderer = ComparisonRenderer::new();
        let data = dataset();

        for chart in [
            renderer.execution_time_chart(&data),
            renderer.cost_chart(&data),
            renderer.proximity_chart(&data),
            renderer.diversity_chart(&data),
            renderer.radar_chart(&data),
        ] {
            assert!(chart.starts_with("<?xml"));
            assert!(chart.ends_with("</svg>"));
            assert!(chart.contains("Tabu"));
        }
    }

    #[test]
    fn test_pie_chart_handles_zero_total() {
        let renderer = ComparisonRenderer::new();
        let data = ComparisonDataset::new(
            result(1.0, 1.0, None, 0.0),
            result(1.0, 1.0, None, 0.0),
            result(1.0, 1.0, None, 0.0),
            result(1.0, 1.0, None, 0.0),
        );

        let chart = renderer.proximity_chart(&data);
        assert!(chart.contains("no proximity data"));
    }

    #[test]
    fn test_radar_polygons_close_on_first_vertex() {
        let renderer = ComparisonRenderer::new();
        let chart = renderer.radar_chart(&dataset());

        // every polyline with a fill is an algorithm polygon; its first and
        // last points must coincide
        for line in chart.lines().filter(|l| l.contains("fill-opacity")) {
            let points = line
                .split("points=\"")
                .nth(1)
                .and_then(|rest| rest.split('"').next())
                .unwrap();
            let coords: Vec<&str> = points.split(' ').collect();
            assert_eq!(coords.len(), 5);
            assert_eq!(coords.first(), coords.last());
        }
    }
}
