//! SVG bar chart rendering
//!
//! Charts are written as standalone SVG documents: one bar per category,
//! the count printed above each bar, category labels rotated under the axis.

use std::fmt::Write;

const BAR_WIDTH: u32 = 48;
const BAR_GAP: u32 = 24;
const PLOT_HEIGHT: u32 = 320;
const MARGIN_LEFT: u32 = 70;
const MARGIN_TOP: u32 = 60;
const MARGIN_BOTTOM: u32 = 160;
const MARGIN_RIGHT: u32 = 30;

/// Fill and outline of a chart's bars
#[derive(Debug, Clone, Copy)]
pub struct BarStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
}

/// Bars of the license chart
pub const LICENSE_STYLE: BarStyle = BarStyle {
    fill: "skyblue",
    stroke: "black",
};

/// Bars of the version chart
pub const VERSION_STYLE: BarStyle = BarStyle {
    fill: "lightcoral",
    stroke: "black",
};

/// Renders a bar chart as an SVG document
///
/// # Arguments
///
/// * `title` - Chart heading
/// * `x_label` - Axis label under the categories
/// * `bars` - `(category, count)` pairs in display order
/// * `style` - Bar colors
///
/// # Returns
///
/// The SVG document as a string
pub fn render_bar_chart(
    title: &str,
    x_label: &str,
    bars: &[(String, usize)],
    style: BarStyle,
) -> String {
    let slots = bars.len().max(1) as u32;
    let plot_width = slots * (BAR_WIDTH + BAR_GAP) + BAR_GAP;
    let width = MARGIN_LEFT + plot_width + MARGIN_RIGHT;
    let height = MARGIN_TOP + PLOT_HEIGHT + MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + PLOT_HEIGHT;
    let max_count = bars.iter().map(|(_, count)| *count).max().unwrap_or(0).max(1);

    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = width,
        h = height
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="32" text-anchor="middle" font-size="18" font-weight="bold">{}</text>"#,
        width / 2,
        escape(title)
    );

    // Horizontal grid at quarters of the tallest bar
    for step in 1..=4u32 {
        let y = baseline - PLOT_HEIGHT * step / 4;
        let value = max_count as f64 * step as f64 / 4.0;
        let _ = writeln!(
            svg,
            r##"<line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="#cccccc" stroke-width="1"/>"##,
            x1 = MARGIN_LEFT,
            x2 = MARGIN_LEFT + plot_width,
            y = y
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="end" font-size="11">{:.0}</text>"#,
            MARGIN_LEFT - 6,
            y + 4,
            value
        );
    }

    for (index, (label, count)) in bars.iter().enumerate() {
        let x = MARGIN_LEFT + BAR_GAP + index as u32 * (BAR_WIDTH + BAR_GAP);
        let bar_height = (*count as u64 * PLOT_HEIGHT as u64 / max_count as u64) as u32;
        let y = baseline - bar_height;
        let center = x + BAR_WIDTH / 2;

        let _ = writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}"/>"#,
            x, y, BAR_WIDTH, bar_height, style.fill, style.stroke
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12" font-weight="bold">{}</text>"#,
            center,
            y.saturating_sub(6),
            count
        );
        let _ = writeln!(
            svg,
            r#"<text x="{c}" y="{y}" text-anchor="end" font-size="11" transform="rotate(-45 {c} {y})">{label}</text>"#,
            c = center,
            y = baseline + 16,
            label = escape(label)
        );
    }

    let _ = writeln!(
        svg,
        r#"<line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="black" stroke-width="1"/>"#,
        x1 = MARGIN_LEFT,
        x2 = MARGIN_LEFT + plot_width,
        y = baseline
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="13">{}</text>"#,
        MARGIN_LEFT + plot_width / 2,
        height - 16,
        escape(x_label)
    );
    let _ = writeln!(
        svg,
        r#"<text x="18" y="{y}" text-anchor="middle" font-size="13" transform="rotate(-90 18 {y})">Number of Papers</text>"#,
        y = MARGIN_TOP + PLOT_HEIGHT / 2
    );
    svg.push_str("</svg>\n");

    svg
}

/// Escapes text for use inside SVG elements
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
