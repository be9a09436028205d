//! SVG pixel mapping and markup.

use serde::Serialize;

use super::normalize::{AXIS_DATE_FORMAT, NormalizedSeries, label_stride};
use crate::config::ChartConfig;

const BACKGROUND: &str = "#0f1419";
const AXIS: &str = "#2f3336";
const TEXT: &str = "#71767b";
const USED_STROKE: &str = "#f4212e";
const LEFTOVER_STROKE: &str = "#00ba7c";

/// A point in SVG pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Pixels from the left edge.
    pub x: f64,
    /// Pixels from the top edge.
    pub y: f64,
}

/// A date label in SVG pixel space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SvgLabel {
    /// Anchor x (text is centered on it).
    pub x: f64,
    /// Baseline y.
    pub y: f64,
    /// `MM/DD`.
    pub text: String,
}

/// Pixel geometry for the two-polyline usage chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SvgChart {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Padding on every side.
    pub padding: f64,
    /// "Used" polyline.
    pub used: Vec<ChartPoint>,
    /// "Leftover" polyline.
    pub leftover: Vec<ChartPoint>,
    /// Date labels under the x axis.
    pub labels: Vec<SvgLabel>,
}

impl SvgChart {
    /// Maps `series` into the canvas described by `config`.
    ///
    /// `px = pad + x × (w − 2·pad)`, `py = pad + y × (h − 2·pad)`. Labels sit
    /// 20px below the x axis at every label stride and at the last point.
    pub fn map(series: &NormalizedSeries, config: &ChartConfig) -> Self {
        let (w, h, pad) = (config.svg_width, config.svg_height, config.svg_padding);
        let inner_w = w - 2.0 * pad;
        let inner_h = h - 2.0 * pad;

        let to_px = |xf: f64, yf: f64| ChartPoint {
            x: pad + xf * inner_w,
            y: pad + yf * inner_h,
        };

        let points = series.points();
        let used = points.iter().map(|p| to_px(p.x, p.used)).collect();
        let leftover = points.iter().map(|p| to_px(p.x, p.leftover)).collect();

        let stride = label_stride(points.len(), config.label_count);
        let last = points.len().saturating_sub(1);
        let labels = points
            .iter()
            .enumerate()
            .filter(|(i, _)| i % stride == 0 || *i == last)
            .map(|(_, p)| SvgLabel {
                x: pad + p.x * inner_w,
                y: h - pad + 20.0,
                text: p.collected_at.format(AXIS_DATE_FORMAT).to_string(),
            })
            .collect();

        Self {
            width: w,
            height: h,
            padding: pad,
            used,
            leftover,
            labels,
        }
    }

    /// Renders a standalone `<svg>` document.
    pub fn to_markup(&self) -> String {
        let (w, h, pad) = (self.width, self.height, self.padding);
        let baseline = h - pad;
        let legend_y = pad - 20.0;

        let mut parts = vec![
            format!(r#"<svg viewBox="0 0 {w:.0} {h:.0}" xmlns="http://www.w3.org/2000/svg">"#),
            format!(r#"<rect width="100%" height="100%" fill="{BACKGROUND}"/>"#),
            format!(
                r#"<line x1="{pad:.0}" y1="{pad:.0}" x2="{pad:.0}" y2="{baseline:.0}" stroke="{AXIS}" stroke-width="1"/>"#
            ),
            format!(
                r#"<line x1="{pad:.0}" y1="{baseline:.0}" x2="{:.0}" y2="{baseline:.0}" stroke="{AXIS}" stroke-width="1"/>"#,
                w - pad
            ),
            format!(
                r#"<text x="{pad:.0}" y="{legend_y:.0}" fill="{TEXT}" font-size="12">Used</text>"#
            ),
            format!(
                r#"<text x="{:.0}" y="{legend_y:.0}" fill="{TEXT}" font-size="12">Leftover</text>"#,
                pad + 80.0
            ),
            format!(
                r#"<polyline points="{}" fill="none" stroke="{USED_STROKE}" stroke-width="2"/>"#,
                polyline_points(&self.used)
            ),
            format!(
                r#"<polyline points="{}" fill="none" stroke="{LEFTOVER_STROKE}" stroke-width="2"/>"#,
                polyline_points(&self.leftover)
            ),
        ];
        parts.extend(self.labels.iter().map(|label| {
            format!(
                r#"<text x="{:.0}" y="{:.0}" fill="{TEXT}" font-size="10" text-anchor="middle">{}</text>"#,
                label.x, label.y, label.text
            )
        }));
        parts.push("</svg>".to_string());
        parts.concat()
    }

    /// Markup shown in place of a chart when there is too little data.
    pub fn placeholder(config: &ChartConfig, message: &str) -> String {
        format!(
            r#"<svg viewBox="0 0 {w:.0} {h:.0}" xmlns="http://www.w3.org/2000/svg"><rect width="100%" height="100%" fill="{BACKGROUND}"/><text x="{x:.0}" y="{y:.0}" text-anchor="middle" fill="{TEXT}">{message}</text></svg>"#,
            w = config.svg_width,
            h = config.svg_height,
            x = config.svg_width / 2.0,
            y = config.svg_height / 2.0,
        )
    }
}

/// `x,y` pairs with one decimal, space-separated.
fn polyline_points(points: &[ChartPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{:.1},{:.1}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Snapshot, SnapshotId};
    use chrono::{Duration, TimeZone, Utc};

    fn normalized(used: &[i64]) -> NormalizedSeries {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let rows: Vec<Snapshot> = used
            .iter()
            .enumerate()
            .map(|(i, &u)| Snapshot {
                id: SnapshotId(i as i64 + 1),
                collected_at: t0 + Duration::days(i as i64),
                subscription_limit: 100,
                requests_used: u,
                renews_at: None,
            })
            .collect();
        NormalizedSeries::from_snapshots(&rows).unwrap()
    }

    #[test]
    fn test_pixel_mapping() {
        let chart = SvgChart::map(&normalized(&[0, 50, 100]), &ChartConfig::default());
        // inner area is 680 x 280
        assert_eq!(chart.used[0], ChartPoint { x: 60.0, y: 340.0 });
        assert_eq!(chart.used[1], ChartPoint { x: 400.0, y: 200.0 });
        assert_eq!(chart.used[2], ChartPoint { x: 740.0, y: 60.0 });
        assert_eq!(chart.leftover[0], ChartPoint { x: 60.0, y: 60.0 });
    }

    #[test]
    fn test_labels_include_last_point() {
        let used: Vec<i64> = (0..7).collect();
        let chart = SvgChart::map(&normalized(&used), &ChartConfig::default());
        // stride 1 for 7 points
        assert_eq!(chart.labels.len(), 7);
        assert_eq!(chart.labels[0].text, "03/01");
        assert_eq!(chart.labels[0].y, 360.0);

        let used: Vec<i64> = (0..12).collect();
        let chart = SvgChart::map(&normalized(&used), &ChartConfig::default());
        // stride 2: 0,2,4,6,8,10 plus 11
        assert_eq!(chart.labels.len(), 7);
        assert_eq!(chart.labels.last().unwrap().x, 740.0);
    }

    #[test]
    fn test_markup_contains_polylines() {
        let chart = SvgChart::map(&normalized(&[0, 100]), &ChartConfig::default());
        let svg = chart.to_markup();
        assert!(svg.starts_with(r#"<svg viewBox="0 0 800 400""#));
        assert!(svg.contains(r##"points="60.0,340.0 740.0,60.0" fill="none" stroke="#f4212e""##));
        assert!(svg.contains(r##"points="60.0,60.0 740.0,340.0" fill="none" stroke="#00ba7c""##));
        assert!(svg.contains(">03/02</text>"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_markup_element_order() {
        let chart = SvgChart {
            width: 200.0,
            height: 100.0,
            padding: 20.0,
            used: vec![ChartPoint { x: 20.0, y: 80.0 }, ChartPoint { x: 180.0, y: 20.0 }],
            leftover: vec![ChartPoint { x: 20.0, y: 20.0 }, ChartPoint { x: 180.0, y: 80.0 }],
            labels: vec![SvgLabel {
                x: 20.0,
                y: 100.0,
                text: "03/01".to_string(),
            }],
        };
        let expected = concat!(
            r#"<svg viewBox="0 0 200 100" xmlns="http://www.w3.org/2000/svg">"#,
            r##"<rect width="100%" height="100%" fill="#0f1419"/>"##,
            r##"<line x1="20" y1="20" x2="20" y2="80" stroke="#2f3336" stroke-width="1"/>"##,
            r##"<line x1="20" y1="80" x2="180" y2="80" stroke="#2f3336" stroke-width="1"/>"##,
            r##"<text x="20" y="0" fill="#71767b" font-size="12">Used</text>"##,
            r##"<text x="100" y="0" fill="#71767b" font-size="12">Leftover</text>"##,
            r##"<polyline points="20.0,80.0 180.0,20.0" fill="none" stroke="#f4212e" stroke-width="2"/>"##,
            r##"<polyline points="20.0,20.0 180.0,80.0" fill="none" stroke="#00ba7c" stroke-width="2"/>"##,
            r##"<text x="20" y="100" fill="#71767b" font-size="10" text-anchor="middle">03/01</text>"##,
            "</svg>",
        );
        assert_eq!(chart.to_markup(), expected);
    }

    #[test]
    fn test_placeholder() {
        let svg = SvgChart::placeholder(&ChartConfig::default(), "Need more data points");
        assert!(svg.contains(r#"x="400" y="200""#));
        assert!(svg.contains("Need more data points"));
    }
}
