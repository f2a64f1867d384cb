//! SVG line and doughnut charts.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use yew::prelude::*;

pub const PALETTE: [&str; 10] = [
    "#667eea", "#764ba2", "#f093fb", "#f5576c", "#4facfe", "#00f2fe", "#43e97b", "#38f9d7",
    "#fa709a", "#fee140",
];

const LINE_WIDTH: f64 = 600.0;
const LINE_HEIGHT: f64 = 240.0;
const PAD: f64 = 12.0;
const RING_RADIUS: f64 = 70.0;

pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Maps `values` into a `width` x `height` box with zero at the bottom
/// edge and `max` at the top.
pub fn plot_points(values: &[f64], max: f64, width: f64, height: f64) -> Vec<(f64, f64)> {
    let max = if max > 0.0 { max } else { 1.0 };
    let step = if values.len() > 1 {
        width / (values.len() - 1) as f64
    } else {
        0.0
    };
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = if values.len() == 1 { width / 2.0 } else { step * i as f64 };
            let y = height - (v.max(0.0) / max).min(1.0) * height;
            (x, y)
        })
        .collect()
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x + PAD, y + PAD))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Debug, PartialEq)]
pub struct RingSegment {
    pub label: String,
    pub color: &'static str,
    /// Fraction of the ring, 0..=1.
    pub fraction: f64,
    /// Fraction of the ring preceding this segment.
    pub offset: f64,
}

pub fn ring_segments(items: &[(String, Decimal)]) -> Vec<RingSegment> {
    let total: f64 = items.iter().map(|(_, v)| to_f64(*v).max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut offset = 0.0;
    items
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let fraction = to_f64(*value).max(0.0) / total;
            let segment = RingSegment {
                label: label.clone(),
                color: PALETTE[i % PALETTE.len()],
                fraction,
                offset,
            };
            offset += fraction;
            segment
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: &'static str,
    pub values: Vec<f64>,
    pub filled: bool,
}

#[derive(Properties, PartialEq)]
pub struct LineChartProps {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    #[prop_or_default]
    pub show_legend: bool,
}

#[function_component(LineChart)]
pub fn line_chart(props: &LineChartProps) -> Html {
    let has_data = props.series.iter().any(|s| !s.values.is_empty());
    if !has_data {
        return html! { <p class="text-sm text-muted-foreground">{"No data available"}</p> };
    }

    let max = props
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0_f64, f64::max);
    let view_box = format!("0 0 {} {}", LINE_WIDTH + 2.0 * PAD, LINE_HEIGHT + 2.0 * PAD);
    let baseline = format!("{:.1}", LINE_HEIGHT + PAD);

    html! {
        <div class="space-y-2">
            if props.show_legend {
                <div class="flex gap-4 text-xs text-muted-foreground">
                    { for props.series.iter().map(|s| html! {
                        <span class="flex items-center gap-1">
                            <span class="inline-block w-3 h-3 rounded-full" style={format!("background: {}", s.color)}></span>
                            { s.label }
                        </span>
                    }) }
                </div>
            }
            <svg viewBox={view_box} class="w-full h-60">
                <line x1={PAD.to_string()} y1={baseline.clone()} x2={(LINE_WIDTH + PAD).to_string()} y2={baseline} stroke="#e2e8f0" />
                { for props.series.iter().map(|s| {
                    let points = plot_points(&s.values, max, LINE_WIDTH, LINE_HEIGHT);
                    let area = if s.filled && points.len() > 1 {
                        let mut outline = points.clone();
                        if let (Some(first), Some(last)) = (points.first(), points.last()) {
                            outline.push((last.0, LINE_HEIGHT));
                            outline.push((first.0, LINE_HEIGHT));
                        }
                        html! { <polygon points={points_attr(&outline)} fill={s.color} fill-opacity="0.1" /> }
                    } else {
                        html! {}
                    };
                    html! {
                        <>
                            { area }
                            <polyline points={points_attr(&points)} fill="none" stroke={s.color} stroke-width="3" stroke-linejoin="round" />
                            { for points.iter().map(|(x, y)| html! {
                                <circle cx={format!("{:.1}", x + PAD)} cy={format!("{:.1}", y + PAD)} r="3" fill={s.color} />
                            }) }
                        </>
                    }
                }) }
            </svg>
            <div class="flex justify-between text-[10px] text-muted-foreground">
                { for props.labels.iter().map(|label| html! { <span>{ label.clone() }</span> }) }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct DoughnutChartProps {
    pub items: Vec<(String, Decimal)>,
}

#[function_component(DoughnutChart)]
pub fn doughnut_chart(props: &DoughnutChartProps) -> Html {
    let segments = ring_segments(&props.items);
    if segments.is_empty() {
        return html! { <p class="text-sm text-muted-foreground">{"No data available"}</p> };
    }

    let circumference = 2.0 * std::f64::consts::PI * RING_RADIUS;

    html! {
        <div class="flex flex-col items-center gap-4">
            <svg viewBox="0 0 180 180" class="w-48 h-48 transform -rotate-90">
                { for segments.iter().map(|seg| {
                    let length = seg.fraction * circumference;
                    html! {
                        <circle cx="90" cy="90" r={RING_RADIUS.to_string()} fill="transparent"
                            stroke={seg.color} stroke-width="24"
                            stroke-dasharray={format!("{:.2} {:.2}", length, circumference - length)}
                            stroke-dashoffset={format!("{:.2}", -seg.offset * circumference)} />
                    }
                }) }
            </svg>
            <ul class="grid grid-cols-2 gap-x-6 gap-y-1 text-xs">
                { for segments.iter().zip(props.items.iter()).map(|(seg, (_, amount))| html! {
                    <li class="flex items-center gap-2">
                        <span class="inline-block w-3 h-3 rounded-full" style={format!("background: {}", seg.color)}></span>
                        <span class="text-foreground">{ seg.label.clone() }</span>
                        <span class="text-muted-foreground">
                            { format!("{} ({:.1}%)", crate::format::format_currency(*amount), seg.fraction * 100.0) }
                        </span>
                    </li>
                }) }
            </ul>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn points_span_the_width_and_start_at_zero() {
        let points = plot_points(&[0.0, 50.0, 100.0], 100.0, 200.0, 100.0);
        assert_eq!(points, vec![(0.0, 100.0), (100.0, 50.0), (200.0, 0.0)]);
    }

    #[test]
    fn single_point_is_centered_and_zero_max_is_safe() {
        assert_eq!(plot_points(&[5.0], 0.0, 200.0, 100.0), vec![(100.0, 0.0)]);
        assert_eq!(plot_points(&[0.0, 0.0], 0.0, 10.0, 10.0), vec![(0.0, 10.0), (10.0, 10.0)]);
    }

    #[test]
    fn ring_segments_cover_whole_ring() {
        let items = vec![
            ("Food".to_string(), dec!(25)),
            ("Travel".to_string(), dec!(75)),
        ];
        let segments = ring_segments(&items);
        assert_eq!(segments.len(), 2);
        assert!((segments[0].fraction - 0.25).abs() < 1e-9);
        assert!((segments[1].offset - 0.25).abs() < 1e-9);
        let sum: f64 = segments.iter().map(|s| s.fraction).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(segments[1].color, PALETTE[1]);
    }

    #[test]
    fn empty_ring_has_no_segments() {
        assert!(ring_segments(&[]).is_empty());
        assert!(ring_segments(&[("Other".to_string(), Decimal::ZERO)]).is_empty());
    }
}
