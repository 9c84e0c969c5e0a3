use queueplot::{
    ChartKind, ChartRenderer, JsonRenderer, SvgRenderer,
    charts::{AxisScale, Chart, Panel, Point, ReferenceLine, Series},
};

fn sample_chart() -> Chart {
    Chart {
        kind: ChartKind::Throughput,
        name: "throughput_t10_b1".into(),
        x_label: "Threads".into(),
        y_label: "Throughput [succ. ops / s]".into(),
        x_scale: AxisScale::Log,
        y_scale: AxisScale::Log,
        x_range: (1.0, 16.0),
        panels: vec![
            Panel {
                title: Some("Pattern: mixed".into()),
                reference: Some(ReferenceLine {
                    label: "seq".into(),
                    color: "#EA558F".into(),
                    y: 1_000.0,
                    x_from: 1.0,
                    x_to: 16.0,
                }),
                series: vec![Series {
                    label: "cas".into(),
                    color: "#F39345".into(),
                    points: vec![
                        Point { x: 1.0, y: 900.0 },
                        Point { x: 4.0, y: 3_000.0 },
                        Point { x: 16.0, y: 0.0 },
                    ],
                }],
            },
            Panel {
                title: Some("Pattern: <pairs>".into()),
                reference: None,
                series: vec![],
            },
        ],
    }
}

#[test]
fn test_svg_document_structure() {
    let svg = SvgRenderer.render(&sample_chart()).unwrap();
    assert_eq!(SvgRenderer.extension(), "svg");
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<g transform=").count(), 2);
    assert!(svg.contains("Pattern: mixed"));
    assert!(svg.contains("Pattern: &lt;pairs&gt;"));
    assert!(svg.contains("Throughput [succ. ops / s]"));
}

#[test]
fn test_svg_draws_series_and_reference() {
    let svg = SvgRenderer.render(&sample_chart()).unwrap();
    assert_eq!(svg.matches("<polyline").count(), 1);
    assert!(svg.contains("stroke=\"#EA558F\""));
    // the zero point cannot be placed on a log axis
    let polyline = svg.lines().find(|l| l.starts_with("<polyline")).unwrap();
    let points = polyline.split('"').nth(1).unwrap();
    assert_eq!(points.split(' ').count(), 2);
    assert_eq!(svg.matches("<path d=").count(), 2);
}

#[test]
fn test_svg_renders_empty_chart() {
    let chart = Chart {
        panels: vec![],
        ..sample_chart()
    };
    let svg = SvgRenderer.render(&chart).unwrap();
    assert!(svg.contains("</svg>"));
}

#[test]
fn test_json_renderer_preserves_chart() {
    let chart = sample_chart();
    let json = JsonRenderer.render(&chart).unwrap();
    assert_eq!(JsonRenderer.extension(), "json");
    let decoded: Chart = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, chart);
    assert!(json.contains("\"kind\": \"throughput\""));
}
