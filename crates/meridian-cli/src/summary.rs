use console::Style;
use meridian_core::measurement::{Measurement, MeasurementMetrics};
use meridian_core::mpr::{MprSyncEngine, Plane};
use meridian_core::types::PixelSpacing;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    kind: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            kind: Style::new().green(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

fn format_metric(value: Option<f64>, unit: &str) -> Option<String> {
    value.map(|v| format!("{v:.2} {unit}"))
}

fn metrics_text(metrics: &MeasurementMetrics) -> Vec<String> {
    [
        format_metric(metrics.length_mm, "mm"),
        format_metric(metrics.area_mm2, "mm\u{b2}"),
        format_metric(metrics.perimeter_mm, "mm perimeter"),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn print_measurement_report(measurements: &[Measurement], spacing: Option<PixelSpacing>) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Measurements"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(12)));
    println!();
    match spacing {
        Some(sp) => println!(
            "  {:<14}{}",
            s.label.apply_to("Spacing"),
            s.value.apply_to(format!("{} x {} mm", sp.row_spacing, sp.column_spacing))
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Spacing"),
            s.disabled.apply_to("from file")
        ),
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Count"),
        s.value.apply_to(measurements.len())
    );

    let mut current_series: Option<&str> = None;
    for m in measurements {
        if current_series != Some(m.series_uid.as_str()) {
            println!();
            println!("  {}", s.header.apply_to(&m.series_uid));
            current_series = Some(m.series_uid.as_str());
        }
        let label = if m.label.is_empty() { m.id.as_str() } else { m.label.as_str() };
        let where_shown = match m.frame_key.as_deref() {
            Some(frame) => format!("frame {frame}"),
            None => m.scope.to_string(),
        };
        let metrics = metrics_text(&m.metrics);
        let metrics = if metrics.is_empty() {
            s.disabled.apply_to("no calibration".to_string())
        } else {
            s.value.apply_to(metrics.join(", "))
        };
        println!(
            "    {:<10}{:<20}{:<14}{}",
            s.kind.apply_to(m.kind()),
            label,
            s.label.apply_to(where_shown),
            metrics
        );
        if let Some(volume) = m.volume {
            println!(
                "    {:<10}{}",
                "",
                s.value.apply_to(format!(
                    "{:.2} mm\u{b3} over {} slices",
                    volume.volume_mm3, volume.slice_count
                ))
            );
        }
    }
    println!();
}

pub fn print_mpr_summary(engine: &MprSyncEngine) {
    let s = Styles::new();
    let state = engine.state();

    println!();
    println!("  {}", s.title.apply_to("MPR State"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(9)));
    println!();
    if let Some(info) = engine.volume_info() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Volume"),
            s.value.apply_to(format!(
                "{} x {} x {}",
                info.dimensions[0], info.dimensions[1], info.dimensions[2]
            ))
        );
        if !info.modality.is_empty() {
            println!(
                "  {:<14}{}",
                s.label.apply_to("Modality"),
                s.kind.apply_to(&info.modality)
            );
        }
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Crosshair"),
        s.value.apply_to(state.crosshair)
    );
    let linked = if state.linked {
        s.kind.apply_to("linked")
    } else {
        s.disabled.apply_to("unlinked")
    };
    println!("  {:<14}{}", s.label.apply_to("Views"), linked);

    for plane in Plane::ALL {
        let view = engine.view(plane);
        println!();
        println!("  {}", s.header.apply_to(plane));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Slice"),
            s.value.apply_to(view.slice_index)
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Window"),
            s.value.apply_to(format!(
                "C {} / W {}",
                view.window_level.center, view.window_level.width
            ))
        );
        for line in engine.crosshair_lines(plane) {
            println!(
                "    {:<12}{}",
                s.label.apply_to(format!("{} line", line.source_plane)),
                s.value.apply_to(format!("{:.1}%", line.position_percent))
            );
        }
    }
    println!();
}
