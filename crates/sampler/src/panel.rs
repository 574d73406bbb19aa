//! Painel de texto – apresentação mínima das séries e do alerta no terminal.

use std::collections::BTreeMap;
use std::fmt::Write;
use thermal_core::{Alert, TemperatureEngine, TickReport};

const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Largura máxima do sparkline (últimos N pontos).
const SPARK_WIDTH: usize = 30;

/// Formata uma temperatura, `--` quando indisponível.
pub fn format_temp(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}°C"),
        None => "--".into(),
    }
}

/// Gráfico de uma linha com os últimos `width` valores.
///
/// A escala vai do menor ao maior valor visível; NaN vira espaço.
pub fn sparkline(values: &[f64], width: usize) -> String {
    let start = values.len().saturating_sub(width);
    let visible = &values[start..];

    let (lo, hi) = visible
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = hi - lo;

    visible
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                ' '
            } else if span <= 0.0 {
                SPARK_CHARS[SPARK_CHARS.len() / 2]
            } else {
                let idx = ((v - lo) / span * (SPARK_CHARS.len() - 1) as f64).round() as usize;
                SPARK_CHARS[idx.min(SPARK_CHARS.len() - 1)]
            }
        })
        .collect()
}

fn window_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Monta o painel a partir de um snapshot já tirado.
pub fn render_snapshot(
    snapshot: &BTreeMap<String, Vec<f64>>,
    report: &TickReport,
    window_size: usize,
    threshold: f64,
    alert: Option<Alert>,
) -> String {
    let mut out = String::new();
    let name_width = snapshot.keys().map(|k| k.chars().count()).max().unwrap_or(0);

    let _ = writeln!(
        out,
        "── Tick {} | janela {} | limite {:.1}°C ──",
        report.tick, window_size, threshold
    );

    if snapshot.is_empty() {
        let _ = writeln!(out, "  (nenhum sensor reportou ainda)");
    }

    for (name, values) in snapshot {
        let _ = writeln!(
            out,
            "  {name:<name_width$}  {spark:<width$}  atual {latest:>8}  média {mean:>8}",
            spark = sparkline(values, SPARK_WIDTH),
            width = SPARK_WIDTH,
            latest = format_temp(values.last().copied()),
            mean = format_temp(window_mean(values)),
        );
    }

    let stats = &report.statistics;
    let indicator = match alert {
        Some(alert) => format!("⚠ {alert}"),
        None => "● NOMINAL".into(),
    };
    let _ = writeln!(
        out,
        "  Média acumulada {} | Pico {} | Amostras {} | {}",
        format_temp(stats.mean()),
        format_temp(stats.peak),
        stats.count,
        indicator
    );

    out
}

/// Monta o painel com o estado atual do motor.
pub fn render(engine: &TemperatureEngine, report: &TickReport) -> String {
    render_snapshot(
        &engine.snapshot(),
        report,
        engine.window_size(),
        engine.threshold(),
        engine.current_alert(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermal_core::{AlertState, Sample};

    #[test]
    fn format_temp_handles_missing() {
        assert_eq!(format_temp(Some(55.04)), "55.0°C");
        assert_eq!(format_temp(None), "--");
    }

    #[test]
    fn sparkline_scales_min_to_max() {
        assert_eq!(sparkline(&[10.0, 20.0, 30.0], 10), "▁▅█");
        assert_eq!(sparkline(&[42.0, 42.0], 10), "▅▅");
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn sparkline_keeps_last_points() {
        let values: Vec<f64> = (0..50).map(f64::from).collect();
        let line = sparkline(&values, 5);
        assert_eq!(line.chars().count(), 5);
        assert!(line.ends_with('█'));
        assert!(line.starts_with('▁'));
    }

    #[test]
    fn sparkline_blanks_nan() {
        assert_eq!(sparkline(&[1.0, f64::NAN, 2.0], 10), "▁ █");
    }

    #[test]
    fn render_shows_sources_and_alert() {
        let engine = TemperatureEngine::new(60, 80.0).unwrap();
        engine.tick(vec![Sample::new("CPU/Package", 50.0), Sample::new("GPU/Core", 60.0)]);
        let report = engine.tick(vec![Sample::new("CPU/Package", 90.0)]);
        assert_eq!(report.state, AlertState::Exceeded);

        let text = render(&engine, &report);
        assert!(text.contains("Tick 2"));
        assert!(text.contains("CPU/Package"));
        assert!(text.contains("GPU/Core"));
        assert!(text.contains("atual   90.0°C"));
        assert!(text.contains("Pico 90.0°C"));
        assert!(text.contains("Amostras 3"));
        assert!(text.contains("⚠ Pico 90.0°C acima do limite de 80.0°C"));
    }

    #[test]
    fn render_empty_engine() {
        let engine = TemperatureEngine::new(60, 80.0).unwrap();
        let report = engine.tick(Vec::new());
        let text = render(&engine, &report);
        assert!(text.contains("nenhum sensor"));
        assert!(text.contains("Média acumulada --"));
        assert!(text.contains("● NOMINAL"));
    }
}
