//! Motor de temperatura – um tick = ingest → prune → evaluate.
//!
//! O motor não tem timer: quem decide *quando* chamar [`TemperatureEngine::tick`]
//! é o agendador externo. Ele pode ser compartilhado via `Arc` entre a thread
//! de ticks, a de apresentação e a de entrada do usuário.

use crate::aggregator::Aggregator;
use crate::alerts::{Alert, AlertEvaluator};
use crate::config::ConfigError;
use crate::types::{AlertState, RunningStatistics, Sample};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

/// Resultado de um tick, para quem agenda e para a apresentação.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Número do tick (1 = primeiro)
    pub tick: u64,
    pub state: AlertState,
    pub statistics: RunningStatistics,
}

#[derive(Debug)]
struct TickState {
    aggregator: Aggregator,
    last_state: AlertState,
}

/// Agregador + avaliador de alertas atrás de uma interface `&self`.
#[derive(Debug)]
pub struct TemperatureEngine {
    state: RwLock<TickState>,
    alerts: AlertEvaluator,
}

impl TemperatureEngine {
    pub fn new(window_size: usize, threshold: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            state: RwLock::new(TickState {
                aggregator: Aggregator::new(window_size)?,
                last_state: AlertState::Nominal,
            }),
            alerts: AlertEvaluator::new(threshold),
        })
    }

    // Nenhuma operação deixa o estado inconsistente no meio, então um lock
    // envenenado ainda é utilizável.
    fn read(&self) -> RwLockReadGuard<'_, TickState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TickState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Processa o lote de um tick.
    pub fn tick<I>(&self, samples: I) -> TickReport
    where
        I: IntoIterator<Item = Sample>,
    {
        let mut guard = self.write();
        let TickState {
            aggregator,
            last_state,
        } = &mut *guard;

        aggregator.ingest(samples);
        aggregator.prune();

        let statistics = aggregator.statistics();
        let alert = self.alerts.check(&statistics);
        let state = if alert.is_some() {
            AlertState::Exceeded
        } else {
            AlertState::Nominal
        };

        match (*last_state, alert) {
            (AlertState::Nominal, Some(alert)) => warn!("⚠ ALERTA: {alert}"),
            (AlertState::Exceeded, None) => info!(
                "Alerta normalizado (limite {:.1}°C)",
                self.alerts.threshold()
            ),
            _ => {}
        }
        *last_state = state;

        TickReport {
            tick: aggregator.tick_count(),
            state,
            statistics,
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, Vec<f64>> {
        self.read().aggregator.snapshot()
    }

    pub fn statistics(&self) -> RunningStatistics {
        self.read().aggregator.statistics()
    }

    /// Estado de alerta para as estatísticas atuais.
    pub fn evaluate(&self) -> AlertState {
        self.alerts.evaluate(&self.statistics())
    }

    pub fn current_alert(&self) -> Option<Alert> {
        self.alerts.check(&self.statistics())
    }

    pub fn set_threshold(&self, value: f64) {
        self.alerts.set_threshold(value);
        info!("Threshold alterado para {value:.1}°C");
    }

    pub fn threshold(&self) -> f64 {
        self.alerts.threshold()
    }

    pub fn window_size(&self) -> usize {
        self.read().aggregator.window_size()
    }

    pub fn latest(&self, source_name: &str) -> Option<f64> {
        self.read().aggregator.latest(source_name)
    }

    pub fn window_mean(&self, source_name: &str) -> Option<f64> {
        self.read().aggregator.window_mean(source_name)
    }

    pub fn source_names(&self) -> Vec<String> {
        self.read()
            .aggregator
            .source_names()
            .map(str::to_owned)
            .collect()
    }

    pub fn tick_count(&self) -> u64 {
        self.read().aggregator.tick_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn one(name: &str, value: f64) -> Vec<Sample> {
        vec![Sample::new(name, value)]
    }

    #[test]
    fn rejects_zero_window() {
        assert!(TemperatureEngine::new(0, 80.0).is_err());
    }

    #[test]
    fn first_tick_report() {
        let engine = TemperatureEngine::new(60, 80.0).unwrap();
        let report = engine.tick(one("CPU", 50.0));
        assert_eq!(report.tick, 1);
        assert_eq!(report.state, AlertState::Nominal);
        assert_eq!(report.statistics.count, 1);
        assert_eq!(engine.snapshot()["CPU"], vec![50.0]);
    }

    #[test]
    fn alert_is_raised_and_stays_while_peak_holds() {
        let engine = TemperatureEngine::new(60, 80.0).unwrap();
        assert_eq!(engine.tick(one("CPU", 50.0)).state, AlertState::Nominal);
        assert_eq!(engine.tick(one("CPU", 90.0)).state, AlertState::Exceeded);
        // Pico é cumulativo: continua excedido mesmo com leitura baixa
        assert_eq!(engine.tick(one("CPU", 40.0)).state, AlertState::Exceeded);
        assert_eq!(engine.evaluate(), AlertState::Exceeded);
        assert_eq!(engine.current_alert().map(|a| a.peak), Some(90.0));
    }

    #[test]
    fn raising_threshold_clears_alert() {
        let engine = TemperatureEngine::new(60, 80.0).unwrap();
        engine.tick(one("GPU", 85.0));
        assert_eq!(engine.evaluate(), AlertState::Exceeded);
        engine.set_threshold(95.0);
        assert_eq!(engine.threshold(), 95.0);
        assert_eq!(engine.tick(one("GPU", 70.0)).state, AlertState::Nominal);
    }

    #[test]
    fn no_ticks_means_nominal() {
        let engine = TemperatureEngine::new(60, -1.0).unwrap();
        assert_eq!(engine.statistics().count, 0);
        assert_eq!(engine.evaluate(), AlertState::Nominal);
        assert_eq!(engine.tick_count(), 0);
        assert!(engine.snapshot().is_empty());
    }

    #[test]
    fn empty_batch_still_advances_time() {
        let engine = TemperatureEngine::new(2, 80.0).unwrap();
        engine.tick(one("CPU", 1.0));
        engine.tick(one("CPU", 2.0));
        let report = engine.tick(Vec::new());
        assert_eq!(report.tick, 3);
        assert_eq!(engine.snapshot()["CPU"], vec![2.0]);
    }

    #[test]
    fn accessors_expose_window_state() {
        let engine = TemperatureEngine::new(3, 80.0).unwrap();
        for v in [10.0, 20.0, 30.0, 40.0] {
            engine.tick(vec![Sample::new("CPU", v), Sample::new("GPU", v + 1.0)]);
        }
        assert_eq!(engine.window_size(), 3);
        assert_eq!(engine.latest("CPU"), Some(40.0));
        assert_eq!(engine.window_mean("CPU"), Some(30.0));
        assert_eq!(engine.source_names(), vec!["CPU".to_string(), "GPU".to_string()]);
    }

    #[test]
    fn threshold_can_change_from_another_thread() {
        let engine = Arc::new(TemperatureEngine::new(60, 80.0).unwrap());
        engine.tick(one("CPU", 70.0));

        let writer = Arc::clone(&engine);
        std::thread::spawn(move || writer.set_threshold(60.0))
            .join()
            .unwrap();

        assert_eq!(engine.evaluate(), AlertState::Exceeded);
    }

    #[test]
    fn concurrent_readers_see_bounded_series() {
        let engine = Arc::new(TemperatureEngine::new(5, 80.0).unwrap());
        let reader = {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    for (_, series) in engine.snapshot() {
                        assert!(series.len() <= 5);
                    }
                }
            })
        };
        for i in 0..200 {
            engine.tick(one("CPU", i as f64));
        }
        reader.join().unwrap();
        assert_eq!(engine.statistics().count, 200);
    }
}
