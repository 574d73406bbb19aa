//! Sistema de alertas – threshold configurável e avaliação do pico.

use crate::config::DEFAULT_THRESHOLD;
use crate::types::{AlertState, RunningStatistics};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Um alerta disparado, para o indicador de aviso da apresentação.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alert {
    pub peak: f64,
    pub threshold: f64,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pico {:.1}°C acima do limite de {:.1}°C",
            self.peak, self.threshold
        )
    }
}

/// Avaliador de threshold.
///
/// O threshold fica numa célula atômica (bits do `f64`), então
/// [`set_threshold`](Self::set_threshold) pode vir de outra thread sem
/// disputar com [`evaluate`](Self::evaluate).
#[derive(Debug)]
pub struct AlertEvaluator {
    threshold_bits: AtomicU64,
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl AlertEvaluator {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold_bits: AtomicU64::new(threshold.to_bits()),
        }
    }

    pub fn threshold(&self) -> f64 {
        f64::from_bits(self.threshold_bits.load(Ordering::Acquire))
    }

    /// Substitui o threshold. Sem validação de faixa: zero, negativo ou
    /// muito alto são aceitos.
    pub fn set_threshold(&self, value: f64) {
        self.threshold_bits.store(value.to_bits(), Ordering::Release);
    }

    /// `Exceeded` se o pico acumulado passou do threshold.
    pub fn evaluate(&self, stats: &RunningStatistics) -> AlertState {
        match self.check(stats) {
            Some(_) => AlertState::Exceeded,
            None => AlertState::Nominal,
        }
    }

    /// Como [`evaluate`](Self::evaluate), mas devolve os valores envolvidos.
    pub fn check(&self, stats: &RunningStatistics) -> Option<Alert> {
        let threshold = self.threshold();
        let peak = stats.peak?;
        (threshold < peak).then_some(Alert { peak, threshold })
    }
}
