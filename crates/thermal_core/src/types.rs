//! Tipos compartilhados entre o agregador, o avaliador de alertas e os
//! colaboradores externos (fonte de sensores e apresentação).

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Amostra
// ──────────────────────────────────────────────

/// Uma leitura de um sensor num instante (um tick).
///
/// Efêmera: existe só até ser entregue a [`Aggregator::ingest`](crate::Aggregator::ingest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Nome da fonte (ex: "CPU/Package id 0")
    pub source_name: String,
    /// Valor lido (°C). NaN e negativos são aceitos como vieram.
    pub value: f64,
}

impl Sample {
    pub fn new(source_name: impl Into<String>, value: f64) -> Self {
        Self {
            source_name: source_name.into(),
            value,
        }
    }
}

// ──────────────────────────────────────────────
// Estatísticas acumuladas
// ──────────────────────────────────────────────

/// Estatísticas globais (todas as fontes juntas), acumuladas desde o início.
///
/// `sum` e `count` nunca diminuem: a poda da janela não os afeta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStatistics {
    pub sum: f64,
    pub count: u64,
    /// Maior valor já ingerido (`None` antes da primeira amostra)
    pub peak: Option<f64>,
}

impl RunningStatistics {
    /// Registra um valor.
    pub fn record(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.peak = Some(match self.peak {
            Some(peak) => peak.max(value),
            None => value,
        });
    }

    /// Média acumulada. `None` se nenhuma amostra foi ingerida.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

// ──────────────────────────────────────────────
// Estado de alerta
// ──────────────────────────────────────────────

/// Resultado da avaliação do threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertState {
    #[default]
    Nominal,
    Exceeded,
}

impl AlertState {
    pub fn is_exceeded(self) -> bool {
        self == AlertState::Exceeded
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
