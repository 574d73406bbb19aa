//! Agregador – séries limitadas por fonte e estatísticas acumuladas.
//!
//! Cada chamada a [`Aggregator::ingest`] é um passo de tempo para todas as
//! fontes. A poda ([`Aggregator::prune`]) remove no máximo um ponto do início
//! de cada série por chamada, enquanto houver mais ticks que `window_size`.

use crate::config::ConfigError;
use crate::types::{RunningStatistics, Sample};
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

/// Séries por fonte + estatísticas globais.
#[derive(Debug, Clone)]
pub struct Aggregator {
    window_size: usize,
    series: BTreeMap<String, VecDeque<f64>>,
    stats: RunningStatistics,
    /// Ticks ainda não compensados pela poda
    ticks_in_window: usize,
    /// Total de ticks desde a criação
    total_ticks: u64,
}

impl Aggregator {
    /// Cria um agregador vazio. `window_size` deve ser > 0.
    pub fn new(window_size: usize) -> Result<Self, ConfigError> {
        if window_size == 0 {
            return Err(ConfigError::InvalidWindowSize(window_size));
        }
        Ok(Self {
            window_size,
            series: BTreeMap::new(),
            stats: RunningStatistics::default(),
            ticks_in_window: 0,
            total_ticks: 0,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Registra o lote de um tick.
    pub fn ingest<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = Sample>,
    {
        for Sample { source_name, value } in samples {
            if !self.series.contains_key(&source_name) {
                debug!("Nova fonte registrada: {source_name}");
            }
            self.series
                .entry(source_name)
                .or_default()
                .push_back(value);
            self.stats.record(value);
        }

        self.ticks_in_window += 1;
        self.total_ticks += 1;
    }

    /// Remove o ponto mais antigo de cada série enquanto a janela estiver
    /// acima da capacidade. Um ponto por série por chamada.
    pub fn prune(&mut self) {
        if self.ticks_in_window <= self.window_size {
            return;
        }
        self.ticks_in_window -= 1;

        let mut evicted = 0usize;
        for series in self.series.values_mut() {
            if series.pop_front().is_some() {
                evicted += 1;
            }
        }
        debug!("Poda: {evicted} séries reduzidas (tick {})", self.total_ticks);
    }

    /// Cópia de todas as séries, da mais antiga para a mais recente.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<f64>> {
        self.series
            .iter()
            .map(|(name, values)| (name.clone(), values.iter().copied().collect()))
            .collect()
    }

    pub fn statistics(&self) -> RunningStatistics {
        self.stats
    }

    /// Série de uma fonte, se já vista.
    pub fn series(&self, source_name: &str) -> Option<&VecDeque<f64>> {
        self.series.get(source_name)
    }

    /// Último valor presente na janela de uma fonte.
    pub fn latest(&self, source_name: &str) -> Option<f64> {
        self.series.get(source_name)?.back().copied()
    }

    /// Média dos valores visíveis na janela de uma fonte.
    ///
    /// Diferente de [`RunningStatistics::mean`], acompanha a poda.
    pub fn window_mean(&self, source_name: &str) -> Option<f64> {
        let series = self.series.get(source_name)?;
        if series.is_empty() {
            return None;
        }
        Some(series.iter().sum::<f64>() / series.len() as f64)
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Ticks desde a criação (não é afetado pela poda).
    pub fn tick_count(&self) -> u64 {
        self.total_ticks
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
