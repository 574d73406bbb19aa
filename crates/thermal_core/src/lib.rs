//! # Thermal Core
//!
//! Motor de agregação da telemetria térmica: séries limitadas por sensor,
//! estatísticas acumuladas (média, pico) e alerta por threshold.
//!
//! ## Módulos
//! - [`types`] – Amostra, estatísticas acumuladas e estado de alerta
//! - [`aggregator`] – Séries por fonte com janela de tamanho fixo
//! - [`alerts`] – Threshold e avaliação do pico
//! - [`engine`] – Tick completo (ingest → prune → evaluate), seguro entre threads
//! - [`config`] – Configuração unificada via TOML

pub mod types;
pub mod aggregator;
pub mod alerts;
pub mod engine;
pub mod config;

// Re-exports convenientes
pub use types::{AlertState, RunningStatistics, Sample};
pub use aggregator::Aggregator;
pub use alerts::{Alert, AlertEvaluator};
pub use engine::{TemperatureEngine, TickReport};
pub use config::{AppConfig, ConfigError, EngineConfig, SamplerConfig};
