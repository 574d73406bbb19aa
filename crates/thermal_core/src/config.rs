//! Configuração unificada via TOML.
//!
//! Um único `config.toml` cobre o motor de agregação (`[engine]`) e o
//! amostrador de sensores (`[sampler]`).

use crate::engine::TemperatureEngine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Tamanho padrão da janela (amostras por fonte).
pub const DEFAULT_WINDOW_SIZE: usize = 60;

/// Threshold padrão de alerta (°C).
pub const DEFAULT_THRESHOLD: f64 = 80.0;

/// Erros de configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Tamanho de janela inválido: {0} (deve ser > 0)")]
    InvalidWindowSize(usize),

    #[error("Erro de E/S em {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Erro ao parsear TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuração do motor de agregação.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Máximo de amostras mantidas por fonte
    pub window_size: usize,
    /// Threshold inicial de alerta (°C)
    pub threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Constrói o motor a partir desta configuração.
    pub fn build(&self) -> Result<TemperatureEngine, ConfigError> {
        TemperatureEngine::new(self.window_size, self.threshold)
    }
}

/// Configuração do amostrador (colaborador de sensores + agendamento).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Intervalo entre ticks em segundos
    pub interval_secs: f64,
    /// Incluir sensores de CPU
    pub include_cpu: bool,
    /// Incluir sensores de GPU
    pub include_gpu: bool,
    /// Incluir demais sensores térmicos (placa-mãe, discos…)
    pub include_other: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1.0,
            include_cpu: true,
            include_gpu: true,
            include_other: false,
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub sampler: SamplerConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    ///
    /// Arquivo ausente ou inválido resulta na configuração padrão.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match Self::try_load(path) {
                Ok(config) => {
                    info!("Configuração carregada de {}", path.display());
                    return config;
                }
                Err(e) => warn!("{e}"),
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Como [`load`](Self::load), mas propaga o erro.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml (ao lado do executável).
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.engine.window_size == 0 {
            errors.push(ConfigError::InvalidWindowSize(0).to_string());
        }
        if !self.engine.threshold.is_finite() {
            errors.push(format!(
                "Threshold não finito: {}",
                self.engine.threshold
            ));
        }
        if !(0.1..=60.0).contains(&self.sampler.interval_secs) {
            errors.push(format!(
                "Intervalo do sampler inválido: {} (0.1–60.0)",
                self.sampler.interval_secs
            ));
        }
        if !self.sampler.include_cpu && !self.sampler.include_gpu && !self.sampler.include_other {
            errors.push("Nenhum grupo de sensores habilitado".into());
        }

        errors
    }
}
