//! Fonte de sensores – lê as temperaturas do hardware a cada tick.
//!
//! **Base (todas as plataformas):** `sysinfo::Components`, rótulos do kernel
//! (hwmon/coretemp/k10temp) ou do SMC.
//!
//! **NVML (Windows):** temperatura de GPUs NVIDIA quando nenhum componente de
//! GPU aparece no `sysinfo`.

use std::collections::HashMap;
use sysinfo::Components;
use thermal_core::config::SamplerConfig;
use thermal_core::Sample;
use tracing::{debug, info, warn};

#[cfg(windows)]
use crate::nvml_gpu::NvmlMonitor;

/// Limite acima do qual a leitura é considerada lixo do sensor (°C).
const MAX_PLAUSIBLE_TEMP: f32 = 150.0;

/// Grupo de hardware de um sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorGroup {
    Cpu,
    Gpu,
    Other,
}

impl SensorGroup {
    /// Classifica um sensor pelo rótulo.
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        if ["gpu", "amdgpu", "nouveau", "radeon", "nvidia", "edge", "junction"]
            .iter()
            .any(|k| label.contains(k))
        {
            SensorGroup::Gpu
        } else if ["cpu", "tctl", "tdie", "package", "core", "coretemp", "k10temp"]
            .iter()
            .any(|k| label.contains(k))
        {
            SensorGroup::Cpu
        } else {
            SensorGroup::Other
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            SensorGroup::Cpu => "CPU",
            SensorGroup::Gpu => "GPU",
            SensorGroup::Other => "SYS",
        }
    }

    fn enabled(self, config: &SamplerConfig) -> bool {
        match self {
            SensorGroup::Cpu => config.include_cpu,
            SensorGroup::Gpu => config.include_gpu,
            SensorGroup::Other => config.include_other,
        }
    }
}

/// Monta o nome da fonte: `"<GRUPO>/<rótulo>"`.
pub fn source_name(group: SensorGroup, label: &str) -> String {
    format!("{}/{}", group.prefix(), label.trim())
}

/// Converte leituras brutas `(rótulo, °C)` no lote de um tick.
///
/// Descarta grupos desabilitados e leituras implausíveis; rótulos repetidos
/// recebem sufixo `#2`, `#3`…
pub fn build_batch<'a, I>(readings: I, config: &SamplerConfig) -> Vec<Sample>
where
    I: IntoIterator<Item = (&'a str, Option<f32>)>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut batch = Vec::new();

    for (label, temp) in readings {
        let group = SensorGroup::classify(label);
        if !group.enabled(config) {
            continue;
        }
        let Some(temp) = temp else {
            continue;
        };
        if !temp.is_finite() || temp <= 0.0 || temp >= MAX_PLAUSIBLE_TEMP {
            debug!("Leitura descartada: {label} = {temp}");
            continue;
        }

        let base = source_name(group, label);
        let n = seen.entry(base.clone()).or_insert(0);
        *n += 1;
        let name = if *n == 1 { base } else { format!("{base} #{n}") };

        batch.push(Sample::new(name, f64::from(temp)));
    }

    batch
}

/// Amostrador de sensores térmicos.
pub struct HardwareSampler {
    components: Components,
    config: SamplerConfig,
    #[cfg(windows)]
    nvml: Option<NvmlMonitor>,
}

impl HardwareSampler {
    /// Cria o amostrador e detecta os sensores disponíveis.
    pub fn new(config: SamplerConfig) -> Self {
        let components = Components::new_with_refreshed_list();

        if components.is_empty() {
            warn!("✗ Nenhum sensor térmico acessível (pode exigir privilégios de administrador)");
        } else {
            info!("✓ {} sensores térmicos detectados", components.len());
            for comp in components.iter() {
                debug!(
                    "  {} → {}",
                    comp.label(),
                    SensorGroup::classify(comp.label()).prefix()
                );
            }
        }

        Self {
            components,
            config,
            #[cfg(windows)]
            nvml: NvmlMonitor::try_new(),
        }
    }

    /// Atualiza os sensores e retorna o lote do tick.
    pub fn poll(&mut self) -> Vec<Sample> {
        self.components.refresh(true);

        #[allow(unused_mut)]
        let mut batch = build_batch(
            self.components
                .iter()
                .map(|comp| (comp.label(), comp.temperature())),
            &self.config,
        );

        #[cfg(windows)]
        self.enrich_gpu(&mut batch);

        batch
    }

    // NVML só entra se o sysinfo não trouxe nenhuma GPU.
    #[cfg(windows)]
    fn enrich_gpu(&self, batch: &mut Vec<Sample>) {
        if !self.config.include_gpu {
            return;
        }
        let has_gpu = batch
            .iter()
            .any(|s| s.source_name.starts_with(SensorGroup::Gpu.prefix()));
        if has_gpu {
            return;
        }
        if let Some(ref nvml) = self.nvml {
            for (name, temp) in nvml.query_temperatures() {
                batch.push(Sample::new(source_name(SensorGroup::Gpu, &name), temp));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_common_labels() {
        assert_eq!(SensorGroup::classify("coretemp Package id 0"), SensorGroup::Cpu);
        assert_eq!(SensorGroup::classify("k10temp Tctl"), SensorGroup::Cpu);
        assert_eq!(SensorGroup::classify("CPU Core #1"), SensorGroup::Cpu);
        assert_eq!(SensorGroup::classify("amdgpu edge"), SensorGroup::Gpu);
        assert_eq!(SensorGroup::classify("GPU Core"), SensorGroup::Gpu);
        assert_eq!(SensorGroup::classify("nvme Composite"), SensorGroup::Other);
        assert_eq!(SensorGroup::classify("acpitz temp1"), SensorGroup::Other);
    }

    #[test]
    fn batch_respects_group_filters() {
        let config = SamplerConfig::default();
        let batch = build_batch(
            [
                ("coretemp Package id 0", Some(55.0)),
                ("amdgpu edge", Some(61.0)),
                ("nvme Composite", Some(40.0)),
            ],
            &config,
        );
        let names: Vec<_> = batch.iter().map(|s| s.source_name.as_str()).collect();
        assert_eq!(names, vec!["CPU/coretemp Package id 0", "GPU/amdgpu edge"]);
        assert_eq!(batch[0].value, 55.0);
    }

    #[test]
    fn batch_skips_missing_and_implausible_readings() {
        let config = SamplerConfig::default();
        let batch = build_batch(
            [
                ("CPU Core #1", None),
                ("CPU Core #2", Some(f32::NAN)),
                ("CPU Core #3", Some(0.0)),
                ("CPU Core #4", Some(200.0)),
                ("CPU Core #5", Some(48.5)),
            ],
            &config,
        );
        assert_eq!(batch, vec![Sample::new("CPU/CPU Core #5", 48.5)]);
    }

    #[test]
    fn duplicate_labels_get_suffix() {
        let config = SamplerConfig {
            include_other: true,
            ..Default::default()
        };
        let batch = build_batch(
            [
                ("nvme Composite", Some(38.0)),
                ("nvme Composite", Some(41.0)),
            ],
            &config,
        );
        let names: Vec<_> = batch.iter().map(|s| s.source_name.as_str()).collect();
        assert_eq!(names, vec!["SYS/nvme Composite", "SYS/nvme Composite #2"]);
    }
}
