//! Temperatura de GPUs NVIDIA via NVML (nvidia-ml).
//!
//! Carrega `nvml.dll` dinamicamente — funciona com qualquer driver NVIDIA.
//! Sem GPU NVIDIA? `try_new()` retorna `None` e o módulo é desativado.

use nvml_wrapper::enum_wrappers::device::TemperatureSensor;
use nvml_wrapper::Nvml;
use tracing::{debug, info};

/// Monitor de GPU NVIDIA via NVML.
pub struct NvmlMonitor {
    nvml: Nvml,
    device_count: u32,
}

impl NvmlMonitor {
    /// Tenta inicializar NVML. Retorna `None` se não houver GPU NVIDIA.
    pub fn try_new() -> Option<Self> {
        match Nvml::init() {
            Ok(nvml) => {
                let count = nvml.device_count().unwrap_or(0);
                if count > 0 {
                    info!("✓ NVML: {count} GPU(s) NVIDIA");
                    Some(Self {
                        nvml,
                        device_count: count,
                    })
                } else {
                    debug!("NVML init OK mas nenhuma GPU encontrada");
                    None
                }
            }
            Err(e) => {
                debug!("NVML não disponível: {e}");
                None
            }
        }
    }

    /// Temperatura do core de cada GPU: `(nome, °C)`.
    pub fn query_temperatures(&self) -> Vec<(String, f64)> {
        let mut temps = Vec::new();

        for index in 0..self.device_count {
            let Ok(device) = self.nvml.device_by_index(index) else {
                continue;
            };
            let name = device
                .name()
                .unwrap_or_else(|_| format!("NVIDIA #{index}"));
            match device.temperature(TemperatureSensor::Gpu) {
                Ok(temp) => temps.push((name, f64::from(temp))),
                Err(e) => debug!("NVML: falha ao ler {name}: {e}"),
            }
        }

        temps
    }
}
