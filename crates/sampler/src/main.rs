//! # Thermal Sampler
//!
//! Lê os sensores de temperatura em intervalo fixo, alimenta o motor de
//! agregação e mostra séries, estatísticas e alerta num painel de texto.
//! Leitura de alguns sensores térmicos exige privilégios de administrador.
//!
//! ## Uso
//! ```bash
//! thermal_sampler                       # config.toml ao lado do executável
//! thermal_sampler --config ./dev.toml   # config explícito
//! thermal_sampler --once                # um único tick e sai
//! ```
//!
//! Durante a execução, digite um número + Enter para alterar o threshold,
//! ou `q` para sair.

mod input;
mod panel;
mod sensors;
#[cfg(windows)]
pub(crate) mod nvml_gpu;

use crossbeam_channel::{Receiver, TryRecvError};
use input::Command;
use sensors::HardwareSampler;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use thermal_core::config::AppConfig;
use thermal_core::TemperatureEngine;
use tracing::{debug, error, info, warn};

/// Argumentos de linha de comando.
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    once: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--once" => parsed.once = true,
            "--config" => {
                let path = iter.next().ok_or("--config exige um caminho")?;
                parsed.config = Some(PathBuf::from(path));
            }
            other => return Err(format!("Argumento desconhecido: {other}")),
        }
    }
    Ok(parsed)
}

fn main() -> ExitCode {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // ── Carregar config ──
    let config_path = args.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("Config inválida: {e}");
        }
        return ExitCode::FAILURE;
    }

    // ── Motor ──
    let engine = match config.engine.build() {
        Ok(engine) => engine,
        Err(e) => {
            error!("Falha ao criar o motor: {e}");
            return ExitCode::FAILURE;
        }
    };

    // ── Sensores ──
    let mut sampler = HardwareSampler::new(config.sampler.clone());
    let interval = Duration::from_secs_f64(config.sampler.interval_secs);

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   🌡 THERMAL SAMPLER – ATIVO");
    println!("══════════════════════════════════════════════");
    println!("  Intervalo: {:.1}s", config.sampler.interval_secs);
    println!("  Janela:    {} amostras", config.engine.window_size);
    println!("  Limite:    {:.1}°C", config.engine.threshold);
    println!("══════════════════════════════════════════════");
    println!();

    if args.once {
        let report = engine.tick(sampler.poll());
        print!("{}", panel::render(&engine, &report));
        return ExitCode::SUCCESS;
    }

    let commands = match input::spawn_input_thread() {
        Ok(rx) => {
            println!("  Digite um número + Enter para mudar o limite, 'q' para sair.");
            Some(rx)
        }
        Err(e) => {
            warn!("Entrada do usuário indisponível: {e}");
            None
        }
    };

    run(&engine, &mut sampler, interval, commands.as_ref());
    info!("Encerrado após {} ticks", engine.tick_count());
    ExitCode::SUCCESS
}

/// Loop principal: um tick por intervalo até o usuário pedir para sair.
fn run(
    engine: &TemperatureEngine,
    sampler: &mut HardwareSampler,
    interval: Duration,
    commands: Option<&Receiver<Command>>,
) {
    loop {
        let cycle_start = Instant::now();

        // Comandos pendentes entram antes do tick
        if let Some(rx) = commands {
            loop {
                match rx.try_recv() {
                    Ok(Command::SetThreshold(value)) => engine.set_threshold(value),
                    Ok(Command::Quit) => return,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        debug!("Entrada fechada, seguindo sem comandos");
                        break;
                    }
                }
            }
        }

        let batch = sampler.poll();
        if batch.is_empty() {
            debug!("Nenhuma leitura neste tick");
        }
        let report = engine.tick(batch);
        print!("{}", panel::render(engine, &report));

        // Dormir pelo tempo restante do intervalo
        let elapsed = cycle_start.elapsed();
        if elapsed < interval {
            std::thread::sleep(interval - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_args_uses_defaults() {
        let parsed = args(&[]).unwrap();
        assert!(parsed.config.is_none());
        assert!(!parsed.once);
    }

    #[test]
    fn config_and_once() {
        let parsed = args(&["--config", "dev.toml", "--once"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("dev.toml")));
        assert!(parsed.once);
    }

    #[test]
    fn config_without_path_fails() {
        assert!(args(&["--config"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }
}
