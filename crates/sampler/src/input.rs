//! Thread de entrada que lê comandos do stdin e envia para o loop via channel.
//!
//! Um número altera o threshold; `q`/`quit` encerra.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::io::BufRead;
use tracing::{debug, warn};

/// Comando vindo do usuário.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetThreshold(f64),
    Quit,
}

/// Interpreta uma linha digitada. Linhas vazias ou inválidas retornam `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.to_lowercase().as_str() {
        "q" | "quit" | "sair" => return Some(Command::Quit),
        _ => {}
    }
    // Aceita vírgula decimal ("72,5")
    let normalized = line.trim_end_matches("°C").trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Command::SetThreshold)
}

/// Inicia a thread de entrada. Retorna o receiver do channel.
pub fn spawn_input_thread() -> std::io::Result<Receiver<Command>> {
    let (tx, rx) = bounded::<Command>(16);

    std::thread::Builder::new()
        .name("stdin-input".into())
        .spawn(move || input_loop(&tx, std::io::stdin().lock()))?;

    Ok(rx)
}

fn input_loop<R: BufRead>(tx: &Sender<Command>, reader: R) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Erro ao ler stdin: {e}");
                break;
            }
        };
        match parse_command(&line) {
            Some(cmd) => {
                let quit = cmd == Command::Quit;
                if tx.send(cmd).is_err() || quit {
                    break;
                }
            }
            None if line.trim().is_empty() => {}
            None => warn!("Entrada inválida: {:?} (digite um número ou 'q')", line.trim()),
        }
    }
    debug!("Thread de entrada encerrada");
}
