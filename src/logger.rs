//! # Logging
//! src/logger.rs
//!
//! Instala el logger global: a stderr por defecto, o a un archivo si
//! se configuró `--log-file`.

use std::fs::OpenOptions;

use log::debug;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};

use crate::config::Config;
use crate::error::ServerError;

/// Inicializa el logger según la configuración
pub fn init_logger(cfg: &Config) -> Result<(), ServerError> {
    let (logger_config, local_offset) = prepare_logger_config();

    match &cfg.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(ServerError::LogFile)?;
            WriteLogger::init(cfg.log_level, logger_config, file)?;
        }
        None => {
            TermLogger::init(
                cfg.log_level,
                logger_config,
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )?;
        }
    }

    if !local_offset {
        debug!("No se pudo determinar el offset local, timestamps en UTC");
    }

    Ok(())
}

/// Config de simplelog y si los timestamps quedaron en hora local
fn prepare_logger_config() -> (simplelog::Config, bool) {
    let mut builder = ConfigBuilder::new();
    builder.set_time_format_custom(simplelog::format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
    ));
    let local_offset = builder.set_time_offset_to_local().is_ok();
    (builder.build(), local_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{error, LevelFilter};
    use tempfile::TempDir;

    #[test]
    fn test_prepare_logger_config() {
        // Debe construirse aunque el offset local no esté disponible
        let (_config, _local_offset) = prepare_logger_config();
    }

    #[test]
    fn test_log_file_in_missing_directory() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            log_file: Some(dir.path().join("no-such-dir").join("server.log")),
            ..Config::default()
        };

        assert!(matches!(init_logger(&cfg), Err(ServerError::LogFile(_))));
    }

    #[test]
    fn test_file_logger_writes_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("server.log");
        let cfg = Config {
            log_file: Some(path.clone()),
            log_level: LevelFilter::Info,
            ..Config::default()
        };

        init_logger(&cfg).unwrap();
        error!("registro de prueba en archivo");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("registro de prueba en archivo"));
    }
}
