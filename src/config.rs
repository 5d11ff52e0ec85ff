//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./mini_http --directory /tmp/files --port 4221 --framing framed
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 DATA_DIR=/srv/files LOG_LEVEL=debug ./mini_http
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::server::wire::DEFAULT_BUFFER_SIZE;

/// Estrategia para leer el request del socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Framing {
    /// Un solo read sobre un buffer fijo
    Single,

    /// Lee hasta el final de los headers y luego Content-Length bytes
    Framed,
}

/// Configuración del servidor HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "mini_http")]
#[command(about = "Servidor HTTP/1.1 mínimo: echo, user-agent y archivos")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio que sirven las rutas /files/
    #[arg(long, default_value = "./data", env = "DATA_DIR")]
    pub directory: PathBuf,

    /// Cómo se lee el request del socket
    #[arg(long, value_enum, default_value = "single", env = "FRAMING")]
    pub framing: Framing,

    /// Bytes máximos de un request (capacidad del buffer de lectura)
    #[arg(long = "read-buffer", default_value = "4096", env = "READ_BUFFER")]
    pub read_buffer: usize,

    /// Conexiones simultáneas máximas (0 = sin límite)
    #[arg(long = "max-connections", default_value = "0", env = "MAX_CONNECTIONS")]
    pub max_connections: usize,

    /// Nivel de log (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL", value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Archivo de log; si no se indica se loguea a stderr
    #[arg(long = "log-file", env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("invalid log level: {}", s))
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use mini_http::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.read_buffer == 0 {
            return Err("Read buffer must be >= 1 byte".to_string());
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "Directory does not exist: {}",
                self.directory.display()
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 4221,
            host: "0.0.0.0".to_string(),
            directory: PathBuf::from("./data"),
            framing: Framing::Single,
            read_buffer: DEFAULT_BUFFER_SIZE,
            max_connections: 0,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}
