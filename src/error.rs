//! # Errores del Servidor
//! src/error.rs
//!
//! Errores que impiden arrancar o mantener el servidor. Los errores de una
//! conexión individual no llegan aquí: se loguean y solo afectan esa conexión.

use std::io;

use thiserror::Error;

/// Errores fatales del proceso
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuración inválida (ver `Config::validate`)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No se pudo abrir el socket de escucha
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// `serve` se llamó antes de `bind`
    #[error("server is not bound to an address")]
    NotBound,

    /// No se pudo abrir el archivo de log
    #[error("failed to open log file: {0}")]
    LogFile(#[source] io::Error),

    /// Ya había un logger instalado
    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}
