//! # mini_http - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor.

use log::info;

use mini_http::config::Config;
use mini_http::error::ServerError;
use mini_http::logger;
use mini_http::server::Server;

fn main() {
    let config = Config::new();

    if let Err(e) = run(config) {
        eprintln!("Error fatal: {}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), ServerError> {
    logger::init_logger(&config)?;
    config.validate().map_err(ServerError::Config)?;

    info!("Configuración:");
    info!("   Dirección:  {}", config.address());
    info!("   Directorio: {}", config.directory.display());
    info!("   Framing:    {:?} ({} bytes)", config.framing, config.read_buffer);
    if config.max_connections > 0 {
        info!("   Conexiones: máximo {}", config.max_connections);
    } else {
        info!("   Conexiones: sin límite");
    }

    // Crear el servidor e iniciarlo (esto bloquea el thread)
    let mut server = Server::new(config);
    server.run()
}
