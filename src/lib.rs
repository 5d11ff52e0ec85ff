//! # mini_http
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo sobre TCP: un request por conexión, un thread
//! por conexión, y un conjunto fijo de rutas.
//!
//! ## Arquitectura
//!
//! ```text
//! Server (accept loop)
//!   → WireReader  (bytes crudos del socket)
//!   → Request     (parser)
//!   → Router      (primera ruta que coincide)
//!   → Handler     (commands::*)
//!   → Response    (serialización al socket)
//! ```
//!
//! - `http`: Parsing de requests, construcción de responses y status codes
//! - `router`: Despacho del request al handler
//! - `commands`: Handlers (`/`, `/user-agent`, `/echo/`, `/files/`)
//! - `storage`: Storage root de las rutas `/files/`
//! - `server`: Loop de conexiones, lectura del socket y límite de conexiones
//! - `config`, `logger`, `error`: Configuración, logging y errores fatales
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use mini_http::config::Config;
//! use mini_http::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod router;
pub mod server;
pub mod storage;
