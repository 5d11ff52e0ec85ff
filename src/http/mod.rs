//! # Módulo HTTP
//!
//! Implementación mínima del protocolo HTTP/1.1, sin librerías de alto nivel:
//!
//! - Parsing de requests
//! - Construcción y serialización de responses
//! - Códigos de estado
//!
//! No hay chunked transfer encoding, ni keep-alive, ni pipelining:
//! un request y una response por conexión.
//!
//! ### Formato de Request
//!
//! ```text
//! METHOD SP PATH SP HTTP/VERSION\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! BODY
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/VERSION SP STATUS-CODE SP REASON-PHRASE\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! BODY
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;

/// Posición del `\r\n\r\n` que termina los headers, si ya llegó
pub(crate) fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}
