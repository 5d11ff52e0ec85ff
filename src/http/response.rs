//! # Construcción de Respuestas HTTP
//!
//! Este módulo proporciona una API para construir respuestas HTTP
//! y convertirlas a bytes para enviar al cliente.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use mini_http::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body(b"hello".to_vec());
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.ends_with(b"Content-Length: 5\r\n\r\nhello"));
//! ```

use super::StatusCode;

/// Versión usada cuando no hay request del cual copiarla
pub const DEFAULT_VERSION: &str = "1.1";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Versión sin el prefijo "HTTP/" (normalmente la del request)
    version: String,

    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers en el orden en que se escriben. No se deduplican,
    /// salvo `Content-Length` que siempre refleja el body actual.
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta 200 `text/plain` con el body dado
    pub fn text(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_body(body.as_bytes().to_vec())
    }

    /// Respuesta 200 `application/octet-stream` (descarga de archivos)
    pub fn octet_stream(body: Vec<u8>) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "application/octet-stream")
            .with_body(body)
    }

    /// Establece la versión HTTP de la status line (ej: "1.1")
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Agrega un header al final de la lista
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Establece el cuerpo de la respuesta
    ///
    /// Automáticamente calcula el header `Content-Length`. Si ya existía,
    /// se reemplaza para que nunca quede desfasado respecto al body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.headers.retain(|(name, _)| name != "Content-Length");
        self.headers
            .push(("Content-Length".to_string(), body.len().to_string()));
        self.body = body;
        self
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body: contenido binario
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(64 + self.body.len());

        let status_line = format!("HTTP/{} {}\r\n", self.version, self.status);
        result.extend_from_slice(status_line.as_bytes());

        for (name, value) in &self.headers {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene los headers en orden
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Busca el valor de un header por nombre exacto
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::NotFound);
        assert_eq!(response.status(), StatusCode::NotFound);
        assert_eq!(response.version(), "1.1");
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_text_response() {
        let response = Response::text("hello");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.headers(),
            &[
                ("Content-Type".to_string(), "text/plain".to_string()),
                ("Content-Length".to_string(), "5".to_string()),
            ]
        );
        assert_eq!(response.body(), b"hello");
    }

    #[test]
    fn test_content_length_counts_bytes() {
        // "ñ" ocupa 2 bytes en UTF-8
        let response = Response::text("año");
        assert_eq!(response.header("Content-Length"), Some("4"));
    }

    #[test]
    fn test_with_body_replaces_content_length() {
        let response = Response::new(StatusCode::Ok)
            .with_body(b"first body".to_vec())
            .with_body(b"abc".to_vec());

        let lengths: Vec<_> = response
            .headers()
            .iter()
            .filter(|(n, _)| n == "Content-Length")
            .collect();
        assert_eq!(lengths.len(), 1);
        assert_eq!(response.header("Content-Length"), Some("3"));
    }

    #[test]
    fn test_to_bytes_with_headers() {
        let response = Response::text("Test").with_version("1.0");
        let bytes = response.to_bytes();

        assert_eq!(
            bytes,
            b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 4\r\n\r\nTest".to_vec()
        );
    }

    #[test]
    fn test_to_bytes_without_headers() {
        let response = Response::new(StatusCode::Created);
        assert_eq!(response.to_bytes(), b"HTTP/1.1 201 Created\r\n\r\n".to_vec());
    }

    #[test]
    fn test_octet_stream_binary_body() {
        let binary_data = vec![0x00, 0x01, 0x02, 0xFF];
        let response = Response::octet_stream(binary_data.clone());

        assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
        assert_eq!(response.header("Content-Length"), Some("4"));
        assert!(response.to_bytes().ends_with(&binary_data));
    }
}
