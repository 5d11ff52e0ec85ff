//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Este módulo implementa el parser de requests desde cero.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/notas.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! User-Agent: curl/8.4.0\r\n
//! \r\n
//! contenido del archivo
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path HTTP/1.1`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: Bytes crudos, tal cual llegaron del socket
//!
//! Un request se parsea completo o no se produce: cualquier separador
//! faltante termina en un [`ParseError`] y el request nunca llega al router.

use std::collections::HashMap;

use thiserror::Error;

use super::find_header_end;

/// Métodos HTTP
///
/// Los métodos desconocidos no se rechazan: se guardan como `Extension`
/// con el token literal que llegó por el cable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    OPTIONS,
    PATCH,

    /// Cualquier otro token (ej: "BREW")
    Extension(String),
}

impl Method {
    /// Construye el método desde el token de la request line
    fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Extension(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Extension(token) => token,
        }
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path de la petición, sin decodificar (ej: "/echo/abc%20d")
    path: String,

    /// Headers HTTP, sensibles a mayúsculas tal como llegaron
    headers: HashMap<String, String>,

    /// Versión sin el prefijo "HTTP/" (ej: "1.1")
    version: String,

    /// Body crudo que sigue a la línea vacía
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Request vacío
    #[error("Empty request")]
    EmptyRequest,

    /// No se encontró el `\r\n\r\n` que cierra los headers
    #[error("Incomplete HTTP request")]
    IncompleteRequest,

    /// La cabecera del request no es UTF-8 válido
    #[error("Request head is not valid UTF-8")]
    InvalidEncoding,

    /// Formato inválido de la request line
    #[error("Invalid request line format")]
    InvalidRequestLine,

    /// El token de versión no empieza con "HTTP/"
    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    /// Header sin el separador ": "
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl Request {
    /// Parsea un request desde los bytes leídos del socket
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use mini_http::http::Request;
    ///
    /// let raw = b"GET /echo/hola HTTP/1.1\r\nUser-Agent: curl\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/echo/hola");
    /// assert_eq!(request.version(), "1.1");
    /// assert_eq!(request.header("User-Agent"), Some("curl"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.iter().all(|b| *b == 0 || b.is_ascii_whitespace()) {
            return Err(ParseError::EmptyRequest);
        }

        // El body puede ser binario: solo la cabecera tiene que ser texto
        let head_end = find_header_end(buffer).ok_or(ParseError::IncompleteRequest)?;
        let head = std::str::from_utf8(&buffer[..head_end])
            .map_err(|_| ParseError::InvalidEncoding)?;
        let body = buffer[head_end + 4..].to_vec();

        let (request_line, header_block) = head.split_once("\r\n").unwrap_or((head, ""));

        // 1. Request line
        let (method, path, version) = Self::parse_request_line(request_line)?;

        // 2. Headers
        let headers = Self::parse_headers(header_block)?;

        Ok(Request {
            method,
            path,
            headers,
            version,
            body,
        })
    }

    /// Parsea la request line
    ///
    /// Se corta en el primer espacio (método) y en el siguiente (path);
    /// el resto es el token de versión.
    fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
        let (method, rest) = line.split_once(' ').ok_or(ParseError::InvalidRequestLine)?;
        let (path, version) = rest.split_once(' ').ok_or(ParseError::InvalidRequestLine)?;

        if method.is_empty() || path.is_empty() {
            return Err(ParseError::InvalidRequestLine);
        }

        let version = version
            .strip_prefix("HTTP/")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ParseError::InvalidHttpVersion(version.to_string()))?;

        Ok((Method::from_token(method), path.to_string(), version.to_string()))
    }

    /// Parsea el bloque de headers
    ///
    /// Cada header tiene formato "Name: Value". Si un nombre se repite,
    /// gana el último.
    fn parse_headers(block: &str) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in block.split("\r\n") {
            if line.is_empty() {
                continue;
            }

            match line.split_once(": ") {
                Some((name, value)) => {
                    headers.insert(name.to_string(), value.to_string());
                }
                None => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico (el nombre es sensible a mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene la versión HTTP (ej: "1.1")
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET / HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert_eq!(request.version(), "1.1");
        assert!(request.headers().is_empty());
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_parse_with_headers() {
        let raw = b"GET /user-agent HTTP/1.1\r\nHost: localhost:4221\r\nUser-Agent: test-client/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("Host"), Some("localhost:4221"));
        assert_eq!(request.header("User-Agent"), Some("test-client/1.0"));
        // Los nombres son sensibles a mayúsculas
        assert_eq!(request.header("user-agent"), None);
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let raw = b"GET / HTTP/1.1\r\nX-Tag: a\r\nX-Tag: b\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("X-Tag"), Some("b"));
        assert_eq!(request.headers().len(), 1);
    }

    #[test]
    fn test_header_value_keeps_extra_separators() {
        let raw = b"GET / HTTP/1.1\r\nX-Note: a: b\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("X-Note"), Some("a: b"));
    }

    #[test]
    fn test_parse_post_body() {
        let raw = b"POST /files/a.txt HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body(), b"hello");
    }

    #[test]
    fn test_body_is_verbatim() {
        let raw = b"POST /files/a HTTP/1.1\r\n\r\n  line1\r\n\r\nline2\xff\x00";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.body(), b"  line1\r\n\r\nline2\xff\x00");
    }

    #[test]
    fn test_path_is_not_decoded() {
        let raw = b"GET /echo/a%20b?x=1 HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/echo/a%20b?x=1");
    }

    #[test]
    fn test_unknown_method_passes_through() {
        let raw = b"BREW /pot HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), &Method::Extension("BREW".to_string()));
        assert_eq!(request.method().as_str(), "BREW");
    }

    #[test]
    fn test_empty_request() {
        assert_eq!(Request::parse(b"").unwrap_err(), ParseError::EmptyRequest);
        assert_eq!(Request::parse(&[0u8; 64]).unwrap_err(), ParseError::EmptyRequest);
    }

    #[test]
    fn test_missing_space_in_request_line() {
        let raw = b"GETHTTP/1.1\r\n\r\n";
        assert_eq!(Request::parse(raw).unwrap_err(), ParseError::InvalidRequestLine);
    }

    #[test]
    fn test_missing_version() {
        let raw = b"GET /\r\n\r\n";
        assert_eq!(Request::parse(raw).unwrap_err(), ParseError::InvalidRequestLine);
    }

    #[test]
    fn test_invalid_version() {
        let raw = b"GET / FTP/1.0\r\n\r\n";
        assert!(matches!(
            Request::parse(raw),
            Err(ParseError::InvalidHttpVersion(v)) if v == "FTP/1.0"
        ));
    }

    #[test]
    fn test_incomplete_request() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost";
        assert_eq!(Request::parse(raw).unwrap_err(), ParseError::IncompleteRequest);
    }

    #[test]
    fn test_malformed_header_is_an_error() {
        let raw = b"GET / HTTP/1.1\r\nHost localhost\r\n\r\n";
        assert!(matches!(
            Request::parse(raw),
            Err(ParseError::InvalidHeader(h)) if h == "Host localhost"
        ));
    }

    #[test]
    fn test_invalid_utf8_head() {
        let raw = b"GET /\xff HTTP/1.1\r\n\r\n";
        assert_eq!(Request::parse(raw).unwrap_err(), ParseError::InvalidEncoding);
    }
}
