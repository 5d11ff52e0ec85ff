//! # Lectura del socket
//! src/server/wire.rs
//!
//! Obtiene los bytes crudos de un request. Hay dos estrategias:
//!
//! - [`SingleRead`]: un único `read` sobre un buffer fijo. Si el request no
//!   cabe o llega en varios segmentos TCP, el parser verá bytes truncados.
//! - [`FramedRead`]: lee hasta `\r\n\r\n` y luego `Content-Length` bytes más.
//!
//! El parser y el router no dependen de cuál se use.

use std::io::{self, Read};

use thiserror::Error;

use crate::http::find_header_end;

/// Capacidad por defecto del buffer de lectura
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Por qué no se pudo obtener un request completo
#[derive(Debug, Error)]
pub enum ReadError {
    /// El request declarado no cabe en el límite
    #[error("request of {declared} bytes exceeds the {limit} byte limit")]
    TooLarge { declared: usize, limit: usize },

    /// El peer cerró antes de mandar todo el body declarado
    #[error("connection closed after {received} of {expected} bytes")]
    Truncated { received: usize, expected: usize },

    /// Falla del socket
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Fuente de bytes de un request
pub trait WireReader: Send + Sync {
    /// Lee un request del stream.
    ///
    /// Retorna `Ok(None)` si el peer cerró sin mandar nada.
    fn read_request(&self, stream: &mut dyn Read) -> Result<Option<Vec<u8>>, ReadError>;
}

/// Un solo `read` de hasta `capacity` bytes
#[derive(Debug, Clone)]
pub struct SingleRead {
    capacity: usize,
}

impl SingleRead {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl Default for SingleRead {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl WireReader for SingleRead {
    fn read_request(&self, stream: &mut dyn Read) -> Result<Option<Vec<u8>>, ReadError> {
        let mut buffer = vec![0u8; self.capacity];
        let bytes_read = stream.read(&mut buffer)?;

        if bytes_read == 0 {
            return Ok(None);
        }

        buffer.truncate(bytes_read);
        Ok(Some(buffer))
    }
}

/// Lee cabecera y body completos, sin pasar de `limit` bytes
///
/// Nunca entrega un body más corto que su `Content-Length`: si no cabe
/// o el peer cierra antes, retorna un [`ReadError`].
#[derive(Debug, Clone)]
pub struct FramedRead {
    limit: usize,
}

impl FramedRead {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Valor de `Content-Length` en la cabecera, sin distinguir mayúsculas
    fn content_length(head: &[u8]) -> usize {
        String::from_utf8_lossy(head)
            .split("\r\n")
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Consume y descarta hasta `remaining` bytes, para que el cliente
    /// termine de enviar y lea la response en vez de un reset
    fn discard(stream: &mut dyn Read, mut remaining: usize) -> io::Result<()> {
        let mut chunk = [0u8; 1024];
        while remaining > 0 {
            let want = chunk.len().min(remaining);
            let n = stream.read(&mut chunk[..want])?;
            if n == 0 {
                break;
            }
            remaining -= n;
        }
        Ok(())
    }
}

impl WireReader for FramedRead {
    fn read_request(&self, stream: &mut dyn Read) -> Result<Option<Vec<u8>>, ReadError> {
        let mut data = Vec::new();
        let mut chunk = [0u8; 1024];

        // 1. Hasta el final de los headers
        let head_end = loop {
            if let Some(pos) = find_header_end(&data) {
                break Some(pos);
            }
            if data.len() >= self.limit {
                break None;
            }

            let want = chunk.len().min(self.limit - data.len());
            let n = stream.read(&mut chunk[..want])?;
            if n == 0 {
                break None;
            }
            data.extend_from_slice(&chunk[..n]);
        };

        if data.is_empty() {
            return Ok(None);
        }

        // Sin terminador: se entrega lo que haya y el parser decide
        let Some(head_end) = head_end else {
            return Ok(Some(data));
        };

        // 2. El body declarado
        let expected = (head_end + 4).saturating_add(Self::content_length(&data[..head_end]));

        if expected > self.limit {
            Self::discard(stream, expected.saturating_sub(data.len()))?;
            return Err(ReadError::TooLarge {
                declared: expected,
                limit: self.limit,
            });
        }

        while data.len() < expected {
            let want = chunk.len().min(expected - data.len());
            let n = stream.read(&mut chunk[..want])?;
            if n == 0 {
                return Err(ReadError::Truncated {
                    received: data.len(),
                    expected,
                });
            }
            data.extend_from_slice(&chunk[..n]);
        }

        data.truncate(expected);
        Ok(Some(data))
    }
}
