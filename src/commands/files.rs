//! # Handlers de archivos
//!
//! - `GET /files/{name}`: descarga `{name}` desde el storage root
//! - `POST /files/{name}`: escribe el body del request en `{name}`
//!
//! Mapeo de errores:
//!
//! | Error                       | Status |
//! |-----------------------------|--------|
//! | nombre inválido / traversal | 400    |
//! | archivo o directorio ausente| 404    |
//! | otra falla de I/O           | 500    |

use log::warn;

use crate::http::{Response, StatusCode};
use crate::router::RouteContext;
use crate::storage::StorageError;

/// Handler para `GET /files/{name}`
pub fn download_handler(ctx: &RouteContext<'_>) -> Response {
    match ctx.files.read(ctx.tail) {
        Ok(contents) => Response::octet_stream(contents),
        Err(e) => error_response(&e),
    }
}

/// Handler para `POST /files/{name}`
///
/// Los NUL al final del body se descartan antes de escribir: son relleno
/// del buffer fijo de lectura, no contenido del cliente.
pub fn upload_handler(ctx: &RouteContext<'_>) -> Response {
    let contents = trim_trailing_nuls(ctx.request.body());

    match ctx.files.write(ctx.tail, contents) {
        Ok(()) => Response::new(StatusCode::Created),
        Err(e) => error_response(&e),
    }
}

fn trim_trailing_nuls(body: &[u8]) -> &[u8] {
    let end = body.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    &body[..end]
}

fn error_response(error: &StorageError) -> Response {
    let status = match error {
        StorageError::InvalidName(_) => StatusCode::BadRequest,
        StorageError::NotFound(_) => StatusCode::NotFound,
        StorageError::Io(_) => StatusCode::InternalServerError,
    };

    if status.is_server_error() {
        warn!("   [files] {}", error);
    }

    Response::new(status)
}
