//! # Handlers básicos
//!
//! Funciones puras del request: no tocan el filesystem.

use crate::http::{Response, StatusCode};
use crate::router::RouteContext;

/// Handler para `/`
///
/// 200 sin headers ni body.
pub fn root_handler(_ctx: &RouteContext<'_>) -> Response {
    Response::new(StatusCode::Ok)
}

/// Handler para `/user-agent`
///
/// Devuelve el valor del header `User-Agent` como `text/plain`,
/// o un body vacío si el cliente no lo mandó.
pub fn user_agent_handler(ctx: &RouteContext<'_>) -> Response {
    Response::text(ctx.request.header("User-Agent").unwrap_or(""))
}

/// Handler para `/echo/{text}`
///
/// Devuelve `{text}` sin decodificar.
///
/// # Ejemplo
/// ```text
/// GET /echo/hola → 200, "hola"
/// ```
pub fn echo_handler(ctx: &RouteContext<'_>) -> Response {
    Response::text(ctx.tail)
}
