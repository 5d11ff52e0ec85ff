//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el router que mapea requests a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Las rutas son un conjunto fijo evaluado en orden, y gana la primera que
//! coincide:
//!
//! | Método | Patrón          | Handler                         |
//! |--------|-----------------|---------------------------------|
//! | *      | `/`             | [`commands::root_handler`]      |
//! | *      | `/user-agent`   | [`commands::user_agent_handler`]|
//! | *      | `/echo/{text}`  | [`commands::echo_handler`]      |
//! | GET    | `/files/{name}` | [`commands::download_handler`]  |
//! | POST   | `/files/{name}` | [`commands::upload_handler`]    |
//!
//! Si ninguna coincide, se responde 404 Not Found sin body.

use crate::commands;
use crate::http::{Method, Request, Response, StatusCode};
use crate::storage::FileStore;

/// Lo que recibe cada handler
pub struct RouteContext<'a> {
    /// Request ya parseado
    pub request: &'a Request,

    /// Parte del path después del prefijo de la ruta (vacío en rutas exactas)
    pub tail: &'a str,

    /// Storage root para las rutas `/files/`
    pub files: &'a FileStore,
}

/// Tipo de función handler
///
/// Un handler recibe el contexto de la ruta y retorna una Response
pub type Handler = fn(&RouteContext<'_>) -> Response;

/// Forma del path que acepta una ruta
#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// El path debe ser exactamente este
    Exact(&'static str),

    /// El path debe empezar con este prefijo; el resto es el `tail`
    Prefix(&'static str),
}

impl Pattern {
    fn matches<'p>(&self, path: &'p str) -> Option<&'p str> {
        match self {
            Pattern::Exact(expected) => (path == *expected).then_some(""),
            Pattern::Prefix(prefix) => path.strip_prefix(prefix),
        }
    }
}

struct Route {
    /// `None` acepta cualquier método
    method: Option<Method>,
    pattern: Pattern,
    handler: Handler,
}

/// Router que mapea requests a handlers
pub struct Router {
    routes: Vec<Route>,
    files: FileStore,
}

impl Router {
    /// Crea el router con las rutas del servidor, en orden de prioridad
    ///
    /// # Ejemplo
    /// ```
    /// use mini_http::router::Router;
    /// use mini_http::storage::FileStore;
    /// use mini_http::http::{Request, StatusCode};
    ///
    /// let router = Router::new(FileStore::new("./data"));
    ///
    /// let request = Request::parse(b"GET /echo/abc HTTP/1.1\r\n\r\n").unwrap();
    /// let response = router.route(&request);
    ///
    /// assert_eq!(response.status(), StatusCode::Ok);
    /// assert_eq!(response.body(), b"abc");
    /// ```
    pub fn new(files: FileStore) -> Self {
        let mut router = Self {
            routes: Vec::new(),
            files,
        };

        router.register(None, Pattern::Exact("/"), commands::root_handler);
        router.register(None, Pattern::Exact("/user-agent"), commands::user_agent_handler);
        router.register(None, Pattern::Prefix("/echo/"), commands::echo_handler);
        router.register(Some(Method::GET), Pattern::Prefix("/files/"), commands::download_handler);
        router.register(Some(Method::POST), Pattern::Prefix("/files/"), commands::upload_handler);

        router
    }

    fn register(&mut self, method: Option<Method>, pattern: Pattern, handler: Handler) {
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// La response siempre lleva la versión HTTP del request.
    pub fn route(&self, request: &Request) -> Response {
        let path = request.path();

        for route in &self.routes {
            if let Some(method) = &route.method {
                if method != request.method() {
                    continue;
                }
            }

            if let Some(tail) = route.pattern.matches(path) {
                let ctx = RouteContext {
                    request,
                    tail,
                    files: &self.files,
                };
                return (route.handler)(&ctx).with_version(request.version());
            }
        }

        Response::new(StatusCode::NotFound).with_version(request.version())
    }

    /// Storage root con el que se construyó el router
    pub fn files(&self) -> &FileStore {
        &self.files
    }
}
