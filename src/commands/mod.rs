//! # Handlers del Servidor
//!
//! Cada handler recibe un [`RouteContext`](crate::router::RouteContext)
//! y retorna una Response.
//!
//! ## Categorías
//!
//! - **basic**: Rutas sin efectos secundarios (`/`, `/user-agent`, `/echo/`)
//! - **files**: Lectura y escritura en el storage root (`/files/`)

pub mod basic;
pub mod files;

// Re-exportar funciones útiles
pub use basic::*;
pub use files::*;
