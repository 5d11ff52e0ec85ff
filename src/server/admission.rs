//! # Límite de conexiones
//! src/server/admission.rs
//!
//! Cuenta los threads de conexión vivos. Con límite 0 todas las conexiones
//! se admiten (comportamiento por defecto); con límite N, la conexión N+1
//! se atiende con 503 Service Unavailable.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Contador thread-safe de conexiones activas
#[derive(Debug, Clone)]
pub struct ConnectionGauge {
    active: Arc<AtomicUsize>,
    limit: usize,
}

/// Conexión contada mientras viva; al soltarse libera su lugar
#[derive(Debug)]
pub struct ConnectionPermit {
    active: Arc<AtomicUsize>,
}

impl ConnectionGauge {
    /// `limit == 0` significa sin límite
    pub fn new(limit: usize) -> Self {
        Self {
            active: Arc::new(AtomicUsize::new(0)),
            limit,
        }
    }

    /// Intenta reservar un lugar. `None` si el límite está alcanzado.
    pub fn try_acquire(&self) -> Option<ConnectionPermit> {
        let previous = self.active.fetch_add(1, Ordering::SeqCst);

        if self.limit != 0 && previous >= self.limit {
            self.active.fetch_sub(1, Ordering::SeqCst);
            return None;
        }

        Some(ConnectionPermit {
            active: Arc::clone(&self.active),
        })
    }

    /// Conexiones activas en este momento
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
