//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP. Cada conexión se procesa en su propio
//! thread y atiende exactamente un request:
//!
//! ```text
//! Accepted → Read → Parsed | ParseFailed → Dispatched → Responded → Closed
//! ```
//!
//! No hay cola ni timeouts: un cliente lento mantiene su thread ocupado.
//! El único límite opcional es `--max-connections`.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use log::{debug, error, info, trace, warn};

use super::admission::ConnectionGauge;
use super::wire::{FramedRead, ReadError, SingleRead, WireReader};
use crate::config::{Config, Framing};
use crate::error::ServerError;
use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use crate::storage::FileStore;

/// Servidor HTTP concurrente
pub struct Server {
    config: Config,
    router: Arc<Router>,
    reader: Arc<dyn WireReader>,
    gauge: ConnectionGauge,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let router = Router::new(FileStore::new(config.directory.clone()));

        let reader: Arc<dyn WireReader> = match config.framing {
            Framing::Single => Arc::new(SingleRead::new(config.read_buffer)),
            Framing::Framed => Arc::new(FramedRead::new(config.read_buffer)),
        };

        let gauge = ConnectionGauge::new(config.max_connections);

        Self {
            config,
            router: Arc::new(router),
            reader,
            gauge,
            listener: None,
        }
    }

    /// Abre el socket de escucha y retorna la dirección real
    /// (útil con puerto 0)
    pub fn bind(&mut self) -> Result<SocketAddr, ServerError> {
        let address = self.config.address();
        info!("[*] Iniciando servidor en {}", address);

        let bind_error = |source| ServerError::Bind {
            address: address.clone(),
            source,
        };
        let listener = TcpListener::bind(&address).map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        self.listener = Some(listener);
        Ok(local_addr)
    }

    /// Acepta conexiones para siempre. Un error de accept se loguea
    /// y el loop continúa.
    pub fn serve(&self) -> Result<(), ServerError> {
        let listener = self.listener.as_ref().ok_or(ServerError::NotBound)?;

        info!(
            "[+] Servidor escuchando en {} (storage root: {})",
            listener.local_addr().map(|a| a.to_string()).unwrap_or_else(|_| self.config.address()),
            self.router.files().root().display()
        );

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => self.spawn_connection(stream),
                Err(e) => error!("Error al aceptar conexión: {}", e),
            }
        }

        Ok(())
    }

    /// `bind` + `serve`
    pub fn run(&mut self) -> Result<(), ServerError> {
        self.bind()?;
        self.serve()
    }

    fn spawn_connection(&self, mut stream: TcpStream) {
        let router = Arc::clone(&self.router);
        let reader = Arc::clone(&self.reader);
        let permit = self.gauge.try_acquire();

        let peer_addr = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        debug!(
            "Nueva conexión desde: {} (activas: {})",
            peer_addr,
            self.gauge.active()
        );

        thread::spawn(move || {
            let admitted = permit.is_some();
            let _permit = permit;

            if let Err(e) = Self::handle_connection(&mut stream, &router, reader.as_ref(), admitted) {
                error!("   Error en conexión {}: {}", peer_addr, e);
            }
        });
    }

    /// Atiende un request en `stream` y escribe su response
    ///
    /// Si el peer cierra sin mandar nada, no se escribe nada. Un request que
    /// no se puede parsear, o cuyo body llegó incompleto, recibe 400 y nunca
    /// llega al router; uno que no cabe en el límite recibe 413. Si la
    /// conexión no fue admitida se lee igual (para no resetear al cliente)
    /// y se responde 503.
    pub fn handle_connection<S: Read + Write>(
        stream: &mut S,
        router: &Router,
        reader: &dyn WireReader,
        admitted: bool,
    ) -> io::Result<()> {
        let start = Instant::now();

        let read = match reader.read_request(&mut *stream) {
            Ok(Some(raw)) => Ok(raw),
            Ok(None) => {
                debug!("   Conexión cerrada sin datos");
                return Ok(());
            }
            Err(ReadError::Io(e)) => return Err(e),
            Err(e) => Err(e),
        };

        let response = if !admitted {
            warn!("   Límite de conexiones alcanzado");
            Response::new(StatusCode::ServiceUnavailable)
        } else {
            match read {
                Ok(raw) => {
                    debug!("   {} bytes leídos", raw.len());
                    Self::dispatch(&raw, router)
                }
                Err(e) => {
                    warn!("   Request rechazado: {}", e);
                    match e {
                        ReadError::TooLarge { .. } => Response::new(StatusCode::PayloadTooLarge),
                        _ => Response::new(StatusCode::BadRequest),
                    }
                }
            }
        };

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        let status = response.status();
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        if status.is_server_error() {
            warn!("   {} ({:.2}ms)", status, latency_ms);
        } else if status.is_client_error() {
            info!("   {} ({:.2}ms)", status, latency_ms);
        } else {
            debug!("   {} ({:.2}ms)", status, latency_ms);
        }

        Ok(())
    }

    /// Parsea y rutea; un request malformado se responde 400
    fn dispatch(raw: &[u8], router: &Router) -> Response {
        match Request::parse(raw) {
            Ok(request) => {
                debug!(
                    "   {} {} HTTP/{}",
                    request.method().as_str(),
                    request.path(),
                    request.version()
                );
                trace!("   headers: {:?}", request.headers());
                trace!("   body: {:?}", String::from_utf8_lossy(request.body()));
                router.route(&request)
            }
            Err(e) => {
                warn!("   Parse error: {}", e);
                Response::new(StatusCode::BadRequest)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Shutdown;
    use tempfile::TempDir;

    fn ephemeral_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("bind")
    }

    /// Atiende una conexión con `handle_connection` y retorna lo que recibió
    /// el cliente
    fn exchange(router: Arc<Router>, admitted: bool, request: &[u8]) -> Vec<u8> {
        exchange_with(router, SingleRead::default(), admitted, request)
    }

    fn exchange_with<R: WireReader + 'static>(
        router: Arc<Router>,
        reader: R,
        admitted: bool,
        request: &[u8],
    ) -> Vec<u8> {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let t = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            Server::handle_connection(&mut stream, &router, &reader, admitted).unwrap();
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(request).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();

        t.join().unwrap();
        buf
    }

    fn test_router() -> (TempDir, Arc<Router>) {
        let dir = TempDir::new().unwrap();
        let router = Arc::new(Router::new(FileStore::new(dir.path())));
        (dir, router)
    }

    #[test]
    fn test_handle_connection_root() {
        let (_dir, router) = test_router();
        let response = exchange(router, true, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");

        assert_eq!(response, b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn test_handle_connection_echo() {
        let (_dir, router) = test_router();
        let response = exchange(router, true, b"GET /echo/hello HTTP/1.1\r\n\r\n");

        assert_eq!(
            response,
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello"
        );
    }

    #[test]
    fn test_handle_connection_parse_error() {
        let (_dir, router) = test_router();
        let response = exchange(router, true, b"GETHTTP/1.1\r\n\r\n");
        let text = String::from_utf8_lossy(&response);

        assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(!text.contains("200 OK"));
    }

    #[test]
    fn test_handle_connection_malformed_header() {
        let (_dir, router) = test_router();
        let response = exchange(router, true, b"GET / HTTP/1.1\r\nbroken-header\r\n\r\n");

        assert_eq!(response, b"HTTP/1.1 400 Bad Request\r\n\r\n");
    }

    #[test]
    fn test_handle_connection_garbage() {
        let (_dir, router) = test_router();
        let response = exchange(router, true, b"\x00\x01\x02\x03garbage");

        assert!(String::from_utf8_lossy(&response).contains("400 Bad Request"));
    }

    #[test]
    fn test_handle_connection_not_admitted() {
        let (_dir, router) = test_router();
        let response = exchange(router, false, b"GET / HTTP/1.1\r\n\r\n");

        assert_eq!(response, b"HTTP/1.1 503 Service Unavailable\r\n\r\n");
    }

    #[test]
    fn test_handle_connection_upload() {
        let (dir, router) = test_router();
        let response = exchange(
            router,
            true,
            b"POST /files/up.txt HTTP/1.1\r\nContent-Length: 4\r\n\r\ndata",
        );

        assert_eq!(response, b"HTTP/1.1 201 Created\r\n\r\n");
        assert_eq!(std::fs::read(dir.path().join("up.txt")).unwrap(), b"data");
    }

    #[test]
    fn test_handle_connection_body_over_limit() {
        let (dir, router) = test_router();
        let mut request = b"POST /files/big.bin HTTP/1.1\r\nContent-Length: 1000\r\n\r\n".to_vec();
        request.extend_from_slice(&[b'x'; 1000]);

        let response = exchange_with(router, FramedRead::new(128), true, &request);

        assert_eq!(response, b"HTTP/1.1 413 Payload Too Large\r\n\r\n");
        assert!(!dir.path().join("big.bin").exists());
    }

    #[test]
    fn test_handle_connection_truncated_body() {
        let (dir, router) = test_router();
        let response = exchange_with(
            router,
            FramedRead::new(4096),
            true,
            b"POST /files/short.bin HTTP/1.1\r\nContent-Length: 50\r\n\r\n0123456789",
        );

        assert_eq!(response, b"HTTP/1.1 400 Bad Request\r\n\r\n");
        assert!(!dir.path().join("short.bin").exists());
    }

    #[test]
    fn test_handle_connection_storage_failure() {
        let (dir, router) = test_router();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let response = exchange(router, true, b"POST /files/sub HTTP/1.1\r\n\r\ndata");

        assert_eq!(response, b"HTTP/1.1 500 Internal Server Error\r\n\r\n");
        assert!(dir.path().join("sub").is_dir());
    }

    #[test]
    fn test_handle_connection_peer_closed_immediately() {
        // Cubre la rama de EOF: no se escribe nada
        let (_dir, router) = test_router();
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let t = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            Server::handle_connection(&mut stream, &router, &SingleRead::default(), true).unwrap();
        });

        drop(TcpStream::connect(addr).unwrap());

        t.join().unwrap();
    }

    #[test]
    fn test_serve_requires_bind() {
        let server = Server::new(Config::default());
        assert!(matches!(server.serve(), Err(ServerError::NotBound)));
    }

    #[test]
    fn test_bind_port_in_use() {
        let taken = ephemeral_listener();
        let port = taken.local_addr().unwrap().port();

        let mut server = Server::new(Config {
            host: "127.0.0.1".to_string(),
            port,
            ..Config::default()
        });

        assert!(matches!(server.bind(), Err(ServerError::Bind { .. })));
    }
}
