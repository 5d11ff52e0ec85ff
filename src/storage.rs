//! # Storage Root
//! src/storage.rs
//!
//! Acceso al directorio de archivos que sirven las rutas `/files/`.
//!
//! El directorio se recibe una sola vez al arrancar (ver `Config::directory`)
//! y se pasa al router en su construcción. Todos los nombres se resuelven
//! relativos a ese directorio y nunca pueden salir de él: se rechazan
//! nombres absolutos, componentes `..` y symlinks que apunten afuera.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Errores de acceso al storage root
#[derive(Debug, Error)]
pub enum StorageError {
    /// Nombre vacío, absoluto o que escapa del storage root
    #[error("invalid file name: {0}")]
    InvalidName(String),

    /// El archivo (o su directorio padre) no existe
    #[error("file not found: {0}")]
    NotFound(String),

    /// Cualquier otra falla de I/O
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Directorio raíz de los archivos servidos
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Crea un store sobre el directorio dado
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directorio raíz
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lee el archivo `name` completo
    pub fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(name)?;
        let path = self.canonical_within_root(&path, name)?;

        if !path.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        fs::read(&path).map_err(|e| Self::classify(e, name))
    }

    /// Escribe `contents` en `name`, creando o truncando el archivo
    pub fn write(&self, name: &str, contents: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(name)?;

        // Si el destino ya existe (puede ser un symlink) se valida entero;
        // si no, basta con que el directorio padre quede dentro del root.
        if fs::symlink_metadata(&path).is_ok() {
            self.canonical_within_root(&path, name)?;
        } else if let Some(parent) = path.parent() {
            self.canonical_within_root(parent, name)?;
        }

        fs::write(&path, contents).map_err(|e| Self::classify(e, name))
    }

    /// Une `name` al root validando cada componente
    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        if name.is_empty() {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let relative = Path::new(name);
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StorageError::InvalidName(name.to_string()));
                }
            }
        }

        Ok(self.root.join(relative))
    }

    /// Canonicaliza `path` y verifica que siga dentro del root canonicalizado
    fn canonical_within_root(&self, path: &Path, name: &str) -> Result<PathBuf, StorageError> {
        let root = fs::canonicalize(&self.root).map_err(|e| Self::classify(e, name))?;
        let canonical = fs::canonicalize(path).map_err(|e| Self::classify(e, name))?;

        if !canonical.starts_with(&root) {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        Ok(canonical)
    }

    fn classify(error: io::Error, name: &str) -> StorageError {
        match error.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(name.to_string()),
            _ => StorageError::Io(error),
        }
    }
}
