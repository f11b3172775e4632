//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI con fallback a variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./catalog_server --port 5000 --seeds-dir ./seeds
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=0.0.0.0 SEEDS_DIR=/srv/seeds ./catalog_server
//! MAX_BODY_BYTES=65536 MAX_HEADER_BYTES=4096 ./catalog_server
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

/// Configuración del servidor del catálogo
#[derive(Debug, Clone, Parser)]
#[command(name = "catalog_server")]
#[command(about = "Servidor HTTP CRUD para un catálogo de artistas, álbumes y canciones")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "5000", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio con artists.json, albums.json y songs.json.
    /// Sin este flag se usan los seeds embebidos.
    #[arg(long = "seeds-dir", env = "SEEDS_DIR")]
    pub seeds_dir: Option<PathBuf>,

    /// Tamaño máximo de body aceptado, en bytes
    #[arg(long = "max-body-bytes", default_value = "1048576", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Tamaño máximo de línea de request más headers, en bytes
    #[arg(long = "max-header-bytes", default_value = "8192", env = "MAX_HEADER_BYTES")]
    pub max_header_bytes: usize,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use catalog_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:5000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be > 0".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.max_body_bytes == 0 {
            return Err("Max body bytes must be >= 1".to_string());
        }
        if self.max_header_bytes < 16 {
            return Err("Max header bytes must be >= 16".to_string());
        }

        Ok(())
    }

    /// Registra un resumen de la configuración efectiva
    pub fn log_summary(&self) {
        let seeds = self
            .seeds_dir
            .as_ref()
            .map_or_else(|| "embedded".to_string(), |dir| dir.display().to_string());

        info!(
            address = %self.address(),
            seeds = %seeds,
            max_body_bytes = self.max_body_bytes,
            max_header_bytes = self.max_header_bytes,
            "configuration"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 5000,
            host: "127.0.0.1".to_string(),
            seeds_dir: None,
            max_body_bytes: 1024 * 1024,
            max_header_bytes: 8192,
        }
    }
}
