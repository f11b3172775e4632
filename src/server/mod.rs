//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes, una a la vez
//! 3. Lee y parsea requests HTTP
//! 4. Despacha contra el store y envía la respuesta

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::Server;
