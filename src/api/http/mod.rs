// src/api/http/mod.rs

pub mod chat;
pub mod journal;
pub mod router;
pub mod users;

pub use router::http_router;
