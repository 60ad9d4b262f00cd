//! Backend module - clients for the upstream APIs

pub mod catalog;
pub mod groq;
pub mod nebius;
pub mod omdb;
pub mod serper;

pub use catalog::{MovieCatalog, MovieRecord, SearchHit};
pub use groq::{
    AudioUpload, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, GroqClient,
    Transcription,
};
pub use nebius::NebiusClient;
pub use omdb::{Lookup, OmdbClient};
pub use serper::SerperClient;
