//! Knowledge-base chatbot: answers a question with the stored answer of the
//! most similar record, scored by TF-IDF cosine similarity.

pub mod chat;
pub mod config;
pub mod corpus;
pub mod error;
pub mod retriever;
pub mod server;
pub mod utils;
pub mod vector_db;

pub use config::{AppConfig, EngineConfig, ServerConfig};
pub use corpus::{Corpus, Record};
pub use error::{ConfigError, DataSourceError};
pub use retriever::{Match, RetrievalEngine};
