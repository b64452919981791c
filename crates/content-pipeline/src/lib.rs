pub mod config;
pub mod draft;
pub mod error;
pub mod expander;
pub mod generation;
pub mod metrics;
pub mod openai;
pub mod orchestrator;
pub mod prompts;
pub mod response;
pub mod retry;
pub mod seo;
pub mod testing;
pub mod topics;
