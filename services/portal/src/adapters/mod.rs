pub mod http_client;
pub mod speech;
pub mod token_store;

pub use http_client::HttpApiClient;
pub use speech::UnsupportedSpeechHost;
pub use token_store::{FileTokenStore, MemoryTokenStore, SESSION_TOKEN_KEY};
