use std::env;

/// Environment-level configuration, read once at startup.
///
/// A missing API key disables the embedding and generation gateways; the
/// process still serves the record-store endpoints.
#[derive(Debug, Clone)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub generation_model: String,
    pub embedding_model: String,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Self {
        // Honor a local .env file, same as the deployment scripts expect.
        let _ = dotenvy::dotenv();

        let gemini_api_key = env::var("GEMINI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let generation_model = env::var("FUNDASSIST_GENERATION_MODEL")
            .unwrap_or_else(|_| "gemini-2.0-flash".to_string());
        let embedding_model = env::var("FUNDASSIST_EMBEDDING_MODEL")
            .unwrap_or_else(|_| "text-embedding-004".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
            .unwrap_or(8000);

        Settings {
            gemini_api_key,
            generation_model,
            embedding_model,
            port,
        }
    }
}
