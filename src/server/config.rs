//! Command-line and environment configuration for the HTTP server

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::llm::DEFAULT_MODEL;

/// Runtime settings. Every option can also be given through the environment
/// (or a `.env` file); the Gemini API key is mandatory.
#[derive(Parser, Debug, Clone)]
#[command(name = "clause-redliner")]
#[command(about = "Suggests scenario-driven edits to Word legal documents and regenerates them")]
pub struct ServerConfig {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, value_parser = parse_api_key)]
    pub api_key: String,

    /// Gemini model used for analysis
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Directory holding the `.docx` templates
    #[arg(long, env = "TEMPLATES_DIR", default_value = "templates")]
    pub templates_dir: PathBuf,

    /// Host address to bind to
    #[arg(long, env = "BIND_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5001")]
    pub port: u16,

    /// Origin allowed to call the API from a browser
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "http://localhost:3000")]
    pub allowed_origin: String,

    /// Seconds to wait for the model before giving up
    #[arg(long, env = "MODEL_TIMEOUT_SECS", default_value = "60")]
    pub model_timeout_secs: u64,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value = "10485760")]
    pub max_upload_bytes: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }
}

fn parse_api_key(value: &str) -> Result<String, String> {
    let key = value.trim();
    if key.is_empty() {
        return Err("GEMINI_API_KEY must not be empty".to_string());
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_arguments() {
        let config = ServerConfig::try_parse_from([
            "clause-redliner",
            "--api-key",
            " secret ",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--model-timeout-secs",
            "5",
            "--templates-dir",
            "/srv/templates",
        ])
        .unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.model_timeout(), Duration::from_secs(5));
        assert_eq!(config.templates_dir, PathBuf::from("/srv/templates"));
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let result = ServerConfig::try_parse_from(["clause-redliner", "--api-key", "  "]);
        assert!(result.is_err());
    }
}
