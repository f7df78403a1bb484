use std::{env, net::SocketAddr, path::PathBuf};

use thiserror::Error;

use crate::classification::StemmerMode;

#[cfg(test)]
use once_cell::sync::Lazy;
#[cfg(test)]
pub(crate) static ENV_MUTEX: Lazy<std::sync::Mutex<()>> = Lazy::new(|| std::sync::Mutex::new(()));

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    http_bind: SocketAddr,
    model_path: PathBuf,
    stemmer_mode: StemmerMode,
    log_predictions: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// 環境変数から設定値を読み込み、検証する。
    ///
    /// # Errors
    /// アドレスやステマーモード、真偽値のパースに失敗した場合は [`ConfigError`] を返す。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_bind = parse_socket_addr("VERACITY_HTTP_BIND", "0.0.0.0:9010")?;
        let model_path = PathBuf::from(
            env::var("VERACITY_MODEL_PATH").unwrap_or_else(|_| "trained_model.json".to_string()),
        );
        let stemmer_mode = parse_stemmer_mode("VERACITY_STEMMER_MODE", StemmerMode::Nltk)?;
        let log_predictions = parse_bool("VERACITY_LOG_PREDICTIONS", false)?;

        Ok(Self {
            http_bind,
            model_path,
            stemmer_mode,
            log_predictions,
        })
    }

    #[must_use]
    pub fn http_bind(&self) -> SocketAddr {
        self.http_bind
    }

    #[must_use]
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    #[must_use]
    pub fn stemmer_mode(&self) -> StemmerMode {
        self.stemmer_mode
    }

    #[must_use]
    pub fn log_predictions(&self) -> bool {
        self.log_predictions
    }

    /// テストや埋め込み用途向けに、指定したモデルパスで既定値の設定を作る。
    #[must_use]
    pub fn with_model_path(model_path: impl Into<PathBuf>) -> Self {
        Self {
            http_bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            model_path: model_path.into(),
            stemmer_mode: StemmerMode::default(),
            log_predictions: false,
        }
    }
}

fn parse_socket_addr(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_stemmer_mode(
    name: &'static str,
    default: StemmerMode,
) -> Result<StemmerMode, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<StemmerMode>()
            .map_err(|source| ConfigError::Invalid { name, source }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("invalid boolean value: {raw}"),
        }),
    }
}
