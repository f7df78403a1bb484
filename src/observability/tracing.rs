use anyhow::{Error, Result};
use once_cell::sync::OnceCell;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Tracing サブスクライバを一度だけ初期化する。
///
/// `RUST_LOG_FORMAT` が未設定または `json` のときは JSON、それ以外は人間向けの書式で出力する。
///
/// # Errors
/// サブスクライバの初期化に失敗した場合はエラーを返す。
pub fn init() -> Result<()> {
    TRACING_INIT.get_or_try_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let use_json = json_requested(std::env::var("RUST_LOG_FORMAT").ok().as_deref());

        if use_json {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .json()
                        .flatten_event(true)
                        .with_current_span(true),
                )
                .try_init()
                .map_err(|e: tracing_subscriber::util::TryInitError| Error::msg(e.to_string()))?;
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer())
                .try_init()
                .map_err(|e: tracing_subscriber::util::TryInitError| Error::msg(e.to_string()))?;
        }
        info!(json = use_json, "tracing initialized");

        Ok::<(), Error>(())
    })?;
    Ok(())
}

fn json_requested(format: Option<&str>) -> bool {
    format.is_none_or(|value| value.eq_ignore_ascii_case("json"))
}
