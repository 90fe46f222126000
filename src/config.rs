//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` (or the path given with `-f`), then applies
//! env overrides. The LLM API key only ever comes from `OPENROUTER_API_KEY`.

use std::{
    env, fs,
    path::Path,
};

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Application identity, sent to the LLM gateway as `X-Title` / `HTTP-Referer`
/// and used as the allowed CORS origin.
#[derive(Debug, Clone)]
pub struct AppIdentity {
    pub name: String,
    /// Public URL of the frontend.
    pub url: String,
}

/// OpenAI-compatible provider configuration (`[llm.openai]`).
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature (ignored for models that forbid it).
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"openai"` or `"dummy"`).
    pub provider: String,
    pub openai: OpenAiConfig,
}

/// Open-Meteo endpoints used by the weather tool (`[weather]`).
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    /// Applied to each of the two calls separately.
    pub timeout_seconds: u64,
}

/// HTTP channel configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub enabled: bool,
    /// Socket address to bind the HTTP channel to.
    pub bind: String,
}

/// Console channel configuration.
#[derive(Debug, Clone)]
pub struct PtyConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct CommsConfig {
    pub pty: PtyConfig,
    pub http: HttpConfig,
}

/// Fully-resolved configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppIdentity,
    pub log_level: String,
    pub llm: LlmConfig,
    pub weather: WeatherConfig,
    pub comms: CommsConfig,
    /// From `OPENROUTER_API_KEY`. Never sourced from TOML.
    pub llm_api_key: Option<String>,
}

impl Config {
    pub fn comms_pty_should_load(&self) -> bool {
        self.comms.pty.enabled
    }

    pub fn comms_http_should_load(&self) -> bool {
        self.comms.http.enabled
    }
}

/// Values read from the process environment.
///
/// Tests build this directly instead of mutating env vars.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub app_url: Option<String>,
    pub app_name: Option<String>,
    pub log_level: Option<String>,
    pub http_bind: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var("OPENROUTER_API_KEY"),
            model: non_empty_var("OPENROUTER_MODEL"),
            app_url: non_empty_var("APP_URL"),
            app_name: non_empty_var("APP_NAME"),
            log_level: non_empty_var("SANCHAI_LOG_LEVEL"),
            http_bind: non_empty_var("SANCHAI_HTTP_BIND"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// ── Raw TOML shape ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    app: RawApp,
    #[serde(default)]
    llm: RawLlm,
    #[serde(default)]
    weather: RawWeather,
    #[serde(default)]
    comms: RawComms,
}

#[derive(Deserialize)]
struct RawApp {
    #[serde(default = "default_app_name")]
    name: String,
    #[serde(default = "default_app_url")]
    url: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawApp {
    fn default() -> Self {
        Self { name: default_app_name(), url: default_app_url(), log_level: default_log_level() }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), openai: RawOpenAiConfig::default() }
    }
}

#[derive(Deserialize)]
struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default = "default_openai_temperature")]
    temperature: f32,
    #[serde(default = "default_openai_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_openai_temperature(),
            timeout_seconds: default_openai_timeout_seconds(),
        }
    }
}

#[derive(Deserialize)]
struct RawWeather {
    #[serde(default = "default_geocoding_url")]
    geocoding_url: String,
    #[serde(default = "default_forecast_url")]
    forecast_url: String,
    #[serde(default = "default_weather_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawWeather {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_seconds: default_weather_timeout_seconds(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawComms {
    #[serde(default)]
    pty: RawPty,
    #[serde(default)]
    http: RawHttp,
}

#[derive(Deserialize)]
struct RawPty {
    /// Defaults to `false`: the console is switched on with `-i`.
    #[serde(default = "default_false")]
    enabled: bool,
}

impl Default for RawPty {
    fn default() -> Self {
        Self { enabled: false }
    }
}

#[derive(Deserialize)]
struct RawHttp {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_http_bind")]
    bind: String,
}

impl Default for RawHttp {
    fn default() -> Self {
        Self { enabled: true, bind: default_http_bind() }
    }
}

fn default_app_name() -> String { "SanchAI Weather".to_string() }
fn default_app_url() -> String { "http://localhost:5173".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_llm_provider() -> String { "openai".to_string() }
fn default_openai_api_base_url() -> String { "https://openrouter.ai/api/v1/chat/completions".to_string() }
fn default_openai_model() -> String { "openai/gpt-4o-mini".to_string() }
fn default_openai_temperature() -> f32 { 0.2 }
fn default_openai_timeout_seconds() -> u64 { 60 }
fn default_geocoding_url() -> String { "https://geocoding-api.open-meteo.com/v1/search".to_string() }
fn default_forecast_url() -> String { "https://api.open-meteo.com/v1/forecast".to_string() }
fn default_weather_timeout_seconds() -> u64 { 10 }
fn default_http_bind() -> String { "127.0.0.1:8000".to_string() }
fn default_true() -> bool { true }
fn default_false() -> bool { false }

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load config from `path` (or [`DEFAULT_CONFIG_PATH`]), then apply env overrides.
pub fn load(path: Option<&str>) -> Result<Config, AppError> {
    let path = Path::new(path.unwrap_or(DEFAULT_CONFIG_PATH));
    load_from(path, &EnvOverrides::from_env())
}

/// Internal loader — explicit path and overrides.
pub fn load_from(path: &Path, env: &EnvOverrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    parse(&raw, env).map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))
}

fn parse(raw: &str, env: &EnvOverrides) -> Result<Config, toml::de::Error> {
    let parsed: RawConfig = toml::from_str(raw)?;
    let EnvOverrides { api_key, model, app_url, app_name, log_level, http_bind } = env.clone();

    Ok(Config {
        app: AppIdentity {
            name: app_name.unwrap_or(parsed.app.name),
            url: app_url.unwrap_or(parsed.app.url),
        },
        log_level: log_level.unwrap_or(parsed.app.log_level),
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                model: model.unwrap_or(parsed.llm.openai.model),
                temperature: parsed.llm.openai.temperature,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
            },
        },
        weather: WeatherConfig {
            geocoding_url: parsed.weather.geocoding_url,
            forecast_url: parsed.weather.forecast_url,
            timeout_seconds: parsed.weather.timeout_seconds,
        },
        comms: CommsConfig {
            pty: PtyConfig { enabled: parsed.comms.pty.enabled },
            http: HttpConfig {
                enabled: parsed.comms.http.enabled,
                bind: http_bind.unwrap_or(parsed.comms.http.bind),
            },
        },
        llm_api_key: api_key,
    })
}

/// Safe `Config` for unit tests — dummy LLM, no API key, unroutable endpoints.
#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        parse("", &EnvOverrides::default())
            .map(|mut cfg| {
                cfg.llm.provider = "dummy".into();
                cfg.llm.openai.api_base_url = "http://localhost:0/v1/chat/completions".into();
                cfg.weather.geocoding_url = "http://localhost:0/v1/search".into();
                cfg.weather.forecast_url = "http://localhost:0/v1/forecast".into();
                cfg.weather.timeout_seconds = 1;
                cfg
            })
            .expect("empty TOML parses")
    }
}
