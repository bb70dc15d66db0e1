/*
 * Responsibility
 * - 環境変数からの設定読み込み (ISSUER / AUDIENCE / 署名鍵 / Gate の構成方式など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// HS256 requires a key at least as long as the hash output.
const MIN_SECRET_LEN: usize = 32;

const DEFAULT_TTL_SECONDS: u64 = 3600; // 1 hour

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Where the authenticate/authorize stages run for `POST /online-store`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateComposition {
    /// The handler calls the gate itself before touching the order.
    Inline,
    /// The gate stages are middleware layers in front of the handler.
    Staged,
}

impl FromStr for GateComposition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "staged" | "pipeline" => Ok(Self::Staged),
            _ => Err(ConfigError::Invalid("GATE_COMPOSITION")),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub auth_signing_secret: Vec<u8>,
    pub access_token_ttl_seconds: u64,
    pub access_token_leeway_seconds: u64,
    pub validate_issuer_audience: bool,

    pub gate_composition: GateComposition,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("auth_issuer", &self.auth_issuer)
            .field("auth_audience", &self.auth_audience)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("access_token_leeway_seconds", &self.access_token_leeway_seconds)
            .field("validate_issuer_audience", &self.validate_issuer_audience)
            .field("gate_composition", &self.gate_composition)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let auth_issuer =
            std::env::var("AUTH_ISSUER").map_err(|_| ConfigError::Missing("AUTH_ISSUER"))?;

        let auth_audience =
            std::env::var("AUTH_AUDIENCE").map_err(|_| ConfigError::Missing("AUTH_AUDIENCE"))?;

        let auth_signing_secret = std::env::var("AUTH_SIGNING_SECRET")
            .map_err(|_| ConfigError::Missing("AUTH_SIGNING_SECRET"))?
            .into_bytes();
        if auth_signing_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid("AUTH_SIGNING_SECRET"));
        }

        let access_token_ttl_seconds =
            parse_ttl(std::env::var("ACCESS_TOKEN_TTL_SECONDS").ok().as_deref())?;

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let validate_issuer_audience = match std::env::var("AUTH_VALIDATE_ISSUER_AUDIENCE") {
            Ok(v) => parse_bool(&v).ok_or(ConfigError::Invalid("AUTH_VALIDATE_ISSUER_AUDIENCE"))?,
            Err(_) => true,
        };

        let gate_composition = match std::env::var("GATE_COMPOSITION") {
            Ok(v) => v.parse()?,
            Err(_) => GateComposition::Staged,
        };

        Ok(Self {
            addr,
            app_env,
            auth_issuer,
            auth_audience,
            auth_signing_secret,
            access_token_ttl_seconds,
            access_token_leeway_seconds,
            validate_issuer_audience,
            gate_composition,
        })
    }
}

/// `exp = now + ttl` is computed in i64 seconds, so the ttl must fit in one.
fn parse_ttl(v: Option<&str>) -> Result<u64, ConfigError> {
    let Some(v) = v else {
        return Ok(DEFAULT_TTL_SECONDS);
    };

    v.trim()
        .parse::<u64>()
        .ok()
        .filter(|ttl| *ttl > 0 && i64::try_from(*ttl).is_ok())
        .ok_or(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
