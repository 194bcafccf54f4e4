//! 클라이언트 설정: 접속 대상, 타임아웃, 디코딩 정책
//!
//! 기본값은 로컬 서비스(`127.0.0.1:8080`)를 가리키며, [`ClientConfig::from_env`]는
//! `.env` 파일과 환경 변수에서 값을 덮어씁니다.
//!
//! | 변수 | 의미 | 기본값 |
//! |---|---|---|
//! | `FLIXWIRE_HOST` | 서버 호스트 | `127.0.0.1` |
//! | `FLIXWIRE_PORT` | 서버 포트 | `8080` |
//! | `FLIXWIRE_CONNECT_TIMEOUT_MS` | 연결 타임아웃 (0 = 없음) | `5000` |
//! | `FLIXWIRE_READ_TIMEOUT_MS` | 읽기 타임아웃 (0 = 없음) | `30000` |
//! | `FLIXWIRE_WRITE_TIMEOUT_MS` | 쓰기 타임아웃 (0 = 없음) | `30000` |
//! | `FLIXWIRE_DECODE_POLICY` | `replace` / `ignore` / `strict` | `replace` |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_HOST, DEFAULT_IO_TIMEOUT_MS, DEFAULT_PORT,
};
use crate::error::{FlixError, Result};
use crate::types::DecodePolicy;

/// [`ProtocolClient`](crate::client::ProtocolClient) 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// `None`이면 OS 기본 연결 타임아웃을 따릅니다.
    pub connect_timeout: Option<Duration>,
    /// `None`이면 응답을 무기한 기다립니다.
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    pub decode_policy: DecodePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: Some(Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS)),
            read_timeout: Some(Duration::from_millis(DEFAULT_IO_TIMEOUT_MS)),
            write_timeout: Some(Duration::from_millis(DEFAULT_IO_TIMEOUT_MS)),
            decode_policy: DecodePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// 호스트와 포트를 지정하고 나머지는 기본값을 사용합니다.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// `.env` 파일을 읽은 뒤 환경 변수에서 설정을 로드합니다.
    ///
    /// `.env` 파일이 없어도 에러가 아닙니다. 값이 잘못된 변수는 [`FlixError::Config`]입니다.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정을 로드합니다 (테스트 및 다른 설정 소스용).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("FLIXWIRE_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "FLIXWIRE_PORT")?.unwrap_or(defaults.port),
            connect_timeout: timeout_var(&lookup, "FLIXWIRE_CONNECT_TIMEOUT_MS")?
                .unwrap_or(defaults.connect_timeout),
            read_timeout: timeout_var(&lookup, "FLIXWIRE_READ_TIMEOUT_MS")?
                .unwrap_or(defaults.read_timeout),
            write_timeout: timeout_var(&lookup, "FLIXWIRE_WRITE_TIMEOUT_MS")?
                .unwrap_or(defaults.write_timeout),
            decode_policy: parse_var(&lookup, "FLIXWIRE_DECODE_POLICY")?
                .unwrap_or(defaults.decode_policy),
        })
    }

    /// `host:port` 형식의 접속 주소를 반환합니다.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }
}

// --- PRIVATE HELPERS ---

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| FlixError::Config { key, value: raw }),
    }
}

/// 밀리초 값을 타임아웃으로 변환합니다. `0`은 "타임아웃 없음"입니다.
fn timeout_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Option<Duration>>> {
    Ok(parse_var::<u64>(lookup, key)?
        .map(|ms| (ms > 0).then(|| Duration::from_millis(ms))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.read_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.decode_policy, DecodePolicy::Replace);
    }

    #[test]
    fn test_from_lookup_empty_uses_defaults() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("FLIXWIRE_HOST", "10.0.0.5"),
            ("FLIXWIRE_PORT", "9090"),
            ("FLIXWIRE_READ_TIMEOUT_MS", "250"),
            ("FLIXWIRE_WRITE_TIMEOUT_MS", "0"),
            ("FLIXWIRE_DECODE_POLICY", "strict"),
        ]))
        .unwrap();
        assert_eq!(config.addr(), "10.0.0.5:9090");
        assert_eq!(config.read_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.write_timeout, None);
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.decode_policy, DecodePolicy::Strict);
    }

    #[test]
    fn test_from_lookup_invalid_port() {
        let err = ClientConfig::from_lookup(lookup_from(&[("FLIXWIRE_PORT", "eighty")]))
            .unwrap_err();
        match err {
            FlixError::Config { key, value } => {
                assert_eq!(key, "FLIXWIRE_PORT");
                assert_eq!(value, "eighty");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_lookup_invalid_policy() {
        let err = ClientConfig::from_lookup(lookup_from(&[("FLIXWIRE_DECODE_POLICY", "lossy")]))
            .unwrap_err();
        assert!(matches!(
            err,
            FlixError::Config {
                key: "FLIXWIRE_DECODE_POLICY",
                ..
            }
        ));
    }

    #[test]
    fn test_builder_setters() {
        let config = ClientConfig::new("example.net", 7000)
            .with_connect_timeout(None)
            .with_read_timeout(Some(Duration::from_millis(10)))
            .with_write_timeout(None)
            .with_decode_policy(DecodePolicy::Ignore);
        assert_eq!(config.addr(), "example.net:7000");
        assert_eq!(config.connect_timeout, None);
        assert_eq!(config.read_timeout, Some(Duration::from_millis(10)));
        assert_eq!(config.decode_policy, DecodePolicy::Ignore);
    }
}
