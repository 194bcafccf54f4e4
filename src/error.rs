//! flixwire 클라이언트의 에러 타입 계층 구조를 정의합니다.
//!
//! 모든 에러는 [`FlixError`] enum으로 표현되며, [`thiserror`]를 통해
//! `Display` 및 `Error` 트레이트가 자동 구현됩니다.
//!
//! 서버가 `ERROR` 응답 프레임을 돌려준 경우는 전송 장애가 아니므로 이 타입으로
//! 표현하지 않습니다. 원시 [`send`](crate::client::ProtocolClient::send)는 해당 프레임을
//! 그대로 반환하고, 세션 API는 [`Reply::Rejected`](crate::types::Reply::Rejected)를 반환합니다.

use std::io;

use crate::types::MessageType;

/// flixwire 클라이언트의 최상위 에러 타입
///
/// 연결 수립 실패, 통신 실패, 프레임 인코딩/디코딩 실패, 입력 검증 실패를 모두 포괄합니다.
/// 소켓 관련 변형은 feature `"client"` 활성화 시에만 포함됩니다.
#[derive(Debug, thiserror::Error)]
pub enum FlixError {
    /// 표준 I/O 에러 래핑 (소켓 외 경로)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TCP 연결 수립 실패 (거부, 도달 불가, DNS 실패 등)
    #[cfg(feature = "client")]
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// 수립된 연결에서 송수신 중 발생한 I/O 실패 (연결은 무효화됩니다)
    #[cfg(feature = "client")]
    #[error("communication error during {op}: {source}")]
    Communication {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// 읽기/쓰기 타임아웃 만료 (연결은 무효화됩니다)
    #[cfg(feature = "client")]
    #[error("timed out during {op}")]
    Timeout { op: &'static str },

    /// 응답 프레임을 다 받기 전에 상대가 연결을 닫음 (연결은 무효화됩니다)
    ///
    /// 헤더만 도착한 잘린 프레임도 여기에 해당하며, 일부 데이터는 버려집니다.
    #[cfg(feature = "client")]
    #[error("connection closed by peer after {received} of {expected} frame bytes")]
    ConnectionClosed { received: usize, expected: usize },

    /// 요청 페이로드가 고정 페이로드 영역을 초과함 (전송 전 검출)
    #[error("payload too large: {size} bytes exceeds {limit} byte limit")]
    OversizePayload { size: usize, limit: usize },

    /// 버퍼 끝에 도달하여 필요한 바이트를 읽을 수 없음
    #[error(
        "unexpected end of buffer at offset {offset}: need {needed} bytes, only {available} remaining"
    )]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// 프레임 버퍼 쓰기 시 고정 크기 초과
    #[error(
        "buffer overflow at offset {offset}: writing {needed} bytes exceeds {limit} byte limit"
    )]
    BufferOverflow {
        offset: usize,
        needed: usize,
        limit: usize,
    },

    /// 알 수 없는 메시지 타입 코드
    #[error("unknown message type code: {code}")]
    UnknownMessageType { code: i32 },

    /// 응답 프레임의 타입 코드가 `SUCCESS`/`ERROR`가 아님
    #[error("unexpected reply code {code} to {request:?} request")]
    UnexpectedReply { request: MessageType, code: i32 },

    /// 엄격 디코딩 정책에서 UTF-8 디코딩 실패
    #[error("invalid UTF-8 in payload at offset {offset}: {detail}")]
    InvalidUtf8 { offset: usize, detail: String },

    /// 페이로드 필드의 잘못된 이스케이프 시퀀스
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    /// 응답 레코드 파싱 실패
    #[error("malformed {kind} record {line:?}: {detail}")]
    MalformedRecord {
        kind: &'static str,
        line: String,
        detail: String,
    },

    /// 클라이언트 측 입력 검증 실패 (전송하지 않음)
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    /// 인증되지 않은 상태에서 요청 시도
    #[error("not authenticated: must login first")]
    NotAuthenticated,

    /// 환경 설정 값 파싱 실패
    #[error("invalid configuration value for {key}: {value:?}")]
    Config { key: &'static str, value: String },
}

impl FlixError {
    /// 수립된 연결의 송수신 장애인지 확인합니다 (연결이 무효화된 경우).
    pub fn is_communication(&self) -> bool {
        match self {
            #[cfg(feature = "client")]
            FlixError::Communication { .. }
            | FlixError::Timeout { .. }
            | FlixError::ConnectionClosed { .. } => true,
            _ => false,
        }
    }

    /// 같은 요청을 다시 보내면 재연결 후 성공할 수 있는 전송 장애인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        match self {
            #[cfg(feature = "client")]
            FlixError::Connect { .. } => true,
            other => other.is_communication(),
        }
    }
}

/// [`FlixError`]를 사용하는 편의 Result 타입 별칭
pub type Result<T> = std::result::Result<T, FlixError>;
