//! # flixwire
//!
//! 영화 추천 서비스의 고정 프레임 바이너리 TCP 프로토콜 클라이언트 라이브러리.
//!
//! 모든 요청과 응답은 8,200바이트 프레임 하나입니다:
//!
//! | 오프셋 | 크기 | 필드 | 인코딩 |
//! |---|---|---|---|
//! | 0 | 4 | 메시지 타입 | i32, native endian |
//! | 4 | 4 | 발신자 ID | i32, native endian |
//! | 8 | 8192 | 페이로드 | UTF-8, 0-패딩 |
//!
//! ## 모듈 구조
//!
//! - [`constants`]: 프레임 크기, 기본 접속 정보, 검증 한도
//! - [`error`]: 에러 타입 계층 구조 ([`FlixError`])
//! - [`types`]: 공유 타입 정의 ([`MessageType`], [`Frame`], [`Reply`] 등)
//! - [`wire`]: 저수준 바이너리 I/O ([`BufReader`](wire::BufReader), [`BufWriter`](wire::BufWriter))
//! - [`codec`]: 프레임 인코딩/디코딩 + 페이로드 필드/레코드 포맷
//! - [`config`]: 클라이언트 설정 ([`ClientConfig`])
//! - [`client`]: TCP 클라이언트 (연결 수명 + 요청/응답 교환) *(feature `"client"` 활성화 시)*
//! - [`session`]: 세션 컨텍스트와 메시지별 API *(feature `"client"` 활성화 시)*
//!
//! ## 사용 예시
//!
//! ```rust
//! use flixwire::codec::{build_request, decode_frame};
//! use flixwire::constants::FRAME_SIZE;
//! use flixwire::{DecodePolicy, MessageType};
//!
//! let buf = build_request(MessageType::Login, 0, "alice|secret1").unwrap();
//! assert_eq!(buf.len(), FRAME_SIZE);
//!
//! let frame = decode_frame(&buf, DecodePolicy::Replace).unwrap();
//! assert_eq!(frame.message_type().unwrap(), MessageType::Login);
//! assert_eq!(frame.payload, "alice|secret1");
//! ```

#[cfg(feature = "client")]
pub mod client;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
#[cfg(feature = "client")]
pub mod session;
pub mod types;
pub mod wire;

// NOTE: Selective re-export, only commonly used types
pub use config::ClientConfig;
pub use error::{FlixError, Result};
pub use types::{
    Account, ColdStartPick, DecodePolicy, Frame, MessageType, MovieDetails, PopularMovie,
    Recommendation, Recommendations, Reply, SearchHit, UserRating,
};

#[cfg(feature = "client")]
pub use client::{AbortHandle, ProtocolClient};
#[cfg(feature = "client")]
pub use session::Session;
