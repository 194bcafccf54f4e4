//! 프로토콜 전반에서 공유하는 타입 정의입니다.
//!
//! [`MessageType`], [`Frame`], [`DecodePolicy`]와 세션 API가 반환하는
//! 응답 레코드 타입([`Recommendation`], [`PopularMovie`] 등)을 정의합니다.

use serde::Serialize;

use crate::constants::ANONYMOUS_ID;
use crate::error::FlixError;

/// 요청/응답 메시지 타입 코드
///
/// 양쪽 피어가 미리 알고 있는 고정 집합이며 협상 과정은 없습니다.
/// 코드 9는 과거 장르 검색 요청에 쓰였으나 현재 서비스는 처리하지 않으므로 정의하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(i32)]
pub enum MessageType {
    // 요청
    Login = 1,
    Register = 2,
    GetRecommendations = 3,
    SearchMovies = 4,
    AddRating = 5,
    GetPopular = 6,
    GetUserRatings = 7,
    GetMovieDetails = 8,
    GetAllGenres = 10,
    GetMoviesByGenre = 11,
    ChangePassword = 12,
    GetColdStart = 13,
    Logout = 14,

    // 응답
    Success = 100,
    Error = 101,
}

impl MessageType {
    /// 와이어 상의 정수 코드를 반환합니다.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// 응답 타입(`Success`/`Error`)인지 확인합니다.
    pub fn is_response(self) -> bool {
        matches!(self, MessageType::Success | MessageType::Error)
    }
}

impl TryFrom<i32> for MessageType {
    type Error = FlixError;

    fn try_from(code: i32) -> Result<Self, FlixError> {
        match code {
            1 => Ok(MessageType::Login),
            2 => Ok(MessageType::Register),
            3 => Ok(MessageType::GetRecommendations),
            4 => Ok(MessageType::SearchMovies),
            5 => Ok(MessageType::AddRating),
            6 => Ok(MessageType::GetPopular),
            7 => Ok(MessageType::GetUserRatings),
            8 => Ok(MessageType::GetMovieDetails),
            10 => Ok(MessageType::GetAllGenres),
            11 => Ok(MessageType::GetMoviesByGenre),
            12 => Ok(MessageType::ChangePassword),
            13 => Ok(MessageType::GetColdStart),
            14 => Ok(MessageType::Logout),
            100 => Ok(MessageType::Success),
            101 => Ok(MessageType::Error),
            _ => Err(FlixError::UnknownMessageType { code }),
        }
    }
}

/// 페이로드 UTF-8 디코딩 정책
///
/// 잘못된 UTF-8 바이트 시퀀스를 만났을 때의 처리 방식을 명시적으로 선택합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// 잘못된 시퀀스를 U+FFFD로 치환 (기본값)
    #[default]
    Replace,
    /// 잘못된 시퀀스를 버림
    Ignore,
    /// 잘못된 시퀀스가 있으면 [`FlixError::InvalidUtf8`] 반환
    Strict,
}

impl std::str::FromStr for DecodePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(DecodePolicy::Replace),
            "ignore" => Ok(DecodePolicy::Ignore),
            "strict" => Ok(DecodePolicy::Strict),
            _ => Err(()),
        }
    }
}

/// 디코딩된 프레임 한 개
///
/// `kind`는 원시 정수 코드를 보존합니다. 알 수 없는 응답 코드도 연결을 끊지 않고
/// 호출자에게 전달하기 위해서이며, 해석은 [`Frame::message_type`]으로 합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 메시지 타입 코드
    pub kind: i32,
    /// 발신자 ID (인증 전 0)
    pub originator: i32,
    /// 0-패딩이 제거된 페이로드 텍스트
    pub payload: String,
}

impl Frame {
    /// 새 프레임을 생성합니다.
    pub fn new(kind: MessageType, originator: i32, payload: impl Into<String>) -> Self {
        Self {
            kind: kind.code(),
            originator,
            payload: payload.into(),
        }
    }

    /// 인증 전(발신자 ID 0) 프레임을 생성합니다.
    pub fn anonymous(kind: MessageType, payload: impl Into<String>) -> Self {
        Self::new(kind, ANONYMOUS_ID, payload)
    }

    /// 타입 코드를 [`MessageType`]으로 해석합니다.
    pub fn message_type(&self) -> Result<MessageType, FlixError> {
        MessageType::try_from(self.kind)
    }

    /// 응답 코드가 `SUCCESS`인지 확인합니다.
    pub fn is_success(&self) -> bool {
        self.kind == MessageType::Success.code()
    }

    /// 응답 코드가 `ERROR`인지 확인합니다.
    pub fn is_error(&self) -> bool {
        self.kind == MessageType::Error.code()
    }
}

/// 애플리케이션 수준 응답
///
/// 서버가 요청을 이해하고 처리한 결과입니다. `Rejected`는 전송 장애가 아니라
/// 서버가 `ERROR` 코드와 함께 돌려준 사람이 읽을 수 있는 사유입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Reply<T> {
    Accepted(T),
    Rejected(String),
}

impl<T> Reply<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Reply::Accepted(_))
    }

    /// 수락된 값을 반환합니다 (거부 시 `None`).
    pub fn accepted(self) -> Option<T> {
        match self {
            Reply::Accepted(v) => Some(v),
            Reply::Rejected(_) => None,
        }
    }

    /// 거부 사유를 반환합니다 (수락 시 `None`).
    pub fn rejection(&self) -> Option<&str> {
        match self {
            Reply::Accepted(_) => None,
            Reply::Rejected(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Accepted(v) => Reply::Accepted(f(v)),
            Reply::Rejected(reason) => Reply::Rejected(reason),
        }
    }
}

/// 로그인/회원가입 성공 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// 서버가 할당한 사용자 ID (프레임의 발신자 ID 필드)
    pub user_id: i32,
    /// 서버 확인 메시지 (비어 있을 수 있음)
    pub message: String,
}

/// 개인화 추천 레코드: `<movieId>|<title>|<matchScorePercent>|<avgRating>|<genres>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie_id: i32,
    pub title: String,
    pub match_score: f32,
    pub avg_rating: f32,
    pub genres: Vec<String>,
}

/// 콜드 스타트 추천 레코드: `<movieId>|<title>|<rating>|<genres?>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColdStartPick {
    pub movie_id: i32,
    pub title: String,
    pub avg_rating: f32,
    pub genres: Vec<String>,
}

/// 추천 결과: 개인화 추천 또는 콜드 스타트 대체 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "items", rename_all = "snake_case")]
pub enum Recommendations {
    Personalized(Vec<Recommendation>),
    ColdStart(Vec<ColdStartPick>),
}

impl Recommendations {
    pub fn len(&self) -> usize {
        match self {
            Recommendations::Personalized(items) => items.len(),
            Recommendations::ColdStart(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 제목 검색 결과 레코드: `<movieId>|<title>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub movie_id: i32,
    pub title: String,
}

/// 인기 영화 레코드: `<movieId>|<title>|<avgRating>|<ratingCount>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularMovie {
    pub movie_id: i32,
    pub title: String,
    pub avg_rating: f32,
    pub rating_count: u32,
}

/// 사용자 평점 레코드: `<movieId>|<rating>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRating {
    pub movie_id: i32,
    pub rating: f32,
}

/// 영화 상세 정보: `<movieId>|<title>|<avgRating>|<ratingCount?>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetails {
    pub movie_id: i32,
    pub title: String,
    pub avg_rating: f32,
    pub rating_count: Option<u32>,
}
