//! 세션 모듈: 로그인 상태와 메시지 타입별 요청/응답 처리
//!
//! [`Session`]은 사용자 세션 하나의 컨텍스트 객체입니다. 전역 상태 대신 호출자가
//! 명시적으로 들고 다니며, [`ProtocolClient`]를 필드로 소유합니다.
//!
//! 각 메서드는 요청 페이로드를 빌드하고, 응답이 `SUCCESS`면 레코드를 파싱해
//! [`Reply::Accepted`]로, `ERROR`면 서버 사유를 [`Reply::Rejected`]로 반환합니다.
//! 전송 장애만 `Err`로 반환됩니다.

use tracing::{debug, info, warn};

use crate::client::ProtocolClient;
use crate::codec::{
    change_password_payload, credentials_payload, decimal_payload, parse_cold_start,
    parse_genres, parse_movie_details, parse_movie_ids, parse_popular, parse_recommendations,
    parse_search_hits, parse_user_ratings, rating_payload,
};
use crate::config::ClientConfig;
use crate::constants::{
    ANONYMOUS_ID, DEFAULT_POPULAR_COUNT, MAX_RATING, MAX_RECOMMENDATIONS, MAX_USERNAME_LEN, MIN_PASSWORD_LEN,
    MIN_RATING, MIN_RECOMMENDATIONS, MIN_USERNAME_LEN,
};
use crate::error::{FlixError, Result};
use crate::types::{
    Account, ColdStartPick, Frame, MessageType, MovieDetails, PopularMovie, Recommendation,
    Recommendations, Reply, SearchHit, UserRating,
};

/// 로그인된 사용자 정보
#[derive(Debug, Clone, PartialEq, Eq)]
struct SignedIn {
    user_id: i32,
    username: String,
}

/// 사용자 세션 컨텍스트
///
/// # 예시
///
/// ```no_run
/// use flixwire::config::ClientConfig;
/// use flixwire::session::Session;
/// use flixwire::types::{Recommendations, Reply};
///
/// # fn example() -> flixwire::Result<()> {
/// let mut session = Session::new(ClientConfig::default());
/// match session.login("alice", "secret1")? {
///     Reply::Accepted(account) => println!("user id {}", account.user_id),
///     Reply::Rejected(reason) => println!("login failed: {reason}"),
/// }
/// if let Reply::Accepted(recs) = session.recommendations_or_cold_start(10)? {
///     println!("{} movies", recs.len());
/// }
/// session.logout();
/// # Ok(())
/// # }
/// ```
pub struct Session {
    client: ProtocolClient,
    user: Option<SignedIn>,
}

impl Session {
    /// 새 세션을 생성합니다. 연결은 첫 요청 시 수립됩니다.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(ProtocolClient::new(config))
    }

    /// 기존 클라이언트로 세션을 생성합니다.
    pub fn with_client(client: ProtocolClient) -> Self {
        Self { client, user: None }
    }

    pub fn client(&self) -> &ProtocolClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ProtocolClient {
        &mut self.client
    }

    /// 세션을 해제하고 내부 클라이언트를 반환합니다.
    pub fn into_client(self) -> ProtocolClient {
        self.client
    }

    /// 현재 발신자 ID (로그인 전 0)
    pub fn user_id(&self) -> i32 {
        self.user.as_ref().map_or(ANONYMOUS_ID, |u| u.user_id)
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// 로그인합니다. 성공 시 응답 프레임의 발신자 ID가 세션의 사용자 ID가 됩니다.
    ///
    /// # 에러
    ///
    /// - [`FlixError::InvalidInput`]: 사용자명 또는 비밀번호가 비어 있음
    /// - [`ProtocolClient::send`]의 전송 에러
    pub fn login(&mut self, username: &str, password: &str) -> Result<Reply<Account>> {
        require_non_empty("username", username)?;
        require_non_empty("password", password)?;

        let payload = credentials_payload(username, password);
        let reply = self.exchange(MessageType::Login, ANONYMOUS_ID, &payload, |frame| {
            Ok(Account {
                user_id: frame.originator,
                message: frame.payload.clone(),
            })
        })?;

        if let Reply::Accepted(account) = &reply {
            info!("signed in as user {}", account.user_id);
            self.user = Some(SignedIn {
                user_id: account.user_id,
                username: username.to_string(),
            });
        }
        Ok(reply)
    }

    /// 회원가입합니다. 로그인 상태는 바뀌지 않습니다.
    ///
    /// 사용자명은 3~63자, 비밀번호는 6자 이상이어야 합니다.
    pub fn register(&mut self, username: &str, password: &str) -> Result<Reply<Account>> {
        validate_username(username)?;
        validate_password("password", password)?;

        let payload = credentials_payload(username, password);
        self.exchange(MessageType::Register, ANONYMOUS_ID, &payload, |frame| {
            Ok(Account {
                user_id: frame.originator,
                message: frame.payload.clone(),
            })
        })
    }

    /// 개인화 추천을 요청합니다. `count`는 1~20으로 보정됩니다.
    ///
    /// 빈 목록은 "추천할 이력이 없음"을 뜻합니다. 이 경우
    /// [`cold_start`](Self::cold_start)로 대체하거나
    /// [`recommendations_or_cold_start`](Self::recommendations_or_cold_start)를 사용하세요.
    pub fn recommendations(&mut self, count: u32) -> Result<Reply<Vec<Recommendation>>> {
        let user_id = self.require_user()?;
        let count = clamp_recommendation_count(count);
        self.exchange(
            MessageType::GetRecommendations,
            user_id,
            &decimal_payload(count),
            |frame| {
                let mut recs = parse_recommendations(&frame.payload)?;
                recs.truncate(count as usize);
                Ok(recs)
            },
        )
    }

    /// 콜드 스타트 추천(장르별 상위 평점 영화)을 요청합니다.
    pub fn cold_start(&mut self) -> Result<Reply<Vec<ColdStartPick>>> {
        let user_id = self.require_user()?;
        self.exchange(MessageType::GetColdStart, user_id, "", |frame| {
            parse_cold_start(&frame.payload)
        })
    }

    /// 개인화 추천을 요청하고, 결과가 비어 있으면 콜드 스타트 추천으로 대체합니다.
    pub fn recommendations_or_cold_start(&mut self, count: u32) -> Result<Reply<Recommendations>> {
        match self.recommendations(count)? {
            Reply::Rejected(reason) => Ok(Reply::Rejected(reason)),
            Reply::Accepted(recs) if !recs.is_empty() => {
                Ok(Reply::Accepted(Recommendations::Personalized(recs)))
            }
            Reply::Accepted(_) => {
                debug!("no personalized recommendations, falling back to cold start");
                Ok(self.cold_start()?.map(Recommendations::ColdStart))
            }
        }
    }

    /// 제목으로 영화를 검색합니다.
    pub fn search(&mut self, query: &str) -> Result<Reply<Vec<SearchHit>>> {
        let user_id = self.require_user()?;
        self.exchange(MessageType::SearchMovies, user_id, query, |frame| {
            parse_search_hits(&frame.payload)
        })
    }

    /// 평점을 등록합니다. 평점은 1.0~5.0 범위여야 합니다.
    pub fn add_rating(&mut self, movie_id: i32, rating: f32) -> Result<Reply<()>> {
        let user_id = self.require_user()?;
        validate_rating(rating)?;
        self.exchange(
            MessageType::AddRating,
            user_id,
            &rating_payload(movie_id, rating),
            |_| Ok(()),
        )
    }

    /// 인기 영화 목록을 요청합니다.
    pub fn popular(&mut self, count: u32) -> Result<Reply<Vec<PopularMovie>>> {
        let user_id = self.require_user()?;
        if count == 0 {
            return Err(FlixError::InvalidInput {
                field: "count",
                reason: "must be at least 1".to_string(),
            });
        }
        self.exchange(MessageType::GetPopular, user_id, &decimal_payload(count), |frame| {
            parse_popular(&frame.payload)
        })
    }

    /// 기본 개수(15편)로 인기 영화 목록을 요청합니다.
    pub fn popular_default(&mut self) -> Result<Reply<Vec<PopularMovie>>> {
        self.popular(DEFAULT_POPULAR_COUNT)
    }

    /// 현재 사용자의 평점 목록을 요청합니다.
    pub fn user_ratings(&mut self) -> Result<Reply<Vec<UserRating>>> {
        let user_id = self.require_user()?;
        self.exchange(MessageType::GetUserRatings, user_id, "", |frame| {
            parse_user_ratings(&frame.payload)
        })
    }

    /// 영화 상세 정보를 요청합니다.
    pub fn movie_details(&mut self, movie_id: i32) -> Result<Reply<MovieDetails>> {
        let user_id = self.require_user()?;
        self.exchange(
            MessageType::GetMovieDetails,
            user_id,
            &decimal_payload(movie_id),
            |frame| parse_movie_details(&frame.payload),
        )
    }

    /// 전체 장르 목록을 요청합니다.
    pub fn genres(&mut self) -> Result<Reply<Vec<String>>> {
        let user_id = self.require_user()?;
        self.exchange(MessageType::GetAllGenres, user_id, "", |frame| {
            parse_genres(&frame.payload)
        })
    }

    /// 장르에 속한 영화 ID 목록을 요청합니다.
    pub fn movies_by_genre(&mut self, genre: &str) -> Result<Reply<Vec<i32>>> {
        let user_id = self.require_user()?;
        require_non_empty("genre", genre)?;
        self.exchange(MessageType::GetMoviesByGenre, user_id, genre, |frame| {
            parse_movie_ids(&frame.payload)
        })
    }

    /// 비밀번호를 변경합니다. 새 비밀번호는 6자 이상이어야 합니다.
    pub fn change_password(&mut self, old_password: &str, new_password: &str) -> Result<Reply<()>> {
        let user_id = self.require_user()?;
        require_non_empty("old password", old_password)?;
        validate_password("new password", new_password)?;
        self.exchange(
            MessageType::ChangePassword,
            user_id,
            &change_password_payload(old_password, new_password),
            |_| Ok(()),
        )
    }

    /// 로그아웃합니다.
    ///
    /// 서버 응답과 관계없이 로컬 세션 상태는 항상 초기화됩니다. 전송 에러는 로그로만
    /// 남기며, 서버가 로그아웃을 확인했으면 `true`를 반환합니다.
    pub fn logout(&mut self) -> bool {
        let Some(user) = self.user.take() else {
            return false;
        };

        match self.client.send(MessageType::Logout, user.user_id, "") {
            Ok(frame) if frame.is_success() => {
                info!("user {} signed out", user.user_id);
                true
            }
            Ok(frame) => {
                warn!("logout of user {} rejected: {}", user.user_id, frame.payload);
                false
            }
            Err(e) => {
                warn!("logout of user {} not delivered: {}", user.user_id, e);
                false
            }
        }
    }

    fn require_user(&self) -> Result<i32> {
        self.user
            .as_ref()
            .map(|u| u.user_id)
            .ok_or(FlixError::NotAuthenticated)
    }

    /// 요청을 보내고 응답 코드에 따라 [`Reply`]로 변환합니다.
    fn exchange<T>(
        &mut self,
        kind: MessageType,
        originator: i32,
        payload: &str,
        parse: impl FnOnce(&Frame) -> Result<T>,
    ) -> Result<Reply<T>> {
        let frame = self.client.send(kind, originator, payload)?;
        if frame.is_success() {
            Ok(Reply::Accepted(parse(&frame)?))
        } else if frame.is_error() {
            debug!("{:?} rejected by server", kind);
            Ok(Reply::Rejected(frame.payload))
        } else {
            Err(FlixError::UnexpectedReply {
                request: kind,
                code: frame.kind,
            })
        }
    }
}

// --- VALIDATION ---

fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(FlixError::InvalidInput {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(FlixError::InvalidInput {
            field: "username",
            reason: format!(
                "must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters, got {len}"
            ),
        });
    }
    Ok(())
}

fn validate_password(field: &'static str, password: &str) -> Result<()> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(FlixError::InvalidInput {
            field,
            reason: format!("must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }
    Ok(())
}

fn validate_rating(rating: f32) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(FlixError::InvalidInput {
            field: "rating",
            reason: format!("must be between {MIN_RATING:.1} and {MAX_RATING:.1}, got {rating}"),
        });
    }
    Ok(())
}

fn clamp_recommendation_count(count: u32) -> u32 {
    count.clamp(MIN_RECOMMENDATIONS, MAX_RECOMMENDATIONS)
}
