//! 프레임 크기, 기본 접속 정보, 타임아웃, 입력 검증 한도 등의 상수를 정의합니다.

/// 메시지 타입 코드 필드 크기 (4 바이트, native endian i32)
pub const TYPE_FIELD_SIZE: usize = 4;

/// 발신자 ID 필드 크기 (4 바이트, native endian i32)
pub const ORIGINATOR_FIELD_SIZE: usize = 4;

/// 프레임 헤더 크기 (타입 + 발신자 ID = 8 바이트)
pub const HEADER_SIZE: usize = TYPE_FIELD_SIZE + ORIGINATOR_FIELD_SIZE;

/// 페이로드 영역의 고정 크기 (8,192 바이트, 0-패딩)
pub const PAYLOAD_SIZE: usize = 8192;

/// 요청/응답 공통 고정 프레임 크기 (8,200 바이트)
pub const FRAME_SIZE: usize = HEADER_SIZE + PAYLOAD_SIZE;

/// 인증 전 발신자 ID
pub const ANONYMOUS_ID: i32 = 0;

/// 페이로드 내 필드 구분자
pub const FIELD_SEPARATOR: char = '|';

/// 페이로드 내 레코드 구분자
pub const RECORD_SEPARATOR: char = '\n';

/// 장르 목록 구분자 (레코드의 genres 필드 내부)
pub const GENRE_SEPARATOR: char = ',';

/// 페이로드 필드 이스케이프 문자
pub const ESCAPE_CHAR: char = '\\';

/// 기본 서버 호스트
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// 기본 서버 포트
pub const DEFAULT_PORT: u16 = 8080;

/// 기본 연결 타임아웃 (밀리초)
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// 기본 읽기/쓰기 타임아웃 (밀리초)
pub const DEFAULT_IO_TIMEOUT_MS: u64 = 30_000;

/// 사용자명 최소 길이 (문자 수)
pub const MIN_USERNAME_LEN: usize = 3;

/// 사용자명 최대 길이 (문자 수)
pub const MAX_USERNAME_LEN: usize = 63;

/// 비밀번호 최소 길이 (문자 수)
pub const MIN_PASSWORD_LEN: usize = 6;

/// 평점 하한
pub const MIN_RATING: f32 = 1.0;

/// 평점 상한
pub const MAX_RATING: f32 = 5.0;

/// 추천 요청 개수 하한
pub const MIN_RECOMMENDATIONS: u32 = 1;

/// 추천 요청 개수 상한
pub const MAX_RECOMMENDATIONS: u32 = 20;

/// 인기 영화 조회 기본 개수
pub const DEFAULT_POPULAR_COUNT: u32 = 15;
