//! TCP 클라이언트 모듈: 단일 연결의 수명 관리와 동기 요청/응답 교환
//!
//! [`ProtocolClient`]는 고정 호스트/포트에 대한 TCP 연결을 최대 하나 소유합니다.
//!
//! ## 연결 상태
//!
//! ```text
//! DISCONNECTED --(connect 성공)--> CONNECTED --(I/O 에러 | close)--> DISCONNECTED
//! ```
//!
//! - 연결이 없으면 [`send`](ProtocolClient::send)가 먼저 [`connect`](ProtocolClient::connect)를 시도합니다.
//! - 송수신 중 어떤 에러든 발생하면 연결을 버리고 에러를 반환합니다. 재시도는 호출자 몫이며,
//!   같은 요청을 다시 보내면 자동으로 재연결됩니다.
//! - `send`는 `&mut self`를 요구하므로 응답을 기다리는 동안 다른 요청을 보낼 수 없습니다.
//!
//! ## 응답 수신
//!
//! 응답은 8,200바이트가 모일 때까지 누적해서 읽습니다. 한 번의 `read`로 프레임 전체가
//! 도착한다고 가정하지 않습니다. 프레임이 다 차기 전에 상대가 닫으면 받은 일부는 버리고
//! [`FlixError::ConnectionClosed`]를 반환합니다.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::codec::{build_request, decode_frame};
use crate::config::ClientConfig;
use crate::constants::FRAME_SIZE;
use crate::error::{FlixError, Result};
use crate::types::{DecodePolicy, Frame, MessageType};

/// 다른 스레드에서 진행 중인 요청을 중단시키는 핸들
///
/// [`abort`](AbortHandle::abort)는 현재 소켓을 양방향 shutdown 하고 클라이언트에서 분리합니다.
/// `send`에서 블록된 호출은 통신 에러로 반환됩니다. 요청 중이 아니었다면 다음 `send`가
/// 끊긴 연결을 버리고 재연결합니다.
#[derive(Clone)]
pub struct AbortHandle {
    slot: Arc<Mutex<Option<TcpStream>>>,
}

impl AbortHandle {
    /// 현재 연결을 shutdown 합니다. 연결이 없으면 `false`를 반환합니다.
    pub fn abort(&self) -> bool {
        let aborted = self.slot.lock().take();
        match aborted {
            Some(stream) => {
                // NOTE: Shutdown error means the socket is already dead, which is the goal
                let _ = stream.shutdown(Shutdown::Both);
                info!("connection aborted by handle");
                true
            }
            None => false,
        }
    }
}

/// 고정 프레임 바이너리 프로토콜 클라이언트
///
/// # 예시
///
/// ```no_run
/// use flixwire::client::ProtocolClient;
/// use flixwire::config::ClientConfig;
/// use flixwire::types::MessageType;
///
/// # fn example() -> flixwire::Result<()> {
/// let mut client = ProtocolClient::new(ClientConfig::default());
/// let reply = client.send(MessageType::Login, 0, "alice|secret1")?;
/// if reply.is_success() {
///     println!("user id: {}", reply.originator);
/// } else {
///     println!("rejected: {}", reply.payload);
/// }
/// client.close();
/// # Ok(())
/// # }
/// ```
pub struct ProtocolClient {
    config: ClientConfig,
    /// 현재 연결 (없으면 DISCONNECTED)
    stream: Option<TcpStream>,
    /// [`AbortHandle`]과 공유하는 현재 연결의 복제본
    abort_slot: Arc<Mutex<Option<TcpStream>>>,
}

impl ProtocolClient {
    /// 연결 없이 클라이언트를 생성합니다. 첫 `send` 또는 `connect`에서 연결합니다.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            stream: None,
            abort_slot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 연결 상태를 확인합니다. [`AbortHandle`]로 끊긴 연결은 연결되지 않은 것으로 봅니다.
    pub fn is_connected(&self) -> bool {
        self.stream.is_some() && self.abort_slot.lock().is_some()
    }

    /// 다른 스레드에서 진행 중인 요청을 중단시킬 핸들을 반환합니다.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            slot: Arc::clone(&self.abort_slot),
        }
    }

    /// 서버에 연결합니다. 이미 연결되어 있으면 아무것도 하지 않습니다.
    ///
    /// 자동 재시도는 하지 않습니다. 실패 시 연결은 비어 있는 상태로 남습니다.
    /// 유휴 상태에서 abort 된 연결이 남아 있으면 먼저 버리고 새로 연결합니다.
    ///
    /// # 에러
    ///
    /// - [`FlixError::Connect`]: 주소 해석 실패, 연결 거부, 타임아웃, 소켓 옵션 설정 실패
    pub fn connect(&mut self) -> Result<()> {
        if self.stream.is_some() {
            let aborted = self.abort_slot.lock().is_none();
            if !aborted {
                return Ok(());
            }
            self.invalidate("aborted while idle");
        }

        let addr = self.config.addr();
        match self.open_stream() {
            Ok((stream, shared)) => {
                info!("connected to {}", addr);
                *self.abort_slot.lock() = Some(shared);
                self.stream = Some(stream);
                Ok(())
            }
            Err(source) => {
                warn!("failed to connect to {}: {}", addr, source);
                Err(FlixError::Connect { addr, source })
            }
        }
    }

    /// 주소를 해석하고 첫 번째로 성공한 주소의 스트림과 abort 용 복제본을 반환합니다.
    fn open_stream(&self) -> io::Result<(TcpStream, TcpStream)> {
        let addrs: Vec<SocketAddr> = (self.config.host.as_str(), self.config.port)
            .to_socket_addrs()?
            .collect();

        let mut last_err = None;
        for addr in addrs {
            let attempt = match self.config.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    // NOTE: On any option failure the stream is dropped here, nothing is stored
                    stream.set_read_timeout(self.config.read_timeout)?;
                    stream.set_write_timeout(self.config.write_timeout)?;
                    stream.set_nodelay(true)?;
                    let shared = stream.try_clone()?;
                    return Ok((stream, shared));
                }
                Err(e) => {
                    debug!("connect attempt to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
        }))
    }

    /// 요청 프레임 하나를 보내고 응답 프레임 하나를 받아 반환합니다.
    ///
    /// 1. 페이로드를 8,200바이트 프레임으로 인코딩 (초과 시 아무것도 보내지 않고 에러)
    /// 2. 연결이 없으면 연결
    /// 3. 프레임 전체 전송 → 응답 프레임 전체 수신 → 디코딩
    ///
    /// 서버의 `ERROR` 응답은 에러가 아니라 정상 반환값입니다 ([`Frame::is_error`]).
    ///
    /// # 에러
    ///
    /// - [`FlixError::OversizePayload`]: 페이로드가 8,192바이트 초과 (연결 상태 불변)
    /// - [`FlixError::Connect`]: 연결 실패 (연결 없음 유지)
    /// - [`FlixError::Communication`], [`FlixError::Timeout`], [`FlixError::InvalidUtf8`]: 연결이 무효화됨
    /// - [`FlixError::ConnectionClosed`]: 응답 프레임이 다 오기 전에 상대가 닫음 (잘린 데이터는 버림)
    pub fn send(&mut self, kind: MessageType, originator: i32, payload: &str) -> Result<Frame> {
        let request = build_request(kind, originator, payload)?;
        self.connect()?;

        debug!(
            "sending {:?} (originator={}, payload={} bytes)",
            kind,
            originator,
            payload.len()
        );

        let policy = self.config.decode_policy;
        let outcome = match self.stream.as_mut() {
            Some(stream) => exchange(stream, &request, policy),
            None => Err(FlixError::ConnectionClosed {
                received: 0,
                expected: FRAME_SIZE,
            }),
        };

        match outcome {
            Ok(frame) => {
                debug!(
                    "received reply {} (originator={}, payload={} bytes)",
                    frame.kind,
                    frame.originator,
                    frame.payload.len()
                );
                Ok(frame)
            }
            Err(e) => {
                self.invalidate(&e.to_string());
                Err(e)
            }
        }
    }

    /// [`Frame`] 값을 그대로 요청으로 보냅니다. 알 수 없는 타입 코드는 보내지 않습니다.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<Frame> {
        let kind = frame.message_type()?;
        self.send(kind, frame.originator, &frame.payload)
    }

    /// 연결을 닫습니다. 닫기 실패는 무시하며, 두 번 호출해도 안전합니다.
    pub fn close(&mut self) {
        *self.abort_slot.lock() = None;
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            info!("connection to {} closed", self.config.addr());
        }
    }

    /// 에러 후 연결을 버립니다 (DISCONNECTED로 전이).
    fn invalidate(&mut self, reason: &str) {
        *self.abort_slot.lock() = None;
        if self.stream.take().is_some() {
            warn!("connection to {} invalidated: {}", self.config.addr(), reason);
        }
    }
}

impl Drop for ProtocolClient {
    fn drop(&mut self) {
        self.close();
    }
}

/// 요청을 모두 쓰고 응답 프레임 하나를 읽어 디코딩합니다.
fn exchange<S: Read + Write>(stream: &mut S, request: &[u8], policy: DecodePolicy) -> Result<Frame> {
    // NOTE: write_all retries short writes and EINTR until the whole frame is out
    stream
        .write_all(request)
        .map_err(|e| io_failure("write", e))?;
    stream.flush().map_err(|e| io_failure("write", e))?;

    let buf = read_reply(stream)?;
    decode_frame(&buf, policy)
}

/// [`FRAME_SIZE`] 바이트가 모일 때까지 누적해서 읽습니다. 그 전의 EOF는 에러입니다.
fn read_reply<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; FRAME_SIZE];
    let mut filled = 0;

    while filled < FRAME_SIZE {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_failure("read", e)),
        }
    }

    if filled < FRAME_SIZE {
        return Err(FlixError::ConnectionClosed {
            received: filled,
            expected: FRAME_SIZE,
        });
    }
    Ok(buf)
}

/// 소켓 I/O 에러를 타임아웃과 일반 통신 에러로 분류합니다.
fn io_failure(op: &'static str, source: io::Error) -> FlixError {
    match source.kind() {
        // NOTE: Unix reports an expired SO_RCVTIMEO/SO_SNDTIMEO as WouldBlock, Windows as TimedOut
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => FlixError::Timeout { op },
        _ => FlixError::Communication { op, source },
    }
}
