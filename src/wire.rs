//! 저수준 바이너리 I/O 모듈: native endian 정수와 0-패딩 텍스트 영역 읽기/쓰기
//!
//! [`BufReader`]는 `&[u8]` 슬라이스로부터 순차적으로 바이너리 데이터를 읽고,
//! [`BufWriter`]는 [`FRAME_SIZE`] 고정 크기 버퍼에 순차적으로 바이너리 데이터를 씁니다.
//!
//! ## 바이트 순서
//!
//! 정수 필드는 **플랫폼 native endian**입니다. 서버와 클라이언트가 같은
//! 아키텍처 계열에서 동작한다는 전제의 프로토콜이므로 변환하지 않습니다.
//!
//! ## 텍스트 영역
//!
//! 페이로드는 UTF-8 바이트를 앞에서부터 채우고 나머지를 `0x00`으로 패딩합니다.
//! 디코딩 시 뒤쪽의 `0x00`만 제거하며, 본문 내부의 바이트는 건드리지 않습니다.

use crate::constants::FRAME_SIZE;
use crate::error::{FlixError, Result};
use crate::types::DecodePolicy;

/// 뒤쪽 `0x00` 패딩을 제거한 슬라이스를 반환합니다.
pub fn strip_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    &bytes[..end]
}

/// 디코딩 정책에 따라 UTF-8 바이트를 [`String`]으로 변환합니다.
///
/// `base_offset`은 에러 메시지에 프레임 기준 오프셋을 표시하기 위한 값입니다.
pub fn decode_text(bytes: &[u8], policy: DecodePolicy, base_offset: usize) -> Result<String> {
    match policy {
        DecodePolicy::Replace => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DecodePolicy::Ignore => Ok(bytes
            .utf8_chunks()
            .map(|chunk| chunk.valid())
            .collect::<String>()),
        DecodePolicy::Strict => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| FlixError::InvalidUtf8 {
                offset: base_offset + e.valid_up_to(),
                detail: e.to_string(),
            }),
    }
}

/// `&[u8]` 슬라이스와 오프셋을 관리하며 순차적 native endian 바이너리 읽기를 제공합니다.
///
/// 모든 읽기 메서드는 버퍼 경계를 초과하면 [`FlixError::UnexpectedEof`]를 반환합니다.
///
/// # 예시
///
/// ```
/// use flixwire::wire::BufReader;
///
/// let data = 100i32.to_ne_bytes();
/// let mut reader = BufReader::new(&data);
/// assert_eq!(reader.read_i32().unwrap(), 100);
/// assert_eq!(reader.remaining(), 0);
/// ```
pub struct BufReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> BufReader<'a> {
    /// 바이트 슬라이스로부터 새 리더를 생성합니다. 초기 오프셋은 0입니다.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// 현재 읽기 오프셋을 반환합니다.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 남은 바이트 수를 반환합니다.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    /// 현재 위치에서 `needed` 바이트를 읽을 수 있는지 확인합니다.
    #[inline]
    fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if available < needed {
            return Err(FlixError::UnexpectedEof {
                offset: self.offset,
                needed,
                available,
            });
        }
        Ok(())
    }

    /// 4바이트 native endian 부호 있는 정수를 읽습니다.
    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// 지정 길이의 원시 바이트 슬라이스를 zero-copy로 읽습니다.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let slice = &self.buf[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// 남은 모든 바이트를 0-패딩 텍스트 영역으로 읽습니다.
    ///
    /// 뒤쪽 `0x00`을 제거한 뒤 `policy`에 따라 UTF-8로 디코딩합니다.
    /// 남은 바이트가 없으면 빈 문자열입니다.
    pub fn read_padded_text(&mut self, policy: DecodePolicy) -> Result<String> {
        let start = self.offset;
        let region = self.read_bytes(self.remaining())?;
        decode_text(strip_padding(region), policy, start)
    }
}

/// [`FRAME_SIZE`] 고정 크기 버퍼에 순차적 native endian 바이너리 쓰기를 제공합니다.
///
/// 버퍼는 0으로 초기화되므로 쓰지 않은 영역은 그대로 0-패딩이 됩니다.
/// 모든 쓰기 메서드는 버퍼 경계를 초과하면 [`FlixError::BufferOverflow`]를 반환합니다.
///
/// # 예시
///
/// ```
/// use flixwire::wire::BufWriter;
///
/// let mut writer = BufWriter::new();
/// writer.write_i32(100).unwrap();
/// assert_eq!(&writer.as_bytes()[..4], &100i32.to_ne_bytes());
/// assert_eq!(writer.as_bytes().len(), 8200);
/// ```
pub struct BufWriter {
    buf: Vec<u8>,
    offset: usize,
}

impl BufWriter {
    /// [`FRAME_SIZE`] (8,200바이트) 크기의 0-초기화 버퍼를 생성합니다.
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; FRAME_SIZE],
            offset: 0,
        }
    }

    /// 현재 쓰기 오프셋을 반환합니다.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 남은 쓰기 가능 바이트 수를 반환합니다.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    #[inline]
    fn ensure(&self, needed: usize) -> Result<()> {
        if self.offset + needed > self.buf.len() {
            return Err(FlixError::BufferOverflow {
                offset: self.offset,
                needed,
                limit: self.buf.len(),
            });
        }
        Ok(())
    }

    /// 4바이트 native endian 부호 있는 정수를 씁니다.
    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.write_bytes(&v.to_ne_bytes())
    }

    /// 원시 바이트 슬라이스를 씁니다.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.ensure(data.len())?;
        self.buf[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    /// 내부 버퍼를 소비하여 [`Vec<u8>`]로 반환합니다. 길이는 항상 [`FRAME_SIZE`]입니다.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// 현재 버퍼의 바이트 슬라이스 참조를 반환합니다.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl Default for BufWriter {
    fn default() -> Self {
        Self::new()
    }
}
