//! 字节流读取器.
//!
//! 按大端字节序从内存缓冲区中顺序读取定长字段与长度前缀数据,
//! 是 HEVCDecoderConfigurationRecord 等容器配置记录解析的基础设施.
//!
//! 读取得到的数据块是输入缓冲区的 `Bytes` 切片, 不产生额外拷贝.

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;

/// 数据不足的描述: 本次读取需要的字节数与当时剩余的字节数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    /// 需要的字节数
    pub needed: usize,
    /// 剩余的字节数
    pub remaining: usize,
}

/// 读取结果, 失败时携带 [`Shortfall`]
pub type ReadResult<T> = Result<T, Shortfall>;

/// 字节流读取器
///
/// # 示例
/// ```
/// use hvcc_core::bytereader::ByteReader;
///
/// let mut br = ByteReader::from_slice(&[0x20, 0x00, 0x02, 0xAA, 0xBB]);
/// assert_eq!(br.read_u8().unwrap(), 0x20);
/// assert_eq!(br.read_u16_prefixed().unwrap().as_ref(), &[0xAA, 0xBB]);
/// assert!(br.is_eof());
/// ```
#[derive(Debug, Clone)]
pub struct ByteReader {
    /// 源数据
    data: Bytes,
    /// 当前读取位置
    pos: usize,
}

impl ByteReader {
    /// 从共享缓冲区创建读取器 (零拷贝)
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// 从借用的字节切片创建读取器, 数据会被拷贝一次
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// 当前读取位置 (相对缓冲区起点的字节偏移)
    pub fn position(&self) -> usize {
        self.pos
    }

    /// 剩余可读字节数
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// 是否已到达末尾
    pub fn is_eof(&self) -> bool {
        self.remaining() == 0
    }

    /// 确认至少还有 `n` 字节可读, 不移动读取位置
    pub fn ensure(&self, n: usize) -> ReadResult<()> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(Shortfall {
                needed: n,
                remaining,
            });
        }
        Ok(())
    }

    fn take(&mut self, n: usize) -> ReadResult<&[u8]> {
        self.ensure(n)?;
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..start + n])
    }

    /// 读取 1 个字节
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        Ok(self.take(1)?[0])
    }

    /// 读取 u16 大端
    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    /// 读取 u32 大端
    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    /// 读取 48 位大端无符号整数
    pub fn read_u48_be(&mut self) -> ReadResult<u64> {
        Ok(BigEndian::read_u48(self.take(6)?))
    }

    /// 读取 `n` 字节, 返回共享同一缓冲区的切片
    pub fn read_bytes(&mut self, n: usize) -> ReadResult<Bytes> {
        self.ensure(n)?;
        let out = self.data.slice(self.pos..self.pos + n);
        self.pos += n;
        Ok(out)
    }

    /// 读取 2 字节大端长度前缀, 再读取对应长度的数据
    ///
    /// 长度字段不足 2 字节时 `needed` 为 2; 负载不足时 `needed` 为声明的长度.
    pub fn read_u16_prefixed(&mut self) -> ReadResult<Bytes> {
        let len = usize::from(self.read_u16_be()?);
        self.read_bytes(len)
    }
}
