//! HEVC 参数集 → Annex B 码流.
//!
//! 裸码流消费者 (解码器, `.h265` 文件) 需要以起始码分隔的 NAL 单元,
//! 这里把序列头中的 VPS/SPS/PPS 按固定顺序拼接成这种格式.

use bytes::{BufMut, Bytes, BytesMut};
use hvcc_core::HvccResult;

use super::hvcc::parse_vps_sps_pps;

/// 4 字节 Annex B 起始码
pub const ANNEX_B_START_CODE: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// 将 VPS/SPS/PPS 拼接为 Annex B 码流
///
/// 输出: `00 00 00 01 | VPS | 00 00 00 01 | SPS | 00 00 00 01 | PPS`, 末尾没有起始码.
pub fn vps_sps_pps_to_annex_b(vps: &[u8], sps: &[u8], pps: &[u8]) -> Bytes {
    concat_annex_b([vps, sps, pps])
}

/// 每个 NAL 单元前加起始码后依次拼接
pub(crate) fn concat_annex_b<const N: usize>(nalus: [&[u8]; N]) -> Bytes {
    let size: usize = nalus
        .iter()
        .map(|nalu| ANNEX_B_START_CODE.len() + nalu.len())
        .sum();
    let mut out = BytesMut::with_capacity(size);
    for nalu in nalus {
        out.put_slice(&ANNEX_B_START_CODE);
        out.put_slice(nalu);
    }
    out.freeze()
}

/// 从 HEVCDecoderConfigurationRecord 生成 VPS/SPS/PPS 的 Annex B 码流
///
/// 解析失败时原样返回错误, 不会输出部分码流.
pub fn hvcc_to_annex_b(data: &[u8]) -> HvccResult<Bytes> {
    Ok(parse_vps_sps_pps(data)?.to_annex_b())
}
