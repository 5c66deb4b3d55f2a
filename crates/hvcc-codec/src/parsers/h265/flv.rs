//! FLV/RTMP 视频 Tag 中的 HEVC 序列头.
//!
//! RTMP 推流时, hvcC 记录放在视频 Tag 数据中, 前面有 5 字节前缀:
//! ```text
//! FrameType(4) = 1 (关键帧) | CodecID(4) = 12 (HEVC)   -> 0x1c
//! AVCPacketType (8) = 0 (序列头)                        -> 0x00
//! CompositionTime (24) = 0                              -> 0x00 0x00 0x00
//! ```

use bytes::Bytes;
use hvcc_core::{HvccError, HvccResult};

use super::hvcc::{ParameterSets, parse_vps_sps_pps};

/// FLV 视频 Tag 前缀长度
pub const FLV_VIDEO_TAG_PREFIX_SIZE: usize = 5;

/// HEVC 关键帧序列头的 FLV 视频 Tag 前缀
pub const FLV_HEVC_SEQ_HEADER_PREFIX: [u8; FLV_VIDEO_TAG_PREFIX_SIZE] =
    [0x1C, 0x00, 0x00, 0x00, 0x00];

/// 是否为 FLV 封装的 HEVC 序列头
pub fn is_flv_hevc_seq_header(payload: &[u8]) -> bool {
    payload.starts_with(&FLV_HEVC_SEQ_HEADER_PREFIX)
}

/// 校验并去掉 FLV 视频 Tag 前缀, 返回其后的 hvcC 记录
pub fn strip_flv_video_tag_prefix(payload: &[u8]) -> HvccResult<&[u8]> {
    if payload.len() < FLV_VIDEO_TAG_PREFIX_SIZE {
        return Err(HvccError::TruncatedHeader {
            needed: FLV_VIDEO_TAG_PREFIX_SIZE,
            remaining: payload.len(),
        });
    }
    let (prefix, record) = payload.split_at(FLV_VIDEO_TAG_PREFIX_SIZE);
    if prefix != FLV_HEVC_SEQ_HEADER_PREFIX {
        return Err(HvccError::NotSequenceHeader(format!(
            "FLV 视频 Tag 前缀为 {prefix:02x?}, 期望 {FLV_HEVC_SEQ_HEADER_PREFIX:02x?}"
        )));
    }
    Ok(record)
}

/// 从 FLV 视频 Tag 数据 (HEVC 序列头) 中提取 VPS/SPS/PPS
pub fn parse_vps_sps_pps_from_flv_seq_header(payload: &[u8]) -> HvccResult<ParameterSets> {
    parse_vps_sps_pps(strip_flv_video_tag_prefix(payload)?)
}

/// 从 FLV 视频 Tag 数据 (HEVC 序列头) 生成 VPS/SPS/PPS 的 Annex B 码流
pub fn flv_seq_header_to_annex_b(payload: &[u8]) -> HvccResult<Bytes> {
    Ok(parse_vps_sps_pps_from_flv_seq_header(payload)?.to_annex_b())
}
