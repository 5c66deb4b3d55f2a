//! H.265/HEVC 序列头解析器.
//!
//! 提供对 HEVC 序列头 (HEVCDecoderConfigurationRecord) 的解析能力:
//! - 固定头部字段与 NAL 数组解析
//! - VPS/SPS/PPS 提取 (每种取第一个)
//! - VPS/SPS/PPS → Annex B 码流转换
//! - FLV/RTMP 视频 Tag 封装的序列头
//!
//! 参数集本身按不透明字节串处理, 不解析 SPS/PPS 语义.
//!
//! # HEVC NAL 头部 (2 字节)
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ forbidden(1) | type(6) | layer_id(6) | tid(3) │
//! └───────────────────────────────────────────────┘
//! ```

pub mod annexb;
pub mod flv;
pub mod hvcc;
pub mod nal;

pub use annexb::{ANNEX_B_START_CODE, hvcc_to_annex_b, vps_sps_pps_to_annex_b};
pub use flv::{
    FLV_HEVC_SEQ_HEADER_PREFIX, flv_seq_header_to_annex_b, is_flv_hevc_seq_header,
    parse_vps_sps_pps_from_flv_seq_header, strip_flv_video_tag_prefix,
};
pub use hvcc::{
    HVCC_FIXED_HEADER_SIZE, HvccRecord, NalArray, ParameterSets, parse_hvcc_record,
    parse_hvcc_record_bytes, parse_vps_sps_pps, parse_vps_sps_pps_bytes,
};
pub use nal::HevcNalUnitType;
