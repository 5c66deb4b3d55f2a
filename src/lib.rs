//! # hvcc
//!
//! 纯 Rust 实现的 HEVC 序列头解析库.
//!
//! 从 HEVCDecoderConfigurationRecord (MP4 `hvcC` box, FLV/RTMP 序列头) 中取出
//! VPS/SPS/PPS, 并转换为以 `00 00 00 01` 分隔的 Annex B 码流.
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use hvcc::codec::parsers::h265::{hvcc_to_annex_b, parse_vps_sps_pps};
//!
//! let record = std::fs::read("stream.hvcc").unwrap();
//! let sets = parse_vps_sps_pps(&record).unwrap();
//! println!("VPS {} 字节, SPS {} 字节, PPS {} 字节", sets.vps.len(), sets.sps.len(), sets.pps.len());
//!
//! let annex_b = hvcc_to_annex_b(&record).unwrap();
//! std::fs::write("stream.h265", &annex_b).unwrap();
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `hvcc-core` | 错误类型, 参数集种类, 字节流读取器 |
//! | `hvcc-codec` | hvcC 解析, Annex B 转换, FLV 序列头 |

/// 核心类型与工具
pub use hvcc_core as core;

/// 序列头解析与转换
pub use hvcc_codec as codec;

/// 获取版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
