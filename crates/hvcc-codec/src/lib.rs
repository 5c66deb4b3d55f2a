//! # hvcc-codec
//!
//! HEVC 序列头解析库: 从 HEVCDecoderConfigurationRecord 中取出 VPS/SPS/PPS,
//! 并转换为 Annex B 码流.
//!
//! ## 使用示例
//!
//! ```rust
//! use hvcc_codec::parsers::h265::{hvcc_to_annex_b, parse_vps_sps_pps};
//!
//! let mut record = vec![
//!     0x01, 0x01, 0x60, 0x00, 0x00, 0x00, 0x90, 0x00, 0x00, 0x00, 0x00, 0x00, 0x5D, 0xF0,
//!     0x00, 0xFC, 0xFD, 0xF8, 0xF8, 0x00, 0x00, 0x0F,
//! ];
//! record.push(3); // numOfArrays
//! record.extend_from_slice(&[0x20, 0x00, 0x01, 0x00, 0x02, 0x40, 0x01]);
//! record.extend_from_slice(&[0x21, 0x00, 0x01, 0x00, 0x02, 0x42, 0x01]);
//! record.extend_from_slice(&[0x22, 0x00, 0x01, 0x00, 0x02, 0x44, 0x01]);
//!
//! let sets = parse_vps_sps_pps(&record).unwrap();
//! assert_eq!(sets.sps.as_ref(), &[0x42, 0x01]);
//!
//! let annex_b = hvcc_to_annex_b(&record).unwrap();
//! assert_eq!(annex_b.len(), 3 * (4 + 2));
//! ```

pub mod parsers;

// 重导出常用类型
pub use hvcc_core::{HvccError, HvccResult, ParameterSetKind};
pub use parsers::h265::{HvccRecord, NalArray, ParameterSets};
