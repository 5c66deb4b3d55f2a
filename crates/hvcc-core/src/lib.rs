//! # hvcc-core
//!
//! HEVC 序列头解析核心库, 提供统一错误类型、参数集种类与字节流读取器.

pub mod bytereader;
pub mod error;
pub mod parameter_set;

// 重导出常用类型
pub use bytereader::{ByteReader, Shortfall};
pub use error::{HvccError, HvccResult};
pub use parameter_set::ParameterSetKind;
