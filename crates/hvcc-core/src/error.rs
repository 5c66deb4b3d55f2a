//! 统一错误类型定义.
//!
//! 序列头解析的失败只有结构性损坏一种来源, 错误集合是封闭的:
//! 任何一个变体出现时, 整次解析结果都被丢弃.

use thiserror::Error;

use crate::parameter_set::ParameterSetKind;

/// 序列头解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HvccError {
    /// 固定头部 (22 字节 + numOfArrays) 数据不足
    #[error("序列头数据不足: 需要 {needed} 字节, 剩余 {remaining} 字节")]
    TruncatedHeader { needed: usize, remaining: usize },

    /// NAL 数组头 (类型 + 数量, 共 3 字节) 数据不足
    #[error("NAL 数组头数据不足: 第 {index} 个数组, 剩余 {remaining} 字节")]
    TruncatedArrayHeader { index: usize, remaining: usize },

    /// NAL 条目的长度字段或负载数据不足
    #[error(
        "NAL 条目数据不足: nal_unit_type={nal_unit_type}, 需要 {needed} 字节, 剩余 {remaining} 字节"
    )]
    TruncatedEntry {
        nal_unit_type: u8,
        needed: usize,
        remaining: usize,
    },

    /// 序列头结构完整, 但缺少某种参数集
    #[error("序列头缺少 {0}")]
    MissingParameterSet(ParameterSetKind),

    /// 输入不是 HEVC 序列头 (FLV 视频 Tag 前缀不匹配)
    #[error("不是 HEVC 序列头: {0}")]
    NotSequenceHeader(String),
}

impl HvccError {
    /// 是否为截断类错误 (输入在结构中途结束)
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            Self::TruncatedHeader { .. }
                | Self::TruncatedArrayHeader { .. }
                | Self::TruncatedEntry { .. }
        )
    }
}

/// 统一 Result 类型
pub type HvccResult<T> = Result<T, HvccError>;
