//! 参数集种类.

use std::fmt;

/// HEVC 参数集种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterSetKind {
    /// VPS (Video Parameter Set)
    Vps,
    /// SPS (Sequence Parameter Set)
    Sps,
    /// PPS (Picture Parameter Set)
    Pps,
}

impl ParameterSetKind {
    /// 输出顺序, Annex B 码流按此顺序排列
    pub const ALL: [Self; 3] = [Self::Vps, Self::Sps, Self::Pps];

    /// 对应的 nal_unit_type 编号
    pub const fn nal_unit_type(self) -> u8 {
        match self {
            Self::Vps => 32,
            Self::Sps => 33,
            Self::Pps => 34,
        }
    }

    /// 从 nal_unit_type 编号识别参数集种类
    pub const fn from_nal_unit_type(nal_unit_type: u8) -> Option<Self> {
        match nal_unit_type {
            32 => Some(Self::Vps),
            33 => Some(Self::Sps),
            34 => Some(Self::Pps),
            _ => None,
        }
    }

    /// 简称
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vps => "VPS",
            Self::Sps => "SPS",
            Self::Pps => "PPS",
        }
    }
}

impl fmt::Display for ParameterSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
