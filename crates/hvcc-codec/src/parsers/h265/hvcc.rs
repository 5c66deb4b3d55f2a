//! HEVCDecoderConfigurationRecord (hvcC, ISO/IEC 14496-15 §8.3.3) 解析.
//!
//! # 记录结构
//! ```text
//! configurationVersion                      8
//! profile_space(2) | tier(1) | profile_idc(5)
//! general_profile_compatibility_flags      32
//! general_constraint_indicator_flags       48
//! general_level_idc                         8
//! reserved(4) | min_spatial_segmentation   16
//! reserved(6) | parallelismType             8
//! reserved(6) | chromaFormat                8
//! reserved(5) | bitDepthLumaMinus8          8
//! reserved(5) | bitDepthChromaMinus8        8
//! avgFrameRate                             16
//! constantFrameRate(2) | numTemporalLayers(3) | temporalIdNested(1) | lengthSizeMinusOne(2)
//! numOfArrays                               8
//! 每个数组:
//!   array_completeness(1) | reserved(1) | NAL_unit_type(6)
//!   numNalus                               16
//!   每个 NAL: nalUnitLength(16) + nalUnit
//! ```
//!
//! 保留位只做掩码处理, 不校验其取值. 任何一处数据不足都会使整次解析失败.

use bytes::Bytes;
use hvcc_core::bytereader::{ByteReader, ReadResult};
use hvcc_core::{HvccError, HvccResult, ParameterSetKind};
use log::{debug, trace};

use super::annexb::concat_annex_b;
use super::nal::HevcNalUnitType;

/// 固定头部大小 (configurationVersion 到 lengthSizeMinusOne)
pub const HVCC_FIXED_HEADER_SIZE: usize = 22;

/// 固定头部 + numOfArrays
const HVCC_HEADER_SIZE: usize = HVCC_FIXED_HEADER_SIZE + 1;

/// 同一 NAL 类型的一组 NAL 单元
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NalArray {
    /// array_completeness: 该类型的 NAL 是否全部在此数组中
    pub array_completeness: bool,
    /// NAL_unit_type (6 位)
    pub nal_unit_type: u8,
    /// NAL 单元 (含 2 字节 NAL 头), 保持记录中的顺序
    pub nalus: Vec<Bytes>,
}

impl NalArray {
    /// 数组的 NAL 类型
    pub fn nal_type(&self) -> HevcNalUnitType {
        HevcNalUnitType::from_type_id(self.nal_unit_type)
    }

    /// 数组承载的参数集种类, 其他类型的数组返回 `None`
    pub fn parameter_set_kind(&self) -> Option<ParameterSetKind> {
        ParameterSetKind::from_nal_unit_type(self.nal_unit_type)
    }
}

/// 解析后的 HEVCDecoderConfigurationRecord
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HvccRecord {
    /// configurationVersion (应为 1, 不校验)
    pub configuration_version: u8,
    pub general_profile_space: u8,
    pub general_tier_flag: bool,
    pub general_profile_idc: u8,
    pub general_profile_compatibility_flags: u32,
    /// 低 48 位有效
    pub general_constraint_indicator_flags: u64,
    pub general_level_idc: u8,
    /// 低 12 位有效
    pub min_spatial_segmentation_idc: u16,
    pub parallelism_type: u8,
    pub chroma_format_idc: u8,
    pub bit_depth_luma_minus8: u8,
    pub bit_depth_chroma_minus8: u8,
    /// 单位: 帧 / 256 秒
    pub avg_frame_rate: u16,
    pub constant_frame_rate: u8,
    pub num_temporal_layers: u8,
    pub temporal_id_nested: bool,
    pub length_size_minus_one: u8,
    /// NAL 数组, 保持记录中的顺序
    pub arrays: Vec<NalArray>,
}

impl HvccRecord {
    /// 码流中 NAL 长度字段的字节数
    pub fn length_size(&self) -> usize {
        usize::from(self.length_size_minus_one) + 1
    }

    /// 某种参数集的全部 NAL 单元, 按出现顺序
    pub fn nalus_of(&self, kind: ParameterSetKind) -> impl Iterator<Item = &Bytes> {
        self.arrays
            .iter()
            .filter(move |array| array.parameter_set_kind() == Some(kind))
            .flat_map(|array| array.nalus.iter())
    }

    /// 某种参数集的第一个 NAL 单元
    pub fn first_nalu(&self, kind: ParameterSetKind) -> Option<&Bytes> {
        self.nalus_of(kind).next()
    }

    /// 提取 VPS/SPS/PPS 各一个
    ///
    /// 每种参数集取第一个出现的 NAL, 其余的被忽略 (多层 HEVC 的多个 SPS 不受支持).
    /// 任意一种缺失时返回 [`HvccError::MissingParameterSet`], 按 VPS, SPS, PPS 顺序检查.
    pub fn parameter_sets(&self) -> HvccResult<ParameterSets> {
        let pick = |kind: ParameterSetKind| -> HvccResult<Bytes> {
            let first = self
                .first_nalu(kind)
                .cloned()
                .ok_or(HvccError::MissingParameterSet(kind))?;
            let ignored = self.nalus_of(kind).count() - 1;
            if ignored > 0 {
                debug!("hvcC: 存在 {} 个额外的 {kind}, 只保留第一个", ignored);
            }
            Ok(first)
        };

        Ok(ParameterSets {
            vps: pick(ParameterSetKind::Vps)?,
            sps: pick(ParameterSetKind::Sps)?,
            pps: pick(ParameterSetKind::Pps)?,
        })
    }
}

/// 从序列头提取的 VPS/SPS/PPS
///
/// 每个字段都是完整的 NAL 单元 (含 2 字节 NAL 头, 未去除防竞争字节).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSets {
    pub vps: Bytes,
    pub sps: Bytes,
    pub pps: Bytes,
}

impl ParameterSets {
    /// 按种类取参数集
    pub fn get(&self, kind: ParameterSetKind) -> &Bytes {
        match kind {
            ParameterSetKind::Vps => &self.vps,
            ParameterSetKind::Sps => &self.sps,
            ParameterSetKind::Pps => &self.pps,
        }
    }

    /// 转换为 Annex B 码流: 起始码 + VPS + 起始码 + SPS + 起始码 + PPS
    pub fn to_annex_b(&self) -> Bytes {
        concat_annex_b(ParameterSetKind::ALL.map(move |kind| &self.get(kind)[..]))
    }
}

/// 解析 HEVCDecoderConfigurationRecord
///
/// 输入会被拷贝一次, 解析出的 NAL 单元共享这份拷贝.
pub fn parse_hvcc_record(data: &[u8]) -> HvccResult<HvccRecord> {
    parse_hvcc_record_bytes(Bytes::copy_from_slice(data))
}

/// 解析 HEVCDecoderConfigurationRecord (零拷贝, NAL 单元是 `data` 的切片)
pub fn parse_hvcc_record_bytes(data: Bytes) -> HvccResult<HvccRecord> {
    let total = data.len();
    let mut br = ByteReader::new(data);

    let (mut record, num_arrays) =
        read_header(&mut br).map_err(|_| HvccError::TruncatedHeader {
            needed: HVCC_HEADER_SIZE,
            remaining: total,
        })?;
    trace!(
        "hvcC: version={}, profile_idc={}, level_idc={}, length_size={}, numOfArrays={}",
        record.configuration_version,
        record.general_profile_idc,
        record.general_level_idc,
        record.length_size(),
        num_arrays
    );

    record.arrays.reserve(usize::from(num_arrays));
    for index in 0..usize::from(num_arrays) {
        let (packed, num_nalus) =
            read_array_header(&mut br).map_err(|s| HvccError::TruncatedArrayHeader {
                index,
                remaining: s.remaining,
            })?;
        let nal_unit_type = packed & 0x3F;

        // 每个条目至少 2 字节, 预留容量不超过剩余数据可容纳的条目数
        let mut nalus = Vec::with_capacity(usize::from(num_nalus).min(br.remaining() / 2));
        for _ in 0..num_nalus {
            let nalu = br
                .read_u16_prefixed()
                .map_err(|s| HvccError::TruncatedEntry {
                    nal_unit_type,
                    needed: s.needed,
                    remaining: s.remaining,
                })?;
            nalus.push(nalu);
        }

        debug!(
            "hvcC: 数组 #{index} 类型 {}, {} 个 NAL",
            HevcNalUnitType::from_type_id(nal_unit_type),
            nalus.len()
        );
        record.arrays.push(NalArray {
            array_completeness: packed & 0x80 != 0,
            nal_unit_type,
            nalus,
        });
    }

    if !br.is_eof() {
        debug!(
            "hvcC: 偏移 {} 之后有 {} 字节未使用的尾部数据",
            br.position(),
            br.remaining()
        );
    }

    Ok(record)
}

/// 从 HEVCDecoderConfigurationRecord 提取 VPS/SPS/PPS
pub fn parse_vps_sps_pps(data: &[u8]) -> HvccResult<ParameterSets> {
    parse_hvcc_record(data)?.parameter_sets()
}

/// 从 HEVCDecoderConfigurationRecord 提取 VPS/SPS/PPS (零拷贝)
pub fn parse_vps_sps_pps_bytes(data: Bytes) -> HvccResult<ParameterSets> {
    parse_hvcc_record_bytes(data)?.parameter_sets()
}

/// 读取固定头部与 numOfArrays
fn read_header(br: &mut ByteReader) -> ReadResult<(HvccRecord, u8)> {
    br.ensure(HVCC_HEADER_SIZE)?;

    let configuration_version = br.read_u8()?;
    let profile = br.read_u8()?;
    let general_profile_compatibility_flags = br.read_u32_be()?;
    let general_constraint_indicator_flags = br.read_u48_be()?;
    let general_level_idc = br.read_u8()?;
    let min_spatial_segmentation_idc = br.read_u16_be()? & 0x0FFF;
    let parallelism_type = br.read_u8()? & 0x03;
    let chroma_format_idc = br.read_u8()? & 0x03;
    let bit_depth_luma_minus8 = br.read_u8()? & 0x07;
    let bit_depth_chroma_minus8 = br.read_u8()? & 0x07;
    let avg_frame_rate = br.read_u16_be()?;
    let temporal = br.read_u8()?;
    let num_arrays = br.read_u8()?;

    let record = HvccRecord {
        configuration_version,
        general_profile_space: profile >> 6,
        general_tier_flag: (profile >> 5) & 1 != 0,
        general_profile_idc: profile & 0x1F,
        general_profile_compatibility_flags,
        general_constraint_indicator_flags,
        general_level_idc,
        min_spatial_segmentation_idc,
        parallelism_type,
        chroma_format_idc,
        bit_depth_luma_minus8,
        bit_depth_chroma_minus8,
        avg_frame_rate,
        constant_frame_rate: temporal >> 6,
        num_temporal_layers: (temporal >> 3) & 0x07,
        temporal_id_nested: (temporal >> 2) & 1 != 0,
        length_size_minus_one: temporal & 0x03,
        arrays: Vec::new(),
    };
    Ok((record, num_arrays))
}

/// 读取数组头: 打包字节 + numNalus
fn read_array_header(br: &mut ByteReader) -> ReadResult<(u8, u16)> {
    br.ensure(3)?;
    Ok((br.read_u8()?, br.read_u16_be()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::h265::annexb::vps_sps_pps_to_annex_b;

    /// 组装一个 hvcC 记录: 固定头部取自 x265 默认输出, 数组由参数给出
    fn build_record(arrays: &[(u8, Vec<&[u8]>)]) -> Vec<u8> {
        let mut buf = vec![
            0x01, 0x01, 0x60, 0x00, 0x00, 0x00, 0x90, 0x00, 0x00, 0x00, 0x00, 0x00, 0x5D, 0xF0,
            0x00, 0xFC, 0xFD, 0xF8, 0xF8, 0x00, 0x00, 0x0F,
        ];
        buf.push(arrays.len() as u8);
        for (packed, nalus) in arrays {
            buf.push(*packed);
            buf.extend_from_slice(&(nalus.len() as u16).to_be_bytes());
            for nalu in nalus {
                buf.extend_from_slice(&(nalu.len() as u16).to_be_bytes());
                buf.extend_from_slice(nalu);
            }
        }
        buf
    }

    const VPS: &[u8] = &[0x40, 0x01, 0x0C, 0x01];
    const SPS: &[u8] = &[0x42, 0x01, 0x01, 0x01, 0x60];
    const PPS: &[u8] = &[0x44, 0x01, 0xC0];

    #[test]
    fn test_固定头部字段() {
        let data = build_record(&[(0x20, vec![VPS]), (0x21, vec![SPS]), (0x22, vec![PPS])]);
        let record = parse_hvcc_record(&data).unwrap();

        assert_eq!(record.configuration_version, 1);
        assert_eq!(record.general_profile_space, 0);
        assert!(!record.general_tier_flag);
        assert_eq!(record.general_profile_idc, 1);
        assert_eq!(record.general_profile_compatibility_flags, 0x6000_0000);
        assert_eq!(record.general_constraint_indicator_flags, 0x9000_0000_0000);
        assert_eq!(record.general_level_idc, 93);
        assert_eq!(record.min_spatial_segmentation_idc, 0);
        assert_eq!(record.parallelism_type, 0);
        assert_eq!(record.chroma_format_idc, 1);
        assert_eq!(record.bit_depth_luma_minus8, 0);
        assert_eq!(record.bit_depth_chroma_minus8, 0);
        assert_eq!(record.avg_frame_rate, 0);
        assert_eq!(record.constant_frame_rate, 0);
        assert_eq!(record.num_temporal_layers, 1);
        assert!(record.temporal_id_nested);
        assert_eq!(record.length_size(), 4);
    }

    #[test]
    fn test_数组结构() {
        let data = build_record(&[(0xA0, vec![VPS]), (0x21, vec![SPS]), (0x22, vec![PPS])]);
        let record = parse_hvcc_record(&data).unwrap();

        assert_eq!(record.arrays.len(), 3);
        assert!(record.arrays[0].array_completeness);
        assert!(!record.arrays[1].array_completeness);
        assert_eq!(record.arrays[0].nal_type(), HevcNalUnitType::Vps);
        assert_eq!(record.arrays[1].nal_type(), HevcNalUnitType::Sps);
        assert_eq!(record.arrays[2].nal_type(), HevcNalUnitType::Pps);
        assert_eq!(record.arrays[1].nalus, vec![Bytes::from_static(SPS)]);
    }

    #[test]
    fn test_提取参数集() {
        let data = build_record(&[(0x20, vec![VPS]), (0x21, vec![SPS]), (0x22, vec![PPS])]);
        let sets = parse_vps_sps_pps(&data).unwrap();
        assert_eq!(sets.vps.as_ref(), VPS);
        assert_eq!(sets.sps.as_ref(), SPS);
        assert_eq!(sets.pps.as_ref(), PPS);
        assert_eq!(sets.get(ParameterSetKind::Sps).as_ref(), SPS);
        assert_eq!(sets.to_annex_b(), vps_sps_pps_to_annex_b(VPS, SPS, PPS));
    }

    #[test]
    fn test_重复参数集_保留第一个() {
        let sps2: &[u8] = &[0x42, 0x01, 0xFF];
        let pps2: &[u8] = &[0x44, 0x01, 0xEE];
        let data = build_record(&[
            (0x20, vec![VPS]),
            (0x21, vec![SPS, sps2]),
            (0x22, vec![PPS]),
            (0x22, vec![pps2]),
        ]);
        let record = parse_hvcc_record(&data).unwrap();
        assert_eq!(record.nalus_of(ParameterSetKind::Sps).count(), 2);
        assert_eq!(record.nalus_of(ParameterSetKind::Pps).count(), 2);

        assert_eq!(record.first_nalu(ParameterSetKind::Sps).unwrap().as_ref(), SPS);
        assert_eq!(record.first_nalu(ParameterSetKind::Pps).unwrap().as_ref(), PPS);

        let sets = record.parameter_sets().unwrap();
        assert_eq!(sets.sps.as_ref(), SPS);
        assert_eq!(sets.pps.as_ref(), PPS);
    }

    #[test]
    fn test_首个nalu() {
        let data = build_record(&[(0x20, vec![]), (0x21, vec![SPS]), (0x20, vec![VPS])]);
        let record = parse_hvcc_record(&data).unwrap();
        assert_eq!(record.first_nalu(ParameterSetKind::Vps).unwrap().as_ref(), VPS);
        assert_eq!(record.first_nalu(ParameterSetKind::Pps), None);
    }

    #[test]
    fn test_空数组不占用首个位置() {
        // 第一个 VPS 数组没有条目, 取第二个数组中的 VPS
        let data = build_record(&[
            (0x20, vec![]),
            (0x21, vec![SPS]),
            (0x20, vec![VPS]),
            (0x22, vec![PPS]),
        ]);
        let sets = parse_vps_sps_pps(&data).unwrap();
        assert_eq!(sets.vps.as_ref(), VPS);
    }

    #[test]
    fn test_其他类型数组被跳过() {
        let sei: &[u8] = &[0x4E, 0x01, 0x05, 0x10];
        let data = build_record(&[
            (0x27, vec![sei]),
            (0x20, vec![VPS]),
            (0x21, vec![SPS]),
            (0x22, vec![PPS]),
        ]);
        let record = parse_hvcc_record(&data).unwrap();
        assert_eq!(record.arrays[0].nal_type(), HevcNalUnitType::PrefixSei);
        assert_eq!(record.arrays[0].parameter_set_kind(), None);
        assert_eq!(record.arrays[1].parameter_set_kind(), Some(ParameterSetKind::Vps));
        let sets = record.parameter_sets().unwrap();
        assert_eq!(sets.vps.as_ref(), VPS);
    }

    #[test]
    fn test_缺少参数集() {
        let data = build_record(&[(0x21, vec![SPS]), (0x22, vec![PPS])]);
        assert_eq!(
            parse_vps_sps_pps(&data),
            Err(HvccError::MissingParameterSet(ParameterSetKind::Vps))
        );

        let data = build_record(&[(0x20, vec![VPS]), (0x22, vec![PPS])]);
        assert_eq!(
            parse_vps_sps_pps(&data),
            Err(HvccError::MissingParameterSet(ParameterSetKind::Sps))
        );

        let data = build_record(&[(0x20, vec![VPS]), (0x21, vec![SPS])]);
        assert_eq!(
            parse_vps_sps_pps(&data),
            Err(HvccError::MissingParameterSet(ParameterSetKind::Pps))
        );

        // 结构合法但没有任何数组
        let data = build_record(&[]);
        assert!(parse_hvcc_record(&data).unwrap().arrays.is_empty());
        assert_eq!(
            parse_vps_sps_pps(&data),
            Err(HvccError::MissingParameterSet(ParameterSetKind::Vps))
        );
    }

    #[test]
    fn test_固定头部不足() {
        let data = build_record(&[]);
        assert_eq!(
            parse_hvcc_record(&data[..10]),
            Err(HvccError::TruncatedHeader {
                needed: 23,
                remaining: 10
            })
        );
        // 固定头部完整但缺少 numOfArrays
        assert!(matches!(
            parse_hvcc_record(&data[..22]),
            Err(HvccError::TruncatedHeader { .. })
        ));
        assert!(matches!(
            parse_hvcc_record(&[]),
            Err(HvccError::TruncatedHeader { remaining: 0, .. })
        ));
    }

    #[test]
    fn test_数组头不足() {
        let mut data = build_record(&[(0x20, vec![VPS])]);
        // 声明 2 个数组, 实际只有 1 个
        data[22] = 2;
        assert_eq!(
            parse_hvcc_record(&data),
            Err(HvccError::TruncatedArrayHeader {
                index: 1,
                remaining: 0
            })
        );

        data.extend_from_slice(&[0x21, 0x00]);
        assert_eq!(
            parse_hvcc_record(&data),
            Err(HvccError::TruncatedArrayHeader {
                index: 1,
                remaining: 2
            })
        );
    }

    #[test]
    fn test_条目长度超出剩余数据() {
        let mut data = build_record(&[(0x20, vec![VPS]), (0x21, vec![SPS]), (0x22, vec![PPS])]);
        // PPS 的长度字段位于倒数第 5, 4 字节, 改为 0x0010
        let len_pos = data.len() - PPS.len() - 2;
        data[len_pos] = 0x00;
        data[len_pos + 1] = 0x10;
        assert_eq!(
            parse_hvcc_record(&data),
            Err(HvccError::TruncatedEntry {
                nal_unit_type: 34,
                needed: 16,
                remaining: 3
            })
        );
    }

    #[test]
    fn test_条目长度字段不足() {
        let data = build_record(&[(0x20, vec![VPS]), (0x21, vec![SPS]), (0x22, vec![PPS])]);
        let cut = data.len() - PPS.len() - 1;
        assert_eq!(
            parse_hvcc_record(&data[..cut]),
            Err(HvccError::TruncatedEntry {
                nal_unit_type: 34,
                needed: 2,
                remaining: 1
            })
        );
    }

    #[test]
    fn test_尾部多余数据被容忍() {
        let mut data = build_record(&[(0x20, vec![VPS]), (0x21, vec![SPS]), (0x22, vec![PPS])]);
        data.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        let sets = parse_vps_sps_pps(&data).unwrap();
        assert_eq!(sets.pps.as_ref(), PPS);
    }

    #[test]
    fn test_保留位不校验() {
        let mut data = build_record(&[(0x20, vec![VPS]), (0x21, vec![SPS]), (0x22, vec![PPS])]);
        // 清空所有保留位
        data[13] &= 0x0F;
        data[15] &= 0x03;
        data[16] &= 0x03;
        data[17] &= 0x07;
        data[18] &= 0x07;
        let record = parse_hvcc_record(&data).unwrap();
        assert_eq!(record.chroma_format_idc, 1);
        assert!(record.parameter_sets().is_ok());
    }

    #[test]
    fn test_零拷贝解析() {
        let data = Bytes::from(build_record(&[
            (0x20, vec![VPS]),
            (0x21, vec![SPS]),
            (0x22, vec![PPS]),
        ]));
        let sets = parse_vps_sps_pps_bytes(data.clone()).unwrap();
        let vps_offset = 23 + 3 + 2;
        assert_eq!(sets.vps.as_ptr(), data[vps_offset..].as_ptr());
    }
}
