//! hvcc-cli - HEVC 序列头检查与 Annex B 导出工具
//!
//! 读取 HEVCDecoderConfigurationRecord (可带 FLV 视频 Tag 前缀), 输出记录摘要,
//! 并可将 VPS/SPS/PPS 写成 Annex B 裸码流文件, 供解码器或 `ffprobe` 直接使用.

mod logging;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, error, info};

use hvcc_codec::parsers::h265::{
    HvccRecord, ParameterSets, parse_hvcc_record, strip_flv_video_tag_prefix,
};
use hvcc_core::ParameterSetKind;

/// HEVC 序列头检查工具
#[derive(Parser, Debug)]
#[command(name = "hvcc-cli", version, about = "HEVC 序列头检查与 Annex B 导出工具")]
struct Cli {
    /// 输入文件路径 (hvcC 记录)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// 输出 Annex B 文件路径
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 输入为 FLV 视频 Tag 数据 (带 5 字节前缀 1c 00 00 00 00)
    #[arg(long)]
    flv: bool,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 日志级别 (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ============================================================
// 输出结构体
// ============================================================

/// 记录摘要
#[derive(Debug, Serialize)]
struct RecordSummary {
    configuration_version: u8,
    general_profile_idc: u8,
    general_tier_flag: bool,
    general_level_idc: u8,
    chroma_format_idc: u8,
    bit_depth_luma: u8,
    bit_depth_chroma: u8,
    length_size: usize,
    arrays: Vec<ArraySummary>,
    vps_size: usize,
    sps_size: usize,
    pps_size: usize,
    annex_b_size: usize,
}

/// NAL 数组摘要
#[derive(Debug, Serialize)]
struct ArraySummary {
    nal_unit_type: u8,
    name: String,
    array_completeness: bool,
    nalu_sizes: Vec<usize>,
}

/// 一次检查的结果
#[derive(Debug)]
struct Inspection {
    summary: RecordSummary,
    annex_b: Bytes,
}

impl RecordSummary {
    fn new(record: &HvccRecord, sets: &ParameterSets, annex_b: &Bytes) -> Self {
        Self {
            configuration_version: record.configuration_version,
            general_profile_idc: record.general_profile_idc,
            general_tier_flag: record.general_tier_flag,
            general_level_idc: record.general_level_idc,
            chroma_format_idc: record.chroma_format_idc,
            bit_depth_luma: record.bit_depth_luma_minus8 + 8,
            bit_depth_chroma: record.bit_depth_chroma_minus8 + 8,
            length_size: record.length_size(),
            arrays: record
                .arrays
                .iter()
                .map(|array| ArraySummary {
                    nal_unit_type: array.nal_unit_type,
                    name: array.nal_type().to_string(),
                    array_completeness: array.array_completeness,
                    nalu_sizes: array.nalus.iter().map(Bytes::len).collect(),
                })
                .collect(),
            vps_size: sets.get(ParameterSetKind::Vps).len(),
            sps_size: sets.get(ParameterSetKind::Sps).len(),
            pps_size: sets.get(ParameterSetKind::Pps).len(),
            annex_b_size: annex_b.len(),
        }
    }

    fn print_text(&self) {
        println!("configurationVersion: {}", self.configuration_version);
        println!(
            "profile_idc: {}, tier: {}, level_idc: {}",
            self.general_profile_idc,
            if self.general_tier_flag { "High" } else { "Main" },
            self.general_level_idc
        );
        println!(
            "chroma_format_idc: {}, bit_depth: {}/{}",
            self.chroma_format_idc, self.bit_depth_luma, self.bit_depth_chroma
        );
        println!("NAL 长度字段: {} 字节", self.length_size);
        for (i, array) in self.arrays.iter().enumerate() {
            println!(
                "  数组 #{i}: {} (type={}, complete={}) NAL 大小 {:?}",
                array.name, array.nal_unit_type, array.array_completeness, array.nalu_sizes
            );
        }
        println!(
            "VPS {} 字节, SPS {} 字节, PPS {} 字节, Annex B {} 字节",
            self.vps_size, self.sps_size, self.pps_size, self.annex_b_size
        );
    }
}

// ============================================================
// 主逻辑
// ============================================================

fn main() {
    let cli = Cli::parse();
    logging::init("hvcc-cli", cli.verbose);

    let Some(input) = cli.input.as_deref() else {
        print_banner();
        return;
    };

    if let Err(e) = run(&cli, input) {
        error!("{e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli, input: &Path) -> Result<()> {
    let data = std::fs::read(input)
        .with_context(|| format!("读取输入文件失败, path={}", input.display()))?;
    debug!("输入 {} 字节, flv={}", data.len(), cli.flv);

    let inspection = inspect(&data, cli.flv)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&inspection.summary)?);
    } else {
        inspection.summary.print_text();
    }

    if let Some(output) = &cli.output {
        std::fs::write(output, &inspection.annex_b)
            .with_context(|| format!("写入输出文件失败, path={}", output.display()))?;
        info!(
            "已写入 Annex B 码流 {} 字节: {}",
            inspection.annex_b.len(),
            output.display()
        );
    }

    Ok(())
}

/// 解析序列头并生成 Annex B 码流
fn inspect(data: &[u8], flv: bool) -> Result<Inspection> {
    let body = if flv {
        strip_flv_video_tag_prefix(data).context("FLV 视频 Tag 前缀无效")?
    } else {
        data
    };

    let record = parse_hvcc_record(body).context("解析 HEVCDecoderConfigurationRecord 失败")?;
    let sets = record.parameter_sets().context("提取 VPS/SPS/PPS 失败")?;
    let annex_b = sets.to_annex_b();

    Ok(Inspection {
        summary: RecordSummary::new(&record, &sets, &annex_b),
        annex_b,
    })
}

fn print_banner() {
    eprintln!(
        "hvcc-cli 版本 {} -- HEVC 序列头检查工具",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!("用法: hvcc-cli -i <hvcC 文件> [-o <输出.h265>] [--flv] [--json]");
    eprintln!("使用 --help 查看详细帮助信息");
}
