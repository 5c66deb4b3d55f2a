//! 日志初始化模块.
//!
//! 双输出:
//! - console: 彩色, 写到 stderr (stdout 留给检查结果), 默认 warn, -v 提升到 debug
//! - file: 无色, 默认 info, 可通过 -v/-vv 或 HVCC_LOG 环境变量调整
//!
//! 日志文件输出到 $cwd/logs/{prefix}.{date}.log

use chrono::{Datelike, Local, Timelike};
use std::sync::OnceLock;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, FormatEvent, FormatFields, format::Writer},
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// 日志目录
const LOG_DIR: &str = "logs";

/// 覆盖文件日志过滤规则的环境变量
const LOG_ENV: &str = "HVCC_LOG";

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// 由命令行参数得到的日志配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// 控制台过滤规则
    pub console_level: &'static str,
    /// 文件过滤规则 (HVCC_LOG 未设置时使用)
    pub file_level: &'static str,
}

impl LogConfig {
    /// 0=默认, 1=debug, 2+=trace (由 -v/-vv 控制)
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => Self {
                console_level: "warn",
                file_level: "info",
            },
            1 => Self {
                console_level: "debug",
                file_level: "debug",
            },
            _ => Self {
                console_level: "trace",
                file_level: "trace",
            },
        }
    }
}

/// 初始化日志系统
///
/// 日志目录无法创建时只启用 console 输出.
pub fn init(file_prefix: &str, verbosity: u8) {
    let config = LogConfig::from_verbosity(verbosity);

    let console_layer = fmt::Layer::default()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .event_format(ConsoleFormatter)
        .with_filter(EnvFilter::new(config.console_level));

    let file_appender = std::fs::create_dir_all(LOG_DIR).ok().and_then(|_| {
        tracing_appender::rolling::RollingFileAppender::builder()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix(file_prefix)
            .filename_suffix("log")
            .build(LOG_DIR)
            .ok()
    });

    let file_layer = file_appender.map(|appender| {
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        LOG_GUARD.set(guard).ok();

        let file_filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(config.file_level));
        fmt::Layer::default()
            .with_writer(non_blocking)
            .with_ansi(false)
            .event_format(FileFormatter)
            .with_filter(file_filter)
    });

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Console 格式: 彩色, 带时间戳
struct ConsoleFormatter;

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = Local::now();
        let meta = event.metadata();
        let color = match *meta.level() {
            tracing::Level::ERROR => "\x1b[31m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::INFO => "\x1b[32m",
            _ => "\x1b[34m",
        };
        write!(
            writer,
            "[{:02}:{:02}:{:02}.{:03}] {}{:5}\x1b[0m > ",
            now.hour(),
            now.minute(),
            now.second(),
            now.timestamp_subsec_millis(),
            color,
            meta.level(),
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// File 格式: 无色, 日期时间 + 级别 + target + 消息
struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = Local::now();
        let meta = event.metadata();
        write!(
            writer,
            "[{:02}-{:02} {:02}:{:02}:{:02}.{:03}] {:5} {} > ",
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            now.timestamp_subsec_millis(),
            meta.level(),
            meta.target(),
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
