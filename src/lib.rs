//! procsnap - point-in-time snapshots of Linux `/proc` records
//!
//! This library reads the text records the kernel exposes under `/proc` and
//! converts them into typed values: load averages, memory, CPU time
//! accounting, swap, uptime, kernel release, and the full per-process
//! `/proc/<pid>/stat` record. Every call performs a fresh read; nothing is
//! cached and no field is ever silently defaulted.

// 导出所有公共模块
pub mod linux;
pub mod snapshot;
pub mod sys;

// 重新导出常用类型，使其可以直接从 crate 根访问
pub use crate::linux::proc::{list_process_records, read_process_record};
pub use crate::linux::proc_stat::{parse_process_record, ProcessRecord};
pub use crate::snapshot::SystemSnapshot;
pub use crate::sys::{ProcError, ProcFs, ProcessId, ProcfsConfig, Result, VanishedPolicy};

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 初始化日志系统并检查 proc 根目录
///
/// 日志级别由 `RUST_LOG` 控制，默认为 `info`。重复调用不会替换已安装的日志器。
pub fn init(fs: &ProcFs) -> Result<()> {
    // 初始化日志
    if let Err(e) =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init()
    {
        log::debug!("logger already installed, keeping it: {}", e);
    }

    // 检查运行时环境
    check_environment(fs)
}

/// 检查运行时环境
fn check_environment(fs: &ProcFs) -> Result<()> {
    // 检查是否能读取内核版本
    let release = fs.kernel_release()?;
    log::debug!("reading {} on kernel {}", fs.root().display(), release);
    Ok(())
}
