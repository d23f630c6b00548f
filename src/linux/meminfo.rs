use serde::Serialize;

use crate::linux::parse_int;
use crate::sys::{ProcError, ProcFs, Result};

/// `/proc/meminfo` 前五行的固定顺序
const MEMINFO_KEYS: [&str; 5] = ["MemTotal", "MemFree", "MemAvailable", "Buffers", "Cached"];

/// 系统内存统计信息，单位为 kB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryInfo {
    pub total: u64,
    pub free: u64,
    pub available: u64,
    pub buffers: u64,
    pub cached: u64,
}

impl MemoryInfo {
    /// 总内存减去空闲内存
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }
}

/// 解析形如 `MemTotal:       16307664 kB` 的行，校验键名
fn parse_meminfo_line(line: Option<&str>, key: &'static str) -> Result<u64> {
    let line = line.ok_or_else(|| {
        ProcError::MalformedRecord(format!("meminfo: missing `{}` line", key))
    })?;
    let (name, rest) = line.split_once(':').ok_or_else(|| {
        ProcError::MalformedRecord(format!("meminfo: expected `{}:`, found {:?}", key, line))
    })?;
    if name != key {
        return Err(ProcError::MalformedRecord(format!(
            "meminfo: expected `{}`, found `{}`",
            key, name
        )));
    }

    let value = rest.split_whitespace().next().unwrap_or("");
    parse_int(key, value)
}

/// 按行位置解析 `/proc/meminfo` 的前五项
pub fn parse_meminfo(content: &str) -> Result<MemoryInfo> {
    let mut lines = content.lines();
    let [total, free, available, buffers, cached] = MEMINFO_KEYS;

    Ok(MemoryInfo {
        total: parse_meminfo_line(lines.next(), total)?,
        free: parse_meminfo_line(lines.next(), free)?,
        available: parse_meminfo_line(lines.next(), available)?,
        buffers: parse_meminfo_line(lines.next(), buffers)?,
        cached: parse_meminfo_line(lines.next(), cached)?,
    })
}

impl ProcFs {
    pub fn memory_info(&self) -> Result<MemoryInfo> {
        parse_meminfo(&self.read_string("meminfo")?)
    }
}

/// 获取系统内存信息
pub fn get_memory_info() -> Result<MemoryInfo> {
    ProcFs::default().memory_info()
}
