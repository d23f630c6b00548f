use serde::Serialize;

use crate::linux::{nth_token, parse_int};
use crate::sys::{ProcError, ProcFs, Result};

const SWAPS_FIELDS: usize = 5;

/// `/proc/swaps` 中的一个交换设备，大小单位为 kB
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapDevice {
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
    pub used: u64,
    pub priority: i32,
}

impl SwapDevice {
    /// 剩余可用的交换空间
    pub fn free(&self) -> u64 {
        self.size.saturating_sub(self.used)
    }
}

fn parse_swap_line(line: &str) -> Result<SwapDevice> {
    // 列之间的空白数量不固定
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let token = |i| nth_token(&tokens, i, SWAPS_FIELDS, "swaps");

    Ok(SwapDevice {
        filename: token(0)?.to_string(),
        kind: token(1)?.to_string(),
        size: parse_int("size", token(2)?)?,
        used: parse_int("used", token(3)?)?,
        priority: parse_int("priority", token(4)?)?,
    })
}

/// 解析 `/proc/swaps` 中的所有设备，跳过表头
pub fn parse_swaps(content: &str) -> Result<Vec<SwapDevice>> {
    content
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(parse_swap_line)
        .collect()
}

/// 解析表头之后的第一个设备，没有设备时返回 [`ProcError::NoSwapDevice`]
pub fn parse_primary_swap(content: &str) -> Result<SwapDevice> {
    match content.lines().nth(1) {
        Some(line) if !line.trim().is_empty() => parse_swap_line(line),
        _ => Err(ProcError::NoSwapDevice),
    }
}

impl ProcFs {
    pub fn swap_devices(&self) -> Result<Vec<SwapDevice>> {
        parse_swaps(&self.read_string("swaps")?)
    }

    pub fn primary_swap(&self) -> Result<SwapDevice> {
        parse_primary_swap(&self.read_string("swaps")?)
    }
}

/// 从 `/proc/swaps` 读取第一个交换设备
pub fn get_primary_swap() -> Result<SwapDevice> {
    ProcFs::default().primary_swap()
}
