use serde::Serialize;

use crate::linux::loadavg::LoadAverage;
use crate::linux::meminfo::MemoryInfo;
use crate::linux::stat::CpuTimes;
use crate::linux::swaps::SwapDevice;
use crate::linux::uptime::Uptime;
use crate::sys::{ProcError, ProcFs, Result};

/// 系统级指标的一次性快照
///
/// 每个字段单独读取，字段之间不保证对应同一时刻。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub kernel_release: String,
    pub uptime: Uptime,
    pub load: LoadAverage,
    pub memory: MemoryInfo,
    pub cpu: CpuTimes,
    pub processes_blocked: u64,
    /// 未配置交换设备时为 `None`
    pub swap: Option<SwapDevice>,
}

impl SystemSnapshot {
    /// 依次读取所有系统级文件，任意一个失败即返回错误
    pub fn collect(fs: &ProcFs) -> Result<Self> {
        let swap = match fs.primary_swap() {
            Ok(swap) => Some(swap),
            Err(ProcError::NoSwapDevice) => None,
            Err(e) => return Err(e),
        };

        Ok(SystemSnapshot {
            kernel_release: fs.kernel_release()?,
            uptime: fs.uptime()?,
            load: fs.load_average()?,
            memory: fs.memory_info()?,
            cpu: fs.cpu_times()?,
            processes_blocked: fs.processes_blocked()?,
            swap,
        })
    }
}
