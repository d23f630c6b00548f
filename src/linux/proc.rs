use std::ffi::OsStr;

use crate::linux::proc_stat::ProcessRecord;
use crate::sys::{ProcFs, ProcessId, Result, VanishedPolicy};

/// 只接受全数字的目录名（即PID目录）
fn parse_pid_entry(name: &OsStr) -> Option<ProcessId> {
    let name = name.to_str()?;
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse::<i32>().ok().and_then(ProcessId::new)
}

impl ProcFs {
    /// 列出根目录下所有进程ID，顺序与目录列表一致
    pub fn process_ids(&self) -> Result<Vec<ProcessId>> {
        Ok(self
            .entry_names()?
            .iter()
            .filter_map(|name| parse_pid_entry(name))
            .collect())
    }

    /// 读取所有进程的统计信息
    ///
    /// 解析错误会立即返回。进程在列出后退出时按 [`VanishedPolicy`] 处理。
    pub fn process_records(&self) -> Result<Vec<ProcessRecord>> {
        let pids = self.process_ids()?;
        let mut records = Vec::with_capacity(pids.len());
        let mut vanished = 0usize;

        for pid in pids {
            match self.process_record(pid) {
                Ok(record) => records.push(record),
                Err(e) if e.is_vanished() && self.vanished_policy() == VanishedPolicy::Skip => {
                    log::debug!("process {} exited before it could be read: {}", pid, e);
                    vanished += 1;
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!(
            "read {} process records from {} ({} vanished)",
            records.len(),
            self.root().display(),
            vanished
        );
        Ok(records)
    }
}

/// 获取系统中所有进程的统计信息
pub fn list_process_records() -> Result<Vec<ProcessRecord>> {
    ProcFs::default().process_records()
}

/// 获取单个进程的统计信息
pub fn read_process_record(pid: ProcessId) -> Result<ProcessRecord> {
    ProcFs::default().process_record(pid)
}
