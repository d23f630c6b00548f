use serde::Serialize;

use crate::linux::{nth_token, parse_float, parse_int};
use crate::sys::{ProcError, ProcFs, Result};

const LOADAVG_FIELDS: usize = 5;

/// `/proc/loadavg` 的内容
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
    /// 当前可运行的任务数
    pub runnable: u64,
    /// 系统中存在的任务总数
    pub total: u64,
    /// 最近创建的进程ID
    pub last_pid: i32,
}

/// 解析 `/proc/loadavg`，例如 `0.00 0.01 0.05 1/123 4567`
pub fn parse_loadavg(content: &str) -> Result<LoadAverage> {
    let line = content.strip_suffix('\n').unwrap_or(content);
    let tokens: Vec<&str> = line.split(' ').collect();
    let token = |i| nth_token(&tokens, i, LOADAVG_FIELDS, "loadavg");

    let tasks = token(3)?;
    let (runnable, total) = tasks
        .split_once('/')
        .ok_or_else(|| ProcError::field("tasks", tasks))?;

    Ok(LoadAverage {
        one: parse_float("load1", token(0)?)?,
        five: parse_float("load5", token(1)?)?,
        fifteen: parse_float("load15", token(2)?)?,
        runnable: parse_int("runnable", runnable)?,
        total: parse_int("total", total)?,
        last_pid: parse_int("last_pid", token(4)?)?,
    })
}

impl ProcFs {
    pub fn load_average(&self) -> Result<LoadAverage> {
        parse_loadavg(&self.read_string("loadavg")?)
    }
}

/// 从 `/proc/loadavg` 读取负载
pub fn get_load_average() -> Result<LoadAverage> {
    ProcFs::default().load_average()
}
