use std::time::Duration;

use serde::Serialize;

use crate::linux::{nth_token, parse_float};
use crate::sys::{ProcFs, Result};

/// `/proc/uptime`，单位为秒
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Uptime {
    /// 系统运行时间
    pub system: f64,
    /// 所有 CPU 空闲时间之和
    pub idle: f64,
}

impl Uptime {
    /// 运行时间为负数或超出 `Duration` 范围时返回 `None`
    pub fn as_duration(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.system).ok()
    }
}

pub fn parse_uptime(content: &str) -> Result<Uptime> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let token = |i| nth_token(&tokens, i, 2, "uptime");

    Ok(Uptime {
        system: parse_float("uptime", token(0)?)?,
        idle: parse_float("idle", token(1)?)?,
    })
}

impl ProcFs {
    pub fn uptime(&self) -> Result<Uptime> {
        parse_uptime(&self.read_string("uptime")?)
    }
}

/// 获取系统运行时间
pub fn get_system_uptime() -> Result<Uptime> {
    ProcFs::default().uptime()
}
