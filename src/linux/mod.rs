//! Readers for the text records the kernel exposes under `/proc`.

pub mod loadavg;
pub mod meminfo;
pub mod osrelease;
pub mod proc;
pub mod proc_stat;
pub mod stat;
pub mod swaps;
pub mod uptime;

use std::str::FromStr;

use crate::sys::{ProcError, Result};

/// 可选负号加至少一位数字，不接受 `+` 前缀和空白
pub(crate) fn is_decimal(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// 十进制整数或带小数部分的十进制数，例如 `0.52`、`350735.47`
fn is_plain_float(token: &str) -> bool {
    match token.split_once('.') {
        Some((int, frac)) => {
            is_decimal(int) && !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => is_decimal(token),
    }
}

/// 解析十进制整数字段，失败时带上字段名和原始文本
pub(crate) fn parse_int<T: FromStr>(field: &'static str, token: &str) -> Result<T> {
    if !is_decimal(token) {
        return Err(ProcError::field(field, token));
    }
    token.parse().map_err(|_| ProcError::field(field, token))
}

/// 解析有限的十进制浮点字段，拒绝 `inf`、`NaN` 和指数形式
pub(crate) fn parse_float(field: &'static str, token: &str) -> Result<f64> {
    if !is_plain_float(token) {
        return Err(ProcError::field(field, token));
    }
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ProcError::field(field, token))
}

/// 取第 `index` 个字段，缺失时报告期望的字段数
pub(crate) fn nth_token<'a>(
    tokens: &[&'a str],
    index: usize,
    expected: usize,
    source: &str,
) -> Result<&'a str> {
    tokens.get(index).copied().ok_or_else(|| {
        ProcError::MalformedRecord(format!(
            "{}: expected {} fields, found {}",
            source,
            expected,
            tokens.len()
        ))
    })
}
