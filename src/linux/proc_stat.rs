use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::linux::is_decimal;
use crate::sys::{ProcError, ProcFs, ProcessId, Result};

/// `/proc/[pid]/stat` 中可执行文件名之后的固定字段数（state 到 exit_code）
pub const FIELDS_AFTER_COMM: usize = 50;

/// 进程的统计信息，字段顺序与内核输出一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub pid: i32,
    /// 可执行文件名的原始字节，可能包含空格和括号
    #[serde(serialize_with = "serialize_comm")]
    pub comm: Vec<u8>,
    pub state: char,
    pub ppid: i32,
    pub pgrp: i32,
    pub session: i32,
    pub tty_nr: i32,
    pub tpgid: i32,
    pub flags: u32,
    pub minflt: u64,
    pub cminflt: u64,
    pub majflt: u64,
    pub cmajflt: u64,
    pub utime: u64,          // 用户态时钟滴答数
    pub stime: u64,          // 内核态时钟滴答数
    pub cutime: i64,         // 已等待子进程的用户态时钟滴答数
    pub cstime: i64,         // 已等待子进程的内核态时钟滴答数
    pub priority: i64,
    pub nice: i64,
    pub num_threads: i64,
    pub itrealvalue: i64,
    pub starttime: u64,      // 自系统启动以来的时钟滴答数
    pub vsize: u64,
    pub rss: i64,
    /// 可能超出 i64 范围（无限制时为 u64::MAX），保留为十进制文本
    pub rsslim: String,
    pub startcode: u64,
    pub endcode: u64,
    pub startstack: u64,
    pub kstkesp: u64,
    pub kstkeip: u64,
    pub signal: u64,
    pub blocked: u64,
    pub sigignore: u64,
    pub sigcatch: u64,
    pub wchan: u64,
    pub nswap: u64,
    pub cnswap: u64,
    pub exit_signal: i32,
    pub processor: i32,
    pub rt_priority: u32,
    pub policy: u32,
    pub delayacct_blkio_ticks: u64,
    pub guest_time: u64,
    pub cguest_time: i64,
    pub start_data: u64,
    pub end_data: u64,
    pub start_brk: u64,
    pub arg_start: u64,
    pub arg_end: u64,
    pub env_start: u64,
    pub env_end: u64,
    pub exit_code: i32,
}

fn serialize_comm<S: Serializer>(comm: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(comm))
}

impl ProcessRecord {
    /// 从/proc/[pid]/stat获取进程统计信息
    pub fn from_pid(pid: ProcessId) -> Result<Self> {
        ProcFs::default().process_record(pid)
    }

    /// 可执行文件名的文本形式，非 UTF-8 字节会被替换
    pub fn comm_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.comm)
    }

    pub fn process_id(&self) -> Option<ProcessId> {
        ProcessId::new(self.pid)
    }

    /// 用户态与内核态时钟滴答数之和，不做单位换算
    pub fn total_ticks(&self) -> u64 {
        self.utime.saturating_add(self.stime)
    }

    /// 按内核格式重新生成 stat 行（不含结尾换行）
    pub fn to_line(&self) -> Vec<u8> {
        let fields: [String; FIELDS_AFTER_COMM] = [
            self.state.to_string(),
            self.ppid.to_string(),
            self.pgrp.to_string(),
            self.session.to_string(),
            self.tty_nr.to_string(),
            self.tpgid.to_string(),
            self.flags.to_string(),
            self.minflt.to_string(),
            self.cminflt.to_string(),
            self.majflt.to_string(),
            self.cmajflt.to_string(),
            self.utime.to_string(),
            self.stime.to_string(),
            self.cutime.to_string(),
            self.cstime.to_string(),
            self.priority.to_string(),
            self.nice.to_string(),
            self.num_threads.to_string(),
            self.itrealvalue.to_string(),
            self.starttime.to_string(),
            self.vsize.to_string(),
            self.rss.to_string(),
            self.rsslim.clone(),
            self.startcode.to_string(),
            self.endcode.to_string(),
            self.startstack.to_string(),
            self.kstkesp.to_string(),
            self.kstkeip.to_string(),
            self.signal.to_string(),
            self.blocked.to_string(),
            self.sigignore.to_string(),
            self.sigcatch.to_string(),
            self.wchan.to_string(),
            self.nswap.to_string(),
            self.cnswap.to_string(),
            self.exit_signal.to_string(),
            self.processor.to_string(),
            self.rt_priority.to_string(),
            self.policy.to_string(),
            self.delayacct_blkio_ticks.to_string(),
            self.guest_time.to_string(),
            self.cguest_time.to_string(),
            self.start_data.to_string(),
            self.end_data.to_string(),
            self.start_brk.to_string(),
            self.arg_start.to_string(),
            self.arg_end.to_string(),
            self.env_start.to_string(),
            self.env_end.to_string(),
            self.exit_code.to_string(),
        ];

        let mut line = format!("{} (", self.pid).into_bytes();
        line.extend_from_slice(&self.comm);
        line.extend_from_slice(b") ");
        line.extend_from_slice(fields.join(" ").as_bytes());
        line
    }
}

impl fmt::Display for ProcessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_line()))
    }
}

impl ProcFs {
    /// 读取并解析 `<root>/<pid>/stat`
    pub fn process_record(&self, pid: ProcessId) -> Result<ProcessRecord> {
        let raw = self.read_bytes(format!("{}/stat", pid))?;
        parse_process_record(&raw)
    }
}

fn malformed(reason: impl Into<String>) -> ProcError {
    ProcError::MalformedRecord(reason.into())
}

/// 按顺序消费 `)` 之后的字段
struct FieldCursor<'a> {
    tokens: std::slice::Iter<'a, &'a str>,
}

impl<'a> FieldCursor<'a> {
    fn token(&mut self, field: &'static str) -> Result<&'a str> {
        self.tokens
            .next()
            .copied()
            .ok_or_else(|| malformed(format!("missing field `{}`", field)))
    }

    fn int<T: FromStr>(&mut self, field: &'static str) -> Result<T> {
        let token = self.token(field)?;
        if !is_decimal(token) {
            return Err(ProcError::field(field, token));
        }
        token.parse().map_err(|_| ProcError::field(field, token))
    }

    fn state(&mut self) -> Result<char> {
        let token = self.token("state")?;
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ProcError::field("state", token)),
        }
    }

    /// 只校验为无符号十进制，不绑定整数类型
    fn numeric_text(&mut self, field: &'static str) -> Result<String> {
        let token = self.token(field)?;
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProcError::field(field, token));
        }
        Ok(token.to_string())
    }
}

/// 解析 `/proc/[pid]/stat` 的完整内容
///
/// 可执行文件名位于 pid 之后的第一个 `(` 与整行最后一个 `)` 之间，
/// 名字本身可以包含空格和括号。其余字段在最后一个 `)` 之后按单个空格切分，
/// 数量必须正好是 [`FIELDS_AFTER_COMM`]。任何字段解析失败都不会返回部分结果。
pub fn parse_process_record(raw: &[u8]) -> Result<ProcessRecord> {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);

    let pid_end = line
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| malformed("missing separator after pid"))?;
    let pid_token = String::from_utf8_lossy(&line[..pid_end]);
    if pid_token.is_empty() || !pid_token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!("invalid pid token {:?}", pid_token)));
    }
    let pid: i32 = pid_token
        .parse()
        .map_err(|_| malformed(format!("invalid pid token {:?}", pid_token)))?;

    // 名字可能包含 ')'，必须取最后一个
    let rest = &line[pid_end + 1..];
    if rest.first() != Some(&b'(') {
        return Err(malformed("missing '(' after pid"));
    }
    let close = rest
        .iter()
        .rposition(|&b| b == b')')
        .ok_or_else(|| malformed("missing ')' after executable name"))?;
    let comm = &rest[1..close];
    if comm.is_empty() {
        return Err(malformed("empty executable name"));
    }

    let fields = match &rest[close + 1..] {
        [] => "",
        [b' ', tail @ ..] => std::str::from_utf8(tail)
            .map_err(|_| malformed("non-UTF-8 data after executable name"))?,
        _ => return Err(malformed("missing space after executable name")),
    };
    let tokens: Vec<&str> = if fields.is_empty() {
        Vec::new()
    } else {
        fields.split(' ').collect()
    };
    if tokens.len() != FIELDS_AFTER_COMM {
        return Err(malformed(format!(
            "expected {} fields after executable name, found {}",
            FIELDS_AFTER_COMM,
            tokens.len()
        )));
    }

    let mut f = FieldCursor {
        tokens: tokens.iter(),
    };

    // 结构体字段按书写顺序求值，与内核字段顺序一致
    Ok(ProcessRecord {
        pid,
        comm: comm.to_vec(),
        state: f.state()?,
        ppid: f.int("ppid")?,
        pgrp: f.int("pgrp")?,
        session: f.int("session")?,
        tty_nr: f.int("tty_nr")?,
        tpgid: f.int("tpgid")?,
        flags: f.int("flags")?,
        minflt: f.int("minflt")?,
        cminflt: f.int("cminflt")?,
        majflt: f.int("majflt")?,
        cmajflt: f.int("cmajflt")?,
        utime: f.int("utime")?,
        stime: f.int("stime")?,
        cutime: f.int("cutime")?,
        cstime: f.int("cstime")?,
        priority: f.int("priority")?,
        nice: f.int("nice")?,
        num_threads: f.int("num_threads")?,
        itrealvalue: f.int("itrealvalue")?,
        starttime: f.int("starttime")?,
        vsize: f.int("vsize")?,
        rss: f.int("rss")?,
        rsslim: f.numeric_text("rsslim")?,
        startcode: f.int("startcode")?,
        endcode: f.int("endcode")?,
        startstack: f.int("startstack")?,
        kstkesp: f.int("kstkesp")?,
        kstkeip: f.int("kstkeip")?,
        signal: f.int("signal")?,
        blocked: f.int("blocked")?,
        sigignore: f.int("sigignore")?,
        sigcatch: f.int("sigcatch")?,
        wchan: f.int("wchan")?,
        nswap: f.int("nswap")?,
        cnswap: f.int("cnswap")?,
        exit_signal: f.int("exit_signal")?,
        processor: f.int("processor")?,
        rt_priority: f.int("rt_priority")?,
        policy: f.int("policy")?,
        delayacct_blkio_ticks: f.int("delayacct_blkio_ticks")?,
        guest_time: f.int("guest_time")?,
        cguest_time: f.int("cguest_time")?,
        start_data: f.int("start_data")?,
        end_data: f.int("end_data")?,
        start_brk: f.int("start_brk")?,
        arg_start: f.int("arg_start")?,
        arg_end: f.int("arg_end")?,
        env_start: f.int("env_start")?,
        env_end: f.int("env_end")?,
        exit_code: f.int("exit_code")?,
    })
}
