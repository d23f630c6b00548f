use serde::Serialize;

use crate::linux::{nth_token, parse_int};
use crate::sys::{ProcError, ProcFs, Result};

/// `cpu` 标签加 10 个计数器
const CPU_LINE_FIELDS: usize = 11;

/// `/proc/stat` 中汇总 `cpu` 行的时钟滴答数（USER_HZ）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuTimes {
    /// 所有类别之和。guest 已计入 user，guest_nice 已计入 nice，不重复累加
    /// 溢出时饱和到 `u64::MAX`
    pub fn total(&self) -> u64 {
        [
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .iter()
        .fold(self.user, |acc, &v| acc.saturating_add(v))
    }
}

/// 解析 `/proc/stat` 第一行的 CPU 汇总
pub fn parse_cpu_times(content: &str) -> Result<CpuTimes> {
    let line = content
        .lines()
        .next()
        .ok_or_else(|| ProcError::MalformedRecord("stat: empty file".to_string()))?;
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.first() != Some(&"cpu") {
        return Err(ProcError::MalformedRecord(
            "stat: first line is not the aggregate cpu line".to_string(),
        ));
    }
    let token = |i| nth_token(&tokens, i, CPU_LINE_FIELDS, "stat");

    Ok(CpuTimes {
        user: parse_int("user", token(1)?)?,
        nice: parse_int("nice", token(2)?)?,
        system: parse_int("system", token(3)?)?,
        idle: parse_int("idle", token(4)?)?,
        iowait: parse_int("iowait", token(5)?)?,
        irq: parse_int("irq", token(6)?)?,
        softirq: parse_int("softirq", token(7)?)?,
        steal: parse_int("steal", token(8)?)?,
        guest: parse_int("guest", token(9)?)?,
        guest_nice: parse_int("guest_nice", token(10)?)?,
    })
}

/// 解析 `procs_blocked` 行：等待 I/O 完成而阻塞的进程数
pub fn parse_processes_blocked(content: &str) -> Result<u64> {
    let value = content
        .lines()
        .find_map(|line| line.strip_prefix("procs_blocked "))
        .ok_or_else(|| ProcError::MalformedRecord("stat: missing procs_blocked line".to_string()))?;
    parse_int("procs_blocked", value.trim())
}

impl ProcFs {
    pub fn cpu_times(&self) -> Result<CpuTimes> {
        parse_cpu_times(&self.read_string("stat")?)
    }

    pub fn processes_blocked(&self) -> Result<u64> {
        parse_processes_blocked(&self.read_string("stat")?)
    }
}

/// 从 `/proc/stat` 读取 CPU 时间
pub fn get_cpu_times() -> Result<CpuTimes> {
    ProcFs::default().cpu_times()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const STAT: &str = "cpu  10132153 290696 3084719 46828483 16683 0 25195 0 175628 12\n\
        cpu0 1393280 32966 572056 13343292 6130 0 17875 0 23933 0\n\
        intr 1462898 0 0 0\n\
        ctxt 115315133\n\
        btime 1769000000\n\
        processes 86031\n\
        procs_running 2\n\
        procs_blocked 3\n\
        softirq 229245889 94 60001584 13619 5175704 2471304 0 2 0 0 0\n";

    #[test]
    fn test_parse_cpu_times() {
        let cpu = parse_cpu_times(STAT).unwrap();
        assert_eq!(
            cpu,
            CpuTimes {
                user: 10132153,
                nice: 290696,
                system: 3084719,
                idle: 46828483,
                iowait: 16683,
                irq: 0,
                softirq: 25195,
                steal: 0,
                guest: 175628,
                guest_nice: 12,
            }
        );
        assert_eq!(cpu.total(), 10132153 + 290696 + 3084719 + 46828483 + 16683 + 25195);
    }

    #[test]
    fn test_total_saturates() {
        let cpu = parse_cpu_times("cpu  18446744073709551615 1 0 0 0 0 0 0 0 0\n").unwrap();
        assert_eq!(cpu.user, u64::MAX);
        assert_eq!(cpu.total(), u64::MAX);
    }

    #[test]
    fn test_too_few_cpu_fields() {
        match parse_cpu_times("cpu  1 2 3 4\n") {
            Err(ProcError::MalformedRecord(msg)) => {
                assert!(msg.contains("expected 11"), "{}", msg);
                assert!(msg.contains("found 5"), "{}", msg);
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
        assert!(matches!(
            parse_cpu_times("intr 1 2 3\n"),
            Err(ProcError::MalformedRecord(_))
        ));
        assert!(matches!(parse_cpu_times(""), Err(ProcError::MalformedRecord(_))));
    }

    #[test]
    fn test_bad_cpu_field() {
        assert!(matches!(
            parse_cpu_times("cpu  1 2 x 4 5 6 7 8 9 10\n"),
            Err(ProcError::FieldParse { field: "system", .. })
        ));
        assert!(matches!(
            parse_cpu_times("cpu  1 +2 3 4 5 6 7 8 9 10\n"),
            Err(ProcError::FieldParse { field: "nice", .. })
        ));
    }

    #[test]
    fn test_processes_blocked() {
        assert_eq!(parse_processes_blocked(STAT).unwrap(), 3);
        assert!(matches!(
            parse_processes_blocked("cpu  1 2 3 4 5 6 7 8 9 10\n"),
            Err(ProcError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_read_from_root() {
        let dir = TempDir::new().unwrap();
        let fs = ProcFs::with_root(dir.path());
        assert!(matches!(fs.cpu_times(), Err(ProcError::Io { .. })));

        std::fs::write(dir.path().join("stat"), STAT).unwrap();
        assert_eq!(fs.cpu_times().unwrap().user, 10132153);
        assert_eq!(fs.processes_blocked().unwrap(), 3);
    }

    #[test]
    fn test_live_cpu_times() {
        let cpu = get_cpu_times().unwrap();
        assert!(cpu.total() > 0);
    }
}
