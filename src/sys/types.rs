use std::fmt;
use std::io;
use std::path::PathBuf;

/// 进程ID的安全包装
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ProcessId(pub(crate) libc::pid_t);

impl ProcessId {
    /// 创建新的ProcessId，确保值有效
    pub fn new(pid: i32) -> Option<Self> {
        if pid > 0 {
            Some(ProcessId(pid))
        } else {
            None
        }
    }

    pub fn as_raw(&self) -> libc::pid_t {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 错误类型
#[derive(Debug, thiserror::Error)]
pub enum ProcError {
    #[error("unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("failed to parse field `{field}` from token {token:?}")]
    FieldParse { field: &'static str, token: String },
    #[error("no swap device configured")]
    NoSwapDevice,
}

impl ProcError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ProcError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn field(field: &'static str, token: impl Into<String>) -> Self {
        ProcError::FieldParse {
            field,
            token: token.into(),
        }
    }

    /// 读取目标已经不存在（例如进程在枚举后退出）
    pub fn is_vanished(&self) -> bool {
        match self {
            ProcError::Io { source, .. } => {
                source.kind() == io::ErrorKind::NotFound
                    || source.raw_os_error() == Some(libc::ESRCH)
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pid() {
        assert!(ProcessId::new(-1).is_none());
        assert!(ProcessId::new(0).is_none());
        assert_eq!(ProcessId::new(42).map(|p| p.as_raw()), Some(42));
    }

    #[test]
    fn test_vanished_detection() {
        let gone = ProcError::io("/proc/1/stat", io::Error::from(io::ErrorKind::NotFound));
        assert!(gone.is_vanished());

        let esrch = ProcError::io("/proc/1/stat", io::Error::from_raw_os_error(libc::ESRCH));
        assert!(esrch.is_vanished());

        let denied = ProcError::io(
            "/proc/1/stat",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(!denied.is_vanished());
        assert!(!ProcError::NoSwapDevice.is_vanished());
    }

    #[test]
    fn test_error_messages() {
        let err = ProcError::field("ppid", "x1");
        assert_eq!(err.to_string(), "failed to parse field `ppid` from token \"x1\"");

        let err = ProcError::io("/proc/loadavg", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.to_string().starts_with("unable to read /proc/loadavg"));
    }
}
