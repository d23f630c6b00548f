use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sys::types::{ProcError, Result};

/// 默认的 proc 文件系统挂载点
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// 枚举期间进程消失时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VanishedPolicy {
    /// 跳过已退出的进程，继续枚举
    #[default]
    Skip,
    /// 返回第一个读取错误
    Fail,
}

/// proc 读取配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcfsConfig {
    /// proc 根目录
    pub root: PathBuf,
    /// 进程在列出后、读取前退出时的策略
    pub vanished: VanishedPolicy,
}

impl Default for ProcfsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_PROC_ROOT),
            vanished: VanishedPolicy::Skip,
        }
    }
}

/// proc 文件系统的只读句柄
///
/// 只保存根路径，每次调用都重新读取文件，没有缓存。
#[derive(Debug, Clone, Default)]
pub struct ProcFs {
    config: ProcfsConfig,
}

impl ProcFs {
    /// 创建新的句柄，未提供配置时使用 `/proc`
    pub fn new(config: Option<ProcfsConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
        }
    }

    /// 以指定根目录创建句柄，其余配置使用默认值
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::new(Some(ProcfsConfig {
            root: root.into(),
            ..ProcfsConfig::default()
        }))
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn config(&self) -> &ProcfsConfig {
        &self.config
    }

    pub fn vanished_policy(&self) -> VanishedPolicy {
        self.config.vanished
    }

    pub(crate) fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.config.root.join(relative)
    }

    /// 读取根目录下的文件原始字节
    pub(crate) fn read_bytes(&self, relative: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = self.path(relative);
        log::trace!("reading {}", path.display());
        fs::read(&path).map_err(|e| ProcError::io(path, e))
    }

    /// 读取根目录下的文本文件
    pub(crate) fn read_string(&self, relative: impl AsRef<Path>) -> Result<String> {
        let path = self.path(relative);
        log::trace!("reading {}", path.display());
        fs::read_to_string(&path).map_err(|e| ProcError::io(path, e))
    }

    /// 列出根目录的所有条目名，顺序由宿主决定
    pub(crate) fn entry_names(&self) -> Result<Vec<OsString>> {
        let root = self.root();
        let mut names = Vec::new();
        for entry in fs::read_dir(root).map_err(|e| ProcError::io(root, e))? {
            let entry = entry.map_err(|e| ProcError::io(root, e))?;
            names.push(entry.file_name());
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let fs = ProcFs::new(None);
        assert_eq!(fs.root(), Path::new("/proc"));
        assert_eq!(fs.vanished_policy(), VanishedPolicy::Skip);
    }

    #[test]
    fn test_config_from_json() {
        let config: ProcfsConfig =
            serde_json::from_str(r#"{"root": "/host/proc", "vanished": "fail"}"#).unwrap();
        assert_eq!(config.root, PathBuf::from("/host/proc"));
        assert_eq!(config.vanished, VanishedPolicy::Fail);

        // 缺省字段取默认值
        let config: ProcfsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ProcfsConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let fs = ProcFs::with_root(dir.path());

        match fs.read_string("loadavg") {
            Err(ProcError::Io { path, source }) => {
                assert_eq!(path, dir.path().join("loadavg"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_entry_names() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("1")).unwrap();
        std::fs::write(dir.path().join("uptime"), "1.0 2.0\n").unwrap();

        let fs = ProcFs::with_root(dir.path());
        let mut names = fs.entry_names().unwrap();
        names.sort();
        assert_eq!(names, vec![OsString::from("1"), OsString::from("uptime")]);
    }
}
