use crate::sys::{ProcError, ProcFs, Result};

const OSRELEASE: &str = "sys/kernel/osrelease";

/// 去掉结尾换行后的内核版本字符串
pub fn parse_kernel_release(content: &str) -> Result<String> {
    let release = content.strip_suffix('\n').unwrap_or(content);
    if release.is_empty() {
        return Err(ProcError::MalformedRecord("osrelease: empty".to_string()));
    }
    Ok(release.to_string())
}

impl ProcFs {
    pub fn kernel_release(&self) -> Result<String> {
        parse_kernel_release(&self.read_string(OSRELEASE)?)
    }
}

/// 获取内核版本，例如 `6.8.0-45-generic`
pub fn get_kernel_release() -> Result<String> {
    ProcFs::default().kernel_release()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_kernel_release() {
        assert_eq!(
            parse_kernel_release("6.8.0-45-generic\n").unwrap(),
            "6.8.0-45-generic"
        );
        assert!(matches!(
            parse_kernel_release("\n"),
            Err(ProcError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_read_from_root() {
        let dir = TempDir::new().unwrap();
        let fs = ProcFs::with_root(dir.path());
        assert!(matches!(fs.kernel_release(), Err(ProcError::Io { .. })));

        std::fs::create_dir_all(dir.path().join("sys/kernel")).unwrap();
        std::fs::write(dir.path().join(OSRELEASE), "5.15.0-1019-aws\n").unwrap();
        assert_eq!(fs.kernel_release().unwrap(), "5.15.0-1019-aws");
    }

    #[test]
    fn test_live_kernel_release() {
        assert!(!get_kernel_release().unwrap().is_empty());
    }
}
