//! # 源文件收集器
//!
//! 在输入根目录下收集待转换的厂商原始数据。
//!
//! ## 功能
//! - 递归目录遍历 (可关闭)
//! - 后缀匹配，大小写不敏感，默认为已知厂商后缀集合
//! - 前缀/子串/glob 进一步筛选
//! - 名称带厂商后缀的目录 (如 Agilent/Bruker 的 .d) 整体视为一个源
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs`, `commands/scan.rs` 调用
//! - 使用 `walkdir` 遍历目录
//! - 使用 `glob` 进行模式匹配

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{MzbatchError, Result};

/// 已知的厂商原始数据后缀 (不含点，统一小写)
pub const VENDOR_SUFFIXES: &[&str] = &[
    "raw", "d", "lcd", "t2d", "baf", "fid", "tdf", "tsf", "wiff", "wiff2", "yep",
];

/// 源文件收集器
pub struct FileCollector {
    /// 输入根目录
    root: PathBuf,
    /// 后缀筛选 (None 时使用厂商后缀集合)
    suffix: Option<String>,
    /// 前缀筛选
    prefix: Option<String>,
    /// 子串筛选
    contains: Option<String>,
    /// glob 模式筛选
    pattern: Option<glob::Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的收集器，默认递归、匹配所有厂商后缀
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            suffix: None,
            prefix: None,
            contains: None,
            pattern: None,
            recursive: true,
        }
    }

    /// 设置后缀筛选，接受 "raw" 或 ".raw" 写法
    pub fn with_suffix(mut self, suffix: Option<&str>) -> Self {
        self.suffix = suffix.map(|s| s.trim_start_matches('.').to_lowercase());
        self
    }

    /// 设置前缀筛选
    pub fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix.map(|s| s.to_string());
        self
    }

    /// 设置子串筛选
    pub fn with_contains(mut self, contains: Option<&str>) -> Self {
        self.contains = contains.map(|s| s.to_string());
        self
    }

    /// 设置 glob 模式筛选
    pub fn with_pattern(mut self, pattern: Option<&str>) -> Result<Self> {
        self.pattern = match pattern {
            Some(p) => Some(glob::Pattern::new(p).map_err(|e| {
                MzbatchError::InvalidArgument(format!("Invalid pattern '{}': {}", p, e))
            })?),
            None => None,
        };
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的源路径，结果按路径排序
    pub fn collect(&self) -> Vec<PathBuf> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files = Vec::new();
        let mut walker = WalkDir::new(&self.root).max_depth(max_depth).into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            if entry.depth() == 0 {
                continue;
            }
            let name = match entry.file_name().to_str() {
                Some(n) => n,
                None => continue,
            };

            if entry.file_type().is_dir() {
                // 带厂商后缀的目录整体作为一个源，不再下降
                if self.matches(name) {
                    files.push(entry.path().to_path_buf());
                    walker.skip_current_dir();
                }
                continue;
            }

            if entry.file_type().is_file() && self.matches(name) {
                files.push(entry.path().to_path_buf());
            }
        }

        files.sort();
        files
    }

    /// 检查文件名是否通过所有筛选条件
    fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();

        let suffix_ok = match &self.suffix {
            Some(suffix) => lower.ends_with(&format!(".{}", suffix)),
            None => VENDOR_SUFFIXES
                .iter()
                .any(|s| lower.ends_with(&format!(".{}", s))),
        };
        if !suffix_ok {
            return false;
        }

        if let Some(prefix) = &self.prefix {
            if !name.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(contains) = &self.contains {
            if !name.contains(contains.as_str()) {
                return false;
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.matches(name) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_collects_vendor_suffixes_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a/x.raw"));
        touch(&dir.path().join("b/y.RAW"));
        touch(&dir.path().join("b/z.wiff"));
        touch(&dir.path().join("b/notes.txt"));

        let files = FileCollector::new(dir.path()).collect();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["x.raw", "y.RAW", "z.wiff"]);
    }

    #[test]
    fn test_explicit_suffix_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("x.raw"));
        touch(&dir.path().join("y.wiff"));

        let files = FileCollector::new(dir.path())
            .with_suffix(Some(".raw"))
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("x.raw"));
    }

    #[test]
    fn test_dotd_directory_is_single_source() {
        let dir = tempfile::tempdir().unwrap();
        // .d 目录内部的文件不得单独出现在结果中
        touch(&dir.path().join("run/sample.d/analysis.tdf"));
        touch(&dir.path().join("run/other.raw"));

        let files = FileCollector::new(dir.path()).collect();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["other.raw", "sample.d"]);
    }

    #[test]
    fn test_prefix_and_contains_filters() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("QC_blank.raw"));
        touch(&dir.path().join("QC_std.raw"));
        touch(&dir.path().join("sample.raw"));

        let files = FileCollector::new(dir.path())
            .with_prefix(Some("QC"))
            .with_contains(Some("blank"))
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("QC_blank.raw"));
    }

    #[test]
    fn test_glob_pattern_filter() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("run1.raw"));
        touch(&dir.path().join("run12.raw"));
        touch(&dir.path().join("blank.raw"));

        let files = FileCollector::new(dir.path())
            .with_pattern(Some("run?.raw"))
            .unwrap()
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("run1.raw"));
    }

    #[test]
    fn test_non_recursive_stays_at_top_level() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("top.raw"));
        touch(&dir.path().join("nested/deep.raw"));

        let files = FileCollector::new(dir.path()).recursive(false).collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("top.raw"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileCollector::new(dir.path()).with_pattern(Some("[bad"));
        assert!(result.is_err());
    }
}
