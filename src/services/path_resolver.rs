//! 输出路径解析 - 业务能力层
//!
//! 文件名格式: `{DD-MMM-YYYY} - {难度}.pdf`，例如 `31-Oct-2025 - Hard.pdf`

use std::path::{Path, PathBuf};

use crate::models::PuzzleDescriptor;

const NAME_MAX: usize = 255;

/// 计算题目的目标文件路径（纯函数）
pub fn resolve(descriptor: &PuzzleDescriptor, output_dir: &Path) -> PathBuf {
    output_dir.join(file_name(descriptor))
}

/// 题目对应的 PDF 文件名
pub fn file_name(descriptor: &PuzzleDescriptor) -> String {
    let stem = format!(
        "{} - {}",
        descriptor.date.format("%d-%b-%Y"),
        descriptor.difficulty.label()
    );
    sanitize_file_name(&format!("{stem}.pdf"))
}

/// 目标文件是否已存在，无法判断时视为不存在
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// 找不到打印按钮时保存截图的位置
pub fn snapshot_path(destination: &Path) -> PathBuf {
    destination.with_extension("png")
}

/// 写入过程中的临时文件
pub fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// 清理文件名，对任何输入都返回合法的文件名
///
/// - `< > : " / \ | ? *` 与控制字符替换为 `_`
/// - 去掉首尾空白和结尾的 `.`
/// - 结果为空时使用 `untitled`
/// - 长度限制为 255 字节
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim().trim_end_matches(['.', ' ']);
    let trimmed = if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        "untitled"
    } else {
        trimmed
    };

    if trimmed.len() <= NAME_MAX {
        return trimmed.to_string();
    }
    let mut take = NAME_MAX;
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use chrono::NaiveDate;

    fn descriptor(difficulty: Difficulty) -> PuzzleDescriptor {
        PuzzleDescriptor::new(NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(), difficulty, "4412")
    }

    #[test]
    fn test_file_name_format() {
        let path = resolve(&descriptor(Difficulty::Hard), Path::new("/tmp/puzzles"));
        assert_eq!(path, PathBuf::from("/tmp/puzzles/31-Oct-2025 - Hard.pdf"));
    }

    #[test]
    fn test_single_digit_day_is_padded() {
        let d = PuzzleDescriptor::new(
            NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
            Difficulty::Easy,
            "1",
        );
        assert_eq!(file_name(&d), "02-Nov-2025 - Easy.pdf");
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let d = descriptor(Difficulty::Medium);
        let dir = Path::new("out");
        assert_eq!(resolve(&d, dir), resolve(&d, dir));
    }

    #[test]
    fn test_illegal_characters_in_difficulty_are_replaced() {
        let d = descriptor(Difficulty::Other("Very/Hard: *extreme*?".to_string()));
        assert_eq!(file_name(&d), "31-Oct-2025 - Very_Hard_ _extreme__.pdf");
    }

    #[test]
    fn test_sanitize_is_total() {
        assert_eq!(sanitize_file_name(""), "untitled");
        assert_eq!(sanitize_file_name("..."), "untitled");
        assert_eq!(sanitize_file_name("  name. . "), "name");
        assert_eq!(sanitize_file_name("a\u{0}b\nc"), "a_b_c");

        let long = "数".repeat(200);
        let out = sanitize_file_name(&long);
        assert!(out.len() <= NAME_MAX);
        assert!(out.chars().all(|c| c == '数'));
    }

    #[test]
    fn test_sidecar_paths() {
        let dest = Path::new("/x/31-Oct-2025 - Hard.pdf");
        assert_eq!(snapshot_path(dest), PathBuf::from("/x/31-Oct-2025 - Hard.png"));
        assert_eq!(partial_path(dest), PathBuf::from("/x/31-Oct-2025 - Hard.pdf.part"));
    }

    #[tokio::test]
    async fn test_exists_checks_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = resolve(&descriptor(Difficulty::Hard), dir.path());
        assert!(!exists(&path).await);
        tokio::fs::write(&path, b"%PDF").await.unwrap();
        assert!(exists(&path).await);
    }
}
