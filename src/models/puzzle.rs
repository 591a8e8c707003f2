use chrono::NaiveDate;

/// 难度标签
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// 网站上出现的其他难度，原样保留
    Other(String),
}

impl Difficulty {
    /// 获取显示名称（也用于文件名）
    pub fn label(&self) -> &str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Other(label) => label,
        }
    }

    /// 从归档文本解析难度，不区分大小写
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            "" => Difficulty::Other("Unknown".to_string()),
            _ => Difficulty::Other(trimmed.to_string()),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 题目描述
///
/// 从归档下拉框解析得到，之后只读。身份由 `identifier`（下拉框 option 的 value）决定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleDescriptor {
    pub date: NaiveDate,
    pub difficulty: Difficulty,
    pub identifier: String,
    /// 下拉框中的原始文本，仅用于日志
    pub label: String,
}

impl PuzzleDescriptor {
    pub fn new(date: NaiveDate, difficulty: Difficulty, identifier: impl Into<String>) -> Self {
        let label = format!("{} - {}", date.format("%-d %B %Y"), difficulty);
        Self {
            date,
            difficulty,
            identifier: identifier.into(),
            label,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse_is_case_insensitive() {
        assert_eq!(Difficulty::parse("hard"), Difficulty::Hard);
        assert_eq!(Difficulty::parse(" EASY "), Difficulty::Easy);
        assert_eq!(Difficulty::parse("Medium"), Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_keeps_unknown_labels() {
        assert_eq!(
            Difficulty::parse("Diabolical"),
            Difficulty::Other("Diabolical".to_string())
        );
        assert_eq!(Difficulty::parse("").label(), "Unknown");
    }

    #[test]
    fn test_default_label() {
        let d = PuzzleDescriptor::new(
            NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
            Difficulty::Hard,
            "4412",
        );
        assert_eq!(d.label, "31 October 2025 - Hard");
    }
}
