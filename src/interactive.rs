//! 交互模式：命令行没有给出日期时逐项询问

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::{Duration, NaiveDate};

use crate::cli::parse_date;
use crate::orchestrator::RunRequest;

/// 交互提示中使用的默认值
#[derive(Debug, Clone)]
pub struct PromptDefaults {
    pub today: NaiveDate,
    pub output_dir: PathBuf,
}

impl PromptDefaults {
    pub fn start(&self) -> NaiveDate {
        self.today - Duration::days(7)
    }
}

/// 询问日期范围和输出目录，最后等待回车确认
///
/// 空输入使用默认值；格式错误或结束日期早于开始日期时重新询问。
/// 输入提前结束返回 `UnexpectedEof`。
pub fn prompt_request<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    defaults: &PromptDefaults,
) -> io::Result<RunRequest> {
    writeln!(output, "{}", "=".repeat(60))?;
    writeln!(output, "Samurai Sudoku 下载器")?;
    writeln!(output, "{}", "=".repeat(60))?;

    let start = prompt_date(input, output, "开始日期", defaults.start())?;
    let end = loop {
        let end = prompt_date(input, output, "结束日期", defaults.today)?;
        if end >= start {
            break end;
        }
        writeln!(output, "✗ 结束日期不能早于开始日期 ({start})")?;
    };

    let answer = prompt_line(
        input,
        output,
        &format!("输出目录 [{}]: ", defaults.output_dir.display()),
    )?;
    let output_dir = if answer.is_empty() {
        defaults.output_dir.clone()
    } else {
        PathBuf::from(answer)
    };

    writeln!(output)?;
    writeln!(output, "日期范围: {start} 至 {end}")?;
    writeln!(output, "输出目录: {}", output_dir.display())?;
    prompt_line(input, output, "按回车开始下载...")?;

    Ok(RunRequest {
        start,
        end,
        output_dir,
    })
}

fn prompt_date<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    name: &str,
    default: NaiveDate,
) -> io::Result<NaiveDate> {
    loop {
        let answer = prompt_line(input, output, &format!("{name} (YYYY-MM-DD) [{default}]: "))?;
        if answer.is_empty() {
            return Ok(default);
        }
        match parse_date(&answer) {
            Ok(date) => return Ok(date),
            Err(message) => writeln!(output, "✗ {message}")?,
        }
    }
}

fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "输入已结束"));
    }
    Ok(line.trim().to_string())
}
