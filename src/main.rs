//! 命令行摘要工具
//!
//! 用法：
//!   diary-summarize [--config FILE] [--explain] [FILE]
//!
//! 未指定 FILE 时从标准输入读取；--explain 把每句的评分明细和选中的句子输出到 stderr

use clap::Parser;
use local_diary_lib::summarizer::{RuleBasedSummarizer, SummaryConfig};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "diary-summarize")]
#[command(about = "日记正文的规则摘要")]
#[command(version)]
struct Args {
    /// 日记正文文件（省略时读取标准输入）
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// 摘要配置（JSON）
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 把每句的评分明细和选中的句子输出到 stderr
    #[arg(long)]
    explain: bool,
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => match SummaryConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("错误: {}", e);
                process::exit(1);
            }
        },
        None => SummaryConfig::default(),
    };

    let text = match read_input(args.input.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("读取输入失败: {}", e);
            process::exit(1);
        }
    };

    let summarizer = RuleBasedSummarizer::new(config);

    if args.explain {
        for breakdown in summarizer.explain(&text) {
            match serde_json::to_string(&breakdown) {
                Ok(line) => eprintln!("{}", line),
                Err(e) => log::warn!("评分明细序列化失败: {}", e),
            }
        }
        for sentence in summarizer.selection(&text) {
            eprintln!(
                "选中 #{}{}: {}",
                sentence.original_index,
                if sentence.truncated { " (截断)" } else { "" },
                sentence.text
            );
        }
    }

    println!("{}", summarizer.summarize(&text));
}
