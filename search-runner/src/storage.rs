//! 报告存储
//!
//! 每次运行保存为一个 JSON 文件

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::report::RunReport;

/// 报告存储管理器
pub struct ReportStore {
    reports_dir: PathBuf,
}

impl ReportStore {
    /// 创建存储管理器；`dir` 为空时使用系统数据目录
    pub fn new(dir: Option<PathBuf>) -> Result<Self> {
        let reports_dir = match dir {
            Some(dir) => dir,
            None => get_reports_directory()?,
        };

        // 确保目录存在
        if !reports_dir.exists() {
            fs::create_dir_all(&reports_dir)
                .with_context(|| format!("无法创建报告目录: {:?}", reports_dir))?;
        }

        Ok(Self { reports_dir })
    }

    /// 保存报告，返回报告 ID（文件名）
    pub fn save(&self, report: &RunReport) -> Result<String> {
        let filename = generate_filename(&report.created_at, &report.name);
        let filepath = self.reports_dir.join(&filename);

        let json_content = report.to_json().context("序列化报告失败")?;
        fs::write(&filepath, json_content)
            .with_context(|| format!("写入文件失败: {:?}", filepath))?;

        Ok(filename)
    }

    /// 加载报告
    pub fn load(&self, report_id: &str) -> Result<RunReport> {
        let filepath = self.reports_dir.join(report_id);

        if !filepath.exists() {
            anyhow::bail!("报告文件不存在: {}", report_id);
        }

        let content = fs::read_to_string(&filepath)
            .with_context(|| format!("读取文件失败: {:?}", filepath))?;

        RunReport::from_json(&content).context("解析报告文件失败")
    }

    /// 列出所有报告，最新的在前
    pub fn list(&self) -> Result<Vec<SavedReportInfo>> {
        let mut reports = Vec::new();

        let entries = fs::read_dir(&self.reports_dir)
            .with_context(|| format!("读取报告目录失败: {:?}", self.reports_dir))?;

        for entry in entries {
            let entry = entry.context("读取目录项失败")?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            match self.load(filename) {
                Ok(report) => reports.push(SavedReportInfo {
                    report_id: filename.to_string(),
                    name: report.name.clone(),
                    created_at: report.created_at,
                    job_count: report.jobs.len(),
                    failed_count: report.failed_count(),
                }),
                Err(e) => {
                    // 跳过损坏的文件
                    warn!("Skipping unreadable report {}: {:#}", filename, e);
                }
            }
        }

        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    /// 删除报告
    pub fn delete(&self, report_id: &str) -> Result<()> {
        let filepath = self.reports_dir.join(report_id);

        if filepath.exists() {
            fs::remove_file(&filepath)
                .with_context(|| format!("删除文件失败: {:?}", filepath))?;
        }

        Ok(())
    }

    /// 获取报告目录路径
    pub fn reports_directory(&self) -> &Path {
        &self.reports_dir
    }
}

/// 已保存报告的概要
#[derive(Debug, Clone)]
pub struct SavedReportInfo {
    /// 报告 ID（文件名）
    pub report_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub job_count: usize,
    pub failed_count: usize,
}

/// 获取跨平台报告目录
fn get_reports_directory() -> Result<PathBuf> {
    let app_data_dir = dirs::data_dir().context("无法获取应用数据目录")?;

    Ok(app_data_dir.join("graph-search").join("reports"))
}

/// 生成文件名
fn generate_filename(timestamp: &DateTime<Utc>, name: &str) -> String {
    let timestamp_str = timestamp.format("%Y%m%d_%H%M%S_%3f").to_string();
    format!("{}_{}.json", timestamp_str, sanitize_filename(name))
}

/// 清理文件名中的特殊字符
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
