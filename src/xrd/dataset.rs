//! # XRD 峰数据集
//!
//! 从 CSV 表（列 `Sample, H, K, L, 2Theta, d_hkl, I`）加载衍射峰，
//! 校验后按样品分组；数据文件缺失时回退到内置峰表。
//!
//! ## 依赖关系
//! - 被 `commands/xrd.rs` 调用
//! - 使用 `models/peak.rs` 的 PeakRecord, Sample, PeakSummary
//! - 使用 `xrd/fallback.rs` 的内置峰表
//! - 使用 `csv` + `serde` 解析表格

use crate::error::{MataiError, Result};
use crate::models::{PeakRecord, PeakSummary, Sample};
use crate::xrd::fallback;

use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// 数据来源
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// CSV 文件
    File(PathBuf),
    /// 内置峰表
    Fallback,
    /// 内存记录或任意 reader
    Memory(String),
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Fallback => write!(f, "built-in ZnO / ZnO:Mg table"),
            DataSource::Memory(origin) => write!(f, "{}", origin),
        }
    }
}

/// 加载选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// 数据文件缺失时是否使用内置峰表
    pub allow_fallback: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            allow_fallback: true,
        }
    }
}

/// CSV 原始行
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Sample")]
    sample: String,
    #[serde(rename = "H")]
    h: i32,
    #[serde(rename = "K")]
    k: i32,
    #[serde(rename = "L")]
    l: i32,
    #[serde(rename = "2Theta")]
    two_theta: f64,
    #[serde(rename = "d_hkl")]
    d_spacing: f64,
    #[serde(rename = "I")]
    intensity: f64,
}

/// 数据集总览
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOverview {
    /// 总峰数
    pub total_peaks: usize,
    /// 含有峰的样品
    pub samples: Vec<Sample>,
    /// 全局最小 2θ
    pub min_angle: Option<f64>,
    /// 全局最大 2θ
    pub max_angle: Option<f64>,
    /// 全局最大强度
    pub max_intensity: f64,
}

/// XRD 峰数据集（构造后只读）
#[derive(Debug, Clone)]
pub struct PeakDataset {
    groups: BTreeMap<Sample, Vec<PeakRecord>>,
    source: DataSource,
}

impl PeakDataset {
    /// 加载数据集，文件缺失时回退到内置峰表
    pub fn load(source: Option<&Path>) -> Result<Self> {
        Self::load_with(source, LoadOptions::default())
    }

    /// 按选项加载数据集
    pub fn load_with(source: Option<&Path>, options: LoadOptions) -> Result<Self> {
        let missing = match source {
            Some(path) if path.exists() => {
                // 目录或不可读文件不回退，直接报错
                let file = File::open(path)
                    .and_then(|f| {
                        if f.metadata()?.is_dir() {
                            Err(io::Error::new(io::ErrorKind::Other, "path is a directory"))
                        } else {
                            Ok(f)
                        }
                    })
                    .map_err(|e| MataiError::FileReadError {
                        path: path.display().to_string(),
                        source: e,
                    })?;
                let mut dataset = Self::from_reader(file, &path.display().to_string())?;
                dataset.source = DataSource::File(path.to_path_buf());
                info!(
                    "Loaded {} peaks from '{}'",
                    dataset.len(),
                    path.display()
                );
                return Ok(dataset);
            }
            Some(path) => path.display().to_string(),
            None => "no data file given".to_string(),
        };

        if !options.allow_fallback {
            return Err(MataiError::DataUnavailable(format!(
                "{} and the built-in table is disabled",
                missing
            )));
        }

        warn!("XRD data file unavailable ({}), using built-in table", missing);
        Ok(Self::fallback())
    }

    /// 内置峰表
    pub fn fallback() -> Self {
        let mut dataset = Self::group(fallback::records());
        dataset.source = DataSource::Fallback;
        dataset
    }

    /// 从任意 reader 解析 CSV
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut records = Vec::new();
        for (i, row) in rdr.deserialize::<RawRow>().enumerate() {
            // 表头占第 1 行
            let line = i + 2;
            let row = row.map_err(|e| parse_error(origin, line, e.to_string()))?;

            let sample = Sample::from_label(&row.sample).ok_or_else(|| {
                parse_error(origin, line, format!("unknown sample '{}'", row.sample))
            })?;

            let record = PeakRecord::new(
                sample,
                (row.h, row.k, row.l),
                row.two_theta,
                row.d_spacing,
                row.intensity,
            )
            .map_err(|e| parse_error(origin, line, e.to_string()))?;

            records.push(record);
        }

        debug!("Parsed {} rows from {}", records.len(), origin);

        let mut dataset = Self::group(records);
        dataset.source = DataSource::Memory(origin.to_string());
        dataset.check_ordering();
        Ok(dataset)
    }

    /// 从内存记录构造（逐条校验）
    pub fn from_records(records: Vec<PeakRecord>) -> Result<Self> {
        for r in &records {
            r.validate()?;
        }
        let dataset = Self::group(records);
        dataset.check_ordering();
        Ok(dataset)
    }

    /// 按样品分组，组内保持原始顺序
    fn group(records: Vec<PeakRecord>) -> Self {
        let mut groups: BTreeMap<Sample, Vec<PeakRecord>> = BTreeMap::new();
        for r in records {
            groups.entry(r.sample).or_default().push(r);
        }
        Self {
            groups,
            source: DataSource::Memory("records".to_string()),
        }
    }

    /// 组内 2θ 非升序时给出警告，返回这些样品
    fn check_ordering(&self) -> Vec<Sample> {
        let mut unordered = Vec::new();
        for (sample, records) in &self.groups {
            if records.windows(2).any(|w| w[1].two_theta < w[0].two_theta) {
                warn!("Peaks of sample {} are not in ascending 2θ order", sample);
                unordered.push(*sample);
            }
        }
        unordered
    }

    /// 数据来源
    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// 总峰数
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 含有峰的样品（分组顺序）
    pub fn samples(&self) -> Vec<Sample> {
        self.groups
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(s, _)| *s)
            .collect()
    }

    /// 按分组顺序遍历全部记录
    pub fn iter(&self) -> impl Iterator<Item = &PeakRecord> {
        self.groups.values().flatten()
    }

    /// 某样品的记录
    pub fn records(&self, sample: Sample) -> &[PeakRecord] {
        self.groups.get(&sample).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 按标签查询记录，未知标签返回空序列
    pub fn records_for(&self, label: &str) -> &[PeakRecord] {
        match Sample::from_label(label) {
            Some(sample) => self.records(sample),
            None => &[],
        }
    }

    /// 某样品的统计摘要
    pub fn summary(&self, sample: Sample) -> PeakSummary {
        PeakSummary::from_records(self.records(sample))
    }

    /// 按标签查询统计摘要，未知标签得到空摘要
    pub fn summary_for(&self, label: &str) -> PeakSummary {
        PeakSummary::from_records(self.records_for(label))
    }

    /// 数据集总览
    pub fn overview(&self) -> DatasetOverview {
        let all = PeakSummary::from_records(self.iter());
        DatasetOverview {
            total_peaks: all.peak_count,
            samples: self.samples(),
            min_angle: all.min_angle,
            max_angle: all.max_angle,
            max_intensity: all.max_intensity,
        }
    }
}

fn parse_error(origin: &str, line: usize, reason: String) -> MataiError {
    MataiError::ParseError {
        format: "XRD CSV".to_string(),
        path: origin.to_string(),
        reason: format!("line {}: {}", line, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Sample,H,K,L,2Theta,d_hkl,I\n";

    fn parse(body: &str) -> Result<PeakDataset> {
        let text = format!("{}{}", HEADER, body);
        PeakDataset::from_reader(text.as_bytes(), "test.csv")
    }

    #[test]
    fn test_fallback_counts() {
        let ds = PeakDataset::fallback();
        assert_eq!(ds.records_for("ZnO").len(), 13);
        assert_eq!(ds.records_for("ZnO:Mg").len(), 12);
        assert_eq!(ds.len(), 25);
        assert_eq!(ds.source(), &DataSource::Fallback);
    }

    #[test]
    fn test_fallback_summaries() {
        let ds = PeakDataset::fallback();

        let zno = ds.summary_for("ZnO");
        assert_eq!(zno.peak_count, 13);
        assert_eq!(zno.max_intensity, 937.5);
        assert_eq!(zno.min_angle, Some(31.77));
        assert_eq!(zno.max_angle, Some(89.77));

        let mg = ds.summary_for("ZnO:Mg");
        assert_eq!(mg.peak_count, 12);
        assert_eq!(mg.max_intensity, 1140.0);
    }

    #[test]
    fn test_unknown_sample_is_empty() {
        let ds = PeakDataset::fallback();
        assert!(ds.records_for("unknown_sample").is_empty());

        let summary = ds.summary_for("unknown_sample");
        assert_eq!(summary.peak_count, 0);
        assert_eq!(summary.max_intensity, 0.0);
        assert!(summary.min_angle.is_none());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let ds = PeakDataset::load(Some(Path::new("definitely/not/here.csv"))).unwrap();
        assert_eq!(ds.source(), &DataSource::Fallback);
        assert_eq!(ds.len(), 25);

        let ds = PeakDataset::load(None).unwrap();
        assert_eq!(ds.source(), &DataSource::Fallback);
    }

    #[test]
    fn test_directory_is_not_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = PeakDataset::load(Some(dir.path())).unwrap_err();
        assert!(matches!(err, MataiError::FileReadError { .. }));
    }

    #[test]
    fn test_unordered_group_detected() {
        let ds = parse(
            "ZnO,0,0,2,34.43,2.599,881.4\n\
             ZnO,1,0,0,31.77,2.809,267.1\n\
             ZnO:Mg,1,0,0,31.84,2.811,155.9\n",
        )
        .unwrap();
        assert_eq!(ds.check_ordering(), vec![Sample::ZnO]);
        // 保持输入顺序
        assert_eq!(ds.records(Sample::ZnO)[0].two_theta, 34.43);
        assert!(PeakDataset::fallback().check_ordering().is_empty());
    }

    #[test]
    fn test_missing_file_without_fallback() {
        let options = LoadOptions {
            allow_fallback: false,
        };
        let err = PeakDataset::load_with(Some(Path::new("missing.csv")), options).unwrap_err();
        assert!(matches!(err, MataiError::DataUnavailable(_)));
    }

    #[test]
    fn test_interleaved_rows_are_grouped() {
        let ds = parse(
            "ZnO,1,0,0,31.77,2.809,267.1\n\
             ZnO:Mg,1,0,0,31.84,2.811,155.9\n\
             ZnO,0,0,2,34.43,2.599,881.4\n",
        )
        .unwrap();

        let zno = ds.records(Sample::ZnO);
        assert_eq!(zno.len(), 2);
        assert_eq!(zno[0].two_theta, 31.77);
        assert_eq!(zno[1].two_theta, 34.43);
        assert_eq!(ds.records(Sample::ZnOMg).len(), 1);

        let order: Vec<Sample> = ds.iter().map(|r| r.sample).collect();
        assert_eq!(order, vec![Sample::ZnO, Sample::ZnO, Sample::ZnOMg]);
    }

    #[test]
    fn test_invalid_rows_rejected() {
        for body in [
            "ZnO,1,0,0,0.0,2.809,267.1\n",
            "ZnO,1,0,0,31.77,0,267.1\n",
            "ZnO,1,0,0,31.77,2.809,-1\n",
            "CdS,1,0,0,31.77,2.809,267.1\n",
            "ZnO,1,0,x,31.77,2.809,267.1\n",
        ] {
            let err = parse(body).unwrap_err();
            match err {
                MataiError::ParseError { reason, .. } => assert!(reason.starts_with("line 2")),
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let ds = parse("").unwrap();
        assert!(ds.is_empty());
        assert!(ds.samples().is_empty());
        assert_eq!(ds.overview().total_peaks, 0);
    }

    #[test]
    fn test_overview() {
        let ov = PeakDataset::fallback().overview();
        assert_eq!(ov.total_peaks, 25);
        assert_eq!(ov.samples, vec![Sample::ZnO, Sample::ZnOMg]);
        assert_eq!(ov.min_angle, Some(31.77));
        assert_eq!(ov.max_angle, Some(89.77));
        assert_eq!(ov.max_intensity, 1140.0);
    }
}
