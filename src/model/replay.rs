// 该文件是 Annolens 项目的一部分。
// src/model/replay.rs - 回放检测器：从 JSON 文件读取检测结果
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::RgbaFrame,
  model::{Backend, Detection, Detector},
};

#[derive(Error, Debug)]
pub enum ReplayError {
  #[error("检测结果文件读取错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("检测结果格式错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("模型路径必须使用 {0} 方案")]
  SchemeMismatch(&'static str),
}

/// 回放预先记录的检测结果
///
/// 文件内容为检测结果数组，`null` 表示没有检测到目标。
/// 每次调用都重新读取文件，结果与输入帧和后端无关。
#[derive(Debug, Clone)]
pub struct ReplayDetector {
  path: PathBuf,
}

impl ReplayDetector {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }
}

impl FromUrlWithScheme for ReplayDetector {
  const SCHEME: &'static str = "replay";
}

impl FromUrl for ReplayDetector {
  type Error = ReplayError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ReplayError::SchemeMismatch(Self::SCHEME));
    }
    Ok(ReplayDetector::new(url.path()))
  }
}

impl Detector for ReplayDetector {
  type Error = ReplayError;

  fn detect(
    &self,
    frame: &RgbaFrame,
    backend: Backend,
  ) -> Result<Option<Vec<Detection>>, Self::Error> {
    debug!(
      "回放检测: {}x{}, 后端 {:?}",
      frame.width(),
      frame.height(),
      backend
    );
    let data = std::fs::read(&self.path)?;
    let detections: Option<Vec<Detection>> = serde_json::from_slice(&data)?;
    info!(
      "回放 {} 个检测结果",
      detections.as_ref().map(Vec::len).unwrap_or(0)
    );
    Ok(detections)
  }
}
