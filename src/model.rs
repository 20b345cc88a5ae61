// 该文件是 Annolens 项目的一部分。
// src/model.rs - 检测器边界与检测结果
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

use serde::{Deserialize, Serialize};

use crate::frame::RgbaFrame;

mod replay;
pub use self::replay::{ReplayDetector, ReplayError};

/// 执行后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
  #[default]
  Cpu,
  Gpu,
}

/// 检测器：外部协作者，同步执行
///
/// 返回 `None` 表示没有检测到任何目标。
pub trait Detector {
  type Error;

  fn detect(&self, frame: &RgbaFrame, backend: Backend)
  -> Result<Option<Vec<Detection>>, Self::Error>;
}

/// 单个检测结果，坐标与检测器输入的位图处于同一坐标系
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
  pub label: String,
  pub confidence: f32,
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
}

impl Detection {
  pub fn new(label: impl Into<String>, confidence: f32, bbox: [f32; 4]) -> Self {
    let [x, y, width, height] = bbox;
    Self {
      label: label.into(),
      confidence,
      x,
      y,
      width,
      height,
    }
  }

  /// 标签文本，例如 `benign = 87.3%`
  pub fn caption(&self) -> String {
    format!("{} = {:.1}%", self.label, self.confidence * 100.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
  Primary,
  Secondary,
}

/// 标签到颜色分组的映射策略
pub trait Categorize {
  fn category_of(&self, label: &str) -> Category;
}

impl<F: Fn(&str) -> Category> Categorize for F {
  fn category_of(&self, label: &str) -> Category {
    self(label)
  }
}

const BIRADS_PRIMARY_LABELS: [&str; 3] = ["BIRADS-1", "BIRADS-2", "BIRADS-3"];

/// 预置的分组方案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CategoryScheme {
  /// `benign` 为主类，其余为次类
  #[default]
  Benign,
  /// BIRADS 1-3 为主类，其余为次类
  Birads,
}

impl Categorize for CategoryScheme {
  fn category_of(&self, label: &str) -> Category {
    let primary = match self {
      CategoryScheme::Benign => label == "benign",
      CategoryScheme::Birads => BIRADS_PRIMARY_LABELS.contains(&label),
    };
    if primary {
      Category::Primary
    } else {
      Category::Secondary
    }
  }
}
