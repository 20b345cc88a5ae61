// 该文件是 Annolens 项目的一部分。
// src/output.rs - 输出定义
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

use thiserror::Error;

use crate::{frame::RgbaFrame, model::Detection};

/// 把检测结果交给显示端
pub trait Render {
  type Error;
  fn render_result(&self, frame: &RgbaFrame, detections: &[Detection]) -> Result<(), Self::Error>;
}

pub mod draw;

mod save_image_file;
pub use self::save_image_file::SaveImageFileOutput;

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("I/O 错误: {0}")]
  IoError(std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(image::ImageError),
  #[error("字体无效: {0}")]
  InvalidFont(ab_glyph::InvalidFont),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("未知的分组方案: {0}")]
  UnknownScheme(String),
}
