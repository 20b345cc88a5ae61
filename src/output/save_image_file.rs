// 该文件是 Annolens 项目的一部分。
// src/output/save_image_file.rs - 保存图像文件
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

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use image::{DynamicImage, ImageFormat};
use tracing::warn;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::RgbaFrame,
  model::{Categorize, CategoryScheme, Detection},
  output::{OutputError, Render, draw::Draw},
};

/// 将叠加结果写入图像文件
///
/// URL 形如 `image:///path/out.png?scheme=birads`。
pub struct SaveImageFileOutput<C> {
  path: PathBuf,
  draw: Draw<C>,
}

impl FromUrlWithScheme for SaveImageFileOutput<CategoryScheme> {
  const SCHEME: &'static str = "image";
}

impl FromUrl for SaveImageFileOutput<CategoryScheme> {
  type Error = OutputError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(OutputError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    let mut scheme = CategoryScheme::default();
    for (k, v) in uri.query_pairs() {
      if k == "scheme" {
        scheme = CategoryScheme::from_str(&v, true)
          .map_err(|_| OutputError::UnknownScheme(v.to_string()))?;
      }
    }

    Ok(SaveImageFileOutput::new(uri.path(), Draw::new(scheme)))
  }
}

impl<C: Categorize> SaveImageFileOutput<C> {
  pub fn new(path: impl AsRef<Path>, draw: Draw<C>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
      draw,
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn draw(&self) -> &Draw<C> {
    &self.draw
  }

  /// 替换渲染器，保留输出路径
  pub fn with_draw<D: Categorize>(self, draw: Draw<D>) -> SaveImageFileOutput<D> {
    SaveImageFileOutput {
      path: self.path,
      draw,
    }
  }

  fn save_image(&self, frame: RgbaFrame) -> Result<(), OutputError> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent).map_err(OutputError::IoError)?;
    }

    let image = DynamicImage::ImageRgba8(frame.into_image());
    // JPEG 不支持 alpha 通道
    let image = match ImageFormat::from_path(&self.path) {
      Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgb8(image.to_rgb8()),
      _ => image,
    };
    image.save(&self.path).map_err(OutputError::ImageError)?;

    warn!("保存图像到文件: {}", self.path.display());

    Ok(())
  }
}

impl<C: Categorize> Render for SaveImageFileOutput<C> {
  type Error = OutputError;

  fn render_result(&self, frame: &RgbaFrame, detections: &[Detection]) -> Result<(), Self::Error> {
    let image = self.draw.render(frame, detections);
    self.save_image(image)
  }
}
