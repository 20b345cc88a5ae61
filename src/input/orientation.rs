// 该文件是 Annolens 项目的一部分。
// src/input/orientation.rs - EXIF 方向校正
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

use image::{ImageDecoder, RgbaImage, imageops, metadata::Orientation};
use tracing::debug;

/// 图像元数据中记录的旋转方向（顺时针）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientationHint {
  #[default]
  None,
  Rotate90,
  Rotate180,
  Rotate270,
}

impl OrientationHint {
  /// 由 EXIF Orientation 标签值映射；镜像类取值按无旋转处理
  pub fn from_exif(value: u16) -> Self {
    match value {
      3 => OrientationHint::Rotate180,
      6 => OrientationHint::Rotate90,
      8 => OrientationHint::Rotate270,
      _ => OrientationHint::None,
    }
  }

  /// 从解码器读取方向，读取失败时退化为 `None`
  pub fn read(decoder: &mut impl ImageDecoder) -> Self {
    match decoder.orientation() {
      Ok(orientation) => Self::from(orientation),
      Err(e) => {
        debug!("无法读取方向元数据，按无旋转处理: {}", e);
        OrientationHint::None
      }
    }
  }

  pub fn degrees(self) -> u32 {
    match self {
      OrientationHint::None => 0,
      OrientationHint::Rotate90 => 90,
      OrientationHint::Rotate180 => 180,
      OrientationHint::Rotate270 => 270,
    }
  }

  pub fn apply(self, image: RgbaImage) -> RgbaImage {
    match self {
      OrientationHint::None => image,
      OrientationHint::Rotate90 => imageops::rotate90(&image),
      OrientationHint::Rotate180 => imageops::rotate180(&image),
      OrientationHint::Rotate270 => imageops::rotate270(&image),
    }
  }
}

impl From<Orientation> for OrientationHint {
  fn from(orientation: Orientation) -> Self {
    Self::from_exif(u16::from(orientation.to_exif()))
  }
}
