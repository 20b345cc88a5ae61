// 该文件是 Annolens 项目的一部分。
// src/frame.rs - RGBA 像素缓冲定义
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

use image::{Rgba, RgbaImage};

/// 8 位 RGBA 像素缓冲，行优先连续存储。
///
/// 每个阶段独占持有自己的缓冲；叠加绘制总是在副本上进行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
  image: RgbaImage,
}

impl From<RgbaImage> for RgbaFrame {
  fn from(image: RgbaImage) -> Self {
    Self { image }
  }
}

impl RgbaFrame {
  /// 以单一颜色填充创建缓冲
  pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
    Self {
      image: RgbaImage::from_pixel(width, height, Rgba(color)),
    }
  }

  pub fn width(&self) -> u32 {
    self.image.width()
  }

  pub fn height(&self) -> u32 {
    self.image.height()
  }

  pub fn dimensions(&self) -> (u32, u32) {
    self.image.dimensions()
  }

  pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
    self.image.get_pixel(x, y).0
  }

  pub fn as_raw(&self) -> &[u8] {
    self.image.as_raw()
  }

  pub(crate) fn as_image_mut(&mut self) -> &mut RgbaImage {
    &mut self.image
  }

  pub fn into_image(self) -> RgbaImage {
    self.image
  }
}
