// 该文件是 Annolens 项目的一部分。
// src/input/loader.rs - 图像加载：降采样与方向校正
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

use image::{DynamicImage, ImageReader, RgbaImage, imageops};
use tracing::{debug, info};

use crate::{
  frame::RgbaFrame,
  input::{ImageSource, InputError, OrientationHint},
};

/// 检测模型默认期望的最小边长
pub const DEFAULT_REQUIRED_MIN_EDGE: u32 = 640;

/// 计算 2 的幂次降采样倍数
///
/// 只要再减半一次仍能让宽高都不小于 `required_min_edge`，就继续减半。
/// 源图任一边已小于下限时返回 1，不做放大。
pub fn sample_scale(width: u32, height: u32, required_min_edge: u32) -> u32 {
  let required_min_edge = required_min_edge.max(1);
  let (mut width, mut height) = (width, height);
  let mut scale = 1;
  while width / 2 >= required_min_edge && height / 2 >= required_min_edge {
    width /= 2;
    height /= 2;
    scale *= 2;
  }
  scale
}

/// 将任意尺寸、任意方向的图像加载为正向、尺寸受控的 RGBA 缓冲
#[derive(Debug, Clone, Copy)]
pub struct ImageLoader {
  required_min_edge: u32,
}

impl Default for ImageLoader {
  fn default() -> Self {
    Self {
      required_min_edge: DEFAULT_REQUIRED_MIN_EDGE,
    }
  }
}

impl ImageLoader {
  pub fn new(required_min_edge: u32) -> Result<Self, InputError> {
    if required_min_edge == 0 {
      return Err(InputError::InvalidMinEdge);
    }
    Ok(Self { required_min_edge })
  }

  pub fn required_min_edge(&self) -> u32 {
    self.required_min_edge
  }

  /// 只读取头部，获取图像固有尺寸
  pub fn read_dimensions<S: ImageSource>(&self, source: &S) -> Result<(u32, u32), InputError> {
    let dimensions = ImageReader::new(source.open()?)
      .with_guessed_format()?
      .into_dimensions()?;
    Ok(dimensions)
  }

  pub fn load<S: ImageSource>(&self, source: &S) -> Result<RgbaFrame, InputError> {
    let (width, height) = self.read_dimensions(source)?;
    let scale = sample_scale(width, height, self.required_min_edge);
    info!(
      "图像源 {:?}: {}x{}, 降采样倍数 {}",
      source, width, height, scale
    );

    let mut decoder = ImageReader::new(source.open()?)
      .with_guessed_format()?
      .into_decoder()?;
    let orientation = OrientationHint::read(&mut decoder);
    debug!("图像方向: 旋转 {} 度", orientation.degrees());

    let image = DynamicImage::from_decoder(decoder)?.into_rgba8();
    let image = subsample(image, scale);
    let image = orientation.apply(image);

    info!("加载完成: {}x{}", image.width(), image.height());
    Ok(RgbaFrame::from(image))
  }
}

// 按区域平均缩小到 1/scale；原始解码缓冲在此处释放
fn subsample(image: RgbaImage, scale: u32) -> RgbaImage {
  if scale <= 1 {
    return image;
  }
  let width = (image.width() / scale).max(1);
  let height = (image.height() / scale).max(1);
  imageops::thumbnail(&image, width, height)
}
