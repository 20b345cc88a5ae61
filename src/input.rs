// 该文件是 Annolens 项目的一部分。
// src/input.rs - 图像输入与预处理
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

use std::io::{BufRead, Cursor, Seek};
use std::sync::Arc;

use thiserror::Error;

mod loader;
mod orientation;
mod read_image_file;

pub use self::loader::{ImageLoader, sample_scale};
pub use self::orientation::OrientationHint;
pub use self::read_image_file::ImageFileSource;

#[derive(Error, Debug)]
pub enum InputError {
  #[error("图像源不可读: {0}")]
  SourceUnreadable(image::ImageError),
  #[error("最小边长必须为正数")]
  InvalidMinEdge,
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

impl From<std::io::Error> for InputError {
  fn from(err: std::io::Error) -> Self {
    InputError::SourceUnreadable(image::ImageError::IoError(err))
  }
}

impl From<image::ImageError> for InputError {
  fn from(err: image::ImageError) -> Self {
    InputError::SourceUnreadable(err)
  }
}

/// 可重复打开的图像源
///
/// 一次加载过程会打开同一个源两次（先探测尺寸，再真正解码），
/// 调用方需保证在加载期间源始终有效。
pub trait ImageSource: std::fmt::Debug {
  type Reader: BufRead + Seek;

  fn open(&self) -> std::io::Result<Self::Reader>;
}

/// 内存中的图像字节
#[derive(Clone)]
pub struct MemorySource {
  bytes: Arc<[u8]>,
}

impl std::fmt::Debug for MemorySource {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MemorySource")
      .field("len", &self.bytes.len())
      .finish()
  }
}

impl MemorySource {
  pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
    Self {
      bytes: bytes.into(),
    }
  }
}

impl ImageSource for MemorySource {
  type Reader = Cursor<Arc<[u8]>>;

  fn open(&self) -> std::io::Result<Self::Reader> {
    Ok(Cursor::new(self.bytes.clone()))
  }
}
