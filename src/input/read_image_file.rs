// 该文件是 Annolens 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::error;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  input::{ImageSource, InputError},
};

/// 磁盘上的图像文件，每次 `open` 都重新打开
#[derive(Debug, Clone)]
pub struct ImageFileSource {
  path: PathBuf,
}

impl ImageFileSource {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl FromUrlWithScheme for ImageFileSource {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileSource {
  type Error = InputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(InputError::SchemeMismatch(url.scheme().to_string()));
    }

    Ok(ImageFileSource::new(url.path()))
  }
}

impl ImageSource for ImageFileSource {
  type Reader = BufReader<File>;

  fn open(&self) -> std::io::Result<Self::Reader> {
    File::open(&self.path).map(BufReader::new)
  }
}
