// 该文件是 Annolens 项目的一部分。
// src/bin/simple_oneshot.rs - 单张图像检测与叠加输出
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

use anyhow::Result;
use clap::Parser;
use tracing::info;
use url::Url;

use annolens::{
  FromUrl,
  input::{ImageFileSource, ImageLoader},
  model::{Backend, CategoryScheme, ReplayDetector},
  output::{SaveImageFileOutput, draw::{Draw, LABEL_FONT_SIZE}},
  task::{OneShotTask, Task},
};

/// Annolens 单次任务参数
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 检测结果来源，例如 replay:///path/detections.json
  #[arg(long, value_name = "MODEL")]
  pub model: Url,
  /// 输入图像，例如 image:///path/photo.jpg
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 输出路径，例如 image:///path/out.png?scheme=birads
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,
  /// 解码后图像的最小边长
  #[arg(long, default_value_t = 640, value_name = "PIXELS")]
  pub min_edge: u32,
  /// 执行后端
  #[arg(long, value_enum, default_value_t = Backend::Cpu)]
  pub backend: Backend,
  /// 边框颜色分组方案，覆盖输出 URL 中的 scheme 参数
  #[arg(long, value_enum)]
  pub scheme: Option<CategoryScheme>,
  /// 标签字体（TrueType/OpenType），默认使用内置字体
  #[arg(long, value_name = "FILE")]
  pub font: Option<PathBuf>,
  /// 标签字号
  #[arg(long, default_value_t = LABEL_FONT_SIZE, value_name = "PX")]
  pub font_size: f32,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("检测结果来源: {}", args.model);
  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);

  let input = ImageFileSource::from_url(&args.input)?;
  let model = ReplayDetector::from_url(&args.model)?;
  let output = SaveImageFileOutput::<CategoryScheme>::from_url(&args.output)?;

  let scheme = args.scheme.unwrap_or(*output.draw().categorize());
  let mut draw = Draw::new(scheme).font_size(args.font_size);
  if let Some(font) = &args.font {
    draw = draw.with_font_file(font)?;
  }
  let output = output.with_draw(draw);

  OneShotTask::new(ImageLoader::new(args.min_edge)?)
    .with_backend(args.backend)
    .run_task(input, model, output)?;

  Ok(())
}
