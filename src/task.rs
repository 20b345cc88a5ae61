// 该文件是 Annolens 项目的一部分。
// src/task.rs - 任务：加载、检测与渲染
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

use tracing::{error, info};

use crate::{
  frame::RgbaFrame,
  input::{ImageLoader, ImageSource, InputError},
  model::{Backend, Categorize, Detector},
  output::{Render, draw::Draw},
};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<(), Self::Error>;
}

/// 持有当前图像的交互会话
///
/// 每次选图替换当前图像；加载失败时保留之前的图像。
#[derive(Debug, Default)]
pub struct Session {
  loader: ImageLoader,
  current: Option<RgbaFrame>,
}

impl Session {
  pub fn new(loader: ImageLoader) -> Self {
    Self {
      loader,
      current: None,
    }
  }

  pub fn current(&self) -> Option<&RgbaFrame> {
    self.current.as_ref()
  }

  pub fn pick<S: ImageSource>(&mut self, source: &S) -> Result<&RgbaFrame, InputError> {
    match self.loader.load(source) {
      Ok(frame) => {
        let frame = self.current.insert(frame);
        Ok(&*frame)
      }
      Err(e) => {
        error!("加载图像失败，保留当前图像: {}", e);
        Err(e)
      }
    }
  }

  /// 对当前图像运行检测并返回叠加后的副本
  ///
  /// 尚未选图时返回 `Ok(None)`。
  pub fn detect<D: Detector, C: Categorize>(
    &self,
    detector: &D,
    backend: Backend,
    draw: &Draw<C>,
  ) -> Result<Option<RgbaFrame>, D::Error> {
    let Some(frame) = self.current.as_ref() else {
      info!("尚未选择图像，忽略检测请求");
      return Ok(None);
    };

    let now = std::time::Instant::now();
    let detections = detector.detect(frame, backend)?.unwrap_or_default();
    info!(
      "检测完成: {} 个目标，耗时: {:.2?}",
      detections.len(),
      now.elapsed()
    );
    Ok(Some(draw.render(frame, &detections)))
  }
}

/// 单次任务：加载一张图像，检测一次，输出一次
#[derive(Debug, Default)]
pub struct OneShotTask {
  loader: ImageLoader,
  backend: Backend,
}

impl OneShotTask {
  pub fn new(loader: ImageLoader) -> Self {
    Self {
      loader,
      backend: Backend::default(),
    }
  }

  pub fn with_backend(mut self, backend: Backend) -> Self {
    self.backend = backend;
    self
  }
}

impl<
  S: ImageSource,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  M: Detector<Error = ME>,
  O: Render<Error = RE>,
> Task<S, M, O> for OneShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, input: S, model: M, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let frame = self.loader.load(&input)?;
    info!("输入帧获取成功，开始推理...");
    let now = std::time::Instant::now();
    let detections = model.detect(&frame, self.backend)?.unwrap_or_default();
    let elapsed = now.elapsed();
    info!("推理完成，{} 个目标，耗时: {:.2?}", detections.len(), elapsed);
    output.render_result(&frame, &detections)?;
    info!("渲染完成，耗时: {:.2?}", now.elapsed());

    Ok(())
  }
}
