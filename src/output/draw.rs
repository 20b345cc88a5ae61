// 该文件是 Annolens 项目的一部分。
// src/output/draw.rs - 目标检测结果可视化
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

use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::{debug, info};

use crate::{
  frame::RgbaFrame,
  model::{Categorize, Category, CategoryScheme, Detection},
  output::OutputError,
};

// 文本渲染常量
pub const LABEL_FONT_SIZE: f32 = 10.0;
const BOX_STROKE_WIDTH: u32 = 4;
const PIXEL_LIMIT: f32 = (1 << 24) as f32;

const PRIMARY_COLOR: [u8; 4] = [0, 255, 0, 255]; // 绿色
const SECONDARY_COLOR: [u8; 4] = [255, 0, 0, 255]; // 红色
const LABEL_BACKGROUND_COLOR: [u8; 4] = [255, 255, 255, 255];
const LABEL_TEXT_COLOR: [u8; 4] = [0, 0, 0, 255];

static EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/font.ttf"); // default font

fn embedded_font() -> FontArc {
  FontArc::try_from_slice(EMBEDDED_FONT).expect("无法加载嵌入的字体文件")
}

/// 计算标签左上角位置
///
/// 默认放在框左上角正上方；超出图像上边时贴住上边，超出右边时右对齐到图像右边。
/// 左边不做对称处理，窄图上的长标签可能得到负的横坐标。
pub fn label_anchor(
  bbox_x: f32,
  bbox_y: f32,
  text_width: f32,
  text_height: f32,
  image_width: f32,
) -> (f32, f32) {
  let mut x = bbox_x;
  let mut y = bbox_y - text_height;
  if y < 0.0 {
    y = 0.0;
  }
  if x + text_width > image_width {
    x = image_width - text_width;
  }
  (x, y)
}

/// 叠加渲染器：边框颜色由 `Categorize` 策略决定
pub struct Draw<C> {
  categorize: C,
  font: FontArc,
  font_size: f32,
  stroke_width: u32,
  primary_color: [u8; 4],
  secondary_color: [u8; 4],
}

impl Default for Draw<CategoryScheme> {
  fn default() -> Self {
    Draw::new(CategoryScheme::default())
  }
}

impl<C: Categorize> Draw<C> {
  pub fn new(categorize: C) -> Self {
    Self {
      categorize,
      font: embedded_font(),
      font_size: LABEL_FONT_SIZE,
      stroke_width: BOX_STROKE_WIDTH,
      primary_color: PRIMARY_COLOR,
      secondary_color: SECONDARY_COLOR,
    }
  }

  pub fn font_size(mut self, font_size: f32) -> Self {
    self.font_size = font_size.max(1.0);
    self
  }

  pub fn stroke_width(mut self, stroke_width: u32) -> Self {
    self.stroke_width = stroke_width.max(1);
    self
  }

  pub fn colors(mut self, primary: [u8; 4], secondary: [u8; 4]) -> Self {
    self.primary_color = primary;
    self.secondary_color = secondary;
    self
  }

  /// 替换内置字体
  pub fn with_font(mut self, font: FontArc) -> Self {
    self.font = font;
    self
  }

  pub fn with_font_file(self, path: impl AsRef<Path>) -> Result<Self, OutputError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(OutputError::IoError)?;
    let font = FontArc::try_from_vec(data).map_err(OutputError::InvalidFont)?;
    info!("加载字体: {}", path.display());
    Ok(self.with_font(font))
  }

  pub fn categorize(&self) -> &C {
    &self.categorize
  }

  pub fn color_of(&self, label: &str) -> [u8; 4] {
    match self.categorize.category_of(label) {
      Category::Primary => self.primary_color,
      Category::Secondary => self.secondary_color,
    }
  }

  /// 测量文本宽高：宽为排版后的步进宽度，高为 ascent - descent
  pub fn measure(&self, text: &str) -> (f32, f32) {
    let scale = PxScale::from(self.font_size);
    let (width, _) = text_size(scale, &self.font, text);
    let scaled = self.font.as_scaled(scale);
    (width as f32, scaled.ascent() - scaled.descent())
  }

  /// 在 `base` 的副本上绘制检测结果，`base` 本身不变
  ///
  /// 按输入顺序绘制，重叠处后绘制的覆盖先绘制的。
  pub fn render(&self, base: &RgbaFrame, detections: &[Detection]) -> RgbaFrame {
    let mut frame = base.clone();
    if detections.is_empty() {
      return frame;
    }

    let image = frame.as_image_mut();
    for detection in detections {
      self.draw_bbox_with_label(image, detection);
    }
    frame
  }

  fn draw_bbox_with_label(&self, image: &mut RgbaImage, detection: &Detection) {
    let Detection {
      label,
      x,
      y,
      width,
      height,
      ..
    } = detection;
    if [*x, *y, *width, *height].iter().any(|v| v.is_nan()) {
      debug!("跳过非法检测框: {:?}", detection);
      return;
    }

    let color = self.color_of(label);
    self.draw_bbox(image, [*x, *y, *x + *width, *y + *height], color);

    let caption = detection.caption();
    let (text_width, text_height) = self.measure(&caption);
    let (label_x, label_y) = label_anchor(*x, *y, text_width, text_height, image.width() as f32);
    let (label_x, label_y) = (to_pixel(label_x), to_pixel(label_y));

    let rect = Rect::at(label_x, label_y).of_size(
      text_width.ceil().max(1.0) as u32,
      text_height.ceil().max(1.0) as u32,
    );
    draw_filled_rect_mut(image, rect, Rgba(LABEL_BACKGROUND_COLOR));

    draw_text_mut(
      image,
      Rgba(LABEL_TEXT_COLOR),
      label_x,
      label_y,
      PxScale::from(self.font_size),
      &self.font,
      &caption,
    );
  }

  // 空心矩形，线宽以边为中心；负宽高按两端点排序处理
  fn draw_bbox(&self, image: &mut RgbaImage, corners: [f32; 4], color: [u8; 4]) {
    let stroke = self.stroke_width as i32;
    let half = stroke / 2;
    let margin = stroke as f32 + 1.0;
    let (width, height) = (image.width() as f32, image.height() as f32);
    // 画面外的边裁到画面外附近，避免坐标溢出
    let clip_x = |v: f32| v.clamp(-margin, width + margin).round() as i32;
    let clip_y = |v: f32| v.clamp(-margin, height + margin).round() as i32;

    let [x0, y0, x1, y1] = corners;
    let (left, right) = (clip_x(x0.min(x1)), clip_x(x0.max(x1)));
    let (top, bottom) = (clip_y(y0.min(y1)), clip_y(y0.max(y1)));

    let outer_width = (right - left + stroke) as u32;
    let outer_height = (bottom - top + stroke) as u32;
    let color = Rgba(color);

    let edges = [
      Rect::at(left - half, top - half).of_size(outer_width, stroke as u32),
      Rect::at(left - half, bottom - half).of_size(outer_width, stroke as u32),
      Rect::at(left - half, top - half).of_size(stroke as u32, outer_height),
      Rect::at(right - half, top - half).of_size(stroke as u32, outer_height),
    ];
    for edge in edges {
      draw_filled_rect_mut(image, edge, color);
    }
  }
}

fn to_pixel(v: f32) -> i32 {
  v.floor().clamp(-PIXEL_LIMIT, PIXEL_LIMIT) as i32
}
