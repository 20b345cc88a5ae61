use std::io::Cursor;

use annolens::input::{
  ImageFileSource, ImageLoader, ImageSource, InputError, MemorySource, sample_scale,
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

fn encode(image: RgbaImage, format: ImageFormat) -> Vec<u8> {
  let image = match format {
    ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image).to_rgb8()),
    _ => DynamicImage::ImageRgba8(image),
  };
  let mut bytes = Cursor::new(Vec::new());
  image.write_to(&mut bytes, format).expect("encode image");
  bytes.into_inner()
}

fn solid(width: u32, height: u32) -> RgbaImage {
  RgbaImage::from_pixel(width, height, Rgba([120, 80, 40, 255]))
}

// 左半红、右半蓝
fn split(width: u32, height: u32) -> RgbaImage {
  RgbaImage::from_fn(width, height, |x, _| {
    if x < width / 2 {
      Rgba([255, 0, 0, 255])
    } else {
      Rgba([0, 0, 255, 255])
    }
  })
}

// 在 SOI 之后插入只含 Orientation 标签的 APP1 段
fn with_exif_orientation(jpeg: Vec<u8>, orientation: u16) -> Vec<u8> {
  let mut payload = Vec::new();
  payload.extend_from_slice(b"Exif\0\0");
  payload.extend_from_slice(b"II*\0");
  payload.extend_from_slice(&8u32.to_le_bytes());
  payload.extend_from_slice(&1u16.to_le_bytes());
  payload.extend_from_slice(&0x0112u16.to_le_bytes());
  payload.extend_from_slice(&3u16.to_le_bytes());
  payload.extend_from_slice(&1u32.to_le_bytes());
  payload.extend_from_slice(&(orientation as u32).to_le_bytes());
  payload.extend_from_slice(&0u32.to_le_bytes());
  with_app1(jpeg, &payload)
}

// 在 SOI 之后插入任意内容的 APP1 段
fn with_app1(jpeg: Vec<u8>, payload: &[u8]) -> Vec<u8> {
  let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
  out.extend_from_slice(&jpeg[..2]);
  out.extend_from_slice(&[0xFF, 0xE1]);
  out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
  out.extend_from_slice(payload);
  out.extend_from_slice(&jpeg[2..]);
  out
}

fn is_reddish(pixel: [u8; 4]) -> bool {
  pixel[0] > 180 && pixel[2] < 80
}

fn is_bluish(pixel: [u8; 4]) -> bool {
  pixel[2] > 180 && pixel[0] < 80
}

#[test]
fn camera_sized_source_decodes_at_half_scale() {
  assert_eq!(sample_scale(2560, 1920, 640), 2);
}

#[test]
fn load_subsamples_to_the_smallest_size_above_the_floor() {
  let source = MemorySource::new(encode(solid(256, 192), ImageFormat::Png));
  let loader = ImageLoader::new(64).unwrap();

  assert_eq!(loader.read_dimensions(&source).unwrap(), (256, 192));
  let frame = loader.load(&source).unwrap();
  assert_eq!(frame.dimensions(), (128, 96));
  assert_eq!(frame.pixel(64, 48), [120, 80, 40, 255]);
}

#[test]
fn small_sources_keep_their_size() {
  let source = MemorySource::new(encode(solid(50, 300), ImageFormat::Png));
  let frame = ImageLoader::new(64).unwrap().load(&source).unwrap();
  assert_eq!(frame.dimensions(), (50, 300));
}

#[test]
fn garbage_is_source_unreadable() {
  let source = MemorySource::new(b"definitely not an image".to_vec());
  let result = ImageLoader::default().load(&source);
  assert!(matches!(result, Err(InputError::SourceUnreadable(_))));
}

#[test]
fn truncated_image_is_source_unreadable() {
  let mut bytes = encode(solid(64, 64), ImageFormat::Png);
  bytes.truncate(bytes.len() / 2);
  let result = ImageLoader::new(8).unwrap().load(&MemorySource::new(bytes));
  assert!(matches!(result, Err(InputError::SourceUnreadable(_))));
}

#[test]
fn missing_file_is_source_unreadable() {
  let source = ImageFileSource::new("/no/such/dir/photo.png");
  let result = ImageLoader::default().load(&source);
  assert!(matches!(result, Err(InputError::SourceUnreadable(_))));
}

#[test]
fn file_source_can_be_opened_repeatedly() {
  let dir = tempfile::tempdir().expect("create temp dir");
  let path = dir.path().join("photo.png");
  std::fs::write(&path, encode(solid(40, 20), ImageFormat::Png)).unwrap();

  let source = ImageFileSource::new(&path);
  assert!(source.open().is_ok());
  assert!(source.open().is_ok());
  let frame = ImageLoader::new(10).unwrap().load(&source).unwrap();
  assert_eq!(frame.dimensions(), (20, 10));
}

// 64x32 的红蓝分界落在 16 像素宏块边界上，JPEG 压缩后颜色不串
#[test]
fn jpeg_without_exif_is_upright() {
  let source = MemorySource::new(encode(split(64, 32), ImageFormat::Jpeg));
  let frame = ImageLoader::new(32).unwrap().load(&source).unwrap();
  assert_eq!(frame.dimensions(), (64, 32));
  assert!(is_reddish(frame.pixel(8, 16)));
  assert!(is_bluish(frame.pixel(56, 16)));
}

#[test]
fn exif_rotate_90_is_applied_once() {
  let jpeg = with_exif_orientation(encode(split(64, 32), ImageFormat::Jpeg), 6);
  let frame = ImageLoader::new(32).unwrap().load(&MemorySource::new(jpeg)).unwrap();

  assert_eq!(frame.dimensions(), (32, 64));
  // 顺时针旋转后左半部分转到上方
  assert!(is_reddish(frame.pixel(16, 8)));
  assert!(is_bluish(frame.pixel(16, 56)));
}

#[test]
fn exif_rotate_180_keeps_dimensions() {
  let jpeg = with_exif_orientation(encode(split(64, 32), ImageFormat::Jpeg), 3);
  let frame = ImageLoader::new(32).unwrap().load(&MemorySource::new(jpeg)).unwrap();

  assert_eq!(frame.dimensions(), (64, 32));
  assert!(is_bluish(frame.pixel(8, 16)));
  assert!(is_reddish(frame.pixel(56, 16)));
}

#[test]
fn unknown_exif_orientation_is_ignored() {
  let jpeg = with_exif_orientation(encode(split(64, 32), ImageFormat::Jpeg), 42);
  let frame = ImageLoader::new(32).unwrap().load(&MemorySource::new(jpeg)).unwrap();
  assert_eq!(frame.dimensions(), (64, 32));
  assert!(is_reddish(frame.pixel(8, 16)));
}

#[test]
fn garbage_exif_payload_loads_upright() {
  let mut payload = b"Exif\0\0".to_vec();
  payload.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x13, 0x37]);
  let jpeg = with_app1(encode(split(64, 32), ImageFormat::Jpeg), &payload);

  let frame = ImageLoader::new(32).unwrap().load(&MemorySource::new(jpeg)).unwrap();
  assert_eq!(frame.dimensions(), (64, 32));
  assert!(is_reddish(frame.pixel(8, 16)));
  assert!(is_bluish(frame.pixel(56, 16)));
}

#[test]
fn truncated_exif_directory_loads_upright() {
  // TIFF 头指向文件之外的 IFD
  let mut payload = b"Exif\0\0II*\0".to_vec();
  payload.extend_from_slice(&0xFFFF_FF00u32.to_le_bytes());
  let jpeg = with_app1(encode(split(64, 32), ImageFormat::Jpeg), &payload);

  let frame = ImageLoader::new(32).unwrap().load(&MemorySource::new(jpeg)).unwrap();
  assert_eq!(frame.dimensions(), (64, 32));
  assert!(is_reddish(frame.pixel(8, 16)));
}
