#![allow(dead_code)]

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use image::{Rgb, RgbImage, codecs::jpeg::JpegEncoder};
use zip::{ZipWriter, write::SimpleFileOptions};

pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "carddiv_it_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn jpeg(width: u32, height: u32, shade: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([shade, (x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8])
    });
    let mut buf = Vec::new();
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 90))
        .unwrap();
    buf
}

/// Deflate-compressed deck of `count` cards, plus a stray text entry.
pub fn write_deck(dir: &Path, file_name: &str, count: usize, width: u32, height: u32) -> PathBuf {
    let path = dir.join(file_name);
    let mut zw = ZipWriter::new(File::create(&path).unwrap());
    let opts = SimpleFileOptions::default();
    zw.start_file("README.txt", opts).unwrap();
    zw.write_all(b"deck fixture").unwrap();
    for i in 0..count {
        zw.start_file(format!("cards/{i:02}.jpg"), opts).unwrap();
        zw.write_all(&jpeg(width, height, (i * 7) as u8)).unwrap();
    }
    zw.finish().unwrap();
    path
}
