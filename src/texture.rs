// texture.rs — decode a panorama file and resample it into a 2:1 texture

use crate::error::TextureError;
use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use image::{GenericImageView, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

/// Texture extent for a width limit: even width, height half of it.
pub fn target_size(limit: u32) -> (u32, u32) {
    let width = (limit & !1).max(2);
    (width, width / 2)
}

pub fn placeholder(color: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(1, 1, Rgba([color[0], color[1], color[2], 255]))
}

pub fn decode_file(path: &Path) -> Result<RgbaImage, TextureError> {
    let file = File::open(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    reader.no_limits();
    let img = reader.decode()?;

    let (w, h) = img.dimensions();
    log::info!("decoded {} ({}x{})", path.display(), w, h);
    Ok(img.to_rgba8())
}

/// Stretch any image onto exactly `target_size(limit)`; the sphere maps the
/// full texture to 360x180 degrees whatever the source aspect.
pub fn normalize_equirect(img: RgbaImage, limit: u32) -> RgbaImage {
    let (w, h) = target_size(limit);
    if img.dimensions() == (w, h) {
        return img;
    }
    log::info!(
        "resampling panorama {}x{} -> {}x{}",
        img.width(),
        img.height(),
        w,
        h
    );
    image::imageops::resize(&img, w, h, FilterType::Lanczos3)
}

#[derive(Debug)]
pub struct LoadedPanorama {
    pub path: PathBuf,
    pub image: RgbaImage,
}

/// Decode and resample on a worker thread; the result arrives on `tx`.
pub fn spawn_loader(
    path: PathBuf,
    limit: u32,
    tx: Sender<Result<LoadedPanorama, TextureError>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        log::info!("loading {} in background", path.display());
        let result = decode_file(&path).map(|img| LoadedPanorama {
            image: normalize_equirect(img, limit),
            path,
        });
        if tx.send(result).is_err() {
            log::warn!("frame loop gone before panorama finished loading");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    #[test]
    fn target_is_two_to_one_and_even() {
        assert_eq!(target_size(4096), (4096, 2048));
        assert_eq!(target_size(4097), (4096, 2048));
        assert_eq!(target_size(2), (2, 1));
    }

    #[test]
    fn any_aspect_is_stretched_to_target() {
        let img = RgbaImage::from_pixel(10, 3, Rgba([1, 2, 3, 255]));
        let out = normalize_equirect(img, 8);
        assert_eq!(out.dimensions(), (8, 4));

        let exact = RgbaImage::new(8, 4);
        assert_eq!(normalize_equirect(exact, 8).dimensions(), (8, 4));
    }

    #[test]
    fn placeholder_is_opaque_single_pixel() {
        let p = placeholder([63, 63, 63]);
        assert_eq!(p.dimensions(), (1, 1));
        assert_eq!(p.get_pixel(0, 0), &Rgba([63, 63, 63, 255]));
    }

    #[test]
    fn decodes_by_content_not_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("pano.png");
        RgbaImage::from_pixel(6, 3, Rgba([200, 10, 10, 255]))
            .save(&png)
            .unwrap();
        let renamed = dir.path().join("pano.bin");
        std::fs::rename(&png, &renamed).unwrap();

        let img = decode_file(&renamed).unwrap();
        assert_eq!(img.dimensions(), (6, 3));
        assert_eq!(img.get_pixel(0, 0), &Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = decode_file(Path::new("/nonexistent/snap.jpg")).unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }));
    }

    #[test]
    fn loader_delivers_over_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.png");
        RgbaImage::new(20, 7).save(&path).unwrap();

        let (tx, rx) = channel();
        spawn_loader(path.clone(), 16, tx).join().unwrap();
        let loaded = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.image.dimensions(), (16, 8));

        let (tx, rx) = channel();
        spawn_loader(dir.path().join("missing.jpg"), 16, tx).join().unwrap();
        assert!(rx.recv().unwrap().is_err());
    }
}
