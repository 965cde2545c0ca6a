use image::imageops::FilterType;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("Failed to open image {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Failed to save resized image {}: {source}", path.display())]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Normalizes the persisted upload to the model's input geometry,
/// overwriting the file in place.
pub fn resize_in_place(path: &Path, target: (u32, u32)) -> Result<(), ImagingError> {
    let img = image::open(path).map_err(|source| ImagingError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Original image size: {}x{}", img.width(), img.height());

    let resized = img.resize_exact(target.0, target.1, FilterType::CatmullRom);
    resized.save(path).map_err(|source| ImagingError::Save {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Image resized to: {}x{}", target.0, target.1);
    Ok(())
}
