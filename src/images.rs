// Local artwork discovery: a non-recursive scan of one directory for
// .png/.jpg files. Matches are sorted by name so the choice does not
// depend on directory iteration order.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// A local image file picked for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl ImageFile {
    /// MIME type derived from the file extension. The extensions are the
    /// only ones the scanner accepts, so this is total.
    pub fn mime_type(&self) -> &'static str {
        if self.file_name.ends_with(".jpg") {
            "image/jpeg"
        } else {
            "image/png"
        }
    }
}

fn is_image_name(name: &str) -> bool {
    name.ends_with(".png") || name.ends_with(".jpg")
}

/// Scans `dir` (non-recursive) and returns the image files found,
/// sorted by file name.
pub fn scan_images(dir: &Path) -> Result<Vec<ImageFile>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let file_type = entry.file_type().context("Failed to stat directory entry")?;
        if !file_type.is_file() {
            continue;
        }
        // Non-UTF-8 names can't be image matches for our extensions.
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        if is_image_name(&name) {
            images.push(ImageFile {
                path: entry.path(),
                file_name: name,
            });
        }
    }
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(images)
}

/// Picks the first image in `dir`, failing when there is none.
pub fn find_image(dir: &Path) -> Result<ImageFile> {
    let images = scan_images(dir)?;
    match images.into_iter().next() {
        Some(image) => Ok(image),
        None => bail!("No image files found in {}", dir.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"fake image bytes").unwrap();
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_image(dir.path()).is_err());
    }

    #[test]
    fn directory_without_matching_extensions_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "photo.jpeg"); // .jpeg is not accepted
        touch(dir.path(), "PHOTO.PNG"); // extension match is case-sensitive
        assert!(find_image(dir.path()).is_err());
    }

    #[test]
    fn first_match_by_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.jpg");
        touch(dir.path(), "a.png");
        let image = find_image(dir.path()).unwrap();
        assert_eq!(image.file_name, "a.png");
    }

    #[test]
    fn subdirectories_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("art.png")).unwrap();
        touch(dir.path(), "real.jpg");
        let image = find_image(dir.path()).unwrap();
        assert_eq!(image.file_name, "real.jpg");
    }

    #[test]
    fn mime_type_follows_extension() {
        let png = ImageFile {
            path: PathBuf::from("a.png"),
            file_name: "a.png".into(),
        };
        let jpg = ImageFile {
            path: PathBuf::from("b.jpg"),
            file_name: "b.jpg".into(),
        };
        assert_eq!(png.mime_type(), "image/png");
        assert_eq!(jpg.mime_type(), "image/jpeg");
    }
}
