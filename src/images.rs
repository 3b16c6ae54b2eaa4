use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use rand::Rng;

use crate::errors::{AppError, AppResult};

/// Source of the selection index. Production uses the thread RNG; tests
/// inject fixed values.
pub trait IndexPicker {
    /// Returns an index for a candidate set of the given length.
    fn pick(&mut self, len: usize) -> usize;
}

#[derive(Default)]
pub struct ThreadRngPicker;

impl IndexPicker for ThreadRngPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl SelectedImage {
    /// Status text for the post: the image's last-modified timestamp in
    /// local time. The format is pinned rather than locale-dependent.
    pub fn status_text(&self) -> String {
        let modified: DateTime<Local> = self.modified.into();
        modified.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Lists the `.jpg` files in `directory` and picks one with the supplied
/// index source.
///
/// A missing directory, an empty one, and one without any matching files
/// are all reported as `NoImageFound`. Candidates are sorted by path so a
/// given index always maps to the same file.
pub fn select_random_image(
    directory: &str,
    picker: &mut dyn IndexPicker,
) -> AppResult<SelectedImage> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(_) => return Err(AppError::no_image_found(directory)),
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("jpg")
        })
        .collect();

    if candidates.is_empty() {
        return Err(AppError::no_image_found(directory));
    }

    candidates.sort();

    let index = picker.pick(candidates.len());
    if index >= candidates.len() {
        return Err(AppError::Internal(format!(
            "image index {} out of range for {} candidates",
            index,
            candidates.len()
        )));
    }

    let path = candidates.swap_remove(index);
    let modified = fs::metadata(&path)?.modified()?;

    Ok(SelectedImage { path, modified })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    struct FixedPicker(usize);

    impl IndexPicker for FixedPicker {
        fn pick(&mut self, _len: usize) -> usize {
            self.0
        }
    }

    fn write_file(dir: &tempfile::TempDir, name: &str) {
        let mut file = File::create(dir.path().join(name)).unwrap();
        file.write_all(b"not really a jpeg").unwrap();
    }

    #[test]
    fn missing_directory_reports_no_image_found() {
        let mut picker = FixedPicker(0);
        let result = select_random_image("definitely/not/a/directory", &mut picker);
        assert!(matches!(result, Err(AppError::NoImageFound { .. })));
    }

    #[test]
    fn empty_directory_reports_no_image_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut picker = FixedPicker(0);
        let result = select_random_image(dir.path().to_str().unwrap(), &mut picker);
        assert!(matches!(result, Err(AppError::NoImageFound { .. })));
    }

    #[test]
    fn non_matching_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "screenshot.png");
        write_file(&dir, "notes.txt");
        write_file(&dir, "archive.jpeg");

        let mut picker = FixedPicker(0);
        let result = select_random_image(dir.path().to_str().unwrap(), &mut picker);
        assert!(matches!(result, Err(AppError::NoImageFound { .. })));
    }

    #[test]
    fn single_match_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "only.jpg");
        write_file(&dir, "decoy.png");

        let mut picker = FixedPicker(0);
        let image = select_random_image(dir.path().to_str().unwrap(), &mut picker).unwrap();
        assert_eq!(image.path.file_name().unwrap(), "only.jpg");
    }

    #[test]
    fn index_selects_within_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "c.jpg");
        write_file(&dir, "a.jpg");
        write_file(&dir, "b.jpg");

        let mut first = FixedPicker(0);
        let image = select_random_image(dir.path().to_str().unwrap(), &mut first).unwrap();
        assert_eq!(image.path.file_name().unwrap(), "a.jpg");

        let mut last = FixedPicker(2);
        let image = select_random_image(dir.path().to_str().unwrap(), &mut last).unwrap();
        assert_eq!(image.path.file_name().unwrap(), "c.jpg");
    }

    #[test]
    fn out_of_range_index_fails_instead_of_wrapping() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "a.jpg");
        write_file(&dir, "b.jpg");

        let mut picker = FixedPicker(2);
        let result = select_random_image(dir.path().to_str().unwrap(), &mut picker);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn status_text_uses_pinned_format() {
        let image = SelectedImage {
            path: PathBuf::from("a.jpg"),
            modified: SystemTime::UNIX_EPOCH,
        };
        let text = image.status_text();
        // Local-time rendering of the epoch; shape check only.
        assert_eq!(text.len(), "1970-01-01 00:00:00".len());
        assert_eq!(&text[4..5], "-");
        assert_eq!(&text[13..14], ":");
    }
}
