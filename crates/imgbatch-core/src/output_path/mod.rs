//! Output path resolution.
//!
//! Derives a safe `.png` filename from a user-suggested name or the prompt,
//! picks a collision-free path in the output directory, verifies it is
//! contained in that directory, and reserves it by creating the file.

mod containment;
mod sanitize;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::JobError;

pub use containment::{is_within_directory, normalize};
pub use sanitize::{sanitize_filename, truncate_chars, MAX_FILENAME_CHARS};

pub const EXTENSION: &str = ".png";
/// Prompt slice length used in generated filenames, in characters.
pub const PROMPT_SLICE_CHARS: usize = 50;
/// Upper bound on `_N` suffixes tried before giving up.
pub const MAX_SUFFIX_ATTEMPTS: u32 = 10_000;

/// Builds the filename for a job.
///
/// A suggested name is sanitized and gets `.png` appended unless it already
/// ends with it. Without one (or when it sanitizes to nothing) the name is
/// `<UTC timestamp>_<first 50 chars of the sanitized prompt>.png`.
pub fn output_filename(suggested: Option<&str>, prompt: Option<&str>, now: DateTime<Utc>) -> String {
    if let Some(suggested) = suggested {
        let sanitized = sanitize_filename(suggested);
        if !sanitized.is_empty() {
            return if sanitized.ends_with(EXTENSION) {
                sanitized
            } else {
                format!("{}{}", sanitized, EXTENSION)
            };
        }
        tracing::debug!(suggested, "suggested filename sanitized to nothing; deriving from prompt");
    }
    generate_filename(prompt.unwrap_or("image"), now)
}

/// `2026-10-19T08-15-00_a_red_fox.png` style name from a timestamp and prompt.
pub fn generate_filename(prompt: &str, now: DateTime<Utc>) -> String {
    let timestamp = now.format("%Y-%m-%dT%H-%M-%S");
    let sanitized = sanitize_filename(prompt);
    format!(
        "{}_{}{}",
        timestamp,
        truncate_chars(&sanitized, PROMPT_SLICE_CHARS),
        EXTENSION
    )
}

/// Splits `name.png` into (`name`, `.png`). A leading dot does not start an extension.
fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename.split_at(idx),
        _ => (filename, ""),
    }
}

/// Fails with `PathTraversal` unless `candidate` lies inside `directory`.
pub fn ensure_within(directory: &Path, candidate: &Path) -> Result<(), JobError> {
    let inside = is_within_directory(candidate, directory)
        .map_err(|e| JobError::fs("resolve output path", e))?;
    if !inside {
        tracing::warn!(path = %candidate.display(), dir = %directory.display(), "rejected output path outside directory");
        return Err(JobError::PathTraversal {
            path: candidate.to_path_buf(),
        });
    }
    Ok(())
}

/// Creates `directory` if needed and reserves a unique path for `filename`.
///
/// If `filename` is taken, `_1`, `_2`, ... is inserted before the extension.
/// The winning path is created empty with `create_new`, so two jobs running
/// on different threads can never be handed the same path. The caller owns
/// the file from then on and should remove it if it cannot fill it.
pub fn reserve_unique_path(directory: &Path, filename: &str) -> Result<PathBuf, JobError> {
    fs::create_dir_all(directory)
        .map_err(|e| JobError::fs(format!("create output directory {}", directory.display()), e))?;

    let (stem, ext) = split_extension(filename);
    for attempt in 0..=MAX_SUFFIX_ATTEMPTS {
        let name = if attempt == 0 {
            filename.to_string()
        } else {
            format!("{}_{}{}", stem, attempt, ext)
        };
        let candidate = directory.join(&name);
        ensure_within(directory, &candidate)?;

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(JobError::fs(
                    format!("reserve output file {}", candidate.display()),
                    e,
                ))
            }
        }
    }

    Err(JobError::fs(
        format!("find a free name for {} in {}", filename, directory.display()),
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} candidates already taken", MAX_SUFFIX_ATTEMPTS + 1),
        ),
    ))
}

/// Full resolution for one job: derive the filename, then reserve it in `directory`.
pub fn reserve_output_path(
    directory: &Path,
    suggested: Option<&str>,
    prompt: Option<&str>,
) -> Result<PathBuf, JobError> {
    let filename = output_filename(suggested, prompt, Utc::now());
    reserve_unique_path(directory, &filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 15, 42).unwrap()
    }

    #[test]
    fn suggested_name_gets_png_once() {
        assert_eq!(output_filename(Some("sunset"), None, fixed_now()), "sunset.png");
        assert_eq!(output_filename(Some("sunset.png"), None, fixed_now()), "sunset.png");
        assert_eq!(
            output_filename(Some("my sunset.jpg"), None, fixed_now()),
            "my_sunset.jpg.png"
        );
    }

    #[test]
    fn generated_name_from_prompt() {
        assert_eq!(
            output_filename(None, Some("A red fox: at dawn?"), fixed_now()),
            "2026-10-19T08-15-42_A_red_fox_at_dawn.png"
        );
    }

    #[test]
    fn generated_name_caps_prompt_slice() {
        let prompt = "x".repeat(120);
        let name = generate_filename(&prompt, fixed_now());
        assert_eq!(name, format!("2026-10-19T08-15-42_{}.png", "x".repeat(50)));
    }

    #[test]
    fn empty_suggestion_falls_back_to_prompt() {
        assert_eq!(
            output_filename(Some("///"), Some("cat"), fixed_now()),
            "2026-10-19T08-15-42_cat.png"
        );
        assert_eq!(
            output_filename(None, None, fixed_now()),
            "2026-10-19T08-15-42_image.png"
        );
    }

    #[test]
    fn split_extension_cases() {
        assert_eq!(split_extension("a.png"), ("a", ".png"));
        assert_eq!(split_extension("a.b.png"), ("a.b", ".png"));
        assert_eq!(split_extension("noext"), ("noext", ""));
        assert_eq!(split_extension(".png"), (".png", ""));
    }

    #[test]
    fn creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("out");
        let path = reserve_unique_path(&dir, "a.png").unwrap();
        assert_eq!(path, dir.join("a.png"));
        assert!(path.exists());
    }

    #[test]
    fn collisions_get_gapless_suffixes() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let names: Vec<String> = (0..4)
            .map(|_| {
                reserve_unique_path(dir, "fox.png")
                    .unwrap()
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, ["fox.png", "fox_1.png", "fox_2.png", "fox_3.png"]);
    }

    #[test]
    fn existing_directory_entry_counts_as_taken() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("fox.png")).unwrap();
        let path = reserve_unique_path(tmp.path(), "fox.png").unwrap();
        assert_eq!(path, tmp.path().join("fox_1.png"));
    }

    #[test]
    fn traversal_candidate_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let err = reserve_unique_path(tmp.path(), "../escape.png").unwrap_err();
        assert!(matches!(err, JobError::PathTraversal { .. }));
        assert_eq!(err.to_string(), "Invalid output path: path traversal detected");
        assert!(!tmp.path().parent().unwrap().join("escape.png").exists());
    }

    #[test]
    fn resolved_paths_stay_inside_directory() {
        let tmp = tempfile::tempdir().unwrap();
        for suggested in ["../../etc/passwd", "/abs/path.png", "..", "a\\..\\b", "C:\\x"] {
            let path = reserve_output_path(tmp.path(), Some(suggested), Some("p")).unwrap();
            assert!(
                is_within_directory(&path, tmp.path()).unwrap(),
                "{suggested:?} resolved outside: {}",
                path.display()
            );
            assert_eq!(path.parent().unwrap(), tmp.path());
        }
    }
}
