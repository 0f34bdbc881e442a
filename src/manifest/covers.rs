//! Cover image lookup by filename stem.

use std::path::Path;

use tracing::debug;

/// Find a cover image for a stimulus in `cover_dir`.
///
/// Covers are scanned in name order; the first file whose stem matches the
/// album, the artist, or the stimulus file stem (case-insensitively) wins.
/// A missing directory or no match yields `None`.
pub fn resolve_cover(
    cover_dir: &Path,
    album: Option<&str>,
    artist: Option<&str>,
    file_stem: &str,
) -> Option<String> {
    let entries = match std::fs::read_dir(cover_dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("No cover directory {}: {err}", cover_dir.display());
            return None;
        }
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    for name in names {
        let stem = Path::new(&name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("");
        let matches = album.is_some_and(|album| stem.eq_ignore_ascii_case(album))
            || artist.is_some_and(|artist| stem.eq_ignore_ascii_case(artist))
            || stem.eq_ignore_ascii_case(file_stem);
        if matches {
            return Some(name);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"img").unwrap();
    }

    #[test]
    fn album_match_is_found_case_insensitively() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "blue train.jpg");
        let cover = resolve_cover(dir.path(), Some("Blue Train"), None, "track01");
        assert_eq!(cover.as_deref(), Some("blue train.jpg"));
    }

    #[test]
    fn artist_and_stem_also_match() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "Coltrane.png");
        assert_eq!(
            resolve_cover(dir.path(), None, Some("coltrane"), "x"),
            Some("Coltrane.png".into())
        );
        assert_eq!(
            resolve_cover(dir.path(), None, None, "coltrane"),
            Some("Coltrane.png".into())
        );
    }

    #[test]
    fn no_match_or_missing_dir_is_none() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "other.jpg");
        assert_eq!(resolve_cover(dir.path(), Some("Album"), None, "stem"), None);
        assert_eq!(
            resolve_cover(&dir.path().join("absent"), Some("Album"), None, "stem"),
            None
        );
    }

    #[test]
    fn earliest_name_wins_when_several_match() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b_artist.jpg");
        touch(dir.path(), "a_album.jpg");
        let cover = resolve_cover(dir.path(), Some("a_album"), Some("b_artist"), "stem");
        assert_eq!(cover.as_deref(), Some("a_album.jpg"));
    }
}
