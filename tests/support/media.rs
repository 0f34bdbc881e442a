use std::path::Path;

use stimprep::config::MediaTree;
use stimprep::tags::{self, StimulusTags};

/// Write a mono 16-bit sine-ish tone at 44.1 kHz.
pub fn write_tone_wav(path: &Path, seconds: f64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create wav parent dirs");
    }
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
    let frames = (seconds * 44_100.0) as usize;
    for index in 0..frames {
        let sample = ((index as f32 * 0.07).sin() * 6_000.0) as i16;
        writer.write_sample(sample).expect("write wav sample");
    }
    writer.finalize().expect("finalize wav");
}

/// Write a tone and stamp descriptive tags on it.
pub fn write_tagged_wav(path: &Path, seconds: f64, tags: &StimulusTags) {
    write_tone_wav(path, seconds);
    tags::write_tags(path, tags).expect("write tags");
}

/// A media tree rooted in `root` with the source directory created.
pub fn media_tree(root: &Path) -> MediaTree {
    let tree = MediaTree::new(root.to_path_buf());
    std::fs::create_dir_all(tree.stimulus_paths().source_dir).expect("create source dir");
    tree
}

pub fn stimulus_tags(title: &str, artist: &str, album: &str, genre: &str) -> StimulusTags {
    StimulusTags {
        title: Some(title.to_string()),
        artist: Some(artist.to_string()),
        album: Some(album.to_string()),
        genre: Some(genre.to_string()),
    }
}
