mod support;

use support::media::{media_tree, stimulus_tags, write_tagged_wav, write_tone_wav};

use rand::{SeedableRng, rngs::StdRng};
use stimprep::config::{AppConfig, TriggerSettings};
use stimprep::genre;
use stimprep::pipeline;
use stimprep::video::EncodeSettings;

#[test]
fn processed_stimuli_flow_into_their_category_folders() {
    let root = tempfile::tempdir().expect("create tempdir");
    let tree = media_tree(root.path());
    let paths = tree.stimulus_paths();

    write_tagged_wav(
        &paths.source_dir.join("song.wav"),
        1.8,
        &stimulus_tags("So What", "Miles Davis", "Kind of Blue", "Musique"),
    );
    write_tagged_wav(
        &paths.source_dir.join("forest.wav"),
        1.8,
        &stimulus_tags("Forest", "", "", "Nature"),
    );
    write_tone_wav(&paths.source_dir.join("untagged.wav"), 1.8);

    let mut rng = StdRng::seed_from_u64(3);
    let summary = pipeline::run_batch(
        &tree,
        &TriggerSettings::default(),
        &EncodeSettings::default(),
        false,
        &mut rng,
    )
    .expect("run batch");
    assert_eq!(summary.processed, 3);

    let summary =
        genre::route_by_genre(&tree, &AppConfig::default_genres(), false).expect("route");
    assert_eq!(summary.copied, 1);
    assert_eq!(summary.unmapped, 2);

    let routed = tree.playlist_media().join("Musique").join("song.wav");
    assert!(routed.exists());
    // Copy, not move: the processed archive keeps its file.
    let archived = paths.output_dir.join("song.wav");
    assert!(archived.exists());
    assert_eq!(
        std::fs::read(&routed).expect("read routed"),
        std::fs::read(&archived).expect("read archived")
    );
    assert!(!tree.playlist_media().join("Nature").exists());
}
