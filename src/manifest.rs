//! Playlist manifest building.
//!
//! The manifest is a JSON file mapping each category folder under
//! `Create_Playlists/media` to its stimuli, keyed by filename and carrying
//! tags, stream properties, a resolved cover image and a priority flag.

pub mod builder;
pub mod covers;
pub mod priority;
pub mod record;

pub use builder::{Manifest, ManifestError, build_manifest, write_manifest};
pub use covers::resolve_cover;
pub use priority::{PriorityError, read_priority_set};
pub use record::StimulusRecord;
