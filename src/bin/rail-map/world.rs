//! Loading world snapshots from disk.

use rail_map::WorldData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading a world snapshot.
#[derive(Error, Debug)]
pub enum WorldLoadError {
    #[error("world snapshot not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse RON snapshot: {0}")]
    Ron(#[from] ron::de::SpannedError),
    #[error("failed to parse JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Default snapshot location: `<data dir>/rail-map/world.ron`.
pub fn default_world_path() -> Option<PathBuf> {
    Some(dirs::data_dir()?.join("rail-map").join("world.ron"))
}

/// Loads a snapshot; `.json` files are parsed as JSON, anything else as RON.
pub fn load_world(path: &Path) -> Result<WorldData, WorldLoadError> {
    if !path.exists() {
        return Err(WorldLoadError::NotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path).map_err(|source| WorldLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_world(&text, is_json(path))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn parse_world(text: &str, json: bool) -> Result<WorldData, WorldLoadError> {
    if json {
        Ok(serde_json::from_str(text)?)
    } else {
        Ok(ron::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ron_snapshot() {
        let text = r#"(
            Players: [(Name: "Casey", Location: (1.0, 2.0, 3.0))],
            WaterTowers: [(Location: (10.0, 20.0, 0.0))],
        )"#;
        let world = parse_world(text, false).unwrap();

        assert_eq!(world.players[0].name, "Casey");
        assert_eq!(world.water_towers[0].location, [10.0, 20.0, 0.0]);
    }

    #[test]
    fn parses_json_snapshot() {
        let text = r#"{ "Frames": [{ "Type": "tender", "Location": [5.0, 6.0, 7.0] }] }"#;
        let world = parse_world(text, true).unwrap();

        assert_eq!(world.frames[0].frame_type, "tender");
    }

    #[test]
    fn reports_parse_errors() {
        assert!(matches!(
            parse_world("{ not json", true),
            Err(WorldLoadError::Json(_))
        ));
        assert!(matches!(
            parse_world("(Players: [", false),
            Err(WorldLoadError::Ron(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let path = Path::new("/definitely/not/here/world.ron");
        assert!(matches!(load_world(path), Err(WorldLoadError::NotFound(_))));
    }

    #[test]
    fn extension_picks_the_format() {
        assert!(is_json(Path::new("snapshot.JSON")));
        assert!(!is_json(Path::new("snapshot.ron")));
        assert!(!is_json(Path::new("snapshot")));
    }
}
