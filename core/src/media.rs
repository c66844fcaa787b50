//! Named resource handles.

use std::{
    fmt, fs,
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;

use crate::{graphic::Image, EngineError, Result};

/// Directory that anchors every [`Media`] of a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRoot {
    path: PathBuf,
}

impl ResourceRoot {
    /// Creates a resource root anchored at the provided directory.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory containing the resources.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves a logical resource name, using `/` as separator.
    #[must_use]
    pub fn media(&self, name: &str) -> Media {
        let mut path = self.path.clone();
        for segment in name.split('/').filter(|segment| !segment.is_empty()) {
            path.push(segment);
        }
        Media {
            name: name.to_owned(),
            path,
        }
    }
}

/// Opaque handle onto a single named resource.
///
/// Two handles are equal when their logical names match, regardless of the
/// root they were resolved against.
#[derive(Clone, Debug)]
pub struct Media {
    name: String,
    path: PathBuf,
}

impl Media {
    /// Creates a handle for a resource outside any [`ResourceRoot`].
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
        }
    }

    /// Logical name of the resource.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the resource on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reports whether the resource exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the raw bytes of the resource.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|source| EngineError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Reads the resource as UTF-8 text.
    pub fn read_to_string(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|source| EngineError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Decodes the resource as a typed TOML configuration.
    pub fn read_config<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let contents = self.read_to_string()?;
        toml::from_str(&contents).map_err(|error| EngineError::parse(&self.name, error.to_string()))
    }

    /// Decodes the resource as an RGBA image.
    pub fn read_image(&self) -> Result<Image> {
        let bytes = self.read_bytes()?;
        let decoded = image::load_from_memory(&bytes).map_err(|source| EngineError::Image {
            path: self.path.clone(),
            source,
        })?;
        Ok(Image::new(decoded.to_rgba8()))
    }
}

impl PartialEq for Media {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Media {}

impl Hash for Media {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        version: u32,
        name: String,
    }

    #[test]
    fn media_resolves_nested_names_under_root() {
        let root = ResourceRoot::new("/data");
        let media = root.media("levels/stage1.toml");
        assert_eq!(media.name(), "levels/stage1.toml");
        assert_eq!(media.path(), Path::new("/data/levels/stage1.toml"));
    }

    #[test]
    fn media_equality_ignores_root() {
        let first = ResourceRoot::new("/a").media("sheet.png");
        let second = ResourceRoot::new("/b").media("sheet.png");
        assert_eq!(first, second);
    }

    #[test]
    fn read_config_decodes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("sample.toml"), "version = 1\nname = \"grass\"\n")
            .expect("write sample");
        let media = ResourceRoot::new(dir.path()).media("sample.toml");

        let sample: Sample = media.read_config().expect("decode sample");

        assert_eq!(
            sample,
            Sample {
                version: 1,
                name: "grass".to_owned(),
            }
        );
    }

    #[test]
    fn read_config_reports_resource_name_on_parse_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("broken.toml"), "version = [").expect("write broken");
        let media = ResourceRoot::new(dir.path()).media("broken.toml");

        let error = media.read_config::<Sample>().expect_err("must fail");

        match error {
            EngineError::Parse { resource, .. } => assert_eq!(resource, "broken.toml"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_resource_is_an_io_error() {
        let media = Media::from_path("/definitely/not/here.toml");
        assert!(!media.exists());
        assert!(matches!(media.read_bytes(), Err(EngineError::Io { .. })));
    }
}
