//! Extra-storage option parsing.
//!
//! The secondary storage area is configured as a single comma-separated
//! triple: the directory path, the backing device, and the device type.
//! The store itself only consumes the path; the device fields travel with
//! the parsed value for mount tooling.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Parsed `--extra-storage` value: `<path>,<device>,<type>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtraStorageSpec {
    /// Directory serving as the secondary storage root.
    pub extra_path: PathBuf,
    /// Device backing the mount (e.g. `/dev/vdb`).
    pub mount_src_dev: String,
    /// Filesystem type of the mount (e.g. `ext4`).
    pub dev_type: String,
}

impl FromStr for ExtraStorageSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(format!(
                "expected `<path>,<device>,<type>`, got {} part(s)",
                parts.len()
            ));
        }
        Ok(Self {
            extra_path: PathBuf::from(parts[0]),
            mount_src_dev: parts[1].to_string(),
            dev_type: parts[2].to_string(),
        })
    }
}

impl fmt::Display for ExtraStorageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "extra-dir:{},mount-src-dev:{},mount-type:{}",
            self.extra_path.display(),
            self.mount_src_dev,
            self.dev_type
        )
    }
}
