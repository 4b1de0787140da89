//! Logger configuration.

/// Where log files go and when they roll.
///
/// `dir` is used as a verbatim path prefix, so it must end with a path
/// separator and the directory must already exist; the logger never
/// creates it. Output files are `{dir}{filename}.{N}.txt`, `N` starting
/// at 1 and incrementing on every roll.
#[derive(Clone, Debug)]
pub struct Config {
    pub dir: String,
    pub filename: String,
    /// Roll threshold in MiB. Values below 1 are treated as 1.
    pub roll_size_mb: u32,
}

impl Config {
    pub fn new(dir: impl Into<String>, filename: impl Into<String>, roll_size_mb: u32) -> Self {
        Self {
            dir: dir.into(),
            filename: filename.into(),
            roll_size_mb,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: "./".to_string(),
            filename: "log".to_string(),
            roll_size_mb: 10,
        }
    }
}
