// src/config/mod.rs
pub mod preset;

use serde::Deserialize;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};
use crate::join::RowPolicy;
pub use preset::Preset;

/// Characters that would break the tab-separated output if they appeared in a cell.
const LINE_BREAKING: &[char] = &['\t', '\n', '\r'];

/// Everything one join run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinConfig {
    /// Defines row order and the set of known keys.
    pub reference: PathBuf,
    /// Merged in this order; this is also the output column order.
    pub additional: Vec<PathBuf>,
    /// One name per input file, reference first.
    pub headers: Vec<String>,
    pub output: PathBuf,
    /// Fill value for short rows. `None` makes short rows an error.
    pub pad: Option<String>,
}

/// On-disk form of a [`JoinConfig`]. Relative input paths are resolved
/// against `base_dir` when one is given.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    base_dir: Option<PathBuf>,
    reference: PathBuf,
    #[serde(default)]
    additional: Vec<PathBuf>,
    headers: Vec<String>,
    output: PathBuf,
    #[serde(default)]
    pad: Option<String>,
}

impl JoinConfig {
    pub fn builder() -> JoinConfigBuilder {
        JoinConfigBuilder::default()
    }

    /// Load and validate a YAML (`.yaml`/`.yml`) or JSON (`.json`) config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let parse_err = |reason: String| Error::ConfigParse {
            path: path.to_path_buf(),
            reason,
        };

        let reader = || -> Result<BufReader<File>> {
            File::open(path)
                .map(BufReader::new)
                .map_err(|e| Error::file_access(path, e))
        };
        let file: ConfigFile = match ext.as_str() {
            "yaml" | "yml" => {
                serde_yaml::from_reader(reader()?).map_err(|e| parse_err(e.to_string()))?
            }
            "json" => serde_json::from_reader(reader()?).map_err(|e| parse_err(e.to_string()))?,
            other => {
                return Err(parse_err(format!(
                    "unsupported config extension {:?}, expected yaml, yml or json",
                    other
                )))
            }
        };

        let config = file.into_config();
        config.validate()?;
        Ok(config)
    }

    /// Column count of the output table: reference plus additional files.
    pub fn column_count(&self) -> usize {
        1 + self.additional.len()
    }

    pub fn row_policy(&self) -> RowPolicy {
        match &self.pad {
            Some(fill) => RowPolicy::Pad(fill.clone()),
            None => RowPolicy::Strict,
        }
    }

    /// Check the config before any file is touched.
    pub fn validate(&self) -> Result<()> {
        if self.reference.as_os_str().is_empty() {
            return Err(Error::Config("reference file path is empty".into()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::Config("output file path is empty".into()));
        }
        if self.headers.len() != self.column_count() {
            return Err(Error::Config(format!(
                "expected {} header names (1 reference + {} additional), got {}",
                self.column_count(),
                self.additional.len(),
                self.headers.len()
            )));
        }
        if let Some(bad) = self.headers.iter().find(|h| h.contains(LINE_BREAKING)) {
            return Err(Error::Config(format!(
                "header name {:?} contains a tab or line break",
                bad
            )));
        }
        if let Some(fill) = &self.pad {
            if fill.contains(LINE_BREAKING) {
                return Err(Error::Config(format!(
                    "pad value {:?} contains a tab or line break",
                    fill
                )));
            }
        }
        let mut inputs = std::iter::once(&self.reference).chain(&self.additional);
        if let Some(clash) = inputs.find(|p| **p == self.output) {
            return Err(Error::Config(format!(
                "output {} would overwrite an input file",
                clash.display()
            )));
        }
        Ok(())
    }
}

impl ConfigFile {
    fn into_config(self) -> JoinConfig {
        let ConfigFile {
            base_dir,
            reference,
            additional,
            headers,
            output,
            pad,
        } = self;
        let resolve = |p: PathBuf| match &base_dir {
            Some(base) if p.is_relative() => base.join(p),
            _ => p,
        };
        JoinConfig {
            reference: resolve(reference),
            additional: additional.into_iter().map(resolve).collect(),
            headers,
            output,
            pad,
        }
    }
}

/// Incremental construction of a [`JoinConfig`].
#[derive(Debug, Default, Clone)]
pub struct JoinConfigBuilder {
    reference: Option<PathBuf>,
    additional: Vec<PathBuf>,
    headers: Vec<String>,
    output: Option<PathBuf>,
    pad: Option<String>,
}

impl JoinConfigBuilder {
    pub fn reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference = Some(path.into());
        self
    }

    /// Add one additional file; call order is column order.
    pub fn additional(mut self, path: impl Into<PathBuf>) -> Self {
        self.additional.push(path.into());
        self
    }

    pub fn additional_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.additional.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn header(mut self, name: impl Into<String>) -> Self {
        self.headers.push(name.into());
        self
    }

    pub fn headers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn pad_with(mut self, fill: impl Into<String>) -> Self {
        self.pad = Some(fill.into());
        self
    }

    pub fn build(self) -> Result<JoinConfig> {
        let config = JoinConfig {
            reference: self
                .reference
                .ok_or_else(|| Error::Config("no reference file given".into()))?,
            additional: self.additional,
            headers: self.headers,
            output: self
                .output
                .ok_or_else(|| Error::Config("no output file given".into()))?,
            pad: self.pad,
        };
        config.validate()?;
        Ok(config)
    }
}
