// src/config/preset.rs
use std::path::{Path, PathBuf};

use super::JoinConfig;
use crate::error::Result;

/// Sample names in column order. The first one is the reference file.
pub const SAMPLES: [&str; 8] = ["dWT1", "dWT2", "dWT3", "WT1", "WT2", "WT3", "TV1", "TV2"];

/// The built-in dataset layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// 5' end coverage around transcription start sites.
    Tss,
    /// Per-nucleotide transcript coverage.
    Transcript,
    /// 5' ends at processing sites, multimapping reads included.
    MultireadPss,
    /// Transcript coverage, multimapping reads included.
    MultireadTranscript,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Tss,
        Preset::Transcript,
        Preset::MultireadPss,
        Preset::MultireadTranscript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Tss => "tss",
            Preset::Transcript => "transcript",
            Preset::MultireadPss => "multiread-pss",
            Preset::MultireadTranscript => "multiread-transcript",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "tss" => Some(Preset::Tss),
            "transcript" => Some(Preset::Transcript),
            "multiread-pss" => Some(Preset::MultireadPss),
            "multiread-transcript" => Some(Preset::MultireadTranscript),
            _ => None,
        }
    }

    /// Directory holding the per-sample tables, relative to the base directory.
    pub fn directory(&self) -> &'static str {
        match self {
            Preset::Tss => "TSS_5p_coverage",
            Preset::Transcript => "transcriptCoverage",
            Preset::MultireadPss => "PSS_5ends_multireads",
            Preset::MultireadTranscript => "transcriptCoverage_multireads",
        }
    }

    fn file_suffix(&self) -> &'static str {
        match self {
            Preset::Tss => "TSS",
            Preset::Transcript => "transcript",
            Preset::MultireadPss => "PSS_multireads",
            Preset::MultireadTranscript => "transcript_multireads",
        }
    }

    pub fn default_output(&self) -> &'static str {
        match self {
            Preset::Tss => "TSS_5ends_combined_5sensing.txt",
            Preset::Transcript => "transcript_coverage_combined_5sensing.txt",
            Preset::MultireadPss => "multireads_PSS_5ends_combined_5sensing.txt",
            Preset::MultireadTranscript => "multireads_transcript_coverage_combined_5sensing.txt",
        }
    }

    /// Path of one sample's table under `base_dir`.
    pub fn sample_path(&self, base_dir: &Path, sample: &str) -> PathBuf {
        base_dir
            .join(self.directory())
            .join(format!("{}_{}.tabular", sample, self.file_suffix()))
    }

    /// Build the run for this dataset. `output` defaults to
    /// [`Preset::default_output`] in the current directory.
    pub fn config(
        &self,
        base_dir: &Path,
        output: Option<PathBuf>,
        pad: Option<String>,
    ) -> Result<JoinConfig> {
        let (reference, rest) = (SAMPLES[0], &SAMPLES[1..]);
        let mut builder = JoinConfig::builder()
            .reference(self.sample_path(base_dir, reference))
            .additional_files(rest.iter().map(|s| self.sample_path(base_dir, s)))
            .headers(SAMPLES)
            .output(output.unwrap_or_else(|| PathBuf::from(self.default_output())));
        if let Some(fill) = pad {
            builder = builder.pad_with(fill);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(Preset::from_str(" Multiread_PSS "), Some(Preset::MultireadPss));
        assert_eq!(Preset::from_str("pss"), None);
    }

    #[test]
    fn test_tss_layout() {
        let config = Preset::Tss.config(Path::new("input"), None, None).unwrap();
        assert_eq!(
            config.reference,
            PathBuf::from("input/TSS_5p_coverage/dWT1_TSS.tabular")
        );
        assert_eq!(config.additional.len(), 7);
        assert_eq!(
            config.additional[0],
            PathBuf::from("input/TSS_5p_coverage/dWT2_TSS.tabular")
        );
        assert_eq!(
            config.additional[6],
            PathBuf::from("input/TSS_5p_coverage/TV2_TSS.tabular")
        );
        assert_eq!(config.headers, SAMPLES.to_vec());
        assert_eq!(config.column_count(), 8);
        assert_eq!(config.output, PathBuf::from("TSS_5ends_combined_5sensing.txt"));
    }

    #[test]
    fn test_multiread_layout_with_overrides() {
        let config = Preset::MultireadTranscript
            .config(Path::new("."), Some("out.txt".into()), Some("0".into()))
            .unwrap();
        assert_eq!(
            config.additional[2],
            PathBuf::from("./transcriptCoverage_multireads/WT1_transcript_multireads.tabular")
        );
        assert_eq!(config.output, PathBuf::from("out.txt"));
        assert_eq!(config.pad.as_deref(), Some("0"));
    }
}
