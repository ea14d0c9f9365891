use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use covjoin::{JoinConfig, Preset};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Join per-sample coverage tables into one tab-separated table"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Join explicitly listed files
    Join {
        /// File that fixes row order and the set of keys
        #[arg(short, long, value_name = "FILE")]
        reference: PathBuf,
        /// Additional file, repeat in column order
        #[arg(short = 'a', long = "add", value_name = "FILE")]
        additional: Vec<PathBuf>,
        /// Column name, one per file, reference first
        #[arg(short = 'H', long = "header", value_name = "NAME", required = true)]
        headers: Vec<String>,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        /// Fill short rows with this value instead of failing
        #[arg(long, value_name = "VALUE")]
        pad: Option<String>,
    },
    /// Run a join described by a YAML or JSON file
    Config {
        path: PathBuf,
        /// Override the output path from the file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Run one of the built-in dataset layouts
    Preset {
        #[arg(value_parser = parse_preset)]
        name: Preset,
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        #[arg(long, value_name = "VALUE")]
        pad: Option<String>,
    },
    /// List the built-in dataset layouts
    Presets,
}

fn parse_preset(s: &str) -> Result<Preset> {
    Preset::from_str(s).ok_or_else(|| {
        let names: Vec<&str> = Preset::ALL.iter().map(Preset::as_str).collect();
        anyhow!("unknown preset {:?}, expected one of {}", s, names.join(", "))
    })
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.command {
        Command::Join {
            reference,
            additional,
            headers,
            output,
            pad,
        } => {
            let mut builder = JoinConfig::builder()
                .reference(reference)
                .additional_files(additional)
                .headers(headers)
                .output(output);
            if let Some(fill) = pad {
                builder = builder.pad_with(fill);
            }
            builder.build()?
        }
        Command::Config { path, output } => {
            let mut config = JoinConfig::from_file(&path)
                .with_context(|| format!("loading config {}", path.display()))?;
            if let Some(output) = output {
                config.output = output;
                config.validate()?;
            }
            config
        }
        Command::Preset {
            name,
            base_dir,
            output,
            pad,
        } => name.config(&base_dir, output, pad)?,
        Command::Presets => {
            for preset in Preset::ALL {
                println!(
                    "{:<22} {}/  -> {}",
                    preset.as_str(),
                    preset.directory(),
                    preset.default_output()
                );
            }
            return Ok(());
        }
    };

    info!(
        reference = %config.reference.display(),
        additional = config.additional.len(),
        "starting join"
    );
    let report = covjoin::run(&config)
        .with_context(|| format!("joining into {}", config.output.display()))?;
    info!(
        output = %report.output.display(),
        rows = report.rows,
        columns = report.columns,
        diagnostics = report.diagnostics.len(),
        "done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join() {
        let cli = Cli::try_parse_from([
            "covjoin", "join", "-r", "R.tabular", "-a", "F.tabular", "--add", "G.tabular", "-H",
            "ref", "-H", "f", "--header", "g", "-o", "out.txt", "--pad", "0",
        ])
        .unwrap();
        match cli.command {
            Command::Join {
                reference,
                additional,
                headers,
                output,
                pad,
            } => {
                assert_eq!(reference, PathBuf::from("R.tabular"));
                assert_eq!(
                    additional,
                    vec![PathBuf::from("F.tabular"), PathBuf::from("G.tabular")]
                );
                assert_eq!(headers, vec!["ref", "f", "g"]);
                assert_eq!(output, PathBuf::from("out.txt"));
                assert_eq!(pad.as_deref(), Some("0"));
            }
            _ => panic!("expected join subcommand"),
        }
    }

    #[test]
    fn test_parse_join_requires_header_and_output() {
        assert!(Cli::try_parse_from(["covjoin", "join", "-r", "R", "-o", "out.txt"]).is_err());
        assert!(Cli::try_parse_from(["covjoin", "join", "-r", "R", "-H", "ref"]).is_err());
    }

    #[test]
    fn test_parse_preset() {
        let cli = Cli::try_parse_from([
            "covjoin",
            "preset",
            "multiread_pss",
            "--base-dir",
            "4_Multireads/Input",
        ])
        .unwrap();
        match cli.command {
            Command::Preset {
                name,
                base_dir,
                output,
                pad,
            } => {
                assert_eq!(name, Preset::MultireadPss);
                assert_eq!(base_dir, PathBuf::from("4_Multireads/Input"));
                assert!(output.is_none());
                assert!(pad.is_none());
            }
            _ => panic!("expected preset subcommand"),
        }

        let cli = Cli::try_parse_from(["covjoin", "preset", "tss"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Preset { name: Preset::Tss, ref base_dir, .. } if *base_dir == PathBuf::from(".")
        ));
    }

    #[test]
    fn test_parse_unknown_preset() {
        assert!(Cli::try_parse_from(["covjoin", "preset", "pss"]).is_err());
    }
}
