//! Spend inputs binary
//!
//! Reads a coin transcript, rebuilds the commitment tree and writes the
//! spend-circuit inputs for one nullifier as a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use zkmix_smt::FieldElement;
use zkmix_witness::{Config, Transcript, WitnessBuilder};

/// Computes inputs to the spend circuit
#[derive(Debug, Parser)]
#[command(name = "spend-inputs", version, about, long_about = None)]
struct Args {
    /// Tree depth, counted in non-root levels; takes precedence over $ZKMIX_TREE_DEPTH
    depth: u32,

    /// Transcript file, one coin per line: a bare commitment, or a
    /// nullifier and nonce separated by whitespace
    transcript: PathBuf,

    /// Nullifier of the coin being spent; must appear in the transcript
    nullifier: FieldElement,

    /// Name of the created witness file [default: input.json, or $ZKMIX_OUTPUT]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Trust the transcript: skip the duplicate coin and nullifier checks
    #[arg(long)]
    lenient: bool,
}

impl Args {
    /// Layer command line arguments over the environment configuration
    fn into_config(self, mut config: Config) -> (Config, PathBuf, FieldElement) {
        config.depth = self.depth;
        if self.lenient {
            config.strict = false;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        (config, self.transcript, self.nullifier)
    }
}

fn main() -> Result<()> {
    // Setup logging; stderr keeps stdout free for piping
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let (config, transcript, nullifier) = Args::parse().into_config(Config::from_env());
    config.validate()?;

    info!(
        depth = config.depth,
        strict = config.strict,
        transcript = %transcript.display(),
        output = %config.output.display(),
        "computing spend inputs"
    );

    run(&config, &transcript, &nullifier)
}

/// Build the witness for `nullifier` and write it to `config.output`
fn run(config: &Config, transcript_path: &Path, nullifier: &FieldElement) -> Result<()> {
    let text = fs::read_to_string(transcript_path)
        .with_context(|| format!("failed to read transcript {}", transcript_path.display()))?;
    let transcript: Transcript = text
        .parse()
        .with_context(|| format!("invalid transcript {}", transcript_path.display()))?;

    let witness = WitnessBuilder::from_config(config)
        .build(transcript.entries(), nullifier)
        .with_context(|| format!("cannot build spend witness for nullifier {nullifier}"))?;

    let mut json = serde_json::to_string_pretty(&witness.to_inputs())?;
    json.push('\n');
    fs::write(&config.output, json)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    info!(
        digest = %witness.digest,
        leaf_index = witness.path.index,
        output = %config.output.display(),
        "spend inputs written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::Value;
    use tempfile::TempDir;
    use zkmix_smt::compress2;
    use zkmix_witness::WitnessError;

    fn setup_transcript(text: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transcript.txt");
        fs::write(&path, text).unwrap();
        (temp_dir, path)
    }

    fn config_in(dir: &TempDir, depth: u32) -> Config {
        Config { depth, output: dir.path().join("input.json"), ..Config::default() }
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_override_config() {
        let argv = ["spend-inputs", "4", "coins.txt", "7", "-o", "w.json", "--lenient"];
        let args = Args::try_parse_from(argv).unwrap();
        let (config, transcript, nullifier) = args.into_config(Config::default());
        assert_eq!(config.depth, 4);
        assert!(!config.strict);
        assert_eq!(config.output, PathBuf::from("w.json"));
        assert_eq!(transcript, PathBuf::from("coins.txt"));
        assert_eq!(nullifier, FieldElement::from(7));

        let args = Args::try_parse_from(["spend-inputs", "4", "coins.txt", "7"]).unwrap();
        let (config, _, _) = args.into_config(Config::default());
        assert!(config.strict);
        assert_eq!(config.output, PathBuf::from("input.json"));
    }

    #[test]
    fn test_positional_depth_wins_over_env() {
        let env = Config::from_vars(|name| (name == "ZKMIX_TREE_DEPTH").then(|| "9".to_string()));
        assert_eq!(env.depth, 9);

        let args = Args::try_parse_from(["spend-inputs", "4", "coins.txt", "7"]).unwrap();
        let (config, _, _) = args.into_config(env);
        assert_eq!(config.depth, 4);

        // depth is required on the command line
        assert!(Args::try_parse_from(["spend-inputs", "coins.txt", "7"]).is_err());
    }

    #[test]
    fn test_rejects_bad_nullifier() {
        assert!(Args::try_parse_from(["spend-inputs", "4", "coins.txt", "abc"]).is_err());
    }

    #[test]
    fn test_writes_witness_file() {
        let (dir, path) = setup_transcript("5\n7 11\n13 17\n");
        let config = config_in(&dir, 2);
        run(&config, &path, &FieldElement::from(7)).unwrap();

        let written = fs::read_to_string(&config.output).unwrap();
        assert!(written.ends_with("}\n"));
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["nullifier"], "7");
        assert_eq!(value["nonce"], "11");
        assert_eq!(value["sibling[0]"], "5");
        assert_eq!(value["direction[0]"], "1");
        assert_eq!(value["direction[1]"], "0");

        let c2 = compress2(FieldElement::from(13), FieldElement::from(17));
        assert_eq!(value["sibling[1]"], compress2(c2, FieldElement::zero()).to_string());
    }

    #[test]
    fn test_missing_nullifier_writes_nothing() {
        let (dir, path) = setup_transcript("5\n7 11\n");
        let config = config_in(&dir, 2);
        let err = run(&config, &path, &FieldElement::from(8)).unwrap_err();

        assert_eq!(
            err.downcast_ref::<WitnessError>(),
            Some(&WitnessError::TargetNotFound(FieldElement::from(8)))
        );
        assert!(!config.output.exists());
    }

    #[test]
    fn test_reports_bad_transcript() {
        let (dir, path) = setup_transcript("5\n7 11 13\n");
        let config = config_in(&dir, 2);
        let err = run(&config, &path, &FieldElement::from(7)).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }
}
