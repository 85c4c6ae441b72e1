use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use goldens::constants::bundles::{DEFAULT_DATA_DIR, DEFAULT_REGISTRY_FILE};
use goldens::constants::spectral::DEFAULT_SEED;
use goldens::{
    GeneratorConfig, HubConfigProvider, HubTokenizerProvider, OraclePipeline, RustFftTransform,
    SubjectRegistry,
};

#[derive(Debug, Parser)]
#[command(
    name = "generate_goldens",
    disable_help_subcommand = true,
    about = "Generate golden test bundles from canonical sources",
    long_about = "Drive every registry subject through its canonical tokenizer and configuration, capture deterministic spectral transforms, and write the three JSON bundles consumed by downstream parity tests.",
    after_help = "Remote artifacts are fetched through the Hugging Face hub cache; set HF_HOME to relocate it."
)]
struct GenerateGoldensCli {
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_REGISTRY_FILE,
        help = "Subject registry document (category -> task -> identifiers)"
    )]
    registry: PathBuf,
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = DEFAULT_DATA_DIR,
        help = "Directory receiving the bundle files"
    )]
    data_dir: PathBuf,
    #[arg(
        long,
        default_value_t = DEFAULT_SEED,
        help = "Deterministic seed for spectral input streams"
    )]
    seed: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cli = GenerateGoldensCli::parse();

    let registry = SubjectRegistry::from_json_file(&cli.registry)?;
    let config = GeneratorConfig {
        data_dir: cli.data_dir,
        spectral_seed: cli.seed,
        ..GeneratorConfig::default()
    };

    let mut pipeline = OraclePipeline::new(registry, config);
    pipeline.register_tokenizer_provider(Box::new(HubTokenizerProvider::new()));
    pipeline.register_config_provider(Box::new(HubConfigProvider::new()));
    pipeline.register_transform(Box::new(RustFftTransform::new()));

    let summary = pipeline.run()?;

    println!("=== golden bundles ===");
    println!(
        "tokenizer subjects : {} written, {} not applicable, {} load failed, {} empty, {} texts skipped",
        summary.tokenizer.subjects_written,
        summary.tokenizer.subjects_not_applicable,
        summary.tokenizer.subjects_load_failed,
        summary.tokenizer.subjects_empty,
        summary.tokenizer.texts_skipped
    );
    println!(
        "config subjects    : {} written, {} not applicable, {} load failed",
        summary.config.subjects_written,
        summary.config.subjects_not_applicable,
        summary.config.subjects_load_failed
    );
    println!("spectral cases     : {}", summary.spectral_cases);
    for path in &summary.written {
        println!("wrote {}", path.display());
    }
    for (bundle, err) in &summary.write_failures {
        eprintln!("failed writing {bundle}: {err}");
    }
    if let Some((_, err)) = summary.write_failures.into_iter().next() {
        return Err(err.into());
    }
    Ok(())
}
