//! CLI command implementations

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::corpus::{ProbeConfig, ProbeGenerator};
use crate::dictionary::alphabet::{self, Word};
use crate::dictionary::double_array::DoubleArrayConfig;
use crate::dictionary::factory::{DictionaryBackend, DictionaryContainer, DictionaryFactory};
use crate::serialization::{
    BincodeSerializer, DictionarySerializer, GzipSerializer, JsonSerializer, PlainTextSerializer,
    WordList,
};

use super::args::{Commands, SerializationFormat};
use super::detect::{detect_by_extension, detect_format};
use super::paths::{config_file_path, PersistentConfig};

/// Execute a CLI command
pub fn execute(command: Commands, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Build {
            words,
            output,
            backend,
            format,
            max_words,
            reduce,
            growth_chunk,
            lookback,
            verbose,
        } => {
            let stored = PersistentConfig::load_from(config_path)?;
            let settings = stored.merge_with_cli(
                format,
                backend,
                growth_chunk,
                lookback,
                reduce.then_some(true),
            );
            cmd_build(
                &words,
                &output,
                backend,
                format,
                &settings,
                max_words,
                verbose,
            )
        }
        Commands::Lookup {
            dict,
            words,
            format,
        } => cmd_lookup(&dict, &words, format, config_path),
        Commands::Info { dict, format } => cmd_info(&dict, format, config_path),
        Commands::Dump {
            dict,
            start,
            count,
            format,
        } => cmd_dump(&dict, start, count, format, config_path),
        Commands::Probe {
            words,
            max_words,
            seed,
            count,
            verbose,
        } => cmd_probe(&words, max_words, seed, count, verbose),
        Commands::Config {
            show,
            set_format,
            set_backend,
            set_growth_chunk,
            set_lookback,
            reset,
        } => cmd_config(
            config_path,
            show,
            set_format,
            set_backend,
            set_growth_chunk,
            set_lookback,
            reset,
        ),
    }
}

/// Backend for `build`: an explicit `--backend` wins, otherwise reducing
/// selects the linked double array, otherwise the configured default.
pub fn resolve_backend(
    explicit: Option<DictionaryBackend>,
    settings: &PersistentConfig,
) -> DictionaryBackend {
    match explicit {
        Some(backend) => backend,
        None if settings.reduce == Some(true) => DictionaryBackend::Linked,
        None => settings.backend.unwrap_or_default(),
    }
}

/// Build command
fn cmd_build(
    words_path: &Path,
    output: &Path,
    explicit_backend: Option<DictionaryBackend>,
    explicit_format: Option<SerializationFormat>,
    settings: &PersistentConfig,
    max_words: Option<usize>,
    verbose: bool,
) -> Result<()> {
    let backend = resolve_backend(explicit_backend, settings);
    let format = output_format(explicit_format, output, settings);
    let config = settings.double_array_config();

    if settings.reduce == Some(true) && backend == DictionaryBackend::DoubleArray {
        eprintln!(
            "{}: the {} backend is never reduced; building it as is",
            "Warning".yellow().bold(),
            backend
        );
    }

    println!(
        "{} Reading {}",
        "→".cyan(),
        words_path.display().to_string().yellow()
    );
    let list = read_word_list(words_path, max_words)?;
    println!("  Read {} words", list.words.len().to_string().green());

    let started = Instant::now();
    let container = DictionaryFactory::from_words(backend, &list.words, config)
        .with_context(|| format!("Failed to build {} dictionary", backend))?;
    let elapsed = started.elapsed();

    println!(
        "{} Built {} dictionary: {} words, {} states",
        "→".cyan(),
        backend.to_string().green(),
        container.len().to_string().green(),
        container.num_states().to_string().green()
    );
    if verbose {
        print_stats(&container);
        println!("  Build time:  {:.3?}", elapsed);
    }

    save_dictionary(&container, output, format)?;
    println!(
        "{} Saved to {} ({})",
        "→".cyan(),
        output.display().to_string().yellow(),
        format.to_string().green()
    );

    Ok(())
}

/// Output format for `build`: `--format`, then the output extension, then
/// the configured default.
pub fn output_format(
    explicit: Option<SerializationFormat>,
    output: &Path,
    settings: &PersistentConfig,
) -> SerializationFormat {
    explicit
        .or_else(|| detect_by_extension(output))
        .or(settings.format)
        .unwrap_or(SerializationFormat::Bincode)
}

/// Lookup command
fn cmd_lookup(
    dict_path: &Path,
    words: &[String],
    format: Option<SerializationFormat>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let container = load_with_config(dict_path, format, config_path)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for term in words {
        match alphabet::encode(term) {
            Ok(word) => writeln!(out, "{}\t{}", term, container.lookup(&word))?,
            Err(e) => eprintln!("{}: {}", "Warning".yellow().bold(), e),
        }
    }

    Ok(())
}

/// Info command
fn cmd_info(
    dict_path: &Path,
    format: Option<SerializationFormat>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let detection = detect_format(dict_path, format)?;

    println!("{}", "Dictionary Information".bold().underline());
    println!();
    println!("  Path:    {}", dict_path.display().to_string().cyan());
    println!(
        "  Format:  {} (detected via {})",
        detection.format.to_string().green(),
        detection.method.to_string().yellow()
    );

    let container = load_with_config(dict_path, Some(detection.format), config_path)?;
    println!("  Backend: {}", container.backend().to_string().green());
    print_stats(&container);
    println!();

    Ok(())
}

fn print_stats(container: &DictionaryContainer) {
    println!("  Words:   {}", container.len().to_string().green());
    println!("  States:  {}", container.num_states().to_string().green());
    println!("  Bytes:   {}", container.memory_bytes().to_string().green());

    match container {
        DictionaryContainer::DoubleArray(d) => {
            let stats = d.stats();
            println!("  Slots:   {}", stats.slots.to_string().green());
            println!("  Fill:    {:.1}%", stats.fill_ratio() * 100.0);
        }
        DictionaryContainer::Linked(d) => {
            println!("  Slots:   {}", d.num_slots().to_string().green());
        }
        DictionaryContainer::Flat(_) => {}
    }
}

/// Dump command
fn cmd_dump(
    dict_path: &Path,
    start: usize,
    count: Option<usize>,
    format: Option<SerializationFormat>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let container = load_with_config(dict_path, format, config_path)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &container {
        DictionaryContainer::DoubleArray(d) => {
            let end = count.map_or(usize::MAX, |n| start.saturating_add(n));
            write!(out, "{}", d.store().dump_range(start..end))?;
        }
        other => {
            let dump = other.dump();
            for line in dump.lines().skip(start).take(count.unwrap_or(usize::MAX)) {
                writeln!(out, "{}", line)?;
            }
        }
    }

    Ok(())
}

/// Probe command
fn cmd_probe(
    words_path: &Path,
    max_words: Option<usize>,
    seed: Option<u64>,
    count: usize,
    verbose: bool,
) -> Result<()> {
    let list = read_word_list(words_path, max_words)?;
    let seed = seed.unwrap_or_else(rand::random);
    let probes = ProbeConfig::default().with_random_probes(count);
    println!(
        "{} Probing {} words (seed {})",
        "→".cyan(),
        list.words.len().to_string().green(),
        seed.to_string().yellow()
    );

    let mut failed = false;
    for backend in [
        DictionaryBackend::DoubleArray,
        DictionaryBackend::Linked,
        DictionaryBackend::Flat,
    ] {
        let container = match DictionaryFactory::from_words(
            backend,
            &list.words,
            DoubleArrayConfig::default(),
        ) {
            Ok(container) => container,
            Err(e) => {
                eprintln!("  {}: {}: {}", "Skipped".yellow(), backend, e);
                continue;
            }
        };

        let mut generator = ProbeGenerator::new(seed);
        let report = match &container {
            DictionaryContainer::DoubleArray(d) => generator.run(d, &list.words, &probes),
            DictionaryContainer::Linked(d) => generator.run(d, &list.words, &probes),
            DictionaryContainer::Flat(d) => generator.run(d, &list.words, &probes),
        };

        if verbose {
            for failure in &report.failures {
                println!(
                    "  FAILURE: word={} expect={} actual={}",
                    failure.word, failure.expected, failure.actual
                );
            }
        }
        let status = if report.is_success() {
            "PASSED".green().bold()
        } else {
            failed = true;
            "FAILED".red().bold()
        };
        println!(
            "  {:<7} pass = {}; fail = {}; test = {}  {}",
            backend.to_string(),
            report.passed,
            report.failures.len(),
            report.total(),
            status
        );
    }

    if failed {
        anyhow::bail!("dictionary disagreed with the word list");
    }
    Ok(())
}

/// Config command
fn cmd_config(
    config_path: Option<PathBuf>,
    show: bool,
    set_format: Option<SerializationFormat>,
    set_backend: Option<DictionaryBackend>,
    set_growth_chunk: Option<usize>,
    set_lookback: Option<usize>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = PersistentConfig::default();
        let path = config.save_to(config_path)?;
        println!("{}", "Configuration reset to defaults".green().bold());
        println!();
        print_config(&config, &path);
        return Ok(());
    }

    let mut config = PersistentConfig::load_from(config_path.clone())?;
    let mut changed = false;

    if let Some(format) = set_format {
        config.format = Some(format);
        println!("  Set default format: {}", format.to_string().green());
        changed = true;
    }
    if let Some(backend) = set_backend {
        config.backend = Some(backend);
        println!("  Set default backend: {}", backend.to_string().green());
        changed = true;
    }
    if let Some(chunk) = set_growth_chunk {
        config.growth_chunk = Some(chunk);
        println!("  Set default growth chunk: {}", chunk.to_string().green());
        changed = true;
    }
    if let Some(lookback) = set_lookback {
        config.lookback = Some(lookback);
        println!("  Set default lookback: {}", lookback.to_string().green());
        changed = true;
    }

    if changed {
        let path = config.save_to(config_path)?;
        println!("{}", "Configuration saved".green().bold());
        if show {
            println!();
            print_config(&config, &path);
        }
    } else {
        print_config(&config, &config_file_path(config_path)?);
    }

    Ok(())
}

fn print_config(config: &PersistentConfig, path: &Path) {
    let defaults = DoubleArrayConfig::default();
    println!("{}", "Current Configuration:".bold().underline());
    println!("  File:          {}", path.display().to_string().cyan());
    println!(
        "  Format:        {}",
        config
            .format
            .unwrap_or(SerializationFormat::Bincode)
            .to_string()
            .yellow()
    );
    println!(
        "  Backend:       {}",
        config.backend.unwrap_or_default().to_string().yellow()
    );
    println!(
        "  Growth chunk:  {}",
        config
            .growth_chunk
            .unwrap_or(defaults.growth_chunk)
            .to_string()
            .yellow()
    );
    println!(
        "  Lookback:      {}",
        config
            .lookback
            .unwrap_or(defaults.lookback)
            .to_string()
            .yellow()
    );
    println!(
        "  Reduce:        {}",
        if config.reduce == Some(true) {
            "enabled".green()
        } else {
            "disabled".red()
        }
    );
}

/// Read a word list, warning about every skipped line
pub fn read_word_list(path: &Path, max_words: Option<usize>) -> Result<WordList> {
    let file =
        File::open(path).with_context(|| format!("Failed to open word list: {}", path.display()))?;
    let list = PlainTextSerializer::read_words(file, max_words)
        .with_context(|| format!("Failed to read word list: {}", path.display()))?;
    for rejected in &list.rejected {
        eprintln!(
            "{}: line {}: skipping {}",
            "Warning".yellow(),
            rejected.line,
            rejected.error
        );
    }
    Ok(list)
}

fn load_with_config(
    path: &Path,
    format: Option<SerializationFormat>,
    config_path: Option<PathBuf>,
) -> Result<DictionaryContainer> {
    let detection = detect_format(path, format)?;
    if detection.format.is_structural() {
        return load_dictionary(path, detection.format, DictionaryBackend::default());
    }
    let settings = PersistentConfig::load_from(config_path)?;
    load_dictionary(
        path,
        detection.format,
        resolve_backend(None, &settings),
    )
}

/// Load a dictionary
///
/// Structural formats carry their own backend; `backend` is used only to
/// build from a plain word list.
pub fn load_dictionary(
    path: &Path,
    format: SerializationFormat,
    backend: DictionaryBackend,
) -> Result<DictionaryContainer> {
    let file =
        File::open(path).with_context(|| format!("Failed to open dictionary: {}", path.display()))?;

    let container = match format {
        SerializationFormat::Text => {
            let words: Vec<Word> = PlainTextSerializer::read_words_strict(file)
                .with_context(|| format!("Failed to read word list: {}", path.display()))?;
            DictionaryFactory::from_words(backend, &words, DoubleArrayConfig::default())
                .with_context(|| format!("Failed to build {} dictionary", backend))?
        }
        SerializationFormat::Bincode => BincodeSerializer::deserialize(file)
            .with_context(|| format!("Failed to deserialize bincode from: {}", path.display()))?,
        SerializationFormat::Json => JsonSerializer::deserialize(file)
            .with_context(|| format!("Failed to deserialize JSON from: {}", path.display()))?,
        SerializationFormat::BincodeGzip => GzipSerializer::<BincodeSerializer>::deserialize(file)
            .with_context(|| {
                format!("Failed to deserialize gzipped bincode from: {}", path.display())
            })?,
        SerializationFormat::JsonGzip => GzipSerializer::<JsonSerializer>::deserialize(file)
            .with_context(|| {
                format!("Failed to deserialize gzipped JSON from: {}", path.display())
            })?,
    };

    Ok(container)
}

/// Save a dictionary
pub fn save_dictionary(
    container: &DictionaryContainer,
    path: &Path,
    format: SerializationFormat,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let written = match format {
        SerializationFormat::Text => match container {
            DictionaryContainer::DoubleArray(d) => PlainTextSerializer::serialize(d, &mut writer),
            DictionaryContainer::Linked(d) => PlainTextSerializer::serialize(d, &mut writer),
            DictionaryContainer::Flat(d) => PlainTextSerializer::serialize(d, &mut writer),
        },
        SerializationFormat::Bincode => BincodeSerializer::serialize(container, &mut writer),
        SerializationFormat::Json => JsonSerializer::serialize(container, &mut writer),
        SerializationFormat::BincodeGzip => {
            GzipSerializer::<BincodeSerializer>::serialize(container, &mut writer)
        }
        SerializationFormat::JsonGzip => {
            GzipSerializer::<JsonSerializer>::serialize(container, &mut writer)
        }
    };
    written.with_context(|| format!("Failed to write {} to: {}", format, path.display()))?;

    writer
        .flush()
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_resolution() {
        let settings = PersistentConfig::default();
        assert_eq!(resolve_backend(None, &settings), DictionaryBackend::DoubleArray);

        let reducing = settings.merge_with_cli(None, None, None, None, Some(true));
        assert_eq!(resolve_backend(None, &reducing), DictionaryBackend::Linked);
        assert_eq!(
            resolve_backend(Some(DictionaryBackend::Flat), &reducing),
            DictionaryBackend::Flat
        );
    }

    #[test]
    fn test_output_format_choice() {
        let settings = PersistentConfig::default();
        let out = Path::new("dict.json.gz");
        assert_eq!(
            output_format(None, out, &settings),
            SerializationFormat::JsonGzip
        );
        assert_eq!(
            output_format(Some(SerializationFormat::Text), out, &settings),
            SerializationFormat::Text
        );
        let json = settings.merge_with_cli(Some(SerializationFormat::Json), None, None, None, None);
        assert_eq!(
            output_format(None, Path::new("dict"), &json),
            SerializationFormat::Json
        );
    }
}
