use std::path::{Path, PathBuf};

use api_shared::ParseInputRes;
use clap::{Parser, Subcommand};
use symptom_core::config::vocabulary_from_env_value;
use symptom_core::{extract_symptoms, Doc, InputText, OutputMode, SymptomEngine};
use symptom_parser::{parser_config_from_env_values, RemoteParser};

#[derive(Parser)]
#[command(name = "symptom")]
#[command(about = "Symptom extraction CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse free text with the parser sidecar and print the symptoms found
    Parse {
        /// Text describing how you feel
        text: String,
        /// Print every mention with tense and negation
        #[arg(long)]
        detailed: bool,
    },
    /// Resolve symptoms from a saved parser payload, without contacting the sidecar
    Resolve {
        /// Path to a spaCy `Doc.to_json()` file
        #[arg(long)]
        doc: PathBuf,
        /// Print every mention with tense and negation
        #[arg(long)]
        detailed: bool,
    },
    /// Check the parser sidecar is reachable, acquiring the model if needed
    CheckParser,
}

fn output_mode(detailed: bool) -> OutputMode {
    if detailed {
        OutputMode::Detailed
    } else {
        OutputMode::Summary
    }
}

/// Engine using `SYMPTOM_VOCABULARY` (or the built-in list) and the requested output mode.
fn engine(detailed: bool) -> Result<SymptomEngine, Box<dyn std::error::Error>> {
    let vocabulary = vocabulary_from_env_value(std::env::var("SYMPTOM_VOCABULARY").ok())?;
    Ok(SymptomEngine::with_vocabulary(&vocabulary, output_mode(detailed)))
}

fn remote_parser() -> Result<RemoteParser, Box<dyn std::error::Error>> {
    let cfg = parser_config_from_env_values(
        std::env::var("PARSER_URL").ok(),
        std::env::var("PARSER_MODEL").ok(),
        std::env::var("PARSER_TIMEOUT_SECS").ok(),
    )?;
    Ok(RemoteParser::new(&cfg)?)
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

fn resolve_file(
    path: &Path,
    engine: &SymptomEngine,
) -> Result<ParseInputRes, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("reading {}: {}", path.display(), e))?;
    let doc = Doc::from_json(&json)?;
    Ok(engine.evaluate(&doc).into())
}

/// Run the startup availability check and describe the parser that answered.
fn check_parser(parser: &RemoteParser) -> Result<String, Box<dyn std::error::Error>> {
    runtime()?.block_on(parser.ensure_available())?;
    Ok(format!(
        "Parser available at {} with model {}",
        parser.base_url(),
        parser.model()
    ))
}

fn print_json(res: &ParseInputRes) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(res)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Parse { text, detailed }) => {
            let input = InputText::new(text)?;
            let engine = engine(detailed)?;
            let parser = remote_parser()?;
            let output = runtime()?.block_on(extract_symptoms(&parser, &engine, &input))?;
            print_json(&output.into())?;
        }
        Some(Commands::Resolve { doc, detailed }) => {
            let engine = engine(detailed)?;
            print_json(&resolve_file(&doc, &engine)?)?;
        }
        Some(Commands::CheckParser) => {
            let parser = remote_parser()?;
            println!("{}", check_parser(&parser)?);
        }
        None => {
            println!("Use 'symptom --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const HEADACHE_DOC: &str = r#"{
        "text": "i have a headache",
        "tokens": [
            {"id": 0, "start": 0, "end": 1, "tag": "PRP", "pos": "PRON", "dep": "nsubj", "head": 1},
            {"id": 1, "start": 2, "end": 6, "tag": "VBP", "pos": "VERB", "dep": "ROOT", "head": 1},
            {"id": 2, "start": 7, "end": 8, "tag": "DT", "pos": "DET", "dep": "det", "head": 3},
            {"id": 3, "start": 9, "end": 17, "tag": "NN", "pos": "NOUN", "dep": "dobj", "head": 1}
        ]
    }"#;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn resolve_reads_a_saved_parse() {
        let path = std::env::temp_dir().join(format!("symptom-cli-{}.json", std::process::id()));
        std::fs::write(&path, HEADACHE_DOC).unwrap();

        let engine = SymptomEngine::with_vocabulary(&Default::default(), output_mode(false));
        let res = resolve_file(&path, &engine).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            serde_json::json!({"symptoms": ["headache"]})
        );
    }

    #[test]
    fn resolve_rejects_missing_file() {
        let engine = SymptomEngine::with_vocabulary(&Default::default(), OutputMode::Summary);
        let err = resolve_file(Path::new("/nonexistent/doc.json"), &engine)
            .expect_err("file does not exist");
        assert!(err.to_string().contains("/nonexistent/doc.json"));
    }

    #[test]
    fn check_parser_fails_when_nothing_answers() {
        let parser = RemoteParser::new(&symptom_parser::ParserConfig {
            base_url: "http://127.0.0.1:9".into(),
            model: "en_core_web_sm".into(),
            timeout: std::time::Duration::from_secs(1),
        })
        .unwrap();
        let err = check_parser(&parser).expect_err("nothing listens on the discard port");
        assert!(err.to_string().contains("en_core_web_sm"));
    }
}
