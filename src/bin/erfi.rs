//! erfi CLI: XML -> Fast Infoset conversion.

#[cfg(feature = "fast-alloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Args, Parser, Subcommand};
use erfi::{EncoderConfig, SerializerOptions};
use std::io::{IsTerminal, Write};
use std::process;

#[derive(Parser)]
#[command(name = "erfi", about = "XML -> Fast Infoset (X.891) conversion")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode XML to Fast Infoset
    Encode(EncodeArgs),
}

#[derive(Args)]
struct EncodeArgs {
    /// Input file (- for stdin)
    #[arg(short, long)]
    input: String,

    /// Output file (optional; without -o auto-derived, -o - = stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Drop comments
    #[arg(long)]
    ignore_comments: bool,

    /// Drop processing instructions
    #[arg(long)]
    ignore_pis: bool,

    /// Drop whitespace-only text
    #[arg(long)]
    ignore_whitespace: bool,

    /// Prefix output with <?xml encoding='finf'?>
    #[arg(long)]
    xml_declaration: bool,

    /// Maximum attribute value length (characters) for the vocabulary
    #[arg(long, value_name = "N")]
    max_attribute_value_size: Option<usize>,

    /// Maximum character chunk length (characters) for the vocabulary
    #[arg(long, value_name = "N")]
    max_chunk_size: Option<usize>,
}

impl EncodeArgs {
    fn to_options(&self) -> SerializerOptions {
        let mut opts = SerializerOptions::default();
        opts.set_ignore_comments(self.ignore_comments);
        opts.set_ignore_processing_instructions(self.ignore_pis);
        opts.set_ignore_whitespace_text(self.ignore_whitespace);
        if let Some(n) = self.max_attribute_value_size {
            opts.set_max_attribute_value_size(n);
        }
        if let Some(n) = self.max_chunk_size {
            opts.set_max_character_content_chunk_size(n);
        }
        opts
    }

    fn to_config(&self) -> EncoderConfig {
        EncoderConfig { xml_declaration: self.xml_declaration }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Fehler: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Encode(args) => run_encode(args),
    }
}

fn run_encode(args: EncodeArgs) -> Result<(), String> {
    let opts = args.to_options();
    opts.validate()
        .map_err(|e| format!("Ungueltige Optionen: {e}"))?;
    let config = args.to_config();

    let output_path = resolve_output_path(args.output.as_deref(), &args.input, "finf")?;
    let to_stdout = output_path == "-";
    let tmp_path = if to_stdout { None } else { Some(format!("{output_path}.tmp")) };
    // Pfad fuer BufWriter: tmp-Datei oder stdout ("-")
    let writer_target = tmp_path.as_deref().unwrap_or("-");

    let result = if args.input == "-" {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            eprintln!("Lese von stdin (Ctrl+D zum Beenden)...");
        }
        erfi::encode_xml_stream_with_config(
            stdin.lock(),
            create_buf_writer(writer_target)?,
            &opts,
            config,
        )
    } else {
        let file = std::fs::File::open(&args.input)
            .map_err(|e| format!("Lesefehler '{}': {e}", args.input))?;
        erfi::encode_xml_stream_with_config(file, create_buf_writer(writer_target)?, &opts, config)
    };
    finish_tmp_output(
        result.map_err(|e| format!("Encode-Fehler: {e}")),
        tmp_path.as_deref(),
        &output_path,
    )
}

/// Erstellt einen BufWriter fuer stdout oder eine Datei.
fn create_buf_writer(path: &str) -> Result<std::io::BufWriter<Box<dyn Write>>, String> {
    if path == "-" {
        Ok(std::io::BufWriter::new(Box::new(std::io::stdout())))
    } else {
        let file = std::fs::File::create(path)
            .map_err(|e| format!("Schreibfehler: {e}"))?;
        Ok(std::io::BufWriter::new(Box::new(file)))
    }
}

/// Bei Erfolg: tmp-Datei auf Ziel umbenennen. Bei Fehler: tmp-Datei loeschen.
/// Fuer stdout-Output (tmp_path=None) wird nur der Result durchgereicht.
fn finish_tmp_output(
    result: Result<(), String>,
    tmp_path: Option<&str>,
    output_path: &str,
) -> Result<(), String> {
    match (&result, tmp_path) {
        (Ok(()), Some(tmp)) => {
            std::fs::rename(tmp, output_path)
                .map_err(|e| format!("Rename-Fehler: {e}"))
        }
        (Err(_), Some(tmp)) => {
            let _ = std::fs::remove_file(tmp);
            result
        }
        _ => result,
    }
}

/// Leitet den Output-Pfad aus der Eingabe und der gewuenschten Extension ab.
///
/// Bei explizitem `-o` wird dieser Pfad direkt verwendet. Ohne `-o` wird
/// die Extension der Eingabedatei ersetzt (bzw. angehaengt wenn keine vorhanden).
fn resolve_output_path(explicit: Option<&str>, input: &str, ext: &str) -> Result<String, String> {
    if let Some(path) = explicit {
        return Ok(path.to_string());
    }
    if input == "-" {
        return Err("ohne -o braucht es eine Eingabedatei (nicht stdin)".into());
    }
    let path = std::path::Path::new(input);
    let stem = path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| "ungueltiger Eingabepfad".to_string())?;
    let parent = path.parent().unwrap_or_else(|| std::path::Path::new(""));
    Ok(parent.join(format!("{stem}.{ext}")).to_string_lossy().to_string())
}
