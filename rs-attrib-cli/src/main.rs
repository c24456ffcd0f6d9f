use std::path::PathBuf;

use clap::Parser;

use rs_attrib_core::io::read_text;
use rs_attrib_core::model::identifier::identify_speaker;

/// Decide which of two known speakers more plausibly produced an unknown passage.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// File holding reference text from speaker A
    speaker_a: PathBuf,

    /// File holding reference text from speaker B
    speaker_b: PathBuf,

    /// File holding the passage to attribute
    unknown: PathBuf,

    /// Order of the character models (context length)
    #[arg(short = 'k', long, default_value_t = 2)]
    order: usize,

    /// Print the result as JSON instead of plain lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let speaker_a = read_text(&args.speaker_a)?;
    let speaker_b = read_text(&args.speaker_b)?;
    let unknown = read_text(&args.unknown)?;

    let identification = identify_speaker(&speaker_a, &speaker_b, &unknown, args.order)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&identification)?);
    } else {
        println!("Speaker A: {:.6}", identification.probability_a);
        println!("Speaker B: {:.6}", identification.probability_b);
        println!("Verdict: speaker {}", identification.verdict);
    }

    Ok(())
}
