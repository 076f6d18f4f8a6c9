use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use odata_uri_writer::cli::{self, CliError, KeyStyle, TranslateOptions, TranslateResult};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "odata-uri")]
#[command(about = "Write OData request URIs from bound query tree documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a tree document into a request URI
    Translate {
        /// Tree document as JSON (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Service root that entity sets are resolved against
        #[arg(short, long, default_value = "http://localhost/service")]
        base: String,

        /// Key predicate style
        #[arg(long, value_enum, default_value_t = KeyStyleArg::Parens)]
        key_style: KeyStyleArg,

        /// Print a JSON object instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Only check that a tree document is well formed
    Check {
        /// Tree document as JSON (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KeyStyleArg {
    Parens,
    Slash,
}

impl From<KeyStyleArg> for KeyStyle {
    fn from(arg: KeyStyleArg) -> Self {
        match arg {
            KeyStyleArg::Parens => KeyStyle::Parens,
            KeyStyleArg::Slash => KeyStyle::Slash,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Translate {
            input,
            base,
            key_style,
            json,
        } => run_translate(input, base, key_style.into(), false, json),
        Commands::Check { input } => {
            run_translate(input, String::new(), KeyStyle::default(), true, false)
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_translate(
    input: Option<String>,
    base_uri: String,
    key_style: KeyStyle,
    check_only: bool,
    json: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    let options = TranslateOptions {
        input,
        base_uri,
        key_style,
        check_only,
    };

    match cli::execute_translate(&options)? {
        TranslateResult::TreeValid => println!("Tree document is valid"),
        TranslateResult::Success(translation) if json => {
            let output = serde_json::json!({
                "uri": translation.uri,
                "version": translation.version.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        TranslateResult::Success(translation) => {
            println!("{}", translation.uri);
            println!("OData-Version: {}", translation.version);
        }
    }
    Ok(())
}
