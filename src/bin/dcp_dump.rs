use anyhow::{Context, Result, bail, format_err};
use clap::{Arg, ArgAction, ArgMatches, Command};
use dialoguer::Confirm;
use log::Level;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use dcp::{Dcp, DcpParser, ParserSettings};

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DcpOutputFormat {
    Text,
    Json,
}

struct DcpDump {
    parser_settings: ParserSettings,
    input: PathBuf,
    output_format: DcpOutputFormat,
    indent: bool,
    list_files: bool,
    output: Box<dyn Write>,
    verbosity_level: Option<Level>,
}

impl DcpDump {
    pub fn from_cli_matches(matches: &ArgMatches) -> Result<Self> {
        let input = PathBuf::from(
            matches
                .get_one::<String>("INPUT")
                .expect("This is a required argument"),
        );

        let (output_format, indent) = match matches
            .get_one::<String>("output-format")
            .map(String::as_str)
        {
            Some("json") => (DcpOutputFormat::Json, true),
            Some("jsonl") => (DcpOutputFormat::Json, false),
            _ => (DcpOutputFormat::Text, true),
        };

        let verbosity_level = match matches.get_count("verbose") {
            0 => None,
            1 => Some(Level::Info),
            2 => Some(Level::Debug),
            3 => Some(Level::Trace),
            _ => {
                eprintln!("using more than  -vvv does not affect verbosity level");
                Some(Level::Trace)
            }
        };

        let output: Box<dyn Write> = if let Some(path) = matches.get_one::<String>("output-target")
        {
            Box::new(Self::create_output_file(
                path,
                !matches.get_flag("no-confirm-overwrite"),
            )?)
        } else {
            Box::new(io::stdout())
        };

        Ok(DcpDump {
            parser_settings: ParserSettings::new()
                .validate_sizes(!matches.get_flag("no-size-check"))
                .parse_documents(!matches.get_flag("no-parse-documents")),
            input,
            output_format,
            indent,
            list_files: matches.get_flag("list-files"),
            output,
            verbosity_level,
        })
    }

    /// Main entry point for `DcpDump`
    pub fn run(&mut self) -> Result<()> {
        self.try_to_initialize_logging();

        let dcp = DcpParser::from_path(&self.input)
            .with_configuration(self.parser_settings.clone())
            .parse()
            .with_context(|| format!("Failed to read package at {}", self.input.display()))?;

        match self.output_format {
            DcpOutputFormat::Text => self.dump_text(&dcp)?,
            DcpOutputFormat::Json => {
                if self.indent {
                    serde_json::to_writer_pretty(&mut self.output, &dcp)?;
                } else {
                    serde_json::to_writer(&mut self.output, &dcp)?;
                }
                writeln!(self.output)?;
            }
        }

        self.output.flush()?;
        Ok(())
    }

    fn dump_text(&mut self, dcp: &Dcp) -> Result<()> {
        write!(self.output, "{}", dcp)?;

        if self.list_files {
            writeln!(self.output, "Files:")?;
            writeln!(self.output, "  {}", dcp.asset_map_file())?;
            for file in dcp.files_with_types() {
                if file.guessed == file.detected {
                    writeln!(self.output, "  {} ({})", file.path, file.detected)?;
                } else {
                    writeln!(
                        self.output,
                        "  {} ({}, asset map says {})",
                        file.path, file.detected, file.guessed
                    )?;
                }
            }
        }

        Ok(())
    }

    /// If `prompt` is passed, will display a confirmation prompt before overwriting files.
    fn create_output_file(path: impl AsRef<Path>, prompt: bool) -> Result<File> {
        let p = path.as_ref();

        if p.is_dir() {
            bail!(
                "There is a directory at {}, refusing to overwrite",
                p.display()
            );
        }

        if p.exists() && prompt {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Are you sure you want to override output file at {}",
                    p.display()
                ))
                .default(false)
                .interact()
                .context("Failed to write confirmation prompt to term")?;

            if !confirmed {
                bail!("Cancelled");
            }
        }

        match p.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                fs::create_dir_all(parent)?
            }
            Some(_) => {}
            None => return Err(format_err!("Output file cannot be root.")),
        }

        Ok(File::create(p)?)
    }

    fn try_to_initialize_logging(&self) {
        if let Some(level) = self.verbosity_level {
            if let Err(e) = TermLogger::init(
                level.to_level_filter(),
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            ) {
                eprintln!("Failed to initialize logging: {}", e);
            }
        } else {
            log::set_max_level(LevelFilter::Off);
        }
    }
}

fn cli() -> Command {
    Command::new("DCP Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility to inspect Digital Cinema Packages")
        .arg(
            Arg::new("INPUT")
                .required(true)
                .help("Root directory of the package, containing the ASSETMAP"),
        )
        .arg(
            Arg::new("output-format")
                .short('o')
                .long("format")
                .value_parser(["text", "json", "jsonl"])
                .default_value("text")
                .help("Sets the output format")
                .long_help(
                    "Sets the output format:
    \"text\"  - a short summary of the package.
    \"json\"  - the whole package, pretty printed.
    \"jsonl\" - same as json, on a single line.",
                ),
        )
        .arg(
            Arg::new("output-target")
                .long("output")
                .short('f')
                .help("Writes output to the file specified instead of stdout, errors will still be printed to stderr. \
                       Will ask for confirmation before overwriting files, to allow overwriting, pass `--no-confirm-overwrite`. \
                       Will create parent directories if needed."),
        )
        .arg(
            Arg::new("no-confirm-overwrite")
                .long("no-confirm-overwrite")
                .action(ArgAction::SetTrue)
                .help("When set, will not ask for confirmation before overwriting files, useful for automation"),
        )
        .arg(
            Arg::new("no-size-check")
                .long("no-size-check")
                .action(ArgAction::SetTrue)
                .help("When set, files are not compared against the sizes declared in the asset map."),
        )
        .arg(
            Arg::new("no-parse-documents")
                .long("no-parse-documents")
                .action(ArgAction::SetTrue)
                .help("When set, CPL and PKL files are checked but not parsed."),
        )
        .arg(
            Arg::new("list-files")
                .long("list-files")
                .action(ArgAction::SetTrue)
                .help("With text output, also list every file and its detected type."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("-v - info, -vv - debug, -vvv - trace"),
        )
}

fn main() {
    let matches = cli().get_matches();

    let result = DcpDump::from_cli_matches(&matches).and_then(|mut app| app.run());

    if let Err(e) = result {
        eprintln!("{:?}", e);
        exit(1);
    }
}
