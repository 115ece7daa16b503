mod logger;
mod report;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use logger::StderrLogger;
use pictureshow::{BatchResult, PdfBackend, PictureShow, PictureShowError, SaveOptions, Step};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "pictureshow",
    about = "Save pictures to PDF.",
    version,
    override_usage = "pictureshow [OPTIONS] -o <PATH> <PICTURE>..."
)]
struct Cli {
    /// One or more input file paths
    #[arg(required = true, value_name = "PICTURE")]
    pictures: Vec<PathBuf>,

    /// Do not print output to stdout
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show details of input files skipped due to error
    #[arg(short, long)]
    verbose: bool,

    /// Control the exit code
    #[arg(short = 'F', long, value_enum, default_value = "no-output", value_name = "MODE")]
    fail: FailMode,

    /// Log level for diagnostics on stderr (overrides --quiet and --verbose)
    #[arg(long, value_enum)]
    log_level: Option<LogLevelArg>,

    /// Load save options from a JSON file; flags given here take precedence
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Path of the output PDF file
    #[arg(short, long = "output-file", value_name = "PATH", help_heading = "Output file")]
    output: PathBuf,

    /// Save to output file path even if file exists
    #[arg(short, long, help_heading = "Output file")]
    force_overwrite: bool,

    /// Page size name [default: A4]
    #[arg(short, long, value_name = "SIZE", help_heading = "Page properties")]
    page_size: Option<String>,

    /// Set landscape orientation of pages
    #[arg(short = 'L', long, help_heading = "Page properties")]
    landscape: bool,

    /// Page background color as 6-digit hexadecimal RGB, e.g. ff8c00
    #[arg(short, long, value_name = "COLOR", help_heading = "Page properties")]
    bg_color: Option<String>,

    /// Grid layout (columns x rows) of pictures on page, e.g. 2x3 or 2,3 [default: 1x1]
    #[arg(short, long, help_heading = "Picture layout")]
    layout: Option<String>,

    /// Width of empty space around the cells, in points (72 points = 1 inch) [default: 72]
    #[arg(short, long, allow_negative_numbers = true, help_heading = "Picture layout")]
    margin: Option<f32>,

    /// Scale small pictures up to fit cells
    #[arg(short, long, help_heading = "Picture layout")]
    stretch_small: bool,

    /// Fill cells with pictures, ignoring the pictures' aspect ratio
    #[arg(short = 'c', long, help_heading = "Picture layout")]
    fill_cell: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FailMode {
    /// Exit with code 2 if at least one input file was skipped
    Skipped,
    /// Exit with code 2 if no picture was saved
    NoOutput,
    /// Always exit with code 0
    No,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Off => Self::Off,
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
            LogLevelArg::Trace => Self::Trace,
        }
    }
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.log_level {
            Some(level) => level.into(),
            None if self.quiet => LevelFilter::Error,
            None if self.verbose => LevelFilter::Debug,
            None => LevelFilter::Warn,
        }
    }

    /// Start from the config file (or defaults) and apply the given flags.
    async fn save_options(&self) -> Result<SaveOptions> {
        let mut options = match &self.config {
            Some(path) => SaveOptions::load(path).await?,
            None => SaveOptions::default(),
        };

        if let Some(page_size) = &self.page_size {
            options.page_size = page_size.as_str().into();
        }
        if let Some(layout) = &self.layout {
            options.layout = layout.as_str().into();
        }
        if let Some(margin) = self.margin {
            options.margin = margin;
        }
        if self.bg_color.is_some() {
            options.bg_color = self.bg_color.clone();
        }
        options.force_overwrite |= self.force_overwrite;
        options.landscape |= self.landscape;
        options.stretch_small |= self.stretch_small;
        options.fill_cell |= self.fill_cell;

        Ok(options)
    }
}

impl FailMode {
    /// Exit code for a run that finished without a fatal error
    fn exit_code(self, result: &BatchResult) -> u8 {
        let failed = match self {
            FailMode::Skipped => !result.errors.is_empty(),
            FailMode::NoOutput => result.num_ok == 0,
            FailMode::No => false,
        };
        if failed {
            2
        } else {
            0
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = StderrLogger::new(cli.log_level()).init() {
        eprintln!("pictureshow: cannot install logger: {err}");
    }

    let out: Box<dyn Write + Send> = if cli.quiet {
        Box::new(std::io::sink())
    } else {
        Box::new(std::io::stdout())
    };
    ExitCode::from(execute(&cli, out, report::error_log_path()).await)
}

/// Run the command, printing errors to stderr; returns the exit code.
async fn execute<W>(cli: &Cli, out: W, error_log: Option<PathBuf>) -> u8
where
    W: Write + Send + 'static,
{
    match run(cli, out, error_log).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("pictureshow: error: {}", describe(&err));
            2
        }
    }
}

async fn run<W>(cli: &Cli, out: W, error_log: Option<PathBuf>) -> Result<u8>
where
    W: Write + Send + 'static,
{
    let options = cli.save_options().await?;
    let output = report::ensure_suffix(cli.output.clone());
    let show = PictureShow::new(cli.pictures.clone());

    // Progress is printed per step, so the run stays on one blocking thread
    let (result, mut out) = tokio::task::spawn_blocking({
        let output = output.clone();
        let mut out = out;
        move || -> pictureshow::Result<_> {
            let result = save_with_progress(&show, &output, &options, &mut out)?;
            Ok((result, out))
        }
    })
    .await??;

    if !result.errors.is_empty() {
        match error_log {
            Some(log_path) => report::write_error_log(&log_path, &result)?,
            None => log::warn!("No cache directory available, error log not written"),
        }
    }
    report::write_summary(&mut out, &result, &output, cli.verbose)?;
    out.flush()?;

    Ok(cli.fail.exit_code(&result))
}

/// Save to PDF, writing `.` per placed picture and `!` per skipped input.
fn save_with_progress(
    show: &PictureShow,
    output: &Path,
    options: &SaveOptions,
    out: &mut impl Write,
) -> pictureshow::Result<BatchResult> {
    let mut pagination = show.paginate(PdfBackend::new(), output, options)?;
    loop {
        let mark = match pagination.step()? {
            Step::Placed { .. } => '.',
            Step::Skipped => '!',
            Step::Done => break,
        };
        write!(out, "{mark}")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(pagination.into_result())
}

/// `Kind: message` for library errors, the context chain otherwise.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PictureShowError>() {
        Some(err) => format!("{}: {}", err.kind(), err),
        None => format!("{err:#}"),
    }
}
