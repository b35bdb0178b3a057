use clap::{Args, Parser, Subcommand, ValueEnum};
use photo_lab::capture::{CaptureDevice, Disconnected, FrameDirectory, FrameSink, TestPattern};
use photo_lab::config::{self, BoothConfig};
use photo_lab::imaging::{self, Effect, FilterKind, FilterSet, Image, Intensity};
use photo_lab::manager::PhotoManager;
use photo_lab::output;
use photo_lab::session::Session;
use std::error::Error;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("PHOTO_LAB_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("PHOTO_LAB_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "photo-lab")]
#[command(about = "Headless photo booth: capture, keep and filter photos")]
#[command(long_about = "\
Headless photo booth: capture, keep and filter photos

The library directory holds captured photos and the photo list:

  photos/
  ├── config.toml      # Optional settings (see 'photo-lab gen-config')
  ├── library.json     # Photo list: order and origin of every photo
  ├── photo_0.jpg      # Captured photos, named by list position
  └── photo_1.jpg

Imported photos stay where they are; the list only points at them.
Deleting a captured photo removes its file, deleting an imported one does not.

Photos are addressed by their position in 'photo-lab list', starting at 1.

Filters always run in this order, whatever order the flags are given in:
  grayscale → blur → brightness → contrast → sharpen → saturation
Intensities are clamped to 1-10.

Set PHOTO_LAB_LOG (e.g. PHOTO_LAB_LOG=debug) to control logging.")]
#[command(version = version_string())]
struct Cli {
    /// Library directory
    #[arg(long, default_value = "photos", global = true)]
    library: PathBuf,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List photos in library order
    List,
    /// Add existing image files (or every image in a directory) without copying
    Import {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Copy a photo's file to a destination
    Export {
        #[arg(value_parser = parse_position)]
        position: usize,
        dest: PathBuf,
    },
    /// Remove a photo from the list (and from disk if it was captured)
    Delete {
        #[arg(value_parser = parse_position)]
        position: usize,
    },
    /// Decode a photo and optionally write a preview fitted to the display box
    Show {
        #[arg(value_parser = parse_position)]
        position: usize,
        /// Preview file (.jpg or .png)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Stream frames for a while, then capture one
    Capture(CaptureArgs),
    /// Run filters and effects over a photo and write the result
    Apply(ApplyArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Args)]
struct CaptureArgs {
    /// Replay the images in this directory as camera frames (default: test pattern)
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Live ticks before capturing
    #[arg(long, default_value_t = 10)]
    ticks: usize,

    /// Discard the captured frame instead of saving it
    #[arg(long)]
    discard: bool,

    /// Write the last displayed frame here (.jpg or .png)
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Args)]
struct ApplyArgs {
    /// Image file, or #N for photo N of the library
    #[arg(value_parser = parse_input)]
    input: Input,

    /// Output file (.jpg or .png)
    output: PathBuf,

    /// Start from the [filters] defaults in config.toml
    #[arg(long)]
    defaults: bool,

    /// Luminance in all three channels
    #[arg(long)]
    grayscale: bool,
    /// Gaussian blur
    #[arg(long, value_name = "INTENSITY")]
    blur: Option<u32>,
    /// Add 10 × intensity to every channel
    #[arg(long, value_name = "INTENSITY")]
    brightness: Option<u32>,
    /// Scale every channel by 1 + intensity/10
    #[arg(long, value_name = "INTENSITY")]
    contrast: Option<u32>,
    /// Sharpening kernel with the intensity as its center weight
    #[arg(long, value_name = "INTENSITY")]
    sharpen: Option<u32>,
    /// Add 10 × intensity to HSV saturation
    #[arg(long, value_name = "INTENSITY")]
    saturation: Option<u32>,

    /// One-shot effect applied after the filters; repeat to chain, in order
    #[arg(long = "effect", value_enum)]
    effects: Vec<EffectArg>,

    /// Apply everything, then revert and write the original
    #[arg(long)]
    revert: bool,
}

impl ApplyArgs {
    fn filter_set(&self, config: &BoothConfig) -> FilterSet {
        let mut set = if self.defaults {
            config.filters.to_filter_set()
        } else {
            FilterSet::new()
        };
        if self.grayscale {
            set.enable(FilterKind::Grayscale, Intensity::default());
        }
        let levels = [
            (FilterKind::Blur, self.blur),
            (FilterKind::Brightness, self.brightness),
            (FilterKind::Contrast, self.contrast),
            (FilterKind::Sharpen, self.sharpen),
            (FilterKind::Saturation, self.saturation),
        ];
        for (kind, level) in levels {
            if let Some(v) = level {
                set.enable(kind, Intensity::new(v));
            }
        }
        set
    }
}

#[derive(Clone)]
enum Input {
    File(PathBuf),
    Record(usize),
}

#[derive(Clone, Copy, ValueEnum)]
enum EffectArg {
    Contour,
    ColorMap,
    Mirror,
}

impl From<EffectArg> for Effect {
    fn from(arg: EffectArg) -> Self {
        match arg {
            EffectArg::Contour => Effect::Contour,
            EffectArg::ColorMap => Effect::ColorMap,
            EffectArg::Mirror => Effect::Mirror,
        }
    }
}

/// 1-based list position on the command line → 0-based index.
fn parse_position(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("'{s}' is not a photo position (1, 2, 3, ...)")),
    }
}

fn parse_input(s: &str) -> Result<Input, String> {
    match s.strip_prefix('#') {
        Some(pos) => parse_position(pos).map(Input::Record),
        None => Ok(Input::File(PathBuf::from(s))),
    }
}

/// Keeps the most recent rendered frame so it can be written out at the end.
#[derive(Default)]
struct LastFrame {
    frame: Option<Image>,
}

impl FrameSink for LastFrame {
    fn render(&mut self, image: &Image) {
        self.frame = Some(image.clone());
    }
}

impl LastFrame {
    fn write_to(&self, path: Option<&Path>, quality: u8) -> Result<(), Box<dyn Error>> {
        if let (Some(path), Some(frame)) = (path, &self.frame) {
            imaging::encode(frame, path, quality)?;
            debug!(path = %path.display(), "wrote preview");
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.library)?;
    init_thread_pool(&config.processing);
    let quality = config.library.jpeg_quality;

    match cli.command {
        Command::List => {
            let manager = PhotoManager::open(&cli.library, Disconnected, &config)?;
            output::print_records(manager.records());
        }
        Command::Import { paths } => {
            let mut manager = PhotoManager::open(&cli.library, Disconnected, &config)?;
            for path in &paths {
                let first = manager.records().len();
                let added = if path.is_dir() {
                    manager.import_dir(path)?
                } else {
                    vec![manager.import(path)?]
                };
                for (i, record) in added.iter().enumerate() {
                    output::print_record_action("Imported", first + i, record);
                }
            }
        }
        Command::Export { position, dest } => {
            let manager = PhotoManager::open(&cli.library, Disconnected, &config)?;
            manager.export(position, &dest)?;
            output::print_export(position, manager.record(position)?, &dest);
        }
        Command::Delete { position } => {
            let mut manager = PhotoManager::open(&cli.library, Disconnected, &config)?;
            let record = manager.delete(position)?;
            output::print_record_action("Deleted", position, &record);
        }
        Command::Show { position, out } => {
            let mut manager = PhotoManager::open(&cli.library, Disconnected, &config)?;
            manager.set_selection(Some(position))?;
            let mut sink = LastFrame::default();
            if let Some(record) = manager.show_selected(&mut sink)? {
                let dimensions = imaging::dimensions(&record.path)?;
                output::print_show(position, record, dimensions, out.as_deref());
            }
            sink.write_to(out.as_deref(), quality)?;
        }
        Command::Capture(args) => match &args.frames {
            Some(dir) => run_capture(FrameDirectory::open(dir)?, &cli.library, &config, &args)?,
            None => {
                let (w, h) = (config.capture.frame_width, config.capture.frame_height);
                run_capture(TestPattern::new(w, h), &cli.library, &config, &args)?
            }
        },
        Command::Apply(args) => run_apply(&cli.library, &config, &args)?,
        Command::GenConfig => unreachable!("handled before loading config"),
    }

    Ok(())
}

/// Stream for `args.ticks` ticks, capture, then confirm or discard.
fn run_capture<D: CaptureDevice>(
    device: D,
    library: &Path,
    config: &BoothConfig,
    args: &CaptureArgs,
) -> Result<(), Box<dyn Error>> {
    let mut manager = PhotoManager::open(library, device, config)?;
    let mut sink = LastFrame::default();
    let interval = Duration::from_millis(config.capture.tick_interval_ms);

    let mut rendered = 0;
    for _ in 0..args.ticks {
        if manager.tick(&mut sink) {
            rendered += 1;
        }
        std::thread::sleep(interval);
    }

    let frozen = manager.capture()?;
    sink.render(&imaging::fit_for_display(frozen, config.display.bounds()));
    sink.write_to(args.preview.as_deref(), config.library.jpeg_quality)?;

    if args.discard {
        manager.discard();
        output::print_capture(rendered, args.ticks, None);
    } else {
        let record = manager.confirm()?;
        let index = manager.records().len() - 1;
        output::print_capture(rendered, args.ticks, Some((index, &record)));
    }
    Ok(())
}

/// Load the input into a session, run filters and effects, write the result.
fn run_apply(library: &Path, config: &BoothConfig, args: &ApplyArgs) -> Result<(), Box<dyn Error>> {
    let working_size = config::effective_working_size(&config.processing);
    let mut session = Session::new();
    let label = match &args.input {
        Input::File(path) => {
            session.load_file(path, working_size)?;
            path.display().to_string()
        }
        Input::Record(index) => {
            let mut manager = PhotoManager::open(library, Disconnected, config)?;
            session.load(manager.select(*index)?, working_size);
            manager.record(*index)?.display_name()
        }
    };

    let filters = args.filter_set(config);
    let effects: Vec<Effect> = args.effects.iter().map(|&e| e.into()).collect();
    session.apply(&filters);
    for &effect in &effects {
        session.apply_effect(effect);
    }

    let result = if args.revert {
        session.revert()
    } else {
        session.displayed()
    };
    let Some(image) = result else {
        return Err("nothing loaded".into());
    };
    imaging::encode(image, &args.output, config.library.jpeg_quality)?;
    info!(output = %args.output.display(), "wrote filtered image");

    output::print_apply(&output::ApplySummary {
        input: &label,
        dimensions: image.dimensions(),
        filters: &filters,
        effects: &effects,
        reverted: args.revert,
        output: &args.output,
    });
    Ok(())
}

/// Install the log subscriber. `PHOTO_LAB_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env("PHOTO_LAB_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .init();
}

/// Size the global rayon pool used by the filter loops.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
