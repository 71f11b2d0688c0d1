use anyhow::Context;
use clap::{Parser, ValueEnum};
use mapposter::{
    export::{output_path, save_png},
    theme::available_themes,
    PipelineStatus, PixmapCanvas, PosterConfig, PosterFormat, PosterPipeline, PosterRequest,
    Theme,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Preview,
    Print,
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
/// Generate a minimalist map poster for any place
struct Args {
    /// Place to center the poster on
    #[clap(short, long, required_unless_present = "list_themes")]
    place: Option<String>,

    /// Country or region, used to disambiguate the place
    #[clap(short, long, default_value = "")]
    region: String,

    /// Theme name: a JSON file in the themes directory or a built-in preset
    #[clap(short, long, default_value = "feature_based")]
    theme: String,

    /// JSON config file; flags below override it
    #[clap(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding theme JSON files
    #[clap(long, value_name = "DIR")]
    themes_dir: Option<PathBuf>,

    /// Directory posters are written to
    #[clap(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Radius around the place, in meters
    #[clap(long)]
    radius: Option<f64>,

    /// Output size preset
    #[clap(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Custom width in pixels (requires --height)
    #[clap(long, requires = "height")]
    width: Option<u32>,

    /// Custom height in pixels (requires --width)
    #[clap(long, requires = "width")]
    height: Option<u32>,

    /// TTF/OTF font for poster text
    #[clap(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// List available themes and exit
    #[clap(long)]
    list_themes: bool,
}

impl Args {
    fn to_config(&self) -> anyhow::Result<PosterConfig> {
        let mut config = match &self.config {
            Some(path) => PosterConfig::from_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => PosterConfig::default(),
        };

        if let Some(dir) = &self.themes_dir {
            config.themes_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(radius) = self.radius {
            config.radius_m = radius;
        }
        match (self.format, self.width, self.height) {
            (_, Some(width), Some(height)) => {
                config.format = PosterFormat::Custom { width, height }
            }
            (Some(FormatArg::Preview), _, _) => config.format = PosterFormat::Preview,
            (Some(FormatArg::Print), _, _) => config.format = PosterFormat::Print,
            _ => {}
        }
        if let Some(font) = &self.font {
            config.typography.font_path = Some(font.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

fn list_themes(config: &PosterConfig) {
    println!("Built-in themes:");
    for name in Theme::builtin_names() {
        println!("  {}", name);
    }

    match available_themes(&config.themes_dir) {
        Ok(names) if !names.is_empty() => {
            println!("Themes in {}:", config.themes_dir.display());
            for name in names {
                println!("  {}", name);
            }
        }
        Ok(_) => {}
        Err(e) => log::debug!("cannot list {}: {}", config.themes_dir.display(), e),
    }
}

fn report(status: PipelineStatus) {
    match status {
        PipelineStatus::Resolving { query } => eprintln!("Looking up '{}'...", query),
        PipelineStatus::Resolved {
            location,
            display_name,
        } => eprintln!("Found {} at {}", display_name, location),
        PipelineStatus::Fetching {
            radius_m,
            endpoints,
        } => eprintln!(
            "Downloading map data within {:.0} m ({} mirrors available)...",
            radius_m, endpoints
        ),
        PipelineStatus::Fetched { elements } => eprintln!("Received {} elements", elements),
        PipelineStatus::Classified(counts) => eprintln!(
            "{} roads, {} waterways, {} water areas, {} parks",
            counts.roads, counts.water_lines, counts.water_polygons, counts.parks
        ),
        PipelineStatus::Rendering { width, height } => {
            eprintln!("Rendering {}x{} poster...", width, height)
        }
        PipelineStatus::Finished | PipelineStatus::Superseded | PipelineStatus::Failed { .. } => {}
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.to_config()?;

    if args.list_themes {
        list_themes(&config);
        return Ok(());
    }
    let place = args.place.clone().unwrap_or_default();

    let loaded = Theme::load_named(&config.themes_dir, &args.theme);
    if let Some(e) = &loaded.failure {
        eprintln!("{}; using the default theme", e);
    }
    let theme = loaded.theme;

    let (width, height) = config.format.resolve();
    let mut canvas = PixmapCanvas::new(width, height)?;
    if let Some(font) = &config.typography.font_path {
        canvas = canvas.with_font_file(font)?;
    }

    let pipeline = PosterPipeline::from_config(&config)?;
    let request = PosterRequest::new(place.as_str(), args.region.as_str()).with_radius(config.radius_m);
    pipeline.run(&request, &theme, &mut canvas, &report).await?;

    let path = output_path(&config.output_dir, &place, &theme.name);
    save_png(&canvas, &path).with_context(|| format!("writing {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
