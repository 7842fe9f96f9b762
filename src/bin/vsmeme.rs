use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vslayout::ComparisonRow;
use vslayout::compose;
use vslayout::prepare::{SquareSpec, prepare};
use vslayout::profile;
use vslayout::settings::{DEFAULT_SETTINGS_FILE, SettingsStore};
use vslayout::svg::{SvgOptions, render_scene_svg};

#[derive(Parser, Debug)]
#[command(author, version, about = "Compose a two-sided VS comparison image", long_about = None)]
struct Cli {
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_SETTINGS_FILE,
        help = "Settings file holding the last names, images, and rows"
    )]
    settings: PathBuf,

    #[arg(long, help = "Name shown under the left image")]
    left_name: Option<String>,

    #[arg(long, help = "Name shown under the right image")]
    right_name: Option<String>,

    #[arg(long, value_name = "PATH", help = "Left image file")]
    left_image: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Right image file")]
    right_image: Option<PathBuf>,

    #[arg(
        long = "row",
        value_name = "LABEL=LEFT=RIGHT",
        value_parser = parse_row,
        help = "Comparison row; repeat for each row. Replaces all stored rows"
    )]
    rows: Vec<ComparisonRow>,

    #[arg(
        long,
        default_value = "",
        hide_default_value = true,
        help = "Profile query, e.g. preset=wide&margin=0.06&color.accent=navy"
    )]
    profile: String,

    #[arg(long, default_value_t = 1000, help = "Output width in pixels")]
    width: u32,

    #[arg(long, default_value_t = 700, help = "Output height in pixels")]
    height: u32,

    #[arg(
        long,
        default_value_t = vslayout::prepare::DEFAULT_SQUARE_SIZE,
        help = "Side length of the prepared square images"
    )]
    image_size: u32,

    #[arg(long, value_name = "PATH", default_value = "vs.svg", help = "Output SVG file")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let store = SettingsStore::new(&cli.settings);
    let mut record = store.load();
    if let Some(name) = cli.left_name {
        record.left_name = name;
    }
    if let Some(name) = cli.right_name {
        record.right_name = name;
    }
    if let Some(path) = &cli.left_image {
        record.left_image = path.display().to_string();
    }
    if let Some(path) = &cli.right_image {
        record.right_image = path.display().to_string();
    }
    if !cli.rows.is_empty() {
        if !store.keeps_row_count(cli.rows.len()) {
            tracing::warn!(
                rows = cli.rows.len(),
                kept = store.defaults().row_count(),
                "rows differ in count from the defaults and will not survive the next load"
            );
        }
        record.set_rows(&cli.rows);
    }
    store
        .save(&record)
        .with_context(|| format!("saving settings to {}", cli.settings.display()))?;

    let spec = SquareSpec::with_size(cli.image_size);
    let left = prepare_side(&record.left_image, &cli.out, "left", &spec)?;
    let right = prepare_side(&record.right_image, &cli.out, "right", &spec)?;

    let parsed = profile::parse(&cli.profile);
    for warning in &parsed.warnings {
        tracing::warn!(?warning, "ignored profile setting");
    }
    // Rows always come from the record; a `rows=` key cannot disagree with it.
    let geometry = parsed.profile.with_row_count(record.row_count());
    let scene = compose(&record.to_input(left, right), &geometry).context("composing layout")?;

    let options = SvgOptions {
        width: cli.width,
        height: cli.height,
        palette: parsed.palette,
    };
    fs::write(&cli.out, render_scene_svg(&scene, &options))
        .with_context(|| format!("writing {}", cli.out.display()))?;
    tracing::info!(
        out = %cli.out.display(),
        nodes = scene.len(),
        rows = scene.bands().len(),
        "wrote comparison"
    );
    Ok(())
}

/// Prepare one side's image as `<out stem>.<side>.png` next to the output.
fn prepare_side(
    source: &str,
    out: &Path,
    side: &str,
    spec: &SquareSpec,
) -> anyhow::Result<vslayout::ImageHandle> {
    let source = (!source.is_empty()).then(|| Path::new(source));
    let prepared = prepare(source, spec);
    let target = side_image_path(out, side);
    prepared
        .save_png(&target)
        .with_context(|| format!("writing {}", target.display()))
}

fn side_image_path(out: &Path, side: &str) -> PathBuf {
    let stem = out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("vs"));
    out.with_file_name(format!("{stem}.{side}.png"))
}

fn parse_row(value: &str) -> Result<ComparisonRow, String> {
    let mut parts = value.splitn(3, '=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(label), Some(left), Some(right)) => Ok(ComparisonRow::new(label, left, right)),
        _ => Err(format!("expected LABEL=LEFT=RIGHT, got `{value}`")),
    }
}
