use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use image::{DynamicImage, ImageReader};
use serde::Deserialize;
use sprite_packer_core::config::{ContainerSize, SortOrder};
use sprite_packer_core::{
    InputImage, PackOutput, PackedGroup, PackerConfig, SpriteGroup, SpriteManifest, SpriteStub,
    pack_group, pack_single,
};
use tracing::info;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "sprite-packer",
    about = "Pack sprite groups into container textures",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack every group listed in a manifest (YAML or JSON)
    Pack(PackArgs),
    /// Pack all images below a directory as a single group
    Dir(DirArgs),
    /// Give one image a texture of its own and write its stub
    Sprite(SpriteArgs),
    /// Decode a sprite stub and print it
    Inspect(InspectArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// Manifest file listing the sprite groups
    #[arg(help_heading = "Input/Output")]
    manifest: PathBuf,
    #[command(flatten)]
    opts: PackOptions,
}

#[derive(Parser, Debug, Clone)]
struct DirArgs {
    /// Input directory (or single file)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Group name; containers are named <name>Texture<index>
    #[arg(short, long, default_value = "Sprites", help_heading = "Input/Output")]
    name: String,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,
    #[command(flatten)]
    opts: PackOptions,
}

#[derive(Args, Debug, Clone)]
struct PackOptions {
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// YAML config file path (overrides container options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    /// Container edge length: 256 | 512 | 1024 | 2048 | 4096
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    container_size: u32,
    /// Maximum containers per group; sprites beyond it are dropped with a warning
    #[arg(long, default_value_t = 20, help_heading = "Layout")]
    max_containers: usize,
    /// Sort order: area_asc|area_desc|max_side_desc|name_asc|none
    #[arg(long, default_value = "area_asc", help_heading = "Layout")]
    sort_order: String,

    /// Metadata format: none | json-hash | json-array
    #[arg(long, default_value = "none", value_parser = ["none", "json-hash", "json-array", "json"], help_heading = "Export")]
    metadata: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute placements and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct SpriteArgs {
    /// Input image
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,
    /// Sprite asset name (defaults to the file stem)
    #[arg(short, long)]
    name: Option<String>,
}

#[derive(Parser, Debug, Clone)]
struct InspectArgs {
    /// Stub file written by `pack`, `dir` or `sprite`
    stub: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let progress = cli.progress && !cli.quiet;
    match &cli.command {
        Commands::Pack(args) => run_pack(args, progress),
        Commands::Dir(args) => run_dir(args, progress),
        Commands::Sprite(args) => run_sprite(args),
        Commands::Inspect(args) => run_inspect(args),
    }
}

fn run_pack(args: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(&args.opts)?;
    if args.opts.print_config {
        return print_config(&cfg, &args.opts.print_config_format);
    }
    let manifest = load_manifest(&args.manifest)?;
    let base = args
        .manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    info!(
        groups = manifest.groups.len(),
        manifest = %args.manifest.display(),
        "loaded manifest"
    );
    let mut all_stats = Vec::with_capacity(manifest.groups.len());
    for group in &manifest.groups {
        let out = pack_one_group(group, &base, &cfg, show_progress)?;
        write_group(&out, &args.opts)?;
        all_stats.push(out.stats());
    }
    export_stats(&all_stats, &args.opts)
}

fn run_dir(args: &DirArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(&args.opts)?;
    if args.opts.print_config {
        return print_config(&cfg, &args.opts.print_config_format);
    }
    let paths = gather_paths(&args.input, &args.include, &args.exclude)?;
    let group = SpriteGroup {
        name: args.name.clone(),
        sprites: paths
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect(),
    };
    let out = pack_one_group(&group, Path::new(""), &cfg, show_progress)?;
    write_group(&out, &args.opts)?;
    export_stats(&[out.stats()], &args.opts)
}

fn run_sprite(args: &SpriteArgs) -> anyhow::Result<()> {
    let name = match &args.name {
        Some(n) => n.clone(),
        None => file_stem(&args.input)?,
    };
    let image = load_image(&args.input)?;
    let sprite = pack_single(&name, &image)?;
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;
    let png_path = args
        .out_dir
        .join(format!("{}.png", sprite.placement.container));
    sprite
        .rgba
        .save(&png_path)
        .with_context(|| format!("write {}", png_path.display()))?;
    let stub_path = args.out_dir.join(format!("{}.stub", name));
    let bytes = SpriteStub::from_placement(&sprite.placement).to_bytes()?;
    fs::write(&stub_path, bytes).with_context(|| format!("write {}", stub_path.display()))?;
    info!(?png_path, ?stub_path, "sprite written");
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let bytes = fs::read(&args.stub).with_context(|| format!("read {}", args.stub.display()))?;
    let stub = SpriteStub::from_bytes(&bytes)
        .with_context(|| format!("decode {}", args.stub.display()))?;
    println!("{}", serde_json::to_string_pretty(&stub)?);
    Ok(())
}

fn pack_one_group(
    group: &SpriteGroup,
    base: &Path,
    cfg: &PackerConfig,
    show_progress: bool,
) -> anyhow::Result<PackOutput> {
    let inputs = load_images_with_progress(&group.sprites, base, show_progress)?;
    info!(group = %group.name, count = inputs.len(), "loaded input images");
    let out = pack_group(&group.name, inputs, cfg)
        .with_context(|| format!("pack group {}", group.name))?;
    let stats = out.stats();
    info!(
        group = %group.name,
        containers = stats.num_containers,
        sprites = stats.num_sprites,
        dropped = stats.num_dropped,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );
    Ok(out)
}

fn write_group(out: &PackOutput, opts: &PackOptions) -> anyhow::Result<()> {
    // everything that can reject the group is checked before the first file is written
    let stubs = stub_files(&out.group)?;
    let metadata = metadata_value(&out.group, &opts.metadata)?;
    if opts.dry_run {
        return Ok(());
    }

    fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("create out_dir {}", opts.out_dir.display()))?;
    for c in &out.containers {
        let png_path = opts.out_dir.join(format!("{}.png", c.container.name));
        c.rgba
            .save(&png_path)
            .with_context(|| format!("write {}", png_path.display()))?;
        info!(?png_path, id = c.container.id, "wrote container");
    }

    let stub_dir = opts.out_dir.join(&out.group.name);
    fs::create_dir_all(&stub_dir)
        .with_context(|| format!("create {}", stub_dir.display()))?;
    for (stem, bytes) in &stubs {
        let stub_path = stub_dir.join(format!("{}.stub", stem));
        fs::write(&stub_path, bytes).with_context(|| format!("write {}", stub_path.display()))?;
    }
    info!(dir = ?stub_dir, stubs = stubs.len(), "stubs written");

    if let Some(value) = metadata {
        let json_path = opts.out_dir.join(format!("{}.json", out.group.name));
        fs::write(&json_path, serde_json::to_string_pretty(&value)?)
            .with_context(|| format!("write {}", json_path.display()))?;
        info!(?json_path, "metadata written");
    }
    Ok(())
}

/// Encodes the stub of every placement, keyed by the file stem of its sprite.
/// Two sprites of one group may not share a stem.
fn stub_files(group: &PackedGroup) -> anyhow::Result<Vec<(String, Vec<u8>)>> {
    let mut names: HashSet<String> = HashSet::new();
    let mut stubs = Vec::new();
    for placement in group.placements() {
        let stem = file_stem(Path::new(&placement.key))?;
        if !names.insert(stem.clone()) {
            anyhow::bail!(
                "two sprites of group {} share the asset name {}",
                group.name,
                stem
            );
        }
        stubs.push((stem, SpriteStub::from_placement(placement).to_bytes()?));
    }
    Ok(stubs)
}

fn metadata_value(
    group: &PackedGroup,
    format: &str,
) -> anyhow::Result<Option<serde_json::Value>> {
    Ok(match format {
        "none" => None,
        "json-hash" => Some(sprite_packer_core::to_json_hash(group)),
        "json-array" | "json" => Some(sprite_packer_core::to_json_array(group)),
        other => anyhow::bail!("unknown metadata format: {}", other),
    })
}

fn export_stats(
    stats: &[sprite_packer_core::PackStats],
    opts: &PackOptions,
) -> anyhow::Result<()> {
    if opts.dry_run {
        for s in stats {
            println!("{}", s.summary());
        }
        return Ok(());
    }
    let Some(stats_path) = &opts.export_stats else {
        return Ok(());
    };
    let value = serde_json::to_value(stats)?;
    fs::write(stats_path, serde_json::to_string_pretty(&value)?)
        .with_context(|| format!("write {}", stats_path.display()))?;
    info!(?stats_path, "stats exported");
    Ok(())
}

fn build_config(opts: &PackOptions) -> anyhow::Result<PackerConfig> {
    let mut cfg = PackerConfig {
        container_size: ContainerSize::try_from(opts.container_size)?,
        max_containers: opts.max_containers,
        sort_order: parse_sort_order(&opts.sort_order)?,
    };
    if let Some(path) = &opts.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        cfg = y.into_packer_config(cfg)?;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn print_config(cfg: &PackerConfig, format: &str) -> anyhow::Result<()> {
    match format {
        "yaml" => println!("{}", serde_yaml::to_string(cfg)?),
        _ => println!("{}", serde_json::to_string_pretty(cfg)?),
    }
    Ok(())
}

fn load_manifest(path: &Path) -> anyhow::Result<SpriteManifest> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let manifest: SpriteManifest = if is_json {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    };
    manifest.validate()?;
    Ok(manifest)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg")
    )
}

fn load_images_with_progress(
    sprites: &[String],
    base: &Path,
    progress: bool,
) -> anyhow::Result<Vec<InputImage>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(sprites.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(sprites.len());
    for key in sprites {
        let p = base.join(key);
        if let Some(b) = &bar {
            b.set_message(key.clone());
        }
        let image = match load_image(&p) {
            Ok(img) => img,
            Err(e) => {
                if let Some(b) = &bar {
                    b.abandon();
                }
                return Err(e);
            }
        };
        list.push(InputImage {
            key: key.clone(),
            image,
        });
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_image(p: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(p)
        .with_context(|| format!("open {}", p.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("decode {}", p.display()))?;
    Ok(img)
}

fn file_stem(p: &Path) -> anyhow::Result<String> {
    p.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .with_context(|| format!("no usable file name in {}", p.display()))
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    container_size: Option<u32>,
    max_containers: Option<usize>,
    sort_order: Option<String>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> anyhow::Result<PackerConfig> {
        if let Some(v) = self.container_size {
            cfg.container_size = ContainerSize::try_from(v)?;
        }
        if let Some(v) = self.max_containers {
            cfg.max_containers = v;
        }
        if let Some(v) = self.sort_order {
            cfg.sort_order = parse_sort_order(&v)?;
        }
        Ok(cfg)
    }
}

fn parse_sort_order(s: &str) -> anyhow::Result<SortOrder> {
    s.parse::<SortOrder>()
        .map_err(|_| anyhow::anyhow!("unknown sort order: {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprite_packer_core::{ContainerSize, LayoutItem, pack_layout};

    fn layout(keys: &[&str]) -> PackedGroup {
        let cfg = PackerConfig {
            container_size: ContainerSize::S256,
            ..Default::default()
        };
        let items = keys
            .iter()
            .map(|k| LayoutItem::new(*k, 4, 4))
            .collect();
        pack_layout("Dup", items, &cfg).expect("pack")
    }

    #[test]
    fn shared_stem_is_rejected_before_writing() {
        let group = layout(&["a/x.png", "b/x.png"]);
        let err = stub_files(&group).expect_err("duplicate stem");
        assert!(err.to_string().contains("share the asset name x"));
    }

    #[test]
    fn stubs_are_keyed_by_stem() {
        let group = layout(&["ui/ok.png", "ui/cancel.png"]);
        let stubs = stub_files(&group).expect("stubs");
        let mut stems: Vec<&str> = stubs.iter().map(|(s, _)| s.as_str()).collect();
        stems.sort();
        assert_eq!(stems, vec!["cancel", "ok"]);
        for (_, bytes) in &stubs {
            let stub = SpriteStub::from_bytes(bytes).expect("decode");
            assert_eq!(stub.texture, "DupTexture0");
        }
    }

    #[test]
    fn metadata_format_is_checked() {
        let group = layout(&["x.png"]);
        assert!(metadata_value(&group, "none").expect("none").is_none());
        assert!(metadata_value(&group, "json-hash").expect("hash").is_some());
        assert!(metadata_value(&group, "jsn").is_err());
        assert!(Cli::try_parse_from(["sprite-packer", "dir", "in", "--metadata", "jsn"]).is_err());
        assert!(Cli::try_parse_from(["sprite-packer", "dir", "in", "--metadata", "json-array"]).is_ok());
    }

    #[test]
    fn bad_sort_order_in_config_file_is_an_error() {
        let y: YamlConfig = serde_yaml::from_str("sort_order: biggest").expect("yaml");
        assert!(y.into_packer_config(PackerConfig::default()).is_err());

        let y: YamlConfig =
            serde_yaml::from_str("sort_order: area_desc\ncontainer_size: 512").expect("yaml");
        let cfg = y.into_packer_config(PackerConfig::default()).expect("config");
        assert_eq!(cfg.sort_order, SortOrder::AreaDesc);
        assert_eq!(cfg.container_size, ContainerSize::S512);
    }
}
