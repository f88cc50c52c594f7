//! Command dispatch

use std::io;
use std::path::Path;
use std::time::Duration;

use clap::CommandFactory;
use clap_complete::generate;
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::{HighlightMode, NodeLayout, Visibility, WheelContext};
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::swatch::sample_all;
use crate::domain::{ColorScheme, LabelStyle, Relation, SwatchGrid, SwatchPlane};
use crate::infrastructure::{load_hierarchy, load_region_names, InfraError, RealFileSystem};
use crate::tree_traits::TreeNodeConvert;

/// Execute the parsed command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".into()));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = load_settings(cli)?;
    match command {
        Commands::Layout { hierarchy, format } => cmd_layout(&settings, hierarchy, *format),
        Commands::Tree { hierarchy } => cmd_tree(&settings, hierarchy),
        Commands::Highlight {
            hierarchy,
            node,
            mode,
            focus,
            lenient,
        } => cmd_highlight(
            &settings,
            hierarchy,
            node,
            mode.as_deref(),
            focus.as_deref(),
            *lenient,
        ),
        Commands::Relate {
            hierarchy,
            node,
            relation,
            focus,
            lenient,
        } => cmd_relate(
            &settings,
            hierarchy,
            node,
            relation,
            focus.as_deref(),
            *lenient,
        ),
        Commands::Zoom {
            hierarchy,
            node,
            frames,
            format,
        } => cmd_zoom(&settings, hierarchy, node, *frames, *format),
        Commands::Regions {
            hierarchy,
            regions,
            format,
        } => cmd_regions(&settings, hierarchy, regions, *format),
        Commands::Swatch {
            plane,
            step,
            format,
        } => cmd_swatch(plane.as_deref(), *step, *format),
        Commands::Config { command } => cmd_config(cli, &settings, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(scheme) = &cli.scheme {
        settings.color_scheme = scheme
            .parse::<ColorScheme>()
            .map_err(|e| CliError::InvalidArgs(e.to_string()))?;
    }
    debug!(scheme = %settings.color_scheme, "settings loaded");
    Ok(settings)
}

fn build_context(settings: &Settings, hierarchy: &Path) -> CliResult<WheelContext> {
    let value = load_hierarchy(&RealFileSystem, hierarchy)?;
    Ok(WheelContext::build(&value, settings)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Infra(InfraError::parse("serialize output", e)))?;
    output::info(&text);
    Ok(())
}

fn format_layout_line(l: &NodeLayout) -> String {
    let style = match l.label_style {
        LabelStyle::Bright => " bright",
        LabelStyle::Standard => "",
    };
    format!(
        "{:<32} {} x=[{:.4}, {:.4}] y=[{:.3}, {:.3}] r=[{:.1}, {:.1}] value={:.1}{}",
        if l.path.is_empty() { l.name.as_str() } else { l.path.as_str() },
        l.color_hex,
        l.x0,
        l.x1,
        l.y0,
        l.y1,
        l.arc.inner_radius,
        l.arc.outer_radius,
        l.value,
        style,
    )
}

#[instrument(skip(settings))]
fn cmd_layout(settings: &Settings, hierarchy: &Path, format: OutputFormat) -> CliResult<()> {
    let ctx = build_context(settings, hierarchy)?;
    let layout = ctx.layout();
    match format {
        OutputFormat::Json => print_json(&layout),
        OutputFormat::Text => {
            output::header(&format!(
                "{} nodes, scheme {}",
                layout.len(),
                settings.color_scheme
            ));
            for l in &layout {
                output::detail(&format_layout_line(l));
            }
            Ok(())
        }
    }
}

#[instrument(skip(settings))]
fn cmd_tree(settings: &Settings, hierarchy: &Path) -> CliResult<()> {
    let ctx = build_context(settings, hierarchy)?;
    output::info(&ctx.tree().to_tree_string());
    Ok(())
}

fn parse_mode(mode: Option<&str>, default: HighlightMode, lenient: bool) -> CliResult<HighlightMode> {
    match mode {
        None => Ok(default),
        Some(m) => match m.parse::<HighlightMode>() {
            Ok(mode) => Ok(mode),
            Err(_) if lenient => {
                output::warning(&format!("unknown mode '{m}', showing all"));
                Ok(HighlightMode::ShowAll)
            }
            Err(e) => Err(e.into()),
        },
    }
}

fn focus_on(ctx: &mut WheelContext, focus: Option<&str>) -> CliResult<()> {
    if let Some(path) = focus {
        let id = ctx.find(path)?;
        ctx.on_click(id)?;
        // settle the zoom so the focus is in place
        ctx.tick(Duration::MAX);
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_highlight(
    settings: &Settings,
    hierarchy: &Path,
    node: &str,
    mode: Option<&str>,
    focus: Option<&str>,
    lenient: bool,
) -> CliResult<()> {
    let mode = parse_mode(mode, settings.hover_mode, lenient)?;
    let mut settings = settings.clone();
    settings.hover_mode = mode;

    let mut ctx = build_context(&settings, hierarchy)?;
    focus_on(&mut ctx, focus)?;
    let basis = ctx.find(node)?;
    let target = ctx.on_hover(basis)?;

    output::header(&format!("{mode} around {node}"));
    output::action("wheel", &target.wheel_names(ctx.tree()).iter().join(", "));
    output::action("map", &target.map_names(ctx.tree()).iter().join(", "));
    for line in ctx.tooltip(basis)?.lines() {
        output::detail(&line);
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_relate(
    settings: &Settings,
    hierarchy: &Path,
    node: &str,
    relation: &str,
    focus: Option<&str>,
    lenient: bool,
) -> CliResult<()> {
    let relation = if lenient {
        Relation::parse_or_all(relation)
    } else {
        relation.parse::<Relation>()?
    };
    let mut ctx = build_context(settings, hierarchy)?;
    focus_on(&mut ctx, focus)?;

    let tree = ctx.tree();
    let basis = tree.node(ctx.find(node)?)?;
    let focus_node = ctx.focus_node()?;
    output::header(&format!("{relation}({node})"));
    for (_, n) in tree.iter() {
        if relation.holds(n, basis, focus_node) {
            output::success_detail(&n.name);
        } else {
            output::failure(&n.name);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct SampledWedge<'a> {
    name: &'a str,
    start_angle: f64,
    end_angle: f64,
    inner_radius: f64,
    outer_radius: f64,
    label_opacity: f64,
    visibility: Visibility,
}

#[derive(Serialize)]
struct SampledFrame<'a> {
    t: f64,
    wedges: Vec<SampledWedge<'a>>,
}

#[instrument(skip(settings))]
fn cmd_zoom(
    settings: &Settings,
    hierarchy: &Path,
    node: &str,
    frames: u32,
    format: OutputFormat,
) -> CliResult<()> {
    if frames == 0 {
        return Err(CliError::InvalidArgs("--frames must be at least 1".into()));
    }
    let mut ctx = build_context(settings, hierarchy)?;
    let target = ctx.find(node)?;
    ctx.on_click(target)?;

    let dt = settings.zoom_duration() / frames;
    let mut sampled = Vec::with_capacity(frames as usize + 1);
    sampled.push(ctx.frame());
    for _ in 0..frames {
        if let Some(done) = ctx.tick(dt).zoom_completed {
            debug!(generation = done.generation, hidden = done.hidden.len(), "zoom completed");
        }
        sampled.push(ctx.frame());
    }
    // Remaining rounding from the integer division
    if ctx.zoom().is_animating() {
        ctx.tick(settings.zoom_duration());
        sampled.push(ctx.frame());
    }

    let tree = ctx.tree();
    let frames: Vec<SampledFrame> = sampled
        .iter()
        .map(|f| SampledFrame {
            t: f.t,
            wedges: f
                .wedges
                .iter()
                .filter_map(|w| {
                    let n = tree.by_ordinal(w.ordinal)?;
                    Some(SampledWedge {
                        name: &n.name,
                        start_angle: w.arc.start_angle,
                        end_angle: w.arc.end_angle,
                        inner_radius: w.arc.inner_radius,
                        outer_radius: w.arc.outer_radius,
                        label_opacity: w.label_opacity,
                        visibility: w.visibility,
                    })
                })
                .collect(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&frames),
        OutputFormat::Text => {
            for f in &frames {
                output::header(&format!("t = {:.3}", f.t));
                for w in &f.wedges {
                    output::detail(&format!(
                        "{:<24} [{:.4}, {:.4}] r=[{:.1}, {:.1}] label={:.2} {:?}",
                        w.name,
                        w.start_angle,
                        w.end_angle,
                        w.inner_radius,
                        w.outer_radius,
                        w.label_opacity,
                        w.visibility
                    ));
                }
            }
            Ok(())
        }
    }
}

#[instrument(skip(settings))]
fn cmd_regions(
    settings: &Settings,
    hierarchy: &Path,
    regions: &Path,
    format: OutputFormat,
) -> CliResult<()> {
    let ctx = build_context(settings, hierarchy)?;
    let names = load_region_names(&RealFileSystem, regions)?;
    let index = ctx.bind_regions(&names);

    match format {
        OutputFormat::Json => print_json(&index),
        OutputFormat::Text => {
            for b in &index.bindings {
                output::success(&format!("{} {} class=\"{}\"", b.region, b.color_hex, b.class));
            }
            for r in &index.unknown_regions {
                output::warning(&format!("region without node: {r}"));
            }
            for n in &index.unmatched_nodes {
                output::warning(&format!("node without region: {n}"));
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct SwatchOutput {
    plane: SwatchPlane,
    space: &'static str,
    step: u32,
    axis: Vec<i32>,
    rows: Vec<Vec<String>>,
}

impl From<&SwatchGrid> for SwatchOutput {
    fn from(grid: &SwatchGrid) -> Self {
        Self {
            plane: grid.plane,
            space: if grid.plane.is_lab() { "lab" } else { "hsl" },
            step: grid.step,
            axis: grid.axis.clone(),
            rows: grid.hex_rows(),
        }
    }
}

#[instrument]
fn cmd_swatch(plane: Option<&str>, step: u32, format: OutputFormat) -> CliResult<()> {
    let grids = match plane {
        Some(p) => vec![SwatchGrid::sample(p.parse::<SwatchPlane>()?, step)?],
        None => sample_all(step)?,
    };

    match format {
        OutputFormat::Json => {
            let out: Vec<SwatchOutput> = grids.iter().map(SwatchOutput::from).collect();
            print_json(&out)
        }
        OutputFormat::Text => {
            for grid in &grids {
                let n = grid.size();
                output::header(&format!("{} ({n}x{n}, step {})", grid.plane, grid.step));
                for row in &grid.cells {
                    let line: String = row
                        .iter()
                        .map(|c| {
                            let [r, g, b] = c.to_bytes();
                            "  ".on_truecolor(r, g, b).to_string()
                        })
                        .collect();
                    output::info(&line);
                }
            }
            Ok(())
        }
    }
}

fn cmd_config(cli: &Cli, settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::action("global", &p.display()),
                None => output::action("global", &"(no config directory)"),
            }
            let local = cli
                .config
                .clone()
                .unwrap_or_else(|| local_config_path(Path::new(".")));
            let status = if local.exists() { "" } else { " (missing)" };
            output::action("local", &format!("{}{status}", local.display()));
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
    }
    Ok(())
}
