use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use crumbtrail_core::{BindingRegistry, TrailBuilder};
use crumbtrail_model::{ParentSpec, RouteDescriptor};
use crumbtrail_router::{RouteResolver, RouteTable, RouteView};

mod config;

#[derive(Parser)]
#[command(name = "crumbtrail")]
#[command(about = "Breadcrumb trails for route hierarchies", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a route and print its breadcrumb trail
    Trail(TrailArgs),
    /// List the registered route table
    Routes(RoutesArgs),
    /// Validate a route file's breadcrumb configuration
    Check(CheckArgs),
}

#[derive(Args)]
struct TrailArgs {
    /// Route definition file (.json or .toml)
    #[arg(long)]
    routes: PathBuf,

    /// Resolve by concrete path
    #[arg(long, conflicts_with = "name")]
    path: Option<String>,

    /// Resolve by route name
    #[arg(long)]
    name: Option<String>,

    /// Value for a `:param` segment, as key=value (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Print the trail as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RoutesArgs {
    /// Route definition file (.json or .toml)
    #[arg(long)]
    routes: PathBuf,

    /// Print the table as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Route definition file (.json or .toml)
    #[arg(long)]
    routes: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let json_output = match &cli.command {
        Commands::Trail(args) => args.json,
        Commands::Routes(args) => args.json,
        Commands::Check(_) => false,
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || json_output {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Trail(args) => run_trail(args),
        Commands::Routes(args) => run_routes(args),
        Commands::Check(args) => run_check(args),
    }
}

fn run_trail(args: TrailArgs) -> Result<()> {
    let table = config::load_table(&args.routes)?;
    let descriptor = match (args.path, args.name) {
        (Some(path), None) => RouteDescriptor::path(path),
        (None, Some(name)) => {
            RouteDescriptor::name_with_params(name, parse_params(&args.params)?)
        }
        _ => bail!("pass exactly one of --path or --name"),
    };

    let route = table.resolve(&descriptor)?;
    let bindings = BindingRegistry::new();
    let trail = TrailBuilder::new(&table, &bindings).trail(&route);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&trail)?);
    } else {
        println!("{}", trail.labels().join(" > "));
    }
    Ok(())
}

fn run_routes(args: RoutesArgs) -> Result<()> {
    let table = config::load_table(&args.routes)?;

    if args.json {
        let rows: Vec<_> = table
            .routes()
            .map(|view| {
                json!({
                    "path": view.path,
                    "name": view.name,
                    "label": view_label(&view),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for view in table.routes() {
            println!(
                "{}\t{}\t{}",
                view.path,
                view.name.unwrap_or("-"),
                view_label(&view)
            );
        }
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let table = config::load_table(&args.routes)?;
    let mut findings = Vec::new();

    for view in table.routes() {
        let Some(crumb) = &view.meta.breadcrumb else {
            continue;
        };
        let route_id = view.name.unwrap_or(view.path);

        if crumb.parent.is_some() && crumb.parents_list.is_some() {
            findings.push(format!(
                "route `{route_id}` declares both `parent` and `parentsList`; `parent` wins"
            ));
        }
        match &crumb.parent {
            Some(ParentSpec::Name(name)) => {
                if table.route_named(name).is_none() {
                    findings.push(format!(
                        "route `{route_id}` declares unknown parent route `{name}`"
                    ));
                }
            }
            Some(ParentSpec::Descriptor(descriptor)) => {
                if let Err(err) = table.resolve(descriptor) {
                    findings.push(format!(
                        "route `{route_id}` declares an unresolvable parent: {err}"
                    ));
                }
            }
            None => {}
        }
    }

    if findings.is_empty() {
        println!("no issues in {}", args.routes.display());
        return Ok(());
    }
    for finding in &findings {
        println!("{finding}");
    }
    bail!("{} issue(s) found", findings.len());
}

fn view_label(view: &RouteView<'_>) -> String {
    view.meta
        .breadcrumb
        .as_ref()
        .and_then(|crumb| crumb.label.clone())
        .or_else(|| view.name.map(str::to_string))
        .unwrap_or_else(|| view.path.to_string())
}

fn parse_params(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    for pair in raw {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("invalid --param `{pair}`, expected key=value");
        };
        params.insert(key.to_string(), value.to_string());
    }
    Ok(params)
}
