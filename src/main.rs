use anyhow::{Context, bail};
use clap::{ArgAction, Args, Parser, Subcommand};

mod config;
mod diagnostics;
mod event;
mod graph;
mod interact;
mod meta;
mod model;
mod render;

use config::ViewerConfig;
use graph::{GraphIndex, GraphView, LineageGraph};
use interact::{Controller, SearchOutcome};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "lineage-viz")]
#[command(about = "Data lineage viewer for OpenLineage events", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct Source {
    /// JSON array of lineage events; `-` reads stdin.
    #[arg(long)]
    events: String,

    /// Viewer config (JSON).
    #[arg(long)]
    config: Option<String>,

    /// Let job nodes open the detail panel too.
    #[arg(long)]
    clickable_jobs: bool,

    /// Job metadata key used as the job label.
    #[arg(long)]
    label_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the interactive HTML viewer.
    Report {
        #[command(flatten)]
        source: Source,

        #[arg(short = 'o', long)]
        out: String,

        #[arg(long)]
        title: Option<String>,
    },

    /// Run a search and print direct hits and the nodes left lit.
    Search {
        #[command(flatten)]
        source: Source,

        query: String,
    },

    /// Print the detail panel of a node.
    Inspect {
        #[command(flatten)]
        source: Source,

        node: String,
    },

    /// Print everything upstream and downstream of a node.
    Lineage {
        #[command(flatten)]
        source: Source,

        node: String,
    },

    /// Print node and edge totals.
    Stats {
        #[command(flatten)]
        source: Source,
    },
}

impl Source {
    /// Config file first, then flags on top.
    fn config(&self) -> Result<ViewerConfig> {
        let mut cfg = ViewerConfig::load(self.config.as_deref())?;
        if self.clickable_jobs {
            cfg.clickable_jobs = true;
        }
        if let Some(key) = &self.label_key {
            cfg.label_key = Some(key.clone());
        }
        Ok(cfg)
    }
}

fn load_graph(path: &str, cfg: &ViewerConfig) -> Result<LineageGraph> {
    let events = event::load_events(path)?;
    build_from(&events, path, cfg)
}

fn build_from(events: &[event::RawEvent], path: &str, cfg: &ViewerConfig) -> Result<LineageGraph> {
    let graph = graph::build_graph(events, &cfg.build_options()).with_context(|| {
        diagnostics::error_message(format!("malformed event in {}", event::origin_label(path)))
    })?;
    Ok(graph)
}

/// What `report` writes: the viewer, or an error page carrying the failure.
enum ReportPage {
    Viewer(String),
    Failed { page: String, error: anyhow::Error },
}

fn render_report(loaded: Result<LineageGraph>, cfg: &ViewerConfig) -> Result<ReportPage> {
    let graph = match loaded {
        Ok(graph) => graph,
        Err(error) => {
            let page = render::render_error_page(&cfg.title, &format!("{:#}", error));
            return Ok(ReportPage::Failed { page, error });
        }
    };

    let data = model::build_viewer_data(&graph, cfg);
    Ok(ReportPage::Viewer(render::render_viewer(&data)?))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init(cli.verbose);

    match cli.cmd {
        Commands::Report { source, out, title } => {
            let mut cfg = source.config()?;
            if let Some(title) = title {
                cfg.title = title;
            }

            // 1) Load + build, 2) precompute interaction data, 3) render HTML.
            // A failed load still writes a page showing the error.
            let report = render_report(load_graph(&source.events, &cfg), &cfg)?;
            let (html, failure) = match report {
                ReportPage::Viewer(html) => (html, None),
                ReportPage::Failed { page, error } => (page, Some(error)),
            };
            std::fs::write(&out, html)
                .with_context(|| diagnostics::error_message(format!("write {}", out)))?;

            if let Some(error) = failure {
                diagnostics::warn(format!("wrote error page to {}", out));
                return Err(error);
            }
            println!("Wrote {}", out);
        }

        Commands::Search { source, query } => {
            let cfg = source.config()?;
            let graph = load_graph(&source.events, &cfg)?;
            let mut controller =
                Controller::new(&graph, GraphIndex::new(&graph), cfg.interaction_options());

            let outcome = controller.search(&query);
            match (outcome, controller.hit_count()) {
                (SearchOutcome::Matched { hits }, Some(count)) => {
                    println!("{}", interact::hit_counter_text(count));
                    for id in &hits {
                        println!("  hit  {}", id);
                    }
                    for id in controller.lit_nodes() {
                        if !hits.iter().any(|h| h == id) {
                            println!("  lit  {}", id);
                        }
                    }
                    let dimmed = controller.dimmed();
                    println!(
                        "dimmed: {} nodes, {} edges",
                        dimmed.dimmed_nodes().len(),
                        dimmed.dimmed_edges().len()
                    );
                }
                _ => println!("empty query: nothing dimmed"),
            }
        }

        Commands::Inspect { source, node } => {
            let cfg = source.config()?;
            let graph = load_graph(&source.events, &cfg)?;
            if graph.node(&node).is_none() {
                bail!("{}", diagnostics::error_message(format!("unknown node {}", node)));
            }
            let mut controller =
                Controller::new(&graph, GraphIndex::new(&graph), cfg.interaction_options());
            if controller.click(&node).is_none() {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "node {} has no detail panel (job nodes need --clickable-jobs)",
                        node
                    ))
                );
            }
            if let Some(panel) = controller.panel() {
                print!("{}", panel);
            }
        }

        Commands::Lineage { source, node } => {
            let cfg = source.config()?;
            let graph = load_graph(&source.events, &cfg)?;
            let index = GraphIndex::new(&graph);
            if !index.contains(&node) {
                bail!("{}", diagnostics::error_message(format!("unknown node {}", node)));
            }
            println!("{}", node);
            for id in &index.predecessors(&node).nodes {
                println!("  upstream    {}", id);
            }
            for id in &index.successors(&node).nodes {
                println!("  downstream  {}", id);
            }

            // Same set the viewer keeps lit while the pointer is on the node.
            let mut controller = Controller::new(&graph, index, cfg.interaction_options());
            controller.hover_enter(&node);
            let dimmed = controller.dimmed();
            for e in graph.edges() {
                if !dimmed.is_edge_dimmed(&e.id) {
                    println!("  edge  {} {} -> {} ({})", e.id, e.source, e.target, e.role);
                }
            }
            println!(
                "hover dims {} nodes, {} edges",
                dimmed.dimmed_nodes().len(),
                dimmed.dimmed_edges().len()
            );
            controller.hover_leave();
            if !controller.dimmed().is_empty() {
                diagnostics::warn("dimming left behind after hover leave");
            }
        }

        Commands::Stats { source } => {
            let cfg = source.config()?;
            let graph = load_graph(&source.events, &cfg)?;
            let t = graph.totals();
            println!("events:   {}", t.events);
            println!("jobs:     {}", t.jobs);
            println!("datasets: {}", t.datasets);
            println!("inputs:   {}", t.input_edges);
            println!("outputs:  {}", t.output_edges);
        }
    }

    Ok(())
}
