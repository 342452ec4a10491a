//! vlist - Entry Point
//!
//! Loads a JSON dataset into a list, applies grouping and sorting, positions
//! the window and prints the rendered items. With `paging = "paged"` the
//! dataset plays the server and is handed out page by page.

use clap::Parser;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use tracing::{debug, info};
use vlist::config::PagingMode;
use vlist::model::{
    ColumnDescriptor, ColumnId, GroupConfig, GroupLevel, PageDirection, PageRequest, Row, SortSpec,
};
use vlist::state::{ListContext, ListEvent};
use vlist::storage::FileLayoutStorage;
use vlist::view::{TextRenderer, UniformProbe};
use vlist::view_state::ScrollTarget;

/// Paint passes before giving up on the layout settling.
const MAX_PAINT_PASSES: usize = 16;

/// Virtualized list inspector - prints the rendered window of a dataset
#[derive(Parser, Debug)]
#[command(name = "vlist")]
#[command(version)]
#[command(about = "Render the visible window of a grouped, virtualized list")]
pub struct Args {
    /// Path to a JSON dataset: {"columns": [...], "rows": [...]}
    pub file: PathBuf,

    /// Group by this column (repeat for nested levels, outermost first)
    #[arg(short, long = "group-by", value_name = "COLUMN")]
    pub group_by: Vec<String>,

    /// Start with every group collapsed
    #[arg(long)]
    pub collapsed: bool,

    /// Sort by this column
    #[arg(short, long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub descending: bool,

    /// Viewport height in pixels
    #[arg(long, default_value = "400", value_parser = clap::value_parser!(u64).range(1..))]
    pub viewport: u64,

    /// Scroll offset in pixels
    #[arg(short, long, default_value = "0")]
    pub offset: u64,

    /// Snap the offset to the nearest item boundary
    #[arg(long)]
    pub snap: bool,

    /// Rows rendered beyond each viewport edge
    #[arg(long)]
    pub margin: Option<usize>,

    /// Estimated (and measured) item height in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub row_height: Option<u32>,

    /// Restore the layout saved under this name before grouping
    #[arg(long, value_name = "NAME")]
    pub layout: Option<String>,

    /// Save the resulting layout under the --layout name
    #[arg(long, requires = "layout")]
    pub save_layout: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Input file layout.
#[derive(Debug, Deserialize)]
struct Dataset {
    columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    rows: Vec<Row>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = vlist::config::load_config_with_precedence(args.config.clone())?;
        let merged = vlist::config::merge_config(config_file);
        let with_env = vlist::config::apply_env_overrides(merged);
        let collapsed_override = args.collapsed.then_some(true);
        vlist::config::apply_cli_overrides(
            with_env,
            collapsed_override,
            args.margin,
            args.row_height,
        )
    };

    vlist::logging::init(&config.log_file_path)?;
    info!(config = ?config, "configuration resolved");

    let raw = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("{}: {e}", args.file.display()))?;
    let dataset: Dataset = serde_json::from_str(&raw)?;
    info!(
        columns = dataset.columns.len(),
        rows = dataset.rows.len(),
        "dataset loaded"
    );

    let probe = UniformProbe(config.default_row_height);
    let mut ctx = ListContext::new(config.clone(), dataset.columns, Box::new(TextRenderer));
    let events = ctx.subscribe();
    ctx.resize(args.viewport);

    let mut storage = FileLayoutStorage::new(&config.layout_dir);
    if let Some(name) = &args.layout {
        ctx.restore_layout(&storage, name)?;
    }

    let server = DatasetServer {
        rows: dataset.rows,
        page_size: config.page_size,
    };
    let sort = args
        .sort
        .as_deref()
        .map(|column| -> Result<SortSpec, Box<dyn std::error::Error>> {
            let column_id = ColumnId::new(column)?;
            Ok(if args.descending {
                SortSpec::descending(column_id)
            } else {
                SortSpec::ascending(column_id)
            })
        })
        .transpose()?;

    let levels = args
        .group_by
        .iter()
        .map(|c| ColumnId::new(c.as_str()).map(GroupLevel::new))
        .collect::<Result<Vec<_>, _>>()?;

    match config.paging {
        PagingMode::Full => {
            ctx.load_rows(server.rows.clone())?;
            if sort.is_some() {
                ctx.set_sort(sort)?;
            }
        }
        // set_sort re-requests the first page under the new sort
        PagingMode::Paged if sort.is_some() => ctx.set_sort(sort)?,
        PagingMode::Paged => {
            ctx.request_first_page()?;
        }
    }
    if !levels.is_empty() {
        // refused for a paged list, which is grouped by the server
        ctx.set_group_config(GroupConfig::new(levels))?;
    }

    serve_pages(&mut ctx, &events, &server)?;
    let target = ScrollTarget::Offset(args.offset);
    if args.snap {
        ctx.scroll_to_snapped(target);
    } else {
        ctx.scroll_to(target);
    }
    for _ in 0..MAX_PAINT_PASSES {
        serve_pages(&mut ctx, &events, &server)?;
        if ctx.after_paint(&probe).is_none() {
            break;
        }
    }

    if let (true, Some(name)) = (args.save_layout, &args.layout) {
        ctx.save_layout(&mut storage, name);
    }

    println!("{}", render_window(&ctx));
    Ok(())
}

/// Serves pages out of the dataset, playing the server for a paged list.
struct DatasetServer {
    rows: Vec<Row>,
    page_size: usize,
}

impl DatasetServer {
    /// Wire page answering `request`. `Prev` pages are sent nearest row
    /// first, as a server paging backwards would.
    fn page(&self, request: &PageRequest) -> Value {
        let len = self.rows.len();
        let size = request.page_size.max(1).min(self.page_size.max(1));
        let anchor = request
            .anchor
            .as_ref()
            .and_then(|id| self.rows.iter().position(|r| &r.id == id));
        let range = match (request.direction, anchor) {
            (PageDirection::First, _) => 0..size.min(len),
            (PageDirection::Last, _) => len.saturating_sub(size)..len,
            (PageDirection::Next, Some(i)) => i + 1..(i + 1 + size).min(len),
            (PageDirection::Prev, Some(i)) => i.saturating_sub(size)..i,
            // anchor unknown to the server: nothing more in that direction
            (_, None) => return json!({"rows": [], "isFirst": true, "isLast": true}),
        };
        let (is_first, is_last) = (range.start == 0, range.end == len);
        let mut rows: Vec<&Row> = self.rows[range].iter().collect();
        if request.direction == PageDirection::Prev {
            rows.reverse();
        }
        json!({"rows": rows, "isFirst": is_first, "isLast": is_last})
    }
}

/// Answer every page request raised since the last call, including the
/// ones raised while answering.
fn serve_pages(
    ctx: &mut ListContext,
    events: &Receiver<ListEvent>,
    server: &DatasetServer,
) -> Result<(), Box<dyn std::error::Error>> {
    while let Some(request) = events.try_iter().find_map(|event| match event {
        ListEvent::PageRequested(request) => Some(request),
        _ => None,
    }) {
        debug!(id = request.id.get(), direction = %request.direction, "serving page");
        ctx.on_page_loaded(request.id, Ok(server.page(&request)))?;
    }
    Ok(())
}

/// Summary line plus one line per rendered item; visible items are starred.
fn render_window(ctx: &ListContext) -> String {
    let visible = ctx.visible();
    let mut lines = vec![format!(
        "rows {}, items {}, offset {} of {}",
        ctx.rows().len(),
        ctx.display().len(),
        ctx.scroll_offset(),
        ctx.max_scroll()
    )];
    lines.extend(ctx.rendered_items().into_iter().map(|item| {
        let marker = if visible.is_some_and(|v| v.contains(item.position)) {
            '*'
        } else {
            ' '
        };
        format!("{marker}{:>4} {}", item.position, item.markup)
    }));
    lines.join("\n")
}
