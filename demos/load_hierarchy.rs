use std::io::Cursor;

use hiertree::{
    classify, level_order, load, load_from_reader, HealthCheck, HierarchyStats, LoadOptions,
};
use tracing_subscriber::{fmt, EnvFilter};

// id;class;features
const SAMPLE: &str = "\
gen.0;gen.0;0.0;0.0
gen.0.0;gen.0.0;1.0;0.5
gen.0.0;gen.0.0;1.2;0.4
gen.0.2.1;gen.0.2;3.0;2.5
gen.0.2.3;gen.0.2;3.1;2.9
";

fn main() -> hiertree::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // 1. Load from a file when given one, otherwise from the inline sample
    let h = match std::env::args().nth(1) {
        Some(path) => load(&path, &LoadOptions::detect(&path)?)?,
        None => {
            let options = LoadOptions::new().with_class_column(true).with_breadth_fill(true);
            load_from_reader(Cursor::new(SAMPLE), &options)?
        }
    };

    println!("{h}");

    // 2. Shape and health
    let stats = HierarchyStats::compute(&h);
    println!(
        "height {} | {} nodes ({} synthesized) | {} leaves | avg fanout {:.2}",
        stats.height(),
        stats.total_nodes,
        h.synthesized_count(),
        stats.leaf_count,
        stats.avg_fanout
    );
    println!("classes: {:?}", h.class_histogram());
    println!("{}", h.health_check());

    // 3. Rows and roles relative to the deepest node
    let rows = level_order(&h);
    let focus = rows.last().copied().unwrap_or(h.root());
    println!("focus: {}", focus.id());
    for (row, node) in rows.iter().enumerate() {
        println!("{row:>4}  {:<16} {}", node.id(), classify(&h, focus, node));
    }
    Ok(())
}
