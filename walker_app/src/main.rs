//! Scene walker
//!
//! Builds a small multi-pass scene and culls it the way a renderer would each
//! frame: the main layer first, then every offscreen target asking for a
//! repaint. Pass a `.toml` or `.ron` config path as the first argument.

mod config;
mod demo_scene;

use std::cell::RefCell;
use std::rc::Rc;

use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use thiserror::Error;

use crate::config::WalkerConfig;
use crate::demo_scene::DemoScene;

/// Failures that stop the walker
#[derive(Error, Debug)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid view settings: {0}")]
    View(#[from] ViewError),
    #[error("scene construction failed: {0}")]
    Graph(#[from] GraphError),
    #[error("traversal failed: {0}")]
    Traversal(#[from] TraversalError),
}

fn load_config() -> Result<WalkerConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => WalkerConfig::load_from_file(&path),
        None => Ok(WalkerConfig::default()),
    }
}

/// Walk the scene under `layer` and return the cull list
fn cull_pass(
    demo: &DemoScene,
    traverser: &SceneGraphTraverser,
    collector: &Rc<RefCell<CullListCollector>>,
    layer: NodeId,
) -> Result<Vec<CulledNode>, TraversalError> {
    collector.borrow_mut().clear();
    let scene = demo.graph.node(layer).and_then(Node::as_layer).and_then(|l| l.scene());
    traverser.traverse_graph_from(&demo.graph, Some(layer), scene)?;
    Ok(collector.borrow().entries().to_vec())
}

fn log_pass(demo: &DemoScene, label: &str, entries: &[CulledNode]) {
    log::info!("{label}: {} visits", entries.len());
    for entry in entries {
        let name = demo.graph.node(entry.node).and_then(Node::name).unwrap_or("<unnamed>");
        let kind = demo.graph.node(entry.node).map_or("?", |n| n.kind().name());
        log::debug!(
            "{:indent$}{name} [{kind}]{}",
            "",
            if entry.shared { " (shared)" } else { "" },
            indent = entry.depth * 2
        );
    }
}

fn run(config: &WalkerConfig) -> Result<(), AppError> {
    let view = ViewEnvironment::from_config(&config.view)?;
    let mut demo = demo_scene::build(view, config.window_size)?;

    let collector = Rc::new(RefCell::new(CullListCollector::new()));
    let handle: ObserverHandle = collector.clone();
    let traverser = SceneGraphTraverser::new();
    traverser.set_observer(Some(handle));

    for pass in 0..config.passes {
        if config.reset_between_passes {
            traverser.reset();
        }

        let main = cull_pass(&demo, &traverser, &collector, demo.main_layer)?;
        log_pass(&demo, &format!("frame {pass} main"), &main);

        let offscreen_layers: Vec<NodeId> = match demo.mirror_texture.offscreen_source() {
            Some(target) if target.is_repaint_required() => (0..target.num_cullable_children())
                .filter_map(|index| target.cullable_layer(index))
                .collect(),
            _ => Vec::new(),
        };
        for (index, &layer) in offscreen_layers.iter().enumerate() {
            let entries = cull_pass(&demo, &traverser, &collector, layer)?;
            log_pass(&demo, &format!("frame {pass} offscreen {index}"), &entries);
        }
        // Static mirror content only needs rendering once
        if let Some(target) = demo.mirror_texture.offscreen_source_mut() {
            target.set_repaint_required(false);
        }
    }

    log::info!("Walked {} distinct nodes", traverser.visited_count());
    Ok(())
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init();
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    logging::init_with_level(&config.log_level);

    if let Err(e) = run(&config) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
