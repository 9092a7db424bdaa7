use std::collections::BTreeSet;
use std::sync::Arc;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::graph::node::Node;

/// Name of the default output buffer.
pub const PRIMARY: &str = "primary";

/// A root node bound to the buffer it writes.
#[derive(Clone, Debug)]
pub struct Graph {
    target: String,
    root: Arc<Node>,
}

impl Graph {
    /// Bind `root` to `target`.
    pub fn new(target: impl Into<String>, root: Node) -> Self {
        Self {
            target: target.into(),
            root: Arc::new(root),
        }
    }

    /// Output buffer name.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Root node.
    pub fn root(&self) -> &Node {
        &self.root
    }
}

/// A validated set of graphs plus the output configuration they run under.
#[derive(Clone, Debug)]
pub struct Patch {
    canvas: Canvas,
    fps: Fps,
    graphs: Vec<Graph>,
    buffers: Vec<String>,
    present: String,
}

impl Patch {
    /// Start a builder.
    pub fn builder(canvas: Canvas) -> PatchBuilder {
        PatchBuilder::new(canvas)
    }

    /// Resolution shared by every buffer.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Tick rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Graphs in declaration order.
    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    /// Every buffer name the patch writes or reads, in first-mention order.
    pub fn buffers(&self) -> &[String] {
        &self.buffers
    }

    /// Buffer shown by the compositor.
    pub fn present(&self) -> &str {
        &self.present
    }

    fn validate(&self) -> LoopwaveResult<()> {
        self.canvas.validate()?;
        if self.graphs.is_empty() {
            return Err(LoopwaveError::configuration("patch has no graphs"));
        }
        for g in &self.graphs {
            if g.target.is_empty() {
                return Err(LoopwaveError::configuration("graph target name is empty"));
            }
            g.root.validate().map_err(|e| match e {
                LoopwaveError::Configuration(msg) => {
                    LoopwaveError::configuration(format!("graph '{}': {msg}", g.target))
                }
                other => other,
            })?;
        }
        if !self.graphs.iter().any(|g| g.target == self.present) {
            return Err(LoopwaveError::configuration(format!(
                "presented buffer '{}' is not the target of any graph",
                self.present
            )));
        }
        Ok(())
    }
}

/// Builder for [`Patch`] values.
pub struct PatchBuilder {
    canvas: Canvas,
    fps: Fps,
    graphs: Vec<Graph>,
    declared: Option<Vec<String>>,
    present: String,
}

impl PatchBuilder {
    /// Create a builder rendering at `canvas`, 60 fps, presenting `primary`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            fps: Fps::default(),
            graphs: Vec::new(),
            declared: None,
            present: PRIMARY.to_owned(),
        }
    }

    /// Set the tick rate.
    pub fn fps(mut self, fps: Fps) -> Self {
        self.fps = fps;
        self
    }

    /// Append a graph. A graph targeting an already-targeted buffer replaces the earlier one.
    pub fn graph(mut self, graph: Graph) -> Self {
        if let Some(existing) = self.graphs.iter_mut().find(|g| g.target == graph.target) {
            tracing::warn!(target = %graph.target, "graph replaces earlier graph on same buffer");
            *existing = graph;
        } else {
            self.graphs.push(graph);
        }
        self
    }

    /// Append several graphs in order.
    pub fn graphs(self, graphs: impl IntoIterator<Item = Graph>) -> Self {
        graphs.into_iter().fold(self, Self::graph)
    }

    /// Choose which buffer is presented.
    pub fn render(mut self, buffer: impl Into<String>) -> Self {
        self.present = buffer.into();
        self
    }

    /// Restrict the patch to an explicit buffer set. Any other name becomes an error.
    pub fn buffers<S: Into<String>>(mut self, declared: impl IntoIterator<Item = S>) -> Self {
        self.declared = Some(declared.into_iter().map(Into::into).collect());
        self
    }

    /// Validate everything and produce the patch. No tick can run on an invalid patch.
    #[tracing::instrument(skip(self), fields(graphs = self.graphs.len()))]
    pub fn build(self) -> LoopwaveResult<Patch> {
        let mut seen = BTreeSet::new();
        let mut buffers = Vec::new();
        let mut mention = |name: &str| {
            if seen.insert(name.to_owned()) {
                buffers.push(name.to_owned());
            }
        };

        if let Some(declared) = &self.declared {
            for name in declared {
                if name.is_empty() {
                    return Err(LoopwaveError::configuration("declared buffer name is empty"));
                }
                mention(name);
            }
        }
        for g in &self.graphs {
            mention(&g.target);
            for b in g.root.buffer_refs() {
                mention(&b.name);
            }
        }

        if let Some(declared) = &self.declared {
            let allowed: BTreeSet<&str> = declared.iter().map(String::as_str).collect();
            for g in &self.graphs {
                let names = std::iter::once(g.target.as_str())
                    .chain(g.root.buffer_refs().into_iter().map(|b| b.name.as_str()));
                for name in names {
                    if !allowed.contains(name) {
                        return Err(LoopwaveError::configuration(format!(
                            "unregistered buffer '{name}' in graph '{}'",
                            g.target
                        )));
                    }
                }
            }
        }

        let patch = Patch {
            canvas: self.canvas,
            fps: self.fps,
            graphs: self.graphs,
            buffers,
            present: self.present,
        };
        patch.validate()?;
        Ok(patch)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/patch.rs"]
mod tests;
