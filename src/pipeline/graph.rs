//! Static stage topology of the summarisation flow.

use std::fmt;

use once_cell::sync::Lazy;
use tracing::info;

/// Node of the flow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Ner,
    Template,
    Summarize,
    Done,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ner => "ner",
            Self::Template => "template",
            Self::Summarize => "summarize",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compiled linear topology: an entry stage plus unconditional edges.
#[derive(Debug)]
pub struct FlowGraph {
    entry: Stage,
    edges: Vec<(Stage, Stage)>,
}

static GRAPH: Lazy<FlowGraph> = Lazy::new(|| {
    info!("building pipeline graph");
    FlowGraph {
        entry: Stage::Ner,
        edges: vec![
            (Stage::Ner, Stage::Template),
            (Stage::Template, Stage::Summarize),
            (Stage::Summarize, Stage::Done),
        ],
    }
});

impl FlowGraph {
    /// The process-wide graph, built on first access.
    pub fn compiled() -> &'static FlowGraph {
        &GRAPH
    }

    pub fn entry(&self) -> Stage {
        self.entry
    }

    /// Successor of `stage`; stages without an outgoing edge end the flow.
    pub fn next(&self, stage: Stage) -> Stage {
        self.edges
            .iter()
            .find(|(from, _)| *from == stage)
            .map(|(_, to)| *to)
            .unwrap_or(Stage::Done)
    }

    /// Stages in execution order, excluding the terminal state.
    pub fn order(&self) -> Vec<Stage> {
        let mut out = Vec::new();
        let mut stage = self.entry;
        while stage != Stage::Done {
            out.push(stage);
            stage = self.next(stage);
        }
        out
    }
}
