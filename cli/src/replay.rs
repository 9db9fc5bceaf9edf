//! Gesture script replay against the editing core.

use canvas_core::config::EditorConfig;
use canvas_core::editor::Editor;
use canvas_core::element::Element;
use canvas_core::input::InputEvent;
use canvas_core::mutation::ToolResult;
use canvas_core::scene::Scene;
use canvas_core::viewport::Viewport;
use serde::Deserialize;
use tracing::{debug, info};

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

/// A recorded session: starting elements plus the input to feed them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub scene: Vec<Element>,
    #[serde(default)]
    pub viewport: Option<Viewport>,
    #[serde(default)]
    pub events: Vec<InputEvent>,
}

/// Outcome of a replay: the editor in its final state and every non-empty
/// result in input order.
pub struct Replay {
    pub editor: Editor,
    pub results: Vec<ToolResult>,
}

impl Replay {
    /// One line per leaf mutation.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        self.results.iter().flat_map(ToolResult::leaves).map(|leaf| leaf.to_string()).collect()
    }
}

#[must_use]
pub fn replay(script: Script, config: EditorConfig) -> Replay {
    let mut editor = Editor::with_scene(config, Scene::from_elements(script.scene));
    if let Some(viewport) = script.viewport {
        editor.set_viewport(viewport);
    }

    let mut results = Vec::new();
    for (index, event) in script.events.iter().enumerate() {
        let result = editor.dispatch(event);
        if result.is_empty() {
            continue;
        }
        debug!(index, count = result.len(), "event produced mutations");
        results.push(result);
    }
    info!(events = script.events.len(), elements = editor.scene().len(), "replay finished");
    Replay { editor, results }
}
