use super::{read_input, write_output};
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use livepage_controller::HostController;
use livepage_dom::{select_first, NodeRef};
use livepage_history::{HistoryConfig, HistoryStore, MemoryStorage};
use livepage_protocol::{NewElement, StyleUpdate};
use livepage_runtime::{InputEvent, Point, Rect};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Canonical markup file
    pub file: PathBuf,

    /// Edit script: a JSON file, or an inline JSON array
    #[arg(short, long)]
    pub script: String,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// One scripted user action
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Step {
    EditMode {
        enabled: bool,
    },
    Hover {
        selector: String,
    },
    Click {
        selector: String,
    },
    /// Press on `selector`, release over `to`
    Drag {
        selector: String,
        to: String,
        #[serde(default)]
        position: DropPosition,
    },
    /// Replace the selected element's text
    Type {
        text: String,
    },
    Add {
        tag: String,
        #[serde(default)]
        text: String,
        #[serde(default)]
        classes: String,
    },
    Style {
        property: String,
        value: String,
    },
    Delete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropPosition {
    #[default]
    Before,
    After,
}

/// Replay an edit script against the page and emit the resulting markup
pub fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let markup = read_input(cwd, &args.file)?;
    let steps = load_script(cwd, &args.script)?;

    let history = HistoryStore::new(MemoryStorage::new(), HistoryConfig::default());
    let mut controller = HostController::new(history, config.controller_config());
    controller.set_markup(markup);
    controller.pump();

    run_script(&mut controller, &steps)?;
    controller.tick();

    if let Some(selection) = controller.selection() {
        eprintln!(
            "  {} Selected {} ({})",
            "•".bright_blue(),
            selection.tag.bright_white(),
            selection.colors.background
        );
    }
    eprintln!("  {} Applied {} steps", "✓".green(), steps.len());
    write_output(cwd, &controller.export(), args.out.as_deref())
}

fn load_script(cwd: &str, script: &str) -> Result<Vec<Step>> {
    let text = if script.trim_start().starts_with('[') {
        script.to_string()
    } else {
        read_input(cwd, script.as_ref())?
    };
    serde_json::from_str(&text).context("invalid edit script")
}

pub fn run_script(controller: &mut HostController, steps: &[Step]) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
        tracing::debug!(index, ?step, "script step");
        apply_step(controller, step).with_context(|| format!("step {} failed", index + 1))?;
        controller.pump();
    }
    Ok(())
}

fn apply_step(controller: &mut HostController, step: &Step) -> Result<()> {
    match step {
        Step::EditMode { enabled } => controller.set_edit_mode(*enabled),
        Step::Hover { selector } => {
            let target = find(controller, selector)?;
            controller.frame_mut().dispatch(InputEvent::PointerOver { target });
        }
        Step::Click { selector } => {
            let target = find(controller, selector)?;
            let point = center(bounds(controller, &target)?);
            controller.frame_mut().dispatch(InputEvent::PointerDown { target, point });
            controller.frame_mut().dispatch(InputEvent::PointerUp { point });
        }
        Step::Drag { selector, to, position } => {
            let origin = find(controller, selector)?;
            let target = find(controller, to)?;
            let start = center(bounds(controller, &origin)?);
            let rect = bounds(controller, &target)?;
            let drop = match position {
                DropPosition::Before => Point::new(rect.x + 1.0, rect.y + 1.0),
                DropPosition::After => Point::new(rect.x + 1.0, rect.y + rect.height - 1.0),
            };
            let frame = controller.frame_mut();
            frame.dispatch(InputEvent::PointerDown { target: origin, point: start });
            frame.dispatch(InputEvent::PointerMove { point: drop });
            frame.dispatch(InputEvent::PointerUp { point: drop });
        }
        Step::Type { text } => {
            runtime_mut(controller)?.edit_selected_text(text);
        }
        Step::Add { tag, text, classes } => {
            controller.add_element(NewElement::new(tag.as_str(), text.as_str(), classes.as_str()))
        }
        Step::Style { property, value } => {
            controller.update_style(StyleUpdate::new(property.as_str(), value.as_str()))
        }
        Step::Delete => controller.delete_element(),
    }
    Ok(())
}

fn find(controller: &HostController, selector: &str) -> Result<NodeRef> {
    let runtime = controller
        .frame()
        .runtime()
        .ok_or_else(|| anyhow!("the sandbox has no runtime"))?;
    select_first(runtime.document().root(), selector)?
        .ok_or_else(|| anyhow!("no element matches '{}'", selector))
}

fn runtime_mut(controller: &mut HostController) -> Result<&mut livepage_runtime::DocumentRuntime> {
    controller
        .frame_mut()
        .runtime_mut()
        .ok_or_else(|| anyhow!("the sandbox has no runtime"))
}

fn bounds(controller: &mut HostController, node: &NodeRef) -> Result<Rect> {
    runtime_mut(controller)?
        .bounds(node)
        .ok_or_else(|| anyhow!("element is not rendered"))
}

fn center(rect: Rect) -> Point {
    Point::new(rect.x + rect.width / 2.0, rect.mid_y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepage_controller::ControllerConfig;

    fn controller(markup: &str) -> HostController {
        let history = HistoryStore::new(MemoryStorage::new(), HistoryConfig::default());
        let mut controller = HostController::new(history, ControllerConfig::default());
        controller.set_markup(markup);
        controller.pump();
        controller
    }

    #[test]
    fn test_parse_script() {
        let steps: Vec<Step> = serde_json::from_str(
            r#"[
                {"action": "editMode", "enabled": true},
                {"action": "drag", "selector": "h2", "to": "h1"},
                {"action": "style", "property": "color", "value": "red"},
                {"action": "delete"}
            ]"#,
        )
        .unwrap();
        assert_eq!(steps[0], Step::EditMode { enabled: true });
        assert!(matches!(&steps[1], Step::Drag { position: DropPosition::Before, .. }));
        assert_eq!(steps[3], Step::Delete);
    }

    #[test]
    fn test_script_edits_page() {
        let mut controller =
            controller("<html><body><h1>A</h1><p>B</p><h2>C</h2></body></html>");
        let steps = vec![
            Step::EditMode { enabled: true },
            Step::Drag { selector: "h2".into(), to: "h1".into(), position: DropPosition::Before },
            Step::Click { selector: "p".into() },
            Step::Type { text: "Bee".into() },
            Step::Style { property: "color".into(), value: "blue".into() },
            Step::Add { tag: "span".into(), text: "new".into(), classes: String::new() },
        ];
        run_script(&mut controller, &steps).unwrap();
        assert_eq!(
            controller.export(),
            "<html><body><h2>C</h2><h1>A</h1><p style=\"color: blue;\">Bee</p><span>new</span></body></html>"
        );
    }

    #[test]
    fn test_unknown_selector_fails() {
        let mut controller = controller("<html><body><p>x</p></body></html>");
        let err = run_script(&mut controller, &[Step::Click { selector: "#nope".into() }]).unwrap_err();
        assert!(err.to_string().contains("step 1"));
    }
}
