//! Drives a task form from stdin.
//!
//! ```text
//! rate_per_hour 60          replace a field's text
//! type audio_length_minutes 3
//! backspace rate_per_hour
//! refresh                   content refresh of the form
//! quit
//! ```
use std::io::{self, BufRead, Write};

use anyhow::{Context, bail};
use taskcalc_form::*;

struct App {
    doc: Document,
    mounted: MountedHook<TaskCalculator<DocumentFields>>,
}

fn build_form(config: &CalculatorConfig) -> anyhow::Result<App> {
    let doc = Document::new();
    let form = doc.append_container(doc.root(), Some("task-form"))?;
    doc.append_input(form, Some(&config.ids.rate_per_hour), "")?;
    doc.append_input(form, Some(&config.ids.audio_length_minutes), "")?;
    doc.append_input(form, Some(&config.ids.task_value_dollars), "")?;

    let out = doc.input_by_id(&config.ids.task_value_dollars)?;
    out.on_change(|v| println!("task_value_dollars = {v}"));

    let calc = TaskCalculator::for_document(doc.clone(), config);
    let mounted = doc.mount_hook(form, calc)?;
    Ok(App { doc, mounted })
}

impl App {
    fn field(&self, id: &str) -> anyhow::Result<ElementKey> {
        self.doc
            .element_by_id(id)
            .with_context(|| format!("no field `{id}`"))
    }

    /// Returns false on `quit`.
    fn handle(&mut self, line: &str) -> anyhow::Result<bool> {
        let line = line.trim();
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        match cmd {
            "" => {}
            "quit" | "exit" => return Ok(false),
            "refresh" => self.mounted.update(),
            "type" => {
                let (id, text) = rest.split_once(' ').unwrap_or((rest, ""));
                self.doc.type_text(self.field(id)?, text)?;
            }
            "backspace" => self.doc.delete_backward(self.field(rest.trim())?)?,
            id => {
                let key = self.field(id)?;
                if self.doc.input(key).is_err() {
                    bail!("`{id}` is not an input field");
                }
                self.doc.set_input_value(key, rest)?;
            }
        }
        Ok(true)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = CalculatorConfig::default();
    let mut app = build_form(&config)?;
    log::info!("task form ready; fields: {:?}", config.ids);

    let stdin = io::stdin();
    let mut out = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        match app.handle(&line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => log::error!("{e:#}"),
        }
        out.flush()?;
    }

    app.mounted.destroy();
    Ok(())
}
