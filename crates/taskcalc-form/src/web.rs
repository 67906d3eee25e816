//! Browser binding (wasm32). Lets a page's hook object delegate its
//! `mounted` / `updated` / `destroyed` callbacks to the task calculator.
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlElement, HtmlInputElement};

use taskcalc_core::FormError;

use crate::calculator::{FieldSource, TaskCalculator, TaskFields};
use crate::config::{CalculatorConfig, FieldIds};
use crate::field::FieldHandle;

#[derive(Clone)]
pub struct DomField(HtmlInputElement);

impl FieldHandle for DomField {
    fn value(&self) -> String {
        self.0.value()
    }

    fn set_value(&self, value: &str) {
        self.0.set_value(value);
    }
}

/// Resolves the task fields in the host's document on every run.
pub struct DomFields {
    document: web_sys::Document,
    ids: FieldIds,
}

impl DomFields {
    pub fn new(document: web_sys::Document, ids: FieldIds) -> Self {
        Self { document, ids }
    }

    fn lookup(&self, id: &str) -> Result<DomField, FormError> {
        let el = self
            .document
            .get_element_by_id(id)
            .ok_or_else(|| FormError::MissingElement { id: id.to_string() })?;
        el.dyn_into::<HtmlInputElement>()
            .map(DomField)
            .map_err(|_| FormError::NotAnInput { id: id.to_string() })
    }
}

impl FieldSource for DomFields {
    type Field = DomField;

    fn fields(&self) -> Option<TaskFields<DomField>> {
        let lookup = |id: &str| {
            self.lookup(id)
                .map_err(|e| log::debug!("task value not recalculated: {e}"))
                .ok()
        };
        Some(TaskFields {
            rate_per_hour: lookup(&self.ids.rate_per_hour)?,
            audio_length_minutes: lookup(&self.ids.audio_length_minutes)?,
            task_value_dollars: lookup(&self.ids.task_value_dollars)?,
        })
    }
}

#[wasm_bindgen]
pub struct TaskCalculatorHook {
    el: HtmlElement,
    calculator: TaskCalculator<DomFields>,
    listener: Option<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl TaskCalculatorHook {
    #[wasm_bindgen(constructor)]
    pub fn new(el: HtmlElement) -> Result<TaskCalculatorHook, JsValue> {
        let document = el
            .owner_document()
            .ok_or_else(|| JsValue::from_str("host element is not in a document"))?;
        let config = CalculatorConfig::default();
        let calculator = TaskCalculator::new(DomFields::new(document, config.ids))
            .with_decimals(config.decimals);
        Ok(Self {
            el,
            calculator,
            listener: None,
        })
    }

    pub fn mounted(&mut self) -> Result<(), JsValue> {
        self.calculator.recalculate();
        if self.listener.is_some() {
            log::warn!("task calculator mounted twice; keeping the first listener");
            return Ok(());
        }
        let calculator = self.calculator.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            calculator.recalculate();
        });
        self.el
            .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        self.listener = Some(closure);
        Ok(())
    }

    pub fn updated(&self) {
        self.calculator.recalculate();
    }

    pub fn destroyed(&mut self) -> Result<(), JsValue> {
        if let Some(closure) = self.listener.take() {
            self.el
                .remove_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        }
        Ok(())
    }
}

#[wasm_bindgen]
pub fn init_logging() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let _ = console_log::init_with_level(log::Level::Info);
}
