//! Task value calculator.
//!
//! Keeps `task_value_dollars` equal to `rate_per_hour / 60 * audio_length_minutes`
//! rounded to two decimals. Recalculates when the host mounts, when its
//! content is refreshed, and on every `input` event reaching the host.
//!
//! The three fields are injected rather than looked up globally: either as
//! fixed handles ([`TaskFields`]) or as a document to resolve them in on
//! every run ([`DocumentFields`]).

use std::rc::Rc;

use taskcalc_core::{number_or_zero, to_fixed};

use crate::config::{CalculatorConfig, FieldIds};
use crate::document::Document;
use crate::field::{FieldHandle, InputField};
use crate::hook::{Hook, HookContext};

pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Dollar value of a task billed at `rate_per_hour` for `minutes` of audio.
pub fn task_value(rate_per_hour: f64, minutes: f64) -> f64 {
    (rate_per_hour / MINUTES_PER_HOUR) * minutes
}

#[derive(Clone, Debug)]
pub struct TaskFields<F> {
    pub rate_per_hour: F,
    pub audio_length_minutes: F,
    pub task_value_dollars: F,
}

/// Supplies the task fields each time the calculator runs. `None` means at
/// least one field is absent and nothing is written.
pub trait FieldSource {
    type Field: FieldHandle;

    fn fields(&self) -> Option<TaskFields<Self::Field>>;
}

impl<F: FieldHandle + Clone> FieldSource for TaskFields<F> {
    type Field = F;

    fn fields(&self) -> Option<TaskFields<F>> {
        Some(self.clone())
    }
}

/// Resolves the fields by identifier in an injected [`Document`].
#[derive(Clone)]
pub struct DocumentFields {
    document: Document,
    ids: FieldIds,
}

impl DocumentFields {
    pub fn new(document: Document, ids: FieldIds) -> Self {
        Self { document, ids }
    }
}

impl FieldSource for DocumentFields {
    type Field = InputField;

    fn fields(&self) -> Option<TaskFields<InputField>> {
        let lookup = |id: &str| {
            self.document
                .input_by_id(id)
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

/// Writes the task value computed from `fields`, formatted with `decimals`
/// fractional digits.
pub fn recalculate_fields<F: FieldHandle>(fields: &TaskFields<F>, decimals: usize) {
    let rate = number_or_zero(&fields.rate_per_hour.value());
    let minutes = number_or_zero(&fields.audio_length_minutes.value());
    let value = to_fixed(task_value(rate, minutes), decimals);
    log::trace!("task value {rate}/h x {minutes}min = {value}");
    fields.task_value_dollars.set_value(&value);
}

/// Cheap to clone; clones share the field source.
pub struct TaskCalculator<S> {
    source: Rc<S>,
    decimals: usize,
}

impl<S> Clone for TaskCalculator<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            decimals: self.decimals,
        }
    }
}

impl<S: FieldSource> TaskCalculator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Rc::new(source),
            decimals: CalculatorConfig::default().decimals,
        }
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Recomputes the derived field. Does nothing when a field is absent.
    pub fn recalculate(&self) {
        if let Some(fields) = self.source.fields() {
            recalculate_fields(&fields, self.decimals);
        }
    }
}

impl TaskCalculator<DocumentFields> {
    pub fn for_document(document: Document, config: &CalculatorConfig) -> Self {
        Self::new(DocumentFields::new(document, config.ids.clone())).with_decimals(config.decimals)
    }
}

impl<S: FieldSource + 'static> Hook for TaskCalculator<S> {
    fn mounted(&mut self, ctx: &HookContext) {
        self.recalculate();
        let this = self.clone();
        if let Err(e) = ctx.on_input(move |_| this.recalculate()) {
            log::warn!("task calculator could not listen for input: {e}");
        }
    }

    fn updated(&mut self, _ctx: &HookContext) {
        self.recalculate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ElementKey;

    fn injected(rate: &str, minutes: &str) -> TaskFields<InputField> {
        TaskFields {
            rate_per_hour: InputField::new(rate),
            audio_length_minutes: InputField::new(minutes),
            task_value_dollars: InputField::default(),
        }
    }

    fn value_for(rate: &str, minutes: &str) -> String {
        let fields = injected(rate, minutes);
        TaskCalculator::new(fields.clone()).recalculate();
        fields.task_value_dollars.value()
    }

    struct Form {
        doc: Document,
        host: ElementKey,
        rate: ElementKey,
        minutes: ElementKey,
    }

    fn task_form() -> Form {
        let doc = Document::new();
        let host = doc.append_container(doc.root(), Some("task-form")).unwrap();
        let rate = doc.append_input(host, Some("rate_per_hour"), "").unwrap();
        let minutes = doc
            .append_input(host, Some("audio_length_minutes"), "")
            .unwrap();
        doc.append_input(host, Some("task_value_dollars"), "")
            .unwrap();
        Form {
            doc,
            host,
            rate,
            minutes,
        }
    }

    fn derived(doc: &Document) -> String {
        doc.input_by_id("task_value_dollars").unwrap().value()
    }

    #[test]
    fn test_examples() {
        assert_eq!(value_for("60", "30"), "30.00");
        assert_eq!(value_for("0", "10"), "0.00");
        assert_eq!(value_for("abc", "15"), "0.00");
        assert_eq!(value_for("45", "20"), "15.00");
        assert_eq!(value_for("25", "7"), "2.92");
    }

    #[test]
    fn test_empty_and_garbage_are_zero() {
        assert_eq!(value_for("", ""), "0.00");
        assert_eq!(value_for("90", ""), "0.00");
        assert_eq!(value_for("90", "ten"), "0.00");
        assert_eq!(value_for("90 $/h", "10 min"), "15.00");
    }

    #[test]
    fn test_value_is_rounded_product() {
        for r in [0.0, 0.5, 1.0, 12.34, 59.99, 60.0, 75.5, 1000.0] {
            for l in [0.0, 0.25, 1.0, 7.0, 33.3, 90.0, 600.0] {
                let shown: f64 = value_for(&r.to_string(), &l.to_string()).parse().unwrap();
                assert!(
                    (shown - r / 60.0 * l).abs() <= 0.005 + 1e-9,
                    "rate {r} length {l} shown {shown}"
                );
            }
        }
    }

    #[test]
    fn test_decimals_config() {
        let fields = injected("60", "1.2345");
        TaskCalculator::new(fields.clone())
            .with_decimals(3)
            .recalculate();
        // 1.2345 is stored just below the tie.
        assert_eq!(fields.task_value_dollars.value(), "1.234");
    }

    #[test]
    fn test_missing_derived_field_is_noop() {
        let doc = Document::new();
        doc.append_input(doc.root(), Some("rate_per_hour"), "60")
            .unwrap();
        doc.append_input(doc.root(), Some("audio_length_minutes"), "30")
            .unwrap();

        TaskCalculator::for_document(doc.clone(), &CalculatorConfig::default()).recalculate();

        assert_eq!(doc.input_by_id("rate_per_hour").unwrap().value(), "60");
        assert_eq!(
            doc.input_by_id("audio_length_minutes").unwrap().value(),
            "30"
        );
    }

    #[test]
    fn test_non_input_field_is_treated_as_absent() {
        let doc = Document::new();
        doc.append_input(doc.root(), Some("rate_per_hour"), "60")
            .unwrap();
        doc.append_container(doc.root(), Some("audio_length_minutes"))
            .unwrap();
        doc.append_input(doc.root(), Some("task_value_dollars"), "keep")
            .unwrap();

        TaskCalculator::for_document(doc.clone(), &CalculatorConfig::default()).recalculate();

        assert_eq!(derived(&doc), "keep");
    }

    #[test]
    fn test_custom_ids() {
        let doc = Document::new();
        doc.append_input(doc.root(), Some("rate"), "120").unwrap();
        doc.append_input(doc.root(), Some("len"), "15").unwrap();
        doc.append_input(doc.root(), Some("out"), "").unwrap();
        let config = CalculatorConfig {
            ids: FieldIds {
                rate_per_hour: "rate".into(),
                audio_length_minutes: "len".into(),
                task_value_dollars: "out".into(),
            },
            decimals: 1,
        };

        TaskCalculator::for_document(doc.clone(), &config).recalculate();

        assert_eq!(doc.input_by_id("out").unwrap().value(), "30.0");
    }

    #[test]
    fn test_mount_computes_immediately() {
        let form = task_form();
        form.doc.input(form.rate).unwrap().set_value("60");
        form.doc.input(form.minutes).unwrap().set_value("30");

        let calc = TaskCalculator::for_document(form.doc.clone(), &CalculatorConfig::default());
        let _mounted = form.doc.mount_hook(form.host, calc).unwrap();

        assert_eq!(derived(&form.doc), "30.00");
    }

    #[test]
    fn test_input_outside_host_is_ignored() {
        let form = task_form();
        let elsewhere = form
            .doc
            .append_input(form.doc.root(), Some("notes"), "")
            .unwrap();
        let calc = TaskCalculator::for_document(form.doc.clone(), &CalculatorConfig::default());
        let _mounted = form.doc.mount_hook(form.host, calc).unwrap();

        // Written without an event, so only a recalculation would show it.
        form.doc.input(form.rate).unwrap().set_value("60");
        form.doc.input(form.minutes).unwrap().set_value("60");
        form.doc.type_text(elsewhere, "x").unwrap();
        assert_eq!(derived(&form.doc), "0.00");

        form.doc.type_text(form.minutes, "0").unwrap();
        assert_eq!(derived(&form.doc), "600.00");
    }

    #[test]
    fn test_lifecycle_transcript() {
        let form = task_form();
        let calc = TaskCalculator::for_document(form.doc.clone(), &CalculatorConfig::default());
        let mut transcript = Vec::new();
        let mut step = |label: &str, doc: &Document| {
            transcript.push(format!("{label:<14}-> {}", derived(doc)));
        };

        let mut mounted = form.doc.mount_hook(form.host, calc).unwrap();
        step("mount", &form.doc);
        form.doc.type_text(form.rate, "6").unwrap();
        step("type rate 6", &form.doc);
        form.doc.type_text(form.rate, "0").unwrap();
        step("type rate 0", &form.doc);
        form.doc.type_text(form.minutes, "4").unwrap();
        step("type len 4", &form.doc);
        form.doc.type_text(form.minutes, "5").unwrap();
        step("type len 5", &form.doc);
        form.doc.delete_backward(form.rate).unwrap();
        step("backspace rate", &form.doc);
        form.doc.set_input_value(form.minutes, "abc").unwrap();
        step("len abc", &form.doc);

        // Content refresh replaces the derived field; update fills it in.
        let out = form.doc.element_by_id("task_value_dollars").unwrap();
        form.doc.remove(out).unwrap();
        form.doc
            .append_input(form.host, Some("task_value_dollars"), "")
            .unwrap();
        form.doc.input(form.minutes).unwrap().set_value("90");
        mounted.update();
        step("refresh", &form.doc);

        mounted.destroy();
        form.doc.set_input_value(form.rate, "120").unwrap();
        step("after destroy", &form.doc);

        insta::assert_snapshot!(transcript.join("\n"), @r"
        mount         -> 0.00
        type rate 6   -> 0.00
        type rate 0   -> 0.00
        type len 4    -> 4.00
        type len 5    -> 45.00
        backspace rate-> 4.50
        len abc       -> 0.00
        refresh       -> 9.00
        after destroy -> 9.00
        ");
    }
}
