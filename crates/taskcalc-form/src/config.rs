/// Identifiers of the three task fields in the host document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIds {
    pub rate_per_hour: String,
    pub audio_length_minutes: String,
    pub task_value_dollars: String,
}

impl Default for FieldIds {
    fn default() -> Self {
        Self {
            rate_per_hour: "rate_per_hour".into(),
            audio_length_minutes: "audio_length_minutes".into(),
            task_value_dollars: "task_value_dollars".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculatorConfig {
    pub ids: FieldIds,
    /// Fractional digits written to the derived field.
    pub decimals: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            ids: FieldIds::default(),
            decimals: 2,
        }
    }
}
