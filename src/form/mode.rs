/// Whether the form creates a listing or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit { record_id: String },
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit { .. })
    }

    pub fn record_id(&self) -> Option<&str> {
        match self {
            FormMode::Create => None,
            FormMode::Edit { record_id } => Some(record_id),
        }
    }
}
