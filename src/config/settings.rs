//! Settings validation, grounded on the teacher's `PrinterConfigValidator`
//! accumulate-then-report pattern.

use super::types::PrinterSettings;

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn new() -> Self {
        Self { valid: true, errors: Vec::new(), warnings: Vec::new() }
    }

    fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

pub struct PrintSettingsValidator;

impl PrintSettingsValidator {
    pub fn validate(&self, settings: &PrinterSettings) -> ValidationReport {
        let mut report = ValidationReport::new();

        let bv = &settings.build_volume;
        if bv.x_dim <= 0.0 || bv.y_dim <= 0.0 || bv.z_dim <= 0.0 {
            report.add_error(format!(
                "build volume dimensions must be positive, got ({}, {}, {})",
                bv.x_dim, bv.y_dim, bv.z_dim
            ));
        }

        let (_, coercion_warnings) = settings.slice.normalized();
        for w in coercion_warnings {
            report.add_warning(w);
        }

        report
    }
}
