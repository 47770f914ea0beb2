use crate::config::ExtractorConfig;
use crate::extraction::{CompletionModel, Extraction, FieldExtractor, Pause, ThreadSleep};
use crate::models::{FormRecord, ValidationReport};
use crate::utils::FormError;
use crate::validation::RecordValidator;

/// A processed claim form: the extracted record and its validation report.
#[derive(Debug, Clone)]
pub struct ProcessedForm {
    pub extraction: Extraction,
    pub report: ValidationReport,
}

impl ProcessedForm {
    pub fn record(&self) -> &FormRecord {
        &self.extraction.record
    }

    pub fn is_valid(&self) -> bool {
        self.report.is_empty()
    }
}

pub struct FormProcessor<M, P = ThreadSleep> {
    extractor: FieldExtractor<M, P>,
}

impl<M: CompletionModel> FormProcessor<M, ThreadSleep> {
    pub fn new(model: M, config: ExtractorConfig) -> Result<Self, FormError> {
        Ok(FormProcessor {
            extractor: FieldExtractor::new(model, config)?,
        })
    }
}

impl<M: CompletionModel, P: Pause> FormProcessor<M, P> {
    pub fn from_extractor(extractor: FieldExtractor<M, P>) -> Self {
        FormProcessor { extractor }
    }

    // Extract the fields from OCR text, then validate the resulting record
    pub fn process(&self, ocr_text: &str) -> Result<ProcessedForm, FormError> {
        let extraction = self.extractor.extract_detailed(ocr_text)?;
        let report = RecordValidator::validate(&extraction.record);

        Ok(ProcessedForm { extraction, report })
    }
}
