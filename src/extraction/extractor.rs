use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::config::ExtractorConfig;
use crate::extraction::model::{CompletionModel, CompletionRequest, Pause, ThreadSleep};
use crate::extraction::prompt;
use crate::extraction::response::ResponseParser;
use crate::extraction::retry::RetryPolicy;
use crate::models::schema::{FORM_TEMPLATE, ID_NUMBER, MOBILE_PHONE};
use crate::models::FormRecord;
use crate::processing::{Correction, DigitRecovery, DigitTarget, FieldCorrection, TemplateMerge};
use crate::utils::FormError;
use crate::validation::{IdNumberValidator, PhoneValidator};

/// Pipeline stages, in order. A request ends in `Done` or fails with
/// `FormError::ExtractionFailed`; there is no partial result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    CallingModel,
    Parsing,
    Merging,
    Recovering,
    Correcting,
    Done,
}

/// A finished extraction and how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub record: FormRecord,
    /// Model calls made, the successful one included.
    pub attempts: u32,
    /// Values replaced by numbers recovered from the OCR text.
    pub recovered: Vec<Correction>,
    pub corrections: Vec<Correction>,
}

/// Drives the model call and turns its answer into a schema-shaped record.
pub struct FieldExtractor<M, P = ThreadSleep> {
    model: M,
    pause: P,
    config: ExtractorConfig,
    retry: RetryPolicy,
    parser: ResponseParser,
}

impl<M: CompletionModel> FieldExtractor<M, ThreadSleep> {
    pub fn new(model: M, config: ExtractorConfig) -> Result<Self, FormError> {
        config.validate()?;
        Ok(FieldExtractor {
            model,
            pause: ThreadSleep,
            retry: RetryPolicy::from_config(&config),
            config,
            parser: ResponseParser::new(),
        })
    }
}

impl<M: CompletionModel, P: Pause> FieldExtractor<M, P> {
    /// Swap the delay used between attempts.
    pub fn with_pause<Q: Pause>(self, pause: Q) -> FieldExtractor<M, Q> {
        FieldExtractor {
            model: self.model,
            pause,
            config: self.config,
            retry: self.retry,
            parser: self.parser,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn extract(&self, ocr_text: &str) -> Result<FormRecord, FormError> {
        self.extract_detailed(ocr_text).map(|extraction| extraction.record)
    }

    pub fn extract_detailed(&self, ocr_text: &str) -> Result<Extraction, FormError> {
        let request = prompt::build_request(&FORM_TEMPLATE, ocr_text, &self.config);
        let (object, attempts) = self.request_object(&request)?;

        debug!("Stage {:?}", ExtractionStage::Merging);
        let mut record = TemplateMerge::reconcile(&FORM_TEMPLATE, &Value::Object(object));

        let recovered = if self.config.enable_recovery {
            debug!("Stage {:?}", ExtractionStage::Recovering);
            Self::recover(&mut record, ocr_text)
        } else {
            Vec::new()
        };

        let corrections = if self.config.enable_corrections {
            debug!("Stage {:?}", ExtractionStage::Correcting);
            FieldCorrection::apply(&mut record)
        } else {
            Vec::new()
        };

        debug!("Stage {:?} after {} attempt(s)", ExtractionStage::Done, attempts);
        Ok(Extraction {
            record,
            attempts,
            recovered,
            corrections,
        })
    }

    /// Call the model until its answer parses, pausing between attempts.
    fn request_object(&self, request: &CompletionRequest) -> Result<(Map<String, Value>, u32), FormError> {
        let max_attempts = self.retry.max_attempts;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if let Some(delay) = self.retry.delay_before(attempt) {
                debug!("Waiting {:?} before attempt {}/{}", delay, attempt, max_attempts);
                self.pause.pause(delay);
            }

            match self.attempt(request) {
                Ok(object) => return Ok((object, attempt)),
                Err(err) => {
                    warn!("Extraction attempt {}/{} failed: {}", attempt, max_attempts, err);
                    last_error = Some(err);
                }
            }
        }

        Err(FormError::ExtractionFailed {
            attempts: max_attempts,
            cause: last_error.map(|err| err.to_string()).unwrap_or_default(),
        })
    }

    fn attempt(&self, request: &CompletionRequest) -> Result<Map<String, Value>, FormError> {
        debug!("Stage {:?}", ExtractionStage::CallingModel);
        let response = self
            .model
            .complete(request)
            .map_err(|err| FormError::ModelCall(err.to_string()))?;

        debug!("Stage {:?}", ExtractionStage::Parsing);
        self.parser.parse(&response)
    }

    /// Replace an empty or invalid ID/mobile with a number found in the OCR
    /// text. A model value that already validates is never touched, and a
    /// failed scan keeps whatever the model produced.
    fn recover(record: &mut FormRecord, ocr_text: &str) -> Vec<Correction> {
        let targets = [
            (ID_NUMBER, DigitTarget::IdNumber),
            (MOBILE_PHONE, DigitTarget::Mobile),
        ];

        let mut recovered = Vec::new();
        for &(field, target) in targets.iter() {
            let current = record.text(field).to_string();
            if Self::usable(target, &current) {
                continue;
            }
            match DigitRecovery::recover(ocr_text, target) {
                Some(number) => {
                    info!("Recovered {} '{}' from OCR text (model gave '{}')", field, number, current);
                    record.set_text(field, number.clone());
                    recovered.push(Correction {
                        field,
                        before: current,
                        after: number,
                    });
                }
                None => debug!("No {} candidate in OCR text, keeping '{}'", field, current),
            }
        }
        recovered
    }

    fn usable(target: DigitTarget, value: &str) -> bool {
        match target {
            DigitTarget::IdNumber => !value.is_empty() && IdNumberValidator::is_valid(value),
            DigitTarget::Mobile => PhoneValidator::is_valid_mobile(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::BoxError;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::time::Duration;

    struct ScriptedModel {
        replies: RefCell<VecDeque<Result<String, String>>>,
        calls: Cell<u32>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<&str, &str>>) -> Self {
            ScriptedModel {
                replies: RefCell::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                calls: Cell::new(0),
            }
        }
    }

    impl CompletionModel for ScriptedModel {
        fn complete(&self, _request: &CompletionRequest) -> Result<String, BoxError> {
            self.calls.set(self.calls.get() + 1);
            match self.replies.borrow_mut().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(message)) => Err(message.into()),
                None => Err("script exhausted".into()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingPause(RefCell<Vec<Duration>>);

    impl Pause for RecordingPause {
        fn pause(&self, duration: Duration) {
            self.0.borrow_mut().push(duration);
        }
    }

    fn extractor<'a>(
        model: &'a ScriptedModel,
        pause: &'a RecordingPause,
        config: ExtractorConfig,
    ) -> FieldExtractor<&'a ScriptedModel, &'a RecordingPause> {
        FieldExtractor::new(model, config).unwrap().with_pause(pause)
    }

    #[test]
    fn first_good_answer_is_merged_without_waiting() {
        let model = ScriptedModel::new(vec![Ok(
            "```json\n{\"lastName\": \"כהן\", \"idNumber\": \"123456782\", \"mobilePhone\": \"0541234567\"}\n```",
        )]);
        let pause = RecordingPause::default();
        let extraction = extractor(&model, &pause, ExtractorConfig::default())
            .extract_detailed("")
            .unwrap();

        assert_eq!(extraction.attempts, 1);
        assert_eq!(extraction.record.text("lastName"), "כהן");
        assert_eq!(extraction.record.text("address.city"), "");
        assert!(extraction.recovered.is_empty());
        assert!(extraction.corrections.is_empty());
        assert!(pause.0.borrow().is_empty());
    }

    #[test]
    fn exhausted_retries_fail_with_the_last_cause() {
        let model = ScriptedModel::new(vec![Err("timeout"), Err("rate limited"), Err("bad gateway")]);
        let pause = RecordingPause::default();
        let result = extractor(&model, &pause, ExtractorConfig::default()).extract("text");

        match result {
            Err(FormError::ExtractionFailed { attempts, cause }) => {
                assert_eq!(attempts, 3);
                assert!(cause.contains("bad gateway"), "{}", cause);
            }
            other => panic!("expected extraction failure, got {:?}", other),
        }
        assert_eq!(model.calls.get(), 3);
        assert_eq!(
            *pause.0.borrow(),
            vec![Duration::from_millis(1500), Duration::from_millis(3000)]
        );
    }

    #[test]
    fn malformed_output_is_retried_like_a_call_failure() {
        let model = ScriptedModel::new(vec![
            Ok("Sorry, I cannot help with that."),
            Err("connection reset"),
            Ok("{\"firstName\": \"דנה\"}"),
        ]);
        let pause = RecordingPause::default();
        let extraction = extractor(&model, &pause, ExtractorConfig::default())
            .extract_detailed("")
            .unwrap();

        assert_eq!(extraction.attempts, 3);
        assert_eq!(extraction.record.text("firstName"), "דנה");
        assert_eq!(pause.0.borrow().len(), 2);
    }

    #[test]
    fn invalid_numbers_are_recovered_from_ocr_text() {
        let model = ScriptedModel::new(vec![Ok(
            "{\"idNumber\": \"123456789\", \"mobilePhone\": \"\"}",
        )]);
        let pause = RecordingPause::default();
        let ocr = "ת.ז: 1 2 3 4 5 6 7 8 2\nמספר זהות 123456782\nטלפון נייד 0541234567";
        let extraction = extractor(&model, &pause, ExtractorConfig::default())
            .extract_detailed(ocr)
            .unwrap();

        assert_eq!(extraction.record.text("idNumber"), "123456782");
        assert_eq!(extraction.record.text("mobilePhone"), "0541234567");
        assert_eq!(extraction.recovered.len(), 2);
        assert_eq!(extraction.recovered[0].before, "123456789");
    }

    #[test]
    fn valid_model_values_are_never_replaced() {
        let model = ScriptedModel::new(vec![Ok(
            "{\"idNumber\": \"000000018\", \"mobilePhone\": \"0529876543\"}",
        )]);
        let pause = RecordingPause::default();
        let ocr = "123456782 0541234567";
        let record = extractor(&model, &pause, ExtractorConfig::default())
            .extract(ocr)
            .unwrap();

        assert_eq!(record.text("idNumber"), "000000018");
        assert_eq!(record.text("mobilePhone"), "0529876543");
    }

    #[test]
    fn failed_recovery_keeps_the_model_value_then_corrects_it() {
        let model = ScriptedModel::new(vec![Ok(
            "{\"idNumber\": \"12345678\", \"mobilePhone\": \"541234567\"}",
        )]);
        let pause = RecordingPause::default();
        let extraction = extractor(&model, &pause, ExtractorConfig::default())
            .extract_detailed("no numbers in this scan")
            .unwrap();

        assert!(extraction.recovered.is_empty());
        assert_eq!(extraction.record.text("idNumber"), "012345678");
        assert_eq!(extraction.record.text("mobilePhone"), "0541234567");
        assert_eq!(extraction.corrections.len(), 2);
    }

    #[test]
    fn recovery_and_corrections_can_be_switched_off() {
        let model = ScriptedModel::new(vec![Ok("{\"idNumber\": \"123456789\", \"mobilePhone\": \"541234567\"}")]);
        let pause = RecordingPause::default();
        let config = ExtractorConfig {
            enable_recovery: false,
            enable_corrections: false,
            ..ExtractorConfig::default()
        };
        let record = extractor(&model, &pause, config)
            .extract("123456782 0541234567")
            .unwrap();

        assert_eq!(record.text("idNumber"), "123456789");
        assert_eq!(record.text("mobilePhone"), "541234567");
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let model = ScriptedModel::new(Vec::new());
        let config = ExtractorConfig {
            max_attempts: 0,
            ..ExtractorConfig::default()
        };
        assert!(matches!(
            FieldExtractor::new(&model, config),
            Err(FormError::Config(_))
        ));
    }
}
