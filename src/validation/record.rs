use crate::models::schema::{
    join_path, SchemaField, SchemaNode, DATE_OF_BIRTH, FORM_TEMPLATE, GENDER, ID_NUMBER,
    LANDLINE_PHONE, MOBILE_PHONE,
};
use crate::models::{FormRecord, ValidationIssue, ValidationReport};
use crate::processing::FieldCorrection;
use crate::validation::{DateValidator, GenderValidator, IdNumberValidator, PhoneValidator};

/// Checks a completed record and reports every problem it finds.
///
/// Two passes always run: a template walk that flags empty leaves under their
/// dotted path, then format checks keyed by the field's own name.
pub struct RecordValidator;

impl RecordValidator {
    pub fn validate(record: &FormRecord) -> ValidationReport {
        let mut report = ValidationReport::new();
        Self::check_missing(FORM_TEMPLATE.fields(), record, "", &mut report);
        Self::check_formats(record, &mut report);
        report
    }

    fn check_missing(
        fields: &[SchemaField],
        record: &FormRecord,
        prefix: &str,
        report: &mut ValidationReport,
    ) {
        for field in fields {
            let path = join_path(prefix, field.key);
            match field.node {
                SchemaNode::Group(children) => Self::check_missing(children, record, &path, report),
                SchemaNode::Leaf => {
                    if record.text(&path).is_empty() {
                        report.push(path, ValidationIssue::missing());
                    }
                }
            }
        }
    }

    fn check_formats(record: &FormRecord, report: &mut ValidationReport) {
        if !IdNumberValidator::is_valid(record.text(ID_NUMBER)) {
            report.push(ID_NUMBER, ValidationIssue::invalid("Invalid Israeli ID number"));
        }

        let date_part = |part: &str| record.text(&join_path(DATE_OF_BIRTH, part)).to_string();
        if !DateValidator::is_valid(&date_part("day"), &date_part("month"), &date_part("year")) {
            report.push(DATE_OF_BIRTH, ValidationIssue::invalid("Invalid date"));
        }

        let mobile = record.text(MOBILE_PHONE);
        if !mobile.is_empty() && !PhoneValidator::is_valid_mobile(mobile) {
            let suggestion = FieldCorrection::fix_mobile(mobile)
                .filter(|fixed| PhoneValidator::is_valid_mobile(fixed));
            report.push(
                MOBILE_PHONE,
                ValidationIssue::invalid("Invalid mobile format (05xxxxxxxx)").with_suggestion(suggestion),
            );
        }

        let landline = record.text(LANDLINE_PHONE);
        if !landline.is_empty() && !PhoneValidator::is_valid_landline(landline) {
            let restored = format!("0{}", landline);
            let suggestion = Some(restored).filter(|fixed| PhoneValidator::is_valid_landline(fixed));
            report.push(
                LANDLINE_PHONE,
                ValidationIssue::invalid("Invalid landline format").with_suggestion(suggestion),
            );
        }

        let gender = record.text(GENDER);
        if !GenderValidator::is_valid(gender) {
            report.push(
                GENDER,
                ValidationIssue::invalid("Unrecognised gender value")
                    .with_suggestion(GenderValidator::suggest(gender)),
            );
        }
    }
}
