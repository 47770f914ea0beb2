// Canonical field layout of the National Insurance work-injury claim form.
// Every extraction record is shaped exactly like FORM_TEMPLATE.

/// A node of the schema template: either a text leaf or a named group of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaNode {
    Leaf,
    Group(&'static [SchemaField]),
}

/// A keyed entry of the template together with the label printed on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub key: &'static str,
    pub label: &'static str,
    pub node: SchemaNode,
}

const fn leaf(key: &'static str, label: &'static str) -> SchemaField {
    SchemaField {
        key,
        label,
        node: SchemaNode::Leaf,
    }
}

const fn group(key: &'static str, label: &'static str, fields: &'static [SchemaField]) -> SchemaField {
    SchemaField {
        key,
        label,
        node: SchemaNode::Group(fields),
    }
}

const DATE_FIELDS: &[SchemaField] = &[
    leaf("day", "יום"),
    leaf("month", "חודש"),
    leaf("year", "שנה"),
];

const ADDRESS_FIELDS: &[SchemaField] = &[
    leaf("street", "רחוב"),
    leaf("houseNumber", "מספר בית"),
    leaf("entrance", "כניסה"),
    leaf("apartment", "דירה"),
    leaf("city", "ישוב"),
    leaf("postalCode", "מיקוד"),
    leaf("poBox", "תא דואר"),
];

const MEDICAL_INSTITUTION_FIELDS: &[SchemaField] = &[
    leaf("healthFundMember", "חבר בקופת חולים"),
    leaf("natureOfAccident", "מהות התאונה"),
    leaf("medicalDiagnoses", "אבחנות רפואיות"),
];

const FORM_FIELDS: &[SchemaField] = &[
    leaf("lastName", "שם משפחה"),
    leaf("firstName", "שם פרטי"),
    leaf("idNumber", "מספר זהות"),
    leaf("gender", "מין"),
    group("dateOfBirth", "תאריך לידה", DATE_FIELDS),
    group("address", "כתובת", ADDRESS_FIELDS),
    leaf("landlinePhone", "טלפון קווי"),
    leaf("mobilePhone", "טלפון נייד"),
    leaf("jobType", "סוג העבודה"),
    group("dateOfInjury", "תאריך הפגיעה", DATE_FIELDS),
    leaf("timeOfInjury", "שעת הפגיעה"),
    leaf("accidentLocation", "מקום התאונה"),
    leaf("accidentAddress", "כתובת מקום התאונה"),
    leaf("accidentDescription", "תיאור התאונה"),
    leaf("injuredBodyPart", "האיבר שנפגע"),
    leaf("signature", "חתימה"),
    group("formFillingDate", "תאריך מילוי הטופס", DATE_FIELDS),
    group("formReceiptDateAtClinic", "תאריך קבלת הטופס בקופה", DATE_FIELDS),
    group(
        "medicalInstitutionFields",
        "למילוי ע\"י המוסד הרפואי",
        MEDICAL_INSTITUTION_FIELDS,
    ),
];

/// The process-wide, read-only schema template.
pub static FORM_TEMPLATE: SchemaNode = SchemaNode::Group(FORM_FIELDS);

// Well-known keys used by the validators and the corrector
pub const ID_NUMBER: &str = "idNumber";
pub const GENDER: &str = "gender";
pub const DATE_OF_BIRTH: &str = "dateOfBirth";
pub const MOBILE_PHONE: &str = "mobilePhone";
pub const LANDLINE_PHONE: &str = "landlinePhone";

impl SchemaNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, SchemaNode::Leaf)
    }

    /// Child fields of a group; empty for a leaf.
    pub fn fields(&self) -> &'static [SchemaField] {
        match self {
            SchemaNode::Leaf => &[],
            SchemaNode::Group(fields) => fields,
        }
    }

    /// Resolve a dotted path such as `address.city`.
    pub fn lookup(&self, path: &str) -> Option<&'static SchemaField> {
        let mut fields = self.fields();
        let mut found = None;
        for segment in path.split('.') {
            let field = fields.iter().find(|f| f.key == segment)?;
            fields = field.node.fields();
            found = Some(field);
        }
        found
    }

    /// Dotted paths of every leaf, in template order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaf_paths(self.fields(), "", &mut paths);
        paths
    }

    /// Every (label, dotted path) pair, groups included, in template order.
    pub fn labelled_paths(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        collect_labels(self.fields(), "", &mut out);
        out
    }
}

/// True for a group made of exactly the day/month/year parts.
pub fn is_date_group(fields: &[SchemaField]) -> bool {
    fields.iter().map(|f| f.key).eq(["day", "month", "year"])
}

pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn collect_leaf_paths(fields: &[SchemaField], prefix: &str, out: &mut Vec<String>) {
    for field in fields {
        let path = join_path(prefix, field.key);
        match field.node {
            SchemaNode::Leaf => out.push(path),
            SchemaNode::Group(children) => collect_leaf_paths(children, &path, out),
        }
    }
}

fn collect_labels(fields: &[SchemaField], prefix: &str, out: &mut Vec<(&'static str, String)>) {
    for field in fields {
        let path = join_path(prefix, field.key);
        out.push((field.label, path.clone()));
        // Date parts share their labels across every date group, list them once
        if let SchemaNode::Group(children) = field.node {
            if !is_date_group(children) {
                collect_labels(children, &path, out);
            }
        }
    }
}
