use serde_json::Value;

/// The kinds of form this service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Booking,
    Contact,
}

impl FormKind {
    pub fn schema(self) -> &'static FormSchema {
        match self {
            FormKind::Booking => &BOOKING,
            FormKind::Contact => &CONTACT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Integer { min: i64, max: i64 },
    Boolean,
    /// Text that should look like `YYYY-MM-DD`. Checked as a warning only.
    Date,
    /// Text that should look like `HH:MM` or `HH:MM:SS`. Checked as a warning only.
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Null,
    Text(&'static str),
    Bool(bool),
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Null => Value::Null,
            DefaultValue::Text(s) => Value::String(s.to_string()),
            DefaultValue::Bool(b) => Value::Bool(b),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Key in the submitted payload.
    pub field: &'static str,
    /// Column in the target table.
    pub column: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Applied when an optional field is absent.
    pub default: Option<DefaultValue>,
}

impl FieldSpec {
    const fn required(field: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            field,
            column: field,
            kind,
            required: true,
            default: None,
        }
    }

    const fn optional(field: &'static str, kind: FieldKind, default: DefaultValue) -> Self {
        FieldSpec {
            field,
            column: field,
            kind,
            required: false,
            default: Some(default),
        }
    }
}

#[derive(Debug)]
pub struct FormSchema {
    pub kind: FormKind,
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
    /// Columns written with a constant value on every insert.
    pub fixed: &'static [(&'static str, &'static str)],
    /// Columns requested back from the datastore.
    pub returning: &'static [&'static str],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.field == name)
    }
}

pub const GUESTS_MIN: i64 = 1;
pub const GUESTS_MAX: i64 = 10;

pub static BOOKING: FormSchema = FormSchema {
    kind: FormKind::Booking,
    table: "bookings",
    fields: &[
        FieldSpec::required("name", FieldKind::Text),
        FieldSpec::required("phone", FieldKind::Text),
        FieldSpec::required("email", FieldKind::Email),
        FieldSpec::required(
            "guests",
            FieldKind::Integer {
                min: GUESTS_MIN,
                max: GUESTS_MAX,
            },
        ),
        FieldSpec::required("date", FieldKind::Date),
        FieldSpec::required("time", FieldKind::Time),
        FieldSpec::optional("table_type", FieldKind::Text, DefaultValue::Text("standard")),
        FieldSpec::optional("special_requests", FieldKind::Text, DefaultValue::Null),
        FieldSpec::optional("newsletter", FieldKind::Boolean, DefaultValue::Bool(false)),
    ],
    fixed: &[("status", "confirmed")],
    returning: &["id", "created_at"],
};

pub static CONTACT: FormSchema = FormSchema {
    kind: FormKind::Contact,
    table: "messages",
    fields: &[
        FieldSpec::required("name", FieldKind::Text),
        FieldSpec::required("email", FieldKind::Email),
        FieldSpec::required("message", FieldKind::Text),
    ],
    fixed: &[],
    returning: &["id", "created_at"],
};
