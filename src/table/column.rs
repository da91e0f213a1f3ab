use crate::table::value::Value;

/// Inferred column data types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    /// Every present value is a number
    Number,
    /// Text, or a mix of text and numbers
    Text,
}

/// A named column of values sharing one inferred type.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub(crate) name: String,
    pub(crate) kind: ColumnType,
    pub(crate) values: Vec<Value>,
}

impl ColumnType {
    /// Returns the display name of the column type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Number => "number",
            ColumnType::Text => "text",
        }
    }

    /// Type contributed by a single value; missing values carry no type.
    pub(crate) fn from(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(_) => Some(ColumnType::Number),
            Value::Text(_) => Some(ColumnType::Text),
        }
    }

    /// Detects the most specific common type from a collection of candidate types.
    /// A column without any present value is numeric, so it stays eligible
    /// for numeric cleaning.
    pub(crate) fn detect<I>(types: I) -> ColumnType
    where
        I: IntoIterator<Item = Option<ColumnType>>,
    {
        let mut types = types.into_iter().flatten();
        if types.all(|kind| kind.is_number()) {
            ColumnType::Number
        } else {
            ColumnType::Text
        }
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, ColumnType::Number)
    }
}

impl Column {
    /// Creates a column from already typed values.
    /// When text and numbers are mixed, numbers are kept as their text form.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let kind = ColumnType::detect(values.iter().map(ColumnType::from));
        let values = match kind {
            ColumnType::Number => values,
            ColumnType::Text => values
                .into_iter()
                .map(|value| match value {
                    Value::Number(_) => Value::Text(value.to_string()),
                    _ => value,
                })
                .collect(),
        };
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Creates a column from raw loaded values, promoting it to numeric when
    /// every present value parses as a number.
    pub(crate) fn infer(name: impl Into<String>, values: Vec<Value>) -> Self {
        let numbers: Option<Vec<Value>> = values.iter().map(parse_number).collect();
        match numbers {
            Some(numbers) => Column {
                name: name.into(),
                kind: ColumnType::Number,
                values: numbers,
            },
            None => Column::new(name, values),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnType {
        self.kind
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing values.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_null()).count()
    }

    /// Copies the rows selected by `indexes`, in that order.
    pub(crate) fn take(&self, indexes: &[usize]) -> Column {
        Column {
            name: self.name.to_owned(),
            kind: self.kind,
            values: indexes.iter().map(|index| self.values[*index].clone()).collect(),
        }
    }
}

/// Numeric reading of a raw value; `None` when the value is not numeric.
/// A text that parses to NaN counts as missing.
fn parse_number(value: &Value) -> Option<Value> {
    match value {
        Value::Null | Value::Number(_) => Some(value.clone()),
        Value::Text(text) => {
            let number = text.trim().parse::<f64>().ok()?;
            if number.is_nan() {
                Some(Value::Null)
            } else {
                Some(Value::Number(number))
            }
        }
    }
}
