use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::Value;

/// One input row. Every field is kept as text; `total_amount` is coerced to
/// a number when nodes are built.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub fuel: String,
    #[serde(default)]
    pub doors: String,
    #[serde(default, rename = "fuel-system")]
    pub fuel_system: String,
    #[serde(default, rename = "bodyStyle")]
    pub body_style: String,
}

impl RawRecord {
    pub fn new(group: &str, total_amount: &str) -> Self {
        Self {
            group: group.to_string(),
            total_amount: total_amount.to_string(),
            ..Default::default()
        }
    }

    pub fn with_fuel(mut self, fuel: &str) -> Self {
        self.fuel = fuel.to_string();
        self
    }

    pub fn with_doors(mut self, doors: &str) -> Self {
        self.doors = doors.to_string();
        self
    }

    pub fn with_fuel_system(mut self, fuel_system: &str) -> Self {
        self.fuel_system = fuel_system.to_string();
        self
    }

    pub fn with_body_style(mut self, body_style: &str) -> Self {
        self.body_style = body_style.to_string();
        self
    }
}

/// Parse records from a JSON array of objects.
///
/// Numbers and booleans are accepted for any field and stored in their
/// textual form, the same shape a CSV row would have.
pub fn records_from_json(value: &Value) -> Result<Vec<RawRecord>> {
    let array = value.as_array().ok_or_else(||
        anyhow!("Input data must be a JSON array of objects")
    )?;

    let mut records = Vec::with_capacity(array.len());
    for (idx, item) in array.iter().enumerate() {
        let obj = item.as_object().ok_or_else(||
            anyhow!("Item {} in array must be an object", idx)
        )?;

        let field = |name: &str| -> Result<String> {
            match obj.get(name) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(Value::Number(n)) => Ok(n.to_string()),
                Some(Value::Bool(b)) => Ok(b.to_string()),
                Some(Value::Null) | None => Ok(String::new()),
                _ => Err(anyhow!("Unsupported value type for field '{}' in item {}", name, idx)),
            }
        };

        records.push(RawRecord {
            group: field("group")?,
            total_amount: field("total_amount")?,
            fuel: field("fuel")?,
            doors: field("doors")?,
            fuel_system: field("fuel-system")?,
            body_style: field("bodyStyle")?,
        });
    }

    Ok(records)
}
