use serde::Deserialize;

// Price as submitted by a seller: either a JSON number or a numeric string
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum PriceInput{
    Number(f64),
    Text(String)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPrice(f64);

impl UnitPrice{
    pub fn parse(input: PriceInput) -> Result<UnitPrice, String>{
        let value = match input {
            PriceInput::Number(n) => n,
            PriceInput::Text(text) => Self::parse_stored(&text)?.0
        };

        Self::check(value)
    }

    // Prices are persisted as text; anything unparsable there is a data fault
    pub fn parse_stored(stored: &str) -> Result<UnitPrice, String>{
        let value = stored.trim()
            .parse::<f64>()
            .map_err(|_| format!("{:?} is not a valid price", stored))?;

        Self::check(value)
    }

    fn check(value: f64) -> Result<UnitPrice, String>{
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{} is not a valid price, must be a non-negative number", value))
        }
        Ok(UnitPrice(value))
    }

    // None when the product overflows f64
    pub fn total_for(&self, quantity: i32) -> Option<f64> {
        Some(self.0 * f64::from(quantity)).filter(|total| total.is_finite())
    }

    pub fn inner(&self) -> f64 {
        self.0
    }

    pub fn to_stored(&self) -> String {
        self.0.to_string()
    }
}
