// Number of units in a single purchase, always >= 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(i32);

impl Quantity{
    pub fn parse(requested: i64) -> Result<Quantity, String>{
        if requested <= 0 {
            return Err(format!("quantity must be a positive integer, got {}", requested))
        }

        i32::try_from(requested)
            .map(Quantity)
            .map_err(|_| format!("quantity {} is too large", requested))
    }

    pub fn inner(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
