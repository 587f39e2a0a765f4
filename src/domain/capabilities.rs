use serde::{Deserialize, Serialize};

// What a user is allowed to do on the marketplace
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities{
    pub can_buy: bool,
    pub can_sell: bool
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities{
            can_buy: true,
            can_sell: true
        }
    }
}

// Verified caller, produced by token validation before any core logic runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity{
    pub id: i32,
    pub capabilities: Capabilities
}
