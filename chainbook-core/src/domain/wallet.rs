//! Wallet domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned wallet identifier
pub type WalletId = i64;

/// Chains offered by the create form. `Wallet::chain` stays a free-form
/// string, so anything the server returns is accepted.
pub const KNOWN_CHAINS: &[&str] = &["Ethereum", "Solana", "Bitcoin", "Arbitrum"];

/// Default chain for a fresh draft
pub const DEFAULT_CHAIN: &str = "Ethereum";

/// Analyst-assigned risk classification
///
/// Only drives presentation; nothing in the core branches on it except the
/// risk filter. The server stores a free-form string, so anything outside
/// the three known levels is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Other(String),
}

impl RiskLevel {
    /// Levels offered for input; `Other` only ever comes from the server
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Other(raw) => raw,
        }
    }

    /// Map a stored value onto a known level, keeping unrecognized text
    pub fn from_server(raw: &str) -> Self {
        raw.parse()
            .unwrap_or_else(|_| RiskLevel::Other(raw.to_string()))
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse for user input: only the known levels are accepted
impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level '{}'", other)),
        }
    }
}

impl Serialize for RiskLevel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Lenient: one odd record must not make the whole list undecodable
impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(RiskLevel::from_server(&value))
    }
}

/// A tracked blockchain address, as confirmed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub label: String,
    /// Opaque chain address; no chain-specific validation
    pub address: String,
    pub chain: String,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Create-form staging record: a wallet without its server-assigned id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub label: String,
    pub address: String,
    pub chain: String,
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            label: String::new(),
            address: String::new(),
            chain: DEFAULT_CHAIN.to_string(),
            risk_level: RiskLevel::Low,
            notes: None,
        }
    }
}

impl Draft {
    pub fn new(label: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = chain.into();
        self
    }

    pub fn with_risk(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    /// Blank notes are dropped rather than stored as an empty string
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        self
    }

    /// Presence check only: label, address and chain must be non-blank
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.label.trim().is_empty() {
            return Err("label is required");
        }
        if self.address.trim().is_empty() {
            return Err("address is required");
        }
        if self.chain.trim().is_empty() {
            return Err("chain is required");
        }
        Ok(())
    }

    /// Discard the scratch state after a successful submit or a cancel
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_parsing() {
        assert_eq!("high".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!(" Medium ".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert!("extreme".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_unknown_risk_kept_verbatim() {
        assert_eq!(RiskLevel::from_server("HIGH"), RiskLevel::High);
        assert_eq!(
            RiskLevel::from_server("Critical"),
            RiskLevel::Other("Critical".to_string())
        );
        assert_eq!(RiskLevel::from_server("").as_str(), "");
        assert!("Critical".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_list_with_unknown_risk_still_decodes() {
        let json = r#"[
            {"id":1,"label":"Alice","address":"0xAA","chain":"Ethereum","risk_level":"Low"},
            {"id":2,"label":"Mixer","address":"0xBB","chain":"Ethereum","risk_level":"Critical"},
            {"id":3,"label":"Blank","address":"0xCC","chain":"Solana","risk_level":""}
        ]"#;
        let wallets: Vec<Wallet> = serde_json::from_str(json).unwrap();
        assert_eq!(wallets.len(), 3);
        assert_eq!(wallets[0].risk_level, RiskLevel::Low);
        assert_eq!(wallets[1].risk_level, RiskLevel::Other("Critical".to_string()));

        // Written back exactly as received
        let value = serde_json::to_value(&wallets[1]).unwrap();
        assert_eq!(value["risk_level"], "Critical");
    }

    #[test]
    fn test_wallet_deserializes_server_shape() {
        let json = r#"{"id":7,"label":"Justin","address":"0xabc","chain":"Ethereum",
                       "risk_level":"High","notes":null,"owner_id":3}"#;
        let wallet: Wallet = serde_json::from_str(json).unwrap();
        assert_eq!(wallet.id, 7);
        assert_eq!(wallet.risk_level, RiskLevel::High);
        assert!(wallet.notes.is_none());
    }

    #[test]
    fn test_draft_defaults() {
        let draft = Draft::default();
        assert_eq!(draft.chain, "Ethereum");
        assert_eq!(draft.risk_level, RiskLevel::Low);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = Draft::new("Carol", "0xCC");
        assert!(draft.validate().is_ok());

        draft.address = "   ".to_string();
        assert_eq!(draft.validate(), Err("address is required"));
    }

    #[test]
    fn test_draft_reset_and_blank_notes() {
        let mut draft = Draft::new("Carol", "0xCC").with_notes("  ");
        assert!(draft.notes.is_none());

        draft.reset();
        assert_eq!(draft, Draft::default());
    }

    #[test]
    fn test_draft_serializes_without_id() {
        let draft = Draft::new("Carol", "0xCC").with_risk(RiskLevel::Medium);
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["risk_level"], "Medium");
        assert!(value.get("notes").is_none());
    }
}
