//! Smart-contract payloads carried on a transaction.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{WalletError, WalletResult};

/// Contract lifecycle action, encoded on the wire as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractAction {
    Send = 0,
    Deploy = 1,
    Call = 2,
}

impl ContractAction {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Send),
            1 => Some(Self::Deploy),
            2 => Some(Self::Call),
            _ => None,
        }
    }
}

impl Serialize for ContractAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for ContractAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Self::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown contract action {}", code)))
    }
}

/// Contract payload sent with `rawtransaction/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRequest {
    pub action: ContractAction,
    pub code: String,
    pub address: String,
    pub args: Vec<String>,
}

impl ContractRequest {
    /// Empty payload attached to plain transfers.
    pub fn transfer_placeholder() -> Self {
        Self {
            action: ContractAction::Send,
            code: String::new(),
            address: String::new(),
            args: Vec::new(),
        }
    }

    pub fn deploy(code: impl Into<String>) -> ContractRequestBuilder {
        ContractRequestBuilder::new(ContractAction::Deploy).code(code)
    }

    pub fn call(address: impl Into<String>) -> ContractRequestBuilder {
        ContractRequestBuilder::new(ContractAction::Call).address(address)
    }

    /// Check a deploy or call payload and normalize empty `args` to `[""]`.
    ///
    /// Fields are public, so payloads built by hand or decoded from JSON
    /// pass through here before they reach the node.
    pub fn validated(mut self) -> WalletResult<Self> {
        match self.action {
            ContractAction::Send => {
                return Err(WalletError::InvalidContract(
                    "plain transfers do not carry a contract payload".into(),
                ));
            }
            ContractAction::Deploy if self.code.trim().is_empty() => {
                return Err(WalletError::InvalidContract(
                    "deploy requires contract code".into(),
                ));
            }
            ContractAction::Call if self.address.trim().is_empty() => {
                return Err(WalletError::InvalidContract(
                    "call requires a contract address".into(),
                ));
            }
            _ => {}
        }

        if self.args.is_empty() {
            self.args.push(String::new());
        }
        Ok(self)
    }
}

/// Validating builder for deploy and call payloads.
#[derive(Debug, Clone)]
pub struct ContractRequestBuilder {
    action: ContractAction,
    code: String,
    address: String,
    args: Vec<String>,
}

impl ContractRequestBuilder {
    pub fn new(action: ContractAction) -> Self {
        Self {
            action,
            code: String::new(),
            address: String::new(),
            args: Vec::new(),
        }
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> WalletResult<ContractRequest> {
        ContractRequest {
            action: self.action,
            code: self.code,
            address: self.address,
            args: self.args,
        }
        .validated()
    }
}
