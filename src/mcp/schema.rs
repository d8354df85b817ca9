//! Tool input contracts.
//!
//! Each tool declares the arguments it accepts as a type implementing
//! [`InputContract`]. Decoding turns the raw argument object of a
//! `tools/call` request into that type, or reports every violated field.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// One violated field and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid arguments: {}", join_violations(.0))]
    Invalid(Vec<Violation>),

    #[error("{0}")]
    CannotEncode(String),
}

impl SchemaError {
    pub fn violations(&self) -> &[Violation] {
        match self {
            SchemaError::Invalid(v) => v,
            SchemaError::CannotEncode(_) => &[],
        }
    }
}

/// Input contract of a tool.
pub trait InputContract: Sized {
    /// JSON Schema advertised in `tools/list`.
    fn json_schema() -> Value;

    /// Validate raw arguments. `null` is treated as an empty object.
    fn decode(args: &Value) -> Result<Self, SchemaError>;
}

// ============================================================================
// Field reader
// ============================================================================

/// Reads fields out of an argument object, collecting violations as it goes.
struct FieldReader<'a> {
    args: Option<&'a Map<String, Value>>,
    violations: Vec<Violation>,
}

impl<'a> FieldReader<'a> {
    fn new(args: &'a Value) -> Self {
        let mut reader = Self {
            args: None,
            violations: Vec::new(),
        };
        match args {
            Value::Object(map) => reader.args = Some(map),
            Value::Null => {}
            _ => reader.violation("arguments", "expected an object"),
        }
        reader
    }

    fn violation(&mut self, field: &str, reason: impl Into<String>) {
        self.violations.push(Violation {
            field: field.to_string(),
            reason: reason.into(),
        });
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.args
            .and_then(|m| m.get(field))
            .filter(|v| !v.is_null())
    }

    fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    fn optional_string(&mut self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.violation(field, "expected a string");
                None
            }
        }
    }

    fn required_string(&mut self, field: &str) -> Option<String> {
        if self.get(field).is_none() {
            self.violation(field, "is required");
            return None;
        }
        self.optional_string(field)
    }

    /// Non-negative integer. Numeric strings are coerced.
    fn optional_u64(&mut self, field: &str) -> Option<u64> {
        let parsed = match self.get(field)? {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64)
                    .map(|f| f as u64)
            }),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.violation(field, "expected a non-negative integer");
        }
        parsed
    }

    fn required_non_empty_string_list(&mut self, field: &str) -> Option<Vec<String>> {
        let value = match self.get(field) {
            Some(v) => v,
            None => {
                self.violation(field, "is required");
                return None;
            }
        };
        let items = match value {
            Value::Array(items) => items,
            _ => {
                self.violation(field, "expected a list of strings");
                return None;
            }
        };
        if items.is_empty() {
            self.violation(field, "must contain at least one entry");
            return None;
        }
        let strings: Option<Vec<String>> = items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect();
        if strings.is_none() {
            self.violation(field, "expected a list of strings");
        }
        strings
    }

    /// At least one of two fields must be supplied.
    fn at_least_one_of(&mut self, a: &str, a_present: bool, b: &str, b_present: bool) {
        if self.has_violation(a) || self.has_violation(b) {
            return;
        }
        if !a_present && !b_present {
            let field = format!("{}|{}", a, b);
            self.violation(&field, format!("one of {} or {} is required", a, b));
        }
    }

    fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, SchemaError> {
        if !self.violations.is_empty() {
            return Err(SchemaError::Invalid(self.violations));
        }
        build().ok_or_else(|| {
            SchemaError::Invalid(vec![Violation {
                field: "arguments".to_string(),
                reason: "incomplete".to_string(),
            }])
        })
    }
}

// ============================================================================
// Offsets
// ============================================================================

/// Locates a block by height or hash. Serializes as `{"height": n}` / `{"hash": h}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockOffset {
    Height(u64),
    Hash(String),
}

/// Locates a transaction by hash or identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionOffset {
    Hash(String),
    Identifier(String),
}

/// Locates a contract action by block or by transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractActionOffset {
    BlockOffset(BlockOffset),
    TransactionOffset(TransactionOffset),
}

// ============================================================================
// Contracts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoArgs {
    pub message: String,
}

impl InputContract for EchoArgs {
    fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "message": { "type": "string", "description": "Message to echo back" }
            },
            "required": ["message"]
        })
    }

    fn decode(args: &Value) -> Result<Self, SchemaError> {
        let mut reader = FieldReader::new(args);
        let message = reader.required_string("message");
        reader.finish(|| Some(EchoArgs { message: message? }))
    }
}

/// `get_latest_block` takes no arguments; any object is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestBlockArgs;

impl InputContract for LatestBlockArgs {
    fn json_schema() -> Value {
        json!({ "type": "object", "properties": {} })
    }

    fn decode(args: &Value) -> Result<Self, SchemaError> {
        FieldReader::new(args).finish(|| Some(LatestBlockArgs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockArgs {
    pub offset: BlockOffset,
}

impl InputContract for BlockArgs {
    fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "height": { "type": "integer", "minimum": 0, "description": "Block height" },
                "hash": { "type": "string", "description": "Hex-encoded block hash" }
            },
            "description": "One of height or hash; height wins when both are given"
        })
    }

    fn decode(args: &Value) -> Result<Self, SchemaError> {
        let mut reader = FieldReader::new(args);
        let height = reader.optional_u64("height");
        let hash = reader.optional_string("hash");
        reader.at_least_one_of("height", height.is_some(), "hash", hash.is_some());
        reader.finish(|| {
            let offset = match (height, hash) {
                (Some(h), _) => BlockOffset::Height(h),
                (None, Some(h)) => BlockOffset::Hash(h),
                (None, None) => return None,
            };
            Some(BlockArgs { offset })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionArgs {
    pub offset: TransactionOffset,
}

impl InputContract for TransactionArgs {
    fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "hash": { "type": "string", "description": "Hex-encoded transaction hash" },
                "identifier": { "type": "string", "description": "Hex-encoded transaction identifier" }
            },
            "description": "One of hash or identifier; hash wins when both are given"
        })
    }

    fn decode(args: &Value) -> Result<Self, SchemaError> {
        let mut reader = FieldReader::new(args);
        let hash = reader.optional_string("hash");
        let identifier = reader.optional_string("identifier");
        reader.at_least_one_of("hash", hash.is_some(), "identifier", identifier.is_some());
        reader.finish(|| {
            let offset = match (hash, identifier) {
                (Some(h), _) => TransactionOffset::Hash(h),
                (None, Some(i)) => TransactionOffset::Identifier(i),
                (None, None) => return None,
            };
            Some(TransactionArgs { offset })
        })
    }
}

/// Decoded from flat arguments (`address`, `block_height`, `block_hash`,
/// `tx_hash`, `tx_identifier`) into an address plus a tagged offset.
/// The transform is one-way: [`ContractActionArgs::encode`] always fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractActionArgs {
    pub address: String,
    pub offset: ContractActionOffset,
}

const OFFSET_FIELDS: [&str; 4] = ["block_height", "block_hash", "tx_hash", "tx_identifier"];

impl ContractActionArgs {
    /// Flattening an offset back into arguments is not supported.
    pub fn encode(&self) -> Result<Map<String, Value>, SchemaError> {
        Err(SchemaError::CannotEncode(
            "Cannot encode offset to arguments".to_string(),
        ))
    }
}

impl InputContract for ContractActionArgs {
    fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "address": { "type": "string", "description": "Hex-encoded contract address" },
                "block_height": { "type": "integer", "minimum": 0 },
                "block_hash": { "type": "string" },
                "tx_hash": { "type": "string" },
                "tx_identifier": { "type": "string" }
            },
            "required": ["address"],
            "description": "Address plus one offset; precedence is block_height, block_hash, tx_hash, tx_identifier"
        })
    }

    fn decode(args: &Value) -> Result<Self, SchemaError> {
        let mut reader = FieldReader::new(args);
        let address = reader.required_string("address");
        let block_height = reader.optional_u64("block_height");
        let block_hash = reader.optional_string("block_hash");
        let tx_hash = reader.optional_string("tx_hash");
        let tx_identifier = reader.optional_string("tx_identifier");

        let any_offset = block_height.is_some()
            || block_hash.is_some()
            || tx_hash.is_some()
            || tx_identifier.is_some();
        if !any_offset && !OFFSET_FIELDS.iter().any(|f| reader.has_violation(f)) {
            reader.violation(
                &OFFSET_FIELDS.join("|"),
                "one offset field is required",
            );
        }

        reader.finish(|| {
            let offset = if let Some(height) = block_height {
                ContractActionOffset::BlockOffset(BlockOffset::Height(height))
            } else if let Some(hash) = block_hash {
                ContractActionOffset::BlockOffset(BlockOffset::Hash(hash))
            } else if let Some(hash) = tx_hash {
                ContractActionOffset::TransactionOffset(TransactionOffset::Hash(hash))
            } else {
                ContractActionOffset::TransactionOffset(TransactionOffset::Identifier(
                    tx_identifier?,
                ))
            };
            Some(ContractActionArgs {
                address: address?,
                offset,
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DustGenerationStatusArgs {
    pub stake_keys: Vec<String>,
}

impl InputContract for DustGenerationStatusArgs {
    fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "stake_keys": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 1,
                    "description": "Hex-encoded Cardano stake keys"
                }
            },
            "required": ["stake_keys"]
        })
    }

    fn decode(args: &Value) -> Result<Self, SchemaError> {
        let mut reader = FieldReader::new(args);
        let stake_keys = reader.required_non_empty_string_list("stake_keys");
        reader.finish(|| {
            Some(DustGenerationStatusArgs {
                stake_keys: stake_keys?,
            })
        })
    }
}

// ============================================================================
// Contract operations (not enforced)
// ============================================================================

/// Endpoints of the network a contract operation targets. Passed per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub indexer: String,
    pub indexer_ws: String,
    pub node: String,
    pub proof_server: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployContractArgs {
    pub contract_type: String,
    pub wallet_seed: String,
    pub network_config: NetworkConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallContractArgs {
    pub contract_address: String,
    pub method: String,
    #[serde(default)]
    pub args: Option<Value>,
    pub wallet_seed: String,
    pub network_config: NetworkConfig,
}

impl DeployContractArgs {
    /// Best-effort parse; `None` when the arguments don't have this shape.
    pub fn parse(args: &Value) -> Option<Self> {
        serde_json::from_value(args.clone()).ok()
    }
}

impl CallContractArgs {
    pub fn parse(args: &Value) -> Option<Self> {
        serde_json::from_value(args.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(err: SchemaError) -> Vec<String> {
        err.violations().iter().map(|v| v.field.clone()).collect()
    }

    #[test]
    fn test_echo_requires_message() {
        assert_eq!(
            EchoArgs::decode(&json!({"message": "hi"})).unwrap().message,
            "hi"
        );
        let err = EchoArgs::decode(&json!({})).unwrap_err();
        assert_eq!(fields(err), vec!["message"]);
    }

    #[test]
    fn test_echo_rejects_non_string() {
        let err = EchoArgs::decode(&json!({"message": 3})).unwrap_err();
        assert_eq!(err.violations()[0].reason, "expected a string");
    }

    #[test]
    fn test_non_object_arguments() {
        let err = LatestBlockArgs::decode(&json!([1, 2])).unwrap_err();
        assert_eq!(fields(err), vec!["arguments"]);
        assert!(LatestBlockArgs::decode(&Value::Null).is_ok());
        assert!(LatestBlockArgs::decode(&json!({"ignored": true})).is_ok());
    }

    #[test]
    fn test_block_by_height_or_hash() {
        assert_eq!(
            BlockArgs::decode(&json!({"height": 5})).unwrap().offset,
            BlockOffset::Height(5)
        );
        assert_eq!(
            BlockArgs::decode(&json!({"hash": "ab"})).unwrap().offset,
            BlockOffset::Hash("ab".to_string())
        );
    }

    #[test]
    fn test_block_height_zero_is_present() {
        assert_eq!(
            BlockArgs::decode(&json!({"height": 0})).unwrap().offset,
            BlockOffset::Height(0)
        );
    }

    #[test]
    fn test_block_height_coerced_from_string() {
        assert_eq!(
            BlockArgs::decode(&json!({"height": "7"})).unwrap().offset,
            BlockOffset::Height(7)
        );
        let err = BlockArgs::decode(&json!({"height": "seven"})).unwrap_err();
        assert_eq!(fields(err), vec!["height"]);
    }

    #[test]
    fn test_block_requires_one_identifier() {
        let err = BlockArgs::decode(&json!({})).unwrap_err();
        assert_eq!(fields(err), vec!["height|hash"]);

        let err = BlockArgs::decode(&json!({"height": null, "hash": null})).unwrap_err();
        assert_eq!(fields(err), vec!["height|hash"]);
    }

    #[test]
    fn test_block_height_wins_over_hash() {
        assert_eq!(
            BlockArgs::decode(&json!({"height": 1, "hash": "ab"}))
                .unwrap()
                .offset,
            BlockOffset::Height(1)
        );
    }

    #[test]
    fn test_block_height_beyond_u64_rejected() {
        let err = BlockArgs::decode(&json!({"height": 18446744073709551616.0_f64})).unwrap_err();
        assert_eq!(fields(err), vec!["height"]);
    }

    #[test]
    fn test_block_offset_serializes_single_discriminant() {
        let offset = serde_json::to_value(BlockOffset::Height(5)).unwrap();
        assert_eq!(offset, json!({"height": 5}));
        let offset = serde_json::to_value(BlockOffset::Hash("ab".into())).unwrap();
        assert_eq!(offset, json!({"hash": "ab"}));
    }

    #[test]
    fn test_transaction_requires_one_identifier() {
        assert_eq!(
            TransactionArgs::decode(&json!({"identifier": "01"}))
                .unwrap()
                .offset,
            TransactionOffset::Identifier("01".to_string())
        );
        let err = TransactionArgs::decode(&json!({})).unwrap_err();
        assert_eq!(fields(err), vec!["hash|identifier"]);
    }

    #[test]
    fn test_transaction_hash_wins_over_identifier() {
        assert_eq!(
            TransactionArgs::decode(&json!({"hash": "h", "identifier": "i"}))
                .unwrap()
                .offset,
            TransactionOffset::Hash("h".to_string())
        );
    }

    #[test]
    fn test_contract_action_decodes_block_height() {
        let args =
            ContractActionArgs::decode(&json!({"address": "addr1", "block_height": 5})).unwrap();
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({"address": "addr1", "offset": {"blockOffset": {"height": 5}}})
        );
    }

    #[test]
    fn test_contract_action_offset_precedence() {
        let args = ContractActionArgs::decode(&json!({
            "address": "a",
            "block_hash": "bh",
            "tx_hash": "th"
        }))
        .unwrap();
        assert_eq!(
            args.offset,
            ContractActionOffset::BlockOffset(BlockOffset::Hash("bh".to_string()))
        );

        let args = ContractActionArgs::decode(&json!({
            "address": "a",
            "tx_hash": "th",
            "tx_identifier": "ti"
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(&args.offset).unwrap(),
            json!({"transactionOffset": {"hash": "th"}})
        );

        let args =
            ContractActionArgs::decode(&json!({"address": "a", "tx_identifier": "ti"})).unwrap();
        assert_eq!(
            serde_json::to_value(&args.offset).unwrap(),
            json!({"transactionOffset": {"identifier": "ti"}})
        );
    }

    #[test]
    fn test_contract_action_requires_address_and_offset() {
        let err = ContractActionArgs::decode(&json!({})).unwrap_err();
        let fields = fields(err);
        assert!(fields.contains(&"address".to_string()));
        assert!(fields.contains(&"block_height|block_hash|tx_hash|tx_identifier".to_string()));

        let err = ContractActionArgs::decode(&json!({"address": "a"})).unwrap_err();
        assert!(err.to_string().contains("one offset field is required"));
    }

    #[test]
    fn test_contract_action_encode_always_fails() {
        let args =
            ContractActionArgs::decode(&json!({"address": "addr1", "block_height": 5})).unwrap();
        let err = args.encode().unwrap_err();
        assert_eq!(
            err,
            SchemaError::CannotEncode("Cannot encode offset to arguments".to_string())
        );

        let args =
            ContractActionArgs::decode(&json!({"address": "x", "tx_identifier": "y"})).unwrap();
        assert!(matches!(args.encode(), Err(SchemaError::CannotEncode(_))));
    }

    #[test]
    fn test_dust_generation_status_rejects_empty_list() {
        let err = DustGenerationStatusArgs::decode(&json!({"stake_keys": []})).unwrap_err();
        assert_eq!(fields(err), vec!["stake_keys"]);

        let err = DustGenerationStatusArgs::decode(&json!({"stake_keys": ["a", 1]})).unwrap_err();
        assert_eq!(err.violations()[0].reason, "expected a list of strings");

        let args = DustGenerationStatusArgs::decode(&json!({"stake_keys": ["a", "b"]})).unwrap();
        assert_eq!(args.stake_keys, vec!["a", "b"]);
    }

    #[test]
    fn test_all_violations_are_reported() {
        let err = ContractActionArgs::decode(&json!({"address": 1, "block_height": -1}))
            .unwrap_err();
        assert_eq!(fields(err), vec!["address", "block_height"]);
    }

    #[test]
    fn test_deploy_contract_parse_is_lenient() {
        assert!(DeployContractArgs::parse(&json!({})).is_none());
        let args = DeployContractArgs::parse(&json!({
            "contract_type": "counter",
            "wallet_seed": "seed",
            "network_config": {
                "indexer": "http://i",
                "indexer_ws": "ws://i",
                "node": "http://n",
                "proof_server": "http://p"
            }
        }))
        .unwrap();
        assert_eq!(args.contract_type, "counter");
        assert_eq!(args.network_config.node, "http://n");
    }
}
