//! Column vocabulary of the event schema.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EventRecord;
use crate::error::BatchError;

/// Named column of the event schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    EventTime,
    EntityId,
    ChainId,
    BlockNumber,
    ContractAddress,
    TxHash,
    Value,
    Attribute,
    GasUsed,
    CalldataSize,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::EventTime,
        Column::EntityId,
        Column::ChainId,
        Column::BlockNumber,
        Column::ContractAddress,
        Column::TxHash,
        Column::Value,
        Column::Attribute,
        Column::GasUsed,
        Column::CalldataSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::EventTime => "event_time",
            Column::EntityId => "entity_id",
            Column::ChainId => "chain_id",
            Column::BlockNumber => "block_number",
            Column::ContractAddress => "contract_address",
            Column::TxHash => "tx_hash",
            Column::Value => "value",
            Column::Attribute => "attribute",
            Column::GasUsed => "gas_used",
            Column::CalldataSize => "calldata_size",
        }
    }

    /// Whether the record has no usable value in this column.
    ///
    /// Text columns are missing when empty, float columns when NaN.
    /// Integer and timestamp columns are always present.
    pub fn is_missing(&self, record: &EventRecord) -> bool {
        match self {
            Column::ContractAddress => record.contract_address.trim().is_empty(),
            Column::TxHash => record.tx_hash.trim().is_empty(),
            Column::Value => record.value.is_nan(),
            Column::Attribute => record.attribute.is_nan(),
            Column::GasUsed => record.gas_used.is_nan(),
            Column::EventTime
            | Column::EntityId
            | Column::ChainId
            | Column::BlockNumber
            | Column::CalldataSize => false,
        }
    }

    /// Canonical text of this column's value, used to build dedup keys.
    pub fn key_of(&self, record: &EventRecord) -> String {
        match self {
            Column::EventTime => record.event_time.timestamp_nanos_opt().map_or_else(
                || record.event_time.to_rfc3339(),
                |nanos| nanos.to_string(),
            ),
            Column::EntityId => record.entity_id.to_string(),
            Column::ChainId => record.chain_id.to_string(),
            Column::BlockNumber => record.block_number.to_string(),
            Column::ContractAddress => record.contract_address.clone(),
            Column::TxHash => record.tx_hash.clone(),
            Column::Value => record.value.to_bits().to_string(),
            Column::Attribute => record.attribute.to_bits().to_string(),
            Column::GasUsed => record.gas_used.to_bits().to_string(),
            Column::CalldataSize => record.calldata_size.to_string(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|column| column.as_str() == name)
            .ok_or_else(|| BatchError::UnknownColumn(name.to_string()))
    }
}
