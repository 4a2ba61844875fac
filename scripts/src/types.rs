//! Type definitions used throughout the commands

use std::fmt::{self, Display};

use serde::Deserialize;

/// The status of a transaction as reported by the feeder gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// The gateway has not seen the transaction
    NotReceived,
    /// The transaction is waiting to be included in a block
    Received,
    /// The transaction is in a pending block
    Pending,
    /// The transaction failed validation
    Rejected,
    /// The transaction was included but its execution reverted
    Reverted,
    /// The transaction is in an L2 block
    AcceptedOnL2,
    /// The transaction's block was proven on L1
    AcceptedOnL1,
    /// A status this client does not know about, kept verbatim
    Unknown(String),
}

impl From<&str> for TransactionStatus {
    fn from(status: &str) -> Self {
        match status {
            "NOT_RECEIVED" => TransactionStatus::NotReceived,
            "RECEIVED" => TransactionStatus::Received,
            "PENDING" => TransactionStatus::Pending,
            "REJECTED" => TransactionStatus::Rejected,
            "REVERTED" => TransactionStatus::Reverted,
            "ACCEPTED_ON_L2" => TransactionStatus::AcceptedOnL2,
            "ACCEPTED_ON_L1" => TransactionStatus::AcceptedOnL1,
            other => TransactionStatus::Unknown(other.to_string()),
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::NotReceived => write!(f, "NOT_RECEIVED"),
            TransactionStatus::Received => write!(f, "RECEIVED"),
            TransactionStatus::Pending => write!(f, "PENDING"),
            TransactionStatus::Rejected => write!(f, "REJECTED"),
            TransactionStatus::Reverted => write!(f, "REVERTED"),
            TransactionStatus::AcceptedOnL2 => write!(f, "ACCEPTED_ON_L2"),
            TransactionStatus::AcceptedOnL1 => write!(f, "ACCEPTED_ON_L1"),
            TransactionStatus::Unknown(status) => write!(f, "{}", status),
        }
    }
}

/// The receipt printed by `starknet tx_status`
#[derive(Debug, Deserialize)]
pub struct TransactionReceipt {
    /// The raw status string, absent if the client printed something unexpected
    pub tx_status: Option<String>,
    /// The block the transaction was included in, if any
    pub block_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::TransactionStatus;

    #[test]
    fn test_status_display_matches_gateway() {
        for status in [
            "NOT_RECEIVED",
            "RECEIVED",
            "PENDING",
            "REJECTED",
            "REVERTED",
            "ACCEPTED_ON_L2",
            "ACCEPTED_ON_L1",
            "SOMETHING_NEW",
        ] {
            assert_eq!(TransactionStatus::from(status).to_string(), status);
        }

        assert_eq!(
            TransactionStatus::from("SOMETHING_NEW"),
            TransactionStatus::Unknown("SOMETHING_NEW".to_string())
        );
    }
}
