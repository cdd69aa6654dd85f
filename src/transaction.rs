use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One submitted transaction. Field names follow the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,

    pub user_id: u64,

    /// Minor currency units. Negative values are accepted as-is.
    pub amount_us_cents: i64,

    /// Payment instrument identity
    pub card_id: u64,
}

impl Transaction {
    pub fn new(id: u64, user_id: u64, amount_us_cents: i64, card_id: u64) -> Self {
        Transaction {
            id,
            user_id,
            amount_us_cents,
            card_id,
        }
    }
}

/// A transaction together with its 1-based position in the submitted batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedTransaction {
    pub position: usize,
    pub transaction: Transaction,
}

/// Request body for a batch assessment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionsInput {
    pub transactions: Vec<Transaction>,
}

/// Load transactions from a CSV file with an `id,user_id,amount_us_cents,card_id` header
pub fn load_csv(csv_path: &Path) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;

    let mut transactions = Vec::new();

    for (index, result) in rdr.deserialize().enumerate() {
        let transaction: Transaction = result
            .with_context(|| format!("Failed to deserialize transaction on row {}", index + 1))?;
        transactions.push(transaction);
    }

    Ok(transactions)
}

/// Load transactions from a JSON file. Accepts either the request envelope
/// `{"transactions": [...]}` or a bare array.
pub fn load_json(json_path: &Path) -> Result<Vec<Transaction>> {
    let content = fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {:?}", json_path))?;

    let value: serde_json::Value =
        serde_json::from_str(&content).context("Failed to parse transactions JSON")?;

    if value.is_array() {
        return serde_json::from_value(value).context("Failed to deserialize transaction list");
    }

    let input: TransactionsInput =
        serde_json::from_value(value).context("Failed to deserialize transactions envelope")?;
    Ok(input.transactions)
}

/// Pick a loader by file extension
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => load_csv(path),
        Some("json") => load_json(path),
        other => bail!(
            "Unsupported transactions file extension {:?} for {:?} (expected .csv or .json)",
            other,
            path
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_deserialize_wire_format() {
        let json = r#"{"id": 1, "user_id": 2, "amount_us_cents": -300, "card_id": 4}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx, Transaction::new(1, 2, -300, 4));
    }

    #[test]
    fn test_load_csv() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "batch.csv",
            "id,user_id,amount_us_cents,card_id\n1, 1, 200000, 1\n2,1,600000,1\n",
        );

        let transactions = load_transactions(&path).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1], Transaction::new(2, 1, 600000, 1));
    }

    #[test]
    fn test_load_csv_bad_row() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bad.csv", "id,user_id,amount_us_cents,card_id\n1,x,5,1\n");

        let err = load_csv(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("row 1"));
    }

    #[test]
    fn test_load_json_envelope_and_array() {
        let dir = TempDir::new().unwrap();
        let envelope = write_file(
            &dir,
            "envelope.json",
            r#"{"transactions": [{"id": 1, "user_id": 1, "amount_us_cents": 10, "card_id": 1}]}"#,
        );
        let array = write_file(
            &dir,
            "array.json",
            r#"[{"id": 7, "user_id": 3, "amount_us_cents": 0, "card_id": 9}]"#,
        );

        assert_eq!(load_transactions(&envelope).unwrap(), vec![Transaction::new(1, 1, 10, 1)]);
        assert_eq!(load_transactions(&array).unwrap(), vec![Transaction::new(7, 3, 0, 9)]);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "batch.txt", "");
        assert!(load_transactions(&path).is_err());
    }
}
