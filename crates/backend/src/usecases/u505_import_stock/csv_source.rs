//! Разбор CSV с остатками: заголовок `sku_id,quantity`, разделитель `;` или `,`

use crate::usecases::common::OperationError;

/// Строка файла остатков
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRow {
    pub sku_id: i64,
    pub quantity: i64,
}

/// Итог разбора: корректные строки и ошибки по остальным
#[derive(Debug, Default)]
pub struct ParsedStockCsv {
    pub rows: Vec<StockRow>,
    pub errors: Vec<String>,
}

/// Разделитель по строке заголовка
fn detect_delimiter(data: &str) -> u8 {
    let header = data.lines().next().unwrap_or("");
    if header.contains(';') {
        b';'
    } else {
        b','
    }
}

pub fn parse_stock_csv(bytes: &[u8]) -> anyhow::Result<ParsedStockCsv> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(text))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| OperationError::Invalid(format!("Invalid CSV header: {}", e)))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                OperationError::Invalid(format!("CSV header must contain '{}' column", name))
            })
    };
    let sku_col = column("sku_id")?;
    let qty_col = column("quantity")?;

    let mut parsed = ParsedStockCsv::default();
    for (index, record) in reader.records().enumerate() {
        // строка 1 занята заголовком
        let line = index + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                parsed.errors.push(format!("Line {}: {}", line, e));
                continue;
            }
        };
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        let sku_id = record.get(sku_col).unwrap_or("");
        let quantity = record.get(qty_col).unwrap_or("");
        match (sku_id.parse::<i64>(), quantity.parse::<i64>()) {
            (Ok(sku_id), Ok(quantity)) if quantity >= 0 => {
                parsed.rows.push(StockRow { sku_id, quantity })
            }
            (Ok(_), Ok(quantity)) => parsed
                .errors
                .push(format!("Line {}: negative quantity {}", line, quantity)),
            _ => parsed.errors.push(format!(
                "Line {}: invalid sku_id '{}' or quantity '{}'",
                line, sku_id, quantity
            )),
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_delimited() {
        let parsed = parse_stock_csv(b"sku_id,quantity\n310,5\n311, 0\n").unwrap();
        assert_eq!(
            parsed.rows,
            vec![
                StockRow { sku_id: 310, quantity: 5 },
                StockRow { sku_id: 311, quantity: 0 }
            ]
        );
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_semicolon_with_bom_and_extra_columns() {
        let data = "\u{feff}nome;SKU_ID;Quantity\nCamiseta;310;12\n\n";
        let parsed = parse_stock_csv(data.as_bytes()).unwrap();
        assert_eq!(parsed.rows, vec![StockRow { sku_id: 310, quantity: 12 }]);
    }

    #[test]
    fn test_bad_rows_are_reported_with_line_numbers() {
        let parsed = parse_stock_csv(b"sku_id,quantity\nabc,1\n312,-4\n313,2\n").unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.errors.len(), 2);
        assert!(parsed.errors[0].starts_with("Line 2:"));
        assert!(parsed.errors[1].contains("negative"));
    }

    #[test]
    fn test_missing_header_column() {
        let err = parse_stock_csv(b"sku,qty\n1,2\n").unwrap_err();
        assert!(err.to_string().contains("sku_id"));
    }
}
