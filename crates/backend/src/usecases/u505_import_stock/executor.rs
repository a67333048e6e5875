use super::csv_source::{parse_stock_csv, StockRow};
use crate::domain::{a001_connection, a004_sku};
use crate::shared::config;
use crate::shared::integrations::anymarket::AnymarketApiClient;
use crate::shared::integrations::vtex::VtexApiClient;
use crate::shared::integrations::IntegrationError;
use crate::shared::logger;
use crate::usecases::common::OperationError;
use anyhow::Result;
use contracts::domain::a004_sku::aggregate::Sku;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u505_import_stock::{
    ImportStock, StockImportReport, StockImportRequest, StockItemResult, StockSource,
};
use once_cell::sync::Lazy;
use std::time::Duration;

/// Категория для журналов
static CATEGORY: Lazy<String> = Lazy::new(ImportStock::full_name);

/// Executor импорта остатков
pub struct StockImportExecutor {
    pause: Duration,
    unlimited_stock: i64,
}

impl StockImportExecutor {
    pub fn from_config() -> Self {
        let batch = &config::get().batch;
        Self {
            pause: Duration::from_millis(batch.pause_ms),
            unlimited_stock: batch.unlimited_stock,
        }
    }

    /// Остатки из VTEX Logistics для выбранных или всех активных SKU
    pub async fn import_from_vtex(&self, request: &StockImportRequest) -> Result<StockImportReport> {
        if request.source != StockSource::Vtex {
            return Err(OperationError::Invalid(
                "CSV stock is imported through the import-csv endpoint".into(),
            )
            .into());
        }
        let vtex = a001_connection::service::vtex_client().await?;
        let anymarket = self.anymarket_if(request.push_to_anymarket).await?;

        let mut report = StockImportReport::default();
        let skus: Vec<Sku> = match request.sku_ids.as_ref().filter(|ids| !ids.is_empty()) {
            Some(ids) => {
                let mut found = Vec::with_capacity(ids.len());
                for id in ids {
                    match a004_sku::service::find_by_vtex_id(*id).await? {
                        Some(sku) if !sku.base.metadata.is_deleted => found.push(sku),
                        _ => {
                            report.processed += 1;
                            report.record_error(format!("SKU {}: not found in catalog", id));
                        }
                    }
                }
                found
            }
            None => a004_sku::service::list_active().await?,
        };

        tracing::info!("[{}] VTEX stock for {} SKUs", CATEGORY.as_str(), skus.len());

        for (index, sku) in skus.iter().enumerate() {
            if index > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
            report.processed += 1;
            let result = match self.vtex_quantity(&vtex, sku).await {
                Ok(quantity) => {
                    self.apply(sku, quantity, StockSource::Vtex, anymarket.as_ref())
                        .await
                }
                Err(e) => Err(e.into()),
            };
            record(&mut report, sku.vtex_sku_id, result);
        }

        finish(&report, StockSource::Vtex);
        Ok(report)
    }

    /// Остатки из загруженного CSV; ошибки разбора строк попадают в отчёт
    pub async fn import_from_csv(
        &self,
        bytes: &[u8],
        push_to_anymarket: bool,
    ) -> Result<StockImportReport> {
        let parsed = parse_stock_csv(bytes)?;
        let anymarket = self.anymarket_if(push_to_anymarket).await?;

        let mut report = StockImportReport::default();
        for error in parsed.errors {
            report.processed += 1;
            report.record_error(error);
        }

        tracing::info!("[{}] CSV stock for {} rows", CATEGORY.as_str(), parsed.rows.len());

        for (index, row) in parsed.rows.iter().enumerate() {
            if index > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
            report.processed += 1;
            let result = self.apply_row(row, anymarket.as_ref()).await;
            record(&mut report, row.sku_id, result);
        }

        finish(&report, StockSource::Csv);
        Ok(report)
    }

    async fn anymarket_if(&self, push: bool) -> Result<Option<AnymarketApiClient>> {
        if push {
            Ok(Some(a001_connection::service::anymarket_client().await?))
        } else {
            Ok(None)
        }
    }

    async fn vtex_quantity(
        &self,
        vtex: &VtexApiClient,
        sku: &Sku,
    ) -> Result<i64, IntegrationError> {
        let inventory = vtex.get_inventory(sku.vtex_sku_id).await?;
        Ok(inventory.available_quantity(self.unlimited_stock))
    }

    async fn apply_row(
        &self,
        row: &StockRow,
        anymarket: Option<&AnymarketApiClient>,
    ) -> Result<StockItemResult> {
        let sku = a004_sku::service::find_by_vtex_id(row.sku_id)
            .await?
            .filter(|s| !s.base.metadata.is_deleted)
            .ok_or_else(|| anyhow::anyhow!("not found in catalog"))?;
        self.apply(&sku, row.quantity, StockSource::Csv, anymarket)
            .await
    }

    /// Записать остаток (строка SKU и журнал в одной транзакции) и при необходимости отправить в Anymarket
    async fn apply(
        &self,
        sku: &Sku,
        quantity: i64,
        source: StockSource,
        anymarket: Option<&AnymarketApiClient>,
    ) -> Result<StockItemResult> {
        a004_sku::service::set_stock(sku, quantity, source.as_str()).await?;

        let pushed = match anymarket {
            Some(client) => {
                client.update_stock(&sku.partner_id(), quantity).await?;
                true
            }
            None => false,
        };

        Ok(StockItemResult {
            sku_id: sku.vtex_sku_id,
            previous_quantity: sku.stock_quantity,
            quantity,
            pushed_to_anymarket: pushed,
        })
    }
}

fn record(report: &mut StockImportReport, sku_id: i64, result: Result<StockItemResult>) {
    match result {
        Ok(item) => {
            report.updated += 1;
            report.items.push(item);
        }
        Err(e) => {
            tracing::error!("[{}] SKU {} failed: {}", CATEGORY.as_str(), sku_id, e);
            report.record_error(format!("SKU {}: {}", sku_id, e));
        }
    }
}

fn finish(report: &StockImportReport, source: StockSource) {
    let summary = format!(
        "Stock import ({}) finished: {} processed, {} updated, {} errors",
        source.as_str(),
        report.processed,
        report.updated,
        report.errors
    );
    tracing::info!("[{}] {}", CATEGORY.as_str(), summary);
    logger::log(CATEGORY.as_str(), &summary);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sku_id: i64) -> StockItemResult {
        StockItemResult {
            sku_id,
            previous_quantity: Some(1),
            quantity: 3,
            pushed_to_anymarket: false,
        }
    }

    #[test]
    fn test_record_counts_updates_and_errors() {
        let mut report = StockImportReport::default();
        record(&mut report, 1, Ok(item(1)));
        record(&mut report, 2, Err(anyhow::anyhow!("VTEX returned 404")));

        assert_eq!(report.updated, 1);
        assert_eq!(report.errors, 1);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.error_messages, vec!["SKU 2: VTEX returned 404"]);
    }
}
